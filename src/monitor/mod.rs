//! Monitor topology.
//!
//! A [`Topology`] is one consistent snapshot of the connected monitors: their geometry, which one
//! is primary, and how native monitor indices map to legacy (Xinerama) screen indices. It is
//! never mutated in place. On hotplug a new snapshot is built with [`Topology::recompute`] and
//! replaces the old one wholesale, so all queries made against one snapshot agree with each other.
//!
//! Monitor indices are only meaningful within a single generation. Queries that take an index
//! reject indices outside the current snapshot with [`TopologyError::InvalidIndex`].

use std::collections::VecDeque;

use smithay::utils::{Logical, Point, Rectangle};

use crate::utils::{geometry, Direction};


/// One output as reported by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutputInfo {
    pub rect: Rectangle<i32, Logical>,
    pub is_primary: bool,
}

/// Raw hardware state used to build a topology.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct HardwareInfo {
    pub outputs: Vec<OutputInfo>,
    /// Screens as exposed through the legacy Xinerama interface, in legacy index order.
    pub legacy_screens: Vec<Rectangle<i32, Logical>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Monitor {
    pub index: usize,
    pub rect: Rectangle<i32, Logical>,
    pub is_primary: bool,
    /// Index of the legacy screen with exactly the same rectangle, if any.
    ///
    /// Each legacy screen belongs to at most one monitor. Mirrored monitors with the same
    /// rectangle take the identical legacy screens in order.
    pub legacy_index: Option<usize>,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Topology {
    generation: u64,
    monitors: Vec<Monitor>,
    primary: Option<usize>,
    legacy_to_native: Vec<Option<usize>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TopologyError {
    #[error("monitor {index} does not exist in topology generation {generation} ({count} monitors)")]
    InvalidIndex {
        index: usize,
        generation: u64,
        count: usize,
    },
}

impl Topology {
    /// Builds the next topology generation from fresh hardware information.
    pub fn recompute(&self, info: &HardwareInfo) -> Self {
        let _span = tracy_client::span!("Topology::recompute");

        let legacy_screens: Vec<_> = info
            .legacy_screens
            .iter()
            .map(|screen| geometry::sanitize(*screen))
            .collect();
        let mut legacy_taken = vec![false; legacy_screens.len()];

        let mut monitors = Vec::with_capacity(info.outputs.len());
        for (index, output) in info.outputs.iter().enumerate() {
            let rect = geometry::sanitize(output.rect);
            let legacy_index = (0..legacy_screens.len())
                .find(|&legacy| !legacy_taken[legacy] && legacy_screens[legacy] == rect);
            if let Some(legacy) = legacy_index {
                legacy_taken[legacy] = true;
            }

            monitors.push(Monitor {
                index,
                rect,
                is_primary: output.is_primary,
                legacy_index,
            });
        }

        let primary = monitors
            .iter()
            .position(|mon| mon.is_primary)
            .or((!monitors.is_empty()).then_some(0));

        let legacy_to_native = (0..info.legacy_screens.len())
            .map(|legacy| monitors.iter().position(|mon| mon.legacy_index == Some(legacy)))
            .collect();

        let topology = Self {
            generation: self.generation + 1,
            monitors,
            primary,
            legacy_to_native,
        };

        debug!(
            "topology generation {}: {} monitors, primary {:?}",
            topology.generation,
            topology.monitors.len(),
            topology.primary
        );
        for mon in &topology.monitors {
            trace!("monitor {}: {:?} legacy {:?}", mon.index, mon.rect, mon.legacy_index);
        }

        topology
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn monitors(&self) -> &[Monitor] {
        &self.monitors
    }

    pub fn len(&self) -> usize {
        self.monitors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.monitors.is_empty()
    }

    pub fn monitor(&self, index: usize) -> Result<&Monitor, TopologyError> {
        self.monitors.get(index).ok_or(TopologyError::InvalidIndex {
            index,
            generation: self.generation,
            count: self.monitors.len(),
        })
    }

    /// The monitor marked primary, falling back to the first monitor.
    pub fn primary(&self) -> Option<&Monitor> {
        self.primary.map(|index| &self.monitors[index])
    }

    /// Monitor containing the point, or else the one nearest to it.
    pub fn monitor_for_point(&self, point: Point<i32, Logical>) -> Option<usize> {
        if let Some(mon) = self.monitors.iter().find(|mon| mon.rect.contains(point)) {
            return Some(mon.index);
        }

        // min_by_key returns the first of equal minimums, so ties go to the lowest index.
        self.monitors
            .iter()
            .min_by_key(|mon| {
                geometry::distance_squared(geometry::clamp_point(mon.rect, point), point)
            })
            .map(|mon| mon.index)
    }

    /// Monitor with the largest overlap with the rectangle.
    ///
    /// If the rectangle overlaps no monitor, the monitor for its center is returned.
    pub fn monitor_for_rect(&self, rect: Rectangle<i32, Logical>) -> Option<usize> {
        let mut best: Option<(usize, i64)> = None;
        for mon in &self.monitors {
            let Some(overlap) = geometry::intersection(mon.rect, rect) else {
                continue;
            };
            let area = geometry::area(overlap);
            if best.map_or(true, |(_, best_area)| area > best_area) {
                best = Some((mon.index, area));
            }
        }

        match best {
            Some((index, _)) => Some(index),
            None => self.monitor_for_point(geometry::center(rect)),
        }
    }

    /// Monitor sharing an edge with `from` in the given direction.
    ///
    /// The monitors must touch along the whole shared edge coordinate and overlap by a positive
    /// length on the perpendicular axis. When several monitors qualify, the lowest index wins.
    pub fn monitor_neighbor(
        &self,
        from: usize,
        direction: Direction,
    ) -> Result<Option<usize>, TopologyError> {
        let input = self.monitor(from)?.rect;

        let neighbor = self.monitors.iter().find(|mon| {
            if mon.index == from {
                return false;
            }

            let cur = mon.rect;
            let vertical = geometry::vertical_overlap(cur, input) > 0;
            let horizontal = geometry::horizontal_overlap(cur, input) > 0;
            match direction {
                Direction::Right => cur.loc.x == geometry::right(input) && vertical,
                Direction::Left => input.loc.x == geometry::right(cur) && vertical,
                Direction::Up => input.loc.y == geometry::bottom(cur) && horizontal,
                Direction::Down => cur.loc.y == geometry::bottom(input) && horizontal,
            }
        });

        Ok(neighbor.map(|mon| mon.index))
    }

    /// Monitors ordered by adjacency starting from `from`.
    ///
    /// Walks breadth-first through neighbors (left, right, up, down), then appends monitors not
    /// reachable through shared edges in index order.
    pub fn natural_monitor_list(&self, from: usize) -> Result<Vec<usize>, TopologyError> {
        self.monitor(from)?;

        let mut visited = vec![false; self.monitors.len()];
        let mut list = Vec::with_capacity(self.monitors.len());
        let mut queue = VecDeque::from([from]);
        visited[from] = true;

        while let Some(index) = queue.pop_front() {
            list.push(index);

            for direction in [
                Direction::Left,
                Direction::Right,
                Direction::Up,
                Direction::Down,
            ] {
                if let Some(neighbor) = self.monitor_neighbor(index, direction)? {
                    if !visited[neighbor] {
                        visited[neighbor] = true;
                        queue.push_back(neighbor);
                    }
                }
            }
        }

        list.extend((0..self.monitors.len()).filter(|index| !visited[*index]));
        Ok(list)
    }

    pub fn legacy_to_native(&self, legacy: usize) -> Option<usize> {
        self.legacy_to_native.get(legacy).copied().flatten()
    }

    pub fn native_to_legacy(&self, index: usize) -> Result<Option<usize>, TopologyError> {
        Ok(self.monitor(index)?.legacy_index)
    }

    #[cfg(test)]
    pub fn verify_invariants(&self) {
        for (index, mon) in self.monitors.iter().enumerate() {
            assert_eq!(mon.index, index, "monitor indices must be contiguous");

            if let Some(legacy) = mon.legacy_index {
                let native = self
                    .legacy_to_native(legacy)
                    .expect("legacy index of a monitor must map back to a monitor");
                assert_eq!(native, index, "legacy mapping must round-trip");
                assert_eq!(
                    self.monitors[native].rect, mon.rect,
                    "legacy mapping must match identical rectangles"
                );
            }
        }

        match self.primary {
            Some(primary) => {
                assert!(primary < self.monitors.len());
                if let Some(first_marked) = self.monitors.iter().position(|mon| mon.is_primary) {
                    assert_eq!(primary, first_marked);
                } else {
                    assert_eq!(primary, 0);
                }
            }
            None => assert!(self.monitors.is_empty()),
        }
    }
}
