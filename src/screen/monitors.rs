use std::rc::Rc;
use std::time::Duration;

use smithay::utils::{Logical, Point, Rectangle};

use super::{DeferredWork, Notification, Screen, ScreenData, ScreenState, WindowId};
use crate::monitor::{HardwareInfo, Monitor, Topology, TopologyError};
use crate::utils::{geometry, Direction};
use crate::window::{ScreenWindow, Side};

impl<D: ScreenData> Screen<D> {
    /// Current topology snapshot.
    pub fn topology(&self) -> Rc<Topology> {
        self.topology.clone()
    }

    pub fn on_hotplug(&mut self, info: &HardwareInfo) {
        let _span = tracy_client::span!("Screen::on_hotplug");

        self.topology = Rc::new(self.topology.recompute(info));
        let count = self.topology.len();

        if self.last_monitor_index >= count {
            self.last_monitor_index = 0;
        }
        self.set_pointer_position(self.pointer);
        self.in_fullscreen.resize(count, false);

        self.observers.emit(Notification::MonitorsChanged {
            generation: self.topology.generation(),
        });
        self.recalc_work_areas();

        if self.tile_preview.is_shown() {
            self.hide_tile_preview();
        }
        if self.state == ScreenState::Active {
            self.queue_check_fullscreen();
        }
    }

    pub fn primary_monitor(&self) -> Option<&Monitor> {
        self.topology.primary()
    }

    pub fn monitor_for_point(&self, point: Point<i32, Logical>) -> Option<usize> {
        self.topology.monitor_for_point(point)
    }

    pub fn monitor_for_rect(&self, rect: Rectangle<i32, Logical>) -> Option<usize> {
        self.topology.monitor_for_rect(rect)
    }

    pub fn monitor_for_window(&self, id: &WindowId<D>) -> Option<usize> {
        let window = self.window(id)?;
        self.topology.monitor_for_rect(window.frame_rect())
    }

    pub fn monitor_neighbor(
        &self,
        from: usize,
        direction: Direction,
    ) -> Result<Option<usize>, TopologyError> {
        self.topology.monitor_neighbor(from, direction)
    }

    pub fn natural_monitor_list(&self, from: usize) -> Result<Vec<usize>, TopologyError> {
        self.topology.natural_monitor_list(from)
    }

    pub fn legacy_to_native(&self, legacy: usize) -> Option<usize> {
        self.topology.legacy_to_native(legacy)
    }

    pub fn native_to_legacy(&self, index: usize) -> Result<Option<usize>, TopologyError> {
        self.topology.native_to_legacy(index)
    }

    pub fn pointer_position(&self) -> Point<i32, Logical> {
        self.pointer
    }

    pub fn set_pointer_position(&mut self, pointer: Point<i32, Logical>) {
        self.pointer = pointer;
        if let Some(mon) = self.topology.monitors().iter().find(|mon| mon.rect.contains(pointer)) {
            self.last_monitor_index = mon.index;
        }
    }

    /// Monitor under the pointer.
    ///
    /// When the pointer is outside all monitors, this is the monitor it was last seen on.
    pub fn current_monitor(&self) -> Option<usize> {
        if self.topology.is_empty() {
            return None;
        }

        self.topology
            .monitors()
            .iter()
            .find(|mon| mon.rect.contains(self.pointer))
            .map(|mon| mon.index)
            .or(Some(self.last_monitor_index))
    }

    /// Monitor rectangle minus the struts of windows on the active workspace.
    pub fn work_area(&self, monitor: usize) -> Option<Rectangle<i32, Logical>> {
        self.work_areas.get(monitor).copied()
    }

    pub fn queue_workarea_recalc(&mut self) {
        if self.state == ScreenState::Closing {
            return;
        }

        self.deferred
            .schedule(DeferredWork::WorkAreaRecalc, Duration::ZERO, |data| {
                data.screen().recalc_work_areas();
            });
    }

    /// Recomputes the work areas, notifying subscribers if they changed.
    pub(super) fn recalc_work_areas(&mut self) -> bool {
        let _span = tracy_client::span!("Screen::recalc_work_areas");

        let work_areas = self.compute_work_areas();
        if work_areas == self.work_areas {
            return false;
        }

        trace!("work areas changed: {work_areas:?}");
        self.work_areas = work_areas;
        self.observers.emit(Notification::WorkAreasChanged);
        true
    }

    fn compute_work_areas(&self) -> Vec<Rectangle<i32, Logical>> {
        let struts: Vec<_> = self
            .windows
            .iter()
            .filter(|m| self.located_on_active_workspace(m) && self.stack.is_visible(m.window.id()))
            .flat_map(|m| m.window.struts().iter())
            .map(|strut| (geometry::sanitize(strut.rect), strut.side))
            .filter(|(rect, _)| !geometry::is_empty(*rect))
            .collect();

        self.topology
            .monitors()
            .iter()
            .map(|mon| {
                let rect = mon.rect;
                let (mut left, mut top) = (rect.loc.x, rect.loc.y);
                let (mut right, mut bottom) = (geometry::right(rect), geometry::bottom(rect));

                for (strut, side) in &struts {
                    if geometry::intersection(*strut, rect).is_none() {
                        continue;
                    }
                    match side {
                        Side::Left => left = left.max(geometry::right(*strut)),
                        Side::Right => right = right.min(strut.loc.x),
                        Side::Top => top = top.max(geometry::bottom(*strut)),
                        Side::Bottom => bottom = bottom.min(strut.loc.y),
                    }
                }

                geometry::from_edges(left, top, right, bottom)
            })
            .collect()
    }
}
