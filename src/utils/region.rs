//! Accumulated damage.

use smithay::utils::{Buffer as BufferCoords, Rectangle};

use super::geometry;

/// Past this many rectangles the region collapses into its bounding box.
pub const MAX_DAMAGE_RECTS: usize = 16;

/// Set of damaged rectangles, coalesced on insertion.
///
/// No rectangle in the set is empty, and no rectangle is contained in another one.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Region {
    rects: Vec<Rectangle<i32, BufferCoords>>,
}

impl Region {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.rects.is_empty()
    }

    pub fn rects(&self) -> &[Rectangle<i32, BufferCoords>] {
        &self.rects
    }

    pub fn add(&mut self, rect: Rectangle<i32, BufferCoords>) {
        let rect = geometry::sanitize(rect);
        if geometry::is_empty(rect) {
            return;
        }

        if self.rects.iter().any(|existing| existing.contains_rect(rect)) {
            return;
        }

        self.rects.retain(|existing| !rect.contains_rect(*existing));
        self.rects.push(rect);

        if self.rects.len() > MAX_DAMAGE_RECTS {
            let bbox = self.bounding_box();
            self.rects.clear();
            self.rects.push(bbox);
        }
    }

    pub fn extend(&mut self, rects: impl IntoIterator<Item = Rectangle<i32, BufferCoords>>) {
        for rect in rects {
            self.add(rect);
        }
    }

    /// Smallest rectangle covering the region, empty at the origin for an empty region.
    pub fn bounding_box(&self) -> Rectangle<i32, BufferCoords> {
        let Some((first, rest)) = self.rects.split_first() else {
            return geometry::rect(0, 0, 0, 0);
        };

        let (mut left, mut top) = (first.loc.x, first.loc.y);
        let (mut right, mut bottom) = (geometry::right(*first), geometry::bottom(*first));
        for rect in rest {
            left = left.min(rect.loc.x);
            top = top.min(rect.loc.y);
            right = right.max(geometry::right(*rect));
            bottom = bottom.max(geometry::bottom(*rect));
        }
        geometry::from_edges(left, top, right, bottom)
    }

    /// Rectangles intersected with `bounds`, dropping the ones fully outside.
    pub fn clipped(
        &self,
        bounds: Rectangle<i32, BufferCoords>,
    ) -> Vec<Rectangle<i32, BufferCoords>> {
        self.rects
            .iter()
            .filter_map(|rect| geometry::intersection(*rect, bounds))
            .collect()
    }

    pub fn clear(&mut self) {
        self.rects.clear();
    }

    #[cfg(test)]
    pub fn verify_invariants(&self) {
        assert!(self.rects.len() <= MAX_DAMAGE_RECTS);
        for (i, a) in self.rects.iter().enumerate() {
            assert!(!geometry::is_empty(*a), "region must not hold empty rectangles");
            for (j, b) in self.rects.iter().enumerate() {
                if i != j {
                    assert!(
                        !a.contains_rect(*b),
                        "region rectangles must not contain each other: {a:?} ⊇ {b:?}"
                    );
                }
            }
        }
    }
}
