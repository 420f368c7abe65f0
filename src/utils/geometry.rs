//! Helpers for the smithay geometry types.
//!
//! Monitor layouts, window frames, struts and buffer damage come from hardware and clients and
//! may hold any `i32`. The helpers here saturate instead of overflowing. [`sanitize()`] shrinks a
//! rectangle until its far edges fit in `i32`, after which the smithay operations are safe on it.

use smithay::utils::{Point, Rectangle, Size};

/// Rectangle from raw integers.
///
/// Negative sizes become empty and sizes reaching past `i32::MAX` are cut at `i32::MAX`.
pub fn rect<Kind>(x: i32, y: i32, w: i32, h: i32) -> Rectangle<i32, Kind> {
    Rectangle::new(
        Point::from((x, y)),
        Size::from((clamp_extent(x, w), clamp_extent(y, h))),
    )
}

fn clamp_extent(start: i32, extent: i32) -> i32 {
    let room = i64::from(i32::MAX) - i64::from(start);
    let extent = i64::from(extent).clamp(0, room);
    i32::try_from(extent).unwrap_or(i32::MAX)
}

pub fn sanitize<Kind>(r: Rectangle<i32, Kind>) -> Rectangle<i32, Kind> {
    rect(r.loc.x, r.loc.y, r.size.w, r.size.h)
}

/// Rectangle between the given edges, right and bottom exclusive.
pub fn from_edges<Kind>(left: i32, top: i32, right: i32, bottom: i32) -> Rectangle<i32, Kind> {
    rect(
        left,
        top,
        right.saturating_sub(left),
        bottom.saturating_sub(top),
    )
}

pub fn right<Kind>(r: Rectangle<i32, Kind>) -> i32 {
    r.loc.x.saturating_add(r.size.w)
}

pub fn bottom<Kind>(r: Rectangle<i32, Kind>) -> i32 {
    r.loc.y.saturating_add(r.size.h)
}

pub fn is_empty<Kind>(r: Rectangle<i32, Kind>) -> bool {
    r.size.w <= 0 || r.size.h <= 0
}

pub fn area<Kind>(r: Rectangle<i32, Kind>) -> i64 {
    if is_empty(r) {
        0
    } else {
        i64::from(r.size.w) * i64::from(r.size.h)
    }
}

pub fn center<Kind>(r: Rectangle<i32, Kind>) -> Point<i32, Kind> {
    Point::from((
        r.loc.x.saturating_add(r.size.w / 2),
        r.loc.y.saturating_add(r.size.h / 2),
    ))
}

/// Non-empty intersection of two rectangles.
pub fn intersection<Kind>(
    a: Rectangle<i32, Kind>,
    b: Rectangle<i32, Kind>,
) -> Option<Rectangle<i32, Kind>> {
    sanitize(a)
        .intersection(sanitize(b))
        .filter(|r| !is_empty(*r))
}

/// Closest point inside the rectangle. Empty rectangles clamp to their location.
pub fn clamp_point<Kind>(r: Rectangle<i32, Kind>, point: Point<i32, Kind>) -> Point<i32, Kind> {
    let max_x = right(r).saturating_sub(1).max(r.loc.x);
    let max_y = bottom(r).saturating_sub(1).max(r.loc.y);
    Point::from((point.x.clamp(r.loc.x, max_x), point.y.clamp(r.loc.y, max_y)))
}

pub fn distance_squared<Kind>(a: Point<i32, Kind>, b: Point<i32, Kind>) -> i64 {
    let dx = i64::from(a.x) - i64::from(b.x);
    let dy = i64::from(a.y) - i64::from(b.y);
    dx.saturating_mul(dx).saturating_add(dy.saturating_mul(dy))
}

/// Length of the overlap of the two rectangles' vertical spans.
pub fn vertical_overlap<Kind>(a: Rectangle<i32, Kind>, b: Rectangle<i32, Kind>) -> i32 {
    i32::min(bottom(a), bottom(b)).saturating_sub(i32::max(a.loc.y, b.loc.y))
}

/// Length of the overlap of the two rectangles' horizontal spans.
pub fn horizontal_overlap<Kind>(a: Rectangle<i32, Kind>, b: Rectangle<i32, Kind>) -> i32 {
    i32::min(right(a), right(b)).saturating_sub(i32::max(a.loc.x, b.loc.x))
}
