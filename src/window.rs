//! Window-side interface of the screen.
//!
//! The screen does not own the window object model. The compositor implements [`ScreenWindow`]
//! for its window type and hands windows to the screen to manage.

use std::fmt::Debug;
use std::hash::Hash;

use smithay::utils::{Logical, Rectangle};

use crate::utils::geometry;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WindowType {
    #[default]
    Normal,
    Dialog,
    Utility,
    Desktop,
    Dock,
}

impl WindowType {
    /// Desktop and dock windows stay visible while the desktop is shown.
    pub fn is_desktop_or_dock(self) -> bool {
        matches!(self, WindowType::Desktop | WindowType::Dock)
    }
}

/// Half-screen or maximized tiling state of a window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TileMode {
    Left,
    Right,
    Maximized,
}

impl TileMode {
    /// Area a window tiled this way occupies within a monitor work area.
    pub fn area_in(self, work_area: Rectangle<i32, Logical>) -> Rectangle<i32, Logical> {
        let work_area = geometry::sanitize(work_area);
        let (x, y) = (work_area.loc.x, work_area.loc.y);
        let (w, h) = (work_area.size.w, work_area.size.h);
        let half = w / 2;
        match self {
            TileMode::Left => geometry::rect(x, y, half, h),
            TileMode::Right => geometry::rect(x + half, y, w - half, h),
            TileMode::Maximized => work_area,
        }
    }
}

/// Screen edge a strut is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Left,
    Right,
    Top,
    Bottom,
}

/// Area reserved along a screen edge, for example by a panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Strut {
    pub rect: Rectangle<i32, Logical>,
    pub side: Side,
}

pub trait ScreenWindow {
    /// Type that can be used as a unique ID of this window.
    type Id: Clone + Eq + Hash + Debug + Send + Sync + 'static;

    /// Unique ID of this window.
    fn id(&self) -> &Self::Id;

    /// Frame rectangle in global coordinates.
    fn frame_rect(&self) -> Rectangle<i32, Logical>;

    fn window_type(&self) -> WindowType {
        WindowType::Normal
    }

    fn tile_mode(&self) -> Option<TileMode> {
        None
    }

    fn is_fullscreen(&self) -> bool;

    fn is_minimized(&self) -> bool;

    /// Asks the window to minimize.
    ///
    /// The screen updates its own stacking state right after calling this.
    fn minimize(&mut self);

    /// Whether the window is shown on every workspace.
    fn is_on_all_workspaces(&self) -> bool {
        false
    }

    /// Areas along screen edges that this window reserves.
    fn struts(&self) -> &[Strut] {
        &[]
    }

    /// Startup notification id set by the launching client.
    fn startup_id(&self) -> Option<&str> {
        None
    }

    /// `WM_CLASS` class part.
    fn wm_class(&self) -> Option<&str> {
        None
    }

    /// `WM_CLASS` instance part.
    fn wm_instance(&self) -> Option<&str> {
        None
    }

    fn pid(&self) -> Option<u32> {
        None
    }
}
