use bitflags::bitflags;

use super::{Managed, Screen, ScreenData, WindowId};
use crate::utils::geometry;
use crate::window::{ScreenWindow, TileMode};

bitflags! {
    /// Filters for listing managed windows.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct ListWindows: u8 {
        /// Only windows located on the active workspace, including the ones on all workspaces.
        const ACTIVE_WORKSPACE = 1;
        /// Bottom-to-top stacking order instead of adoption order.
        const SORTED = 1 << 1;
    }
}

impl<D: ScreenData> Screen<D> {
    pub(crate) fn located_on_active_workspace(&self, managed: &Managed<D::Window>) -> bool {
        match managed.workspace {
            None => true,
            Some(ws) => Some(ws) == self.workspaces.active_id(),
        }
    }

    fn listed(&self, managed: &Managed<D::Window>, flags: ListWindows) -> bool {
        !flags.contains(ListWindows::ACTIVE_WORKSPACE) || self.located_on_active_workspace(managed)
    }

    /// Managed windows matching the flags.
    pub fn windows(&self, flags: ListWindows) -> impl Iterator<Item = &D::Window> + '_ {
        let sorted = flags
            .contains(ListWindows::SORTED)
            .then(|| self.stack.order().filter_map(|id| self.managed(id)));
        let unsorted = (!flags.contains(ListWindows::SORTED)).then(|| self.windows.iter());

        sorted
            .into_iter()
            .flatten()
            .chain(unsorted.into_iter().flatten())
            .filter(move |m| self.listed(m, flags))
            .map(|m| &m.window)
    }

    /// Calls `f` on every managed window matching the flags.
    pub fn foreach_window(&mut self, flags: ListWindows, mut f: impl FnMut(&mut D::Window)) {
        let ids: Vec<WindowId<D>> = self.windows(flags).map(|w| w.id().clone()).collect();
        for id in ids {
            if let Some(window) = self.window_mut(&id) {
                f(window);
            }
        }
    }

    /// Visible windows on the active workspace, top to bottom.
    pub(super) fn visible_top_to_bottom(&self) -> impl Iterator<Item = &Managed<D::Window>> + '_ {
        self.stack
            .stacking()
            .rev()
            .filter_map(|id| self.managed(id))
            .filter(|m| self.located_on_active_workspace(m))
    }

    /// Topmost visible window under the pointer, skipping `not_this_one`.
    pub fn window_under_pointer(&self, not_this_one: Option<&WindowId<D>>) -> Option<&D::Window> {
        self.visible_top_to_bottom()
            .filter(|m| Some(m.window.id()) != not_this_one)
            .find(|m| geometry::sanitize(m.window.frame_rect()).contains(self.pointer))
            .map(|m| &m.window)
    }

    /// Another visible window on the active workspace tiled the same way on the same monitor.
    pub fn tiled_window_for_monitor(
        &self,
        monitor: usize,
        tile_mode: TileMode,
        not_this_one: Option<&WindowId<D>>,
    ) -> Option<&D::Window> {
        self.visible_top_to_bottom()
            .filter(|m| Some(m.window.id()) != not_this_one)
            .filter(|m| m.window.tile_mode() == Some(tile_mode))
            .find(|m| self.topology.monitor_for_rect(m.window.frame_rect()) == Some(monitor))
            .map(|m| &m.window)
    }

    pub fn has_tiled_window_for_monitor(
        &self,
        monitor: usize,
        tile_mode: TileMode,
        not_this_one: Option<&WindowId<D>>,
    ) -> bool {
        self.tiled_window_for_monitor(monitor, tile_mode, not_this_one)
            .is_some()
    }
}
