use std::time::Duration;

use super::{DeferredWork, Notification, Screen, ScreenData, ScreenState, WindowId};
use crate::stack::{RestackError, StackItem};
use crate::window::ScreenWindow;

impl<D: ScreenData> Screen<D> {
    /// Visible client windows, bottom to top.
    pub fn stacking(&self) -> impl DoubleEndedIterator<Item = &WindowId<D>> + '_ {
        self.stack.stacking()
    }

    /// Complete server-side stack including auxiliary windows, bottom to top.
    pub fn server_stack(&self) -> Vec<StackItem<WindowId<D>>> {
        self.stack.server_stack()
    }

    /// Replaces the stacking order with a permutation of the managed windows.
    pub fn restack(&mut self, new_order: &[WindowId<D>]) -> Result<(), RestackError<WindowId<D>>> {
        let _span = tracy_client::span!("Screen::restack");

        self.stack.restack(new_order)?;
        self.restacked();
        Ok(())
    }

    pub fn raise_window(&mut self, id: &WindowId<D>) {
        if self.stack.raise(id) {
            self.restacked();
        }
    }

    pub fn lower_window(&mut self, id: &WindowId<D>) {
        if self.stack.lower(id) {
            self.restacked();
        }
    }

    fn restacked(&mut self) {
        self.observers.emit(Notification::Restacked);
        self.queue_check_fullscreen();
    }

    pub fn showing_desktop(&self) -> bool {
        self.stack.showing_desktop()
    }

    /// Hides all windows except desktop and dock windows.
    pub fn show_desktop(&mut self) {
        let _span = tracy_client::span!("Screen::show_desktop");

        if self.stack.show_desktop() {
            debug!("showing desktop");
            self.observers.emit(Notification::ShowingDesktopChanged(true));
            self.queue_workarea_recalc();
            self.queue_check_fullscreen();
        }
    }

    /// Brings back the windows hidden by [`Screen::show_desktop()`].
    pub fn unshow_desktop(&mut self) {
        let _span = tracy_client::span!("Screen::unshow_desktop");

        if self.stack.unshow_desktop() {
            debug!("unshowing desktop");
            self.observers.emit(Notification::ShowingDesktopChanged(false));
            self.queue_workarea_recalc();
            self.queue_check_fullscreen();
        }
    }

    /// Minimizes every window on the active workspace except one.
    pub fn minimize_others_on_active_workspace(&mut self, except: &WindowId<D>) {
        let _span = tracy_client::span!("Screen::minimize_others_on_active_workspace");

        let active = self.workspaces.active_id();
        let mut changed = false;
        for managed in &mut self.windows {
            let on_active = managed.workspace.is_none() || managed.workspace == active;
            if !on_active
                || managed.window.id() == except
                || managed.window.is_minimized()
                || managed.window.window_type().is_desktop_or_dock()
            {
                continue;
            }

            managed.window.minimize();
            changed |= self
                .stack
                .set_minimized(managed.window.id(), managed.window.is_minimized());
        }

        if changed {
            self.queue_workarea_recalc();
            self.queue_check_fullscreen();
        }
    }

    pub fn is_in_fullscreen(&self, monitor: usize) -> bool {
        self.in_fullscreen.get(monitor).copied().unwrap_or(false)
    }

    pub fn queue_check_fullscreen(&mut self) {
        if self.state == ScreenState::Closing {
            return;
        }

        self.deferred
            .schedule(DeferredWork::FullscreenCheck, Duration::ZERO, |data| {
                data.screen().check_fullscreen();
            });
    }

    /// Recomputes which monitors have a fullscreen window on top.
    ///
    /// The topmost visible window on the active workspace decides for each monitor it is on.
    pub(super) fn check_fullscreen(&mut self) -> bool {
        let _span = tracy_client::span!("Screen::check_fullscreen");

        let count = self.topology.len();
        let mut decided = vec![false; count];
        let mut in_fullscreen = vec![false; count];

        for managed in self.visible_top_to_bottom() {
            if managed.window.window_type().is_desktop_or_dock() {
                continue;
            }

            let Some(mon) = self.topology.monitor_for_rect(managed.window.frame_rect()) else {
                continue;
            };
            if !decided[mon] {
                decided[mon] = true;
                in_fullscreen[mon] = managed.window.is_fullscreen();
            }
        }

        if in_fullscreen == self.in_fullscreen {
            return false;
        }

        debug!("in fullscreen changed: {in_fullscreen:?}");
        self.in_fullscreen = in_fullscreen;
        self.observers.emit(Notification::InFullscreenChanged);
        true
    }
}
