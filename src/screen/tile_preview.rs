use std::time::Duration;

use smithay::utils::{Logical, Rectangle};

use super::{DeferredWork, Notification, Screen, ScreenData, ScreenState, WindowId};
use crate::window::ScreenWindow;

/// Outline of where a dragged window would land if dropped into a tiling zone.
#[derive(Debug)]
pub struct TilePreview<Id> {
    /// Window the preview is shown or pending for.
    pub(super) window: Option<Id>,
    area: Option<Rectangle<i32, Logical>>,
    monitor: Option<usize>,
}

impl<Id> Default for TilePreview<Id> {
    fn default() -> Self {
        Self {
            window: None,
            area: None,
            monitor: None,
        }
    }
}

impl<Id> TilePreview<Id> {
    pub fn is_shown(&self) -> bool {
        self.area.is_some()
    }

    pub fn window(&self) -> Option<&Id> {
        self.window.as_ref()
    }

    pub fn area(&self) -> Option<Rectangle<i32, Logical>> {
        self.area
    }

    pub fn monitor(&self) -> Option<usize> {
        self.monitor
    }
}

impl<D: ScreenData> Screen<D> {
    pub fn tile_preview(&self) -> &TilePreview<WindowId<D>> {
        &self.tile_preview
    }

    pub fn tile_preview_delay(&self) -> Duration {
        Duration::from_millis(self.config.tile_preview.delay_ms)
    }

    /// Shows the tile preview for `window` after `delay`.
    ///
    /// Calling this again before the delay passes restarts the wait. A zero delay updates the
    /// preview right away.
    pub fn update_tile_preview(&mut self, window: &WindowId<D>, delay: Duration) {
        if self.state == ScreenState::Closing {
            return;
        }

        self.tile_preview.window = Some(window.clone());

        if delay.is_zero() {
            self.deferred.cancel(DeferredWork::TilePreview);
            self.apply_tile_preview();
        } else {
            self.deferred
                .schedule(DeferredWork::TilePreview, delay, |data| {
                    data.screen().apply_tile_preview();
                });
        }
    }

    fn apply_tile_preview(&mut self) {
        let _span = tracy_client::span!("Screen::apply_tile_preview");

        let target = self.tile_preview.window.as_ref().and_then(|id| {
            let tile_mode = self.window(id)?.tile_mode()?;
            let monitor = self.monitor_for_window(id)?;
            let work_area = self.work_area(monitor)?;
            Some((monitor, tile_mode.area_in(work_area)))
        });

        let Some((monitor, area)) = target else {
            self.hide_tile_preview();
            return;
        };

        self.tile_preview.monitor = Some(monitor);
        if self.tile_preview.area != Some(area) {
            trace!("showing tile preview at {area:?} on monitor {monitor}");
            self.tile_preview.area = Some(area);
            self.observers
                .emit(Notification::TilePreviewChanged(Some(area)));
        }
    }

    /// Hides the tile preview and cancels a pending update.
    pub fn hide_tile_preview(&mut self) {
        self.deferred.cancel(DeferredWork::TilePreview);
        self.tile_preview.window = None;
        self.tile_preview.monitor = None;

        if self.tile_preview.area.take().is_some() {
            trace!("hiding tile preview");
            self.observers.emit(Notification::TilePreviewChanged(None));
        }
    }
}
