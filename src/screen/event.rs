use anyhow::Context;
use smithay::utils::{Buffer as BufferCoords, Rectangle};

use super::{Error, Screen, ScreenData, ScreenState, SourceOf, StartupSequence, WindowId};
use crate::monitor::HardwareInfo;
use crate::window::ScreenWindow;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SurfaceId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BufferId(pub u64);

/// Decoded display-protocol event.
#[derive(Debug)]
pub enum ScreenEvent<Id, S> {
    /// Outputs were connected, disconnected or reconfigured.
    Hotplug(HardwareInfo),
    /// Geometry, struts or state of a window changed.
    Configure { window: Id },
    /// A client attached a buffer to a surface.
    BufferAttach {
        surface: SurfaceId,
        buffer: BufferId,
        source: S,
    },
    /// A client damaged the buffer attached to a surface, in buffer coordinates.
    BufferDamage {
        surface: SurfaceId,
        damage: Vec<Rectangle<i32, BufferCoords>>,
    },
    /// The client resource backing a buffer was destroyed.
    BufferDestroyed { buffer: BufferId },
    /// A client asked for a new stacking order, bottom to top.
    RestackRequest(Vec<Id>),
    StartupSequenceAdded(StartupSequence),
    StartupSequenceRemoved { id: String },
}

impl<D: ScreenData> Screen<D> {
    pub fn handle_event(
        &mut self,
        event: ScreenEvent<WindowId<D>, SourceOf<D>>,
    ) -> anyhow::Result<()> {
        let _span = tracy_client::span!("Screen::handle_event");

        if self.state == ScreenState::Closing {
            return Err(Error::Closing).context("error handling screen event");
        }

        match event {
            ScreenEvent::Hotplug(info) => self.on_hotplug(&info),
            ScreenEvent::Configure { window } => {
                self.on_configure(&window)
                    .with_context(|| format!("error configuring window {window:?}"))?;
            }
            ScreenEvent::BufferAttach {
                surface,
                buffer,
                source,
            } => self.attach_buffer(surface, buffer, source),
            ScreenEvent::BufferDamage { surface, damage } => {
                self.damage_buffer(surface, damage)
                    .context("error processing buffer damage")?;
            }
            ScreenEvent::BufferDestroyed { buffer } => {
                if !self.destroy_buffer(buffer) {
                    debug!("destroyed unknown buffer {buffer:?}");
                }
            }
            ScreenEvent::RestackRequest(order) => {
                self.restack(&order).context("error restacking")?;
            }
            ScreenEvent::StartupSequenceAdded(sequence) => self.add_startup_sequence(sequence),
            ScreenEvent::StartupSequenceRemoved { id } => {
                self.remove_startup_sequence(&id);
            }
        }

        Ok(())
    }

    fn on_configure(&mut self, id: &WindowId<D>) -> Result<(), Error> {
        let window = self.window(id).ok_or(Error::UnknownWindow)?;
        let minimized = window.is_minimized();

        if self.stack.set_minimized(id, minimized) {
            trace!("window {id:?} minimized: {minimized}");
        }

        if self.state == ScreenState::Active {
            self.queue_workarea_recalc();
            self.queue_check_fullscreen();
        }
        Ok(())
    }
}
