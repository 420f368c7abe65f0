use smithay::utils::{Buffer as BufferCoords, Rectangle};

use super::{BufferId, Error, Screen, ScreenData, SourceOf, SurfaceId, TextureOf};
use crate::buffer::Buffer;

impl<D: ScreenData> Screen<D> {
    /// Attaches a buffer to a surface.
    ///
    /// A buffer seen for the first time gets a new content cell. Re-attaching a known buffer with
    /// a new source invalidates its texture.
    pub fn attach_buffer(&mut self, surface: SurfaceId, buffer: BufferId, source: SourceOf<D>) {
        let _span = tracy_client::span!("Screen::attach_buffer");

        match self.buffers.get_mut(&buffer) {
            Some(cell) => cell.replace_source(source),
            None => {
                trace!("new buffer {buffer:?}");
                self.buffers.insert(buffer, Buffer::new(source));
            }
        }

        if let Some(previous) = self.surfaces.insert(surface, buffer) {
            if previous != buffer {
                trace!("surface {surface:?} switched from {previous:?} to {buffer:?}");
            }
        }
    }

    fn attached_buffer(&self, surface: SurfaceId) -> Result<BufferId, Error> {
        self.surfaces
            .get(&surface)
            .copied()
            .ok_or(Error::UnknownSurface(surface))
    }

    /// Accumulates damage on the buffer attached to a surface.
    pub fn damage_buffer(
        &mut self,
        surface: SurfaceId,
        damage: impl IntoIterator<Item = Rectangle<i32, BufferCoords>>,
    ) -> Result<(), Error> {
        let id = self.attached_buffer(surface)?;
        let buffer = self.buffers.get_mut(&id).ok_or(Error::NoBuffer(id))?;
        buffer.process_damage(damage);
        Ok(())
    }

    /// Releases the buffer. Surfaces it was attached to report [`Error::NoBuffer`] afterwards.
    pub fn destroy_buffer(&mut self, buffer: BufferId) -> bool {
        match self.buffers.remove(&buffer) {
            Some(cell) => {
                cell.destroy();
                true
            }
            None => false,
        }
    }

    /// Forgets a destroyed surface.
    pub fn surface_destroyed(&mut self, surface: SurfaceId) {
        self.surfaces.remove(&surface);
    }

    /// Texture with the up-to-date content of the buffer attached to a surface.
    pub fn ensure_texture(
        &mut self,
        surface: SurfaceId,
        importer: &mut D::Importer,
    ) -> Result<&TextureOf<D>, Error> {
        let id = self.attached_buffer(surface)?;
        let buffer = self.buffers.get_mut(&id).ok_or(Error::NoBuffer(id))?;
        Ok(buffer.ensure_texture(importer)?)
    }

    pub fn buffer(&self, buffer: BufferId) -> Option<&Buffer<D::Importer>> {
        self.buffers.get(&buffer)
    }
}
