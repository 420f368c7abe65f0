//! Pixel content of client surfaces.
//!
//! A [`Buffer`] holds a client-submitted pixel source together with a lazily imported texture
//! and the damage accumulated since the texture was last brought up to date. The texture is only
//! touched from the compositing path through [`Buffer::ensure_texture()`].

use std::error::Error;

use smithay::utils::{Buffer as BufferCoords, Rectangle, Size};

use crate::utils::geometry;
use crate::utils::Region;

#[cfg(test)]
pub(crate) mod tests;

/// Client-submitted pixel content.
pub trait PixelSource {
    /// Size of the content in buffer pixels.
    fn size(&self) -> Size<i32, BufferCoords>;

    /// Whether the content lives in shared memory and must be copied into the texture.
    ///
    /// Other sources are referenced by the texture directly and need no upload on damage.
    fn is_shm(&self) -> bool;
}

/// Path from pixel sources to GPU textures.
pub trait TextureImporter {
    type Source: PixelSource;
    type Texture: Clone;
    type Error: Error + Send + Sync + 'static;

    /// Creates a texture with the full content of the source.
    fn import_buffer(&mut self, source: &Self::Source) -> Result<Self::Texture, Self::Error>;

    /// Copies the given regions of the source into an existing texture.
    fn update_texture(
        &mut self,
        texture: &Self::Texture,
        source: &Self::Source,
        damage: &[Rectangle<i32, BufferCoords>],
    ) -> Result<(), Self::Error>;
}

#[derive(Debug, thiserror::Error)]
pub enum BufferError {
    #[error("error importing buffer")]
    Import(#[source] Box<dyn Error + Send + Sync>),
    #[error("error updating texture")]
    Update(#[source] Box<dyn Error + Send + Sync>),
}

pub struct Buffer<I: TextureImporter> {
    source: I::Source,
    texture: Option<I::Texture>,
    damage: Region,
}

impl<I: TextureImporter> Buffer<I> {
    pub fn new(source: I::Source) -> Self {
        Self {
            source,
            texture: None,
            damage: Region::new(),
        }
    }

    pub fn source(&self) -> &I::Source {
        &self.source
    }

    pub fn size(&self) -> Size<i32, BufferCoords> {
        self.source.size()
    }

    pub fn bounds(&self) -> Rectangle<i32, BufferCoords> {
        let size = self.size();
        geometry::rect(0, 0, size.w, size.h)
    }

    /// Cached texture, if realized and not yet invalidated.
    pub fn texture(&self) -> Option<&I::Texture> {
        self.texture.as_ref()
    }

    pub fn pending_damage(&self) -> &Region {
        &self.damage
    }

    /// Replaces the pixel source, invalidating the cached texture.
    pub fn replace_source(&mut self, source: I::Source) {
        self.source = source;
        self.texture = None;
        self.damage.clear();
    }

    /// Accumulates damage in buffer coordinates, clipped to the buffer.
    pub fn process_damage(
        &mut self,
        damage: impl IntoIterator<Item = Rectangle<i32, BufferCoords>>,
    ) {
        let bounds = self.bounds();
        self.damage.extend(
            damage
                .into_iter()
                .filter_map(|rect| geometry::intersection(rect, bounds)),
        );
    }

    /// Returns a texture reflecting the current content of the source.
    ///
    /// Imports the source on first use or after invalidation; otherwise applies pending damage to
    /// the cached texture. Does nothing when the texture is up to date.
    pub fn ensure_texture(&mut self, importer: &mut I) -> Result<&I::Texture, BufferError> {
        let _span = tracy_client::span!("Buffer::ensure_texture");

        if let Some(texture) = &self.texture {
            if !self.damage.is_empty() {
                if self.source.is_shm() {
                    let damage = self.damage.rects();
                    trace!("updating {} damaged rects", damage.len());

                    if let Err(err) = importer.update_texture(texture, &self.source, damage) {
                        // Next call imports the whole buffer again.
                        self.texture = None;
                        return Err(BufferError::Update(Box::new(err)));
                    }
                }
                self.damage.clear();
            }
        }

        let texture = match self.texture.take() {
            Some(texture) => texture,
            None => {
                trace!("importing buffer of size {:?}", self.size());
                let texture = importer
                    .import_buffer(&self.source)
                    .map_err(|err| BufferError::Import(Box::new(err)))?;
                self.damage.clear();
                texture
            }
        };

        Ok(self.texture.insert(texture))
    }

    /// Releases the texture and the source.
    pub fn destroy(self) {
        let _span = tracy_client::span!("Buffer::destroy");
        trace!(
            "destroying buffer of size {:?}, realized: {}",
            self.size(),
            self.texture.is_some()
        );
    }
}
