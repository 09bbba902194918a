pub mod path;
pub mod registry;

pub use path::AvatarPathTranslator;
pub use registry::{Surface, SurfaceDesc, SurfaceId, SurfaceRegistry};

use image::RgbaImage;
use std::cell::RefCell;
use std::rc::Rc;

use crate::error::Result;
use crate::painting::{Mask, MaskCache, PaintColor, PixelPosition};
use crate::pen::StampEvent;

/// Scene shared by every pen of one participant
pub type SharedScene = Rc<RefCell<PaintScene>>;

/// Local view of the paintable scene: registered surfaces, their masks and
/// the avatar naming used to resolve paths from other participants.
#[derive(Debug)]
pub struct PaintScene {
    registry: SurfaceRegistry,
    masks: MaskCache,
    translator: AvatarPathTranslator,
}

impl PaintScene {
    pub fn new(translator: AvatarPathTranslator) -> Self {
        Self {
            registry: SurfaceRegistry::new(),
            masks: MaskCache::new(),
            translator,
        }
    }

    pub fn into_shared(self) -> SharedScene {
        Rc::new(RefCell::new(self))
    }

    pub fn spawn_surface(&mut self, path: &str, desc: SurfaceDesc) -> Result<SurfaceId> {
        self.registry.register(path, desc)
    }

    /// Remove a surface and release its mask
    pub fn despawn_surface(&mut self, id: SurfaceId) -> Option<Surface> {
        if self.masks.evict(id).is_some() {
            tracing::debug!("Released mask of {}", id);
        }
        self.registry.unregister(id)
    }

    /// Resolve a path captured by any participant to a local surface
    pub fn resolve(&self, path: &str) -> Option<SurfaceId> {
        let translated = self.translator.translate(path);
        self.registry.resolve(&translated)
    }

    pub fn mask_mut(&mut self, id: SurfaceId) -> Option<&mut Mask> {
        let surface = self.registry.surface_mut(id)?;
        self.masks.get_or_create(surface)
    }

    pub fn mask(&self, id: SurfaceId) -> Option<&Mask> {
        self.masks.get(id)
    }

    /// Stamp a surface's mask. Returns the number of pixels written, or
    /// `None` when the surface is unknown or has no mask.
    pub fn stamp(
        &mut self,
        id: SurfaceId,
        center: PixelPosition,
        color: PaintColor,
        size: f32,
    ) -> Option<usize> {
        let mask = self.mask_mut(id)?;
        Some(mask.stamp(center, color, size))
    }

    /// Apply a stamp received from another participant
    pub fn apply_stamp(&mut self, event: &StampEvent) -> Option<usize> {
        let Some(id) = self.resolve(&event.surface_path) else {
            tracing::debug!("Dropping stamp for unknown surface {}", event.surface_path);
            return None;
        };
        self.stamp(id, event.center, event.color, event.size)
    }

    /// Texture currently shown on the surface
    pub fn visible_texture(&self, id: SurfaceId) -> Option<&RgbaImage> {
        let surface = self.registry.surface(id)?;
        if surface.is_substituted() {
            self.masks.get(id).map(Mask::texture)
        } else {
            surface.original_mask()
        }
    }

    pub fn registry(&self) -> &SurfaceRegistry {
        &self.registry
    }

    pub fn masks(&self) -> &MaskCache {
        &self.masks
    }

    pub fn translator(&self) -> &AvatarPathTranslator {
        &self.translator
    }

    pub fn translator_mut(&mut self) -> &mut AvatarPathTranslator {
        &mut self.translator
    }
}
