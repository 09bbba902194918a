use std::collections::HashMap;

use crate::painting::Mask;
use crate::scene::{Surface, SurfaceId};

/// Per-surface paint masks, created on first touch.
///
/// A surface without an original mask is cached as absent, so painting on it
/// stays a no-op for the rest of its lifetime.
#[derive(Debug, Default)]
pub struct MaskCache {
    masks: HashMap<SurfaceId, Option<Mask>>,
}

impl MaskCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the surface's mask, cloning it from the original on first use
    /// and marking the surface as showing the painted copy.
    pub fn get_or_create(&mut self, surface: &mut Surface) -> Option<&mut Mask> {
        let id = surface.id();
        self.masks
            .entry(id)
            .or_insert_with(|| {
                let mask = surface.original_mask().map(Mask::from_original);
                match &mask {
                    Some(m) => {
                        tracing::debug!(
                            "Created {}x{} mask for surface {}",
                            m.width(),
                            m.height(),
                            surface.path()
                        );
                        surface.set_substituted(true);
                    }
                    None => {
                        tracing::debug!("Surface {} has no original mask", surface.path());
                    }
                }
                mask
            })
            .as_mut()
    }

    pub fn get(&self, id: SurfaceId) -> Option<&Mask> {
        self.masks.get(&id).and_then(Option::as_ref)
    }

    /// Whether the surface has been touched, including surfaces cached as absent
    pub fn contains(&self, id: SurfaceId) -> bool {
        self.masks.contains_key(&id)
    }

    /// Drop the surface's mask when the surface goes away
    pub fn evict(&mut self, id: SurfaceId) -> Option<Mask> {
        self.masks.remove(&id).flatten()
    }

    pub fn len(&self) -> usize {
        self.masks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.masks.is_empty()
    }
}
