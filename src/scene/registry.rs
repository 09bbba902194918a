use image::RgbaImage;
use std::collections::HashMap;
use std::fmt;

use crate::error::{PenboardError, Result};

/// Stable handle assigned when a surface is registered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SurfaceId(u64);

impl fmt::Display for SurfaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "surface#{}", self.0)
    }
}

/// What the host knows about a surface when it spawns
#[derive(Debug, Clone)]
pub struct SurfaceDesc {
    pub material_name: String,
    pub original_mask: Option<RgbaImage>,
}

impl SurfaceDesc {
    pub fn new(material_name: impl Into<String>, original_mask: Option<RgbaImage>) -> Self {
        Self {
            material_name: material_name.into(),
            original_mask,
        }
    }
}

#[derive(Debug)]
pub struct Surface {
    id: SurfaceId,
    path: String,
    material_name: String,
    original_mask: Option<RgbaImage>,
    substituted: bool,
}

impl Surface {
    pub fn id(&self) -> SurfaceId {
        self.id
    }

    /// '/'-joined hierarchy path the surface was registered under
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn material_name(&self) -> &str {
        &self.material_name
    }

    pub fn original_mask(&self) -> Option<&RgbaImage> {
        self.original_mask.as_ref()
    }

    /// Whether the surface now shows its painted mask instead of the original
    pub fn is_substituted(&self) -> bool {
        self.substituted
    }

    pub(crate) fn set_substituted(&mut self, substituted: bool) {
        self.substituted = substituted;
    }
}

/// Registry of paintable surfaces keyed by hierarchy path.
///
/// Surfaces are published once at spawn. Lookups walk the path one segment
/// at a time and stop at the first segment that is not known.
#[derive(Debug, Default)]
pub struct SurfaceRegistry {
    surfaces: HashMap<SurfaceId, Surface>,
    by_path: HashMap<String, SurfaceId>,
    // Reference count of registered surfaces at or below each path prefix
    nodes: HashMap<String, usize>,
    next_id: u64,
}

impl SurfaceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, path: &str, desc: SurfaceDesc) -> Result<SurfaceId> {
        if path.is_empty() || path.split('/').any(str::is_empty) {
            return Err(PenboardError::InvalidPath(path.to_string()));
        }
        if self.by_path.contains_key(path) {
            return Err(PenboardError::DuplicateSurface(path.to_string()));
        }

        let id = SurfaceId(self.next_id);
        self.next_id += 1;

        for prefix in prefixes(path) {
            *self.nodes.entry(prefix.to_string()).or_insert(0) += 1;
        }
        self.by_path.insert(path.to_string(), id);
        self.surfaces.insert(
            id,
            Surface {
                id,
                path: path.to_string(),
                material_name: desc.material_name,
                original_mask: desc.original_mask,
                substituted: false,
            },
        );

        tracing::debug!("Registered {} at {}", id, path);
        Ok(id)
    }

    pub fn unregister(&mut self, id: SurfaceId) -> Option<Surface> {
        let surface = self.surfaces.remove(&id)?;
        self.by_path.remove(&surface.path);

        for prefix in prefixes(&surface.path) {
            if let Some(count) = self.nodes.get_mut(prefix) {
                *count -= 1;
                if *count == 0 {
                    self.nodes.remove(prefix);
                }
            }
        }

        Some(surface)
    }

    /// Walk `path` segment by segment and return the surface registered there
    pub fn resolve(&self, path: &str) -> Option<SurfaceId> {
        for prefix in prefixes(path) {
            if !self.nodes.contains_key(prefix) {
                tracing::debug!("Path {} not found at segment {}", path, prefix);
                return None;
            }
        }
        self.by_path.get(path).copied()
    }

    pub fn path_of(&self, id: SurfaceId) -> Option<&str> {
        self.surfaces.get(&id).map(Surface::path)
    }

    pub fn surface(&self, id: SurfaceId) -> Option<&Surface> {
        self.surfaces.get(&id)
    }

    pub fn surface_mut(&mut self, id: SurfaceId) -> Option<&mut Surface> {
        self.surfaces.get_mut(&id)
    }

    pub fn len(&self) -> usize {
        self.surfaces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.surfaces.is_empty()
    }
}

/// "a/b/c" -> "a", "a/b", "a/b/c"
fn prefixes(path: &str) -> impl Iterator<Item = &str> {
    path.match_indices('/')
        .map(move |(i, _)| &path[..i])
        .chain(std::iter::once(path))
}
