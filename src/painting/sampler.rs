use crate::config::PenConfig;
use crate::math::{Pose, Ray, Vec2};
use crate::painting::PixelPosition;
use crate::scene::SurfaceId;

/// A ray hit reported by the physics host
#[derive(Debug, Clone, PartialEq)]
pub struct RaycastHit {
    pub surface: SurfaceId,
    pub material_name: String,
    /// Texture coordinate of the hit point, in 0..1
    pub texture_coord: Vec2,
    pub distance: f32,
}

/// Scene ray casting, provided by the host
pub trait Raycaster {
    fn raycast(&self, ray: &Ray, max_distance: f32) -> Option<RaycastHit>;
}

/// Which end of the pen a sample was taken from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PenTip {
    Nib,
    Eraser,
}

/// Turns pen tip poses into rays and filters hits to paintable surfaces
#[derive(Debug, Clone)]
pub struct PaintSampler {
    target_material: String,
    nib_max_distance: f32,
    eraser_max_distance: f32,
}

impl PaintSampler {
    pub fn new(config: &PenConfig) -> Self {
        Self {
            target_material: config.target_material.clone(),
            nib_max_distance: config.nib_max_distance,
            eraser_max_distance: config.eraser_max_distance,
        }
    }

    pub fn is_paintable(&self, material_name: &str) -> bool {
        material_name.starts_with(&self.target_material)
    }

    /// Ray along the nib's up axis
    pub fn draw_ray(&self, nib: &Pose) -> Ray {
        Ray::new(nib.position, nib.up())
    }

    /// Ray opposite to the eraser's up axis
    pub fn erase_ray(&self, eraser: &Pose) -> Ray {
        Ray::new(eraser.position, -eraser.up())
    }

    pub fn max_distance(&self, tip: PenTip) -> f32 {
        match tip {
            PenTip::Nib => self.nib_max_distance,
            PenTip::Eraser => self.eraser_max_distance,
        }
    }

    /// Cast from one tip and keep the hit only if the surface is paintable
    pub fn sample<R: Raycaster + ?Sized>(
        &self,
        raycaster: &R,
        tip: PenTip,
        pose: &Pose,
    ) -> Option<RaycastHit> {
        let ray = match tip {
            PenTip::Nib => self.draw_ray(pose),
            PenTip::Eraser => self.erase_ray(pose),
        };

        let hit = raycaster.raycast(&ray, self.max_distance(tip))?;
        if self.is_paintable(&hit.material_name) {
            Some(hit)
        } else {
            tracing::trace!("Ignoring hit on material {}", hit.material_name);
            None
        }
    }
}

/// Map a texture coordinate onto a `width` x `height` pixel grid
pub fn pixel_center(uv: Vec2, width: u32, height: u32) -> PixelPosition {
    PixelPosition::new(
        (uv.x * width as f32).floor() as i32,
        (uv.y * height as f32).floor() as i32,
    )
}
