pub mod cache;
pub mod color;
pub mod mask;
pub mod sampler;

pub use cache::MaskCache;
pub use color::PaintColor;
pub use mask::{decode_mask, Mask, PixelPosition};
pub use sampler::{pixel_center, PaintSampler, PenTip, RaycastHit, Raycaster};
