use image::Rgba;

/// RGBA color with float channels in 0..1, as carried on the wire
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PaintColor {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl PaintColor {
    /// Color written by the eraser: transparent white
    pub const CLEAR: PaintColor = PaintColor::new(1.0, 1.0, 1.0, 0.0);

    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub const fn opaque(r: f32, g: f32, b: f32) -> Self {
        Self::new(r, g, b, 1.0)
    }

    pub fn is_finite(&self) -> bool {
        self.r.is_finite() && self.g.is_finite() && self.b.is_finite() && self.a.is_finite()
    }

    /// Quantize to an 8-bit pixel
    pub fn to_rgba8(&self) -> Rgba<u8> {
        Rgba([
            channel_to_u8(self.r),
            channel_to_u8(self.g),
            channel_to_u8(self.b),
            channel_to_u8(self.a),
        ])
    }
}

fn channel_to_u8(value: f32) -> u8 {
    if value.is_nan() {
        return 0;
    }
    (value.clamp(0.0, 1.0) * 255.0).round() as u8
}
