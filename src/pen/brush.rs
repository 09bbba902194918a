use crate::config::PenConfig;
use crate::painting::PaintColor;
use crate::pen::message::BrushMessage;

/// Brush color and diameter of one pen
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BrushState {
    size: f32,
    red: f32,
    green: f32,
    blue: f32,
}

impl BrushState {
    pub fn new(size: f32, red: f32, green: f32, blue: f32) -> Self {
        Self {
            size,
            red: red.clamp(0.0, 1.0),
            green: green.clamp(0.0, 1.0),
            blue: blue.clamp(0.0, 1.0),
        }
    }

    pub fn from_config(config: &PenConfig) -> Self {
        let [r, g, b] = config.brush_color;
        Self::new(config.brush_size, r, g, b)
    }

    pub fn size(&self) -> f32 {
        self.size
    }

    /// Brush color; always opaque
    pub fn color(&self) -> PaintColor {
        PaintColor::opaque(self.red, self.green, self.blue)
    }

    pub fn set_size(&mut self, size: f32) {
        self.size = size;
    }

    pub fn set_red(&mut self, red: f32) {
        self.red = red.clamp(0.0, 1.0);
    }

    pub fn set_green(&mut self, green: f32) {
        self.green = green.clamp(0.0, 1.0);
    }

    pub fn set_blue(&mut self, blue: f32) {
        self.blue = blue.clamp(0.0, 1.0);
    }

    /// Tint of the pen body. Pens owned by someone else are drawn dimmer and
    /// translucent.
    pub fn body_tint(&self, owned: bool) -> PaintColor {
        if owned {
            PaintColor::new(self.red, self.green, self.blue, 1.0)
        } else {
            PaintColor::new(self.red * 0.7, self.green * 0.7, self.blue * 0.7, 0.7)
        }
    }

    pub fn to_message(&self) -> BrushMessage {
        BrushMessage {
            red: self.red,
            green: self.green,
            blue: self.blue,
            size: self.size,
        }
    }

    /// Take over a peer's brush exactly as sent
    pub fn overwrite(&mut self, msg: &BrushMessage) {
        self.red = msg.red;
        self.green = msg.green;
        self.blue = msg.blue;
        self.size = msg.size;
    }
}

impl Default for BrushState {
    fn default() -> Self {
        Self::from_config(&PenConfig::default())
    }
}
