use serde::{Deserialize, Serialize};

use crate::error::{PenboardError, Result};
use crate::math::{Pose, Quat, Vec3};
use crate::painting::{PaintColor, PixelPosition};

/// Messages exchanged between copies of the same pen.
///
/// Serialized as JSON objects tagged by `messageType`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "messageType", rename_all = "lowercase")]
pub enum PenMessage {
    Transform(TransformMessage),
    Draw(DrawMessage),
    Brush(BrushMessage),
    Ownership(OwnershipMessage),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransformMessage {
    pub position: Vec3,
    pub rotation: Quat,
    pub is_drawing: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DrawMessage {
    pub renderer_path: String,
    pub pixel_position: PixelPosition,
    pub red: f32,
    pub green: f32,
    pub blue: f32,
    pub alpha: f32,
    pub size: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrushMessage {
    pub red: f32,
    pub green: f32,
    pub blue: f32,
    pub size: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OwnershipMessage {
    pub owner_id: String,
    pub take_ownership: bool,
}

/// One circular paint stamp, applied the same way locally and remotely
#[derive(Debug, Clone, PartialEq)]
pub struct StampEvent {
    pub surface_path: String,
    pub center: PixelPosition,
    pub color: PaintColor,
    pub size: f32,
}

impl From<StampEvent> for DrawMessage {
    fn from(event: StampEvent) -> Self {
        Self {
            renderer_path: event.surface_path,
            pixel_position: event.center,
            red: event.color.r,
            green: event.color.g,
            blue: event.color.b,
            alpha: event.color.a,
            size: event.size,
        }
    }
}

impl From<DrawMessage> for StampEvent {
    fn from(msg: DrawMessage) -> Self {
        Self {
            surface_path: msg.renderer_path,
            center: msg.pixel_position,
            color: PaintColor::new(msg.red, msg.green, msg.blue, msg.alpha),
            size: msg.size,
        }
    }
}

impl TransformMessage {
    pub fn new(pose: &Pose, is_drawing: bool) -> Self {
        Self {
            position: pose.position,
            rotation: pose.rotation,
            is_drawing,
        }
    }

    pub fn pose(&self) -> Pose {
        Pose::new(self.position, self.rotation)
    }
}

impl PenMessage {
    /// Parse a JSON payload. Unknown tags, missing fields and non-finite
    /// numbers are all rejected.
    pub fn parse(s: &str) -> Result<Self> {
        let msg: PenMessage =
            serde_json::from_str(s).map_err(|e| PenboardError::ParseError(e.to_string()))?;
        msg.validate()?;
        Ok(msg)
    }

    pub fn from_value(value: serde_json::Value) -> Result<Self> {
        let msg: PenMessage =
            serde_json::from_value(value).map_err(|e| PenboardError::ParseError(e.to_string()))?;
        msg.validate()?;
        Ok(msg)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn message_type(&self) -> &'static str {
        match self {
            PenMessage::Transform(_) => "transform",
            PenMessage::Draw(_) => "draw",
            PenMessage::Brush(_) => "brush",
            PenMessage::Ownership(_) => "ownership",
        }
    }

    fn validate(&self) -> Result<()> {
        let finite = match self {
            PenMessage::Transform(m) => m.position.is_finite() && m.rotation.is_finite(),
            PenMessage::Draw(m) => {
                PaintColor::new(m.red, m.green, m.blue, m.alpha).is_finite() && m.size.is_finite()
            }
            PenMessage::Brush(m) => {
                PaintColor::opaque(m.red, m.green, m.blue).is_finite() && m.size.is_finite()
            }
            PenMessage::Ownership(_) => true,
        };

        if finite {
            Ok(())
        } else {
            Err(PenboardError::ParseError(format!(
                "non-finite value in {} message",
                self.message_type()
            )))
        }
    }
}

impl From<TransformMessage> for PenMessage {
    fn from(msg: TransformMessage) -> Self {
        PenMessage::Transform(msg)
    }
}

impl From<DrawMessage> for PenMessage {
    fn from(msg: DrawMessage) -> Self {
        PenMessage::Draw(msg)
    }
}

impl From<BrushMessage> for PenMessage {
    fn from(msg: BrushMessage) -> Self {
        PenMessage::Brush(msg)
    }
}

impl From<OwnershipMessage> for PenMessage {
    fn from(msg: OwnershipMessage) -> Self {
        PenMessage::Ownership(msg)
    }
}
