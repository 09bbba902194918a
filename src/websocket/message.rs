use axum::extract::ws::Message;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::error::Result;
use crate::pen::PenMessage;

/// Frame exchanged over the relay: a pen message addressed to the networked
/// object it belongs to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Envelope {
    pub object_id: String,
    pub message: serde_json::Value,
}

impl Envelope {
    pub fn wrap(object_id: &str, message: &PenMessage) -> Result<Self> {
        Ok(Self {
            object_id: object_id.to_string(),
            message: serde_json::to_value(message)?,
        })
    }

    /// Parse a relay frame. Returns `None` for anything that is not an
    /// envelope with a non-empty object id.
    pub fn parse(text: &str) -> Option<Self> {
        let envelope: Envelope = serde_json::from_str(text).ok()?;
        if envelope.object_id.is_empty() {
            return None;
        }
        Some(envelope)
    }

    /// Value of the `messageType` tag, if the payload has one
    pub fn message_type(&self) -> Option<&str> {
        self.message.get("messageType")?.as_str()
    }

    pub fn into_pen_message(self) -> Result<PenMessage> {
        PenMessage::from_value(self.message)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Frames sent by the relay itself
#[derive(Debug, Clone)]
pub enum ServerMessage {
    /// Connection refused or protocol error
    Error(String),
    /// Number of peers currently connected
    PeerCount(usize),
    /// A peer's envelope, forwarded verbatim
    Relay(String),
}

impl ServerMessage {
    pub fn to_text(&self) -> String {
        match self {
            ServerMessage::Error(msg) => json!({ "error": msg }).to_string(),
            ServerMessage::PeerCount(count) => json!({ "peerCount": count }).to_string(),
            ServerMessage::Relay(text) => text.clone(),
        }
    }

    pub fn to_ws_message(&self) -> Message {
        Message::Text(self.to_text())
    }
}
