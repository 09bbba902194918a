use tokio::sync::mpsc::UnboundedSender;

use crate::pen::PenMessage;
use crate::websocket::message::Envelope;

/// Outbound side of a pen: delivers a message to every peer sharing the
/// pen's object id.
pub trait MessageChannel {
    fn send(&mut self, message: PenMessage);
}

/// Collects messages in memory
impl MessageChannel for Vec<PenMessage> {
    fn send(&mut self, message: PenMessage) {
        self.push(message);
    }
}

/// Channel bound to one networked object.
///
/// Messages are wrapped in an [`Envelope`] and queued as JSON text for the
/// host's transport task.
#[derive(Debug, Clone)]
pub struct NetworkContext {
    object_id: String,
    sender: UnboundedSender<String>,
}

impl NetworkContext {
    pub fn new(object_id: impl Into<String>, sender: UnboundedSender<String>) -> Self {
        Self {
            object_id: object_id.into(),
            sender,
        }
    }

    pub fn object_id(&self) -> &str {
        &self.object_id
    }
}

impl MessageChannel for NetworkContext {
    fn send(&mut self, message: PenMessage) {
        let text = match Envelope::wrap(&self.object_id, &message).and_then(|e| e.to_json()) {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!("Failed to encode {} message: {}", message.message_type(), e);
                return;
            }
        };

        if self.sender.send(text).is_err() {
            tracing::debug!("Transport closed, dropping message for {}", self.object_id);
        }
    }
}
