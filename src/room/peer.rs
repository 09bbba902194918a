use axum::extract::ws::Message;
use tokio::sync::mpsc::UnboundedSender;

#[derive(Debug)]
pub struct Peer {
    pub sender: UnboundedSender<Message>,
    pub buffered_messages: Vec<String>,
}

impl Peer {
    pub fn new(sender: UnboundedSender<Message>) -> Self {
        Self {
            sender,
            buffered_messages: Vec::new(),
        }
    }

    /// Send a message to this peer
    pub fn send(&self, message: Message) -> bool {
        self.sender.send(message).is_ok()
    }

    /// Buffer a relayed envelope for the next flush
    pub fn buffer_message(&mut self, msg: String) {
        self.buffered_messages.push(msg);
    }

    /// Take all buffered messages
    pub fn take_buffered_messages(&mut self) -> Vec<String> {
        std::mem::take(&mut self.buffered_messages)
    }

    /// Check if there are buffered messages
    pub fn has_buffered_messages(&self) -> bool {
        !self.buffered_messages.is_empty()
    }
}
