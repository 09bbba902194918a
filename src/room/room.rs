use axum::extract::ws::Message;
use std::collections::{HashMap, VecDeque};
use uuid::Uuid;

use crate::room::Peer;
use crate::websocket::message::{Envelope, ServerMessage};

/// Envelopes that only describe the current pose are not worth replaying
const UNREPLAYED_MESSAGE_TYPE: &str = "transform";

pub struct Room {
    peers: HashMap<Uuid, Peer>,
    max_peers: usize,
    replay: VecDeque<String>,
    replay_limit: usize,
    relayed_total: u64,
    closed: bool,
}

impl Room {
    pub fn new(max_peers: usize, replay_limit: usize) -> Self {
        Self {
            peers: HashMap::new(),
            max_peers,
            replay: VecDeque::new(),
            replay_limit,
            relayed_total: 0,
            closed: false,
        }
    }

    /// Add a peer to the room
    pub fn add_peer(&mut self, id: Uuid, peer: Peer) -> bool {
        if self.closed || self.is_full() {
            return false;
        }
        self.peers.insert(id, peer);
        true
    }

    /// Remove a peer from the room
    pub fn remove_peer(&mut self, id: &Uuid) -> Option<Peer> {
        self.peers.remove(id)
    }

    pub fn peer_count(&self) -> usize {
        self.peers.len()
    }

    pub fn is_full(&self) -> bool {
        self.peers.len() >= self.max_peers
    }

    /// Envelopes a newly joined peer needs to catch up, oldest first
    pub fn replay_log(&self) -> Vec<String> {
        self.replay.iter().cloned().collect()
    }

    pub fn relayed_total(&self) -> u64 {
        self.relayed_total
    }

    /// Forward an envelope from `from` to every other peer.
    ///
    /// Returns false if the text is not a valid envelope, in which case
    /// nothing is forwarded.
    pub fn relay(&mut self, from: Uuid, text: &str) -> bool {
        if self.closed {
            return false;
        }

        let Some(envelope) = Envelope::parse(text) else {
            return false;
        };

        self.relayed_total += 1;

        for (id, peer) in self.peers.iter_mut() {
            if *id != from {
                peer.buffer_message(text.to_string());
            }
        }

        if self.replay_limit > 0 && envelope.message_type() != Some(UNREPLAYED_MESSAGE_TYPE) {
            if self.replay.len() >= self.replay_limit {
                self.replay.pop_front();
            }
            self.replay.push_back(text.to_string());
        }

        true
    }

    /// Send a relay-generated message to all peers right away
    pub fn broadcast_message(&self, message: &ServerMessage) {
        for peer in self.peers.values() {
            let _ = peer.send(message.to_ws_message());
        }
    }

    /// Flush buffered envelopes, one text frame each
    pub fn flush_buffered_messages(&mut self) {
        for peer in self.peers.values_mut() {
            if peer.has_buffered_messages() {
                for text in peer.take_buffered_messages() {
                    if !peer.send(Message::Text(text)) {
                        break;
                    }
                }
            }
        }
    }

    /// Shutdown the room
    pub fn shutdown(&mut self) {
        self.closed = true;
        self.peers.clear();
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }
}
