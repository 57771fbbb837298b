//! The append-only per-room message log.

use crate::error::{RelayError, RelayResult};
use duet_core::{unix_millis, RoomId, UserId};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

/// One immutable relay message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalMessage {
    /// The room this message belongs to.
    pub room_id: RoomId,
    /// Strictly increasing per-room id, starting at 1.
    pub id: u64,
    /// The sender.
    pub sender_id: UserId,
    /// Application-level type tag (e.g. `offer`, `answer`, `ice`).
    pub kind: String,
    /// Opaque payload; the relay never interprets it.
    pub payload: serde_json::Value,
    /// Append time, unix millis.
    pub sent_at_ms: u64,
}

/// Per-room log. Ids equal index + 1, so gaplessness is structural.
#[derive(Default)]
struct RoomLog {
    messages: Vec<SignalMessage>,
}

/// The signal relay.
///
/// Appends assign the next sequence number for the room atomically with
/// the insert; existing rows are never updated or deleted. Readers poll
/// with [`SignalRelay::fetch_since`] and retain the highest id they have
/// seen as their watermark.
pub struct SignalRelay {
    rooms: RwLock<HashMap<RoomId, RoomLog>>,
}

impl SignalRelay {
    /// Creates an empty relay.
    #[must_use]
    pub fn new() -> Self {
        Self {
            rooms: RwLock::new(HashMap::new()),
        }
    }

    /// Appends a message, creating the room on first use.
    ///
    /// Returns the assigned message id.
    pub fn append(
        &self,
        room_id: RoomId,
        sender_id: UserId,
        kind: impl Into<String>,
        payload: serde_json::Value,
    ) -> u64 {
        let mut rooms = self.rooms.write();
        let log = rooms.entry(room_id).or_default();
        let id = log.messages.len() as u64 + 1;
        log.messages.push(SignalMessage {
            room_id,
            id,
            sender_id,
            kind: kind.into(),
            payload,
            sent_at_ms: unix_millis(),
        });
        debug!(room = %room_id, id, "relay append");
        id
    }

    /// Returns up to `limit` messages with id strictly greater than
    /// `since`, in ascending id order.
    pub fn fetch_since(
        &self,
        room_id: RoomId,
        since: u64,
        limit: usize,
    ) -> RelayResult<Vec<SignalMessage>> {
        let rooms = self.rooms.read();
        let log = rooms
            .get(&room_id)
            .ok_or(RelayError::RoomNotFound(room_id))?;

        let skip = (since as usize).min(log.messages.len());
        Ok(log.messages[skip..].iter().take(limit).cloned().collect())
    }

    /// The highest message id in a room (the current watermark).
    pub fn latest_id(&self, room_id: RoomId) -> RelayResult<u64> {
        let rooms = self.rooms.read();
        let log = rooms
            .get(&room_id)
            .ok_or(RelayError::RoomNotFound(room_id))?;
        Ok(log.messages.len() as u64)
    }

    /// Number of rooms that have seen at least one append.
    #[must_use]
    pub fn room_count(&self) -> usize {
        self.rooms.read().len()
    }
}

impl Default for SignalRelay {
    fn default() -> Self {
        Self::new()
    }
}
