//! Watch-party presence: heartbeat upserts, reader-computed staleness.

use duet_core::{unix_millis, RoomId, UserId};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A participant's media flags, carried on every heartbeat.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PresenceFlags {
    /// Microphone enabled.
    pub audio: bool,
    /// Camera enabled.
    pub video: bool,
    /// Screen share active.
    pub screen_share: bool,
}

/// A participant's self-reported status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PresenceStatus {
    /// Actively watching.
    Watching,
    /// Present but inactive.
    Away,
    /// Left the room deliberately.
    Left,
}

/// One participant's presence row, upserted on heartbeat.
///
/// Rows are never locked against; the session write path does not touch
/// them and heartbeats from the same user simply overwrite.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomPresence {
    /// The room.
    pub room_id: RoomId,
    /// The participant.
    pub user_id: UserId,
    /// Media flags.
    pub flags: PresenceFlags,
    /// Self-reported status.
    pub status: PresenceStatus,
    /// Last heartbeat time, unix millis.
    pub last_seen_ms: u64,
}

impl RoomPresence {
    /// Whether this participant is probably disconnected.
    ///
    /// Staleness is a property computed by readers; no background reaper
    /// exists. `ttl_ms` is the embedder's threshold.
    #[must_use]
    pub fn is_stale(&self, now_ms: u64, ttl_ms: u64) -> bool {
        now_ms.saturating_sub(self.last_seen_ms) > ttl_ms
    }
}

/// The presence roster for all rooms.
pub struct PresenceRoster {
    entries: RwLock<HashMap<(RoomId, UserId), RoomPresence>>,
}

impl PresenceRoster {
    /// Creates an empty roster.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Upserts a participant's presence and refreshes `last_seen_ms`.
    pub fn heartbeat(
        &self,
        room_id: RoomId,
        user_id: UserId,
        flags: PresenceFlags,
        status: PresenceStatus,
    ) -> RoomPresence {
        let presence = RoomPresence {
            room_id,
            user_id,
            flags,
            status,
            last_seen_ms: unix_millis(),
        };
        self.entries
            .write()
            .insert((room_id, user_id), presence.clone());
        presence
    }

    /// Returns every presence row for a room.
    ///
    /// Rooms with no heartbeats yield an empty roster; unlike the message
    /// log, presence has no notion of a missing room.
    #[must_use]
    pub fn participants(&self, room_id: RoomId) -> Vec<RoomPresence> {
        let mut rows: Vec<RoomPresence> = self
            .entries
            .read()
            .values()
            .filter(|p| p.room_id == room_id)
            .cloned()
            .collect();
        rows.sort_by_key(|p| p.user_id.as_uuid());
        rows
    }
}

impl Default for PresenceRoster {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn heartbeat_upserts_single_row_per_user() {
        let roster = PresenceRoster::new();
        let room = RoomId::generate();
        let user = UserId::generate();

        roster.heartbeat(room, user, PresenceFlags::default(), PresenceStatus::Watching);
        let updated = roster.heartbeat(
            room,
            user,
            PresenceFlags {
                audio: true,
                ..PresenceFlags::default()
            },
            PresenceStatus::Away,
        );

        let rows = roster.participants(room);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0], updated);
        assert!(rows[0].flags.audio);
        assert_eq!(rows[0].status, PresenceStatus::Away);
    }

    #[test]
    fn rooms_are_isolated() {
        let roster = PresenceRoster::new();
        let room_a = RoomId::generate();
        let room_b = RoomId::generate();
        let user = UserId::generate();

        roster.heartbeat(room_a, user, PresenceFlags::default(), PresenceStatus::Watching);
        assert_eq!(roster.participants(room_a).len(), 1);
        assert!(roster.participants(room_b).is_empty());
    }

    #[test]
    fn staleness_is_reader_computed() {
        let presence = RoomPresence {
            room_id: RoomId::generate(),
            user_id: UserId::generate(),
            flags: PresenceFlags::default(),
            status: PresenceStatus::Watching,
            last_seen_ms: 10_000,
        };

        assert!(!presence.is_stale(10_500, 1_000));
        assert!(!presence.is_stale(11_000, 1_000));
        assert!(presence.is_stale(11_001, 1_000));
        // Clock skew backwards never reports stale.
        assert!(!presence.is_stale(9_000, 1_000));
    }
}
