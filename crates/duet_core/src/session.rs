//! The session record and score rows.

use crate::types::{unix_millis, JoinCode, SessionId, UserId};
use duet_rules::{ActivityKind, GameState, Seat};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle status of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    /// Created; waiting for the remaining participants.
    Waiting,
    /// All participants present; moves are accepted.
    Active,
    /// A rule engine reported a terminal outcome.
    Completed,
    /// Ended by explicit external action.
    Abandoned,
}

impl SessionStatus {
    /// Returns true once no further mutation is accepted.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, SessionStatus::Completed | SessionStatus::Abandoned)
    }
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SessionStatus::Waiting => "waiting",
            SessionStatus::Active => "active",
            SessionStatus::Completed => "completed",
            SessionStatus::Abandoned => "abandoned",
        };
        write!(f, "{name}")
    }
}

/// A unit of shared, turn-gated interactive state between participants.
///
/// Participant order is significant: the creator sits at [`Seat::One`],
/// the joiner at [`Seat::Two`]. `version` starts at 0 and increments by
/// exactly 1 on every committed mutation, including joins.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    /// Unique id.
    pub id: SessionId,
    /// Human-shareable join code.
    pub code: JoinCode,
    /// The activity played.
    pub activity: ActivityKind,
    /// Participants in seat order.
    pub participants: Vec<UserId>,
    /// The participant holding the next move, while active and gated.
    pub turn_owner: Option<UserId>,
    /// Lifecycle status.
    pub status: SessionStatus,
    /// Activity state, interpreted only by the matching rule engine.
    pub state: GameState,
    /// Strictly monotonic mutation counter.
    pub version: u64,
    /// Creation time, unix millis.
    pub created_at_ms: u64,
    /// Last committed mutation time, unix millis.
    pub updated_at_ms: u64,
}

impl Session {
    /// Creates a waiting session with its first participant.
    #[must_use]
    pub fn new(
        activity: ActivityKind,
        creator: UserId,
        code: JoinCode,
        state: GameState,
    ) -> Self {
        let now = unix_millis();
        Self {
            id: SessionId::generate(),
            code,
            activity,
            participants: vec![creator],
            turn_owner: None,
            status: SessionStatus::Waiting,
            state,
            version: 0,
            created_at_ms: now,
            updated_at_ms: now,
        }
    }

    /// Returns the seat `user` occupies, if any.
    #[must_use]
    pub fn seat_of(&self, user: UserId) -> Option<Seat> {
        match self.participants.iter().position(|&p| p == user) {
            Some(0) => Some(Seat::One),
            Some(1) => Some(Seat::Two),
            _ => None,
        }
    }

    /// Returns the participant at `seat`, if present.
    #[must_use]
    pub fn user_at(&self, seat: Seat) -> Option<UserId> {
        self.participants.get(seat.index()).copied()
    }

    /// Returns true when `user` is a current participant.
    #[must_use]
    pub fn is_participant(&self, user: UserId) -> bool {
        self.participants.contains(&user)
    }

    /// Bumps the version and update timestamp for a commit.
    pub(crate) fn touch(&mut self) {
        self.version += 1;
        self.updated_at_ms = unix_millis();
    }
}

/// A per-participant result row, written once when a session completes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Score {
    /// The completed session.
    pub session_id: SessionId,
    /// The participant this row belongs to.
    pub user_id: UserId,
    /// Numeric score (win 1.0, loss 0.0, draw 0.5, co-op win 1.0).
    pub score: f64,
    /// Arbitrary result metadata.
    pub detail: serde_json::Value,
    /// Recording time, unix millis.
    pub recorded_at_ms: u64,
}
