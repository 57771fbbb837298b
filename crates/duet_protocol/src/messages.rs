//! Endpoint request/response bodies.

use duet_core::{Session, SessionId, SessionStatus, UserId};
use duet_relay::{PresenceFlags, PresenceStatus, RoomPresence, SignalMessage};
use duet_rules::{ActivityKind, GameState, Move, Terminal};
use serde::{Deserialize, Serialize};

/// `POST /sessions` request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateSessionRequest {
    /// The activity to play.
    pub activity: ActivityKind,
}

/// `POST /sessions` response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionCreated {
    /// The new session's id.
    pub session_id: SessionId,
    /// Human-shareable join code.
    pub code: String,
    /// Initial activity state.
    pub state: GameState,
    /// Always `waiting` on creation.
    pub status: SessionStatus,
}

impl SessionCreated {
    /// Builds the body from a freshly created session.
    #[must_use]
    pub fn of(session: &Session) -> Self {
        Self {
            session_id: session.id,
            code: session.code.as_str().to_owned(),
            state: session.state.clone(),
            status: session.status,
        }
    }
}

/// `POST /sessions/{code}/join` response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionJoined {
    /// The joined session's id.
    pub session_id: SessionId,
    /// Participants in seat order.
    pub participants: Vec<UserId>,
    /// Status after the join.
    pub status: SessionStatus,
    /// Turn owner once active and gated.
    pub turn_owner_id: Option<UserId>,
}

impl SessionJoined {
    /// Builds the body from the post-join snapshot.
    #[must_use]
    pub fn of(session: &Session) -> Self {
        Self {
            session_id: session.id,
            participants: session.participants.clone(),
            status: session.status,
            turn_owner_id: session.turn_owner,
        }
    }
}

/// `GET /sessions/{id}` response; polled by clients on a fixed interval.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    /// The session's id.
    pub session_id: SessionId,
    /// Lifecycle status.
    pub status: SessionStatus,
    /// Current activity state.
    pub state: GameState,
    /// Committed version; echoed back on the next move.
    pub version: u64,
    /// Turn owner, when active and gated.
    pub turn_owner_id: Option<UserId>,
}

impl SessionSnapshot {
    /// Builds the body from a committed snapshot.
    #[must_use]
    pub fn of(session: &Session) -> Self {
        Self {
            session_id: session.id,
            status: session.status,
            state: session.state.clone(),
            version: session.version,
            turn_owner_id: session.turn_owner,
        }
    }
}

/// `POST /sessions/{id}/moves` request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmitMoveRequest {
    /// The version the client's snapshot carried.
    pub version: u64,
    /// The move itself, tagged by activity.
    pub payload: Move,
}

/// A terminal outcome with seats resolved to user ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TerminalOutcome {
    /// One participant won outright.
    Win {
        /// The winner's user id.
        winner_id: Option<UserId>,
    },
    /// No winner.
    Draw,
    /// Both participants won together.
    CoopWin,
}

impl TerminalOutcome {
    /// Resolves a rules-level terminal against the session's seats.
    #[must_use]
    pub fn of(terminal: Terminal, session: &Session) -> Self {
        match terminal {
            Terminal::Win { winner } => TerminalOutcome::Win {
                winner_id: session.user_at(winner),
            },
            Terminal::Draw => TerminalOutcome::Draw,
            Terminal::CoopWin => TerminalOutcome::CoopWin,
        }
    }

    /// Convenience: the winning user, for `win` outcomes.
    #[must_use]
    pub fn winner_id(&self) -> Option<UserId> {
        match self {
            TerminalOutcome::Win { winner_id } => *winner_id,
            _ => None,
        }
    }
}

/// `POST /sessions/{id}/moves` success response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoveAccepted {
    /// State after the commit.
    pub state: GameState,
    /// Version after the commit.
    pub version: u64,
    /// Next turn owner, if the session continues gated.
    pub turn_owner_id: Option<UserId>,
    /// Terminal outcome, when the move completed the session.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub terminal: Option<TerminalOutcome>,
}

/// `POST /rooms/{id}/messages` request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppendMessageRequest {
    /// Application-level type tag.
    #[serde(rename = "type")]
    pub kind: String,
    /// Opaque payload.
    pub payload: serde_json::Value,
}

/// `POST /rooms/{id}/messages` response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageAppended {
    /// The id assigned to the appended message.
    pub message_id: u64,
}

/// `GET /rooms/{id}/messages?since={id}` response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageList {
    /// Messages with id > `since`, ascending.
    pub messages: Vec<SignalMessage>,
    /// The room's current high watermark, for pollers that want to skip
    /// ahead without counting.
    pub latest_id: u64,
}

/// `POST /rooms/{id}/presence` heartbeat request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeartbeatRequest {
    /// Media flags.
    #[serde(flatten)]
    pub flags: PresenceFlags,
    /// Self-reported status.
    pub status: PresenceStatus,
}

/// One roster row with reader-computed staleness.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PresenceEntry {
    /// The stored presence row.
    #[serde(flatten)]
    pub presence: RoomPresence,
    /// Whether the participant looks disconnected, per the server's
    /// staleness threshold at response time.
    pub stale: bool,
}

/// `GET /rooms/{id}/presence` response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterResponse {
    /// All participants that have ever heartbeaten into the room.
    pub participants: Vec<PresenceEntry>,
}

/// Stable machine-readable rejection tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorReason {
    /// Malformed request body or path.
    Validation,
    /// The submitter does not hold the turn.
    NotYourTurn,
    /// The move was built against an outdated snapshot.
    StaleVersion,
    /// The rule engine rejected the move.
    IllegalMove,
    /// No such session.
    SessionNotFound,
    /// The session does not accept moves in its current status.
    SessionNotActive,
    /// The session is not accepting joins.
    NotJoinable,
    /// No such room.
    RoomNotFound,
    /// No such route.
    UnknownRoute,
}

/// Error response body for every non-2xx status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Machine-readable tag.
    pub reason: ErrorReason,
    /// Human-readable description.
    pub message: String,
}

impl ErrorBody {
    /// Creates an error body.
    #[must_use]
    pub fn new(reason: ErrorReason, message: impl Into<String>) -> Self {
        Self {
            reason,
            message: message.into(),
        }
    }
}
