//! Error types for session coordination.

use crate::session::SessionStatus;
use crate::types::{JoinCode, SessionId, UserId};
use duet_rules::RuleError;
use thiserror::Error;

/// Result type for session operations.
pub type SessionResult<T> = Result<T, SessionError>;

/// Errors returned by the session store and coordinator.
///
/// None of these are retried internally; retry policy belongs to the
/// client. In particular `StaleVersion` is an expected outcome of normal
/// concurrent play and should trigger a refetch-and-retry, not a failure.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SessionError {
    /// No session with this id.
    #[error("{0} not found")]
    SessionNotFound(SessionId),

    /// No session with this join code.
    #[error("no session with join code {0}")]
    CodeNotFound(JoinCode),

    /// The session does not accept moves in its current status.
    #[error("session is {status}, not active")]
    SessionNotActive {
        /// The status the session is in.
        status: SessionStatus,
    },

    /// The session is not waiting for participants.
    #[error("session is {status} and cannot be joined")]
    NotJoinable {
        /// The status the session is in.
        status: SessionStatus,
    },

    /// The session already has its required participants.
    #[error("session already has {0} participants")]
    SessionFull(usize),

    /// The user is already a participant.
    #[error("{0} already joined this session")]
    AlreadyJoined(UserId),

    /// The submitting user does not hold the turn (or, for ungated
    /// activities, is not a participant).
    #[error("it is not {user}'s turn")]
    NotYourTurn {
        /// The user who submitted the move.
        user: UserId,
        /// The current turn owner, if any.
        turn_owner: Option<UserId>,
    },

    /// The move was built against an outdated snapshot.
    #[error("stale version: session is at {current}, move expected {submitted}")]
    StaleVersion {
        /// The session's committed version.
        current: u64,
        /// The version the move carried.
        submitted: u64,
    },

    /// The rule engine rejected the move; nothing was persisted.
    #[error("illegal move: {0}")]
    IllegalMove(#[from] RuleError),

    /// A generated join code collided with a live session.
    #[error("join code {0} is already in use")]
    DuplicateJoinCode(JoinCode),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stale_version_display_names_both_versions() {
        let err = SessionError::StaleVersion {
            current: 7,
            submitted: 4,
        };
        let msg = err.to_string();
        assert!(msg.contains('7'));
        assert!(msg.contains('4'));
    }

    #[test]
    fn rule_errors_convert_to_illegal_move() {
        let err: SessionError = RuleError::ColumnFull(6).into();
        assert!(matches!(err, SessionError::IllegalMove(_)));
    }
}
