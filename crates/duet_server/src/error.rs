//! API error mapping.

use duet_core::SessionError;
use duet_protocol::{ErrorBody, ErrorReason};
use duet_relay::RelayError;
use thiserror::Error;

/// Result type for API handlers.
pub type ApiResult<T> = Result<T, ApiError>;

/// Errors surfaced by the API.
///
/// Everything here is returned synchronously; nothing is retried
/// internally. Clients treat 409s as normal concurrent-play outcomes
/// (refetch and retry), not failures.
#[derive(Error, Debug)]
pub enum ApiError {
    /// A session operation was rejected.
    #[error(transparent)]
    Session(#[from] SessionError),

    /// A relay operation was rejected.
    #[error(transparent)]
    Relay(#[from] RelayError),

    /// The request body or path did not parse.
    #[error("invalid request: {0}")]
    BadRequest(String),

    /// No route matches the request path.
    #[error("no route for {0}")]
    UnknownRoute(String),
}

impl ApiError {
    /// The HTTP status this error maps to.
    #[must_use]
    pub fn status(&self) -> u16 {
        match self {
            ApiError::Session(err) => match err {
                SessionError::SessionNotFound(_) | SessionError::CodeNotFound(_) => 404,
                SessionError::SessionNotActive { .. }
                | SessionError::NotJoinable { .. }
                | SessionError::SessionFull(_)
                | SessionError::AlreadyJoined(_)
                | SessionError::NotYourTurn { .. }
                | SessionError::StaleVersion { .. }
                | SessionError::DuplicateJoinCode(_) => 409,
                SessionError::IllegalMove(_) => 422,
            },
            ApiError::Relay(RelayError::RoomNotFound(_)) => 404,
            ApiError::BadRequest(_) => 400,
            ApiError::UnknownRoute(_) => 404,
        }
    }

    /// The machine-readable reason tag for the error body.
    #[must_use]
    pub fn reason(&self) -> ErrorReason {
        match self {
            ApiError::Session(err) => match err {
                SessionError::SessionNotFound(_) | SessionError::CodeNotFound(_) => {
                    ErrorReason::SessionNotFound
                }
                SessionError::SessionNotActive { .. } => ErrorReason::SessionNotActive,
                SessionError::NotJoinable { .. }
                | SessionError::SessionFull(_)
                | SessionError::AlreadyJoined(_)
                | SessionError::DuplicateJoinCode(_) => ErrorReason::NotJoinable,
                SessionError::NotYourTurn { .. } => ErrorReason::NotYourTurn,
                SessionError::StaleVersion { .. } => ErrorReason::StaleVersion,
                SessionError::IllegalMove(_) => ErrorReason::IllegalMove,
            },
            ApiError::Relay(RelayError::RoomNotFound(_)) => ErrorReason::RoomNotFound,
            ApiError::BadRequest(_) => ErrorReason::Validation,
            ApiError::UnknownRoute(_) => ErrorReason::UnknownRoute,
        }
    }

    /// The JSON error body.
    #[must_use]
    pub fn body(&self) -> ErrorBody {
        ErrorBody::new(self.reason(), self.to_string())
    }
}
