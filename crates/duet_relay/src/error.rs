//! Error types for the relay.

use duet_core::RoomId;
use thiserror::Error;

/// Result type for relay operations.
pub type RelayResult<T> = Result<T, RelayError>;

/// Errors returned by the relay.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RelayError {
    /// The room has never seen an append.
    #[error("{0} not found")]
    RoomNotFound(RoomId),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_names_the_room() {
        let room = RoomId::generate();
        let msg = RelayError::RoomNotFound(room).to_string();
        assert!(msg.contains("room:"));
    }
}
