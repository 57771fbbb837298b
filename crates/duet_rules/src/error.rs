//! Error types for rule evaluation.

use crate::engine::ActivityKind;
use crate::quiz::QuizPhase;
use thiserror::Error;

/// Result type for rule evaluation.
pub type RuleResult<T> = Result<T, RuleError>;

/// A move rejected by a rule engine.
///
/// Rule rejections never mutate state; the caller discards the move and
/// leaves the stored session untouched.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RuleError {
    /// The move or state does not belong to the engine's activity.
    #[error("move does not match activity {expected}")]
    ActivityMismatch {
        /// The activity the engine evaluates.
        expected: ActivityKind,
    },

    /// Column index outside the board.
    #[error("column {0} is out of range")]
    ColumnOutOfRange(usize),

    /// Column already holds a disc in every row.
    #[error("column {0} is full")]
    ColumnFull(usize),

    /// Quiz move submitted in the wrong phase.
    #[error("move is not valid in the {phase} phase")]
    WrongPhase {
        /// The phase the session is currently in.
        phase: QuizPhase,
    },

    /// Maze move would leave the grid.
    #[error("move would leave the grid")]
    OutOfBounds,

    /// Maze move would enter a wall cell.
    #[error("move is blocked by a wall")]
    WallBlocked,
}
