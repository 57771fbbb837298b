//! Tagged state and move sum types.
//!
//! Session state is stored as a tagged union rather than an untyped blob:
//! the activity tag is decoded once at the API boundary and every engine
//! receives (and produces) its own variant.

use crate::engine::{ActivityKind, Seat};
use crate::four_in_a_row::Board;
use crate::maze::{Direction, MazeState};
use crate::quiz::{QuizMove, QuizState};
use serde::{Deserialize, Serialize};

/// The opaque-to-the-coordinator, typed-to-the-engine session state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "activity", rename_all = "snake_case")]
pub enum GameState {
    /// Four-in-a-row board.
    FourInARow(Board),
    /// Paired quiz round state.
    Quiz(QuizState),
    /// Co-op maze token positions.
    Maze(MazeState),
}

impl GameState {
    /// The activity this state belongs to.
    #[must_use]
    pub fn activity(&self) -> ActivityKind {
        match self {
            GameState::FourInARow(_) => ActivityKind::FourInARow,
            GameState::Quiz(_) => ActivityKind::Quiz,
            GameState::Maze(_) => ActivityKind::Maze,
        }
    }
}

/// One move submitted by a participant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "activity", rename_all = "snake_case")]
pub enum Move {
    /// Drop a disc into a column.
    FourInARow {
        /// Zero-based column index.
        column: usize,
    },
    /// Advance the quiz round.
    Quiz {
        /// The quiz action (ask, guess, or reset).
        action: QuizMove,
    },
    /// Step one maze token in a direction.
    Maze {
        /// Which token to move; either participant may move either token.
        token: Seat,
        /// The direction to step.
        direction: Direction,
    },
}

impl Move {
    /// The activity this move belongs to.
    #[must_use]
    pub fn activity(&self) -> ActivityKind {
        match self {
            Move::FourInARow { .. } => ActivityKind::FourInARow,
            Move::Quiz { .. } => ActivityKind::Quiz,
            Move::Maze { .. } => ActivityKind::Maze,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn state_round_trips_with_activity_tag() {
        let state = GameState::Quiz(QuizState::default());
        let json = serde_json::to_string(&state).unwrap();
        assert!(json.contains("\"activity\":\"quiz\""));

        let back: GameState = serde_json::from_str(&json).unwrap();
        assert_eq!(back, state);
    }

    #[test]
    fn move_decodes_from_tagged_json() {
        let mv: Move =
            serde_json::from_str(r#"{"activity":"four_in_a_row","column":3}"#).unwrap();
        assert_eq!(mv, Move::FourInARow { column: 3 });
        assert_eq!(mv.activity(), ActivityKind::FourInARow);

        let mv: Move = serde_json::from_str(
            r#"{"activity":"maze","token":"two","direction":"left"}"#,
        )
        .unwrap();
        assert_eq!(mv.activity(), ActivityKind::Maze);
    }
}
