//! # Duet Rules
//!
//! Pure rule engines for Duet activities.
//!
//! This crate provides:
//! - The [`RuleEngine`] trait: `(state, move, actor) -> (state, next turn, terminal?)`
//! - One engine per activity: four-in-a-row, paired quiz, co-op maze
//! - Tagged [`GameState`] / [`Move`] sum types decoded at the API boundary
//!
//! Engines are pure functions over their inputs: given the same state,
//! move, and actor they always produce the same outcome, and they perform
//! no I/O. Players are addressed by [`Seat`]; mapping seats to user ids is
//! the session coordinator's job.

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod engine;
mod error;
mod four_in_a_row;
mod maze;
mod quiz;
mod state;

pub use engine::{engine_for, ActivityKind, MoveOutcome, RuleEngine, Seat, Terminal};
pub use error::{RuleError, RuleResult};
pub use four_in_a_row::{Board, FourInARowEngine, BOARD_COLS, BOARD_ROWS};
pub use maze::{Direction, MazeEngine, MazeState, Position};
pub use quiz::{QuizEngine, QuizMove, QuizPhase, QuizState};
pub use state::{GameState, Move};
