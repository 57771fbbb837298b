//! The polymorphic rule engine contract.

use crate::error::RuleResult;
use crate::four_in_a_row::FourInARowEngine;
use crate::maze::MazeEngine;
use crate::quiz::QuizEngine;
use crate::state::{GameState, Move};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The activity a session plays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityKind {
    /// Drop discs into a 6x7 grid, align four to win.
    FourInARow,
    /// One partner asks, the other guesses, roles swap each round.
    Quiz,
    /// Steer two tokens through a shared maze to a common goal.
    Maze,
}

impl fmt::Display for ActivityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ActivityKind::FourInARow => "four_in_a_row",
            ActivityKind::Quiz => "quiz",
            ActivityKind::Maze => "maze",
        };
        write!(f, "{name}")
    }
}

/// A participant slot within a session.
///
/// Engines address players by seat so they stay independent of user
/// identity. `Seat::One` is the session creator, `Seat::Two` the joiner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Seat {
    /// The first participant (session creator).
    One,
    /// The second participant (joiner).
    Two,
}

impl Seat {
    /// Returns the opposite seat.
    #[must_use]
    pub const fn other(self) -> Seat {
        match self {
            Seat::One => Seat::Two,
            Seat::Two => Seat::One,
        }
    }

    /// Returns the participant-list index for this seat.
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Seat::One => 0,
            Seat::Two => 1,
        }
    }
}

impl fmt::Display for Seat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Seat::One => write!(f, "seat:1"),
            Seat::Two => write!(f, "seat:2"),
        }
    }
}

/// A terminal outcome reported by an engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Terminal {
    /// One seat won outright.
    Win {
        /// The winning seat.
        winner: Seat,
    },
    /// The activity ended with no winner.
    Draw,
    /// Both participants won together.
    CoopWin,
}

/// The result of a legal move.
#[derive(Debug, Clone, PartialEq)]
pub struct MoveOutcome {
    /// The state after applying the move.
    pub state: GameState,
    /// The seat that moves next, if the activity gates turns.
    pub next_turn: Option<Seat>,
    /// The terminal outcome, if the move ended the session.
    pub terminal: Option<Terminal>,
}

/// A pure rule engine for one activity.
///
/// `apply` is a pure function: same inputs, same outputs, no I/O. That
/// makes every engine unit-testable without a coordinator or storage.
pub trait RuleEngine: Send + Sync {
    /// The activity this engine evaluates.
    fn kind(&self) -> ActivityKind;

    /// Number of participants required before the session activates.
    fn required_participants(&self) -> usize {
        2
    }

    /// Whether moves are gated on turn ownership.
    ///
    /// Ungated activities let any participant act at any time; the
    /// coordinator checks membership instead of turn ownership for them.
    fn turn_gated(&self) -> bool {
        true
    }

    /// The state a freshly created session starts from.
    fn initial_state(&self) -> GameState;

    /// The seat that moves first once the session activates.
    ///
    /// Returns `None` for ungated activities, which never assign a
    /// turn owner.
    fn first_turn(&self) -> Option<Seat>;

    /// Applies one move for `actor`, returning the new state plus
    /// next-turn and terminal information, or a rejection.
    fn apply(&self, state: &GameState, mv: &Move, actor: Seat) -> RuleResult<MoveOutcome>;
}

/// Resolves the engine for an activity.
#[must_use]
pub fn engine_for(kind: ActivityKind) -> &'static dyn RuleEngine {
    match kind {
        ActivityKind::FourInARow => &FourInARowEngine,
        ActivityKind::Quiz => &QuizEngine,
        ActivityKind::Maze => &MazeEngine,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seat_other() {
        assert_eq!(Seat::One.other(), Seat::Two);
        assert_eq!(Seat::Two.other(), Seat::One);
        assert_eq!(Seat::One.index(), 0);
        assert_eq!(Seat::Two.index(), 1);
    }

    #[test]
    fn engine_dispatch_matches_kind() {
        for kind in [
            ActivityKind::FourInARow,
            ActivityKind::Quiz,
            ActivityKind::Maze,
        ] {
            assert_eq!(engine_for(kind).kind(), kind);
        }
    }

    #[test]
    fn gating_per_activity() {
        assert!(engine_for(ActivityKind::FourInARow).turn_gated());
        assert!(engine_for(ActivityKind::Quiz).turn_gated());
        assert!(!engine_for(ActivityKind::Maze).turn_gated());

        assert!(engine_for(ActivityKind::FourInARow).first_turn().is_some());
        assert!(engine_for(ActivityKind::Maze).first_turn().is_none());
    }

    #[test]
    fn activity_kind_serde_tags() {
        let json = serde_json::to_string(&ActivityKind::FourInARow).unwrap();
        assert_eq!(json, "\"four_in_a_row\"");
        let back: ActivityKind = serde_json::from_str("\"maze\"").unwrap();
        assert_eq!(back, ActivityKind::Maze);
    }
}
