//! Co-op maze: two tokens, one wall grid, a shared goal.
//!
//! The maze is the one activity without turn gating: either participant
//! may move either token at any time, and the session completes
//! cooperatively when both tokens stand inside the goal region.

use crate::engine::{ActivityKind, MoveOutcome, RuleEngine, Seat, Terminal};
use crate::error::{RuleError, RuleResult};
use crate::state::{GameState, Move};
use serde::{Deserialize, Serialize};

/// Grid width in cells.
pub(crate) const MAZE_WIDTH: u8 = 8;
/// Grid height in cells.
pub(crate) const MAZE_HEIGHT: u8 = 8;

/// The wall layout, row 0 at the top. `#` is a wall cell.
const LAYOUT: [&str; MAZE_HEIGHT as usize] = [
    "..#.....",
    "..#.##..",
    "....#...",
    ".##.#.##",
    "....#...",
    "##......",
    "...##...",
    "........",
];

/// The goal region: the 2x2 block in the bottom-right corner.
const GOAL_MIN_X: u8 = MAZE_WIDTH - 2;
const GOAL_MIN_Y: u8 = MAZE_HEIGHT - 2;

/// A cell coordinate, `(0, 0)` at the top-left.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    /// Column, increasing rightwards.
    pub x: u8,
    /// Row, increasing downwards.
    pub y: u8,
}

impl Position {
    /// Creates a position.
    #[must_use]
    pub const fn new(x: u8, y: u8) -> Self {
        Self { x, y }
    }

    /// Returns true when this cell lies inside the goal region.
    #[must_use]
    pub const fn in_goal(self) -> bool {
        self.x >= GOAL_MIN_X && self.y >= GOAL_MIN_Y
    }
}

/// A single-cell step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// Towards row 0.
    Up,
    /// Away from row 0.
    Down,
    /// Towards column 0.
    Left,
    /// Away from column 0.
    Right,
}

/// State of the co-op maze: one position per token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MazeState {
    /// Token positions, indexed by [`Seat::index`].
    pub tokens: [Position; 2],
}

impl Default for MazeState {
    fn default() -> Self {
        // Tokens start in opposite top corners, both outside the goal.
        Self {
            tokens: [
                Position::new(0, 0),
                Position::new(MAZE_WIDTH - 1, 0),
            ],
        }
    }
}

fn is_wall(pos: Position) -> bool {
    LAYOUT[pos.y as usize].as_bytes()[pos.x as usize] == b'#'
}

fn step(from: Position, direction: Direction) -> Option<Position> {
    let (x, y) = (from.x as i16, from.y as i16);
    let (x, y) = match direction {
        Direction::Up => (x, y - 1),
        Direction::Down => (x, y + 1),
        Direction::Left => (x - 1, y),
        Direction::Right => (x + 1, y),
    };
    if x < 0 || y < 0 || x >= i16::from(MAZE_WIDTH) || y >= i16::from(MAZE_HEIGHT) {
        return None;
    }
    Some(Position::new(x as u8, y as u8))
}

/// Rule engine for the co-op maze.
pub struct MazeEngine;

impl RuleEngine for MazeEngine {
    fn kind(&self) -> ActivityKind {
        ActivityKind::Maze
    }

    fn turn_gated(&self) -> bool {
        false
    }

    fn initial_state(&self) -> GameState {
        GameState::Maze(MazeState::default())
    }

    fn first_turn(&self) -> Option<Seat> {
        None
    }

    fn apply(&self, state: &GameState, mv: &Move, _actor: Seat) -> RuleResult<MoveOutcome> {
        let (GameState::Maze(maze), Move::Maze { token, direction }) = (state, mv) else {
            return Err(RuleError::ActivityMismatch {
                expected: ActivityKind::Maze,
            });
        };

        let from = maze.tokens[token.index()];
        let to = step(from, *direction).ok_or(RuleError::OutOfBounds)?;
        if is_wall(to) {
            return Err(RuleError::WallBlocked);
        }

        let mut maze = *maze;
        maze.tokens[token.index()] = to;

        let terminal = (maze.tokens[0].in_goal() && maze.tokens[1].in_goal())
            .then_some(Terminal::CoopWin);

        Ok(MoveOutcome {
            state: GameState::Maze(maze),
            next_turn: None,
            terminal,
        })
    }
}
