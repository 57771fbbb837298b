//! Four-in-a-row: gravity drops on a 6x7 grid, align four to win.

use crate::engine::{ActivityKind, MoveOutcome, RuleEngine, Seat, Terminal};
use crate::error::{RuleError, RuleResult};
use crate::state::{GameState, Move};
use serde::{Deserialize, Serialize};

/// Number of rows on the board.
pub const BOARD_ROWS: usize = 6;
/// Number of columns on the board.
pub const BOARD_COLS: usize = 7;

/// Scan directions: horizontal, vertical, both diagonals.
const AXES: [(isize, isize); 4] = [(0, 1), (1, 0), (1, 1), (1, -1)];

/// The four-in-a-row grid.
///
/// Row 0 is the bottom row; a dropped disc lands in the lowest empty row
/// of its column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    /// `cells[row][col]`, `None` while empty.
    pub cells: [[Option<Seat>; BOARD_COLS]; BOARD_ROWS],
}

impl Default for Board {
    fn default() -> Self {
        Self {
            cells: [[None; BOARD_COLS]; BOARD_ROWS],
        }
    }
}

impl Board {
    /// Returns the lowest empty row in `column`, or `None` when full.
    #[must_use]
    pub fn drop_row(&self, column: usize) -> Option<usize> {
        (0..BOARD_ROWS).find(|&row| self.cells[row][column].is_none())
    }

    /// Returns true when every cell holds a disc.
    #[must_use]
    pub fn is_full(&self) -> bool {
        (0..BOARD_COLS).all(|col| self.cells[BOARD_ROWS - 1][col].is_some())
    }

    /// Counts the discs on the board.
    #[must_use]
    pub fn disc_count(&self) -> usize {
        self.cells
            .iter()
            .flatten()
            .filter(|cell| cell.is_some())
            .count()
    }

    /// Returns true when the disc at `(row, col)` sits in a run of four.
    ///
    /// Scans all four axes through the cell, counting contiguous
    /// same-seat discs in both directions.
    #[must_use]
    pub fn wins_at(&self, row: usize, col: usize) -> bool {
        let Some(seat) = self.cells[row][col] else {
            return false;
        };

        AXES.iter().any(|&(dr, dc)| {
            let mut run = 1;
            for sign in [1isize, -1] {
                let mut r = row as isize + dr * sign;
                let mut c = col as isize + dc * sign;
                while self.seat_at(r, c) == Some(seat) {
                    run += 1;
                    r += dr * sign;
                    c += dc * sign;
                }
            }
            run >= 4
        })
    }

    fn seat_at(&self, row: isize, col: isize) -> Option<Seat> {
        if row < 0 || col < 0 || row as usize >= BOARD_ROWS || col as usize >= BOARD_COLS {
            return None;
        }
        self.cells[row as usize][col as usize]
    }
}

/// Rule engine for four-in-a-row.
pub struct FourInARowEngine;

impl RuleEngine for FourInARowEngine {
    fn kind(&self) -> ActivityKind {
        ActivityKind::FourInARow
    }

    fn initial_state(&self) -> GameState {
        GameState::FourInARow(Board::default())
    }

    fn first_turn(&self) -> Option<Seat> {
        Some(Seat::One)
    }

    fn apply(&self, state: &GameState, mv: &Move, actor: Seat) -> RuleResult<MoveOutcome> {
        let (GameState::FourInARow(board), Move::FourInARow { column }) = (state, mv) else {
            return Err(RuleError::ActivityMismatch {
                expected: ActivityKind::FourInARow,
            });
        };
        let column = *column;

        if column >= BOARD_COLS {
            return Err(RuleError::ColumnOutOfRange(column));
        }
        let row = board
            .drop_row(column)
            .ok_or(RuleError::ColumnFull(column))?;

        let mut board = board.clone();
        board.cells[row][column] = Some(actor);

        let terminal = if board.wins_at(row, column) {
            Some(Terminal::Win { winner: actor })
        } else if board.is_full() {
            Some(Terminal::Draw)
        } else {
            None
        };

        Ok(MoveOutcome {
            state: GameState::FourInARow(board),
            next_turn: terminal.is_none().then(|| actor.other()),
            terminal,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn drop(state: &GameState, column: usize, actor: Seat) -> RuleResult<MoveOutcome> {
        FourInARowEngine.apply(state, &Move::FourInARow { column }, actor)
    }

    #[test]
    fn disc_lands_in_lowest_empty_row() {
        let state = FourInARowEngine.initial_state();

        let out = drop(&state, 3, Seat::One).unwrap();
        let GameState::FourInARow(board) = &out.state else {
            panic!("wrong state variant");
        };
        assert_eq!(board.cells[0][3], Some(Seat::One));

        let out = drop(&out.state, 3, Seat::Two).unwrap();
        let GameState::FourInARow(board) = &out.state else {
            panic!("wrong state variant");
        };
        assert_eq!(board.cells[1][3], Some(Seat::Two));
    }

    #[test]
    fn turn_alternates_after_each_legal_move() {
        let state = FourInARowEngine.initial_state();
        let out = drop(&state, 0, Seat::One).unwrap();
        assert_eq!(out.next_turn, Some(Seat::Two));
        let out = drop(&out.state, 1, Seat::Two).unwrap();
        assert_eq!(out.next_turn, Some(Seat::One));
    }

    #[test]
    fn seventh_disc_in_a_column_is_rejected() {
        let mut state = FourInARowEngine.initial_state();
        let mut actor = Seat::One;
        for _ in 0..BOARD_ROWS {
            state = drop(&state, 2, actor).unwrap().state;
            actor = actor.other();
        }

        let err = drop(&state, 2, actor).unwrap_err();
        assert_eq!(err, RuleError::ColumnFull(2));
    }

    #[test]
    fn out_of_range_column_is_rejected() {
        let state = FourInARowEngine.initial_state();
        let err = drop(&state, BOARD_COLS, Seat::One).unwrap_err();
        assert_eq!(err, RuleError::ColumnOutOfRange(BOARD_COLS));
    }

    #[test]
    fn vertical_win_detected() {
        let mut state = FourInARowEngine.initial_state();
        // One stacks column 0, Two stacks column 1.
        for _ in 0..3 {
            state = drop(&state, 0, Seat::One).unwrap().state;
            state = drop(&state, 1, Seat::Two).unwrap().state;
        }
        let out = drop(&state, 0, Seat::One).unwrap();
        assert_eq!(out.terminal, Some(Terminal::Win { winner: Seat::One }));
        assert_eq!(out.next_turn, None);
    }

    #[test]
    fn horizontal_win_detected() {
        let mut state = FourInARowEngine.initial_state();
        for col in 0..3 {
            state = drop(&state, col, Seat::One).unwrap().state;
            state = drop(&state, col, Seat::Two).unwrap().state;
        }
        let out = drop(&state, 3, Seat::One).unwrap();
        assert_eq!(out.terminal, Some(Terminal::Win { winner: Seat::One }));
    }

    #[test]
    fn rising_diagonal_win_detected() {
        // Build heights so One's discs land at (0,0) (1,1) (2,2) (3,3).
        let mut board = Board::default();
        board.cells[0][1] = Some(Seat::Two);
        board.cells[0][2] = Some(Seat::Two);
        board.cells[1][2] = Some(Seat::Two);
        board.cells[0][3] = Some(Seat::Two);
        board.cells[1][3] = Some(Seat::Two);
        board.cells[2][3] = Some(Seat::Two);
        board.cells[0][0] = Some(Seat::One);
        board.cells[1][1] = Some(Seat::One);
        board.cells[2][2] = Some(Seat::One);

        let state = GameState::FourInARow(board);
        let out = drop(&state, 3, Seat::One).unwrap();
        assert_eq!(out.terminal, Some(Terminal::Win { winner: Seat::One }));
    }

    #[test]
    fn falling_diagonal_win_detected() {
        let mut board = Board::default();
        board.cells[0][0] = Some(Seat::Two);
        board.cells[1][0] = Some(Seat::Two);
        board.cells[2][0] = Some(Seat::Two);
        board.cells[0][1] = Some(Seat::Two);
        board.cells[1][1] = Some(Seat::Two);
        board.cells[0][2] = Some(Seat::Two);
        board.cells[3][0] = Some(Seat::One);
        board.cells[2][1] = Some(Seat::One);
        board.cells[1][2] = Some(Seat::One);

        let state = GameState::FourInARow(board);
        let out = drop(&state, 3, Seat::One).unwrap();
        assert_eq!(out.terminal, Some(Terminal::Win { winner: Seat::One }));
    }

    /// `(col + row/2) % 2` colours the board with runs of at most two in
    /// every axis, so filling it this way never produces a winner.
    fn drawing_seat(row: usize, col: usize) -> Seat {
        if (col + row / 2) % 2 == 0 {
            Seat::One
        } else {
            Seat::Two
        }
    }

    #[test]
    fn full_board_without_alignment_is_a_draw() {
        let mut board = Board::default();
        for row in 0..BOARD_ROWS {
            for col in 0..BOARD_COLS {
                board.cells[row][col] = Some(drawing_seat(row, col));
            }
        }
        // Leave the last cell for the final move.
        board.cells[BOARD_ROWS - 1][BOARD_COLS - 1] = None;

        let state = GameState::FourInARow(board);
        let actor = drawing_seat(BOARD_ROWS - 1, BOARD_COLS - 1);
        let out = drop(&state, BOARD_COLS - 1, actor).unwrap();
        assert_eq!(out.terminal, Some(Terminal::Draw));
        assert_eq!(out.next_turn, None);
    }

    proptest! {
        /// Random legal play: every accepted drop adds exactly one disc,
        /// rejections leave the board unchanged, and the engine never
        /// reports a next turn for the actor who just moved.
        #[test]
        fn random_play_preserves_board_invariants(columns in prop::collection::vec(0..BOARD_COLS, 1..64)) {
            let mut state = FourInARowEngine.initial_state();
            let mut actor = Seat::One;

            for column in columns {
                let GameState::FourInARow(before) = state.clone() else {
                    unreachable!()
                };
                match FourInARowEngine.apply(&state, &Move::FourInARow { column }, actor) {
                    Ok(out) => {
                        let GameState::FourInARow(after) = &out.state else {
                            unreachable!()
                        };
                        prop_assert_eq!(after.disc_count(), before.disc_count() + 1);
                        if let Some(next) = out.next_turn {
                            prop_assert_eq!(next, actor.other());
                        }
                        if out.terminal.is_some() {
                            break;
                        }
                        state = out.state;
                        actor = actor.other();
                    }
                    Err(RuleError::ColumnFull(_)) => {
                        // Rejection: state untouched, same actor retries elsewhere.
                        let GameState::FourInARow(current) = &state else {
                            unreachable!()
                        };
                        prop_assert_eq!(current.disc_count(), before.disc_count());
                    }
                    Err(other) => return Err(TestCaseError::fail(format!("unexpected: {other}"))),
                }
            }
        }
    }
}
