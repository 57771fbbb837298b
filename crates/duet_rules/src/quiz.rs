//! Paired quiz: one partner asks, the other guesses, roles swap.

use crate::engine::{ActivityKind, MoveOutcome, RuleEngine, Seat};
use crate::error::{RuleError, RuleResult};
use crate::state::{GameState, Move};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The phase of the current quiz round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuizPhase {
    /// Waiting for the asker to submit a prompt and answer.
    Ask,
    /// Waiting for the partner to guess.
    Guess,
    /// Round complete; waiting for a reset.
    Result,
}

impl fmt::Display for QuizPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            QuizPhase::Ask => "ask",
            QuizPhase::Guess => "guess",
            QuizPhase::Result => "result",
        };
        write!(f, "{name}")
    }
}

/// State of the quiz activity.
///
/// A round walks `ask -> guess -> result` and resets back to `ask`; the
/// session itself never terminates from a round completing. Every move
/// hands the turn to the other seat, so the `reset` lands with the
/// asker and the next `ask` with the previous guesser: roles swap each
/// round while turns alternate strictly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizState {
    /// Current phase.
    pub phase: QuizPhase,
    /// Prompt stored by the last `ask`.
    pub prompt: Option<String>,
    /// Answer stored by the last `ask`.
    pub answer: Option<String>,
    /// Guess stored by the last `guess`.
    pub guess: Option<String>,
    /// Whether the last guess matched the answer.
    pub is_match: Option<bool>,
    /// Rounds completed so far.
    pub rounds_completed: u32,
    /// Rounds whose guess matched.
    pub rounds_matched: u32,
}

impl Default for QuizState {
    fn default() -> Self {
        Self {
            phase: QuizPhase::Ask,
            prompt: None,
            answer: None,
            guess: None,
            is_match: None,
            rounds_completed: 0,
            rounds_matched: 0,
        }
    }
}

/// A quiz action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuizMove {
    /// Store a prompt and its answer; only valid in the `ask` phase.
    Ask {
        /// The question shown to the guesser.
        prompt: String,
        /// The expected answer.
        answer: String,
    },
    /// Submit a guess; only valid in the `guess` phase.
    Guess {
        /// The guessed answer.
        guess: String,
    },
    /// Clear the round and return to `ask`; only valid in `result`.
    Reset,
}

/// Matching is case-insensitive with surrounding whitespace trimmed.
fn normalized(text: &str) -> String {
    text.trim().to_lowercase()
}

/// Rule engine for the paired quiz.
pub struct QuizEngine;

impl RuleEngine for QuizEngine {
    fn kind(&self) -> ActivityKind {
        ActivityKind::Quiz
    }

    fn initial_state(&self) -> GameState {
        GameState::Quiz(QuizState::default())
    }

    fn first_turn(&self) -> Option<Seat> {
        Some(Seat::One)
    }

    fn apply(&self, state: &GameState, mv: &Move, actor: Seat) -> RuleResult<MoveOutcome> {
        let (GameState::Quiz(quiz), Move::Quiz { action }) = (state, mv) else {
            return Err(RuleError::ActivityMismatch {
                expected: ActivityKind::Quiz,
            });
        };

        let mut quiz = quiz.clone();
        let next_turn = match (quiz.phase, action) {
            (QuizPhase::Ask, QuizMove::Ask { prompt, answer }) => {
                quiz.prompt = Some(prompt.clone());
                quiz.answer = Some(answer.clone());
                quiz.guess = None;
                quiz.is_match = None;
                quiz.phase = QuizPhase::Guess;
                // The partner guesses next.
                actor.other()
            }
            (QuizPhase::Guess, QuizMove::Guess { guess }) => {
                let answer = quiz.answer.as_deref().unwrap_or_default();
                let matched = normalized(guess) == normalized(answer);
                quiz.guess = Some(guess.clone());
                quiz.is_match = Some(matched);
                quiz.rounds_completed += 1;
                if matched {
                    quiz.rounds_matched += 1;
                }
                quiz.phase = QuizPhase::Result;
                // Back to the asker, who resets the round.
                actor.other()
            }
            (QuizPhase::Result, QuizMove::Reset) => {
                quiz.prompt = None;
                quiz.answer = None;
                quiz.guess = None;
                quiz.is_match = None;
                quiz.phase = QuizPhase::Ask;
                // The previous guesser asks the next round.
                actor.other()
            }
            (phase, _) => return Err(RuleError::WrongPhase { phase }),
        };

        Ok(MoveOutcome {
            state: GameState::Quiz(quiz),
            next_turn: Some(next_turn),
            terminal: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn act(state: &GameState, action: QuizMove, actor: Seat) -> RuleResult<MoveOutcome> {
        QuizEngine.apply(state, &Move::Quiz { action }, actor)
    }

    fn ask(prompt: &str, answer: &str) -> QuizMove {
        QuizMove::Ask {
            prompt: prompt.into(),
            answer: answer.into(),
        }
    }

    fn quiz_state(state: &GameState) -> &QuizState {
        match state {
            GameState::Quiz(q) => q,
            _ => panic!("wrong state variant"),
        }
    }

    #[test]
    fn round_walks_ask_guess_result_and_resets() {
        let state = QuizEngine.initial_state();

        let out = act(&state, ask("where did we meet?", "the library"), Seat::One).unwrap();
        assert_eq!(quiz_state(&out.state).phase, QuizPhase::Guess);
        assert_eq!(out.next_turn, Some(Seat::Two));

        let out = act(
            &out.state,
            QuizMove::Guess {
                guess: "the library".into(),
            },
            Seat::Two,
        )
        .unwrap();
        let quiz = quiz_state(&out.state);
        assert_eq!(quiz.phase, QuizPhase::Result);
        assert_eq!(quiz.is_match, Some(true));
        assert_eq!(quiz.rounds_completed, 1);
        // Round completion is not terminal; the session keeps going.
        assert_eq!(out.terminal, None);
        // Back to the asker for the reset.
        assert_eq!(out.next_turn, Some(Seat::One));

        let out = act(&out.state, QuizMove::Reset, Seat::One).unwrap();
        let quiz = quiz_state(&out.state);
        assert_eq!(quiz.phase, QuizPhase::Ask);
        assert_eq!(quiz.prompt, None);
        assert_eq!(quiz.answer, None);
        assert_eq!(quiz.guess, None);
        assert_eq!(quiz.is_match, None);
        assert_eq!(quiz.rounds_completed, 1);
        // The previous guesser asks the next round.
        assert_eq!(out.next_turn, Some(Seat::Two));
    }

    #[test]
    fn every_move_hands_the_turn_over_and_roles_swap() {
        let mut state = QuizEngine.initial_state();
        let mut actor = Seat::One;

        // Two full rounds: ask, guess, reset, six moves in all. Each
        // accepted move must name the other seat as the next mover.
        let script = [
            ask("round one?", "a"),
            QuizMove::Guess { guess: "a".into() },
            QuizMove::Reset,
            ask("round two?", "b"),
            QuizMove::Guess { guess: "b".into() },
            QuizMove::Reset,
        ];
        for action in script {
            let out = act(&state, action, actor).unwrap();
            let next = out.next_turn.unwrap();
            assert_ne!(next, actor);
            state = out.state;
            actor = next;
        }

        // Seat::Two asked round two, so Seat::One opens round three.
        assert_eq!(actor, Seat::One);
        assert_eq!(quiz_state(&state).rounds_completed, 2);
    }

    #[test]
    fn matching_trims_and_ignores_case() {
        let state = QuizEngine.initial_state();
        let out = act(&state, ask("favorite color?", "Sky Blue"), Seat::One).unwrap();
        let out = act(
            &out.state,
            QuizMove::Guess {
                guess: "  sky blue \n".into(),
            },
            Seat::Two,
        )
        .unwrap();
        assert_eq!(quiz_state(&out.state).is_match, Some(true));
    }

    #[test]
    fn mismatched_guess_recorded() {
        let state = QuizEngine.initial_state();
        let out = act(&state, ask("favorite color?", "blue"), Seat::One).unwrap();
        let out = act(
            &out.state,
            QuizMove::Guess {
                guess: "green".into(),
            },
            Seat::Two,
        )
        .unwrap();
        let quiz = quiz_state(&out.state);
        assert_eq!(quiz.is_match, Some(false));
        assert_eq!(quiz.rounds_completed, 1);
        assert_eq!(quiz.rounds_matched, 0);
    }

    #[test]
    fn moves_outside_their_phase_are_rejected() {
        let state = QuizEngine.initial_state();

        let err = act(
            &state,
            QuizMove::Guess {
                guess: "early".into(),
            },
            Seat::One,
        )
        .unwrap_err();
        assert_eq!(
            err,
            RuleError::WrongPhase {
                phase: QuizPhase::Ask
            }
        );

        let err = act(&state, QuizMove::Reset, Seat::One).unwrap_err();
        assert_eq!(
            err,
            RuleError::WrongPhase {
                phase: QuizPhase::Ask
            }
        );

        let asked = act(&state, ask("q", "a"), Seat::One).unwrap();
        let err = act(&asked.state, ask("q2", "a2"), Seat::Two).unwrap_err();
        assert_eq!(
            err,
            RuleError::WrongPhase {
                phase: QuizPhase::Guess
            }
        );
    }
}
