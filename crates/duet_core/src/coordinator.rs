//! The session coordinator: the only writer of session state.
//!
//! The coordinator orchestrates locking, versioning, and persistence;
//! turn alternation and terminal detection are entirely the rule
//! engine's responsibility.

use crate::error::{SessionError, SessionResult};
use crate::session::{Score, Session, SessionStatus};
use crate::store::{MemoryScoreRecorder, ScoreRecorder, SessionStore};
use crate::types::{unix_millis, JoinCode, SessionId, UserId};
use duet_rules::{engine_for, ActivityKind, Move, Terminal};
use serde_json::json;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// The committed result of a successful move.
#[derive(Debug, Clone)]
pub struct MoveRecord {
    /// The session snapshot after the commit.
    pub session: Session,
    /// The terminal outcome, when the move completed the session.
    pub terminal: Option<Terminal>,
}

/// Coordinates all session mutations.
///
/// `submit_move` holds the session's exclusive row lock across its
/// precondition checks, the pure rule evaluation, and the commit, so at
/// most one mutation is in flight per session regardless of request
/// concurrency. Precondition failures and rule rejections leave the
/// stored session completely untouched.
pub struct SessionCoordinator {
    store: Arc<SessionStore>,
    scores: Arc<dyn ScoreRecorder>,
}

impl SessionCoordinator {
    /// Creates a coordinator over the given store and score recorder.
    pub fn new(store: Arc<SessionStore>, scores: Arc<dyn ScoreRecorder>) -> Self {
        Self { store, scores }
    }

    /// Creates a coordinator with a fresh in-memory store and recorder.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(
            Arc::new(SessionStore::new()),
            Arc::new(MemoryScoreRecorder::new()),
        )
    }

    /// The underlying store, for snapshot reads by embedders.
    #[must_use]
    pub fn store(&self) -> &Arc<SessionStore> {
        &self.store
    }

    /// Creates a session in `waiting` with its creator as sole
    /// participant, version 0, and the engine's initial state.
    pub fn create_session(
        &self,
        activity: ActivityKind,
        creator: UserId,
    ) -> SessionResult<Session> {
        let engine = engine_for(activity);
        loop {
            let code = JoinCode::generate();
            let session = Session::new(activity, creator, code, engine.initial_state());
            match self.store.insert(session.clone()) {
                Ok(()) => {
                    info!(session = %session.id, %activity, "session created");
                    return Ok(session);
                }
                // Collisions in the code space: roll a new code.
                Err(SessionError::DuplicateJoinCode(_)) => continue,
                Err(err) => return Err(err),
            }
        }
    }

    /// Adds a participant to a waiting session.
    ///
    /// When the activity's required participant count is reached the
    /// session becomes `active` and the engine assigns the first turn.
    pub fn join_session(&self, code: &JoinCode, user: UserId) -> SessionResult<Session> {
        let id = self.store.id_for_code(code)?;
        let slot = self.store.slot(id)?;
        let _row = slot.row_lock.lock();

        let mut session = slot.cell.read().clone();
        if session.status != SessionStatus::Waiting {
            return Err(SessionError::NotJoinable {
                status: session.status,
            });
        }
        if session.is_participant(user) {
            return Err(SessionError::AlreadyJoined(user));
        }
        let engine = engine_for(session.activity);
        if session.participants.len() >= engine.required_participants() {
            return Err(SessionError::SessionFull(session.participants.len()));
        }

        session.participants.push(user);
        if session.participants.len() == engine.required_participants() {
            session.status = SessionStatus::Active;
            session.turn_owner = engine.first_turn().and_then(|seat| session.user_at(seat));
            info!(session = %session.id, %user, "session active");
        }
        session.touch();

        *slot.cell.write() = session.clone();
        Ok(session)
    }

    /// Applies one move. The only write path for game state.
    ///
    /// Precondition checks run in order under the row lock, each
    /// short-circuiting with its own error: session exists, status is
    /// `active`, the submitter holds the turn (membership for ungated
    /// activities), and `expected_version` matches the committed version.
    pub fn submit_move(
        &self,
        id: SessionId,
        user: UserId,
        expected_version: u64,
        mv: &Move,
    ) -> SessionResult<MoveRecord> {
        let slot = self.store.slot(id)?;
        let _row = slot.row_lock.lock();

        let session = slot.cell.read().clone();
        if session.status != SessionStatus::Active {
            return Err(SessionError::SessionNotActive {
                status: session.status,
            });
        }

        let engine = engine_for(session.activity);
        let eligible = if engine.turn_gated() {
            session.turn_owner == Some(user)
        } else {
            session.is_participant(user)
        };
        if !eligible {
            return Err(SessionError::NotYourTurn {
                user,
                turn_owner: session.turn_owner,
            });
        }

        if expected_version != session.version {
            warn!(
                session = %id,
                current = session.version,
                submitted = expected_version,
                "rejected stale move"
            );
            return Err(SessionError::StaleVersion {
                current: session.version,
                submitted: expected_version,
            });
        }

        // Eligibility guarantees a seat.
        let seat = session
            .seat_of(user)
            .ok_or(SessionError::NotYourTurn {
                user,
                turn_owner: session.turn_owner,
            })?;

        // Pure evaluation: no I/O happens inside the lock beyond the
        // commit itself. Rejection persists nothing.
        let outcome = engine.apply(&session.state, mv, seat)?;

        let mut updated = session;
        updated.state = outcome.state;
        updated.turn_owner = outcome.next_turn.and_then(|s| updated.user_at(s));

        if let Some(terminal) = outcome.terminal {
            updated.status = SessionStatus::Completed;
            updated.turn_owner = None;
            info!(session = %id, ?terminal, "session completed");
        }
        updated.touch();

        *slot.cell.write() = updated.clone();
        debug!(session = %id, version = updated.version, "move committed");

        // Score rows are written only after the snapshot commit, and a
        // recorder failure never unwinds it.
        if let Some(terminal) = outcome.terminal {
            for score in Self::scores_for(&updated, terminal) {
                if let Err(err) = self.scores.record(score) {
                    warn!(session = %id, %err, "score row not recorded");
                }
            }
        }

        Ok(MoveRecord {
            session: updated,
            terminal: outcome.terminal,
        })
    }

    /// Lock-free snapshot read; safe to poll at any rate.
    pub fn get_session(&self, id: SessionId) -> SessionResult<Session> {
        self.store.snapshot(id)
    }

    /// Marks a non-terminal session abandoned.
    ///
    /// This is the explicit external action from the lifecycle; terminal
    /// sessions reject it like any other mutation.
    pub fn abandon_session(&self, id: SessionId) -> SessionResult<Session> {
        let slot = self.store.slot(id)?;
        let _row = slot.row_lock.lock();

        let mut session = slot.cell.read().clone();
        if session.status.is_terminal() {
            return Err(SessionError::SessionNotActive {
                status: session.status,
            });
        }
        session.status = SessionStatus::Abandoned;
        session.turn_owner = None;
        session.touch();

        *slot.cell.write() = session.clone();
        info!(session = %id, "session abandoned");
        Ok(session)
    }

    /// One score row per participant for a terminal outcome.
    fn scores_for(session: &Session, terminal: Terminal) -> Vec<Score> {
        let now = unix_millis();
        let winner = match terminal {
            Terminal::Win { winner } => session.user_at(winner),
            _ => None,
        };
        session
            .participants
            .iter()
            .map(|&user_id| {
                let (score, detail) = match terminal {
                    Terminal::Win { .. } => {
                        let won = winner == Some(user_id);
                        (
                            if won { 1.0 } else { 0.0 },
                            json!({ "outcome": "win", "winner": winner, "won": won }),
                        )
                    }
                    Terminal::Draw => (0.5, json!({ "outcome": "draw" })),
                    Terminal::CoopWin => (1.0, json!({ "outcome": "coop_win" })),
                };
                Score {
                    session_id: session.id,
                    user_id,
                    score,
                    detail,
                    recorded_at_ms: now,
                }
            })
            .collect()
    }
}
