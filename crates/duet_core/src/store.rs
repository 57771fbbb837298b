//! In-memory session storage with per-session row locks.

use crate::error::{SessionError, SessionResult};
use crate::session::{Score, Session};
use crate::types::{JoinCode, SessionId};
use parking_lot::{Mutex, RwLock};
use std::collections::HashMap;
use std::sync::Arc;

/// One stored session.
///
/// The row lock serializes writers; the cell holds the latest committed
/// snapshot and is only written while the row lock is held. Readers take
/// the cell's read lock directly, so they observe complete committed
/// snapshots without ever contending on the row lock.
pub(crate) struct SessionSlot {
    /// Exclusive writer lock, held across rule evaluation and commit.
    pub(crate) row_lock: Mutex<()>,
    /// Latest committed snapshot.
    pub(crate) cell: RwLock<Session>,
}

/// The durable record of sessions.
///
/// This is the in-memory reference implementation of the narrow
/// persistence interface the coordinator consumes: insert, snapshot
/// lookup by id or join code, and per-row exclusive locking.
pub struct SessionStore {
    slots: RwLock<HashMap<SessionId, Arc<SessionSlot>>>,
    codes: RwLock<HashMap<JoinCode, SessionId>>,
}

impl SessionStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            slots: RwLock::new(HashMap::new()),
            codes: RwLock::new(HashMap::new()),
        }
    }

    /// Inserts a new session, indexing its join code.
    pub fn insert(&self, session: Session) -> SessionResult<()> {
        let mut codes = self.codes.write();
        if codes.contains_key(&session.code) {
            return Err(SessionError::DuplicateJoinCode(session.code));
        }
        codes.insert(session.code.clone(), session.id);

        let slot = Arc::new(SessionSlot {
            row_lock: Mutex::new(()),
            cell: RwLock::new(session.clone()),
        });
        self.slots.write().insert(session.id, slot);
        Ok(())
    }

    /// Returns the latest committed snapshot of a session.
    ///
    /// Lock-free with respect to writers: never touches the row lock.
    pub fn snapshot(&self, id: SessionId) -> SessionResult<Session> {
        let slot = self.slot(id)?;
        let session = slot.cell.read().clone();
        Ok(session)
    }

    /// Resolves a join code to a session id.
    pub fn id_for_code(&self, code: &JoinCode) -> SessionResult<SessionId> {
        self.codes
            .read()
            .get(code)
            .copied()
            .ok_or_else(|| SessionError::CodeNotFound(code.clone()))
    }

    /// Returns the slot for a session, for lock-then-commit mutation.
    pub(crate) fn slot(&self, id: SessionId) -> SessionResult<Arc<SessionSlot>> {
        self.slots
            .read()
            .get(&id)
            .cloned()
            .ok_or(SessionError::SessionNotFound(id))
    }

    /// Number of stored sessions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.read().len()
    }

    /// Returns true when no sessions are stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.read().is_empty()
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

/// The narrow seam for persisting score rows.
///
/// The embedding application owns real score storage; the coordinator
/// only needs somewhere to write one row per participant on completion.
pub trait ScoreRecorder: Send + Sync {
    /// Persists one score row.
    fn record(&self, score: Score) -> SessionResult<()>;
}

/// An in-memory score recorder for defaults and tests.
pub struct MemoryScoreRecorder {
    scores: RwLock<Vec<Score>>,
}

impl MemoryScoreRecorder {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self {
            scores: RwLock::new(Vec::new()),
        }
    }

    /// Returns all recorded scores.
    #[must_use]
    pub fn all(&self) -> Vec<Score> {
        self.scores.read().clone()
    }

    /// Returns the scores recorded for one session.
    #[must_use]
    pub fn for_session(&self, id: SessionId) -> Vec<Score> {
        self.scores
            .read()
            .iter()
            .filter(|s| s.session_id == id)
            .cloned()
            .collect()
    }
}

impl Default for MemoryScoreRecorder {
    fn default() -> Self {
        Self::new()
    }
}

impl ScoreRecorder for MemoryScoreRecorder {
    fn record(&self, score: Score) -> SessionResult<()> {
        self.scores.write().push(score);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::UserId;
    use duet_rules::{engine_for, ActivityKind};

    fn make_session() -> Session {
        let activity = ActivityKind::Quiz;
        Session::new(
            activity,
            UserId::generate(),
            JoinCode::generate(),
            engine_for(activity).initial_state(),
        )
    }

    #[test]
    fn insert_and_snapshot() {
        let store = SessionStore::new();
        assert!(store.is_empty());

        let session = make_session();
        store.insert(session.clone()).unwrap();
        assert_eq!(store.len(), 1);

        let snap = store.snapshot(session.id).unwrap();
        assert_eq!(snap, session);
    }

    #[test]
    fn code_index_resolves() {
        let store = SessionStore::new();
        let session = make_session();
        store.insert(session.clone()).unwrap();

        assert_eq!(store.id_for_code(&session.code).unwrap(), session.id);
        let missing = JoinCode::new("XXXXXX");
        assert!(matches!(
            store.id_for_code(&missing),
            Err(SessionError::CodeNotFound(_))
        ));
    }

    #[test]
    fn duplicate_code_rejected() {
        let store = SessionStore::new();
        let session = make_session();
        let mut clash = make_session();
        clash.code = session.code.clone();

        store.insert(session).unwrap();
        assert!(matches!(
            store.insert(clash),
            Err(SessionError::DuplicateJoinCode(_))
        ));
    }

    #[test]
    fn unknown_session_not_found() {
        let store = SessionStore::new();
        let id = SessionId::generate();
        assert_eq!(
            store.snapshot(id).unwrap_err(),
            SessionError::SessionNotFound(id)
        );
    }

    #[test]
    fn memory_recorder_filters_by_session() {
        let recorder = MemoryScoreRecorder::new();
        let a = SessionId::generate();
        let b = SessionId::generate();
        for session_id in [a, a, b] {
            recorder
                .record(Score {
                    session_id,
                    user_id: UserId::generate(),
                    score: 1.0,
                    detail: serde_json::Value::Null,
                    recorded_at_ms: 0,
                })
                .unwrap();
        }
        assert_eq!(recorder.for_session(a).len(), 2);
        assert_eq!(recorder.for_session(b).len(), 1);
    }
}
