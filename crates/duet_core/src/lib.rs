//! # Duet Core
//!
//! Session model, store, and move coordinator for Duet.
//!
//! This crate provides:
//! - Newtype ids ([`SessionId`], [`UserId`], [`RoomId`]) and join codes
//! - The [`Session`] record: participants, turn owner, status, tagged
//!   state, and a strictly monotonic version
//! - [`SessionStore`]: per-session row locks with lock-free snapshot reads
//! - [`SessionCoordinator`]: the only writer of session state
//!
//! # Concurrency
//!
//! `submit_move` is the single mutating game path. It holds an exclusive
//! per-session lock across precondition checks, rule evaluation, and the
//! commit; rule evaluation is pure and does no I/O, so the critical
//! section is short. Reads clone the latest committed snapshot and never
//! touch the row lock, so pollers never block writers. Two racing moves
//! carrying the same expected version resolve to exactly one commit.

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod coordinator;
mod error;
mod session;
mod store;
mod types;

pub use coordinator::{MoveRecord, SessionCoordinator};
pub use error::{SessionError, SessionResult};
pub use session::{Score, Session, SessionStatus};
pub use store::{MemoryScoreRecorder, ScoreRecorder, SessionStore};
pub use types::{unix_millis, JoinCode, RoomId, SessionId, UserId};
