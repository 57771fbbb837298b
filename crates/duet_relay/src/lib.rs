//! # Duet Relay
//!
//! Append-only, strictly-ordered per-room message log plus a presence
//! roster, used for low-level coordination (e.g. connecting peers for a
//! live co-watching session) independent of the turn-based model.
//!
//! Polling substitutes for a push channel: writers [`SignalRelay::append`]
//! and readers call [`SignalRelay::fetch_since`] with the last message id
//! they have seen (their watermark). Message ids are gapless and
//! per-room; rows are immutable once appended.

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod error;
mod presence;
mod relay;

pub use error::{RelayError, RelayResult};
pub use presence::{PresenceFlags, PresenceRoster, PresenceStatus, RoomPresence};
pub use relay::{SignalMessage, SignalRelay};
