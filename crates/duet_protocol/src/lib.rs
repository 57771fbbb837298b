//! # Duet Protocol
//!
//! JSON request/response bodies for the Duet polling API.
//!
//! This is a pure types crate with no I/O: every external endpoint has a
//! request and/or response struct here, serialized as JSON. The caller's
//! identity travels out of band (supplied per request by the embedding
//! transport), so no body carries credentials.

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod messages;

pub use messages::{
    AppendMessageRequest, CreateSessionRequest, ErrorBody, ErrorReason, HeartbeatRequest,
    MessageAppended, MessageList, MoveAccepted, PresenceEntry, RosterResponse, SessionCreated,
    SessionJoined, SessionSnapshot, SubmitMoveRequest, TerminalOutcome,
};
