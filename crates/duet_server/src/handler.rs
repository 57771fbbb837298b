//! Typed request handlers for the polling endpoints.

use crate::config::ServerConfig;
use crate::error::ApiResult;
use duet_core::{
    unix_millis, JoinCode, MemoryScoreRecorder, RoomId, ScoreRecorder, SessionCoordinator,
    SessionId, SessionStore, UserId,
};
use duet_protocol::{
    AppendMessageRequest, CreateSessionRequest, HeartbeatRequest, MessageAppended, MessageList,
    MoveAccepted, PresenceEntry, RosterResponse, SessionCreated, SessionJoined, SessionSnapshot,
    SubmitMoveRequest, TerminalOutcome,
};
use duet_relay::{PresenceRoster, SignalRelay};
use std::sync::Arc;

/// Shared state for request handling.
pub struct HandlerContext {
    /// Server configuration.
    pub config: ServerConfig,
    /// The session coordinator (sole writer of session state).
    pub coordinator: SessionCoordinator,
    /// The signal relay.
    pub relay: SignalRelay,
    /// The watch-party presence roster.
    pub presence: PresenceRoster,
}

impl HandlerContext {
    /// Creates a context with fresh in-memory stores.
    #[must_use]
    pub fn new(config: ServerConfig) -> Self {
        Self::with_recorder(config, Arc::new(MemoryScoreRecorder::new()))
    }

    /// Creates a context writing scores through the given recorder.
    #[must_use]
    pub fn with_recorder(config: ServerConfig, scores: Arc<dyn ScoreRecorder>) -> Self {
        Self {
            config,
            coordinator: SessionCoordinator::new(Arc::new(SessionStore::new()), scores),
            relay: SignalRelay::new(),
            presence: PresenceRoster::new(),
        }
    }
}

/// Handler for polling API requests.
///
/// Every method takes the authenticated caller where the operation needs
/// an actor; the embedding transport supplies it per request.
pub struct RequestHandler {
    context: Arc<HandlerContext>,
}

impl RequestHandler {
    /// Creates a new request handler.
    #[must_use]
    pub fn new(context: Arc<HandlerContext>) -> Self {
        Self { context }
    }

    /// `POST /sessions`
    pub fn create_session(
        &self,
        caller: UserId,
        request: &CreateSessionRequest,
    ) -> ApiResult<SessionCreated> {
        let session = self
            .context
            .coordinator
            .create_session(request.activity, caller)?;
        Ok(SessionCreated::of(&session))
    }

    /// `POST /sessions/{code}/join`
    pub fn join_session(&self, caller: UserId, code: &JoinCode) -> ApiResult<SessionJoined> {
        let session = self.context.coordinator.join_session(code, caller)?;
        Ok(SessionJoined::of(&session))
    }

    /// `GET /sessions/{id}`. Lock-free snapshot; safe to poll at any rate.
    pub fn get_session(&self, id: SessionId) -> ApiResult<SessionSnapshot> {
        let session = self.context.coordinator.get_session(id)?;
        Ok(SessionSnapshot::of(&session))
    }

    /// `POST /sessions/{id}/moves`
    pub fn submit_move(
        &self,
        caller: UserId,
        id: SessionId,
        request: &SubmitMoveRequest,
    ) -> ApiResult<MoveAccepted> {
        let record =
            self.context
                .coordinator
                .submit_move(id, caller, request.version, &request.payload)?;
        let terminal = record
            .terminal
            .map(|t| TerminalOutcome::of(t, &record.session));
        Ok(MoveAccepted {
            state: record.session.state,
            version: record.session.version,
            turn_owner_id: record.session.turn_owner,
            terminal,
        })
    }

    /// `POST /rooms/{id}/messages`
    pub fn append_message(
        &self,
        caller: UserId,
        room: RoomId,
        request: AppendMessageRequest,
    ) -> ApiResult<MessageAppended> {
        let message_id = self
            .context
            .relay
            .append(room, caller, request.kind, request.payload);
        Ok(MessageAppended { message_id })
    }

    /// `GET /rooms/{id}/messages?since={id}&limit={n}`
    ///
    /// The limit is clamped to the configured maximum batch.
    pub fn fetch_messages(
        &self,
        room: RoomId,
        since: u64,
        limit: Option<usize>,
    ) -> ApiResult<MessageList> {
        let limit = limit
            .unwrap_or(self.context.config.default_fetch_batch)
            .min(self.context.config.max_fetch_batch);
        let messages = self.context.relay.fetch_since(room, since, limit)?;
        let latest_id = self.context.relay.latest_id(room)?;
        Ok(MessageList {
            messages,
            latest_id,
        })
    }

    /// `POST /rooms/{id}/presence`. Heartbeat upsert.
    pub fn heartbeat(
        &self,
        caller: UserId,
        room: RoomId,
        request: &HeartbeatRequest,
    ) -> ApiResult<PresenceEntry> {
        let presence = self
            .context
            .presence
            .heartbeat(room, caller, request.flags, request.status);
        Ok(PresenceEntry {
            presence,
            stale: false,
        })
    }

    /// `GET /rooms/{id}/presence`. Roster with reader-computed staleness.
    pub fn room_presence(&self, room: RoomId) -> ApiResult<RosterResponse> {
        let now = unix_millis();
        let ttl = self.context.config.presence_ttl_ms;
        let participants = self
            .context
            .presence
            .participants(room)
            .into_iter()
            .map(|presence| PresenceEntry {
                stale: presence.is_stale(now, ttl),
                presence,
            })
            .collect();
        Ok(RosterResponse { participants })
    }
}
