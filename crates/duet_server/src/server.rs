//! The routed JSON surface.

use crate::config::ServerConfig;
use crate::error::{ApiError, ApiResult};
use crate::handler::{HandlerContext, RequestHandler};
use duet_core::{JoinCode, RoomId, SessionId, UserId};
use duet_protocol::{AppendMessageRequest, CreateSessionRequest, HeartbeatRequest, SubmitMoveRequest};
use serde::Serialize;
use std::str::FromStr;
use std::sync::Arc;
use tracing::warn;

/// A status code paired with a JSON body.
pub type Response = (u16, Vec<u8>);

/// The session server facade.
///
/// [`SessionServer::handle_post`] and [`SessionServer::handle_get`] route
/// raw paths and bodies onto the typed handlers and render every outcome
/// as a JSON response. An embedding HTTP layer only has to authenticate
/// the caller and forward the path, body, and [`UserId`].
pub struct SessionServer {
    handler: RequestHandler,
}

impl SessionServer {
    /// Creates a server over fresh in-memory state.
    #[must_use]
    pub fn new(config: ServerConfig) -> Self {
        Self::with_context(Arc::new(HandlerContext::new(config)))
    }

    /// Creates a server over an existing context.
    #[must_use]
    pub fn with_context(context: Arc<HandlerContext>) -> Self {
        Self {
            handler: RequestHandler::new(context),
        }
    }

    /// The underlying typed handler, for embedders that skip routing.
    #[must_use]
    pub fn handler(&self) -> &RequestHandler {
        &self.handler
    }

    /// Routes a POST request.
    pub fn handle_post(&self, path: &str, caller: UserId, body: &[u8]) -> Response {
        render(self.route_post(path, caller, body))
    }

    /// Routes a GET request. Reads carry no caller identity.
    pub fn handle_get(&self, path: &str) -> Response {
        render(self.route_get(path))
    }

    fn route_post(&self, path: &str, caller: UserId, body: &[u8]) -> ApiResult<Vec<u8>> {
        let (path, _) = split_query(path);
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        match segments.as_slice() {
            ["sessions"] => {
                let request: CreateSessionRequest = decode(body)?;
                encode(&self.handler.create_session(caller, &request)?)
            }
            ["sessions", code, "join"] => {
                let code = JoinCode::new(*code);
                encode(&self.handler.join_session(caller, &code)?)
            }
            ["sessions", id, "moves"] => {
                let id: SessionId = parse_segment(id)?;
                let request: SubmitMoveRequest = decode(body)?;
                encode(&self.handler.submit_move(caller, id, &request)?)
            }
            ["rooms", id, "messages"] => {
                let room: RoomId = parse_segment(id)?;
                let request: AppendMessageRequest = decode(body)?;
                encode(&self.handler.append_message(caller, room, request)?)
            }
            ["rooms", id, "presence"] => {
                let room: RoomId = parse_segment(id)?;
                let request: HeartbeatRequest = decode(body)?;
                encode(&self.handler.heartbeat(caller, room, &request)?)
            }
            _ => Err(ApiError::UnknownRoute(path.to_owned())),
        }
    }

    fn route_get(&self, path: &str) -> ApiResult<Vec<u8>> {
        let (path, query) = split_query(path);
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        match segments.as_slice() {
            ["sessions", id] => {
                let id: SessionId = parse_segment(id)?;
                encode(&self.handler.get_session(id)?)
            }
            ["rooms", id, "messages"] => {
                let room: RoomId = parse_segment(id)?;
                let since = query_param(query, "since")?.unwrap_or(0);
                let limit = query_param(query, "limit")?.map(|n: u64| n as usize);
                encode(&self.handler.fetch_messages(room, since, limit)?)
            }
            ["rooms", id, "presence"] => {
                let room: RoomId = parse_segment(id)?;
                encode(&self.handler.room_presence(room)?)
            }
            _ => Err(ApiError::UnknownRoute(path.to_owned())),
        }
    }
}

fn split_query(path: &str) -> (&str, &str) {
    match path.split_once('?') {
        Some((path, query)) => (path, query),
        None => (path, ""),
    }
}

fn parse_segment<T>(segment: &str) -> ApiResult<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    segment
        .parse()
        .map_err(|err| ApiError::BadRequest(format!("bad path segment {segment:?}: {err}")))
}

fn query_param<T>(query: &str, name: &str) -> ApiResult<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    for pair in query.split('&').filter(|p| !p.is_empty()) {
        let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
        if key == name {
            let parsed = value
                .parse()
                .map_err(|err| ApiError::BadRequest(format!("bad {name} value: {err}")))?;
            return Ok(Some(parsed));
        }
    }
    Ok(None)
}

fn decode<T: serde::de::DeserializeOwned>(body: &[u8]) -> ApiResult<T> {
    serde_json::from_slice(body).map_err(|err| ApiError::BadRequest(err.to_string()))
}

fn encode<T: Serialize>(value: &T) -> ApiResult<Vec<u8>> {
    serde_json::to_vec(value).map_err(|err| ApiError::BadRequest(err.to_string()))
}

fn render(result: ApiResult<Vec<u8>>) -> Response {
    match result {
        Ok(body) => (200, body),
        Err(err) => {
            let status = err.status();
            if status >= 500 {
                warn!(%err, "request failed");
            }
            let body = serde_json::to_vec(&err.body()).unwrap_or_else(|_| b"{}".to_vec());
            (status, body)
        }
    }
}
