//! # Duet Server
//!
//! Reference server for the Duet polling API.
//!
//! This crate provides:
//! - Typed request handlers over the coordinator, relay, and presence roster
//! - A routed JSON surface ([`SessionServer::handle_post`] /
//!   [`SessionServer::handle_get`]) matching the public endpoint paths
//! - The HTTP status mapping for every rejection
//!
//! # Architecture
//!
//! The server is deliberately transport-agnostic: the reference clients
//! poll on a fixed interval, so the contract is plain request/response.
//! An embedding application exposes HTTP endpoints that call
//! [`SessionServer`] with the authenticated caller's [`UserId`]; identity
//! is a consumed interface, never implemented here. Handlers are
//! synchronous; one handler invocation per inbound request, with no
//! in-process session state between requests beyond the shared stores.
//!
//! [`UserId`]: duet_core::UserId

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod error;
mod handler;
mod server;

pub use config::ServerConfig;
pub use error::{ApiError, ApiResult};
pub use handler::{HandlerContext, RequestHandler};
pub use server::SessionServer;
