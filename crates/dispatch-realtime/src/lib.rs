//! # dispatch-realtime
//!
//! Realtime connection identity for Dispatch. Provides:
//!
//! - An in-process registry holding at most one live connection per actor
//! - Connect-time authentication of the `access_token` and `role` query
//! - A gateway that evicts and closes superseded connections and ignores
//!   late disconnects from them
//! - Fan-out pushes to connected actors

pub mod connection;
pub mod gateway;
pub mod message;

pub use connection::{ConnectionHandle, ConnectionId, ConnectionRegistry, WsAuthenticator};
pub use gateway::RealtimeGateway;
pub use message::{OutboundMessage, SocketResponse};
