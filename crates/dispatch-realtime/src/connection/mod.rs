//! Realtime connection management: handles, the registry, and connect-time auth.

pub mod authenticator;
pub mod handle;
pub mod registry;

pub use authenticator::{AuthenticatedActor, ConnectRejection, WsAuthenticator};
pub use handle::{ConnectionHandle, ConnectionId};
pub use registry::ConnectionRegistry;
