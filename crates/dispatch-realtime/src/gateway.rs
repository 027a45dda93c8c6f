//! Realtime gateway: binds authenticated transports to the connection
//! registry, one live connection per actor.

use std::fmt::Display;
use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use dispatch_core::types::ActorKey;

use crate::connection::authenticator::{ConnectRejection, WsAuthenticator};
use crate::connection::handle::{ConnectionHandle, ConnectionId};
use crate::connection::registry::ConnectionRegistry;
use crate::message::types::{OutboundMessage, SocketResponse};

/// Close reason sent to a connection displaced by a newer one.
pub const REASON_SUPERSEDED: &str = "superseded by a new connection";
/// Close reason sent when the actor's sessions are revoked.
pub const REASON_REVOKED: &str = "session revoked";
/// Close reason sent during server shutdown.
pub const REASON_SHUTDOWN: &str = "server shutting down";

/// Connection lifecycle entry point for realtime transports.
#[derive(Debug, Clone)]
pub struct RealtimeGateway {
    registry: Arc<ConnectionRegistry>,
    authenticator: WsAuthenticator,
}

impl RealtimeGateway {
    /// Creates a gateway over a shared registry.
    pub fn new(registry: Arc<ConnectionRegistry>, authenticator: WsAuthenticator) -> Self {
        Self {
            registry,
            authenticator,
        }
    }

    /// The underlying registry.
    pub fn registry(&self) -> &Arc<ConnectionRegistry> {
        &self.registry
    }

    /// Authenticates a new transport and registers it for its actor.
    ///
    /// The connect reply is always queued to `sender` first. On success any
    /// connection the actor already had is removed from the registry and
    /// closed before the new one is recorded.
    pub async fn on_connect(
        &self,
        access_token: &str,
        role: &str,
        sender: mpsc::Sender<OutboundMessage>,
    ) -> Result<Arc<ConnectionHandle>, ConnectRejection> {
        let actor = match self.authenticator.authenticate(access_token, role).await {
            Ok(actor) => actor,
            Err(rejection) => {
                warn!(role, error = %rejection, "Realtime connection rejected");
                let _ = sender.try_send(OutboundMessage::RecvConnect(rejection.response()));
                return Err(rejection);
            }
        };

        let handle = Arc::new(ConnectionHandle::new(actor.key, sender));

        if let Some(previous) = self.registry.replace(Arc::clone(&handle)) {
            previous.close(REASON_SUPERSEDED);
            info!(
                actor = %handle.actor,
                old_conn_id = %previous.id,
                new_conn_id = %handle.id,
                "Evicted previous realtime connection"
            );
        }

        handle.send(OutboundMessage::RecvConnect(SocketResponse::success()));

        info!(
            conn_id = %handle.id,
            actor = %handle.actor,
            jti = %actor.claims.jti,
            "Realtime connection registered"
        );

        Ok(handle)
    }

    /// Forgets a connection whose transport has closed.
    ///
    /// A late notification for a connection that was already superseded or
    /// removed is a no-op.
    pub fn on_disconnect(&self, conn_id: &ConnectionId, reason: &str) {
        match self.registry.remove_by_connection_id(conn_id) {
            Some(handle) => {
                handle.mark_dead();
                info!(conn_id = %conn_id, actor = %handle.actor, reason, "Realtime connection closed");
            }
            None => debug!(conn_id = %conn_id, reason, "Disconnect for unregistered connection"),
        }
    }

    /// Forgets a connection whose transport failed.
    pub fn on_error(&self, conn_id: &ConnectionId, err: &dyn Display) {
        warn!(conn_id = %conn_id, error = %err, "Realtime connection error");
        self.on_disconnect(conn_id, "transport error");
    }

    /// Removes and closes the actor's connection, if it has one.
    pub fn evict(&self, key: &ActorKey, reason: &str) -> bool {
        match self.registry.remove_by_actor_key(key) {
            Some(handle) => {
                handle.close(reason);
                info!(conn_id = %handle.id, actor = %key, reason, "Realtime connection evicted");
                true
            }
            None => false,
        }
    }

    /// Pushes `message` to every listed actor that is connected.
    ///
    /// Returns the number of connections the message was queued to.
    pub fn notify(&self, keys: &[ActorKey], message: &OutboundMessage) -> usize {
        let delivered = self
            .registry
            .lookup_many(keys)
            .iter()
            .filter(|handle| handle.send(message.clone()))
            .count();

        debug!(targets = keys.len(), delivered, "Realtime notification sent");
        delivered
    }

    /// Closes every registered connection.
    pub fn shutdown(&self) {
        let handles = self.registry.drain();
        for handle in &handles {
            handle.close(REASON_SHUTDOWN);
        }
        info!(count = handles.len(), "All realtime connections closed");
    }
}
