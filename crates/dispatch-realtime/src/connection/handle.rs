//! Individual realtime connection handle.

use std::sync::atomic::{AtomicBool, Ordering};

use chrono::{DateTime, Utc};
use tokio::sync::mpsc;
use uuid::Uuid;

use dispatch_core::types::ActorKey;

use crate::message::types::OutboundMessage;

/// Unique connection identifier
pub type ConnectionId = Uuid;

/// A handle to a single realtime connection.
///
/// Holds the sender channel for pushing messages to the transport task,
/// plus the actor the connection was authenticated as.
#[derive(Debug)]
pub struct ConnectionHandle {
    /// Unique connection ID
    pub id: ConnectionId,
    /// Actor that owns this connection
    pub actor: ActorKey,
    /// Sender for outbound messages
    sender: mpsc::Sender<OutboundMessage>,
    /// When the connection was established
    pub connected_at: DateTime<Utc>,
    /// Whether the connection is still alive
    alive: AtomicBool,
}

impl ConnectionHandle {
    /// Create a new connection handle with a fresh id
    pub fn new(actor: ActorKey, sender: mpsc::Sender<OutboundMessage>) -> Self {
        Self {
            id: Uuid::new_v4(),
            actor,
            sender,
            connected_at: Utc::now(),
            alive: AtomicBool::new(true),
        }
    }

    /// Queue an outbound message to this connection.
    ///
    /// Returns `false` when the connection is closed or its buffer is full.
    pub fn send(&self, msg: OutboundMessage) -> bool {
        if !self.is_alive() {
            return false;
        }
        match self.sender.try_send(msg) {
            Ok(_) => true,
            Err(mpsc::error::TrySendError::Full(_)) => {
                tracing::warn!(conn_id = %self.id, "Send buffer full, dropping message");
                false
            }
            Err(mpsc::error::TrySendError::Closed(_)) => {
                self.mark_dead();
                false
            }
        }
    }

    /// Close the transport. Fire-and-forget; safe to call more than once.
    pub fn close(&self, reason: &str) {
        if self.alive.swap(false, Ordering::SeqCst) {
            let _ = self.sender.try_send(OutboundMessage::Close {
                reason: reason.to_string(),
            });
        }
    }

    /// Check if connection is alive
    pub fn is_alive(&self) -> bool {
        self.alive.load(Ordering::SeqCst)
    }

    /// Mark connection as dead
    pub fn mark_dead(&self) {
        self.alive.store(false, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dispatch_core::types::ActorRole;

    fn handle(buffer: usize) -> (ConnectionHandle, mpsc::Receiver<OutboundMessage>) {
        let (tx, rx) = mpsc::channel(buffer);
        (ConnectionHandle::new(ActorKey::new(ActorRole::User, "42"), tx), rx)
    }

    #[tokio::test]
    async fn test_send_queues_message() {
        let (handle, mut rx) = handle(4);
        assert!(handle.send(OutboundMessage::notification("ping", None)));
        assert!(matches!(
            rx.recv().await,
            Some(OutboundMessage::Notification { .. })
        ));
    }

    #[tokio::test]
    async fn test_close_is_queued_once() {
        let (handle, mut rx) = handle(4);
        handle.close("superseded");
        handle.close("superseded");
        assert!(!handle.is_alive());
        assert!(!handle.send(OutboundMessage::notification("late", None)));

        assert_eq!(
            rx.recv().await,
            Some(OutboundMessage::Close {
                reason: "superseded".to_string()
            })
        );
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_full_buffer_drops() {
        let (handle, _rx) = handle(1);
        assert!(handle.send(OutboundMessage::notification("a", None)));
        assert!(!handle.send(OutboundMessage::notification("b", None)));
        assert!(handle.is_alive());
    }

    #[test]
    fn test_closed_receiver_marks_dead() {
        let (handle, rx) = handle(1);
        drop(rx);
        assert!(!handle.send(OutboundMessage::notification("a", None)));
        assert!(!handle.is_alive());
    }
}
