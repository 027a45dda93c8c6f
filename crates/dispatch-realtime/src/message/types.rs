//! Outbound WebSocket message type definitions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Reply code sent when a connection is accepted.
pub const CODE_SUCCESS: &str = "success";
/// Reply code for token and role rejections.
pub const CODE_UNAUTHORIZED: &str = "401";
/// Reply code when verification failed on infrastructure.
pub const CODE_INTERNAL: &str = "500";

/// Body of the connect reply: `{code, msg, data}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SocketResponse {
    /// `"success"` or an error code.
    pub code: String,
    /// Human-readable reason, absent on success.
    pub msg: Option<String>,
    /// Optional payload.
    pub data: Option<serde_json::Value>,
}

impl SocketResponse {
    /// A successful connect reply.
    pub fn success() -> Self {
        Self {
            code: CODE_SUCCESS.to_string(),
            msg: None,
            data: None,
        }
    }

    /// An error reply with the given code and message.
    pub fn error_with_code(code: &str, msg: impl Into<String>) -> Self {
        Self {
            code: code.to_string(),
            msg: Some(msg.into()),
            data: None,
        }
    }

    /// Whether this reply accepted the connection.
    pub fn is_success(&self) -> bool {
        self.code == CODE_SUCCESS
    }
}

/// Messages queued to a connection's outbound channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "payload", rename_all = "kebab-case")]
pub enum OutboundMessage {
    /// Reply to the connect handshake.
    RecvConnect(SocketResponse),
    /// Server push to a connected actor.
    Notification {
        /// Unique message ID.
        id: Uuid,
        /// Application event name.
        event_type: String,
        /// Event body.
        data: Option<serde_json::Value>,
        /// Timestamp.
        timestamp: DateTime<Utc>,
    },
    /// Instructs the transport to close. Not forwarded as a text frame.
    Close {
        /// Why the connection is being closed.
        reason: String,
    },
}

impl OutboundMessage {
    /// Builds a notification stamped with a fresh id and the current time.
    pub fn notification(event_type: impl Into<String>, data: Option<serde_json::Value>) -> Self {
        Self::Notification {
            id: Uuid::new_v4(),
            event_type: event_type.into(),
            data,
            timestamp: Utc::now(),
        }
    }
}
