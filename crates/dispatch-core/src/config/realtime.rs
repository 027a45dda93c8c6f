//! Realtime (WebSocket) gateway configuration.

use serde::{Deserialize, Serialize};

/// Realtime gateway configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RealtimeConfig {
    /// Capacity of each connection's outbound message queue.
    #[serde(default = "default_outbound_buffer")]
    pub outbound_buffer_size: usize,
}

impl Default for RealtimeConfig {
    fn default() -> Self {
        Self {
            outbound_buffer_size: default_outbound_buffer(),
        }
    }
}

fn default_outbound_buffer() -> usize {
    256
}
