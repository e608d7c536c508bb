//! Relay (STUN/TURN) credential fetch configuration.

use serde::{Deserialize, Serialize};

/// How the server reaches the platform's token-minting endpoint.
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct RelayConfig {
    /// Replaces the realm-derived API base URL (e.g. `http://127.0.0.1:9000`).
    #[serde(default)]
    pub api_base_url: Option<String>,
    /// Request timeout in seconds. Unset means the call may block indefinitely.
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
}
