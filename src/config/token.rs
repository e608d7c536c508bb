//! Capability token issuance settings.

use super::defaults::{default_outgoing_application_sid, default_token_ttl_secs};
use serde::{Deserialize, Serialize};

/// Settings applied to every capability token this server signs.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct TokenConfig {
    /// Token lifetime in seconds
    #[serde(default = "default_token_ttl_secs")]
    pub ttl_secs: u64,
    /// Application SID granted on the outgoing-call scope
    #[serde(default = "default_outgoing_application_sid")]
    pub outgoing_application_sid: String,
}

impl Default for TokenConfig {
    fn default() -> Self {
        Self {
            ttl_secs: default_token_ttl_secs(),
            outgoing_application_sid: default_outgoing_application_sid(),
        }
    }
}
