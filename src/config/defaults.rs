//! Default value functions for configuration fields.
//!
//! These back the `#[serde(default = ...)]` attributes throughout the
//! configuration system, grouped by section.

use super::logging::LogFormat;
use super::security::ClientAuthMode;

// =============================================================================
// Port & Root Config
// =============================================================================

pub const fn default_port() -> u16 {
    8080
}

// =============================================================================
// Realm Defaults
// =============================================================================

pub fn default_allowed_realms() -> Vec<String> {
    vec!["prod".to_string()]
}

pub fn default_realm() -> String {
    "prod".to_string()
}

pub fn default_credentials_path() -> String {
    "twilio_credentials.json".to_string()
}

// =============================================================================
// Token Defaults
// =============================================================================

/// Lifetime of a freshly minted capability token (seconds).
pub const fn default_token_ttl_secs() -> u64 {
    3600
}

/// Placeholder application SID granted on the outgoing scope.
pub fn default_outgoing_application_sid() -> String {
    "AP00000000000000000000000000000000".to_string()
}

// =============================================================================
// Static File Defaults
// =============================================================================

pub fn default_static_root() -> String {
    ".".to_string()
}

// =============================================================================
// Security Defaults
// =============================================================================

pub fn default_cors_origins() -> String {
    "*".to_string()
}

pub fn default_basic_auth_path() -> String {
    "basic_auth.json".to_string()
}

pub const fn default_client_auth_mode() -> ClientAuthMode {
    ClientAuthMode::None
}

// =============================================================================
// Logging Defaults
// =============================================================================

pub fn default_log_dir() -> String {
    "logs".to_string()
}

pub fn default_log_filename() -> String {
    "server.log".to_string()
}

pub fn default_rotation() -> String {
    "daily".to_string()
}

pub const fn default_enable_file_logging() -> bool {
    false
}

pub const fn default_log_format() -> LogFormat {
    LogFormat::Json
}
