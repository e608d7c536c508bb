//! Root configuration types.

use super::defaults::default_port;
use super::logging::LoggingConfig;
use super::realms::RealmConfig;
use super::relay::RelayConfig;
use super::security::SecurityConfig;
use super::static_files::StaticFilesConfig;
use super::token::TokenConfig;
use serde::{Deserialize, Serialize};

/// Root configuration struct for the token server.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Config {
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default)]
    pub realms: RealmConfig,
    #[serde(default)]
    pub token: TokenConfig,
    #[serde(default)]
    pub relay: RelayConfig,
    #[serde(default)]
    pub static_files: StaticFilesConfig,
    #[serde(default)]
    pub security: SecurityConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: default_port(),
            realms: RealmConfig::default(),
            token: TokenConfig::default(),
            relay: RelayConfig::default(),
            static_files: StaticFilesConfig::default(),
            security: SecurityConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}
