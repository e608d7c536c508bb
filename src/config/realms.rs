//! Realm selection configuration.

use super::defaults::{default_allowed_realms, default_credentials_path, default_realm};
use serde::{Deserialize, Deserializer, Serialize};

/// Which realms this instance serves and where their credentials live.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct RealmConfig {
    /// Realms requests may select. Accepts a JSON array or a comma-separated string.
    #[serde(
        default = "default_allowed_realms",
        deserialize_with = "deserialize_realm_list"
    )]
    pub allowed: Vec<String>,
    /// Realm used when a request omits `realm`.
    #[serde(default = "default_realm")]
    pub default_realm: String,
    /// Path of the JSON credential file keyed by realm.
    #[serde(default = "default_credentials_path")]
    pub credentials_path: String,
}

impl Default for RealmConfig {
    fn default() -> Self {
        Self {
            allowed: default_allowed_realms(),
            default_realm: default_realm(),
            credentials_path: default_credentials_path(),
        }
    }
}

impl RealmConfig {
    #[must_use]
    pub fn is_allowed(&self, realm: &str) -> bool {
        self.allowed.iter().any(|allowed| allowed == realm)
    }
}

/// Split a comma-separated realm list, dropping blanks.
#[must_use]
pub fn parse_realm_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|realm| !realm.is_empty())
        .map(str::to_string)
        .collect()
}

fn deserialize_realm_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RealmList {
        Joined(String),
        List(Vec<String>),
    }

    Ok(match RealmList::deserialize(deserializer)? {
        RealmList::Joined(raw) => parse_realm_list(&raw),
        RealmList::List(items) => items
            .iter()
            .flat_map(|item| parse_realm_list(item))
            .collect(),
    })
}
