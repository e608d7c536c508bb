use crate::error::StartupConfigError;
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::path::Path;

pub const CREDENTIAL_FILE_KIND: &str = "credential";

/// Account identifier and secret for one realm.
#[derive(Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Credential {
    pub account_sid: String,
    pub auth_token: String,
}

impl Credential {
    pub fn new(account_sid: impl Into<String>, auth_token: impl Into<String>) -> Self {
        Self {
            account_sid: account_sid.into(),
            auth_token: auth_token.into(),
        }
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("account_sid", &self.account_sid)
            .field("auth_token", &"<redacted>")
            .finish()
    }
}

/// Immutable realm -> credential map. Only allow-listed realms are kept.
#[derive(Debug, Clone, Default)]
pub struct CredentialStore {
    by_realm: HashMap<String, Credential>,
}

impl CredentialStore {
    /// Read the credential file and keep the entries for `allowed` realms.
    ///
    /// Missing or malformed files are fatal, as is a malformed entry for an
    /// allow-listed realm. Entries for other realms are never inspected.
    /// Allow-listed realms the file does
    /// not mention are skipped with a warning; if that leaves nothing to serve
    /// the load fails.
    pub fn load(path: &Path, allowed: &[String]) -> Result<Self, StartupConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| StartupConfigError::Read {
            kind: CREDENTIAL_FILE_KIND,
            path: path.to_path_buf(),
            source,
        })?;
        let parse_error = |source| StartupConfigError::Parse {
            kind: CREDENTIAL_FILE_KIND,
            path: path.to_path_buf(),
            source,
        };

        // Only allow-listed entries have to be well formed.
        let mut raw_entries: HashMap<String, Value> =
            serde_json::from_str(&raw).map_err(parse_error)?;
        let mut entries = HashMap::with_capacity(allowed.len());
        for realm in allowed {
            if let Some(value) = raw_entries.remove(realm) {
                let credential =
                    serde_json::from_value::<Credential>(value).map_err(parse_error)?;
                entries.insert(realm.clone(), credential);
            }
        }

        let store = Self::from_entries(entries, allowed);
        if store.is_empty() {
            return Err(StartupConfigError::NoUsableRealms {
                allowed: allowed.join(","),
                path: path.to_path_buf(),
            });
        }

        tracing::info!(
            path = %path.display(),
            realms = ?store.realms(),
            "Loaded realm credentials"
        );
        Ok(store)
    }

    /// Build a store from already-parsed entries, filtered by `allowed`.
    pub fn from_entries(mut entries: HashMap<String, Credential>, allowed: &[String]) -> Self {
        let mut by_realm = HashMap::with_capacity(allowed.len());
        for realm in allowed {
            match entries.remove(realm) {
                Some(credential) => {
                    by_realm.insert(realm.clone(), credential);
                }
                None => {
                    tracing::warn!(%realm, "Allowed realm has no credentials; it will not be served");
                }
            }
        }
        Self { by_realm }
    }

    #[must_use]
    pub fn get(&self, realm: &str) -> Option<&Credential> {
        self.by_realm.get(realm)
    }

    #[must_use]
    pub fn contains(&self, realm: &str) -> bool {
        self.by_realm.contains_key(realm)
    }

    /// Realms with credentials, sorted.
    #[must_use]
    pub fn realms(&self) -> Vec<&str> {
        let mut realms: Vec<&str> = self.by_realm.keys().map(String::as_str).collect();
        realms.sort_unstable();
        realms
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_realm.is_empty()
    }
}
