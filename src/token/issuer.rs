use super::capability::{Capability, CapabilityError};
use super::relay::{RelayCredential, RelayCredentialSource};
use crate::config::TokenConfig;
use crate::credentials::{Credential, CredentialStore};
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum IssueError {
    #[error("realm '{0}' is not served")]
    UnknownRealm(String),
    #[error(transparent)]
    Capability(#[from] CapabilityError),
}

/// Body of `/token`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenResponse {
    pub capability_token: String,
    /// `null` when the relay credential fetch failed.
    pub stun_turn_token: Option<RelayCredential>,
}

/// Signs capability tokens and fetches relay credentials for served realms.
pub struct TokenIssuer {
    store: CredentialStore,
    relay: Arc<dyn RelayCredentialSource>,
    settings: TokenConfig,
}

impl TokenIssuer {
    pub fn new(
        store: CredentialStore,
        relay: Arc<dyn RelayCredentialSource>,
        settings: TokenConfig,
    ) -> Self {
        Self {
            store,
            relay,
            settings,
        }
    }

    #[must_use]
    pub fn serves(&self, realm: &str) -> bool {
        self.store.contains(realm)
    }

    #[must_use]
    pub fn store(&self) -> &CredentialStore {
        &self.store
    }

    fn credential(&self, realm: &str) -> Result<&Credential, IssueError> {
        self.store
            .get(realm)
            .ok_or_else(|| IssueError::UnknownRealm(realm.to_string()))
    }

    /// Sign a token granting incoming calls to `name` (when given) and the
    /// configured outgoing application.
    pub fn capability_token(&self, realm: &str, name: Option<&str>) -> Result<String, IssueError> {
        let credential = self.credential(realm)?;
        let mut capability = Capability::new(credential);
        if let Some(name) = name {
            capability = capability.allow_client_incoming(name);
        }
        let token = capability
            .allow_client_outgoing(self.settings.outgoing_application_sid.as_str())
            .generate(self.settings.ttl_secs)?;
        Ok(token)
    }

    /// Best effort: any failure is logged and yields `None`.
    pub async fn relay_credential(&self, realm: &str) -> Option<RelayCredential> {
        let credential = self.store.get(realm)?;
        match self.relay.fetch(realm, credential).await {
            Ok(relay) => Some(relay),
            Err(err) => {
                tracing::warn!(%realm, error = %err, "Relay credential fetch failed; omitting");
                None
            }
        }
    }

    /// Capability token plus relay credential for `/token`.
    pub async fn issue(&self, realm: &str, name: Option<&str>) -> Result<TokenResponse, IssueError> {
        let capability_token = self.capability_token(realm, name)?;
        let stun_turn_token = self.relay_credential(realm).await;
        Ok(TokenResponse {
            capability_token,
            stun_turn_token,
        })
    }
}
