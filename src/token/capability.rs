//! Capability tokens: HS256 JWTs whose `scope` claim lists what a browser
//! client may do on the calling platform.

use crate::credentials::Credential;
use chrono::{Duration, Utc};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CapabilityError {
    #[error("failed to sign capability token: {0}")]
    Signing(#[from] jsonwebtoken::errors::Error),
    #[error("token lifetime of {0}s is out of range")]
    InvalidTtl(u64),
}

/// Claims carried by a capability token.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CapabilityClaims {
    /// Space-separated scope URIs.
    pub scope: String,
    /// Account identifier of the realm that signed the token.
    pub iss: String,
    /// Expiry, seconds since the epoch.
    pub exp: i64,
}

/// `scope:<service>:<privilege>?<sorted, form-encoded params>`
#[derive(Debug, Clone, PartialEq, Eq)]
struct ScopeUri {
    service: &'static str,
    privilege: &'static str,
    params: BTreeMap<&'static str, String>,
}

impl ScopeUri {
    fn new(service: &'static str, privilege: &'static str) -> Self {
        Self {
            service,
            privilege,
            params: BTreeMap::new(),
        }
    }

    fn param(mut self, key: &'static str, value: impl Into<String>) -> Self {
        self.params.insert(key, value.into());
        self
    }

    fn render(&self) -> String {
        let mut uri = format!("scope:{}:{}", self.service, self.privilege);
        if !self.params.is_empty() {
            let query = url::form_urlencoded::Serializer::new(String::new())
                .extend_pairs(self.params.iter())
                .finish();
            uri.push('?');
            uri.push_str(&query);
        }
        uri
    }
}

/// Accumulates grants for one client, then signs them with a realm secret.
#[derive(Debug, Clone)]
pub struct Capability<'a> {
    credential: &'a Credential,
    client_name: Option<String>,
    outgoing_app_sid: Option<String>,
}

impl<'a> Capability<'a> {
    #[must_use]
    pub const fn new(credential: &'a Credential) -> Self {
        Self {
            credential,
            client_name: None,
            outgoing_app_sid: None,
        }
    }

    /// Let the named client receive calls.
    #[must_use]
    pub fn allow_client_incoming(mut self, client_name: impl Into<String>) -> Self {
        self.client_name = Some(client_name.into());
        self
    }

    /// Let the client place calls through `application_sid`.
    #[must_use]
    pub fn allow_client_outgoing(mut self, application_sid: impl Into<String>) -> Self {
        self.outgoing_app_sid = Some(application_sid.into());
        self
    }

    /// Scope URIs in grant order: incoming first, then outgoing.
    fn scopes(&self) -> Vec<ScopeUri> {
        let mut scopes = Vec::with_capacity(2);
        if let Some(name) = &self.client_name {
            scopes.push(ScopeUri::new("client", "incoming").param("clientName", name.clone()));
        }
        if let Some(app_sid) = &self.outgoing_app_sid {
            let mut outgoing = ScopeUri::new("client", "outgoing").param("appSid", app_sid.clone());
            // The outgoing leg identifies the caller by the incoming name.
            if let Some(name) = &self.client_name {
                outgoing = outgoing.param("clientName", name.clone());
            }
            scopes.push(outgoing);
        }
        scopes
    }

    #[must_use]
    pub fn claims(&self, ttl_secs: u64) -> Option<CapabilityClaims> {
        let ttl = Duration::try_seconds(i64::try_from(ttl_secs).ok()?)?;
        let exp = Utc::now().checked_add_signed(ttl)?.timestamp();
        let scope = self
            .scopes()
            .iter()
            .map(ScopeUri::render)
            .collect::<Vec<_>>()
            .join(" ");

        Some(CapabilityClaims {
            scope,
            iss: self.credential.account_sid.clone(),
            exp,
        })
    }

    /// Sign the accumulated grants; the token expires `ttl_secs` from now.
    pub fn generate(&self, ttl_secs: u64) -> Result<String, CapabilityError> {
        let claims = self
            .claims(ttl_secs)
            .ok_or(CapabilityError::InvalidTtl(ttl_secs))?;
        let key = EncodingKey::from_secret(self.credential.auth_token.as_bytes());
        Ok(encode(&Header::new(Algorithm::HS256), &claims, &key)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{decode, DecodingKey, Validation};

    fn credential() -> Credential {
        Credential::new("AC1", "tok1")
    }

    fn verify(token: &str, secret: &str) -> jsonwebtoken::errors::Result<CapabilityClaims> {
        let validation = Validation::new(Algorithm::HS256);
        decode::<CapabilityClaims>(
            token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &validation,
        )
        .map(|data| data.claims)
    }

    #[test]
    fn incoming_and_outgoing_scopes_are_rendered() {
        let credential = credential();
        let claims = Capability::new(&credential)
            .allow_client_incoming("alice")
            .allow_client_outgoing("AP00000000000000000000000000000000")
            .claims(3600)
            .unwrap();

        assert_eq!(
            claims.scope,
            "scope:client:incoming?clientName=alice \
             scope:client:outgoing?appSid=AP00000000000000000000000000000000&clientName=alice"
        );
        assert_eq!(claims.iss, "AC1");
    }

    #[test]
    fn outgoing_only_has_no_client_name() {
        let credential = credential();
        let claims = Capability::new(&credential)
            .allow_client_outgoing("AP123")
            .claims(60)
            .unwrap();
        assert_eq!(claims.scope, "scope:client:outgoing?appSid=AP123");
    }

    #[test]
    fn client_name_is_form_encoded() {
        let credential = credential();
        let claims = Capability::new(&credential)
            .allow_client_incoming("alice smith&co")
            .claims(60)
            .unwrap();
        assert_eq!(
            claims.scope,
            "scope:client:incoming?clientName=alice+smith%26co"
        );
    }

    #[test]
    fn token_verifies_with_realm_secret_only() {
        let credential = credential();
        let token = Capability::new(&credential)
            .allow_client_incoming("alice")
            .allow_client_outgoing("AP123")
            .generate(3600)
            .unwrap();

        let claims = verify(&token, "tok1").unwrap();
        assert!(claims.scope.contains("clientName=alice"));
        assert!(verify(&token, "other-secret").is_err());
    }

    #[test]
    fn expiry_follows_ttl() {
        let credential = credential();
        let before = Utc::now().timestamp();
        let claims = Capability::new(&credential).claims(600).unwrap();
        let after = Utc::now().timestamp();
        assert!(claims.exp >= before + 600 && claims.exp <= after + 600);
    }

    #[test]
    fn absurd_ttl_is_rejected() {
        let credential = credential();
        let err = Capability::new(&credential).generate(u64::MAX).unwrap_err();
        assert!(matches!(err, CapabilityError::InvalidTtl(_)));
    }
}
