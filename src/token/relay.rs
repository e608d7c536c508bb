//! Ephemeral relay (STUN/TURN) credentials minted by the platform REST API.

use crate::config::RelayConfig;
use crate::credentials::Credential;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RelayError {
    #[error("relay credential request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("relay credential endpoint answered {status}")]
    Rejected { status: reqwest::StatusCode },
    #[error("invalid relay API base URL '{base}': {source}")]
    InvalidBaseUrl {
        base: String,
        #[source]
        source: url::ParseError,
    },
}

/// One ICE server entry as returned by the platform.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct IceServer {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub urls: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credential: Option<String>,
}

/// Short-lived relay login plus the servers it is valid for.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RelayCredential {
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub account_sid: Option<String>,
    /// Lifetime in seconds; the platform sends it as a string.
    #[serde(default)]
    pub ttl: Option<String>,
    #[serde(default)]
    pub ice_servers: Vec<IceServer>,
    #[serde(default)]
    pub date_created: Option<String>,
    #[serde(default)]
    pub date_updated: Option<String>,
}

/// Something that can mint relay credentials for a realm.
#[async_trait]
pub trait RelayCredentialSource: Send + Sync {
    async fn fetch(
        &self,
        realm: &str,
        credential: &Credential,
    ) -> Result<RelayCredential, RelayError>;
}

/// REST API root for a realm: production has no realm label in the host.
#[must_use]
pub fn api_base_for_realm(realm: &str) -> String {
    if realm == "prod" {
        "https://api.twilio.com".to_string()
    } else {
        format!("https://api.{realm}.twilio.com")
    }
}

/// Calls `POST /2010-04-01/Accounts/{sid}/Tokens.json` on the platform API.
#[derive(Debug, Clone)]
pub struct PlatformRelayClient {
    client: reqwest::Client,
    base_url_override: Option<String>,
}

impl PlatformRelayClient {
    pub fn new(config: &RelayConfig) -> Result<Self, RelayError> {
        let mut builder = reqwest::Client::builder();
        if let Some(secs) = config.request_timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        Ok(Self {
            client: builder.build()?,
            base_url_override: config.api_base_url.clone(),
        })
    }

    fn tokens_url(&self, realm: &str, account_sid: &str) -> Result<url::Url, RelayError> {
        let base = self
            .base_url_override
            .clone()
            .unwrap_or_else(|| api_base_for_realm(realm));
        let parse = |raw: &str| {
            url::Url::parse(raw).map_err(|source| RelayError::InvalidBaseUrl {
                base: base.clone(),
                source,
            })
        };

        let mut url = parse(&base)?;
        url.path_segments_mut()
            .map_err(|()| RelayError::InvalidBaseUrl {
                base: base.clone(),
                source: url::ParseError::RelativeUrlWithCannotBeABaseBase,
            })?
            .pop_if_empty()
            .extend(["2010-04-01", "Accounts", account_sid, "Tokens.json"]);
        Ok(url)
    }
}

#[async_trait]
impl RelayCredentialSource for PlatformRelayClient {
    async fn fetch(
        &self,
        realm: &str,
        credential: &Credential,
    ) -> Result<RelayCredential, RelayError> {
        let url = self.tokens_url(realm, &credential.account_sid)?;
        tracing::debug!(%realm, %url, "Requesting relay credentials");

        let response = self
            .client
            .post(url)
            .basic_auth(&credential.account_sid, Some(&credential.auth_token))
            .header(reqwest::header::CONTENT_LENGTH, 0)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(RelayError::Rejected { status });
        }

        Ok(response.json::<RelayCredential>().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn sample_body() -> serde_json::Value {
        serde_json::json!({
            "username": "b45d0cba",
            "password": "vf2qRCHP",
            "account_sid": "AC1",
            "ttl": "86400",
            "ice_servers": [
                {"url": "stun:global.stun.twilio.com:3478?transport=udp"},
                {
                    "url": "turn:global.turn.twilio.com:3478?transport=udp",
                    "username": "b45d0cba",
                    "credential": "vf2qRCHP"
                }
            ],
            "date_created": "Thu, 11 Dec 2014 18:23:10 +0000",
            "date_updated": "Thu, 11 Dec 2014 18:23:10 +0000"
        })
    }

    fn client_for(server: &MockServer) -> PlatformRelayClient {
        PlatformRelayClient::new(&RelayConfig {
            api_base_url: Some(server.uri()),
            request_timeout_secs: Some(5),
        })
        .unwrap()
    }

    #[test]
    fn api_base_is_realm_specific() {
        assert_eq!(api_base_for_realm("prod"), "https://api.twilio.com");
        assert_eq!(api_base_for_realm("dev"), "https://api.dev.twilio.com");
        assert_eq!(api_base_for_realm("stage"), "https://api.stage.twilio.com");
    }

    #[test]
    fn tokens_url_is_built_under_base() {
        let client = PlatformRelayClient::new(&RelayConfig::default()).unwrap();
        let url = client.tokens_url("stage", "AC1").unwrap();
        assert_eq!(
            url.as_str(),
            "https://api.stage.twilio.com/2010-04-01/Accounts/AC1/Tokens.json"
        );
    }

    #[tokio::test]
    async fn fetch_posts_with_basic_auth_and_decodes() {
        let server = MockServer::start().await;
        // "AC1:tok1"
        Mock::given(method("POST"))
            .and(path("/2010-04-01/Accounts/AC1/Tokens.json"))
            .and(header("authorization", "Basic QUMxOnRvazE="))
            .respond_with(ResponseTemplate::new(201).set_body_json(sample_body()))
            .expect(1)
            .mount(&server)
            .await;

        let relay = client_for(&server)
            .fetch("dev", &Credential::new("AC1", "tok1"))
            .await
            .unwrap();

        assert_eq!(relay.username, "b45d0cba");
        assert_eq!(relay.ttl.as_deref(), Some("86400"));
        assert_eq!(relay.ice_servers.len(), 2);
        assert_eq!(relay.ice_servers[1].credential.as_deref(), Some("vf2qRCHP"));
    }

    #[tokio::test]
    async fn remote_rejection_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .fetch("dev", &Credential::new("AC1", "wrong"))
            .await
            .unwrap_err();
        assert!(matches!(err, RelayError::Rejected { status } if status.as_u16() == 401));
    }

    #[tokio::test]
    async fn undecodable_body_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .fetch("dev", &Credential::new("AC1", "tok1"))
            .await
            .unwrap_err();
        assert!(matches!(err, RelayError::Transport(_)));
    }
}
