use super::hostnames::{event_gateway, ws_server, PRODUCTION_REALM};
use crate::token::{IceServer, IssueError, TokenIssuer};
use serde::Serialize;

/// Body of `/config`.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ConfigPayload {
    pub realm: String,
    pub event_gateway: String,
    pub ws_server: String,
    /// Only production carries this key; its value is `null` when the relay
    /// fetch failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ice_servers: Option<Option<Vec<IceServer>>>,
    /// Only present when the request named a client.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub capability_token: Option<String>,
}

/// Compose hostnames, relay servers and an optional capability token for `realm`.
pub async fn build_config(
    issuer: &TokenIssuer,
    realm: &str,
    name: Option<&str>,
) -> Result<ConfigPayload, IssueError> {
    if !issuer.serves(realm) {
        return Err(IssueError::UnknownRealm(realm.to_string()));
    }

    let capability_token = name
        .map(|name| issuer.capability_token(realm, Some(name)))
        .transpose()?;

    let ice_servers = if realm == PRODUCTION_REALM {
        Some(
            issuer
                .relay_credential(realm)
                .await
                .map(|relay| relay.ice_servers),
        )
    } else {
        None
    };

    Ok(ConfigPayload {
        realm: realm.to_string(),
        event_gateway: event_gateway(realm),
        ws_server: ws_server(realm),
        ice_servers,
        capability_token,
    })
}
