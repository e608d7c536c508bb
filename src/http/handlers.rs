use super::error::ApiError;
use super::state::AppState;
use crate::client_config::{build_config, ConfigPayload};
use crate::static_files::StaticMount;
use crate::token::TokenResponse;
use axum::extract::{Path, RawQuery, State};
use axum::http::header::CONTENT_TYPE;
use axum::response::{IntoResponse, Json, Response};
use std::sync::Arc;

/// `?realm=R&name=N` for `/token` and `/config`. Repeated keys keep the last
/// value and unknown keys are ignored.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RealmQuery {
    pub realm: Option<String>,
    pub name: Option<String>,
}

impl RealmQuery {
    #[must_use]
    pub fn parse(raw: Option<&str>) -> Self {
        let mut query = Self::default();
        for (key, value) in url::form_urlencoded::parse(raw.unwrap_or_default().as_bytes()) {
            match key.as_ref() {
                "realm" => query.realm = Some(value.into_owned()),
                "name" => query.name = Some(value.into_owned()),
                _ => {}
            }
        }
        query
    }

    fn realm<'a>(&'a self, state: &'a AppState) -> &'a str {
        self.realm.as_deref().unwrap_or(&state.default_realm)
    }

    /// An empty `name=` counts as no name.
    fn name(&self) -> Option<&str> {
        self.name.as_deref().filter(|name| !name.is_empty())
    }
}

pub async fn token(
    State(state): State<Arc<AppState>>,
    RawQuery(raw): RawQuery,
) -> Result<Json<TokenResponse>, ApiError> {
    let query = RealmQuery::parse(raw.as_deref());
    let realm = query.realm(&state);
    let response = state.issuer.issue(realm, query.name()).await?;
    tracing::info!(
        %realm,
        name = query.name().unwrap_or_default(),
        relay = response.stun_turn_token.is_some(),
        "Issued token"
    );
    Ok(Json(response))
}

pub async fn config(
    State(state): State<Arc<AppState>>,
    RawQuery(raw): RawQuery,
) -> Result<Json<ConfigPayload>, ApiError> {
    let query = RealmQuery::parse(raw.as_deref());
    let realm = query.realm(&state);
    let payload = build_config(&state.issuer, realm, query.name()).await?;
    tracing::info!(%realm, name = query.name().unwrap_or_default(), "Issued client config");
    Ok(Json(payload))
}

async fn serve_static(
    state: &AppState,
    mount: StaticMount,
    requested: &str,
) -> Result<Response, ApiError> {
    let file = state.static_files.load(mount, requested).await?;
    Ok(([(CONTENT_TYPE, file.content_type)], file.body).into_response())
}

pub async fn index(State(state): State<Arc<AppState>>) -> Result<Response, ApiError> {
    serve_static(&state, StaticMount::Site, "index.html").await
}

pub async fn doc_file(
    State(state): State<Arc<AppState>>,
    Path(path): Path<String>,
) -> Result<Response, ApiError> {
    serve_static(&state, StaticMount::Doc, &path).await
}

pub async fn js_file(
    State(state): State<Arc<AppState>>,
    Path(path): Path<String>,
) -> Result<Response, ApiError> {
    serve_static(&state, StaticMount::Js, &path).await
}

pub async fn sdk_file(
    State(state): State<Arc<AppState>>,
    Path(path): Path<String>,
) -> Result<Response, ApiError> {
    serve_static(&state, StaticMount::Sdk, &path).await
}
