use super::handlers;
use super::state::AppState;
use crate::auth::{require_login, AuthPolicy};
use axum::middleware;
use axum::response::Redirect;
use axum::routing::{get, MethodRouter};
use axum::Router;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

fn redirect<S>(to: &'static str) -> MethodRouter<S>
where
    S: Clone + Send + Sync + 'static,
{
    get(move || async move { Redirect::permanent(to) })
}

fn cors_layer(cors_origins: &str) -> CorsLayer {
    if cors_origins == "*" {
        return CorsLayer::permissive();
    }

    let origins: Vec<_> = cors_origins
        .split(',')
        .filter_map(|s| s.trim().parse::<axum::http::HeaderValue>().ok())
        .collect();

    if origins.is_empty() {
        tracing::warn!("No valid CORS origins configured, using permissive CORS");
        CorsLayer::permissive()
    } else {
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(Any)
            .allow_headers(Any)
    }
}

/// Build the full route table. Every declared route sits behind the auth
/// gate; paths matching nothing get axum's plain 404.
pub fn create_router(state: Arc<AppState>, auth: Arc<AuthPolicy>, cors_origins: &str) -> Router {
    Router::new()
        .route("/", redirect("/index.html"))
        .route("/doc", redirect("/doc/"))
        .route("/doc/", redirect("/doc/index.html"))
        .route("/index.html", get(handlers::index))
        .route("/doc/{*path}", get(handlers::doc_file))
        .route("/js/{*path}", get(handlers::js_file))
        .route("/sdk/{*path}", get(handlers::sdk_file))
        .route("/token", get(handlers::token))
        .route("/config", get(handlers::config))
        .route_layer(middleware::from_fn_with_state(auth, require_login))
        .with_state(state)
        .layer(cors_layer(cors_origins))
        .layer(TraceLayer::new_for_http())
}
