//! Axum middleware enforcing the [`AuthPolicy`] on every routed request.

use super::basic::{AuthPolicy, LOGIN_CHALLENGE};
use super::error::AuthError;
use axum::extract::{Request, State};
use axum::http::header::WWW_AUTHENTICATE;
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use std::sync::Arc;

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        match self {
            Self::MissingCredentials => (
                StatusCode::UNAUTHORIZED,
                [(WWW_AUTHENTICATE, LOGIN_CHALLENGE)],
                "Unauthorized",
            )
                .into_response(),
            Self::MalformedHeader | Self::InvalidCredentials => {
                (StatusCode::FORBIDDEN, "Forbidden").into_response()
            }
        }
    }
}

/// Use with `axum::middleware::from_fn_with_state(policy, require_login)`.
pub async fn require_login(
    State(policy): State<Arc<AuthPolicy>>,
    request: Request,
    next: Next,
) -> Response {
    match policy.authorize(request.headers()) {
        Ok(()) => next.run(request).await,
        Err(err) => {
            tracing::warn!(
                path = %request.uri().path(),
                reason = %err,
                "Rejected unauthenticated request"
            );
            err.into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::BasicAuthCredentials;
    use axum::body::Body;
    use axum::http::header::AUTHORIZATION;
    use axum::routing::get;
    use axum::Router;
    use base64::engine::general_purpose::STANDARD as BASE64;
    use base64::Engine;
    use tower::ServiceExt;

    fn app(policy: AuthPolicy) -> Router {
        Router::new()
            .route("/test", get(|| async { "OK" }))
            .route_layer(axum::middleware::from_fn_with_state(
                Arc::new(policy),
                require_login,
            ))
    }

    fn request(auth: Option<&str>) -> axum::http::Request<Body> {
        let mut builder = axum::http::Request::builder().uri("/test");
        if let Some(value) = auth {
            builder = builder.header(AUTHORIZATION, value);
        }
        builder.body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn disabled_policy_passes_through() {
        let response = app(AuthPolicy::Disabled).oneshot(request(None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn missing_header_gets_challenge() {
        let policy = AuthPolicy::Basic(BasicAuthCredentials::new("u", "p"));
        let response = app(policy).oneshot(request(None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            response.headers().get(WWW_AUTHENTICATE).unwrap(),
            LOGIN_CHALLENGE
        );
    }

    #[tokio::test]
    async fn wrong_credentials_are_forbidden() {
        let policy = AuthPolicy::Basic(BasicAuthCredentials::new("u", "p"));
        let header = format!("Basic {}", BASE64.encode("u:wrong"));
        let response = app(policy).oneshot(request(Some(&header))).await.unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert!(response.headers().get(WWW_AUTHENTICATE).is_none());
    }

    #[tokio::test]
    async fn correct_credentials_reach_handler() {
        let policy = AuthPolicy::Basic(BasicAuthCredentials::new("u", "p"));
        let header = format!("Basic {}", BASE64.encode("u:p"));
        let response = app(policy).oneshot(request(Some(&header))).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
