//! Basic-auth gate integration tests.
//!
//! Every routed path sits behind the gate when a basic-auth file is
//! configured: no header gets a 401 challenge, a bad header gets a 403.


use axum::body::Body;
use axum::http::header::{AUTHORIZATION, LOCATION, WWW_AUTHENTICATE};
use axum::http::{Request, StatusCode};
use axum::Router;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use realm_token_server::auth::LOGIN_CHALLENGE;
use test_helpers::{guarded_router, open_router, site_dir};
use tower::ServiceExt;

const ROUTED_PATHS: &[&str] = &[
    "/",
    "/index.html",
    "/doc",
    "/doc/",
    "/doc/index.html",
    "/js/app.js",
    "/sdk/client.css",
    "/token?realm=dev&name=alice",
    "/config?realm=dev",
];

fn basic(user_pass: &str) -> String {
    format!("Basic {}", BASE64.encode(user_pass))
}

async fn send(app: &Router, uri: &str, authorization: Option<&str>) -> axum::response::Response {
    let mut builder = Request::builder().uri(uri);
    if let Some(value) = authorization {
        builder = builder.header(AUTHORIZATION, value);
    }
    app.clone()
        .oneshot(builder.body(Body::empty()).unwrap())
        .await
        .unwrap()
}

#[tokio::test]
async fn test_every_route_challenges_without_credentials() {
    let site = site_dir();
    let app = guarded_router(&site, &["dev"]);

    for uri in ROUTED_PATHS {
        let response = send(&app, uri, None).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "{uri}");
        assert_eq!(
            response.headers().get(WWW_AUTHENTICATE).unwrap(),
            LOGIN_CHALLENGE,
            "{uri}"
        );
    }
}

#[tokio::test]
async fn test_every_route_forbids_wrong_credentials() {
    let site = site_dir();
    let app = guarded_router(&site, &["dev"]);
    let wrong = basic("admin:letmein");

    for uri in ROUTED_PATHS {
        let response = send(&app, uri, Some(&wrong)).await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN, "{uri}");
        assert!(response.headers().get(WWW_AUTHENTICATE).is_none(), "{uri}");
    }
}

#[tokio::test]
async fn test_malformed_authorization_is_forbidden() {
    let site = site_dir();
    let app = guarded_router(&site, &["dev"]);

    for header in ["Bearer abc", "Basic !!!not-base64!!!", "Basic"] {
        let response = send(&app, "/index.html", Some(header)).await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN, "{header}");
    }

    let no_colon = basic("adminhunter2");
    let response = send(&app, "/index.html", Some(no_colon.as_str())).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_correct_credentials_reach_handlers() {
    let site = site_dir();
    let app = guarded_router(&site, &["dev"]);
    let good = basic("admin:hunter2");

    let response = send(&app, "/token?realm=dev&name=alice", Some(&good)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = send(&app, "/index.html", Some(&good)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = send(&app, "/", Some(&good)).await;
    assert_eq!(response.status(), StatusCode::PERMANENT_REDIRECT);
    assert_eq!(response.headers().get(LOCATION).unwrap(), "/index.html");
}

#[tokio::test]
async fn test_scheme_is_case_insensitive() {
    let site = site_dir();
    let app = guarded_router(&site, &["dev"]);
    let header = format!("basic {}", BASE64.encode("admin:hunter2"));

    let response = send(&app, "/config?realm=dev", Some(&header)).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_no_auth_file_means_open_access() {
    let site = site_dir();
    let app = open_router(&site, &["dev"]);

    for uri in ["/index.html", "/token?realm=dev", "/config?realm=dev"] {
        let response = send(&app, uri, None).await;
        assert_eq!(response.status(), StatusCode::OK, "{uri}");
    }
}

#[tokio::test]
async fn test_unrouted_path_is_404_even_without_credentials() {
    let site = site_dir();
    let app = guarded_router(&site, &["dev"]);

    let response = send(&app, "/secret.txt", None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
