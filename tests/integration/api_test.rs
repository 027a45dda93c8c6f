//! Integration tests for the HTTP session routes.

mod helpers;

use chrono::{Duration, Utc};
use http::StatusCode;

use dispatch_auth::DeviceContext;
use dispatch_core::types::{ActorKey, ActorRole};
use dispatch_realtime::OutboundMessage;

#[tokio::test]
async fn test_health_reports_cache_and_connections() {
    let app = helpers::TestApp::new(true);
    let token = app.login("42").await;
    let (_, _rx) = app.connect(&token, "user").await;

    let response = app.request("GET", "/api/health", None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["status"], "ok");
    assert_eq!(response.body["data"]["cache"], "connected");
    assert_eq!(response.body["data"]["realtime_connections"], 1);

    let app = helpers::TestApp::without_cache(false);
    let response = app.request("GET", "/api/health", None).await;
    assert_eq!(response.body["data"]["cache"], "disabled");
}

#[tokio::test]
async fn test_session_requires_bearer_token() {
    let app = helpers::TestApp::new(true);

    let response = app.request("GET", "/api/session", None).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.body["error"], "UNAUTHORIZED");

    let response = app.request("GET", "/api/session", Some("not-a-token")).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.body["error"], "INVALID_TOKEN");
    assert_eq!(response.body["message"], "token format error");
}

#[tokio::test]
async fn test_session_returns_verified_claims() {
    let app = helpers::TestApp::new(true);
    let token = app.login("42").await;

    let response = app.request("GET", "/api/session", Some(&token)).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["actor_id"], "42");
    assert_eq!(response.body["data"]["role"], "user");
    assert_eq!(response.body["data"]["claims"]["iss"], "dispatch");
}

#[tokio::test]
async fn test_expired_token_is_unauthorized() {
    let app = helpers::TestApp::new(false);
    let issued = app
        .authority
        .issue_at(
            &ActorKey::new(ActorRole::User, "42"),
            &DeviceContext::default(),
            Utc::now() - Duration::hours(25),
        )
        .await
        .unwrap();

    let response = app
        .request("GET", "/api/session", Some(&issued.access_token))
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.body["message"], "expired token");
}

#[tokio::test]
async fn test_missing_cache_is_service_unavailable() {
    let issuer = helpers::TestApp::new(true);
    let token = issuer.login("42").await;

    let app = helpers::TestApp::without_cache(true);
    let response = app.request("GET", "/api/session", Some(&token)).await;
    assert_eq!(response.status, StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn test_revoke_invalidates_token_and_closes_connection() {
    let app = helpers::TestApp::new(true);
    let token = app.login("42").await;
    let (conn, mut rx) = app.connect(&token, "customer").await;
    assert!(conn.is_some());
    assert!(matches!(rx.try_recv(), Ok(OutboundMessage::RecvConnect(_))));

    let response = app.request("POST", "/api/session/revoke", Some(&token)).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["realtime_closed"], true);
    assert!(matches!(rx.try_recv(), Ok(OutboundMessage::Close { .. })));
    assert!(app.gateway.registry().is_empty());

    let response = app.request("GET", "/api/session", Some(&token)).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.body["message"], "token invalid signature error");
}

#[tokio::test]
async fn test_revoke_closes_connection_of_token_role() {
    let app = helpers::TestApp::new(true);
    let token = app.login_as(ActorRole::Driver, "9").await;
    let (conn, mut rx) = app.connect(&token, "driver").await;
    assert!(conn.is_some());
    assert!(matches!(rx.try_recv(), Ok(OutboundMessage::RecvConnect(_))));

    let response = app.request("POST", "/api/session/revoke", Some(&token)).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["realtime_closed"], true);
    assert!(matches!(rx.try_recv(), Ok(OutboundMessage::Close { .. })));
    assert!(
        app.gateway
            .registry()
            .lookup(&ActorKey::new(ActorRole::Driver, "9"))
            .is_none()
    );
}
