//! Shared test helpers for integration tests.

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::body::Body;
use http::{Request, StatusCode};
use serde_json::Value;
use tokio::sync::mpsc;
use tower::ServiceExt;

use dispatch_api::AppState;
use dispatch_auth::{ClientSet, DeviceContext, MemoryCredentialStore, SecretStore, TokenAuthority};
use dispatch_cache::CacheManager;
use dispatch_cache::memory::MemoryCacheProvider;
use dispatch_core::config::AppConfig;
use dispatch_core::types::{ActorKey, ActorRole};
use dispatch_realtime::{
    ConnectionId, ConnectionRegistry, OutboundMessage, RealtimeGateway, WsAuthenticator,
};

/// Test application context
pub struct TestApp {
    /// The Axum router for making test requests
    pub router: Router,
    /// Token authority shared with the router
    pub authority: Arc<TokenAuthority>,
    /// Realtime gateway shared with the router
    pub gateway: Arc<RealtimeGateway>,
    /// Credential store backing stable secrets
    pub credentials: Arc<MemoryCredentialStore>,
}

impl TestApp {
    /// Create a test application with an in-memory cache
    pub fn new(single_login: bool) -> Self {
        Self::build(single_login, true)
    }

    /// Create a test application with caching disabled
    pub fn without_cache(single_login: bool) -> Self {
        Self::build(single_login, false)
    }

    fn build(single_login: bool, with_cache: bool) -> Self {
        let mut config = AppConfig::default();
        config.auth.single_login = single_login;

        let cache = with_cache.then(|| {
            let provider = MemoryCacheProvider::new(&config.cache.memory);
            Arc::new(CacheManager::from_provider(Arc::new(provider)))
        });
        let credentials = Arc::new(MemoryCredentialStore::new());

        let clients = ClientSet::new(cache.clone(), credentials.clone());
        let secrets = Arc::new(SecretStore::new(&clients, &config.auth));
        let authority = Arc::new(TokenAuthority::new(&config.auth, secrets));

        let gateway = Arc::new(RealtimeGateway::new(
            Arc::new(ConnectionRegistry::new()),
            WsAuthenticator::new(Arc::clone(&authority), Duration::from_secs(5)),
        ));

        let state = AppState {
            config: Arc::new(config),
            cache,
            authority: Arc::clone(&authority),
            gateway: Arc::clone(&gateway),
        };

        Self {
            router: dispatch_api::build_app(state),
            authority,
            gateway,
            credentials,
        }
    }

    /// Issue an access token for a user
    pub async fn login(&self, actor_id: &str) -> String {
        self.login_as(ActorRole::User, actor_id).await
    }

    /// Issue an access token for an actor of the given role
    pub async fn login_as(&self, role: ActorRole, actor_id: &str) -> String {
        self.authority
            .issue(&ActorKey::new(role, actor_id), &DeviceContext::default())
            .await
            .expect("Failed to issue token")
            .access_token
    }

    /// Open a realtime connection and return its id with the outbound queue
    pub async fn connect(
        &self,
        token: &str,
        role: &str,
    ) -> (Option<ConnectionId>, mpsc::Receiver<OutboundMessage>) {
        let (tx, rx) = mpsc::channel(16);
        let conn = self
            .gateway
            .on_connect(token, role, tx)
            .await
            .ok()
            .map(|handle| handle.id);
        (conn, rx)
    }

    /// Make an HTTP request to the test app
    pub async fn request(&self, method: &str, path: &str, token: Option<&str>) -> TestResponse {
        let mut req = Request::builder().method(method).uri(path);

        if let Some(token) = token {
            req = req.header("Authorization", format!("Bearer {}", token));
        }

        let req = req.body(Body::empty()).expect("Failed to build request");

        let response = self
            .router
            .clone()
            .oneshot(req)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let body_bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("Failed to read body");

        let body: Value = serde_json::from_slice(&body_bytes).unwrap_or(Value::Null);

        TestResponse { status, body }
    }
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    /// HTTP status code
    pub status: StatusCode,
    /// Parsed JSON body
    pub body: Value,
}
