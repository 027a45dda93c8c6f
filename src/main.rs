//! Dispatch Server: session and realtime-connection identity service
//!
//! Main entry point that wires all crates together and starts the server.

use std::sync::Arc;
use std::time::Duration;

use tracing_subscriber::{EnvFilter, fmt};

use dispatch_api::AppState;
use dispatch_auth::{ClientSet, MemoryCredentialStore, SecretStore, TokenAuthority};
use dispatch_cache::CacheManager;
use dispatch_core::config::AppConfig;
use dispatch_core::error::AppError;
use dispatch_core::traits::CredentialStore;
use dispatch_database::{CredentialRepository, DatabasePool};
use dispatch_realtime::{ConnectionRegistry, RealtimeGateway, WsAuthenticator};

#[tokio::main]
async fn main() {
    let env = std::env::var("DISPATCH_ENV").unwrap_or_else(|_| "development".to_string());

    let config = match AppConfig::load(&env) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    init_logging(&config);
    tracing::info!(env = %env, "Configuration loaded");

    if let Err(e) = run(config).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
    }
}

/// Main server run function
async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting Dispatch v{}", env!("CARGO_PKG_VERSION"));

    // ── Step 1: Credential store ─────────────────────────────────
    let (credentials, db_pool): (Arc<dyn CredentialStore>, Option<DatabasePool>) =
        if config.database.is_configured() {
            let pool = DatabasePool::connect(&config.database).await?;
            let repo = CredentialRepository::new(pool.pool().clone());
            (Arc::new(repo), Some(pool))
        } else {
            tracing::warn!("No database configured, using the in-memory credential store");
            (Arc::new(MemoryCredentialStore::new()), None)
        };

    // ── Step 2: Cache ────────────────────────────────────────────
    tracing::info!(provider = %config.cache.provider, "Initializing cache");
    let cache = CacheManager::new(&config.cache).await?.map(Arc::new);
    if cache.is_none() && config.auth.single_login {
        tracing::warn!("Single-login is enabled but no cache is configured; token operations will fail");
    }

    // ── Step 3: Token authority ──────────────────────────────────
    let clients = ClientSet::new(cache.clone(), credentials);
    let secrets = Arc::new(SecretStore::new(&clients, &config.auth));
    let authority = Arc::new(TokenAuthority::new(&config.auth, secrets));
    tracing::info!(single_login = config.auth.single_login, "Token authority initialized");

    // ── Step 4: Realtime gateway ─────────────────────────────────
    let registry = Arc::new(ConnectionRegistry::new());
    let authenticator = WsAuthenticator::new(
        Arc::clone(&authority),
        Duration::from_secs(config.server.request_timeout_seconds),
    );
    let gateway = Arc::new(RealtimeGateway::new(registry, authenticator));

    // ── Step 5: HTTP server ──────────────────────────────────────
    let addr = config.server.bind_address();
    let app_state = AppState {
        config: Arc::new(config),
        cache,
        authority,
        gateway: Arc::clone(&gateway),
    };
    let app = dispatch_api::build_app(app_state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {addr}: {e}")))?;

    tracing::info!("Dispatch server listening on {}", addr);

    // ── Step 6: Graceful shutdown ────────────────────────────────
    let shutdown_gateway = Arc::clone(&gateway);
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            shutdown_signal().await;
            tracing::info!("Shutdown signal received, closing realtime connections");
            shutdown_gateway.shutdown();
        })
        .await
        .map_err(|e| AppError::internal(format!("Server error: {e}")))?;

    if let Some(pool) = db_pool {
        pool.close().await;
    }

    tracing::info!("Dispatch server shut down gracefully");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
