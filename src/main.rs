// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::{env, net::SocketAddr, sync::Arc};

use tracing_subscriber::EnvFilter;

use relational_specs_server::{
    api::router,
    auth::{InsecureVerifier, JwksVerifier, TokenVerifier},
    config,
    state::AppState,
    storage::Database,
};

#[tokio::main]
async fn main() {
    init_tracing();

    // Open (or create) the embedded database
    let data_dir = env::var(config::DATA_DIR_ENV).unwrap_or_else(|_| "data".to_string());
    let db_path = std::path::Path::new(&data_dir).join(config::DATABASE_FILE);
    let db = Database::open(&db_path).expect("Failed to open database");
    tracing::info!(path = %db_path.display(), "database ready");

    // Select the bearer-token verifier
    let verifier: Arc<dyn TokenVerifier> = match env::var(config::JWKS_URL_ENV) {
        Ok(jwks_url) => {
            let mut verifier = JwksVerifier::new(jwks_url);
            if let Ok(issuer) = env::var(config::JWT_ISSUER_ENV) {
                verifier = verifier.with_issuer(issuer);
            }
            if let Ok(audience) = env::var(config::JWT_AUDIENCE_ENV) {
                verifier = verifier.with_audience(audience);
            }
            Arc::new(verifier)
        }
        Err(_) => {
            tracing::warn!(
                "JWKS_URL not set - bearer tokens are NOT signature-checked (development mode)"
            );
            Arc::new(InsecureVerifier)
        }
    };

    // Initialize application state
    let mut state = AppState::new(db, verifier);
    if let Ok(origin) = env::var(config::AUTH_CORS_ORIGIN_ENV) {
        state = state.with_auth_cors_origin(origin);
    }
    let app = router(state);

    // Parse bind address
    let host = env::var(config::HOST_ENV).unwrap_or_else(|_| "0.0.0.0".to_string());
    let port: u16 = env::var(config::PORT_ENV)
        .unwrap_or_else(|_| "8080".to_string())
        .parse()
        .unwrap_or(8080);

    let addr: SocketAddr = format!("{host}:{port}")
        .parse()
        .expect("Failed to parse bind address");

    tracing::info!(%addr, "specification service listening (docs at /docs)");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind address");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("HTTP server failed");
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug"));

    let json = env::var(config::LOG_FORMAT_ENV)
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);
    if json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to install shutdown signal handler");
    tracing::info!("shutdown signal received");
}
