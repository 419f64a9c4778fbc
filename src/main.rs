// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::net::SocketAddr;

use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use multitransfer_gateway::api::router;
use multitransfer_gateway::captcha::CaptchaSolver;
use multitransfer_gateway::catalog::CountryCatalog;
use multitransfer_gateway::config::{env_or_default, COUNTRIES_FILE_ENV};
use multitransfer_gateway::providers::multitransfer::MultitransferClient;
use multitransfer_gateway::state::AppState;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if env_or_default("LOG_FORMAT", "pretty") == "json" {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

#[tokio::main]
async fn main() {
    init_tracing();

    // Reference data loads exactly once; a broken file degrades the
    // catalog to empty instead of failing boot.
    let catalog =
        CountryCatalog::load_or_empty(env_or_default(COUNTRIES_FILE_ENV, "multitransfer_data.json"));

    let provider = MultitransferClient::from_env().expect("Failed to build provider client");

    let solver = match CaptchaSolver::from_env() {
        Ok(solver) => Some(solver),
        Err(e) => {
            warn!(error = %e, "Captcha solving disabled");
            None
        }
    };

    let state = AppState::new(catalog, provider, solver);
    let app = router(state);

    // Parse bind address
    let host = env_or_default("HOST", "127.0.0.1");
    let port: u16 = env_or_default("PORT", "8015").parse().unwrap_or(8015);
    let addr: SocketAddr = format!("{host}:{port}")
        .parse()
        .expect("Failed to parse bind address");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind listen address");

    info!("Multitransfer gateway listening on http://{addr} (docs at /docs)");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("HTTP server failed");
}

async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to install ctrl-c handler");
    info!("Shutdown signal received");
}
