// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! CPI relay: lists CPI design-time artifacts and triggers the GitHub
//! transport workflow.

pub mod config;
pub mod error;
pub mod state;
pub mod test_support;
pub mod transport;
pub mod upstream;

use std::sync::Arc;

use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::config::RelayConfig;
use crate::state::RelayState;
use crate::transport::build_router;

/// Run the relay server until SIGTERM/SIGINT.
pub async fn run(config: RelayConfig) -> anyhow::Result<()> {
    let addr = config.bind_addr();
    let shutdown = CancellationToken::new();
    spawn_signal_handler(shutdown.clone());

    info!(
        cpi_host = %config.cpi_host,
        repo = %config.github_repo,
        workflow = %config.workflow,
        dispatch_status = %config.dispatch_status,
        "relay configured"
    );

    let state = Arc::new(RelayState::new(config)?);
    let router = build_router(state);
    let listener = TcpListener::bind(&addr).await?;
    info!("cpi-relay listening on {addr}");
    axum::serve(listener, router).with_graceful_shutdown(shutdown.cancelled_owned()).await?;

    info!("cpi-relay stopped");
    Ok(())
}

fn spawn_signal_handler(shutdown: CancellationToken) {
    tokio::spawn(async move {
        let mut sigterm =
            tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()).ok();
        let mut sigint =
            tokio::signal::unix::signal(tokio::signal::unix::SignalKind::interrupt()).ok();

        tokio::select! {
            _ = async {
                if let Some(ref mut s) = sigterm { s.recv().await } else { std::future::pending().await }
            } => {
                info!("received SIGTERM");
                shutdown.cancel();
            }
            _ = async {
                if let Some(ref mut s) = sigint { s.recv().await } else { std::future::pending().await }
            } => {
                info!("received SIGINT");
                shutdown.cancel();
            }
        }
    });
}
