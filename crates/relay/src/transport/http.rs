// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! HTTP handlers for the relay.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::config::DispatchStatus;
use crate::error::{RelayError, UpstreamError};
use crate::state::RelayState;
use crate::upstream::github::WorkflowDispatch;
use crate::upstream::{catalog, github, oauth};

// -- Request/Response types ---------------------------------------------------

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransportRequest {
    pub artifacts: Vec<String>,
    pub mode: String,
    #[serde(default)]
    pub rename: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransportAccepted {
    pub status: String,
    pub message: String,
}

impl TransportAccepted {
    fn triggered() -> Self {
        Self { status: "ok".to_owned(), message: "Workflow triggered".to_owned() }
    }
}

// -- Handlers -----------------------------------------------------------------

/// `GET /health`
pub async fn health() -> impl IntoResponse {
    Json(HealthResponse {
        status: "running".to_owned(),
        version: env!("CARGO_PKG_VERSION").to_owned(),
    })
}

/// `GET /artifacts` — list design-time artifact ids from the CPI tenant.
pub async fn list_artifacts(
    State(s): State<Arc<RelayState>>,
) -> Result<Json<Vec<String>>, RelayError> {
    let cfg = &s.config;
    let token =
        oauth::fetch_token(&s.http, &cfg.cpi_token_url, &cfg.cpi_client_id, &cfg.cpi_client_secret)
            .await?;
    let ids = catalog::list_artifact_ids(&s.http, &cfg.artifacts_url(), &token).await?;
    tracing::debug!(count = ids.len(), "listed artifacts");
    Ok(Json(ids))
}

/// `POST /transport` — trigger the transport workflow.
///
/// Each call dispatches a new run; nothing is deduplicated.
pub async fn dispatch_transport(
    State(s): State<Arc<RelayState>>,
    payload: Result<Json<TransportRequest>, JsonRejection>,
) -> Result<Json<TransportAccepted>, RelayError> {
    let Json(req) = payload.map_err(|e| RelayError::BadRequest(e.body_text()))?;
    let cfg = &s.config;
    let body =
        WorkflowDispatch::new(&cfg.git_ref, &req.artifacts, &req.mode, req.rename.as_deref());

    let url = cfg.dispatch_url();
    let sent = github::dispatch_workflow(&s.http, &url, &cfg.github_token, &body);
    match sent.await {
        Ok(()) => {}
        // The CI provider's verdict is only logged unless enforcement is on.
        Err(e @ UpstreamError::Rejected { .. })
            if cfg.dispatch_status == DispatchStatus::Ignore =>
        {
            tracing::warn!(err = %e, repo = %cfg.github_repo, "workflow dispatch rejected upstream");
        }
        Err(e) => return Err(e.into()),
    }

    tracing::info!(
        artifacts = %body.inputs.artifacts,
        mode = %body.inputs.mode,
        "workflow triggered"
    );
    Ok(Json(TransportAccepted::triggered()))
}
