// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared test infrastructure: config builders and a recording mock upstream.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::extract::State;
use axum::http::{header, HeaderMap, Method, StatusCode, Uri};
use axum::Router;

use crate::config::{DispatchStatus, RelayConfig};
use crate::state::RelayState;

/// One request observed by a [`MockUpstream`].
#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: Method,
    pub path: String,
    pub headers: HeaderMap,
    pub body: String,
}

impl Recorded {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    pub fn json(&self) -> anyhow::Result<serde_json::Value> {
        Ok(serde_json::from_str(&self.body)?)
    }

    /// Decode an `application/x-www-form-urlencoded` body into pairs.
    pub fn form(&self) -> anyhow::Result<HashMap<String, String>> {
        let url = reqwest::Url::parse(&format!("http://form.invalid/?{}", self.body))?;
        Ok(url.query_pairs().into_owned().collect())
    }
}

struct MockState {
    responses: HashMap<String, (u16, String)>,
    requests: Mutex<Vec<Recorded>>,
}

/// A real HTTP server on `127.0.0.1:0` that answers canned responses by
/// path and records every request. Unknown paths answer 404.
pub struct MockUpstream {
    pub addr: SocketAddr,
    state: Arc<MockState>,
}

impl MockUpstream {
    pub async fn spawn(responses: &[(&str, u16, &str)]) -> anyhow::Result<Self> {
        let state = Arc::new(MockState {
            responses: responses
                .iter()
                .map(|(path, status, body)| ((*path).to_owned(), (*status, (*body).to_owned())))
                .collect(),
            requests: Mutex::new(Vec::new()),
        });
        let router = Router::new().fallback(respond).with_state(Arc::clone(&state));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        tokio::spawn(async move {
            let _ = axum::serve(listener, router).await;
        });
        Ok(Self { addr, state })
    }

    pub fn url(&self, path: &str) -> String {
        format!("http://{}{path}", self.addr)
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.state.requests.lock().map(|r| r.clone()).unwrap_or_default()
    }

    pub fn requests_to(&self, path: &str) -> Vec<Recorded> {
        self.requests().into_iter().filter(|r| r.path == path).collect()
    }
}

async fn respond(
    State(s): State<Arc<MockState>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: String,
) -> (StatusCode, [(header::HeaderName, &'static str); 1], String) {
    let path = uri.path().to_owned();
    if let Ok(mut requests) = s.requests.lock() {
        requests.push(Recorded { method, path: path.clone(), headers, body });
    }
    let (status, body) = s.responses.get(&path).cloned().unwrap_or((404, String::new()));
    (
        StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
        [(header::CONTENT_TYPE, "application/json")],
        body,
    )
}

/// An address nothing listens on (bound then released).
pub fn closed_addr() -> anyhow::Result<SocketAddr> {
    let listener = std::net::TcpListener::bind("127.0.0.1:0")?;
    Ok(listener.local_addr()?)
}

pub const TOKEN_PATH: &str = "/oauth/token";
pub const ARTIFACTS_PATH: &str = "/api/v1/IntegrationDesigntimeArtifacts";
pub const DISPATCH_PATH: &str =
    "/repos/acme/cpi-transports/actions/workflows/cpi-transport.yml/dispatches";

/// Config pointing both the CPI tenant and GitHub at `base` (e.g. `http://127.0.0.1:1234`).
pub fn test_config(base: &str) -> RelayConfig {
    RelayConfig {
        host: "127.0.0.1".to_owned(),
        port: 0,
        cpi_host: base.to_owned(),
        cpi_client_id: "sb-client".to_owned(),
        cpi_client_secret: "s3cret".to_owned(),
        cpi_token_url: format!("{base}{TOKEN_PATH}"),
        github_token: "ghp_pat".to_owned(),
        github_repo: "acme/cpi-transports".to_owned(),
        github_api_url: base.to_owned(),
        workflow: "cpi-transport.yml".to_owned(),
        git_ref: "main".to_owned(),
        dispatch_status: DispatchStatus::Ignore,
        log_level: "debug".to_owned(),
        log_format: "text".to_owned(),
    }
}

pub fn test_state(config: RelayConfig) -> anyhow::Result<Arc<RelayState>> {
    Ok(Arc::new(RelayState::new(config)?))
}
