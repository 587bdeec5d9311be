// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Outbound HTTP calls: OAuth token exchange, CPI catalog, GitHub dispatch.

pub mod catalog;
pub mod github;
pub mod oauth;

use std::sync::Once;

use reqwest::{Client, Response};

use crate::error::UpstreamError;

/// GitHub rejects API requests without a User-Agent.
const USER_AGENT: &str = concat!("cpi-relay/", env!("CARGO_PKG_VERSION"));

/// Upper bound on how much of a rejected response body ends up in the error.
const MAX_ERROR_BODY: usize = 512;

static CRYPTO_INIT: Once = Once::new();

/// Install the ring crypto provider for reqwest/rustls.
/// Only the first call has effect.
pub fn ensure_crypto() {
    CRYPTO_INIT.call_once(|| {
        let _ = rustls::crypto::ring::default_provider().install_default();
    });
}

/// Build the HTTP client shared by every outbound call.
///
/// No timeout is configured: a hung upstream holds only the request that
/// is waiting on it.
pub fn build_client() -> anyhow::Result<Client> {
    ensure_crypto();
    let client = Client::builder().user_agent(USER_AGENT).build()?;
    Ok(client)
}

/// Pass a success response through; turn anything else into `Rejected`.
async fn check_status(resp: Response) -> Result<Response, UpstreamError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body = resp.text().await.unwrap_or_default();
    Err(UpstreamError::Rejected { status: status.as_u16(), body: clip_error_body(body) })
}

/// Trim and cap a rejected body at `MAX_ERROR_BODY` bytes, on a char boundary.
fn clip_error_body(mut body: String) -> String {
    if body.len() > MAX_ERROR_BODY {
        let mut cut = MAX_ERROR_BODY;
        while !body.is_char_boundary(cut) {
            cut -= 1;
        }
        body.truncate(cut);
    }
    body.trim().to_owned()
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
