// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! OAuth client-credentials exchange.

use serde::Deserialize;

use crate::error::UpstreamError;

/// OAuth2 token response. Only `access_token` is read. `expires_in` stays
/// untyped: providers send a number, a string, or null.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default)]
    pub expires_in: Option<serde_json::Value>,
}

impl TokenResponse {
    /// The bearer token, or `TokenMissing` when absent or empty.
    pub fn into_access_token(self) -> Result<String, UpstreamError> {
        match self.access_token {
            Some(token) if !token.is_empty() => Ok(token),
            _ => Err(UpstreamError::TokenMissing),
        }
    }
}

/// Exchange client credentials for a bearer token.
///
/// Every call performs a fresh exchange; tokens are not cached.
pub async fn fetch_token(
    client: &reqwest::Client,
    token_url: &str,
    client_id: &str,
    client_secret: &str,
) -> Result<String, UpstreamError> {
    let resp = client
        .post(token_url)
        .form(&[
            ("grant_type", "client_credentials"),
            ("client_id", client_id),
            ("client_secret", client_secret),
        ])
        .send()
        .await?;

    let resp = super::check_status(resp).await?;
    let bytes = resp.bytes().await?;
    let token: TokenResponse = serde_json::from_slice(&bytes)?;
    tracing::debug!(expires_in = ?token.expires_in, "token exchange complete");
    token.into_access_token()
}

#[cfg(test)]
#[path = "oauth_tests.rs"]
mod tests;
