// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! CPI design-time artifact catalog.

use serde::Deserialize;

use crate::error::UpstreamError;

/// OData v2 envelope: `{ "d": { "results": [...] } }`.
#[derive(Debug, Deserialize)]
struct Envelope {
    d: Page,
}

#[derive(Debug, Deserialize)]
struct Page {
    results: Vec<ArtifactRecord>,
}

/// One catalog entry. Everything besides `Id` is ignored.
#[derive(Debug, Deserialize)]
struct ArtifactRecord {
    #[serde(rename = "Id")]
    id: String,
}

/// Project `d.results[*].Id` out of a catalog response body, in order.
pub fn artifact_ids(body: &[u8]) -> Result<Vec<String>, UpstreamError> {
    let envelope: Envelope = serde_json::from_slice(body)?;
    Ok(envelope.d.results.into_iter().map(|r| r.id).collect())
}

/// Fetch the artifact identifiers visible to `token`.
pub async fn list_artifact_ids(
    client: &reqwest::Client,
    url: &str,
    token: &str,
) -> Result<Vec<String>, UpstreamError> {
    let resp = client
        .get(url)
        .bearer_auth(token)
        .header(reqwest::header::ACCEPT, "application/json")
        .send()
        .await?;

    let resp = super::check_status(resp).await?;
    let bytes = resp.bytes().await?;
    artifact_ids(&bytes)
}

#[cfg(test)]
#[path = "catalog_tests.rs"]
mod tests;
