// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! GitHub Actions `workflow_dispatch` trigger.

use serde::{Deserialize, Serialize};

use crate::error::UpstreamError;

/// Body of `POST /repos/{repo}/actions/workflows/{workflow}/dispatches`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowDispatch {
    #[serde(rename = "ref")]
    pub git_ref: String,
    pub inputs: TransportInputs,
}

/// Workflow inputs. GitHub only accepts string values here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransportInputs {
    pub artifacts: String,
    pub mode: String,
    pub rename: String,
}

impl WorkflowDispatch {
    pub fn new(git_ref: &str, artifacts: &[String], mode: &str, rename: Option<&str>) -> Self {
        Self {
            git_ref: git_ref.to_owned(),
            inputs: TransportInputs {
                artifacts: artifacts.join(","),
                mode: mode.to_owned(),
                rename: rename.unwrap_or_default().to_owned(),
            },
        }
    }
}

/// Send a workflow dispatch. GitHub answers `204 No Content` on success.
pub async fn dispatch_workflow(
    client: &reqwest::Client,
    url: &str,
    token: &str,
    body: &WorkflowDispatch,
) -> Result<(), UpstreamError> {
    let resp = client
        .post(url)
        .bearer_auth(token)
        .header(reqwest::header::ACCEPT, "application/vnd.github+json")
        .header("X-GitHub-Api-Version", "2022-11-28")
        .json(body)
        .send()
        .await?;

    super::check_status(resp).await?;
    Ok(())
}

#[cfg(test)]
#[path = "github_tests.rs"]
mod tests;
