// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::fmt;

use clap::Parser;

/// How the transport dispatcher treats the CI provider's response status.
///
/// - `Ignore`: reply `200 ok` once the dispatch request was sent, whatever
///   the CI provider answered. A non-success status is only logged.
/// - `Enforce`: a non-success status from the CI provider is returned to
///   the caller as `502 UPSTREAM_REJECTED`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum DispatchStatus {
    #[default]
    Ignore,
    Enforce,
}

impl fmt::Display for DispatchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ignore => f.write_str("ignore"),
            Self::Enforce => f.write_str("enforce"),
        }
    }
}

/// Configuration for the relay, read once at startup.
#[derive(Clone, Parser)]
#[command(
    name = "cpi-relay",
    version,
    about = "Relay for CPI artifact listing and transport dispatch"
)]
pub struct RelayConfig {
    /// Host to bind on.
    #[arg(long, default_value = "127.0.0.1", env = "RELAY_HOST")]
    pub host: String,

    /// Port to listen on.
    #[arg(long, default_value_t = 3000, env = "RELAY_PORT")]
    pub port: u16,

    /// Base URL of the CPI design-time API.
    #[arg(long, env = "CPI_SRC_HOST")]
    pub cpi_host: String,

    /// OAuth client id for the CPI tenant.
    #[arg(long, env = "CPI_SRC_USER")]
    pub cpi_client_id: String,

    /// OAuth client secret for the CPI tenant.
    #[arg(long, env = "CPI_SRC_PASS", hide_env_values = true)]
    pub cpi_client_secret: String,

    /// OAuth token endpoint for the CPI tenant.
    #[arg(long, env = "CPI_SRC_TOKEN_URL")]
    pub cpi_token_url: String,

    /// GitHub personal access token used for workflow dispatch.
    #[arg(long, env = "_GITHUB_PAT", hide_env_values = true)]
    pub github_token: String,

    /// Repository holding the transport workflow (`owner/name`).
    #[arg(long, env = "_GITHUB_REPO")]
    pub github_repo: String,

    /// GitHub REST API base URL.
    #[arg(long, default_value = "https://api.github.com", env = "RELAY_GITHUB_API_URL")]
    pub github_api_url: String,

    /// Workflow file to dispatch.
    #[arg(long, default_value = "cpi-transport.yml", env = "RELAY_WORKFLOW")]
    pub workflow: String,

    /// Git ref the workflow runs against.
    #[arg(long, default_value = "main", env = "RELAY_GIT_REF")]
    pub git_ref: String,

    /// Treatment of the CI provider's dispatch response status.
    #[arg(
        long,
        value_enum,
        default_value_t = DispatchStatus::Ignore,
        env = "RELAY_DISPATCH_STATUS"
    )]
    pub dispatch_status: DispatchStatus,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, default_value = "info", env = "RELAY_LOG_LEVEL")]
    pub log_level: String,

    /// Log format (text or json).
    #[arg(long, default_value = "text", env = "RELAY_LOG_FORMAT")]
    pub log_format: String,
}

impl RelayConfig {
    pub fn validate(&self) -> anyhow::Result<()> {
        for (flag, url) in [
            ("--cpi-host", &self.cpi_host),
            ("--cpi-token-url", &self.cpi_token_url),
            ("--github-api-url", &self.github_api_url),
        ] {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                anyhow::bail!("{flag} must be an http(s) URL, got {url:?}");
            }
        }

        match self.github_repo.split_once('/') {
            Some((owner, name))
                if !owner.is_empty() && !name.is_empty() && !name.contains('/') => {}
            _ => anyhow::bail!("--github-repo must be owner/name, got {:?}", self.github_repo),
        }

        match self.log_format.as_str() {
            "text" | "json" => {}
            other => anyhow::bail!("invalid log format: {other}"),
        }

        Ok(())
    }

    /// Address the listener binds to.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// `{cpi_host}/api/v1/IntegrationDesigntimeArtifacts`
    pub fn artifacts_url(&self) -> String {
        format!("{}/api/v1/IntegrationDesigntimeArtifacts", self.cpi_host.trim_end_matches('/'))
    }

    /// `{github_api_url}/repos/{repo}/actions/workflows/{workflow}/dispatches`
    pub fn dispatch_url(&self) -> String {
        format!(
            "{}/repos/{}/actions/workflows/{}/dispatches",
            self.github_api_url.trim_end_matches('/'),
            self.github_repo,
            self.workflow
        )
    }
}

impl fmt::Debug for RelayConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RelayConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("cpi_host", &self.cpi_host)
            .field("cpi_client_id", &self.cpi_client_id)
            .field("cpi_client_secret", &"<redacted>")
            .field("cpi_token_url", &self.cpi_token_url)
            .field("github_token", &"<redacted>")
            .field("github_repo", &self.github_repo)
            .field("github_api_url", &self.github_api_url)
            .field("workflow", &self.workflow)
            .field("git_ref", &self.git_ref)
            .field("dispatch_status", &self.dispatch_status)
            .field("log_level", &self.log_level)
            .field("log_format", &self.log_format)
            .finish()
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
