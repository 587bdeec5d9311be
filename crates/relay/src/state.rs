// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use reqwest::Client;

use crate::config::RelayConfig;
use crate::upstream::build_client;

/// Shared relay state. Immutable once built.
pub struct RelayState {
    pub config: RelayConfig,
    /// Outbound client; its connection pool is shared by all handlers.
    pub http: Client,
}

impl RelayState {
    pub fn new(config: RelayConfig) -> anyhow::Result<Self> {
        Ok(Self { config, http: build_client()? })
    }
}
