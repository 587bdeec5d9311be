// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Failure of a single outbound call (token endpoint, catalog, or CI).
#[derive(Debug)]
pub enum UpstreamError {
    /// The request never produced a response (DNS, connect, IO).
    Network(reqwest::Error),
    /// The response body was not the JSON shape we expected.
    Decode(String),
    /// The token endpoint answered without an `access_token`.
    TokenMissing,
    /// The upstream answered with a non-success status.
    Rejected { status: u16, body: String },
}

impl UpstreamError {
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Network(_) => ErrorCode::UpstreamUnreachable,
            Self::Decode(_) => ErrorCode::UpstreamDecode,
            Self::TokenMissing => ErrorCode::TokenMissing,
            Self::Rejected { .. } => ErrorCode::UpstreamRejected,
        }
    }
}

impl fmt::Display for UpstreamError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Network(e) => write!(f, "upstream request failed: {e}"),
            Self::Decode(msg) => write!(f, "unexpected upstream response: {msg}"),
            Self::TokenMissing => f.write_str("token response did not contain access_token"),
            Self::Rejected { status, body } if body.is_empty() => {
                write!(f, "upstream rejected request ({status})")
            }
            Self::Rejected { status, body } => {
                write!(f, "upstream rejected request ({status}): {body}")
            }
        }
    }
}

impl std::error::Error for UpstreamError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Network(e) => Some(e),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for UpstreamError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            Self::Decode(e.to_string())
        } else {
            Self::Network(e)
        }
    }
}

impl From<serde_json::Error> for UpstreamError {
    fn from(e: serde_json::Error) -> Self {
        Self::Decode(e.to_string())
    }
}

/// Machine-readable error codes for the relay API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorCode {
    BadRequest,
    UpstreamUnreachable,
    UpstreamDecode,
    TokenMissing,
    UpstreamRejected,
}

impl ErrorCode {
    /// Network, decode, and missing-token failures all answer 500; only the
    /// code differs.
    pub fn http_status(&self) -> u16 {
        match self {
            Self::BadRequest => 400,
            Self::UpstreamUnreachable => 500,
            Self::UpstreamDecode => 500,
            Self::TokenMissing => 500,
            Self::UpstreamRejected => 502,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::BadRequest => "BAD_REQUEST",
            Self::UpstreamUnreachable => "UPSTREAM_UNREACHABLE",
            Self::UpstreamDecode => "UPSTREAM_DECODE",
            Self::TokenMissing => "TOKEN_MISSING",
            Self::UpstreamRejected => "UPSTREAM_REJECTED",
        }
    }

    pub fn to_http_response(
        &self,
        message: impl Into<String>,
    ) -> (StatusCode, Json<ErrorResponse>) {
        let status =
            StatusCode::from_u16(self.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let body = ErrorResponse { error: message.into(), code: self.as_str().to_owned() };
        (status, Json(body))
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error envelope returned by every failing endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

/// Handler-level failure.
#[derive(Debug)]
pub enum RelayError {
    BadRequest(String),
    Upstream(UpstreamError),
}

impl RelayError {
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::BadRequest(_) => ErrorCode::BadRequest,
            Self::Upstream(e) => e.code(),
        }
    }
}

impl fmt::Display for RelayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BadRequest(msg) => f.write_str(msg),
            Self::Upstream(e) => fmt::Display::fmt(e, f),
        }
    }
}

impl std::error::Error for RelayError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::BadRequest(_) => None,
            Self::Upstream(e) => Some(e),
        }
    }
}

impl From<UpstreamError> for RelayError {
    fn from(e: UpstreamError) -> Self {
        Self::Upstream(e)
    }
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        let code = self.code();
        tracing::warn!(code = %code, err = %self, "request failed");
        code.to_http_response(self.to_string()).into_response()
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
