// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::error::ErrorCode;
use crate::test_support::{closed_addr, MockUpstream, TOKEN_PATH};
use crate::upstream::build_client;

#[tokio::test]
async fn returns_access_token_and_posts_form() -> anyhow::Result<()> {
    let body = serde_json::json!({
        "access_token": "eyJ.tok.en",
        "token_type": "bearer",
        "expires_in": 4199
    })
    .to_string();
    let mock = MockUpstream::spawn(&[(TOKEN_PATH, 200, body.as_str())]).await?;
    let client = build_client()?;

    let token = fetch_token(&client, &mock.url(TOKEN_PATH), "sb-client", "s3cr=t&x").await?;
    assert_eq!(token, "eyJ.tok.en");

    let requests = mock.requests_to(TOKEN_PATH);
    assert_eq!(requests.len(), 1);
    let req = &requests[0];
    assert_eq!(req.method, axum::http::Method::POST);
    assert_eq!(req.header("content-type"), Some("application/x-www-form-urlencoded"));
    let form = req.form()?;
    assert_eq!(form.get("grant_type").map(String::as_str), Some("client_credentials"));
    assert_eq!(form.get("client_id").map(String::as_str), Some("sb-client"));
    assert_eq!(form.get("client_secret").map(String::as_str), Some("s3cr=t&x"));
    Ok(())
}

#[tokio::test]
async fn missing_access_token_is_distinct_error() -> anyhow::Result<()> {
    let mock = MockUpstream::spawn(&[(TOKEN_PATH, 200, r#"{"token_type":"bearer"}"#)]).await?;
    let client = build_client()?;

    let result = fetch_token(&client, &mock.url(TOKEN_PATH), "id", "secret").await;
    assert!(matches!(result, Err(UpstreamError::TokenMissing)));
    Ok(())
}

#[tokio::test]
async fn empty_access_token_is_missing() -> anyhow::Result<()> {
    let mock = MockUpstream::spawn(&[(TOKEN_PATH, 200, r#"{"access_token":""}"#)]).await?;
    let client = build_client()?;

    let result = fetch_token(&client, &mock.url(TOKEN_PATH), "id", "secret").await;
    assert!(matches!(result, Err(UpstreamError::TokenMissing)));
    Ok(())
}

#[tokio::test]
async fn non_json_body_is_decode_error() -> anyhow::Result<()> {
    let mock = MockUpstream::spawn(&[(TOKEN_PATH, 200, "<html>login</html>")]).await?;
    let client = build_client()?;

    let result = fetch_token(&client, &mock.url(TOKEN_PATH), "id", "secret").await;
    let code = result.err().map(|e| e.code());
    assert_eq!(code, Some(ErrorCode::UpstreamDecode));
    Ok(())
}

#[tokio::test]
async fn unauthorized_is_rejected() -> anyhow::Result<()> {
    let mock =
        MockUpstream::spawn(&[(TOKEN_PATH, 401, r#"{"error":"invalid_client"}"#)]).await?;
    let client = build_client()?;

    let result = fetch_token(&client, &mock.url(TOKEN_PATH), "id", "wrong").await;
    match result {
        Err(UpstreamError::Rejected { status, body }) => {
            assert_eq!(status, 401);
            assert!(body.contains("invalid_client"));
        }
        other => anyhow::bail!("expected Rejected, got {other:?}"),
    }
    Ok(())
}

#[tokio::test]
async fn connection_refused_is_network_error() -> anyhow::Result<()> {
    let addr = closed_addr()?;
    let client = build_client()?;

    let result = fetch_token(&client, &format!("http://{addr}{TOKEN_PATH}"), "id", "secret").await;
    assert!(matches!(result, Err(UpstreamError::Network(_))));
    Ok(())
}

#[test]
fn into_access_token_returns_exact_string() -> anyhow::Result<()> {
    let token: TokenResponse = serde_json::from_str(r#"{"access_token":"  spaced  "}"#)?;
    assert_eq!(token.into_access_token()?, "  spaced  ");
    Ok(())
}

#[yare::parameterized(
    integer = { r#"{"access_token":"abc","expires_in":3600}"# },
    string = { r#"{"access_token":"abc","expires_in":"3600"}"# },
    null = { r#"{"access_token":"abc","expires_in":null}"# },
    float = { r#"{"access_token":"abc","expires_in":3599.9}"# },
    absent = { r#"{"access_token":"abc"}"# },
    odd_token_type = { r#"{"access_token":"abc","token_type":7,"scope":["a"]}"# },
)]
fn token_survives_any_expires_in_shape(body: &str) {
    let token = serde_json::from_str::<TokenResponse>(body).map_err(UpstreamError::from);
    let token = token.and_then(TokenResponse::into_access_token);
    assert_eq!(token.ok().as_deref(), Some("abc"));
}

#[tokio::test]
async fn string_expires_in_still_returns_token() -> anyhow::Result<()> {
    let body = r#"{"access_token":"eyJ.tok.en","expires_in":"3600","token_type":null}"#;
    let mock = MockUpstream::spawn(&[(TOKEN_PATH, 200, body)]).await?;
    let client = build_client()?;

    let token = fetch_token(&client, &mock.url(TOKEN_PATH), "id", "secret").await?;
    assert_eq!(token, "eyJ.tok.en");
    Ok(())
}
