// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::test_support::MockUpstream;

#[test]
fn short_body_is_only_trimmed() {
    assert_eq!(clip_error_body("  Not Found \n".to_owned()), "Not Found");
}

#[test]
fn ascii_body_is_capped_at_limit() {
    let clipped = clip_error_body("a".repeat(MAX_ERROR_BODY + 100));
    assert_eq!(clipped.len(), MAX_ERROR_BODY);
}

#[test]
fn multibyte_char_at_cut_is_dropped_whole() {
    // 'x' shifts every two-byte 'é' to an odd offset, so byte 512 falls
    // inside one.
    let body = format!("x{}", "é".repeat(600));
    let clipped = clip_error_body(body);
    assert_eq!(clipped.len(), MAX_ERROR_BODY - 1);
    assert_eq!(clipped, format!("x{}", "é".repeat((MAX_ERROR_BODY - 2) / 2)));
}

#[tokio::test]
async fn rejected_response_body_is_clipped() -> anyhow::Result<()> {
    let body = format!("x{}", "é".repeat(600));
    let mock = MockUpstream::spawn(&[("/fail", 500, body.as_str())]).await?;
    let client = build_client()?;

    let resp = client.get(mock.url("/fail")).send().await?;
    match check_status(resp).await {
        Err(UpstreamError::Rejected { status, body }) => {
            assert_eq!(status, 500);
            assert_eq!(body.len(), MAX_ERROR_BODY - 1);
            assert!(body.ends_with('é'));
        }
        other => anyhow::bail!("expected Rejected, got {other:?}"),
    }
    Ok(())
}

#[tokio::test]
async fn success_response_passes_through() -> anyhow::Result<()> {
    let mock = MockUpstream::spawn(&[("/ok", 200, "{}")]).await?;
    let client = build_client()?;

    let resp = client.get(mock.url("/ok")).send().await?;
    let resp = check_status(resp).await?;
    assert_eq!(resp.status().as_u16(), 200);
    Ok(())
}
