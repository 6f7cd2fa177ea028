//! Tests whether the '/api/health' route returns an appropriate status code

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::{json, Value};

use crate::helpers::TestApp;

#[tokio::test]
async fn healthcheck_ok() -> Result<()> {
    let app = TestApp::spawn().await?;

    let res = app.get("/api/health").await?;

    assert_eq!(res.status(), StatusCode::OK, "Healthcheck FAILED!");
    let body: Value = res.json().await?;
    assert_eq!(body, json!({ "ok": true }));

    Ok(())
}
