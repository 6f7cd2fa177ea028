//! Non-API paths serve the single-page application bundle.

use anyhow::Result;
use reqwest::{header, StatusCode};

use crate::helpers::TestApp;

#[tokio::test]
async fn spa_served_at_root() -> Result<()> {
    let app = TestApp::spawn().await?;

    let res = app.get("/").await?;

    assert_eq!(res.status(), StatusCode::OK);
    let content_type = res
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    assert!(
        content_type.starts_with("text/html"),
        "Unexpected content type: {content_type}"
    );

    Ok(())
}

#[tokio::test]
async fn spa_index_fallback_for_unknown_path() -> Result<()> {
    let app = TestApp::spawn().await?;

    let res = app.get("/some/client/route").await?;

    assert_eq!(res.status(), StatusCode::OK);
    let body = res.text().await?;
    assert!(body.contains(r#"<div id="app">"#));

    Ok(())
}
