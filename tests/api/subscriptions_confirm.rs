use anyhow::Result;
use chrono::{DateTime, Utc};
use reqwest::StatusCode;
use serde_json::{json, Value};

use crate::helpers::TestApp;

#[tokio::test]
async fn api_confirm_without_token_rejected_with_400() -> Result<()> {
    let app = TestApp::spawn().await?;

    for path in ["/api/confirm", "/api/confirm?token="] {
        let res = app.get(path).await?;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let body: Value = res.json().await?;
        assert_eq!(body, json!({ "error": "Missing token" }));
    }

    Ok(())
}

#[tokio::test]
async fn api_confirm_unknown_token_returns_404() -> Result<()> {
    let app = TestApp::spawn().await?;

    let res = app.get("/api/confirm?token=no-such-token").await?;

    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let body: Value = res.json().await?;
    assert_eq!(body, json!({ "error": "Not found" }));

    Ok(())
}

#[tokio::test]
async fn api_confirm_moves_subscriber_to_confirmed() -> Result<()> {
    let app = TestApp::spawn().await?;

    let token = app.subscribe_and_fetch_token("a@x.com").await?;
    let res = app.get(&format!("/api/confirm?token={token}")).await?;

    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await?;
    assert_eq!(body, json!({ "ok": true }));

    let (status, token, confirmed_at): (String, Option<String>, Option<DateTime<Utc>>) =
        sqlx::query_as("SELECT status, token, confirmed_at FROM subscribers WHERE email = $1")
            .bind("a@x.com")
            .fetch_one(app.dm.db())
            .await?;

    assert_eq!(status, "confirmed");
    assert_eq!(token, None, "Confirmation must consume the token");
    assert!(confirmed_at.is_some());

    Ok(())
}

#[tokio::test]
async fn api_confirm_consumed_token_returns_404() -> Result<()> {
    let app = TestApp::spawn().await?;

    let token = app.subscribe_and_fetch_token("a@x.com").await?;
    let confirm_path = format!("/api/confirm?token={token}");

    let res = app.get(&confirm_path).await?;
    assert_eq!(res.status(), StatusCode::OK);

    let res = app.get(&confirm_path).await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    Ok(())
}

#[tokio::test]
async fn api_confirm_old_token_invalidated_by_resubscribe() -> Result<()> {
    let app = TestApp::spawn().await?;

    let old_token = app.subscribe_and_fetch_token("a@x.com").await?;
    let new_token = app.subscribe_and_fetch_token("a@x.com").await?;

    let res = app.get(&format!("/api/confirm?token={old_token}")).await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let res = app.get(&format!("/api/confirm?token={new_token}")).await?;
    assert_eq!(res.status(), StatusCode::OK);

    Ok(())
}
