use anyhow::Result;
use reqwest::StatusCode;
use serde_json::{json, Value};

use crate::helpers::TestApp;

#[tokio::test]
async fn api_contact_ok_captures_metadata() -> Result<()> {
    let app = TestApp::spawn().await?;

    let res = app
        .http_client
        .post(app.url("/api/contact"))
        .header("X-UTM-Source", "newsletter")
        .header("X-UTM-Medium", "email")
        .header("X-UTM-Campaign", "launch")
        .header("Referer", "https://example.com/pricing")
        .header("X-Forwarded-For", "203.0.113.9, 70.41.3.18")
        .json(&json!({
            "name": "A",
            "email": "a@x.com",
            "company": "Acme",
            "message": "Hello there"
        }))
        .send()
        .await?;

    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await?;
    assert_eq!(body, json!({ "ok": true }));

    let (name, email, company, message, utm_source, referer, ip): (
        String,
        String,
        Option<String>,
        String,
        Option<String>,
        Option<String>,
        Option<String>,
    ) = sqlx::query_as(
        "SELECT name, email, company, message, utm_source, referer, ip FROM contact_messages",
    )
    .fetch_one(app.dm.db())
    .await?;

    assert_eq!(name, "A");
    assert_eq!(email, "a@x.com");
    assert_eq!(company.as_deref(), Some("Acme"));
    assert_eq!(message, "Hello there");
    assert_eq!(utm_source.as_deref(), Some("newsletter"));
    assert_eq!(referer.as_deref(), Some("https://example.com/pricing"));
    assert_eq!(ip.as_deref(), Some("203.0.113.9"));

    Ok(())
}

#[tokio::test]
async fn api_contact_missing_fields_rejected_with_400() -> Result<()> {
    let app = TestApp::spawn().await?;

    let cases = [
        (json!({ "name": "A", "email": "a@x.com" }), "No message"),
        (json!({ "email": "a@x.com", "message": "hi" }), "No name"),
        (json!({ "name": "A", "message": "hi" }), "No email"),
        (
            json!({ "name": "", "email": "a@x.com", "message": "hi" }),
            "Empty name",
        ),
    ];

    for (body, description) in cases {
        let res = app.post_json("/api/contact", &body).await?;
        assert_eq!(
            res.status(),
            StatusCode::BAD_REQUEST,
            "Expected 400 for: {description}"
        );
        let body: Value = res.json().await?;
        assert_eq!(body, json!({ "error": "Missing required fields" }));
    }

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM contact_messages")
        .fetch_one(app.dm.db())
        .await?;
    assert_eq!(count, 0);

    Ok(())
}

#[tokio::test]
async fn api_contact_company_optional_and_peer_ip_fallback() -> Result<()> {
    let app = TestApp::spawn().await?;

    let res = app
        .post_json(
            "/api/contact",
            &json!({ "name": "A", "email": "a@x.com", "message": "hi" }),
        )
        .await?;
    assert_eq!(res.status(), StatusCode::OK);

    let (company, ip): (Option<String>, Option<String>) =
        sqlx::query_as("SELECT company, ip FROM contact_messages")
            .fetch_one(app.dm.db())
            .await?;

    assert_eq!(company, None);
    // Without forwarding headers the transport peer address is recorded.
    assert_eq!(ip.as_deref(), Some("127.0.0.1"));

    Ok(())
}
