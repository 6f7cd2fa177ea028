use std::net::SocketAddr;

use axum::{
    extract::{ConnectInfo, State},
    http::HeaderMap,
    Json,
};
use serde_json::{json, Value};
use sqlx::PgPool;
use tracing::info;

use crate::web::{
    self,
    types::{ContactSubmission, DeserContactBody, RequestMeta},
    WebResult,
};
use crate::AppState;

// ###################################
// ->   ERROR
// ###################################
#[derive(Debug, thiserror::Error)]
pub enum ContactError {
    #[error("data parsing error: {0}")]
    DataParsing(#[from] web::types::DataParsingError),
}

// ###################################
// ->   API
// ###################################
#[tracing::instrument(name = "Storing a contact message", skip_all)]
pub async fn contact(
    State(app_state): State<AppState>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
    Json(body): Json<DeserContactBody>,
) -> WebResult<Json<Value>> {
    let submission: ContactSubmission = body.try_into().map_err(ContactError::DataParsing)?;
    let meta = RequestMeta::from_parts(&headers, Some(peer));

    insert_contact_message(app_state.database_mgr.db(), &submission, &meta).await?;
    info!("Contact message stored.");

    Ok(Json(json!({ "ok": true })))
}

async fn insert_contact_message(
    db_pool: &PgPool,
    submission: &ContactSubmission,
    meta: &RequestMeta,
) -> WebResult<()> {
    sqlx::query(
        r#"
        INSERT INTO contact_messages
        (name, email, company, message, utm_source, utm_medium, utm_campaign, referer, user_agent, ip)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
    "#,
    )
    .bind(&submission.name)
    .bind(&submission.email)
    .bind(&submission.company)
    .bind(&submission.message)
    .bind(&meta.utm_source)
    .bind(&meta.utm_medium)
    .bind(&meta.utm_campaign)
    .bind(&meta.referer)
    .bind(&meta.user_agent)
    .bind(&meta.ip)
    .execute(db_pool)
    .await?;

    Ok(())
}
