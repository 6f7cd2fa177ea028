use axum::{extract::State, Json};
use chrono::Utc;
use serde_json::{json, Value};
use sqlx::PgPool;
use tracing::info;

use crate::web::{
    self,
    types::{DeserSubscribeBody, SubscriberEmail, SubscriberStatus, SubscriptionToken},
    WebResult,
};
use crate::AppState;

// ###################################
// ->   ERROR
// ###################################
#[derive(Debug, thiserror::Error)]
pub enum SubscribeError {
    #[error("data parsing error: {0}")]
    DataParsing(#[from] web::types::DataParsingError),

    #[error("error awaiting a blocking tokio task: {0}")]
    BlockingTask(#[from] tokio::task::JoinError),
}

// ###################################
// ->   API
// ###################################
#[tracing::instrument(name = "Upserting a pending subscriber", skip(app_state, body))]
pub async fn subscribe(
    State(app_state): State<AppState>,
    Json(body): Json<DeserSubscribeBody>,
) -> WebResult<Json<Value>> {
    // Spawn a blocking task to validate the body and generate the subscription token.
    let (email, token) =
        tokio::task::spawn_blocking(move || (body.try_into(), SubscriptionToken::generate()))
            .await
            .map_err(SubscribeError::BlockingTask)?;
    let email: SubscriberEmail = email.map_err(SubscribeError::DataParsing)?;

    let id = upsert_pending_subscriber(app_state.database_mgr.db(), &email, &token).await?;
    info!("Subscriber stored as pending.");

    // TODO: send confirmation email with /api/confirm?token=...
    Ok(Json(json!({ "ok": true, "id": id })))
}

/// A single write keyed by the unique email: creates the subscriber as
/// pending, or resets an existing one back to pending with a fresh token.
/// A previously confirmed subscriber is reset as well.
async fn upsert_pending_subscriber(
    db_pool: &PgPool,
    email: &SubscriberEmail,
    token: &SubscriptionToken,
) -> WebResult<i64> {
    let id: i64 = sqlx::query_scalar(
        r#"
        INSERT INTO subscribers (email, token, status, subscribed_at)
        VALUES ($1, $2, $3, $4)
        ON CONFLICT (email)
        DO UPDATE SET token = EXCLUDED.token, status = EXCLUDED.status
        RETURNING id
    "#,
    )
    .bind(email.as_ref())
    .bind(token.as_str())
    .bind(SubscriberStatus::Pending.as_ref())
    .bind(Utc::now())
    .fetch_one(db_pool)
    .await?;

    Ok(id)
}
