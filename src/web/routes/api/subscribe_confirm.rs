use axum::{
    extract::{Query, State},
    Json,
};
use chrono::Utc;
use serde_json::{json, Value};
use sqlx::PgPool;
use tracing::info;

use crate::web::{
    self,
    types::{ConfirmQuery, SubscriberStatus},
    WebResult,
};
use crate::AppState;

// ###################################
// ->   ERROR
// ###################################
#[derive(Debug, thiserror::Error)]
pub enum SubscribeConfirmError {
    #[error("no subscriber holds the received token")]
    TokenNotFound,

    #[error("data parsing error: {0}")]
    DataParsing(#[from] web::types::DataParsingError),
}

// ###################################
// ->   API
// ###################################
#[tracing::instrument(name = "Confirming a pending subscriber", skip(app_state, query))]
pub async fn subscribe_confirm(
    State(app_state): State<AppState>,
    Query(query): Query<ConfirmQuery>,
) -> WebResult<Json<Value>> {
    let token = query
        .into_token()
        .map_err(SubscribeConfirmError::DataParsing)?;

    let db_pool = app_state.database_mgr.db();

    // Get the subscriber holding the token, a miss means the token is
    // unknown or was already consumed.
    let subscriber_id: i64 = sqlx::query_scalar(
        r#"SELECT id FROM subscribers
    WHERE token = $1"#,
    )
    .bind(&token)
    .fetch_optional(db_pool)
    .await?
    .ok_or(SubscribeConfirmError::TokenNotFound)?;

    confirm_subscriber(db_pool, subscriber_id).await?;
    info!("Subscriber confirmed.");

    Ok(Json(json!({ "ok": true })))
}

/// Consumes the token: the subscriber moves to confirmed and the token is
/// cleared so it can never be replayed.
async fn confirm_subscriber(db_pool: &PgPool, subscriber_id: i64) -> WebResult<()> {
    sqlx::query(
        r#"UPDATE subscribers
        SET status = $1, confirmed_at = $2, token = NULL
        WHERE id = $3"#,
    )
    .bind(SubscriberStatus::Confirmed.as_ref())
    .bind(Utc::now())
    .bind(subscriber_id)
    .execute(db_pool)
    .await?;

    Ok(())
}
