use std::net::SocketAddr;

use axum::{
    extract::{ConnectInfo, State},
    http::{header, HeaderMap},
    Json,
};
use serde_json::{json, Value};
use sqlx::PgPool;
use tracing::info;

use crate::web::{
    self,
    types::{self, DeserEventBody, EventSubmission},
    WebResult,
};
use crate::AppState;

// ###################################
// ->   ERROR
// ###################################
#[derive(Debug, thiserror::Error)]
pub enum EventsError {
    #[error("data parsing error: {0}")]
    DataParsing(#[from] web::types::DataParsingError),
}

// ###################################
// ->   API
// ###################################
#[tracing::instrument(name = "Logging an analytics event", skip_all)]
pub async fn events(
    State(app_state): State<AppState>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
    Json(body): Json<DeserEventBody>,
) -> WebResult<Json<Value>> {
    let event: EventSubmission = body.try_into().map_err(EventsError::DataParsing)?;
    let user_agent = types::header_str(&headers, header::USER_AGENT.as_str());
    let ip = types::client_ip(&headers, Some(peer));

    insert_event_log(app_state.database_mgr.db(), &event, user_agent, ip).await?;
    info!("Event logged.");

    Ok(Json(json!({ "ok": true })))
}

async fn insert_event_log(
    db_pool: &PgPool,
    event: &EventSubmission,
    user_agent: Option<String>,
    ip: Option<String>,
) -> WebResult<()> {
    sqlx::query(
        r#"
        INSERT INTO event_logs (session_id, event_name, path, user_agent, ip)
        VALUES ($1, $2, $3, $4, $5)
    "#,
    )
    .bind(&event.session_id)
    .bind(&event.event_name)
    .bind(&event.path)
    .bind(user_agent)
    .bind(ip)
    .execute(db_pool)
    .await?;

    Ok(())
}
