//! Contains all the routes that this application can handle.

mod api;

// re-export errors
pub use api::{
    contact::ContactError, events::EventsError, subscribe::SubscribeError,
    subscribe_confirm::SubscribeConfirmError,
};

use axum::{
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};

use crate::AppState;

async fn health() -> Json<Value> {
    Json(json!({ "ok": true }))
}

/// All the routes of the server
pub fn routes(app_state: AppState) -> Router {
    Router::new().nest("/api", api_routes(app_state))
}

/// API - Routes nested under "/api" path
fn api_routes(app_state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/subscribe", post(api::subscribe))
        .route("/confirm", get(api::subscribe_confirm))
        .route("/contact", post(api::contact))
        .route("/events", post(api::events))
        .with_state(app_state)
}
