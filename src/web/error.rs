use std::sync::Arc;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use strum_macros::AsRefStr;

use super::routes::{ContactError, EventsError, SubscribeConfirmError, SubscribeError};

pub type WebResult<T> = core::result::Result<T, Error>;

#[derive(Debug, AsRefStr, thiserror::Error)]
pub enum Error {
    #[error("subscribe error: {0}")]
    Subscribe(#[from] SubscribeError),
    #[error("subscribe confirm error: {0}")]
    SubscribeConfirm(#[from] SubscribeConfirmError),
    #[error("contact error: {0}")]
    Contact(#[from] ContactError),
    #[error("events error: {0}")]
    Events(#[from] EventsError),

    #[error("sqlx error: {0}")]
    Sqlx(#[from] sqlx::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Collapses internal errors into the status code and flat message the
    /// API exposes. Anything unexpected becomes a generic `ServerError` so
    /// that no internal detail leaks to the caller.
    pub fn status_code_and_client_error(&self) -> (StatusCode, ClientError) {
        use ClientError::*;

        match self {
            Error::Subscribe(SubscribeError::DataParsing(_)) => {
                (StatusCode::BAD_REQUEST, InvalidEmail)
            }
            Error::SubscribeConfirm(SubscribeConfirmError::DataParsing(_)) => {
                (StatusCode::BAD_REQUEST, MissingToken)
            }
            Error::SubscribeConfirm(SubscribeConfirmError::TokenNotFound) => {
                (StatusCode::NOT_FOUND, NotFound)
            }
            Error::Contact(ContactError::DataParsing(_)) => {
                (StatusCode::BAD_REQUEST, MissingRequiredFields)
            }
            Error::Events(EventsError::DataParsing(_)) => (StatusCode::BAD_REQUEST, MissingFields),
            _ => (StatusCode::INTERNAL_SERVER_ERROR, ServerError),
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        tracing::debug!("{:<12} - into_response(Error: {self:?})", "INTO_RESP");

        // Construct a response
        let mut res = StatusCode::INTERNAL_SERVER_ERROR.into_response();

        // Insert the Error into response so that it can be retrieved later.
        res.extensions_mut().insert(Arc::new(self));

        res
    }
}

/// The errors surfaced to API callers, serialized as `{"error": "..."}`.
#[derive(Debug, AsRefStr, derive_more::Display)]
pub enum ClientError {
    #[display("Invalid email")]
    InvalidEmail,
    #[display("Missing token")]
    MissingToken,
    #[display("Missing required fields")]
    MissingRequiredFields,
    #[display("Missing fields")]
    MissingFields,
    #[display("Not found")]
    NotFound,
    #[display("Server error")]
    ServerError,
}
