//! Most of the structs in `web` module and their implementations live here.
//! Includes payloads that need to be validated, their parsing implementations
//! and tests for those.
//!
//! Request bodies deserialize every field as a raw JSON value so that missing
//! and mistyped fields surface as a `DataParsingError` (HTTP 400) instead of
//! an extractor rejection.

use std::net::SocketAddr;

use axum::http::{header, HeaderMap};
use derive_more::Deref;
use rand::{rng, RngCore};
use serde::Deserialize;
use serde_json::Value;
use strum_macros::AsRefStr;

use crate::utils;

// ###################################
// ->   STRUCTS
// ###################################

/// Subscriber lifecycle status as persisted in the `subscribers` table.
/// A subscriber starts out pending and moves to confirmed exactly once per
/// issued token; re-subscribing resets them back to pending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, AsRefStr)]
#[strum(serialize_all = "lowercase")]
pub enum SubscriberStatus {
    Pending,
    Confirmed,
}

/// A deserializable subscribe request body.
#[derive(Debug, Deserialize)]
pub struct DeserSubscribeBody {
    #[serde(default)]
    pub email: Option<Value>,
}

/// A subscriber email that passed the presence check.
/// Only presence of a non-empty string is checked, the address is stored
/// verbatim.
#[derive(Debug, Clone)]
pub struct SubscriberEmail(String);

impl TryFrom<DeserSubscribeBody> for SubscriberEmail {
    type Error = DataParsingError;

    fn try_from(body: DeserSubscribeBody) -> Result<Self, Self::Error> {
        let email = non_empty_string(&body.email).ok_or(DataParsingError::EmailMissing)?;
        Ok(SubscriberEmail(email))
    }
}

impl AsRef<str> for SubscriberEmail {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A random 86 character-long case-sensitive Base64-URL encoded subscription token
#[derive(Debug, Deref)]
pub struct SubscriptionToken(String);

impl SubscriptionToken {
    /// Generates an array of 64 random bytes and encodes it to Base64-URL without padding.
    /// `rand::rng()` is cryptographically secure, so the token can act as a
    /// bearer credential for confirmation.
    pub fn generate() -> Self {
        let mut rand_bytes = [0u8; 64];
        rng().fill_bytes(&mut rand_bytes);
        let token = utils::b64u_encode(rand_bytes);

        Self(token)
    }
}

/// A deserializable struct that contains the confirmation `token` to be
/// deserialized from the query.
#[derive(Debug, Deserialize)]
pub struct ConfirmQuery {
    #[serde(default)]
    pub token: Option<String>,
}

impl ConfirmQuery {
    /// The token is opaque: any non-empty string is looked up as-is.
    pub fn into_token(self) -> Result<String, DataParsingError> {
        self.token
            .filter(|t| !t.is_empty())
            .ok_or(DataParsingError::TokenMissing)
    }
}

/// A deserializable contact form body.
#[derive(Debug, Deserialize)]
pub struct DeserContactBody {
    #[serde(default)]
    pub name: Option<Value>,
    #[serde(default)]
    pub email: Option<Value>,
    #[serde(default)]
    pub company: Option<Value>,
    #[serde(default)]
    pub message: Option<Value>,
}

/// A contact form submission with all the required fields present.
#[derive(Debug)]
pub struct ContactSubmission {
    pub name: String,
    pub email: String,
    pub company: Option<String>,
    pub message: String,
}

impl TryFrom<DeserContactBody> for ContactSubmission {
    type Error = DataParsingError;

    fn try_from(body: DeserContactBody) -> Result<Self, Self::Error> {
        let name = non_empty_string(&body.name);
        let email = non_empty_string(&body.email);
        let message = non_empty_string(&body.message);

        match (name, email, message) {
            (Some(name), Some(email), Some(message)) => Ok(ContactSubmission {
                name,
                email,
                company: non_empty_string(&body.company),
                message,
            }),
            _ => Err(DataParsingError::ContactFieldsMissing),
        }
    }
}

/// A deserializable analytics event body.
#[derive(Debug, Deserialize)]
pub struct DeserEventBody {
    #[serde(default)]
    pub session_id: Option<Value>,
    #[serde(default)]
    pub event_name: Option<Value>,
    #[serde(default)]
    pub path: Option<Value>,
}

/// An analytics event with the required fields present.
#[derive(Debug)]
pub struct EventSubmission {
    pub session_id: String,
    pub event_name: String,
    pub path: Option<String>,
}

impl TryFrom<DeserEventBody> for EventSubmission {
    type Error = DataParsingError;

    fn try_from(body: DeserEventBody) -> Result<Self, Self::Error> {
        match (
            non_empty_string(&body.session_id),
            non_empty_string(&body.event_name),
        ) {
            (Some(session_id), Some(event_name)) => Ok(EventSubmission {
                session_id,
                event_name,
                path: non_empty_string(&body.path),
            }),
            _ => Err(DataParsingError::EventFieldsMissing),
        }
    }
}

/// Attribution and client metadata captured from request headers, best-effort.
/// Absence of any of these is not an error.
#[derive(Debug, Default)]
pub struct RequestMeta {
    pub utm_source: Option<String>,
    pub utm_medium: Option<String>,
    pub utm_campaign: Option<String>,
    pub referer: Option<String>,
    pub user_agent: Option<String>,
    pub ip: Option<String>,
}

impl RequestMeta {
    pub fn from_parts(headers: &HeaderMap, peer: Option<SocketAddr>) -> Self {
        RequestMeta {
            utm_source: header_str(headers, "x-utm-source"),
            utm_medium: header_str(headers, "x-utm-medium"),
            utm_campaign: header_str(headers, "x-utm-campaign"),
            referer: header_str(headers, header::REFERER.as_str()),
            user_agent: header_str(headers, header::USER_AGENT.as_str()),
            ip: client_ip(headers, peer),
        }
    }
}

// ###################################
// ->   HELPERS
// ###################################

/// Extracts a non-empty string out of a raw JSON value.
/// Anything else (absent, null, empty, non-string) yields `None`, mirroring
/// the falsy-field rejection of the API contract.
fn non_empty_string(value: &Option<Value>) -> Option<String> {
    value
        .as_ref()
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
}

/// Reads a header value as an owned string, `None` when absent or not UTF-8.
pub fn header_str(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned)
}

/// Best-effort client address: the first entry of `X-Forwarded-For`, then the
/// transport peer address, then nothing.
pub fn client_ip(headers: &HeaderMap, peer: Option<SocketAddr>) -> Option<String> {
    header_str(headers, "x-forwarded-for")
        .and_then(|v| v.split(',').next().map(|ip| ip.trim().to_owned()))
        .filter(|ip| !ip.is_empty())
        .or_else(|| peer.map(|addr| addr.ip().to_string()))
}

// ###################################
// ->   ERROR
// ###################################
#[derive(Debug, thiserror::Error)]
pub enum DataParsingError {
    #[error("missing or empty email")]
    EmailMissing,
    #[error("missing subscription token")]
    TokenMissing,
    #[error("missing required contact fields")]
    ContactFieldsMissing,
    #[error("missing required event fields")]
    EventFieldsMissing,
}
