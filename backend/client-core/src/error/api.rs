use common::{ErrorLocation, HttpStatusCode};

use serde_json::Value;
use thiserror::Error as ThisError;

/// Failure of one API call, constructed exactly once at the request-client
/// boundary and never mutated afterwards.
#[derive(Debug, ThisError)]
pub enum ApiError {
    /// Network-level failure; the call never produced a status code.
    #[error("Transport Error: {message} {location}")]
    Transport {
        message: String,
        location: ErrorLocation,
    },

    /// JSON serialization or typed deserialization failure.
    #[error("JSON Error: {message} {location}")]
    Json {
        message: String,
        location: ErrorLocation,
    },

    /// Non-2xx response, normalized from the service error payload.
    #[error("HTTP Error: {status} - {message} {location}")]
    Http {
        status: HttpStatusCode,
        message: String,
        payload: Option<Value>,
        location: ErrorLocation,
    },

    /// A 2xx response that breaks the service contract (e.g. a create
    /// response without the new post id). Raised by callers above the
    /// request client, never by the client itself.
    #[error("Response Validation Error: {message} {location}")]
    Validation {
        message: String,
        location: ErrorLocation,
    },
}

impl ApiError {
    /// Normalize a non-2xx response into one `Http` error, preferring a
    /// payload `message`, then the first `errors` item, then `HTTP <status>`.
    #[track_caller]
    pub fn from_failure(status: u16, payload: Option<Value>) -> Self {
        let message = failure_message(status, payload.as_ref());
        ApiError::Http {
            status: HttpStatusCode(status),
            message,
            payload,
            location: ErrorLocation::here(),
        }
    }

    #[track_caller]
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::Validation {
            message: message.into(),
            location: ErrorLocation::here(),
        }
    }

    pub fn status_code(&self) -> Option<HttpStatusCode> {
        match self {
            ApiError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Full parsed error payload for caller inspection.
    pub fn payload(&self) -> Option<&Value> {
        match self {
            ApiError::Http { payload, .. } => payload.as_ref(),
            _ => None,
        }
    }

    /// Human-readable message for notification surfaces. Unlike `Display`
    /// this carries no source location.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Http { message, .. } | ApiError::Validation { message, .. } => {
                message.clone()
            }
            ApiError::Transport { .. } | ApiError::Json { .. } => {
                String::from("Network request failed")
            }
        }
    }
}

pub(crate) fn failure_message(status: u16, payload: Option<&Value>) -> String {
    payload
        .and_then(payload_message)
        .unwrap_or_else(|| format!("HTTP {status}"))
}

fn payload_message(payload: &Value) -> Option<String> {
    if let Some(message) = payload.get("message").and_then(Value::as_str) {
        return Some(message.to_owned());
    }
    payload
        .get("errors")?
        .get(0)?
        .get("message")?
        .as_str()
        .map(str::to_owned)
}

impl From<reqwest::Error> for ApiError {
    #[track_caller]
    fn from(error: reqwest::Error) -> Self {
        ApiError::Transport {
            message: error.to_string(),
            location: ErrorLocation::here(),
        }
    }
}

impl From<serde_json::Error> for ApiError {
    #[track_caller]
    fn from(error: serde_json::Error) -> Self {
        ApiError::Json {
            message: error.to_string(),
            location: ErrorLocation::here(),
        }
    }
}
