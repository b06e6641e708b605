//! Error taxonomy surfaced to callers.
//!
//! Every outcome of the request pipeline maps to one of five kinds. The
//! classifier is a pure function from (HTTP status, payload, transport
//! failure) to a kind plus a human-readable message, preferring a message
//! carried in the structured error payload over per-status generic text.

use thiserror::Error;

use crate::request::Payload;
use crate::transport::TransportError;

// ============================================================================
// Error Taxonomy
// ============================================================================

/// Final error surfaced by the request pipeline.
///
/// Callers pattern-match on this closed set instead of probing status codes
/// or payload shapes themselves.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// The caller aborted the request. Never retried.
    #[error("Request cancelled")]
    Cancelled,

    /// The credential could not be refreshed; the store has been cleared
    /// and the caller should redirect to login.
    #[error("Session expired. Please login again.")]
    AuthExpired,

    /// Non-transient 4xx response. Not retried.
    #[error("{message}")]
    Client {
        /// HTTP status code.
        status: u16,
        /// Message from the error payload, or generic per-status text.
        message: String,
    },

    /// Network failure, 5xx, 429, or 408. Retried up to the bound.
    #[error("{message}")]
    Transient {
        /// HTTP status code, if the failure produced a response.
        status: Option<u16>,
        /// Message from the error payload, or generic text.
        message: String,
    },

    /// Repeated 5xx after retry exhaustion.
    #[error("{message}")]
    Server {
        /// HTTP status code of the last response.
        status: u16,
        /// Generic server-error message.
        message: String,
    },
}

impl ApiError {
    /// Returns the HTTP status carried by this error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Cancelled | Self::AuthExpired => None,
            Self::Client { status, .. } | Self::Server { status, .. } => Some(*status),
            Self::Transient { status, .. } => *status,
        }
    }

    /// Returns true if a retry is considered likely to succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Transient { .. })
    }

    /// Error for a request that could not be serialized. Classified as a
    /// client error so it is never retried.
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::Client {
            status: 400,
            message: message.into(),
        }
    }

    /// Error for a success response whose payload did not match the
    /// expected shape.
    pub fn invalid_payload(status: u16, message: impl Into<String>) -> Self {
        Self::Client {
            status,
            message: message.into(),
        }
    }

    /// Maps a transient error that exhausted its retries to its terminal
    /// form: repeated 5xx becomes [`ApiError::Server`], everything else is
    /// re-raised unchanged.
    pub fn into_terminal(self) -> Self {
        match self {
            Self::Transient {
                status: Some(status),
                ..
            } if status >= 500 => Self::Server {
                status,
                message: GENERIC_SERVER_ERROR.to_string(),
            },
            other => other,
        }
    }
}

// ============================================================================
// Generic Messages
// ============================================================================

const GENERIC_FORBIDDEN: &str =
    "Access forbidden. You do not have permission to perform this action.";
const GENERIC_NOT_FOUND: &str = "Resource not found.";
const GENERIC_UNAUTHORIZED: &str = "Authentication failed. Please login again.";
const GENERIC_SERVER_ERROR: &str = "Server error. Please try again later.";
const GENERIC_NETWORK_ERROR: &str = "Network error. Please check your connection.";
const GENERIC_TIMEOUT: &str = "Request timed out. Please try again.";
const GENERIC_RATE_LIMITED: &str = "Too many requests. Please try again later.";

fn generic_message(status: u16) -> String {
    match status {
        401 => GENERIC_UNAUTHORIZED.to_string(),
        403 => GENERIC_FORBIDDEN.to_string(),
        404 => GENERIC_NOT_FOUND.to_string(),
        408 => GENERIC_TIMEOUT.to_string(),
        429 => GENERIC_RATE_LIMITED.to_string(),
        s if s >= 500 => GENERIC_SERVER_ERROR.to_string(),
        s => format!("Request failed with status {s}"),
    }
}

// ============================================================================
// Classifier
// ============================================================================

/// Classifies a non-2xx HTTP response.
///
/// The message is taken from the payload's `error` field, then its
/// `message` field, falling back to generic per-status text. 429 and 408
/// are transient; all other 4xx are client errors; 5xx are transient until
/// the retry bound converts them to [`ApiError::Server`].
pub fn classify_status(status: u16, payload: &Payload) -> ApiError {
    let message = payload
        .message()
        .map_or_else(|| generic_message(status), ToString::to_string);

    match status {
        408 | 429 => ApiError::Transient {
            status: Some(status),
            message,
        },
        400..=499 => ApiError::Client { status, message },
        s if s >= 500 => ApiError::Transient {
            status: Some(status),
            message,
        },
        _ => ApiError::Client { status, message },
    }
}

/// Classifies a transport-level failure (no HTTP response was produced).
pub fn classify_transport(error: &TransportError) -> ApiError {
    let message = match error {
        TransportError::Timeout => GENERIC_TIMEOUT.to_string(),
        TransportError::Connect(_) | TransportError::Other(_) => GENERIC_NETWORK_ERROR.to_string(),
    };

    ApiError::Transient {
        status: None,
        message,
    }
}

// ============================================================================
// Tests
// ============================================================================
