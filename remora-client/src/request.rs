//! Request description and response payloads.
//!
//! An [`ApiRequest`] describes one logical call against the configured base
//! URL. The pipeline turns it into [`RequestParts`] per attempt, so retries
//! and the post-refresh replay each get a fresh attempt with the current
//! bearer token.

use serde::Serialize;
use serde_json::Value;

use remora_core::CoreError;

use crate::transport::RawResponse;

// ============================================================================
// Method
// ============================================================================

/// HTTP method for an API request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    /// GET
    Get,
    /// POST
    Post,
    /// PUT
    Put,
    /// PATCH
    Patch,
    /// DELETE
    Delete,
}

impl Method {
    /// Returns the method as an uppercase string.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
        }
    }
}

// ============================================================================
// Request
// ============================================================================

/// One logical API call.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    /// HTTP method.
    pub method: Method,
    /// Path relative to the base URL, e.g. `/deals/all/`.
    pub path: String,
    /// Optional JSON body.
    pub body: Option<Value>,
    /// When true, no bearer token is attached and a 401 never triggers a
    /// refresh (login, register, and the refresh call itself).
    pub skip_auth: bool,
}

impl ApiRequest {
    /// Creates a request with the given method and path.
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            body: None,
            skip_auth: false,
        }
    }

    /// Creates a GET request.
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::Get, path)
    }

    /// Creates a POST request.
    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::Post, path)
    }

    /// Creates a PUT request.
    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::Put, path)
    }

    /// Creates a PATCH request.
    pub fn patch(path: impl Into<String>) -> Self {
        Self::new(Method::Patch, path)
    }

    /// Creates a DELETE request.
    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::Delete, path)
    }

    /// Attaches a JSON body.
    ///
    /// # Errors
    ///
    /// Returns an error if the body cannot be serialized.
    pub fn json<T: Serialize + ?Sized>(mut self, body: &T) -> Result<Self, CoreError> {
        self.body = Some(serde_json::to_value(body)?);
        Ok(self)
    }

    /// Marks the request as unauthenticated.
    pub fn public(mut self) -> Self {
        self.skip_auth = true;
        self
    }
}

/// One concrete attempt handed to the transport.
#[derive(Debug, Clone)]
pub struct RequestParts {
    /// HTTP method.
    pub method: Method,
    /// Absolute URL.
    pub url: String,
    /// Bearer token to attach, if any.
    pub bearer: Option<String>,
    /// Optional JSON body.
    pub body: Option<Value>,
}

// ============================================================================
// Payload & Response
// ============================================================================

/// Response body, parsed according to its declared content type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload {
    /// A JSON body.
    Json(Value),
    /// A non-JSON body, kept as text.
    Text(String),
    /// An empty body.
    Empty,
}

impl Payload {
    /// Parses a raw response body by content type. A body declared as JSON
    /// that fails to parse is kept as text.
    pub fn from_raw(raw: &RawResponse) -> Self {
        if raw.body.is_empty() {
            return Self::Empty;
        }

        let is_json = raw
            .content_type
            .as_deref()
            .is_some_and(|ct| ct.contains("application/json"));

        if is_json {
            match serde_json::from_str(&raw.body) {
                Ok(value) => Self::Json(value),
                Err(_) => Self::Text(raw.body.clone()),
            }
        } else {
            Self::Text(raw.body.clone())
        }
    }

    /// Extracts a human-readable message from a structured error payload:
    /// the `error` field, then the `message` field.
    pub fn message(&self) -> Option<&str> {
        let Self::Json(value) = self else {
            return None;
        };

        value
            .get("error")
            .and_then(Value::as_str)
            .or_else(|| value.get("message").and_then(Value::as_str))
    }
}

/// Successful response returned to callers.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    /// HTTP status code (always 2xx).
    pub status: u16,
    /// Parsed body.
    pub payload: Payload,
}

impl ApiResponse {
    /// Deserializes a JSON payload into `T`.
    ///
    /// # Errors
    ///
    /// Returns an error if the payload is not JSON or does not match `T`.
    pub fn json<T: serde::de::DeserializeOwned>(&self) -> Result<T, CoreError> {
        match &self.payload {
            Payload::Json(value) => Ok(serde_json::from_value(value.clone())?),
            Payload::Text(_) | Payload::Empty => Err(CoreError::InvalidData(
                "Expected a JSON response body".to_string(),
            )),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
