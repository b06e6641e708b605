//! Authentication request and response payloads.
//!
//! Shapes match the backend's `/auth/` endpoints: JSON bodies with
//! snake_case fields, tokens returned as `access_token`/`refresh_token`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::credential::Credential;

// ============================================================================
// Requests
// ============================================================================

/// Body for `POST /auth/login/`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    /// Account email address.
    pub email: String,
    /// Account password.
    pub password: String,
}

/// Body for `POST /auth/register/user/`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Account email address.
    pub email: String,
    /// Account password.
    pub password: String,
    /// Optional phone number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
}

// ============================================================================
// Responses
// ============================================================================

/// Token payload returned by login, register, and refresh endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    /// New access token.
    pub access_token: String,
    /// New refresh token, when the endpoint rotates it.
    #[serde(default)]
    pub refresh_token: Option<String>,
}

impl TokenResponse {
    /// Converts the response into a [`Credential`], keeping the previous
    /// refresh token when the endpoint did not rotate it.
    pub fn into_credential(self, previous_refresh: Option<String>) -> Credential {
        Credential {
            access_token: self.access_token,
            refresh_token: self.refresh_token.or(previous_refresh),
        }
    }
}

/// Account profile returned by `GET /auth/profile/`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    /// Account identifier.
    pub id: String,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Account email address.
    pub email: String,
    /// Optional phone number.
    #[serde(default)]
    pub phone_number: Option<String>,
    /// Optional avatar URL.
    #[serde(default)]
    pub profile_picture: Option<String>,
    /// Account creation timestamp.
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl UserProfile {
    /// Returns the display name ("First Last").
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

// ============================================================================
// Tests
// ============================================================================
