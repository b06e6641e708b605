//! Bearer credential attached to authenticated requests.
//!
//! A [`Credential`] is created by a successful login or token refresh,
//! cleared on logout or terminal refresh failure, and persisted across
//! process restarts by `remora-store`.

use serde::{Deserialize, Serialize};

/// Access/refresh token pair used to authenticate outbound requests.
///
/// The access token is attached as `Authorization: Bearer <token>` to every
/// authenticated request. The refresh token, when present, allows a new
/// access token to be obtained after the current one expires.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credential {
    /// Short-lived token attached to outbound requests.
    pub access_token: String,

    /// Long-lived token used to obtain a new access token. Absent for
    /// sessions that cannot be refreshed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
}

impl Credential {
    /// Creates a credential with both tokens.
    pub fn new(access_token: impl Into<String>, refresh_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            refresh_token: Some(refresh_token.into()),
        }
    }

    /// Creates a credential with an access token only.
    pub fn access_only(access_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            refresh_token: None,
        }
    }

    /// Returns the value for the `Authorization` header.
    pub fn bearer_header(&self) -> String {
        format!("Bearer {}", self.access_token)
    }

    /// Returns true if this credential can be refreshed.
    pub fn has_refresh_token(&self) -> bool {
        self.refresh_token.as_deref().is_some_and(|t| !t.is_empty())
    }
}

// ============================================================================
// Tests
// ============================================================================
