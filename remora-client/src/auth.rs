//! Authentication surface: login, register, profile, logout.
//!
//! These are the collaborator contracts around the pipeline: login and
//! register produce the initial credential, logout clears it, and profile
//! is an ordinary authenticated call.

use tracing::{debug, instrument};

use remora_core::{Credential, LoginRequest, RegisterRequest, TokenResponse, UserProfile};

use crate::client::ApiClient;
use crate::endpoints;
use crate::error::ApiError;

impl ApiClient {
    /// Logs in and stores the resulting credential.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Client`] for rejected credentials and the usual
    /// taxonomy for transport failures.
    #[instrument(skip(self, password))]
    pub async fn login(&self, email: &str, password: &str) -> Result<Credential, ApiError> {
        let body = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };

        let response = self.post_public(endpoints::auth::LOGIN, &body).await?;
        let tokens: TokenResponse = response
            .json()
            .map_err(|e| ApiError::invalid_payload(response.status, e.to_string()))?;

        let credential = tokens.into_credential(None);
        self.store().set(credential.clone()).await;

        debug!("Logged in");
        Ok(credential)
    }

    /// Registers a new account and stores the resulting credential.
    ///
    /// # Errors
    ///
    /// See [`ApiError`].
    #[instrument(skip(self, request))]
    pub async fn register(&self, request: &RegisterRequest) -> Result<Credential, ApiError> {
        let response = self
            .post_public(endpoints::auth::REGISTER_USER, request)
            .await?;
        let tokens: TokenResponse = response
            .json()
            .map_err(|e| ApiError::invalid_payload(response.status, e.to_string()))?;

        let credential = tokens.into_credential(None);
        self.store().set(credential.clone()).await;

        debug!("Registered");
        Ok(credential)
    }

    /// Fetches the current account profile.
    ///
    /// # Errors
    ///
    /// See [`ApiError`].
    pub async fn profile(&self) -> Result<UserProfile, ApiError> {
        let response = self.get(endpoints::auth::PROFILE).await?;
        response
            .json()
            .map_err(|e| ApiError::invalid_payload(response.status, e.to_string()))
    }

    /// Logs out, clearing the stored credential.
    pub async fn logout(&self) {
        self.store().clear().await;
        debug!("Logged out");
    }
}
