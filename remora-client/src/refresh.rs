//! Credential refresh coordination.
//!
//! At most one refresh call is outstanding regardless of how many requests
//! observe a 401 concurrently. The first observer starts the refresh and
//! parks a shared handle; later observers of the same expiry generation
//! await that handle and receive the identical new access token. The
//! handle is cleared when the operation settles, so a future expiry starts
//! a fresh refresh.
//!
//! State machine: `Idle -> Refreshing -> Idle` (success or failure). On
//! failure the credential store is cleared and every waiter receives
//! [`ApiError::AuthExpired`]; this outcome is terminal and never retried.

use std::sync::{Arc, Mutex};

use futures::FutureExt;
use futures::future::{BoxFuture, Shared};
use serde_json::json;
use tracing::{debug, warn};

use remora_core::TokenResponse;
use remora_store::CredentialStore;

use crate::error::ApiError;
use crate::request::{Method, Payload, RequestParts};
use crate::transport::Transport;

type SharedRefresh = Shared<BoxFuture<'static, Result<String, ApiError>>>;

/// Serializes concurrent credential-refresh attempts into one in-flight
/// operation.
pub struct RefreshCoordinator {
    transport: Arc<dyn Transport>,
    store: CredentialStore,
    refresh_url: String,
    pending: Arc<Mutex<Option<SharedRefresh>>>,
}

impl RefreshCoordinator {
    /// Creates a coordinator posting to the given absolute refresh URL.
    pub fn new(transport: Arc<dyn Transport>, store: CredentialStore, refresh_url: String) -> Self {
        Self {
            transport,
            store,
            refresh_url,
            pending: Arc::new(Mutex::new(None)),
        }
    }

    /// Obtains a fresh access token, joining an in-flight refresh if one
    /// exists.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::AuthExpired`] if the refresh fails for any
    /// reason; the credential store has been cleared by then.
    ///
    /// # Panics
    ///
    /// Panics if the pending-handle lock is poisoned.
    pub async fn refresh(&self) -> Result<String, ApiError> {
        let shared = {
            let mut pending = self.pending.lock().unwrap();
            if let Some(existing) = pending.as_ref() {
                debug!("Joining in-flight credential refresh");
                existing.clone()
            } else {
                debug!("Starting credential refresh");
                let fut = self.start_refresh();
                *pending = Some(fut.clone());
                fut
            }
        };

        shared.await
    }

    /// Builds the shared refresh future. The future clears the pending
    /// slot itself as its final step, so the slot empties exactly once per
    /// refresh generation.
    fn start_refresh(&self) -> SharedRefresh {
        let transport = Arc::clone(&self.transport);
        let store = self.store.clone();
        let refresh_url = self.refresh_url.clone();
        let pending = Arc::clone(&self.pending);

        async move {
            let result = Self::perform_refresh(transport, &store, refresh_url).await;

            if result.is_err() {
                warn!("Credential refresh failed, clearing stored credential");
                store.clear().await;
            }

            *pending.lock().unwrap() = None;
            result
        }
        .boxed()
        .shared()
    }

    /// Performs the actual refresh call and updates the store on success.
    async fn perform_refresh(
        transport: Arc<dyn Transport>,
        store: &CredentialStore,
        refresh_url: String,
    ) -> Result<String, ApiError> {
        let Some(refresh_token) = store.refresh_token() else {
            return Err(ApiError::AuthExpired);
        };

        let parts = RequestParts {
            method: Method::Post,
            url: refresh_url,
            bearer: None,
            body: Some(json!({ "refresh_token": refresh_token })),
        };

        let raw = transport
            .send(parts)
            .await
            .map_err(|_| ApiError::AuthExpired)?;

        if !(200..300).contains(&raw.status) {
            return Err(ApiError::AuthExpired);
        }

        let payload = Payload::from_raw(&raw);
        let Payload::Json(value) = payload else {
            return Err(ApiError::AuthExpired);
        };

        let tokens: TokenResponse =
            serde_json::from_value(value).map_err(|_| ApiError::AuthExpired)?;

        let access_token = tokens.access_token.clone();
        let credential = tokens.into_credential(Some(refresh_token));
        store.set(credential).await;

        debug!("Credential refreshed");
        Ok(access_token)
    }
}

impl std::fmt::Debug for RefreshCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RefreshCoordinator")
            .field("refresh_url", &self.refresh_url)
            .finish_non_exhaustive()
    }
}
