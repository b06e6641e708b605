//! The API client: ties the pipeline together.
//!
//! Control flow for one [`execute`](ApiClient::execute) call:
//!
//! 1. attach the stored bearer token (unless the request opted out);
//! 2. perform the HTTP call, racing it against the cancellation signal;
//! 3. on 401, obtain a fresh token through the [`RefreshCoordinator`] and
//!    replay the request once with the new credential;
//! 4. on transient failures, consult the [`RetryPolicy`] and back off;
//! 5. classify the final outcome into the [`ApiError`] taxonomy.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};
use url::Url;

use remora_core::CoreError;
use remora_store::CredentialStore;

use crate::endpoints;
use crate::error::{ApiError, classify_status, classify_transport};
use crate::refresh::RefreshCoordinator;
use crate::request::{ApiRequest, ApiResponse, Payload, RequestParts};
use crate::retry::RetryPolicy;
use crate::transport::{ReqwestTransport, Transport};

// ============================================================================
// Builder
// ============================================================================

/// Builder for constructing an [`ApiClient`].
pub struct ApiClientBuilder {
    base_url: String,
    store: CredentialStore,
    transport: Option<Arc<dyn Transport>>,
    retry: RetryPolicy,
}

impl ApiClientBuilder {
    /// Creates a builder for the given base URL and credential store.
    pub fn new(base_url: impl Into<String>, store: CredentialStore) -> Self {
        Self {
            base_url: base_url.into(),
            store,
            transport: None,
            retry: RetryPolicy::default(),
        }
    }

    /// Sets the transport implementation. Defaults to reqwest.
    pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Sets the retry policy.
    pub fn retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Builds the client.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is invalid.
    pub fn build(self) -> Result<ApiClient, CoreError> {
        let base_url = Url::parse(&self.base_url)
            .map_err(|e| CoreError::InvalidConfig(format!("Invalid base URL: {e}")))?;

        let transport = self
            .transport
            .unwrap_or_else(|| Arc::new(ReqwestTransport::new()));

        let refresh_url = base_url
            .join(endpoints::auth::REFRESH)
            .map_err(|e| CoreError::InvalidConfig(format!("Invalid refresh URL: {e}")))?;

        let refresh = RefreshCoordinator::new(
            Arc::clone(&transport),
            self.store.clone(),
            refresh_url.to_string(),
        );

        Ok(ApiClient {
            inner: Arc::new(ClientInner {
                base_url,
                transport,
                store: self.store,
                refresh,
                retry: self.retry,
            }),
        })
    }
}

// ============================================================================
// Client
// ============================================================================

/// Authenticated API client.
///
/// Cloning is cheap; all clones share the same credential store, refresh
/// coordinator, and transport.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    base_url: Url,
    transport: Arc<dyn Transport>,
    store: CredentialStore,
    refresh: RefreshCoordinator,
    retry: RetryPolicy,
}

impl ApiClient {
    /// Creates a client with default transport and retry policy.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is invalid.
    pub fn new(base_url: impl Into<String>, store: CredentialStore) -> Result<Self, CoreError> {
        Self::builder(base_url, store).build()
    }

    /// Creates a builder for customizing the client.
    pub fn builder(base_url: impl Into<String>, store: CredentialStore) -> ApiClientBuilder {
        ApiClientBuilder::new(base_url, store)
    }

    /// Returns the credential store backing this client.
    pub fn store(&self) -> &CredentialStore {
        &self.inner.store
    }

    // ========================================================================
    // Execution
    // ========================================================================

    /// Executes a request through the full pipeline.
    ///
    /// # Errors
    ///
    /// Returns one of the [`ApiError`] kinds; see the crate docs for the
    /// taxonomy.
    pub async fn execute(
        &self,
        request: ApiRequest,
        cancel: &CancellationToken,
    ) -> Result<ApiResponse, ApiError> {
        let mut attempt = 0u32;

        loop {
            match self.execute_once(&request, cancel).await {
                Ok(response) => return Ok(response),
                Err(error) => {
                    let decision = self.inner.retry.decide(attempt, &error);
                    if !decision.should_retry {
                        return Err(error.into_terminal());
                    }

                    warn!(
                        attempt,
                        delay = ?decision.delay,
                        error = %error,
                        "Request failed, retrying"
                    );

                    tokio::select! {
                        () = cancel.cancelled() => return Err(ApiError::Cancelled),
                        () = tokio::time::sleep(decision.delay) => {}
                    }

                    attempt += 1;
                }
            }
        }
    }

    /// One attempt: send, and handle 401 with a one-shot refresh-and-replay.
    async fn execute_once(
        &self,
        request: &ApiRequest,
        cancel: &CancellationToken,
    ) -> Result<ApiResponse, ApiError> {
        let bearer = if request.skip_auth {
            None
        } else {
            self.inner.store.get().map(|c| c.access_token)
        };

        let (status, payload) = self.send(request, bearer, cancel).await?;

        if (200..300).contains(&status) {
            return Ok(ApiResponse { status, payload });
        }

        if status == 401 && !request.skip_auth {
            if !self
                .inner
                .store
                .get()
                .is_some_and(|c| c.has_refresh_token())
            {
                // No way to recover the session locally.
                self.inner.store.clear().await;
                return Err(ApiError::AuthExpired);
            }

            debug!("Access token expired, refreshing");
            let new_token = self.inner.refresh.refresh().await?;

            let (status, payload) = self.send(request, Some(new_token), cancel).await?;

            if (200..300).contains(&status) {
                return Ok(ApiResponse { status, payload });
            }

            if status == 401 {
                // The refreshed token was rejected too; the session is gone.
                self.inner.store.clear().await;
                return Err(ApiError::AuthExpired);
            }

            return Err(classify_status(status, &payload));
        }

        Err(classify_status(status, &payload))
    }

    /// Performs one HTTP call, racing it against cancellation.
    async fn send(
        &self,
        request: &ApiRequest,
        bearer: Option<String>,
        cancel: &CancellationToken,
    ) -> Result<(u16, Payload), ApiError> {
        if cancel.is_cancelled() {
            return Err(ApiError::Cancelled);
        }

        let url = self
            .inner
            .base_url
            .join(&request.path)
            .map_err(|e| ApiError::invalid_request(format!("Invalid request path: {e}")))?;

        let parts = RequestParts {
            method: request.method,
            url: url.to_string(),
            bearer,
            body: request.body.clone(),
        };

        let raw = tokio::select! {
            () = cancel.cancelled() => return Err(ApiError::Cancelled),
            result = self.inner.transport.send(parts) => {
                result.map_err(|e| classify_transport(&e))?
            }
        };

        let payload = Payload::from_raw(&raw);
        Ok((raw.status, payload))
    }

    // ========================================================================
    // Convenience Methods
    // ========================================================================

    /// Performs an authenticated GET request.
    ///
    /// # Errors
    ///
    /// See [`ApiError`].
    pub async fn get(&self, path: &str) -> Result<ApiResponse, ApiError> {
        self.execute(ApiRequest::get(path), &CancellationToken::new())
            .await
    }

    /// Performs an authenticated POST request with a JSON body.
    ///
    /// # Errors
    ///
    /// See [`ApiError`].
    pub async fn post<T: serde::Serialize + ?Sized>(
        &self,
        path: &str,
        body: &T,
    ) -> Result<ApiResponse, ApiError> {
        let request = ApiRequest::post(path)
            .json(body)
            .map_err(|e| ApiError::invalid_request(e.to_string()))?;
        self.execute(request, &CancellationToken::new()).await
    }

    /// Performs an authenticated PUT request with a JSON body.
    ///
    /// # Errors
    ///
    /// See [`ApiError`].
    pub async fn put<T: serde::Serialize + ?Sized>(
        &self,
        path: &str,
        body: &T,
    ) -> Result<ApiResponse, ApiError> {
        let request = ApiRequest::put(path)
            .json(body)
            .map_err(|e| ApiError::invalid_request(e.to_string()))?;
        self.execute(request, &CancellationToken::new()).await
    }

    /// Performs an authenticated PATCH request with a JSON body.
    ///
    /// # Errors
    ///
    /// See [`ApiError`].
    pub async fn patch<T: serde::Serialize + ?Sized>(
        &self,
        path: &str,
        body: &T,
    ) -> Result<ApiResponse, ApiError> {
        let request = ApiRequest::patch(path)
            .json(body)
            .map_err(|e| ApiError::invalid_request(e.to_string()))?;
        self.execute(request, &CancellationToken::new()).await
    }

    /// Performs an authenticated DELETE request.
    ///
    /// # Errors
    ///
    /// See [`ApiError`].
    pub async fn delete(&self, path: &str) -> Result<ApiResponse, ApiError> {
        self.execute(ApiRequest::delete(path), &CancellationToken::new())
            .await
    }

    /// Performs an unauthenticated POST request (login, register).
    ///
    /// # Errors
    ///
    /// See [`ApiError`].
    pub async fn post_public<T: serde::Serialize + ?Sized>(
        &self,
        path: &str,
        body: &T,
    ) -> Result<ApiResponse, ApiError> {
        let request = ApiRequest::post(path)
            .json(body)
            .map_err(|e| ApiError::invalid_request(e.to_string()))?
            .public();
        self.execute(request, &CancellationToken::new()).await
    }
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.inner.base_url.as_str())
            .field("retry", &self.inner.retry)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Tests
// ============================================================================
