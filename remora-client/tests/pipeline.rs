//! End-to-end scenarios for the request pipeline, driven by a scripted
//! in-process transport.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use futures::future::join_all;

use remora_client::{
    ApiClient, ApiError, ApiRequest, CancellationToken, RawResponse, RequestParts, RetryPolicy,
    Transport, TransportError,
};
use remora_core::Credential;
use remora_store::CredentialStore;

// ============================================================================
// Fake Transport
// ============================================================================

/// What the fake transport does with one request.
enum Action {
    /// Respond immediately.
    Respond(RawResponse),
    /// Fail at the transport level.
    Fail(TransportError),
    /// Respond after a delay (paused-clock tests).
    DelayedRespond(u64, RawResponse),
    /// Never respond (cancellation tests).
    Hang,
}

type Handler = dyn Fn(&RequestParts) -> Action + Send + Sync;

struct FakeTransport {
    handler: Box<Handler>,
    calls: AtomicU32,
    refresh_calls: AtomicU32,
}

impl FakeTransport {
    fn new(handler: impl Fn(&RequestParts) -> Action + Send + Sync + 'static) -> Self {
        Self {
            handler: Box::new(handler),
            calls: AtomicU32::new(0),
            refresh_calls: AtomicU32::new(0),
        }
    }

    /// Pops scripted actions in order; panics if the script runs dry.
    fn scripted(actions: Vec<Action>) -> Self {
        let queue = Mutex::new(actions.into_iter().collect::<VecDeque<_>>());
        Self::new(move |_| {
            queue
                .lock()
                .unwrap()
                .pop_front()
                .expect("fake transport script exhausted")
        })
    }

    fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }

    fn refresh_calls(&self) -> u32 {
        self.refresh_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Transport for FakeTransport {
    async fn send(&self, request: RequestParts) -> Result<RawResponse, TransportError> {
        if request.url.contains("/auth/refresh/") {
            self.refresh_calls.fetch_add(1, Ordering::SeqCst);
        } else {
            self.calls.fetch_add(1, Ordering::SeqCst);
        }

        match (self.handler)(&request) {
            Action::Respond(response) => Ok(response),
            Action::Fail(error) => Err(error),
            Action::DelayedRespond(ms, response) => {
                tokio::time::sleep(Duration::from_millis(ms)).await;
                Ok(response)
            }
            Action::Hang => {
                futures::future::pending::<()>().await;
                unreachable!()
            }
        }
    }
}

// ============================================================================
// Helpers
// ============================================================================

fn json_response(status: u16, body: &str) -> RawResponse {
    RawResponse {
        status,
        content_type: Some("application/json".to_string()),
        body: body.to_string(),
    }
}

fn client_with(
    transport: std::sync::Arc<FakeTransport>,
    store: CredentialStore,
    retry: RetryPolicy,
) -> ApiClient {
    ApiClient::builder("https://api.test", store)
        .transport(transport)
        .retry_policy(retry)
        .build()
        .unwrap()
}

// ============================================================================
// Scenarios
// ============================================================================

#[tokio::test]
async fn valid_credential_succeeds_without_refresh_or_retry() {
    let transport = std::sync::Arc::new(FakeTransport::scripted(vec![Action::Respond(
        json_response(200, r#"{"ok": true}"#),
    )]));
    let store = CredentialStore::in_memory();
    store.set(Credential::new("valid", "refresh-1")).await;

    let client = client_with(transport.clone(), store, RetryPolicy::default());
    let response = client.get("/deals/all/").await.unwrap();

    assert_eq!(response.status, 200);
    assert_eq!(transport.calls(), 1);
    assert_eq!(transport.refresh_calls(), 0);
}

#[tokio::test]
async fn bearer_token_attached_unless_opted_out() {
    let transport = std::sync::Arc::new(FakeTransport::new(|request| {
        // Echo back whether a bearer was attached
        let body = if request.bearer.is_some() {
            r#"{"auth": true}"#
        } else {
            r#"{"auth": false}"#
        };
        Action::Respond(json_response(200, body))
    }));
    let store = CredentialStore::in_memory();
    store.set(Credential::access_only("tok")).await;

    let client = client_with(transport, store, RetryPolicy::no_retry());

    let authed = client.get("/auth/profile/").await.unwrap();
    assert_eq!(
        authed.payload,
        remora_client::Payload::Json(serde_json::json!({"auth": true}))
    );

    let public = client
        .execute(ApiRequest::get("/deals/all/").public(), &CancellationToken::new())
        .await
        .unwrap();
    assert_eq!(
        public.payload,
        remora_client::Payload::Json(serde_json::json!({"auth": false}))
    );
}

#[tokio::test]
async fn expired_credential_refreshes_once_and_replays() {
    // 401 for the stale token, 200 once the fresh token is attached
    let transport = std::sync::Arc::new(FakeTransport::new(|request| {
        if request.url.contains("/auth/refresh/") {
            return Action::Respond(json_response(200, r#"{"access_token": "fresh"}"#));
        }
        match request.bearer.as_deref() {
            Some("fresh") => Action::Respond(json_response(200, r#"{"ok": true}"#)),
            _ => Action::Respond(json_response(401, r#"{"error": "token expired"}"#)),
        }
    }));
    let store = CredentialStore::in_memory();
    store.set(Credential::new("stale", "refresh-1")).await;

    let client = client_with(transport.clone(), store.clone(), RetryPolicy::default());
    let response = client.get("/deals/all/").await.unwrap();

    assert_eq!(response.status, 200);
    assert_eq!(transport.refresh_calls(), 1);
    assert_eq!(transport.calls(), 2); // original + replay

    // Store now holds the refreshed access token and kept the refresh token
    let credential = store.get().unwrap();
    assert_eq!(credential.access_token, "fresh");
    assert_eq!(credential.refresh_token.as_deref(), Some("refresh-1"));
}

#[tokio::test]
async fn failed_refresh_clears_store_and_surfaces_auth_expired() {
    let transport = std::sync::Arc::new(FakeTransport::new(|request| {
        if request.url.contains("/auth/refresh/") {
            return Action::Respond(json_response(401, r#"{"error": "refresh revoked"}"#));
        }
        Action::Respond(json_response(401, "{}"))
    }));
    let store = CredentialStore::in_memory();
    store.set(Credential::new("stale", "refresh-1")).await;

    let client = client_with(transport.clone(), store.clone(), RetryPolicy::default());
    let err = client.get("/deals/all/").await.unwrap_err();

    assert_eq!(err, ApiError::AuthExpired);
    assert_eq!(transport.refresh_calls(), 1);
    assert!(store.get().is_none());
}

#[tokio::test]
async fn missing_refresh_token_skips_refresh_entirely() {
    let transport = std::sync::Arc::new(FakeTransport::scripted(vec![Action::Respond(
        json_response(401, "{}"),
    )]));
    let store = CredentialStore::in_memory();
    store.set(Credential::access_only("stale")).await;

    let client = client_with(transport.clone(), store.clone(), RetryPolicy::default());
    let err = client.get("/deals/all/").await.unwrap_err();

    assert_eq!(err, ApiError::AuthExpired);
    assert_eq!(transport.refresh_calls(), 0);
    assert!(store.get().is_none());
}

#[tokio::test(start_paused = true)]
async fn concurrent_401s_share_a_single_refresh() {
    const CALLERS: usize = 8;

    let transport = std::sync::Arc::new(FakeTransport::new(|request| {
        if request.url.contains("/auth/refresh/") {
            // Hold the refresh in flight so every caller joins it
            return Action::DelayedRespond(50, json_response(200, r#"{"access_token": "new"}"#));
        }
        match request.bearer.as_deref() {
            Some("new") => Action::Respond(json_response(200, r#"{"ok": true}"#)),
            _ => Action::Respond(json_response(401, "{}")),
        }
    }));
    let store = CredentialStore::in_memory();
    store.set(Credential::new("old", "refresh-1")).await;

    let client = client_with(transport.clone(), store.clone(), RetryPolicy::default());

    let results = join_all((0..CALLERS).map(|_| {
        let client = client.clone();
        async move { client.get("/deals/all/").await }
    }))
    .await;

    for result in results {
        assert_eq!(result.unwrap().status, 200);
    }

    // Exactly one refresh, and every caller resumed with the same token
    assert_eq!(transport.refresh_calls(), 1);
    assert_eq!(store.get().unwrap().access_token, "new");
    assert_eq!(transport.calls(), (CALLERS * 2) as u32);
}

#[tokio::test(start_paused = true)]
async fn transient_503s_retried_until_success() {
    let transport = std::sync::Arc::new(FakeTransport::scripted(vec![
        Action::Respond(json_response(503, "{}")),
        Action::Respond(json_response(503, "{}")),
        Action::Respond(json_response(503, "{}")),
        Action::Respond(json_response(200, r#"{"ok": true}"#)),
    ]));
    let store = CredentialStore::in_memory();
    store.set(Credential::access_only("tok")).await;

    let client = client_with(transport.clone(), store, RetryPolicy::default());
    let response = client.get("/deals/all/").await.unwrap();

    assert_eq!(response.status, 200);
    assert_eq!(transport.calls(), 4);
    assert_eq!(transport.refresh_calls(), 0);
}

#[tokio::test(start_paused = true)]
async fn exhausted_5xx_surfaces_as_server_error() {
    let transport = std::sync::Arc::new(FakeTransport::scripted(vec![
        Action::Respond(json_response(503, "{}")),
        Action::Respond(json_response(503, "{}")),
        Action::Respond(json_response(503, "{}")),
        Action::Respond(json_response(503, "{}")),
    ]));
    let store = CredentialStore::in_memory();
    store.set(Credential::access_only("tok")).await;

    let client = client_with(transport.clone(), store, RetryPolicy::default());
    let err = client.get("/deals/all/").await.unwrap_err();

    assert_eq!(transport.calls(), 4);
    assert!(matches!(err, ApiError::Server { status: 503, .. }));
}

#[tokio::test(start_paused = true)]
async fn network_errors_retried_and_last_error_reraised() {
    let transport = std::sync::Arc::new(FakeTransport::new(|_| {
        Action::Fail(TransportError::Connect("refused".to_string()))
    }));
    let store = CredentialStore::in_memory();

    let client = client_with(transport.clone(), store, RetryPolicy::default());
    let err = client.get("/deals/all/").await.unwrap_err();

    assert_eq!(transport.calls(), 4); // initial + 3 retries
    assert!(err.is_transient());
    assert_eq!(err.status(), None);
}

#[tokio::test]
async fn client_error_carries_payload_message_and_is_not_retried() {
    let transport = std::sync::Arc::new(FakeTransport::scripted(vec![Action::Respond(
        json_response(400, r#"{"error": "Invalid input"}"#),
    )]));
    let store = CredentialStore::in_memory();
    store.set(Credential::access_only("tok")).await;

    let client = client_with(transport.clone(), store, RetryPolicy::default());
    let err = client.get("/deals/all/").await.unwrap_err();

    assert_eq!(
        err,
        ApiError::Client {
            status: 400,
            message: "Invalid input".to_string(),
        }
    );
    assert_eq!(transport.calls(), 1);
}

#[tokio::test]
async fn cancelled_request_never_refreshes_or_retries() {
    let transport = std::sync::Arc::new(FakeTransport::new(|_| Action::Hang));
    let store = CredentialStore::in_memory();
    store.set(Credential::new("tok", "refresh-1")).await;

    let client = client_with(transport.clone(), store, RetryPolicy::default());

    let cancel = CancellationToken::new();
    let cancel_clone = cancel.clone();
    let handle = tokio::spawn(async move {
        client
            .execute(ApiRequest::get("/deals/all/"), &cancel_clone)
            .await
    });

    // Let the request reach the transport, then abort it
    tokio::task::yield_now().await;
    cancel.cancel();

    let err = handle.await.unwrap().unwrap_err();
    assert_eq!(err, ApiError::Cancelled);
    assert_eq!(transport.refresh_calls(), 0);
}

#[tokio::test]
async fn login_stores_credential_and_logout_clears_it() {
    let transport = std::sync::Arc::new(FakeTransport::new(|request| {
        assert!(request.bearer.is_none(), "login must not send a bearer");
        Action::Respond(json_response(
            200,
            r#"{"access_token": "a-1", "refresh_token": "r-1"}"#,
        ))
    }));
    let store = CredentialStore::in_memory();

    let client = client_with(transport, store.clone(), RetryPolicy::no_retry());
    let credential = client.login("ada@example.com", "hunter2").await.unwrap();

    assert_eq!(credential.access_token, "a-1");
    assert_eq!(store.get().unwrap().refresh_token.as_deref(), Some("r-1"));

    client.logout().await;
    assert!(store.get().is_none());
}
