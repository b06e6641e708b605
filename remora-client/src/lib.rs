// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # Remora Client
//!
//! Authenticated request pipeline for the Remora client SDK.
//!
//! The pipeline dispatches HTTP requests against a configured base URL,
//! attaches the stored bearer credential, transparently refreshes an
//! expired credential exactly once per expiry, and retries transient
//! failures with exponential backoff and jitter.
//!
//! ## Components
//!
//! - [`transport::Transport`] - one HTTP call (production impl: reqwest)
//! - [`refresh::RefreshCoordinator`] - deduplicates concurrent refreshes
//! - [`retry::RetryPolicy`] - bounded backoff for transient failures
//! - [`error::ApiError`] - closed error taxonomy surfaced to callers
//! - [`client::ApiClient`] - ties the pieces together
//!
//! ## Example
//!
//! ```ignore
//! use remora_client::ApiClient;
//! use remora_store::CredentialStore;
//!
//! let store = CredentialStore::open_default().await;
//! let client = ApiClient::new("https://api.example.com", store)?;
//!
//! client.login("ada@example.com", "hunter2").await?;
//! let deals = client.deals_all().await?;
//! ```

pub mod auth;
pub mod client;
pub mod deals;
pub mod endpoints;
pub mod error;
pub mod refresh;
pub mod request;
pub mod retry;
pub mod transport;

// Re-export key types at crate root
pub use client::{ApiClient, ApiClientBuilder};
pub use error::ApiError;
pub use refresh::RefreshCoordinator;
pub use request::{ApiRequest, ApiResponse, Method, Payload, RequestParts};
pub use retry::{RetryDecision, RetryPolicy};
pub use transport::{RawResponse, ReqwestTransport, Transport, TransportError};

// Re-export the cancellation handle so callers don't need tokio-util directly
pub use tokio_util::sync::CancellationToken;
