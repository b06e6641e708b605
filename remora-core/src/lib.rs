// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # Remora Core
//!
//! Core types and models for the Remora client SDK.
//!
//! This crate provides the foundational types used across all other
//! Remora crates, including:
//!
//! - [`Credential`] - access/refresh token pair attached to requests
//! - Auth payloads ([`LoginRequest`], [`RegisterRequest`], [`TokenResponse`])
//! - Resource models ([`UserProfile`], [`Deal`])
//! - [`CoreError`] - shared error type

pub mod error;
pub mod models;

// Re-export error types
pub use error::CoreError;

// Re-export all model types
pub use models::{
    // Credential
    Credential,
    // Auth payloads
    LoginRequest,
    RegisterRequest,
    TokenResponse,
    UserProfile,
    // Resources
    Deal,
    DealPage,
};
