// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # Remora Store
//!
//! Durable credential storage for the Remora client SDK.
//!
//! The [`CredentialStore`] holds the current [`remora_core::Credential`] in
//! memory and mirrors every change to a JSON file under the platform config
//! directory. The in-memory copy is authoritative for the running process;
//! the file only matters across restarts, where it is loaded once at
//! startup.

pub mod credential_store;
pub mod error;
pub mod persistence;

pub use credential_store::CredentialStore;
pub use error::StoreError;
pub use persistence::{default_config_dir, default_credential_path};
