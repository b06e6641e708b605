//! CLI command implementations.

pub mod deals;
pub mod get;
pub mod login;
pub mod logout;
pub mod profile;

use anyhow::Result;
use remora_client::ApiClient;
use remora_store::CredentialStore;
use tracing::debug;

use crate::Cli;

/// Builds an API client against the stored credential.
pub async fn build_client(cli: &Cli) -> Result<ApiClient> {
    debug!(base_url = %cli.base_url, "Building API client");
    let store = CredentialStore::open_default().await;
    let client = ApiClient::new(cli.base_url.clone(), store)?;
    Ok(client)
}
