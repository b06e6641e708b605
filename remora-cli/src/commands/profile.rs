//! `remora profile` - show the current account profile.

use anyhow::{Context, Result};

use crate::Cli;
use crate::commands::build_client;
use crate::output;

/// Runs the profile command.
pub async fn run(cli: &Cli) -> Result<()> {
    let client = build_client(cli).await?;
    let profile = client.profile().await.context("Failed to fetch profile")?;

    output::print(cli, &profile, || {
        let mut text = format!("{} <{}>", profile.display_name(), profile.email);
        if let Some(phone) = &profile.phone_number {
            text.push_str(&format!("\nPhone: {phone}"));
        }
        text
    })
}
