//! `remora logout` - clear the stored credential.

use anyhow::Result;

use crate::Cli;
use crate::commands::build_client;

/// Runs the logout command.
pub async fn run(cli: &Cli) -> Result<()> {
    let client = build_client(cli).await?;
    client.logout().await;

    if !cli.quiet {
        println!("Logged out");
    }
    Ok(())
}
