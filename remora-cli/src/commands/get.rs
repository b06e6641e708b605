//! `remora get` - perform an authenticated GET against an arbitrary path.

use anyhow::{Context, Result};
use clap::Args;

use remora_client::Payload;

use crate::Cli;
use crate::commands::build_client;
use crate::output;

/// Arguments for the get command.
#[derive(Args)]
pub struct GetArgs {
    /// Path relative to the base URL, e.g. /deals/all/
    pub path: String,
}

/// Runs the get command.
pub async fn run(args: &GetArgs, cli: &Cli) -> Result<()> {
    let client = build_client(cli).await?;
    let response = client
        .get(&args.path)
        .await
        .with_context(|| format!("GET {} failed", args.path))?;

    match &response.payload {
        Payload::Json(value) => output::print_json(value, cli.pretty),
        Payload::Text(text) => {
            println!("{text}");
            Ok(())
        }
        Payload::Empty => Ok(()),
    }
}
