//! `remora deals` - list deals.

use anyhow::{Context, Result};
use clap::Args;

use crate::Cli;
use crate::commands::build_client;
use crate::output;

/// Arguments for the deals command.
#[derive(Args)]
pub struct DealsArgs {
    /// Only list the current account's deals.
    #[arg(long, short)]
    pub mine: bool,
}

/// Runs the deals command.
pub async fn run(args: &DealsArgs, cli: &Cli) -> Result<()> {
    let client = build_client(cli).await?;

    let deals = if args.mine {
        client.deals_my().await
    } else {
        client.deals_all().await
    }
    .context("Failed to fetch deals")?;

    output::print(cli, &deals, || {
        if deals.is_empty() {
            return "No deals found".to_string();
        }

        deals
            .iter()
            .map(|deal| {
                let marker = if deal.is_active { "●" } else { "○" };
                format!("{marker} {} ({})", deal.deal_name, deal.id)
            })
            .collect::<Vec<_>>()
            .join("\n")
    })
}
