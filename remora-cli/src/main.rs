// Lint configuration for this crate
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! Remora CLI - authenticated API access from the command line.
//!
//! # Examples
//!
//! ```bash
//! # Log in (password from flag or REMORA_PASSWORD)
//! remora login --email ada@example.com --password hunter2
//!
//! # Show the current account profile
//! remora profile
//!
//! # List deals
//! remora deals
//! remora deals --mine
//!
//! # Arbitrary authenticated GET
//! remora get /deals/industries/all/
//!
//! # JSON output
//! remora deals --format json --pretty
//!
//! # Clear the stored credential
//! remora logout
//! ```

mod commands;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use commands::{deals, get, login, logout, profile};

// ============================================================================
// CLI Definition
// ============================================================================

/// Remora CLI - authenticated API access.
#[derive(Parser)]
#[command(name = "remora")]
#[command(about = "Authenticated API client CLI")]
#[command(version)]
pub struct Cli {
    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Commands,

    /// Output format (text or json).
    #[arg(long, short = 'f', default_value = "text", global = true)]
    pub format: OutputFormat,

    /// Pretty-print JSON output.
    #[arg(long, global = true)]
    pub pretty: bool,

    /// Base URL of the API.
    #[arg(long, global = true, default_value = remora_client::endpoints::DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Verbose output (show debug info).
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Quiet mode (minimal output).
    #[arg(long, short, global = true)]
    pub quiet: bool,
}

/// CLI commands.
#[derive(Subcommand)]
pub enum Commands {
    /// Log in and store the credential.
    Login(login::LoginArgs),

    /// Clear the stored credential.
    Logout,

    /// Show the current account profile.
    #[command(visible_alias = "whoami")]
    Profile,

    /// List deals.
    #[command(visible_alias = "d")]
    Deals(deals::DealsArgs),

    /// Perform an authenticated GET against an arbitrary path.
    Get(get::GetArgs),
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum OutputFormat {
    /// Human-readable text.
    #[default]
    Text,
    /// JSON output for scripting.
    Json,
}

// ============================================================================
// Logging Setup
// ============================================================================

fn setup_logging(verbose: bool, quiet: bool) {
    if quiet {
        return; // No logging in quiet mode
    }

    let filter = if verbose {
        EnvFilter::new("remora=debug,info")
    } else {
        EnvFilter::new("remora=warn")
    };

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(false)
                .without_time()
                .with_writer(std::io::stderr),
        )
        .with(filter)
        .init();
}

// ============================================================================
// Main Entry Point
// ============================================================================

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    match &cli.command {
        Commands::Login(args) => login::run(args, &cli).await,
        Commands::Logout => logout::run(&cli).await,
        Commands::Profile => profile::run(&cli).await,
        Commands::Deals(args) => deals::run(args, &cli).await,
        Commands::Get(args) => get::run(args, &cli).await,
    }
}
