//! `remora login` - authenticate and store the credential.

use anyhow::{Context, Result, bail};
use clap::Args;

use crate::Cli;
use crate::commands::build_client;

/// Arguments for the login command.
#[derive(Args)]
pub struct LoginArgs {
    /// Account email address.
    #[arg(long, short)]
    pub email: String,

    /// Account password. Falls back to the REMORA_PASSWORD environment
    /// variable when omitted.
    #[arg(long, short)]
    pub password: Option<String>,
}

/// Runs the login command.
pub async fn run(args: &LoginArgs, cli: &Cli) -> Result<()> {
    let password = match &args.password {
        Some(p) => p.clone(),
        None => match std::env::var("REMORA_PASSWORD") {
            Ok(p) if !p.is_empty() => p,
            _ => bail!("No password given. Use --password or set REMORA_PASSWORD."),
        },
    };

    let client = build_client(cli).await?;
    client
        .login(&args.email, &password)
        .await
        .context("Login failed")?;

    if !cli.quiet {
        println!("Logged in as {}", args.email);
    }
    Ok(())
}
