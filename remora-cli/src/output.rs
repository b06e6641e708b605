//! Output helpers for text and JSON formats.

use anyhow::Result;
use serde::Serialize;

use crate::{Cli, OutputFormat};

/// Prints a value as JSON, honoring the `--pretty` flag.
pub fn print_json<T: Serialize>(value: &T, pretty: bool) -> Result<()> {
    let json = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{json}");
    Ok(())
}

/// Prints either the JSON form or a caller-rendered text form.
pub fn print<T: Serialize>(cli: &Cli, value: &T, render_text: impl FnOnce() -> String) -> Result<()> {
    match cli.format {
        OutputFormat::Json => print_json(value, cli.pretty),
        OutputFormat::Text => {
            println!("{}", render_text());
            Ok(())
        }
    }
}
