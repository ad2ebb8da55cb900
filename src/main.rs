//! Main application entry point (CLI binary).
//!
//! This is a thin wrapper around the `mailauth_check` library that handles:
//! - Command-line argument parsing
//! - Logger initialization
//! - Reading the domain from stdin when none is given
//! - User-facing output formatting
//!
//! All core functionality is implemented in the library crate.

use std::io::{self, IsTerminal};
use std::process;

use anyhow::{Context, Result};
use clap::Parser;
use colored::*;

use mailauth_check::initialization::init_logger_with;
use mailauth_check::{render_json, render_plain, resolve_domain, run_check, Config, OutputFormat};

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command-line arguments into Config
    let config = Config::parse();

    init_logger_with(config.log_level.into(), config.log_format)
        .context("Failed to initialize logger")?;

    let color = !config.no_color && io::stdout().is_terminal();
    colored::control::set_override(color);

    if config.requested_domain().is_none() && io::stdin().is_terminal() {
        eprint!("Enter the domain to check (e.g., google.com): ");
    }

    let domain = match resolve_domain(&config, io::stdin().lock()) {
        Ok(domain) => domain,
        Err(e) => {
            eprintln!("{} {e}", "Error:".red().bold());
            eprintln!("Run with --help for usage.");
            process::exit(1);
        }
    };

    if config.format == OutputFormat::Plain {
        println!("\nChecking records for {domain}...");
    }

    let report = run_check(&config, &domain).await?;

    match config.format {
        OutputFormat::Plain => print!("{}", render_plain(&report, color)),
        OutputFormat::Json => {
            let json = render_json(&report).context("Failed to serialize report")?;
            println!("{json}");
        }
    }

    // Exit code 0 whatever the findings; failures are in the report
    Ok(())
}
