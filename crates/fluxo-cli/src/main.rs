//! Fluxo CLI - Bulk-import validation for household finance spreadsheets
//!
//! Usage:
//!   fluxo validate --file maio.xlsx --template-type transactions
//!   fluxo template transactions
//!   fluxo serve --port 3000

mod cli;
mod commands;

#[cfg(test)]
mod tests;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    match cli.command {
        Commands::Validate {
            file,
            template_type,
            report,
        } => commands::cmd_validate(&file, &template_type, report.as_deref()),
        Commands::Template {
            template_type,
            output,
        } => commands::cmd_template(&template_type, output.as_deref()),
        Commands::Serve {
            port,
            host,
            allow_origin,
        } => commands::cmd_serve(&host, port, allow_origin).await,
    }
}
