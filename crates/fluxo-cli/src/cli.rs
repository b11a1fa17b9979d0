//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI
//! arguments. The actual command implementations are in the `commands`
//! module.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Fluxo - Validate bulk finance imports before they touch your ledger
#[derive(Parser)]
#[command(name = "fluxo")]
#[command(about = "Bulk-import validation for household finance spreadsheets", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Validate a spreadsheet against an import template
    Validate {
        /// Spreadsheet to validate (.xlsx/.xls/.csv)
        #[arg(short, long)]
        file: PathBuf,

        /// Template type: transactions, categories, origins, banks
        #[arg(short, long)]
        template_type: String,

        /// Where to write the error report (defaults next to the input)
        #[arg(long)]
        report: Option<PathBuf>,
    },

    /// Write an empty import template workbook
    Template {
        /// Template type: transactions, categories, origins, banks
        template_type: String,

        /// Output path (defaults to the dated template filename)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Start the web server
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "3000")]
        port: u16,

        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Allowed CORS origin (repeatable; default is same-origin only)
        #[arg(long)]
        allow_origin: Vec<String>,
    },
}
