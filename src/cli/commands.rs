//! CLI commands and argument parsing

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// rowlift — streaming CSV-to-relational ingest
#[derive(Parser, Debug)]
#[command(name = "rowlift")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration file (YAML)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run one ingest end-to-end and print the summary
    Ingest {
        /// Source CSV file (overrides config)
        #[arg(short, long)]
        source: Option<PathBuf>,

        /// Rows per transactional write (overrides config)
        #[arg(short, long)]
        batch_size: Option<usize>,
    },

    /// Print the age distribution of the persisted rows
    Stats,

    /// Start HTTP server mode
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "8080")]
        port: u16,
    },
}
