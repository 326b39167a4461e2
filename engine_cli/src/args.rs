//! Command line arguments

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Runs one query-engine operation over a JSON array of records.
#[derive(Parser, Debug)]
#[command(name = "query-engine")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Configuration file; defaults to ./engine.toml when present
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Keep the records matching every filter condition
    Filter {
        /// JSON array of records
        #[arg(long)]
        records: PathBuf,

        /// JSON array of filter conditions
        #[arg(long)]
        filters: PathBuf,

        /// Reject unrecognized operators instead of matching everything
        #[arg(long)]
        strict: bool,
    },

    /// Compute aggregates, optionally grouped
    Aggregate {
        #[arg(long)]
        records: PathBuf,

        /// JSON aggregation options
        #[arg(long)]
        options: PathBuf,

        /// JSON aggregation allow-lists checked before computing
        #[arg(long)]
        limits: Option<PathBuf>,
    },

    /// Relevance-ranked text search
    Search {
        #[arg(long)]
        records: PathBuf,

        /// JSON search options
        #[arg(long)]
        options: PathBuf,

        /// JSON array of filter conditions applied before matching
        #[arg(long)]
        filters: Option<PathBuf>,

        /// JSON search allow-lists checked before searching
        #[arg(long)]
        limits: Option<PathBuf>,
    },

    /// Filtered, ordered, paginated listing
    List {
        #[arg(long)]
        records: PathBuf,

        /// JSON listing options
        #[arg(long)]
        options: PathBuf,
    },
}
