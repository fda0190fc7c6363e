//! CLI argument definitions using clap
//!
//! Commands:
//! - sqljudge check --db <path> --predicted <sql> --reference <sql>
//! - sqljudge batch [--db <path>] [--jobs N] < cases.jsonl

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// sqljudge - A strict, deterministic result-equivalence oracle for generated SQL
#[derive(Parser, Debug)]
#[command(name = "sqljudge")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Grade one predicted query against a reference query
    Check {
        /// SQLite database file, opened read-only
        #[arg(long)]
        db: PathBuf,

        /// Query under evaluation
        #[arg(long)]
        predicted: String,

        /// Gold query
        #[arg(long)]
        reference: String,

        /// Match policy: exact_match or set_match (overrides config)
        #[arg(long)]
        method: Option<String>,

        /// Deadline in seconds (overrides config)
        #[arg(long, allow_negative_numbers = true)]
        timeout: Option<f64>,

        /// Path to configuration file
        #[arg(long)]
        config: Option<PathBuf>,

        /// Rejoin split comparison operators in the predicted query
        #[arg(long)]
        normalize: bool,
    },

    /// Grade JSON-line cases read from stdin
    Batch {
        /// Database used by cases that do not name their own
        #[arg(long)]
        db: Option<PathBuf>,

        /// Path to configuration file
        #[arg(long)]
        config: Option<PathBuf>,

        /// Cases graded concurrently
        #[arg(long, default_value_t = 4)]
        jobs: usize,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
