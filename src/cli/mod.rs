//! CLI module for sqljudge
//!
//! Provides command-line interface for:
//! - check: Grade one predicted/reference pair
//! - batch: Grade JSON-line cases from stdin

mod args;
mod commands;
mod errors;
mod io;

pub use args::{Cli, Command};
pub use commands::{batch, check, load_config, run, run_command};
pub use errors::{CliError, CliErrorCode, CliResult};
pub use io::{read_cases, write_line, BatchCase, BatchResult};
