//! JSON-lines I/O for the CLI
//!
//! - Input: one JSON object per line (blank lines skipped)
//! - Output: one JSON object per line on stdout
//! - UTF-8 only

use std::io::{BufRead, Write};
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::guard::CheckOutcome;

use super::errors::{CliError, CliResult};

/// One batch input line
#[derive(Debug, Clone, Deserialize)]
pub struct BatchCase {
    /// Caller's identifier, echoed back; defaults to the case index
    #[serde(default)]
    pub id: Option<Value>,
    pub predicted: String,
    pub reference: String,
    #[serde(default)]
    pub db: Option<PathBuf>,
    #[serde(default)]
    pub method: Option<String>,
    #[serde(default)]
    pub timeout: Option<f64>,
}

/// One batch output line
#[derive(Debug, Clone, Serialize)]
pub struct BatchResult {
    pub id: Value,
    #[serde(flatten)]
    pub outcome: CheckOutcome,
}

/// Read every case from `reader`; the first malformed line fails the batch
pub fn read_cases<R: BufRead>(reader: R) -> CliResult<Vec<BatchCase>> {
    let mut cases = Vec::new();
    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let case: BatchCase =
            serde_json::from_str(&line).map_err(|e| CliError::input_error(index + 1, e))?;
        cases.push(case);
    }
    Ok(cases)
}

/// Write one value as a JSON line and flush
pub fn write_line<W: Write, T: Serialize>(writer: &mut W, value: &T) -> CliResult<()> {
    serde_json::to_writer(&mut *writer, value)?;
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}
