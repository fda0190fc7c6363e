//! Verdicts and the uniform check outcome

use std::fmt;

use serde::ser::{SerializeStruct, Serializer};
use serde::Serialize;

use crate::executor::CheckError;
use crate::value::{empty_sentinel, ResultSet};

/// Terminal outcome of one check
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Passed,
    Failed,
    Timeout,
    /// Carries the message rendered after `error:`
    Error(String),
}

impl Verdict {
    /// Status string: `passed`, `failed`, `timeout` or `error:<message>`
    pub fn status(&self) -> String {
        match self {
            Verdict::Passed => "passed".to_string(),
            Verdict::Failed => "failed".to_string(),
            Verdict::Timeout => "timeout".to_string(),
            Verdict::Error(message) => format!("error:{}", message),
        }
    }

    pub fn passed(&self) -> bool {
        matches!(self, Verdict::Passed)
    }

    pub fn from_passed(passed: bool) -> Self {
        if passed {
            Verdict::Passed
        } else {
            Verdict::Failed
        }
    }

    pub fn from_error(err: &CheckError) -> Self {
        if err.is_timeout() {
            Verdict::Timeout
        } else {
            Verdict::Error(err.to_string())
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.status())
    }
}

/// The `(status, passed, rows)` triple returned for every check
#[derive(Debug, Clone, PartialEq)]
pub struct CheckOutcome {
    pub verdict: Verdict,
    /// Predicted rows, or the empty sentinel when none were produced
    pub rows: ResultSet,
}

impl CheckOutcome {
    pub fn decided(passed: bool, rows: ResultSet) -> Self {
        Self {
            verdict: Verdict::from_passed(passed),
            rows,
        }
    }

    pub fn from_error(err: &CheckError) -> Self {
        Self {
            verdict: Verdict::from_error(err),
            rows: empty_sentinel(),
        }
    }

    /// An `error:` outcome raised before any check could start
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            verdict: Verdict::Error(message.into()),
            rows: empty_sentinel(),
        }
    }

    pub fn status(&self) -> String {
        self.verdict.status()
    }

    pub fn passed(&self) -> bool {
        self.verdict.passed()
    }

    pub fn into_triple(self) -> (String, bool, ResultSet) {
        let status = self.verdict.status();
        let passed = self.verdict.passed();
        (status, passed, self.rows)
    }
}

impl Serialize for CheckOutcome {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("CheckOutcome", 3)?;
        state.serialize_field("status", &self.verdict.status())?;
        state.serialize_field("passed", &self.verdict.passed())?;
        state.serialize_field("rows", &self.rows)?;
        state.end()
    }
}
