//! Executor error types
//!
//! Error codes:
//! - JUDGE_ENGINE_FAULT (ERROR)
//! - JUDGE_UNKNOWN_METHOD (ERROR)
//! - JUDGE_TIMEOUT (ERROR)
//! - JUDGE_INVALID_DEADLINE (ERROR)
//! - JUDGE_WORKER_FAILED (ERROR)

use std::fmt;
use std::time::Duration;

use serde::Serialize;
use thiserror::Error;

/// Coarse category of an engine fault
///
/// Classification is done once, against the engine's message text, when the
/// fault is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FaultCategory {
    AmbiguousColumn,
    NoSuchColumn,
    NoSuchTable,
    NoSuchFunction,
    SyntaxError,
    Other,
}

impl FaultCategory {
    /// Patterns checked in order; first match wins
    const PATTERNS: [(&'static str, FaultCategory); 5] = [
        ("ambiguous column name", FaultCategory::AmbiguousColumn),
        ("no such column", FaultCategory::NoSuchColumn),
        ("no such table", FaultCategory::NoSuchTable),
        ("no such function", FaultCategory::NoSuchFunction),
        ("syntax error", FaultCategory::SyntaxError),
    ];

    /// Classifies an engine message
    pub fn classify(message: &str) -> Self {
        Self::PATTERNS
            .iter()
            .find(|(pattern, _)| message.contains(pattern))
            .map_or(FaultCategory::Other, |(_, category)| *category)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FaultCategory::AmbiguousColumn => "ambiguous column name",
            FaultCategory::NoSuchColumn => "no such column",
            FaultCategory::NoSuchTable => "no such table",
            FaultCategory::NoSuchFunction => "no such function",
            FaultCategory::SyntaxError => "syntax error",
            FaultCategory::Other => "others",
        }
    }
}

impl fmt::Display for FaultCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A failure reported by the query engine, with its original text
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct EngineFault {
    category: FaultCategory,
    message: String,
}

impl EngineFault {
    pub fn new(message: impl Into<String>) -> Self {
        let message = message.into();
        Self {
            category: FaultCategory::classify(&message),
            message,
        }
    }

    pub fn category(&self) -> FaultCategory {
        self.category
    }

    /// Raw engine text
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Which of the two queries a fault came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryRole {
    Predicted,
    Reference,
}

impl QueryRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            QueryRole::Predicted => "predicted",
            QueryRole::Reference => "reference",
        }
    }
}

impl fmt::Display for QueryRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Every way a check can end without a pass/fail decision
#[derive(Debug, Clone, Error)]
pub enum CheckError {
    /// Display is the bare engine text so verdicts read `error:<engine text>`
    #[error("{fault}")]
    Engine { role: QueryRole, fault: EngineFault },

    #[error("unknown evaluation method: {0}")]
    UnknownMethod(String),

    #[error("deadline of {0:?} exceeded")]
    Timeout(Duration),

    #[error("invalid deadline: {0}")]
    InvalidDeadline(String),

    #[error("worker failed: {0}")]
    WorkerFailed(String),
}

impl CheckError {
    pub fn engine(role: QueryRole, fault: EngineFault) -> Self {
        CheckError::Engine { role, fault }
    }

    /// Stable error code for logs
    pub fn code(&self) -> &'static str {
        match self {
            CheckError::Engine { .. } => "JUDGE_ENGINE_FAULT",
            CheckError::UnknownMethod(_) => "JUDGE_UNKNOWN_METHOD",
            CheckError::Timeout(_) => "JUDGE_TIMEOUT",
            CheckError::InvalidDeadline(_) => "JUDGE_INVALID_DEADLINE",
            CheckError::WorkerFailed(_) => "JUDGE_WORKER_FAILED",
        }
    }

    /// Fault category, for engine faults only
    pub fn fault_category(&self) -> Option<FaultCategory> {
        match self {
            CheckError::Engine { fault, .. } => Some(fault.category()),
            _ => None,
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, CheckError::Timeout(_))
    }
}

/// Result type for executor operations
pub type CheckResult<T> = Result<T, CheckError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_patterns() {
        let cases = [
            ("ambiguous column name: id", FaultCategory::AmbiguousColumn),
            ("no such column: nam", FaultCategory::NoSuchColumn),
            ("no such table: userz", FaultCategory::NoSuchTable),
            ("no such function: MEDIAN", FaultCategory::NoSuchFunction),
            ("near \"SELEC\": syntax error", FaultCategory::SyntaxError),
            ("interrupted", FaultCategory::Other),
        ];
        for (message, expected) in cases {
            assert_eq!(FaultCategory::classify(message), expected, "{}", message);
        }
    }

    #[test]
    fn test_other_renders_as_others() {
        assert_eq!(FaultCategory::Other.as_str(), "others");
    }

    #[test]
    fn test_engine_fault_keeps_raw_text() {
        let fault = EngineFault::new("no such table: t1");
        assert_eq!(fault.to_string(), "no such table: t1");
        assert_eq!(fault.category(), FaultCategory::NoSuchTable);
    }

    #[test]
    fn test_check_error_display_and_codes() {
        let err = CheckError::engine(QueryRole::Predicted, EngineFault::new("syntax error"));
        assert_eq!(err.to_string(), "syntax error");
        assert_eq!(err.code(), "JUDGE_ENGINE_FAULT");
        assert_eq!(err.fault_category(), Some(FaultCategory::SyntaxError));

        let err = CheckError::UnknownMethod("fuzzy_match".into());
        assert_eq!(err.to_string(), "unknown evaluation method: fuzzy_match");
        assert_eq!(err.code(), "JUDGE_UNKNOWN_METHOD");
        assert!(err.fault_category().is_none());

        assert!(CheckError::Timeout(Duration::from_secs(1)).is_timeout());
    }
}
