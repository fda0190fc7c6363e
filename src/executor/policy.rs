//! Match and row-order policies, plus predicted-text normalization

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use super::errors::CheckError;

/// Acceptance rule applied to a predicted result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchPolicy {
    /// Distinct rows must agree; duplicates, row order and column order ignored
    #[serde(rename = "set_match")]
    Set,
    /// Bags of rows must agree up to a column permutation; row order counts
    /// when the reference query orders its output
    #[serde(rename = "exact_match")]
    Exact,
}

impl MatchPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchPolicy::Set => "set_match",
            MatchPolicy::Exact => "exact_match",
        }
    }
}

impl FromStr for MatchPolicy {
    type Err = CheckError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "set_match" => Ok(MatchPolicy::Set),
            "exact_match" => Ok(MatchPolicy::Exact),
            other => Err(CheckError::UnknownMethod(other.to_string())),
        }
    }
}

impl fmt::Display for MatchPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Whether row order is part of the answer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowOrderPolicy {
    Ordered,
    Unordered,
}

fn whitespace() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s+").expect("static pattern"))
}

fn split_operator() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"([<>!])\s+=").expect("static pattern"))
}

impl RowOrderPolicy {
    /// Derives the policy from the reference query text.
    ///
    /// Ordered iff the lower-cased text, with all whitespace removed,
    /// contains `orderby`. This is a textual probe, not a parse.
    pub fn from_reference(reference: &str) -> Self {
        let squashed = whitespace().replace_all(&reference.to_lowercase(), "").into_owned();
        if squashed.contains("orderby") {
            RowOrderPolicy::Ordered
        } else {
            RowOrderPolicy::Unordered
        }
    }

    pub fn order_matters(&self) -> bool {
        matches!(self, RowOrderPolicy::Ordered)
    }
}

/// Rejoins comparison operators split by whitespace (`> =` becomes `>=`).
pub fn normalize_operators(query: &str) -> String {
    split_operator().replace_all(query, "$1=").into_owned()
}
