//! Scalar values produced by a query engine
//!
//! Values are never coerced: `Integer(1)` and `Real(1.0)` are different
//! values, exactly as the engine reported them.

use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

/// A single engine-produced value
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    /// SQL NULL
    Null,
    /// 64-bit signed integer
    Integer(i64),
    /// IEEE-754 double
    Real(f64),
    /// UTF-8 text
    Text(String),
    /// Raw bytes
    Blob(Vec<u8>),
}

/// One result row. Every row of a result set has the same width.
pub type Row = Vec<Scalar>;

/// All rows of one execution, in the order the engine returned them.
pub type ResultSet = Vec<Row>;

/// Placeholder returned in place of predicted rows when none were produced.
///
/// This is one empty row, not an empty result set, so downstream consumers
/// can tell "query failed" apart from "query returned nothing".
pub fn empty_sentinel() -> ResultSet {
    vec![Vec::new()]
}

/// Bit pattern used for equality and hashing of reals.
///
/// Collapses `-0.0` onto `0.0` and every NaN onto one NaN so that `Scalar`
/// can be `Eq + Hash`.
fn canonical_bits(value: f64) -> u64 {
    if value == 0.0 {
        0
    } else if value.is_nan() {
        f64::NAN.to_bits()
    } else {
        value.to_bits()
    }
}

impl PartialEq for Scalar {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Scalar::Null, Scalar::Null) => true,
            (Scalar::Integer(a), Scalar::Integer(b)) => a == b,
            (Scalar::Real(a), Scalar::Real(b)) => canonical_bits(*a) == canonical_bits(*b),
            (Scalar::Text(a), Scalar::Text(b)) => a == b,
            (Scalar::Blob(a), Scalar::Blob(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Scalar {}

impl Hash for Scalar {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Scalar::Null => {}
            Scalar::Integer(v) => v.hash(state),
            Scalar::Real(v) => canonical_bits(*v).hash(state),
            Scalar::Text(v) => v.hash(state),
            Scalar::Blob(v) => v.hash(state),
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Null => write!(f, "NULL"),
            Scalar::Integer(v) => write!(f, "{}", v),
            // Debug keeps the fractional part ("1.0"), matching the engine's rendering
            Scalar::Real(v) if *v == 0.0 => write!(f, "0.0"),
            Scalar::Real(v) => write!(f, "{:?}", v),
            Scalar::Text(v) => write!(f, "{}", v),
            Scalar::Blob(bytes) => {
                write!(f, "x'")?;
                for b in bytes {
                    write!(f, "{:02x}", b)?;
                }
                write!(f, "'")
            }
        }
    }
}

impl From<i64> for Scalar {
    fn from(v: i64) -> Self {
        Scalar::Integer(v)
    }
}

impl From<f64> for Scalar {
    fn from(v: f64) -> Self {
        Scalar::Real(v)
    }
}

impl From<&str> for Scalar {
    fn from(v: &str) -> Self {
        Scalar::Text(v.to_string())
    }
}

impl From<String> for Scalar {
    fn from(v: String) -> Self {
        Scalar::Text(v)
    }
}

impl From<Vec<u8>> for Scalar {
    fn from(v: Vec<u8>) -> Self {
        Scalar::Blob(v)
    }
}

impl<T: Into<Scalar>> From<Option<T>> for Scalar {
    fn from(v: Option<T>) -> Self {
        v.map_or(Scalar::Null, Into::into)
    }
}
