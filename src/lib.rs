//! sqljudge - A strict, deterministic result-equivalence oracle for generated SQL
//!
//! Runs a predicted query and a reference query against the same database
//! and decides whether the predicted result denotes the same answer, allowing
//! column reordering and, unless the reference orders its output, row
//! reordering.
//!
//! # Layers
//!
//! - `value`: scalars, rows and the canonical ordering key
//! - `compare`: equivalence decision over realized rows
//! - `executor`: query engine seam, SQLite binding, match policies
//! - `guard`: deadline and error folding into one outcome
//! - `cancel`: cooperative stop signal raised when a deadline elapses
//! - `config`, `observability`, `cli`: ambient plumbing

pub mod cancel;
pub mod cli;
pub mod compare;
pub mod config;
pub mod executor;
pub mod guard;
pub mod observability;
pub mod value;

pub use cancel::CancelFlag;
pub use compare::{result_eq, EquivalenceDecider};
pub use config::CheckConfig;
pub use executor::{MatchPolicy, QueryEngine, SqliteEngine};
pub use guard::{check, CheckOutcome, Checker, Verdict};
pub use value::{ResultSet, Row, Scalar};
