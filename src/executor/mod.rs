//! Query execution subsystem for sqljudge
//!
//! Runs a predicted and a reference query against one shared engine handle
//! and applies a match policy to the two realized results.
//!
//! # Execution Flow (strict order)
//!
//! 1. Normalize predicted text (optional)
//! 2. Execute predicted query, fetch all rows
//! 3. Execute reference query, fetch all rows
//! 4. Apply match policy (`set_match` or `exact_match`)
//! 5. Return verdict plus raw predicted rows
//!
//! Engine faults carry the role of the query that produced them and a
//! category classified once from the engine text.

mod engine;
mod errors;
mod policy;
mod sandbox;
mod sqlite;

pub use engine::QueryEngine;
pub use errors::{CheckError, CheckResult, EngineFault, FaultCategory, QueryRole};
pub use policy::{normalize_operators, MatchPolicy, RowOrderPolicy};
pub use sandbox::{Sandbox, SandboxOutcome};
pub use sqlite::SqliteEngine;
