//! Timeout and error guard
//!
//! Wraps the sandbox with a caller deadline and folds every way a check can
//! end into one `CheckOutcome`:
//!
//! - `passed` / `failed`: both queries ran and the policy decided
//! - `timeout`: the deadline passed; the engine is interrupted and the work
//!   abandoned, never retried
//! - `error:<message>`: an engine fault, unknown method, invalid deadline or
//!   worker panic
//!
//! Rows are the predicted result when one exists, else `[[]]`.

mod checker;
mod deadline;
mod verdict;

pub use checker::{check, Checker};
pub use deadline::{run_with_deadline, DeadlineError};
pub use verdict::{CheckOutcome, Verdict};
