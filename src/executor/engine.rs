//! Query engine seam
//!
//! The oracle never interprets query text. Anything that can run a query
//! string against an open database handle and return rows can be judged.

use crate::cancel::CancelFlag;
use crate::value::ResultSet;

use super::errors::EngineFault;

/// A synchronous query engine bound to one open handle
///
/// Engines are shared with a deadline worker, hence `Send + Sync`.
pub trait QueryEngine: Send + Sync {
    /// Runs a query and fetches every row
    fn execute(&self, query: &str) -> Result<ResultSet, EngineFault>;

    /// Runs a query that stops early once `cancel` is raised.
    ///
    /// The default checks the flag once before starting. Engines that can
    /// poll while a statement runs should override this.
    fn execute_cancellable(
        &self,
        query: &str,
        cancel: &CancelFlag,
    ) -> Result<ResultSet, EngineFault> {
        if cancel.is_cancelled() {
            return Err(EngineFault::new("interrupted"));
        }
        self.execute(query)
    }

    /// Asks the engine to abandon whatever it is running.
    ///
    /// Called by the deadline guard after a timeout. Engines without an
    /// interrupt facility keep the default no-op; the orphaned work then runs
    /// to completion on its own.
    fn interrupt(&self) {}

    /// Short name for logs
    fn name(&self) -> &'static str {
        "engine"
    }
}
