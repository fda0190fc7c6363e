//! Sandboxed execution of a predicted/reference query pair
//!
//! Execution order is fixed: predicted first, then reference. A predicted
//! query that faults is reported without the reference query ever running.
//! Both queries observe the sandbox's `CancelFlag`.

use crate::cancel::CancelFlag;
use crate::compare::{EquivalenceDecider, RandomSource};
use crate::value::ResultSet;

use super::engine::QueryEngine;
use super::errors::{CheckError, CheckResult, QueryRole};
use super::policy::{normalize_operators, MatchPolicy, RowOrderPolicy};

/// Outcome of a completed comparison
#[derive(Debug, Clone, PartialEq)]
pub struct SandboxOutcome {
    /// Whether the predicted result was accepted
    pub passed: bool,
    /// Raw predicted rows, kept for diagnostics
    pub rows: ResultSet,
}

/// Runs query pairs against one engine handle and applies a match policy
pub struct Sandbox<'e, E: QueryEngine + ?Sized, R: RandomSource> {
    engine: &'e E,
    decider: EquivalenceDecider<R>,
    normalize: bool,
    cancel: CancelFlag,
}

impl<'e, E: QueryEngine + ?Sized, R: RandomSource> Sandbox<'e, E, R> {
    pub fn new(engine: &'e E, decider: EquivalenceDecider<R>) -> Self {
        Self {
            engine,
            decider,
            normalize: false,
            cancel: CancelFlag::new(),
        }
    }

    /// Abandons queries once `cancel` is raised.
    ///
    /// Pass the same flag to the decider so the comparison stops too.
    pub fn with_cancel(mut self, cancel: CancelFlag) -> Self {
        self.cancel = cancel;
        self
    }

    /// Rejoin split comparison operators in predicted text before running it
    pub fn with_normalized_operators(mut self, enabled: bool) -> Self {
        self.normalize = enabled;
        self
    }

    /// Executes both queries and decides whether the predicted result matches.
    pub fn run(
        &mut self,
        predicted: &str,
        reference: &str,
        policy: MatchPolicy,
    ) -> CheckResult<SandboxOutcome> {
        let predicted_rows = if self.normalize {
            self.fetch(&normalize_operators(predicted), QueryRole::Predicted)?
        } else {
            self.fetch(predicted, QueryRole::Predicted)?
        };
        let reference_rows = self.fetch(reference, QueryRole::Reference)?;

        let passed = match policy {
            MatchPolicy::Set => self.decider.set_match(&reference_rows, &predicted_rows),
            MatchPolicy::Exact => {
                let order = RowOrderPolicy::from_reference(reference);
                self.decider
                    .result_eq(&reference_rows, &predicted_rows, order.order_matters())
            }
        };

        Ok(SandboxOutcome {
            passed,
            rows: predicted_rows,
        })
    }

    fn fetch(&self, query: &str, role: QueryRole) -> CheckResult<ResultSet> {
        self.engine
            .execute_cancellable(query, &self.cancel)
            .map_err(|fault| CheckError::engine(role, fault))
    }
}
