//! Equivalence decision between two realized result sets
//!
//! Decision flow (strict order, first decisive step wins):
//! 1. Both empty: equivalent
//! 2. Row counts differ: not equivalent
//! 3. Column counts differ: not equivalent
//! 4. Quick rejection fails: not equivalent
//! 5. Some column bijection aligns the candidate with the reference
//!    (positionally when order matters, as a bag otherwise): equivalent
//! 6. Otherwise: not equivalent
//!
//! A raised `CancelFlag` stops the bijection search; the decider then
//! answers "not equivalent".

use std::collections::HashSet;

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::cancel::CancelFlag;
use crate::value::{column_count, is_rectangular, Row, Scalar};

use super::multiset::{multiset_eq, set_eq};
use super::permutation::{permute_row, PermutationSolver, RandomSource, SolverConfig};
use super::quick_reject::quick_reject;

/// Decides result equivalence with an injected sampling source
pub struct EquivalenceDecider<R: RandomSource = StdRng> {
    solver: PermutationSolver,
    rng: R,
    cancel: CancelFlag,
}

impl EquivalenceDecider<StdRng> {
    /// Creates a decider whose sampling is seeded from `config.seed`
    pub fn new(config: SolverConfig) -> Self {
        let rng = StdRng::seed_from_u64(config.seed);
        Self::with_source(config, rng)
    }
}

impl Default for EquivalenceDecider<StdRng> {
    fn default() -> Self {
        Self::new(SolverConfig::default())
    }
}

impl<R: RandomSource> EquivalenceDecider<R> {
    pub fn with_source(config: SolverConfig, rng: R) -> Self {
        Self {
            solver: PermutationSolver::new(config),
            rng,
            cancel: CancelFlag::new(),
        }
    }

    /// Stops the search early once `cancel` is raised
    pub fn with_cancel(mut self, cancel: CancelFlag) -> Self {
        self.cancel = cancel;
        self
    }

    /// Returns true if some column permutation, and (when `order_matters` is
    /// false) some row permutation, makes `candidate` equal to `reference`.
    pub fn result_eq(&mut self, reference: &[Row], candidate: &[Row], order_matters: bool) -> bool {
        if reference.is_empty() && candidate.is_empty() {
            return true;
        }

        if reference.len() != candidate.len() {
            return false;
        }

        let width = match aligned_width(reference, candidate) {
            Some(width) => width,
            None => return false,
        };

        if !quick_reject(reference, candidate, order_matters) || self.cancel.is_cancelled() {
            return false;
        }

        let reference_view: Vec<Vec<&Scalar>> =
            reference.iter().map(|r| r.iter().collect()).collect();

        if width == 1 {
            let candidate_view: Vec<Vec<&Scalar>> =
                candidate.iter().map(|r| r.iter().collect()).collect();
            return views_match(&reference_view, &candidate_view, order_matters);
        }

        let reference_columns = column_sets(reference, width);
        let space = self
            .solver
            .constrain(&reference_columns, candidate, &mut self.rng);

        let cancel = &self.cancel;
        space
            .bijections()
            .take_while(|_| !cancel.is_cancelled())
            .any(|perm| {
                let candidate_view: Vec<Vec<&Scalar>> =
                    candidate.iter().map(|r| permute_row(r, &perm)).collect();
                views_match(&reference_view, &candidate_view, order_matters)
            })
    }

    /// Returns true if the distinct rows of both results are equal under
    /// some column permutation.
    ///
    /// Row order and duplicate counts are ignored.
    pub fn set_match(&mut self, reference: &[Row], candidate: &[Row]) -> bool {
        if set_eq(reference, candidate) {
            return true;
        }

        if reference.is_empty() || candidate.is_empty() {
            return false;
        }

        let width = match aligned_width(reference, candidate) {
            Some(width) if width > 1 => width,
            _ => return false,
        };

        let reference_view: Vec<Vec<&Scalar>> =
            reference.iter().map(|r| r.iter().collect()).collect();
        let reference_columns = column_sets(reference, width);
        let space = self
            .solver
            .constrain(&reference_columns, candidate, &mut self.rng);

        let cancel = &self.cancel;
        space
            .bijections()
            .take_while(|_| !cancel.is_cancelled())
            .any(|perm| {
                let candidate_view: Vec<Vec<&Scalar>> =
                    candidate.iter().map(|r| permute_row(r, &perm)).collect();
                set_eq(&reference_view, &candidate_view)
            })
    }
}

/// Decides equivalence with the default solver configuration
pub fn result_eq(reference: &[Row], candidate: &[Row], order_matters: bool) -> bool {
    EquivalenceDecider::default().result_eq(reference, candidate, order_matters)
}

/// Common width of two non-empty rectangular results
fn aligned_width(reference: &[Row], candidate: &[Row]) -> Option<usize> {
    let width = column_count(reference)?;
    if column_count(candidate)? != width {
        return None;
    }
    if !is_rectangular(reference) || !is_rectangular(candidate) {
        return None;
    }
    Some(width)
}

/// Distinct values of each reference column
fn column_sets(rows: &[Row], width: usize) -> Vec<HashSet<&Scalar>> {
    (0..width)
        .map(|i| rows.iter().map(|r| &r[i]).collect())
        .collect()
}

fn views_match(reference: &[Vec<&Scalar>], candidate: &[Vec<&Scalar>], order_matters: bool) -> bool {
    if order_matters {
        reference == candidate
    } else {
        // Set equality is implied by bag equality but rejects most misses cheaply
        set_eq(reference, candidate) && multiset_eq(reference, candidate)
    }
}
