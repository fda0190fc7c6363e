//! Result equivalence engine
//!
//! Decides whether a candidate result set denotes the same answer as a
//! reference result set, tolerating column reordering and (unless order is
//! required) row reordering. Operates on realized rows only.
//!
//! # Layers
//!
//! - `quick_reject`: cheap necessary condition over canonicalized rows
//! - `permutation`: pruned column permutation space
//! - `multiset`: bag and set equality
//! - `decider`: orchestrates the above into a verdict

mod decider;
mod multiset;
mod permutation;
mod quick_reject;

pub use decider::{result_eq, EquivalenceDecider};
pub use multiset::{multiset_eq, set_eq};
pub use permutation::{
    permute_row, Bijections, PermutationSolver, PermutationSpace, RandomSource, SolverConfig,
};
pub use quick_reject::quick_reject;
