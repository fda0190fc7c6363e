//! Column permutation search space
//!
//! A column permutation `perm` aligns a candidate result with the reference:
//! reference column `i` is matched by candidate column `perm[i]`. For narrow
//! results every permutation is tried. For wide results the search space is
//! first pruned by looking at candidate rows: if a candidate row holds a value
//! in column `j` that never occurs in reference column `i`, then `j` cannot be
//! matched to `i`.
//!
//! Rows are sampled with replacement, so pruning is a heuristic and not a
//! proof for adversarial value distributions.

use std::collections::{BTreeSet, HashSet};

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::value::{Row, Scalar};

/// Source of sampling indices for the solver
pub trait RandomSource {
    /// Returns an index in `0..len`. `len` is never zero.
    fn next_index(&mut self, len: usize) -> usize;
}

impl<R: rand::RngCore> RandomSource for R {
    fn next_index(&mut self, len: usize) -> usize {
        self.gen_range(0..len)
    }
}

/// Solver tuning
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolverConfig {
    /// Widths up to this value skip pruning entirely
    #[serde(default = "default_exhaustive_max_columns")]
    pub exhaustive_max_columns: usize,

    /// Number of candidate rows sampled for pruning
    #[serde(default = "default_sample_rows")]
    pub sample_rows: usize,

    /// Seed for the default sampling source
    #[serde(default)]
    pub seed: u64,
}

fn default_exhaustive_max_columns() -> usize {
    3
}
fn default_sample_rows() -> usize {
    20
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            exhaustive_max_columns: default_exhaustive_max_columns(),
            sample_rows: default_sample_rows(),
            seed: 0,
        }
    }
}

/// Computes the pruned permutation space for one comparison
#[derive(Debug, Clone, Default)]
pub struct PermutationSolver {
    config: SolverConfig,
}

impl PermutationSolver {
    pub fn new(config: SolverConfig) -> Self {
        Self { config }
    }

    /// Narrows the candidate columns for every reference column.
    ///
    /// `reference_columns[i]` is the set of values seen in reference column
    /// `i`. The width is taken from `reference_columns`.
    pub fn constrain<R: RandomSource + ?Sized>(
        &self,
        reference_columns: &[HashSet<&Scalar>],
        candidate: &[Row],
        rng: &mut R,
    ) -> PermutationSpace {
        let width = reference_columns.len();
        let mut allowed: Vec<BTreeSet<usize>> = (0..width).map(|_| (0..width).collect()).collect();

        if width <= self.config.exhaustive_max_columns || candidate.is_empty() {
            return PermutationSpace::from_sets(allowed);
        }

        let mut prune = |row: &Row| {
            for (ref_col, options) in allowed.iter_mut().enumerate() {
                options.retain(|&cand_col| {
                    row.get(cand_col)
                        .is_some_and(|v| reference_columns[ref_col].contains(v))
                });
            }
        };

        if candidate.len() <= self.config.sample_rows {
            // Small enough to visit every row once
            candidate.iter().for_each(&mut prune);
        } else {
            for _ in 0..self.config.sample_rows {
                prune(&candidate[rng.next_index(candidate.len())]);
            }
        }

        PermutationSpace::from_sets(allowed)
    }
}

/// Allowed candidate columns per reference column
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PermutationSpace {
    allowed: Vec<Vec<usize>>,
}

impl PermutationSpace {
    fn from_sets(sets: Vec<BTreeSet<usize>>) -> Self {
        Self {
            allowed: sets.into_iter().map(|s| s.into_iter().collect()).collect(),
        }
    }

    /// Allowed candidate columns for each reference column, ascending
    pub fn allowed(&self) -> &[Vec<usize>] {
        &self.allowed
    }

    pub fn width(&self) -> usize {
        self.allowed.len()
    }

    /// Returns true if some reference column has no candidate column left
    pub fn is_empty(&self) -> bool {
        self.allowed.iter().any(Vec::is_empty)
    }

    /// Bijective members of the product of the allowed sets.
    ///
    /// Yields lazily, in lexicographic order. Choices that reuse a candidate
    /// column are skipped while descending, so the non-bijective part of the
    /// product is never visited.
    pub fn bijections(&self) -> Bijections<'_> {
        let width = self.width();
        Bijections {
            allowed: &self.allowed,
            cursor: vec![0; width],
            used: vec![false; width],
            current: Vec::with_capacity(width),
            exhausted: false,
        }
    }
}

/// Depth-first iterator over the bijections of a [`PermutationSpace`]
pub struct Bijections<'a> {
    allowed: &'a [Vec<usize>],
    cursor: Vec<usize>,
    used: Vec<bool>,
    current: Vec<usize>,
    exhausted: bool,
}

impl Bijections<'_> {
    fn backtrack(&mut self) {
        if let Some(col) = self.current.pop() {
            self.used[col] = false;
        }
    }
}

impl Iterator for Bijections<'_> {
    type Item = Vec<usize>;

    fn next(&mut self) -> Option<Self::Item> {
        let width = self.allowed.len();

        while !self.exhausted {
            let depth = self.current.len();

            if depth == width {
                let found = self.current.clone();
                if width == 0 {
                    self.exhausted = true;
                } else {
                    self.backtrack();
                }
                return Some(found);
            }

            let options = &self.allowed[depth];
            let mut descended = false;
            while self.cursor[depth] < options.len() {
                let col = options[self.cursor[depth]];
                self.cursor[depth] += 1;
                if col < width && !self.used[col] {
                    self.used[col] = true;
                    self.current.push(col);
                    descended = true;
                    break;
                }
            }

            if !descended {
                self.cursor[depth] = 0;
                if depth == 0 {
                    self.exhausted = true;
                } else {
                    self.backtrack();
                }
            }
        }

        None
    }
}

/// Applies a column permutation to one row.
///
/// Output column `i` is input column `perm[i]`.
pub fn permute_row<'a>(row: &'a [Scalar], perm: &[usize]) -> Vec<&'a Scalar> {
    perm.iter().map(|&j| &row[j]).collect()
}
