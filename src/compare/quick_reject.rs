//! Quick rejection of results that cannot be equivalent
//!
//! If some column permutation makes two results equal, every row keeps its
//! values, only their positions move. Sorting each row's values therefore
//! erases any column permutation, and comparing the sorted rows is a cheap
//! necessary condition for equivalence.

use std::collections::HashSet;

use crate::value::{unorder_row, Row, Scalar};

/// Returns false only when the results are definitely not equivalent under
/// any column permutation.
///
/// A true answer is necessary but not sufficient; callers must follow it with
/// the full check.
pub fn quick_reject(reference: &[Row], candidate: &[Row], order_matters: bool) -> bool {
    let reference: Vec<Vec<Scalar>> = reference.iter().map(|r| unorder_row(r)).collect();
    let candidate: Vec<Vec<Scalar>> = candidate.iter().map(|r| unorder_row(r)).collect();

    if order_matters {
        reference == candidate
    } else {
        let reference: HashSet<&Vec<Scalar>> = reference.iter().collect();
        let candidate: HashSet<&Vec<Scalar>> = candidate.iter().collect();
        reference == candidate
    }
}
