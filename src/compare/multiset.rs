//! Bag and set equality over hashable sequences

use std::collections::{HashMap, HashSet};
use std::hash::Hash;

/// Returns true if both sequences hold the same elements with the same
/// multiplicities, in any order.
pub fn multiset_eq<T: Eq + Hash>(left: &[T], right: &[T]) -> bool {
    if left.len() != right.len() {
        return false;
    }

    let mut counts: HashMap<&T, usize> = HashMap::with_capacity(left.len());
    for item in left {
        *counts.entry(item).or_insert(0) += 1;
    }

    for item in right {
        match counts.get_mut(item) {
            Some(count) if *count > 0 => *count -= 1,
            _ => return false,
        }
    }

    counts.values().all(|&c| c == 0)
}

/// Returns true if both sequences hold the same distinct elements.
///
/// Duplicate counts and order are ignored.
pub fn set_eq<T: Eq + Hash>(left: &[T], right: &[T]) -> bool {
    let left: HashSet<&T> = left.iter().collect();
    let right: HashSet<&T> = right.iter().collect();
    left == right
}
