//! Equivalence Property Tests
//!
//! Tests for the result equivalence engine:
//! - Symmetry and reflexivity of multiset equality
//! - Column and row permutation invariance
//! - Shape mismatches and duplicate sensitivity
//! - Worked scenarios over realized rows

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use sqljudge::compare::{multiset_eq, result_eq, set_eq, EquivalenceDecider, SolverConfig};
use sqljudge::value::{Row, Scalar};

// =============================================================================
// Helper Functions
// =============================================================================

fn row(values: &[Scalar]) -> Row {
    values.to_vec()
}

fn ints(rows: &[&[i64]]) -> Vec<Row> {
    rows.iter()
        .map(|r| r.iter().map(|v| Scalar::Integer(*v)).collect())
        .collect()
}

fn random_scalar(rng: &mut StdRng) -> Scalar {
    match rng.gen_range(0..5) {
        0 => Scalar::Null,
        1 => Scalar::Integer(rng.gen_range(-3..4)),
        2 => Scalar::Real(rng.gen_range(-2..3) as f64 * 0.5),
        3 => Scalar::Text(["a", "b", "1", ""][rng.gen_range(0..4)].to_string()),
        _ => Scalar::Blob(vec![rng.gen_range(0..3)]),
    }
}

fn random_result(rng: &mut StdRng, rows: usize, width: usize) -> Vec<Row> {
    (0..rows)
        .map(|_| (0..width).map(|_| random_scalar(rng)).collect())
        .collect()
}

fn permute_columns(rows: &[Row], perm: &[usize]) -> Vec<Row> {
    rows.iter()
        .map(|r| perm.iter().map(|&i| r[i].clone()).collect())
        .collect()
}

/// Rows whose first column is a unique integer id; other columns are text
/// or real, so no column permutation can stand in for a row shuffle.
fn keyed_result(rng: &mut StdRng, rows: usize) -> Vec<Row> {
    (0..rows as i64)
        .map(|id| {
            vec![
                Scalar::Integer(id),
                Scalar::Text(format!("t{}", rng.gen_range(0..3))),
                Scalar::Real(rng.gen_range(0..3) as f64),
            ]
        })
        .collect()
}

// =============================================================================
// Multiset Equality
// =============================================================================

/// multiset_eq(a, b) == multiset_eq(b, a) over random inputs.
#[test]
fn test_multiset_symmetry() {
    let mut rng = StdRng::seed_from_u64(11);
    for _ in 0..200 {
        let a: Vec<Scalar> = (0..rng.gen_range(0..6)).map(|_| random_scalar(&mut rng)).collect();
        let b: Vec<Scalar> = (0..rng.gen_range(0..6)).map(|_| random_scalar(&mut rng)).collect();
        assert_eq!(multiset_eq(&a, &b), multiset_eq(&b, &a), "{:?} / {:?}", a, b);
    }
}

/// multiset_eq(a, a) holds for any a.
#[test]
fn test_multiset_reflexivity() {
    let mut rng = StdRng::seed_from_u64(12);
    for _ in 0..100 {
        let a: Vec<Scalar> = (0..rng.gen_range(0..8)).map(|_| random_scalar(&mut rng)).collect();
        assert!(multiset_eq(&a, &a));
    }
}

/// Duplicate counts matter to multiset equality but not to set equality.
#[test]
fn test_duplicate_sensitivity() {
    let a = ints(&[&[1], &[1], &[2]]);
    let b = ints(&[&[1], &[2], &[2]]);
    assert!(!multiset_eq(&a, &b));
    assert!(set_eq(&a, &b));
}

// =============================================================================
// Result Equivalence
// =============================================================================

/// result_eq(r, r, _) holds for non-empty r.
#[test]
fn test_result_eq_reflexive() {
    let mut rng = StdRng::seed_from_u64(21);
    for _ in 0..100 {
        let rows = rng.gen_range(1..8);
        let width = rng.gen_range(1..6);
        let r = random_result(&mut rng, rows, width);
        assert!(result_eq(&r, &r, false));
        assert!(result_eq(&r, &r, true));
    }
}

/// Any column bijection of R is equivalent to R when order does not matter.
#[test]
fn test_column_permutation_invariance() {
    let mut rng = StdRng::seed_from_u64(22);
    for _ in 0..150 {
        let rows = rng.gen_range(1..30);
        let width = rng.gen_range(1..7);
        let r = random_result(&mut rng, rows, width);

        let mut perm: Vec<usize> = (0..width).collect();
        perm.shuffle(&mut rng);
        let permuted = permute_columns(&r, &perm);

        assert!(result_eq(&r, &permuted, false), "perm {:?} of {:?}", perm, r);
    }
}

/// Column bijection is also tolerated when row order matters.
#[test]
fn test_column_permutation_with_order() {
    let mut rng = StdRng::seed_from_u64(23);
    for _ in 0..50 {
        let r = random_result(&mut rng, 10, 5);
        let mut perm: Vec<usize> = (0..5).collect();
        perm.shuffle(&mut rng);
        assert!(result_eq(&r, &permute_columns(&r, &perm), true));
    }
}

/// Row shuffles are equivalent without ordering and distinct with it.
#[test]
fn test_row_permutation_invariance() {
    let mut rng = StdRng::seed_from_u64(24);
    for _ in 0..100 {
        let rows = rng.gen_range(2..12);
        let r = keyed_result(&mut rng, rows);

        let mut shuffled = r.clone();
        shuffled.shuffle(&mut rng);

        assert!(result_eq(&r, &shuffled, false));
        assert_eq!(result_eq(&r, &shuffled, true), shuffled == r);
    }
}

/// Row and column permutation together.
#[test]
fn test_row_and_column_permutation() {
    let mut rng = StdRng::seed_from_u64(25);
    for _ in 0..100 {
        let rows = rng.gen_range(1..25);
        let r = random_result(&mut rng, rows, 4);
        let mut perm: Vec<usize> = (0..4).collect();
        perm.shuffle(&mut rng);
        let mut other = permute_columns(&r, &perm);
        other.shuffle(&mut rng);
        assert!(result_eq(&r, &other, false));
    }
}

/// Differing row or column counts give false and never panic.
#[test]
fn test_shape_mismatch() {
    let two_by_two = ints(&[&[1, 2], &[3, 4]]);
    let three_rows = ints(&[&[1, 2], &[3, 4], &[5, 6]]);
    let three_cols = ints(&[&[1, 2, 0], &[3, 4, 0]]);

    assert!(!result_eq(&two_by_two, &three_rows, false));
    assert!(!result_eq(&two_by_two, &three_cols, false));
    assert!(!result_eq(&two_by_two, &[], true));
    assert!(!result_eq(&[], &two_by_two, true));
}

/// Rows of unequal width are rejected.
#[test]
fn test_ragged_rows() {
    let reference = ints(&[&[1, 2], &[3, 4]]);
    let ragged = vec![row(&[Scalar::Integer(1), Scalar::Integer(2)]), row(&[Scalar::Integer(3)])];
    assert!(!result_eq(&reference, &ragged, false));
}

/// Two empty results are equivalent.
#[test]
fn test_both_empty() {
    assert!(result_eq(&[], &[], true));
    assert!(result_eq(&[], &[], false));
}

/// Values never coerce across types.
#[test]
fn test_no_numeric_coercion() {
    let integer = vec![row(&[Scalar::Integer(1)])];
    let real = vec![row(&[Scalar::Real(1.0)])];
    let text = vec![row(&[Scalar::from("1")])];
    assert!(!result_eq(&integer, &real, false));
    assert!(!result_eq(&integer, &text, false));
}

/// A changed value in a wide result is detected.
#[test]
fn test_single_value_change_detected() {
    let mut rng = StdRng::seed_from_u64(26);
    for _ in 0..50 {
        let r = keyed_result(&mut rng, 8);
        let mut changed = r.clone();
        changed[3][1] = Scalar::from("changed");
        assert!(!result_eq(&r, &changed, false));
    }
}

// =============================================================================
// Scenarios
// =============================================================================

/// Scenario A: swapped columns with matching rows.
#[test]
fn test_scenario_a_swapped_columns() {
    let result1 = vec![
        row(&[Scalar::Integer(1), Scalar::from("a")]),
        row(&[Scalar::Integer(2), Scalar::from("b")]),
    ];
    let result2 = vec![
        row(&[Scalar::from("a"), Scalar::Integer(1)]),
        row(&[Scalar::from("b"), Scalar::Integer(2)]),
    ];
    assert!(result_eq(&result1, &result2, false));
}

/// Scenario B: reversed rows.
#[test]
fn test_scenario_b_reversed_rows() {
    let result1 = ints(&[&[1], &[2]]);
    let result2 = ints(&[&[2], &[1]]);
    assert!(!result_eq(&result1, &result2, true));
    assert!(result_eq(&result1, &result2, false));
}

/// Scenario E: set matching ignores duplicates; exact matching does not.
#[test]
fn test_scenario_e_duplicates() {
    let predicted = ints(&[&[1, 2], &[1, 2]]);
    let reference = ints(&[&[1, 2]]);

    let mut decider = EquivalenceDecider::default();
    assert!(decider.set_match(&reference, &predicted));
    assert!(!decider.result_eq(&reference, &predicted, false));
}

/// Set matching tolerates swapped columns.
#[test]
fn test_set_match_column_order() {
    let predicted = ints(&[&[2, 1], &[4, 3], &[4, 3]]);
    let reference = ints(&[&[1, 2], &[3, 4]]);
    let mut decider = EquivalenceDecider::default();
    assert!(decider.set_match(&reference, &predicted));
}

// =============================================================================
// Determinism
// =============================================================================

/// Deciders with the same seed reach the same verdicts on wide inputs.
#[test]
fn test_seeded_deciders_agree() {
    let config = SolverConfig {
        seed: 99,
        ..SolverConfig::default()
    };
    let mut first = EquivalenceDecider::new(config.clone());
    let mut second = EquivalenceDecider::new(config);

    let mut rng = StdRng::seed_from_u64(27);
    for _ in 0..50 {
        let a = random_result(&mut rng, 30, 5);
        let mut b = a.clone();
        b.shuffle(&mut rng);
        if rng.gen_bool(0.5) {
            b[0][0] = Scalar::from("zz");
        }
        assert_eq!(first.result_eq(&a, &b, false), second.result_eq(&a, &b, false));
    }
}
