//! Value model for realized query results
//!
//! A result set is a sequence of rows; a row is a fixed-width tuple of
//! scalars. Nothing here knows about query text.

mod ordering;
mod scalar;

pub use ordering::{unorder_row, OrderingKey, TypeTag};
pub use scalar::{empty_sentinel, ResultSet, Row, Scalar};

/// Width of a result set, taken from its first row.
///
/// Returns `None` for an empty result set.
pub fn column_count(rows: &[Row]) -> Option<usize> {
    rows.first().map(Vec::len)
}

/// Returns true if every row has the same width as the first.
pub fn is_rectangular(rows: &[Row]) -> bool {
    match column_count(rows) {
        Some(width) => rows.iter().all(|r| r.len() == width),
        None => true,
    }
}
