//! Ordering keys and row canonicalization
//!
//! An `OrderingKey` gives every scalar a total order, whatever its type, so
//! that a row containing mixed types and NULLs can be sorted. Keys are only
//! used to reject; equal keys never stand in for equal values.

use super::scalar::Scalar;

/// Type component of an ordering key
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TypeTag {
    Null,
    Integer,
    Real,
    Text,
    Blob,
}

impl TypeTag {
    /// Returns the tag for a value
    pub fn of(value: &Scalar) -> Self {
        match value {
            Scalar::Null => TypeTag::Null,
            Scalar::Integer(_) => TypeTag::Integer,
            Scalar::Real(_) => TypeTag::Real,
            Scalar::Text(_) => TypeTag::Text,
            Scalar::Blob(_) => TypeTag::Blob,
        }
    }
}

/// Sortable, hashable key: textual representation, then type tag
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct OrderingKey {
    text: String,
    tag: TypeTag,
}

impl OrderingKey {
    /// Builds the key for a value
    pub fn of(value: &Scalar) -> Self {
        Self {
            text: value.to_string(),
            tag: TypeTag::of(value),
        }
    }
}

/// Sorts a row's values by ordering key.
///
/// Two rows holding the same values in a different column order produce the
/// same output. The sort is stable.
pub fn unorder_row(row: &[Scalar]) -> Vec<Scalar> {
    let mut keyed: Vec<(OrderingKey, &Scalar)> =
        row.iter().map(|v| (OrderingKey::of(v), v)).collect();
    keyed.sort_by(|a, b| a.0.cmp(&b.0));
    keyed.into_iter().map(|(_, v)| v.clone()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_sorts_mixed_types() {
        let row = vec![
            Scalar::Text("b".into()),
            Scalar::Null,
            Scalar::Integer(10),
            Scalar::Real(2.5),
        ];
        let sorted = unorder_row(&row);
        // "10" < "2.5" < "NULL" < "b" by text
        assert_eq!(
            sorted,
            vec![
                Scalar::Integer(10),
                Scalar::Real(2.5),
                Scalar::Null,
                Scalar::Text("b".into()),
            ]
        );
    }

    #[test]
    fn test_permuted_rows_canonicalize_identically() {
        let a = vec![Scalar::Integer(1), Scalar::Text("a".into()), Scalar::Null];
        let b = vec![Scalar::Null, Scalar::Integer(1), Scalar::Text("a".into())];
        assert_eq!(unorder_row(&a), unorder_row(&b));
    }

    #[test]
    fn test_tag_breaks_text_ties() {
        let int_key = OrderingKey::of(&Scalar::Integer(1));
        let text_key = OrderingKey::of(&Scalar::Text("1".into()));
        // Both render as "1"
        assert_ne!(int_key, text_key);
        assert!(int_key < text_key);
    }

    #[test]
    fn test_empty_row() {
        assert!(unorder_row(&[]).is_empty());
    }
}
