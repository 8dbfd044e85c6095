//! Month filter types.
//!
//! The backend holds journeys for May, June and July. A selection is an
//! ordered list of months; an empty selection means "no filter", which
//! resolves to all three available months.

use std::fmt;
use std::str::FromStr;

use super::DomainError;

/// Months used when nothing is selected.
pub const DEFAULT_MONTHS: [u8; 3] = [5, 6, 7];

/// Returns true iff both slices have the same length and the same element
/// at every index.
///
/// Order matters: `[5, 6]` and `[6, 5]` are different. Change detection
/// relies on this, so a reordered selection counts as a new query.
pub fn sequences_equal<T: PartialEq>(a: &[T], b: &[T]) -> bool {
    if a.len() != b.len() {
        return false;
    }

    a.iter().zip(b).all(|(x, y)| x == y)
}

/// A calendar month, 1 to 12.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Month(u8);

impl Month {
    pub fn new(value: u8) -> Result<Self, DomainError> {
        if (1..=12).contains(&value) {
            Ok(Self(value))
        } else {
            Err(DomainError::InvalidMonth(value.to_string()))
        }
    }

    pub fn get(&self) -> u8 {
        self.0
    }
}

impl fmt::Debug for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Month({})", self.0)
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An ordered month selection.
#[derive(Debug, Clone, Default)]
pub struct MonthSelection(Vec<Month>);

impl MonthSelection {
    /// An empty selection (resolves to [`DEFAULT_MONTHS`]).
    pub fn empty() -> Self {
        Self(Vec::new())
    }

    /// The default `[5, 6, 7]` selection.
    pub fn all() -> Self {
        Self(DEFAULT_MONTHS.iter().map(|&m| Month(m)).collect())
    }

    /// Build a selection from raw month numbers, keeping their order.
    pub fn from_numbers(months: &[u8]) -> Result<Self, DomainError> {
        months
            .iter()
            .map(|&m| Month::new(m))
            .collect::<Result<Vec<_>, _>>()
            .map(Self)
    }

    pub fn months(&self) -> &[Month] {
        &self.0
    }

    pub fn numbers(&self) -> Vec<u8> {
        self.0.iter().map(Month::get).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// The selection that is actually sent to the backend.
    pub fn effective(&self) -> Self {
        if self.0.is_empty() {
            Self::all()
        } else {
            self.clone()
        }
    }

    /// Order-sensitive comparison, see [`sequences_equal`].
    pub fn same_as(&self, other: &MonthSelection) -> bool {
        sequences_equal(&self.0, &other.0)
    }
}

impl PartialEq for MonthSelection {
    fn eq(&self, other: &Self) -> bool {
        self.same_as(other)
    }
}

impl Eq for MonthSelection {}

impl fmt::Display for MonthSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.0.iter().map(Month::to_string).collect();
        f.write_str(&parts.join(","))
    }
}

impl FromStr for MonthSelection {
    type Err = DomainError;

    /// Parses a comma-separated list such as `"5,6"`. Blank input is an
    /// empty selection.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Ok(Self::empty());
        }

        s.split(',')
            .map(|part| {
                let part = part.trim();
                part.parse::<u8>()
                    .map_err(|_| DomainError::InvalidMonth(part.to_string()))
                    .and_then(Month::new)
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Self)
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// A sequence always equals a copy of itself
        #[test]
        fn identical_sequences_are_equal(v in proptest::collection::vec(1u8..=12, 0..6)) {
            let copy = v.clone();
            prop_assert!(sequences_equal(&v, &copy));
        }

        /// Reversing a sequence that is not a palindrome makes it unequal
        #[test]
        fn reordering_is_a_change(v in proptest::collection::vec(1u8..=12, 2..6)) {
            let mut reversed = v.clone();
            reversed.reverse();
            prop_assert_eq!(sequences_equal(&v, &reversed), v == reversed);
        }

        /// The effective selection is never empty
        #[test]
        fn effective_never_empty(v in proptest::collection::vec(1u8..=12, 0..4)) {
            let selection = MonthSelection::from_numbers(&v).unwrap();
            prop_assert!(!selection.effective().is_empty());
        }
    }
}
