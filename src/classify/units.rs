//! The closed set of known affiliated-unit names
//!
//! The directory associates every entry with a residential college. The set is
//! used twice during classification: to detect a college name embedded in a
//! card's free-text block, and to keep such lines out of the major/bio output.

use std::collections::HashSet;

/// The fourteen residential colleges plus the umbrella "Yale College" entry.
pub const DEFAULT_UNIT_NAMES: &[&str] = &[
    "Benjamin Franklin College",
    "Berkeley College",
    "Branford College",
    "Davenport College",
    "Ezra Stiles College",
    "Grace Hopper College",
    "Jonathan Edwards College",
    "Morse College",
    "Pauli Murray College",
    "Pierson College",
    "Saybrook College",
    "Silliman College",
    "Timothy Dwight College",
    "Trumbull College",
    "Yale College",
];

/// A closed set of known affiliated-unit names.
///
/// Injected into the classifier rather than hard-coded there, so tests can
/// substitute synthetic unit names.
#[derive(Debug, Clone)]
pub struct KnownUnits {
    names: HashSet<String>,
}

impl KnownUnits {
    /// Builds a set from arbitrary unit names.
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
        }
    }

    /// Exact-match membership test.
    pub fn contains(&self, line: &str) -> bool {
        self.names.contains(line)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl Default for KnownUnits {
    fn default() -> Self {
        Self::new(DEFAULT_UNIT_NAMES.iter().copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_set_is_complete() {
        let units = KnownUnits::default();
        assert_eq!(units.len(), 15);
        assert!(units.contains("Saybrook College"));
        assert!(units.contains("Benjamin Franklin College"));
        assert!(units.contains("Yale College"));
    }

    #[test]
    fn test_membership_is_exact() {
        let units = KnownUnits::default();
        assert!(!units.contains("saybrook college"));
        assert!(!units.contains("Saybrook"));
        assert!(!units.contains(" Saybrook College"));
    }

    #[test]
    fn test_synthetic_units() {
        let units = KnownUnits::new(["House of Atreus"]);
        assert!(units.contains("House of Atreus"));
        assert!(!units.contains("Saybrook College"));
        assert_eq!(units.len(), 1);
    }
}
