//! Location identifiers.

use std::fmt;

use super::DataError;

/// A place: a house, a ferry port, a holiday destination.
///
/// Locations are opaque identifiers. Two locations are the same place
/// exactly when their identifiers are equal. Surrounding whitespace is
/// trimmed so that spreadsheet-sourced names compare sensibly.
///
/// # Examples
///
/// ```
/// use ferry_planner::domain::Location;
///
/// let dover = Location::new(" Dover ").unwrap();
/// assert_eq!(dover.as_str(), "Dover");
/// assert_eq!(dover, Location::new("Dover").unwrap());
///
/// // Empty identifiers are rejected
/// assert!(Location::new("").is_err());
/// assert!(Location::new("   ").is_err());
/// ```
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Location(String);

impl Location {
    /// Create a location from an identifier.
    pub fn new(id: impl AsRef<str>) -> Result<Self, DataError> {
        let id = id.as_ref().trim();
        if id.is_empty() {
            return Err(DataError::EmptyLocation);
        }
        Ok(Location(id.to_string()))
    }

    /// Returns the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Location({})", self.0)
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_whitespace() {
        let loc = Location::new("  Calais\t").unwrap();
        assert_eq!(loc.as_str(), "Calais");
    }

    #[test]
    fn rejects_empty() {
        assert!(matches!(Location::new(""), Err(DataError::EmptyLocation)));
        assert!(matches!(Location::new(" \n "), Err(DataError::EmptyLocation)));
    }

    #[test]
    fn display_and_debug() {
        let loc = Location::new("Portsmouth").unwrap();
        assert_eq!(format!("{}", loc), "Portsmouth");
        assert_eq!(format!("{:?}", loc), "Location(Portsmouth)");
    }

    #[test]
    fn equality_is_by_identifier() {
        let a = Location::new("Dover").unwrap();
        let b = Location::new("Dover").unwrap();
        let c = Location::new("dover").unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn hash_consistent_with_eq() {
        use std::collections::HashSet;
        let mut set = HashSet::new();
        set.insert(Location::new("Dover").unwrap());
        assert!(set.contains(&Location::new(" Dover").unwrap()));
        assert!(!set.contains(&Location::new("Calais").unwrap()));
    }
}
