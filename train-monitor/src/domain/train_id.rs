//! Train identifier type.

use std::fmt;

/// Error returned when parsing an invalid train identifier.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid train id: {reason}")]
pub struct InvalidTrainId {
    reason: &'static str,
}

/// An advertised train identifier, e.g. `"543"`.
///
/// Trafikverket train idents are short numeric-looking strings, but the feed
/// does not guarantee a fixed width, so this type only guarantees the value
/// is non-blank.
///
/// # Examples
///
/// ```
/// use train_monitor::domain::TrainId;
///
/// let id = TrainId::parse("543").unwrap();
/// assert_eq!(id.as_str(), "543");
///
/// assert!(TrainId::parse("").is_err());
/// assert!(TrainId::parse("   ").is_err());
/// ```
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TrainId(String);

impl TrainId {
    /// Parse a train identifier from a string.
    ///
    /// The input must contain at least one non-whitespace character.
    pub fn parse(s: &str) -> Result<Self, InvalidTrainId> {
        if s.is_empty() {
            return Err(InvalidTrainId {
                reason: "must not be empty",
            });
        }

        if s.trim().is_empty() {
            return Err(InvalidTrainId {
                reason: "must not be blank",
            });
        }

        Ok(TrainId(s.to_string()))
    }

    /// Returns the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for TrainId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TrainId({})", self.0)
    }
}

impl fmt::Display for TrainId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_valid_ids() {
        assert!(TrainId::parse("543").is_ok());
        assert!(TrainId::parse("10543").is_ok());
        assert!(TrainId::parse("X2000").is_ok());
    }

    #[test]
    fn reject_empty() {
        assert!(TrainId::parse("").is_err());
    }

    #[test]
    fn reject_blank() {
        assert!(TrainId::parse(" ").is_err());
        assert!(TrainId::parse("   ").is_err());
        assert!(TrainId::parse("\t").is_err());
    }

    #[test]
    fn as_str_roundtrip() {
        let id = TrainId::parse("543").unwrap();
        assert_eq!(id.as_str(), "543");
        assert_eq!(id.to_string(), "543");
    }

    #[test]
    fn equality_and_hashing() {
        use std::collections::HashSet;

        let a = TrainId::parse("543").unwrap();
        let b = TrainId::parse("543").unwrap();
        let c = TrainId::parse("544").unwrap();

        assert_eq!(a, b);
        assert_ne!(a, c);

        let mut set = HashSet::new();
        set.insert(a);
        assert!(set.contains(&b));
        assert!(!set.contains(&c));
    }
}
