//! Departure announcement value type.

use chrono::{DateTime, FixedOffset};

use super::TrainId;

/// A single departure announcement for the monitored route.
///
/// Built fresh from the feed each poll cycle and never mutated. The
/// advertised time is the originally scheduled departure; the estimated time
/// is the revised expectation, absent when the train is on schedule (or when
/// the feed simply has no revision yet).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Departure {
    /// Advertised train identifier.
    pub train_id: TrainId,
    /// Originally scheduled departure time.
    pub advertised_time: DateTime<FixedOffset>,
    /// Revised expected departure time, if any.
    pub estimated_time: Option<DateTime<FixedOffset>>,
    /// First advertised destination, if any.
    pub destination: Option<String>,
    /// Whether the departure has been cancelled.
    pub canceled: bool,
    /// First deviation description, if any (e.g. "track work").
    pub deviation: Option<String>,
}

impl Departure {
    /// Create an on-schedule departure with no optional data.
    ///
    /// Mostly useful in tests; the scanner builds departures field by field.
    pub fn new(train_id: TrainId, advertised_time: DateTime<FixedOffset>) -> Self {
        Self {
            train_id,
            advertised_time,
            estimated_time: None,
            destination: None,
            canceled: false,
            deviation: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::DateTime;

    #[test]
    fn new_has_no_optional_data() {
        let id = TrainId::parse("543").unwrap();
        let advertised = DateTime::parse_from_rfc3339("2024-03-15T10:00:00+01:00").unwrap();
        let departure = Departure::new(id, advertised);

        assert_eq!(departure.train_id.as_str(), "543");
        assert!(departure.estimated_time.is_none());
        assert!(departure.destination.is_none());
        assert!(!departure.canceled);
        assert!(departure.deviation.is_none());
    }
}
