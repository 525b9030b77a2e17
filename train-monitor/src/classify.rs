//! Delay and cancellation classification.
//!
//! Pure and stateless: a departure's severity is a function of its canceled
//! flag and its delay in minutes, nothing else. One classifier serves both
//! alerting granularities — the continuous monitor's single minimum-alert
//! threshold and the snapshot report's three-tier bucketing — so both share
//! the same delay computation.

use crate::domain::Departure;

/// Default minimum delay (in minutes) before the continuous monitor alerts.
pub const DEFAULT_MIN_ALERT_MINS: i64 = 1;

/// Default lower bound of the moderate tier.
pub const DEFAULT_MODERATE_MINS: i64 = 20;

/// Default lower bound of the severe tier.
pub const DEFAULT_SEVERE_MINS: i64 = 60;

/// Severity bucket for a departure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Departure has been cancelled. Takes precedence over any delay.
    Canceled,
    /// Delay at or above the severe bound.
    Severe,
    /// Delay within the moderate tier.
    Moderate,
    /// Nothing notable; generates no alert.
    None,
}

/// Returns the departure's delay in whole minutes.
///
/// Positive means late, negative means early; `0` when no estimated time is
/// present. Truncates toward zero, so a 59-second slip counts as 0 minutes.
pub fn delay_minutes(departure: &Departure) -> i64 {
    match departure.estimated_time {
        Some(estimated) => (estimated - departure.advertised_time).num_minutes(),
        None => 0,
    }
}

/// Classifier configured with an alert threshold and tier boundaries.
#[derive(Debug, Clone)]
pub struct Classifier {
    /// Minimum delay (minutes) that warrants a per-event alert.
    pub min_alert_mins: i64,
    /// Delays in `moderate_mins..severe_mins` bucket as moderate.
    pub moderate_mins: i64,
    /// Delays at or above this bucket as severe.
    pub severe_mins: i64,
}

impl Classifier {
    /// Create a classifier with the given threshold and tier boundaries.
    pub fn new(min_alert_mins: i64, moderate_mins: i64, severe_mins: i64) -> Self {
        Self {
            min_alert_mins,
            moderate_mins,
            severe_mins,
        }
    }

    /// Returns the severity bucket for a departure.
    ///
    /// A cancelled departure is always `Canceled`, even when it also carries
    /// an estimated time implying a large delay.
    pub fn bucket(&self, departure: &Departure) -> Severity {
        if departure.canceled {
            return Severity::Canceled;
        }
        let delay = delay_minutes(departure);
        if delay >= self.severe_mins {
            Severity::Severe
        } else if delay >= self.moderate_mins {
            Severity::Moderate
        } else {
            Severity::None
        }
    }

    /// Single-threshold check used by the continuous monitor: alert if the
    /// departure is cancelled or delayed by at least `min_alert_mins`.
    pub fn requires_alert(&self, departure: &Departure) -> bool {
        departure.canceled || delay_minutes(departure) >= self.min_alert_mins
    }

    /// Group departures by bucket, preserving input order within each group.
    ///
    /// `None`-bucket departures are dropped: they generate no alert.
    pub fn categorize<'a>(&self, departures: &'a [Departure]) -> Categorized<'a> {
        let mut groups = Categorized::default();
        for departure in departures {
            match self.bucket(departure) {
                Severity::Canceled => groups.canceled.push(departure),
                Severity::Severe => groups.severe.push(departure),
                Severity::Moderate => groups.moderate.push(departure),
                Severity::None => {}
            }
        }
        groups
    }
}

impl Default for Classifier {
    fn default() -> Self {
        Self {
            min_alert_mins: DEFAULT_MIN_ALERT_MINS,
            moderate_mins: DEFAULT_MODERATE_MINS,
            severe_mins: DEFAULT_SEVERE_MINS,
        }
    }
}

/// Departures grouped by severity, `None` bucket dropped.
#[derive(Debug, Default)]
pub struct Categorized<'a> {
    pub canceled: Vec<&'a Departure>,
    pub severe: Vec<&'a Departure>,
    pub moderate: Vec<&'a Departure>,
}

impl Categorized<'_> {
    /// True when no departure was notable.
    pub fn is_empty(&self) -> bool {
        self.canceled.is_empty() && self.severe.is_empty() && self.moderate.is_empty()
    }
}
