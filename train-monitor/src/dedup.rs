//! Notification deduplication.
//!
//! Guarantees at-most-one alert per distinct (train, status) event across
//! poll cycles, while keeping memory bounded: keys whose train has dropped
//! out of the feed's active window are pruned every cycle, so the set can
//! never outgrow the number of trains the feed currently reports. There is
//! no time-based expiry; staleness is entirely feed-driven. A train that
//! leaves the window and reappears later (next day, same train number) is
//! treated as a new occurrence.

use std::collections::HashSet;
use std::fmt;

use crate::domain::TrainId;

/// The status component of a dedup key.
///
/// A later announcement for the same train with a *different* delay value
/// forms a different key, and therefore a fresh event.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AlertStatus {
    Canceled,
    Delayed(i64),
}

/// Identity of a specific (train, status) event.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DedupKey {
    train_id: TrainId,
    status: AlertStatus,
}

impl DedupKey {
    /// Key for a cancellation of the given train.
    pub fn canceled(train_id: TrainId) -> Self {
        Self {
            train_id,
            status: AlertStatus::Canceled,
        }
    }

    /// Key for a delay of the given train by the given whole minutes.
    pub fn delayed(train_id: TrainId, minutes: i64) -> Self {
        Self {
            train_id,
            status: AlertStatus::Delayed(minutes),
        }
    }

    /// The train this key belongs to.
    pub fn train_id(&self) -> &TrainId {
        &self.train_id
    }
}

impl fmt::Display for DedupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.status {
            AlertStatus::Canceled => write!(f, "{}:canceled", self.train_id),
            AlertStatus::Delayed(mins) => write!(f, "{}:delayed:{mins}", self.train_id),
        }
    }
}

/// Stateful filter over already-alerted event keys.
///
/// Owned by the poll-cycle orchestrator and passed by reference into each
/// cycle, never held as ambient global state. State is memory-resident and
/// resets on process restart.
#[derive(Debug, Default)]
pub struct NotificationDeduper {
    seen: HashSet<DedupKey>,
}

impl NotificationDeduper {
    /// Create an empty deduper.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the key if absent.
    ///
    /// Returns `true` exactly when the key was not yet present — i.e. the
    /// caller should send the alert. Checking and recording are one
    /// operation, so a `true` result can never be produced twice for the
    /// same key between prunes.
    pub fn should_notify(&mut self, key: DedupKey) -> bool {
        self.seen.insert(key)
    }

    /// Drop every key whose train is not in `active`.
    ///
    /// Must run once per cycle, before the batch's keys are evaluated,
    /// with the train ids of the current fetch as the active set.
    pub fn prune(&mut self, active: &HashSet<TrainId>) {
        self.seen.retain(|key| active.contains(&key.train_id));
    }

    /// Number of remembered keys.
    pub fn len(&self) -> usize {
        self.seen.len()
    }

    /// True when no key is remembered.
    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(s: &str) -> TrainId {
        TrainId::parse(s).unwrap()
    }

    #[test]
    fn first_occurrence_notifies_second_does_not() {
        let mut deduper = NotificationDeduper::new();

        assert!(deduper.should_notify(DedupKey::delayed(id("543"), 65)));
        assert!(!deduper.should_notify(DedupKey::delayed(id("543"), 65)));
    }

    #[test]
    fn different_delay_for_same_train_is_a_new_event() {
        let mut deduper = NotificationDeduper::new();

        assert!(deduper.should_notify(DedupKey::delayed(id("543"), 65)));
        assert!(deduper.should_notify(DedupKey::delayed(id("543"), 100)));
        assert!(!deduper.should_notify(DedupKey::delayed(id("543"), 100)));
    }

    #[test]
    fn cancellation_and_delay_are_distinct_events() {
        let mut deduper = NotificationDeduper::new();

        assert!(deduper.should_notify(DedupKey::delayed(id("543"), 30)));
        assert!(deduper.should_notify(DedupKey::canceled(id("543"))));
        assert!(!deduper.should_notify(DedupKey::canceled(id("543"))));
    }

    #[test]
    fn prune_forgets_trains_outside_active_window() {
        let mut deduper = NotificationDeduper::new();
        deduper.should_notify(DedupKey::delayed(id("543"), 65));
        deduper.should_notify(DedupKey::canceled(id("545")));

        // 543 has left the window; 545 is still active.
        let active: HashSet<TrainId> = [id("545")].into_iter().collect();
        deduper.prune(&active);

        assert_eq!(deduper.len(), 1);
        // Forgotten, so the same event alerts again if it reappears.
        assert!(deduper.should_notify(DedupKey::delayed(id("543"), 65)));
        // Still remembered.
        assert!(!deduper.should_notify(DedupKey::canceled(id("545"))));
    }

    #[test]
    fn prune_with_empty_active_set_clears_everything() {
        let mut deduper = NotificationDeduper::new();
        deduper.should_notify(DedupKey::delayed(id("543"), 5));
        deduper.should_notify(DedupKey::delayed(id("544"), 10));

        deduper.prune(&HashSet::new());
        assert!(deduper.is_empty());
    }

    #[test]
    fn prune_keeps_all_keys_of_an_active_train() {
        let mut deduper = NotificationDeduper::new();
        deduper.should_notify(DedupKey::delayed(id("543"), 10));
        deduper.should_notify(DedupKey::delayed(id("543"), 25));

        let active: HashSet<TrainId> = [id("543")].into_iter().collect();
        deduper.prune(&active);

        assert_eq!(deduper.len(), 2);
    }

    #[test]
    fn key_display() {
        assert_eq!(DedupKey::canceled(id("543")).to_string(), "543:canceled");
        assert_eq!(
            DedupKey::delayed(id("543"), 65).to_string(),
            "543:delayed:65"
        );
    }
}
