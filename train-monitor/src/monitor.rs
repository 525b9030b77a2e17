//! Poll-cycle orchestration.
//!
//! One cycle runs strictly in sequence: fetch → classify → dedupe →
//! dispatch. The continuous mode repeats this on a fixed interval with the
//! deduper carried across cycles; the snapshot mode runs the same
//! fetch-classify pipeline once, with no dedup, and sends one consolidated
//! report.
//!
//! All recoverable failures stop at the cycle boundary: a failed fetch
//! abandons the cycle, a failed send is logged and the remaining sends (and
//! future cycles) proceed unaffected. Nothing here terminates the process.

use std::collections::HashSet;
use std::time::Duration;

use tokio::time::MissedTickBehavior;
use tracing::{info, warn};

use crate::classify::{Classifier, delay_minutes};
use crate::dedup::{DedupKey, NotificationDeduper};
use crate::domain::{Departure, TrainId};
use crate::feed::{FeedClient, FeedError};
use crate::notify::Notifier;
use crate::report::{self, Message};

/// Plan the per-event alerts for one fetched batch.
///
/// Prunes the deduper against the batch's train ids first, then walks the
/// batch in feed order: cancellations and above-threshold delays whose key
/// has not alerted before each yield one message. Pure with respect to I/O,
/// so the whole continuous-mode decision path is testable without a network.
pub fn plan_alerts(
    departures: &[Departure],
    classifier: &Classifier,
    deduper: &mut NotificationDeduper,
) -> Vec<Message> {
    let active: HashSet<TrainId> = departures.iter().map(|d| d.train_id.clone()).collect();
    deduper.prune(&active);

    let mut messages = Vec::new();
    for departure in departures {
        if departure.canceled {
            let key = DedupKey::canceled(departure.train_id.clone());
            if deduper.should_notify(key) {
                info!(train = %departure.train_id, "cancellation detected");
                messages.push(report::cancellation_message(departure));
            }
        } else if classifier.requires_alert(departure) {
            let delay = delay_minutes(departure);
            let key = DedupKey::delayed(departure.train_id.clone(), delay);
            if deduper.should_notify(key) {
                info!(train = %departure.train_id, delay_mins = delay, "delay detected");
                messages.push(report::delay_message(departure, delay));
            }
        }
    }
    messages
}

/// The delay monitor: owns the feed client, the notifier, the classifier
/// and the dedup state.
pub struct Monitor {
    feed: FeedClient,
    notifier: Notifier,
    classifier: Classifier,
    deduper: NotificationDeduper,
}

impl Monitor {
    /// Create a monitor with fresh dedup state.
    pub fn new(feed: FeedClient, notifier: Notifier, classifier: Classifier) -> Self {
        Self {
            feed,
            notifier,
            classifier,
            deduper: NotificationDeduper::new(),
        }
    }

    /// Run poll cycles forever at the given interval.
    ///
    /// The first cycle runs immediately. Cycles never overlap: if one takes
    /// longer than the interval, the next tick is delayed rather than run
    /// concurrently, so the deduper is only ever touched by one cycle.
    pub async fn run(&mut self, poll_interval: Duration) {
        let mut interval = tokio::time::interval(poll_interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            interval.tick().await;
            self.run_cycle().await;
        }
    }

    /// Run one fetch → classify → dedupe → dispatch cycle.
    ///
    /// A fetch failure abandons the cycle; a send failure skips only that
    /// send. Both are reduced to a log line.
    pub async fn run_cycle(&mut self) {
        let departures = match self.feed.fetch_departures().await {
            Ok(departures) => departures,
            Err(e) => {
                warn!(error = %e, "fetch failed, skipping cycle");
                return;
            }
        };
        info!(count = departures.len(), "fetched departures");

        let messages = plan_alerts(&departures, &self.classifier, &mut self.deduper);
        for message in &messages {
            if let Err(e) = self.notifier.send(message).await {
                warn!(error = %e, title = %message.title, "failed to send notification");
            }
        }
    }

    /// One-shot snapshot: fetch once, send a single consolidated report
    /// (or an all-clear message), no dedup.
    pub async fn snapshot(&self) -> Result<(), FeedError> {
        let departures = self.feed.fetch_departures().await?;
        info!(count = departures.len(), "fetched departures");

        let groups = self.classifier.categorize(&departures);
        let message = report::snapshot_report(&groups);
        if let Err(e) = self.notifier.send(&message).await {
            warn!(error = %e, "failed to send snapshot report");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TrainId;
    use chrono::{DateTime, Duration as ChronoDuration, FixedOffset};

    fn advertised(hhmm: &str) -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339(&format!("2024-03-15T{hhmm}:00+01:00")).unwrap()
    }

    fn departure(id: &str, adv: &str, delay_mins: Option<i64>, canceled: bool) -> Departure {
        Departure {
            train_id: TrainId::parse(id).unwrap(),
            advertised_time: advertised(adv),
            estimated_time: delay_mins.map(|m| advertised(adv) + ChronoDuration::minutes(m)),
            destination: Some("Cst".to_string()),
            canceled,
            deviation: None,
        }
    }

    #[test]
    fn severe_delay_alerts_once_then_again_on_new_delay() {
        let classifier = Classifier::default();
        let mut deduper = NotificationDeduper::new();

        // Advertised 10:00, estimated 11:05: 65 minutes.
        let batch = vec![departure("543", "10:00", Some(65), false)];
        let messages = plan_alerts(&batch, &classifier, &mut deduper);
        assert_eq!(messages.len(), 1);
        assert!(messages[0].body.contains("delayed by 65 minute(s)"));

        // Immediate re-fetch with identical data: no repeat alert.
        let messages = plan_alerts(&batch, &classifier, &mut deduper);
        assert!(messages.is_empty());

        // Later fetch shows estimated 11:40 (delay 100): new event.
        let batch = vec![departure("543", "10:00", Some(100), false)];
        let messages = plan_alerts(&batch, &classifier, &mut deduper);
        assert_eq!(messages.len(), 1);
        assert!(messages[0].body.contains("delayed by 100 minute(s)"));
    }

    #[test]
    fn cancellation_message_carries_reason() {
        let classifier = Classifier::default();
        let mut deduper = NotificationDeduper::new();

        let mut dep = departure("543", "10:00", None, true);
        dep.deviation = Some("track work".to_string());

        let messages = plan_alerts(&[dep], &classifier, &mut deduper);
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].title, "🚆 SJ Train Canceled");
        assert!(messages[0].body.contains("Reason: track work"));
    }

    #[test]
    fn unremarkable_departures_yield_no_alerts() {
        let classifier = Classifier::default();
        let mut deduper = NotificationDeduper::new();

        let batch = vec![
            departure("543", "10:00", None, false),
            departure("545", "10:30", Some(0), false),
            departure("547", "11:00", Some(-4), false),
        ];
        let messages = plan_alerts(&batch, &classifier, &mut deduper);
        assert!(messages.is_empty());
        assert!(deduper.is_empty());
    }

    #[test]
    fn train_leaving_window_is_forgotten() {
        let classifier = Classifier::default();
        let mut deduper = NotificationDeduper::new();

        let batch = vec![departure("543", "10:00", Some(30), false)];
        assert_eq!(plan_alerts(&batch, &classifier, &mut deduper).len(), 1);

        // 543 drops out of the window; its history must go with it.
        let other = vec![departure("545", "10:30", None, false)];
        plan_alerts(&other, &classifier, &mut deduper);
        assert!(deduper.is_empty());

        // Same train number reappears later: treated as a new occurrence.
        assert_eq!(plan_alerts(&batch, &classifier, &mut deduper).len(), 1);
    }

    #[test]
    fn cancellation_alerts_even_with_large_delay_as_cancellation() {
        let classifier = Classifier::default();
        let mut deduper = NotificationDeduper::new();

        // Cancelled and carrying an estimate: message must be the
        // cancellation, not a delay alert.
        let batch = vec![departure("543", "10:00", Some(90), true)];
        let messages = plan_alerts(&batch, &classifier, &mut deduper);
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].title, "🚆 SJ Train Canceled");
    }

    #[test]
    fn alerts_preserve_feed_order() {
        let classifier = Classifier::default();
        let mut deduper = NotificationDeduper::new();

        let batch = vec![
            departure("543", "10:00", Some(10), false),
            departure("545", "10:30", None, true),
            departure("547", "11:00", Some(70), false),
        ];
        let messages = plan_alerts(&batch, &classifier, &mut deduper);

        assert_eq!(messages.len(), 3);
        assert!(messages[0].body.contains("Train 543"));
        assert!(messages[1].body.contains("Train 545"));
        assert!(messages[2].body.contains("Train 547"));
    }

    #[test]
    fn below_threshold_delay_respects_configured_minimum() {
        let classifier = Classifier::new(15, 20, 60);
        let mut deduper = NotificationDeduper::new();

        let batch = vec![
            departure("543", "10:00", Some(10), false),
            departure("545", "10:30", Some(15), false),
        ];
        let messages = plan_alerts(&batch, &classifier, &mut deduper);
        assert_eq!(messages.len(), 1);
        assert!(messages[0].body.contains("Train 545"));
    }
}
