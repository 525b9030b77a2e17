//! Alert message rendering.
//!
//! Pure formatting: departures in, `Message` values out. The continuous
//! monitor sends one message per notable event; the snapshot mode sends a
//! single consolidated report grouped by severity.

use chrono::{DateTime, FixedOffset};

use crate::classify::{Categorized, delay_minutes};
use crate::domain::Departure;

/// Human-readable label for the monitored route.
pub const ROUTE_LABEL: &str = "Enköping C → Stockholm C";

/// A rendered notification: title plus plaintext body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub title: String,
    pub body: String,
}

/// Per-event message for a delayed departure.
pub fn delay_message(departure: &Departure, delay_mins: i64) -> Message {
    let mut body = format!(
        "Train {} ({ROUTE_LABEL}) is delayed by {delay_mins} minute(s).\nScheduled: {}",
        departure.train_id,
        local_time(&departure.advertised_time),
    );
    if let Some(estimated) = &departure.estimated_time {
        body.push_str(&format!("  |  Expected: {}", local_time(estimated)));
    }

    Message {
        title: "🚆 SJ Train Delayed".to_string(),
        body,
    }
}

/// Per-event message for a cancelled departure.
///
/// The deviation reason, when present and non-blank, is included verbatim.
pub fn cancellation_message(departure: &Departure) -> Message {
    let mut body = format!(
        "Train {} ({ROUTE_LABEL}) scheduled at {} has been cancelled.",
        departure.train_id,
        local_time(&departure.advertised_time),
    );
    if let Some(reason) = &departure.deviation {
        if !reason.trim().is_empty() {
            body.push_str(&format!(" Reason: {reason}"));
        }
    }

    Message {
        title: "🚆 SJ Train Canceled".to_string(),
        body,
    }
}

/// Consolidated snapshot report, grouped by severity.
///
/// When nothing is notable the report is an all-clear message, so the
/// snapshot mode always has something to send.
pub fn snapshot_report(groups: &Categorized<'_>) -> Message {
    if groups.is_empty() {
        return Message {
            title: "🚆 SJ Route Check".to_string(),
            body: format!("No delays or cancellations for {ROUTE_LABEL}."),
        };
    }

    let mut body = String::new();
    push_section(&mut body, "Cancelled", &groups.canceled);
    push_section(&mut body, "Severely delayed", &groups.severe);
    push_section(&mut body, "Moderately delayed", &groups.moderate);

    Message {
        title: format!("🚆 SJ Route Report — {ROUTE_LABEL}"),
        body,
    }
}

fn push_section(body: &mut String, heading: &str, departures: &[&Departure]) {
    if departures.is_empty() {
        return;
    }
    if !body.is_empty() {
        body.push('\n');
    }
    body.push_str(heading);
    body.push_str(":\n");
    for departure in departures {
        body.push_str(&record_line(departure));
        body.push('\n');
    }
}

/// One report line: train id, scheduled time, expected time and delay when
/// an estimate exists, deviation reason when present and non-blank.
fn record_line(departure: &Departure) -> String {
    let mut line = format!(
        "  Train {} | scheduled {}",
        departure.train_id,
        local_time(&departure.advertised_time),
    );
    if let Some(estimated) = &departure.estimated_time {
        line.push_str(&format!(
            " | expected {} (+{} min)",
            local_time(estimated),
            delay_minutes(departure),
        ));
    }
    if let Some(reason) = &departure.deviation {
        if !reason.trim().is_empty() {
            line.push_str(&format!(" | {reason}"));
        }
    }
    line
}

/// Format a timestamp as wall-clock time in the feed's own UTC offset.
fn local_time(t: &DateTime<FixedOffset>) -> String {
    t.format("%H:%M").to_string()
}
