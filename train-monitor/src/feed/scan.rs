//! Announcement scanner for the Trafikverket response document.
//!
//! The response is treated as semi-structured text: the scanner locates the
//! `"TrainAnnouncement":` array, splits it into top-level `{...}` spans by
//! brace depth, and pulls individual fields out of each span. Required
//! fields gate the record; optional fields simply come back as `None`. This
//! keeps the extraction tolerant of the surrounding envelope (which varies
//! and which the monitor does not care about) without a general-purpose
//! document parser.
//!
//! No I/O happens here. The scanner is a pure text-to-records transform and
//! is tested against literal strings.

use chrono::{DateTime, FixedOffset};

use crate::domain::{Departure, TrainId};

/// Marker preceding the announcement array in the response document.
const ARRAY_MARKER: &str = "\"TrainAnnouncement\":";

/// Policy for an otherwise well-formed announcement whose timestamp does
/// not parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimestampPolicy {
    /// Drop the offending record and keep the rest of the batch.
    #[default]
    SkipRecord,
    /// Fail the whole batch. Matches the historical behavior where one bad
    /// timestamp suppressed every alert in the cycle.
    AbortBatch,
}

/// Error returned when a timestamp fails to parse under
/// [`TimestampPolicy::AbortBatch`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("malformed timestamp in {field} for train {train_id}: {value:?}")]
pub struct ScanError {
    /// Train the offending announcement belongs to.
    pub train_id: String,
    /// Upstream field name the bad value came from.
    pub field: &'static str,
    /// The raw value that failed to parse.
    pub value: String,
}

/// Extract departure records from a raw response document.
///
/// Ordering follows the feed. A document with no announcement array yields
/// an empty batch, not an error — the feed legitimately returns nothing
/// when no departures fall in the queried window.
pub fn scan_announcements(
    body: &str,
    policy: TimestampPolicy,
) -> Result<Vec<Departure>, ScanError> {
    let Some(marker_pos) = body.find(ARRAY_MARKER) else {
        return Ok(Vec::new());
    };
    let after_marker = marker_pos + ARRAY_MARKER.len();
    let Some(bracket) = body[after_marker..].find('[') else {
        return Ok(Vec::new());
    };
    let array_start = after_marker + bracket;

    let mut departures = Vec::new();
    for span in object_spans(body, array_start) {
        if let Some(departure) = scan_object(span, policy)? {
            departures.push(departure);
        }
    }
    Ok(departures)
}

/// Split the array starting at `array_start` into top-level `{...}` spans.
///
/// Walks the text tracking brace depth: each span runs from a depth-0 `{`
/// to the `}` that returns depth to 0, so nested objects inside an
/// announcement (destination lists, deviation lists) cannot terminate a
/// span early. A `]` at depth 0 ends the array.
fn object_spans(text: &str, array_start: usize) -> Vec<&str> {
    let bytes = text.as_bytes();
    let mut spans = Vec::new();
    let mut depth: i32 = 0;
    let mut span_start: Option<usize> = None;

    for i in (array_start + 1)..bytes.len() {
        match bytes[i] {
            b'{' => {
                if depth == 0 {
                    span_start = Some(i);
                }
                depth += 1;
            }
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    if let Some(start) = span_start.take() {
                        spans.push(&text[start..=i]);
                    }
                }
            }
            b']' if depth == 0 => break,
            _ => {}
        }
    }
    spans
}

/// Scan one announcement span into a departure.
///
/// Returns `Ok(None)` when a required field is missing: the record is
/// silently dropped and the rest of the batch stays usable.
fn scan_object(span: &str, policy: TimestampPolicy) -> Result<Option<Departure>, ScanError> {
    let Some(ident) = scan_string_field(span, "AdvertisedTrainIdent") else {
        return Ok(None);
    };
    let Ok(train_id) = TrainId::parse(ident) else {
        return Ok(None);
    };
    let Some(advertised_raw) = scan_string_field(span, "AdvertisedTimeAtLocation") else {
        return Ok(None);
    };

    let Some(advertised_time) = parse_timestamp(advertised_raw) else {
        return malformed(policy, &train_id, "AdvertisedTimeAtLocation", advertised_raw);
    };

    let estimated_time = match scan_string_field(span, "EstimatedTimeAtLocation") {
        Some(raw) => match parse_timestamp(raw) {
            Some(t) => Some(t),
            None => return malformed(policy, &train_id, "EstimatedTimeAtLocation", raw),
        },
        None => None,
    };

    let canceled = scan_bool_field(span, "Canceled").unwrap_or(false);

    // Destination and deviation live in nested arrays. Isolate the sub-span
    // first, then take the first matching scalar inside it.
    let destination = nested_array_span(span, "ToLocation")
        .and_then(|inner| scan_string_field(inner, "LocationName"))
        .map(str::to_string);
    let deviation = nested_array_span(span, "Deviation")
        .and_then(|inner| scan_string_field(inner, "Description"))
        .map(str::to_string);

    Ok(Some(Departure {
        train_id,
        advertised_time,
        estimated_time,
        destination,
        canceled,
        deviation,
    }))
}

fn malformed(
    policy: TimestampPolicy,
    train_id: &TrainId,
    field: &'static str,
    value: &str,
) -> Result<Option<Departure>, ScanError> {
    match policy {
        TimestampPolicy::SkipRecord => Ok(None),
        TimestampPolicy::AbortBatch => Err(ScanError {
            train_id: train_id.to_string(),
            field,
            value: value.to_string(),
        }),
    }
}

/// Find the first `"name": "value"` pattern in `span` and return the value.
///
/// Occurrences of the quoted name that are not followed by a colon and a
/// non-empty quoted value are skipped and the search continues. No escape
/// handling: the monitored fields never carry escaped quotes upstream.
fn scan_string_field<'a>(span: &'a str, name: &str) -> Option<&'a str> {
    let needle = format!("\"{name}\"");
    let mut search_from = 0;
    while let Some(rel) = span[search_from..].find(&needle) {
        let after = search_from + rel + needle.len();
        if let Some(value) = quoted_value_after(&span[after..]) {
            return Some(value);
        }
        search_from = after;
    }
    None
}

/// Parse `: "value"` (whitespace-tolerant) at the start of `rest`.
fn quoted_value_after(rest: &str) -> Option<&str> {
    let rest = rest.trim_start().strip_prefix(':')?;
    let rest = rest.trim_start().strip_prefix('"')?;
    let end = rest.find('"')?;
    if end == 0 {
        return None;
    }
    Some(&rest[..end])
}

/// Find the first `"name": true|false` pattern in `span`.
fn scan_bool_field(span: &str, name: &str) -> Option<bool> {
    let needle = format!("\"{name}\"");
    let mut search_from = 0;
    while let Some(rel) = span[search_from..].find(&needle) {
        let after = search_from + rel + needle.len();
        let rest = span[after..].trim_start();
        if let Some(rest) = rest.strip_prefix(':') {
            let rest = rest.trim_start();
            if rest.starts_with("true") {
                return Some(true);
            }
            if rest.starts_with("false") {
                return Some(false);
            }
        }
        search_from = after;
    }
    None
}

/// Isolate the `[...]` sub-span of an array-valued field within `span`.
fn nested_array_span<'a>(span: &'a str, name: &str) -> Option<&'a str> {
    let needle = format!("\"{name}\"");
    let start = span.find(&needle)?;
    let open = start + span[start..].find('[')?;
    let close = open + span[open..].find(']')?;
    Some(&span[open..=close])
}

/// Parse an offset-aware timestamp as the feed emits them,
/// e.g. `2024-03-15T10:00:00.000+01:00`.
fn parse_timestamp(s: &str) -> Option<DateTime<FixedOffset>> {
    DateTime::parse_from_rfc3339(s).ok()
}
