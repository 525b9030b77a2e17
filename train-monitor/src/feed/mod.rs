//! Trafikverket departure feed.
//!
//! This module fetches and decodes real-time departure announcements for
//! the monitored route.
//!
//! Key characteristics of the feed:
//! - Queried with a POSTed XML filter document, answered with a JSON-shaped
//!   body whose envelope varies; only the `TrainAnnouncement` array matters
//! - Announcements carry offset-aware timestamps
//!   (e.g. `2024-03-15T10:00:00.000+01:00`)
//! - Destination and deviation data live in nested arrays inside each
//!   announcement
//!
//! The body is decoded by a field-by-field scanner rather than a
//! general-purpose parser, so records missing required fields degrade
//! partially instead of failing the batch.

mod client;
mod error;
mod scan;

pub use client::{FeedClient, FeedConfig};
pub use error::FeedError;
pub use scan::{ScanError, TimestampPolicy, scan_announcements};
