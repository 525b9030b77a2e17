//! SJ train delay monitor.
//!
//! Polls the Trafikverket Open Data feed for departures on a fixed route
//! (Enköping C → Stockholm C) and pushes deduplicated delay and
//! cancellation alerts to an ntfy topic.

pub mod classify;
pub mod config;
pub mod dedup;
pub mod domain;
pub mod feed;
pub mod monitor;
pub mod notify;
pub mod report;
