//! Environment configuration.
//!
//! Everything is read once at startup. The only required setting is the
//! feed credential; a missing or blank key aborts before any polling with a
//! non-zero exit.

use std::time::Duration;

use crate::classify::DEFAULT_MIN_ALERT_MINS;
use crate::notify::DEFAULT_TOPIC_URL;

/// Default minutes between poll cycles.
pub const DEFAULT_POLL_INTERVAL_MINUTES: u64 = 5;

/// Errors raised while reading the configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// The feed credential is missing or blank
    #[error("TRAFIKVERKET_API_KEY environment variable is not set")]
    MissingApiKey,

    /// A numeric override did not parse as a positive integer
    #[error("invalid {name}: {value:?} (expected a positive integer)")]
    InvalidNumber { name: &'static str, value: String },
}

/// Startup configuration for the monitor.
#[derive(Debug, Clone)]
pub struct MonitorConfig {
    /// Trafikverket authentication key (required).
    pub api_key: String,
    /// ntfy topic URL to push alerts to.
    pub topic_url: String,
    /// Minutes between poll cycles.
    pub poll_interval_mins: u64,
    /// Minimum delay (minutes) before the continuous monitor alerts.
    pub min_alert_mins: i64,
}

impl MonitorConfig {
    /// Read the configuration from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read the configuration through an injectable lookup.
    ///
    /// Recognized variables:
    /// - `TRAFIKVERKET_API_KEY` (required)
    /// - `NTFY_TOPIC` (default [`DEFAULT_TOPIC_URL`])
    /// - `POLL_INTERVAL_MINUTES` (default 5)
    /// - `DELAY_THRESHOLD_MINUTES` (default 1)
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let api_key = lookup("TRAFIKVERKET_API_KEY")
            .filter(|v| !v.trim().is_empty())
            .ok_or(ConfigError::MissingApiKey)?;

        let topic_url = lookup("NTFY_TOPIC")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_TOPIC_URL.to_string());

        let poll_interval_mins = parse_positive(
            &lookup,
            "POLL_INTERVAL_MINUTES",
            DEFAULT_POLL_INTERVAL_MINUTES,
        )?;

        let min_alert_mins = parse_positive(
            &lookup,
            "DELAY_THRESHOLD_MINUTES",
            DEFAULT_MIN_ALERT_MINS as u64,
        )? as i64;

        Ok(Self {
            api_key,
            topic_url,
            poll_interval_mins,
            min_alert_mins,
        })
    }

    /// The poll interval as a Duration.
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_mins * 60)
    }
}

fn parse_positive(
    lookup: impl Fn(&str) -> Option<String>,
    name: &'static str,
    default: u64,
) -> Result<u64, ConfigError> {
    match lookup(name) {
        None => Ok(default),
        Some(raw) => match raw.trim().parse::<u64>() {
            Ok(n) if n > 0 => Ok(n),
            _ => Err(ConfigError::InvalidNumber { name, value: raw }),
        },
    }
}
