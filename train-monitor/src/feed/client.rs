//! Trafikverket Open Data HTTP client.
//!
//! Fetches real-time departure announcements for the monitored route and
//! hands the raw body to the scanner. The query shape (station codes,
//! operator, activity type, time window, included fields) is fixed: the
//! monitor watches exactly one route.

use tracing::debug;

use crate::domain::Departure;

use super::error::FeedError;
use super::scan::{TimestampPolicy, scan_announcements};

/// Default endpoint for the Trafikverket Open Data API.
const DEFAULT_BASE_URL: &str = "https://api.trafikinfo.trafikverket.se/v2/data.json";

/// Location signature of the monitored origin station (Enköping C).
const ORIGIN_SIGNATURE: &str = "Ek";

/// Location signature the destination list must include (Stockholm C).
const DESTINATION_SIGNATURE: &str = "Cst";

/// Operator whose departures are monitored.
const OPERATOR: &str = "SJ";

/// Configuration for the feed client.
#[derive(Debug, Clone)]
pub struct FeedConfig {
    /// Authentication key for the API
    pub api_key: String,
    /// Endpoint URL (defaults to the production API)
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// What to do with a record carrying a malformed timestamp
    pub timestamp_policy: TimestampPolicy,
}

impl FeedConfig {
    /// Create a new config with the given authentication key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 30,
            timestamp_policy: TimestampPolicy::default(),
        }
    }

    /// Set a custom endpoint URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set the request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    /// Set the malformed-timestamp policy.
    pub fn with_timestamp_policy(mut self, policy: TimestampPolicy) -> Self {
        self.timestamp_policy = policy;
        self
    }
}

/// Trafikverket feed client for the monitored route.
#[derive(Debug, Clone)]
pub struct FeedClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    timestamp_policy: TimestampPolicy,
}

impl FeedClient {
    /// Create a new feed client with the given configuration.
    pub fn new(config: FeedConfig) -> Result<Self, FeedError> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url,
            api_key: config.api_key,
            timestamp_policy: config.timestamp_policy,
        })
    }

    /// Fetch upcoming SJ departures from Enköping C towards Stockholm C.
    ///
    /// Queries a window from 1 hour in the past to 12 hours in the future,
    /// ordered by advertised time. Returns the scanned departure records in
    /// feed order.
    pub async fn fetch_departures(&self) -> Result<Vec<Departure>, FeedError> {
        let response = self
            .http
            .post(&self.base_url)
            .header(reqwest::header::CONTENT_TYPE, "application/xml")
            .body(self.query_body())
            .send()
            .await?;

        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(FeedError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let body = response.text().await?;
        debug!(bytes = body.len(), "fetched feed response");

        Ok(scan_announcements(&body, self.timestamp_policy)?)
    }

    /// Build the XML query document.
    ///
    /// The filter and INCLUDE set must stay exactly as upstream expects:
    /// departures (`Avgang`) from the origin, operated by SJ, calling at the
    /// destination, advertised within (now - 1 h, now + 12 h).
    fn query_body(&self) -> String {
        format!(
            "<REQUEST>\
             <LOGIN authenticationkey=\"{key}\" />\
             <QUERY objecttype=\"TrainAnnouncement\" orderby=\"AdvertisedTimeAtLocation\">\
             <FILTER><AND>\
             <EQ name=\"LocationSignature\" value=\"{origin}\" />\
             <EQ name=\"ActivityType\" value=\"Avgang\" />\
             <EQ name=\"InformationOwner\" value=\"{operator}\" />\
             <IN name=\"ToLocation.LocationName\" value=\"{destination}\" />\
             <GT name=\"AdvertisedTimeAtLocation\" value=\"$dateadd(-01:00:00)\" />\
             <LT name=\"AdvertisedTimeAtLocation\" value=\"$dateadd(12:00:00)\" />\
             </AND></FILTER>\
             <INCLUDE>AdvertisedTrainIdent</INCLUDE>\
             <INCLUDE>AdvertisedTimeAtLocation</INCLUDE>\
             <INCLUDE>EstimatedTimeAtLocation</INCLUDE>\
             <INCLUDE>ToLocation</INCLUDE>\
             <INCLUDE>Canceled</INCLUDE>\
             <INCLUDE>Deviation</INCLUDE>\
             </QUERY></REQUEST>",
            key = self.api_key,
            origin = ORIGIN_SIGNATURE,
            operator = OPERATOR,
            destination = DESTINATION_SIGNATURE,
        )
    }
}
