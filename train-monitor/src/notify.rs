//! Push notification dispatch via ntfy (<https://ntfy.sh>).
//!
//! One message is one POST to the topic URL: title in the `Title` header,
//! plaintext UTF-8 body. A non-success response is an error for the caller
//! to log; it is never retried.

use crate::report::Message;

/// Default topic when `NTFY_TOPIC` is not configured.
pub const DEFAULT_TOPIC_URL: &str = "https://ntfy.sh/sj-train-delays";

/// Errors that can occur when dispatching a notification.
#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    /// HTTP request failed (network error, timeout, etc.)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Notification channel returned an error status
    #[error("notification channel error {status}: {message}")]
    Api { status: u16, message: String },
}

/// ntfy topic client.
#[derive(Debug, Clone)]
pub struct Notifier {
    http: reqwest::Client,
    topic_url: String,
}

impl Notifier {
    /// Create a notifier for the given topic URL.
    pub fn new(topic_url: impl Into<String>, timeout_secs: u64) -> Result<Self, NotifyError> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .build()?;

        Ok(Self {
            http,
            topic_url: topic_url.into(),
        })
    }

    /// The configured topic URL.
    pub fn topic_url(&self) -> &str {
        &self.topic_url
    }

    /// Send one notification to the topic.
    pub async fn send(&self, message: &Message) -> Result<(), NotifyError> {
        let response = self
            .http
            .post(&self.topic_url)
            .header("Title", &message.title)
            .header(reqwest::header::CONTENT_TYPE, "text/plain; charset=utf-8")
            .body(message.body.clone())
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(NotifyError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn notifier_creation() {
        let notifier = Notifier::new("https://ntfy.sh/test-topic", 30).unwrap();
        assert_eq!(notifier.topic_url(), "https://ntfy.sh/test-topic");
    }

    #[test]
    fn error_display() {
        let err = NotifyError::Api {
            status: 429,
            message: "too many requests".into(),
        };
        assert_eq!(
            err.to_string(),
            "notification channel error 429: too many requests"
        );
    }
}
