use crate::env::AppConfig;
use crate::error::SinkError;
use crate::record::RemotePayload;
use crate::sink::LogSink;
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use std::time::Duration;

/// Longest part of an error response body kept in the diagnostic.
const MAX_ERROR_BODY_CHARS: usize = 200;

/// Configuration for [`LogglySink`].
#[derive(Clone, Debug)]
pub struct LogglyConfig {
    /// Full ingestion URL, e.g.
    /// `https://logs-01.loggly.com/inputs/<TOKEN>/tag/http/`.
    pub url: String,
    /// Upper bound for one delivery attempt.
    pub timeout: Duration,
}

impl LogglyConfig {
    pub fn from_app_config(config: &AppConfig) -> Self {
        LogglyConfig {
            url: config.collector_url(),
            timeout: Duration::from_secs(10),
        }
    }
}

/// HTTP implementation of [`LogSink`] posting one JSON document per
/// payload to a Loggly-style bulk-less input.
#[derive(Clone)]
pub struct LogglySink {
    client: Client,
    config: LogglyConfig,
}

impl LogglySink {
    /// Construct a new sink instance using the provided configuration.
    ///
    /// The underlying client never goes through an HTTP proxy, whatever
    /// the environment says.
    pub fn new(config: LogglyConfig) -> Result<Self, SinkError> {
        let client = Client::builder()
            .no_proxy()
            .timeout(config.timeout)
            .build()?;
        Ok(Self { client, config })
    }

    pub fn from_app_config(config: &AppConfig) -> Result<Self, SinkError> {
        Self::new(LogglyConfig::from_app_config(config))
    }

    pub fn url(&self) -> &str {
        &self.config.url
    }
}

#[async_trait]
impl LogSink for LogglySink {
    async fn send(&self, payload: &RemotePayload) -> Result<(), SinkError> {
        let body = serde_json::to_vec(payload)?;
        let resp = self
            .client
            .post(&self.config.url)
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await?;

        if resp.status().is_success() {
            Ok(())
        } else {
            let status = resp.status();
            let text = resp.text().await.unwrap_or_else(|_| "<no body>".to_string());
            Err(SinkError::Status {
                status: status.as_u16(),
                body: truncate_body(&text),
            })
        }
    }
}

fn truncate_body(text: &str) -> String {
    let mut chars = text.chars();
    let head: String = chars.by_ref().take(MAX_ERROR_BODY_CHARS).collect();
    if chars.next().is_some() {
        format!("{}...", head)
    } else {
        head
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn long_error_bodies_are_cut() {
        let page = "<html>".repeat(100);
        let cut = truncate_body(&page);
        assert_eq!(cut.chars().count(), MAX_ERROR_BODY_CHARS + 3);
        assert!(cut.ends_with("..."));
        assert_eq!(truncate_body("busy"), "busy");
    }
}
