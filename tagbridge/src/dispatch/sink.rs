// tagbridge/src/dispatch/sink.rs

use crate::dispatch::TagEvent;
use crate::{Error, Result};
use std::time::Duration;

/// Seam between the retry loop and the wire. One call, one delivery
/// attempt; retry decisions stay in the dispatcher.
pub trait EventSink {
    fn post(&mut self, event: &TagEvent) -> Result<()>;
}

/// Delivers tag events to the Home Assistant event bus over its REST API,
/// authenticated with a long-lived access token.
pub struct HttpSink {
    client: reqwest::blocking::Client,
    api_root: String,
    url: String,
    token: String,
}

impl HttpSink {
    /// Request timeout for a single delivery attempt.
    const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

    pub fn new(base_url: &str, token: &str) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Self::REQUEST_TIMEOUT)
            .build()
            .map_err(|e| Error::Delivery(e.to_string()))?;
        let root = base_url.trim_end_matches('/');
        Ok(Self {
            client,
            api_root: format!("{}/api/", root),
            url: format!("{}/api/events/tag_scanned", root),
            token: token.to_string(),
        })
    }

    /// Endpoint the sink posts to.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Probe the API root with the configured token. Distinguishes an
    /// unreachable instance (retryable) from rejected credentials (fatal)
    /// before the poll loop starts.
    pub fn check_api(&self) -> Result<()> {
        let response = self
            .client
            .get(&self.api_root)
            .bearer_auth(&self.token)
            .send()
            .map_err(|e| Error::Delivery(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else if status.as_u16() == 401 || status.as_u16() == 403 {
            Err(Error::AuthRejected {
                status: status.as_u16(),
            })
        } else {
            Err(Error::DeliveryStatus {
                status: status.as_u16(),
            })
        }
    }
}

impl EventSink for HttpSink {
    fn post(&mut self, event: &TagEvent) -> Result<()> {
        let response = self
            .client
            .post(&self.url)
            .bearer_auth(&self.token)
            .json(event)
            .send()
            .map_err(|e| Error::Delivery(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else if status.as_u16() == 401 || status.as_u16() == 403 {
            Err(Error::AuthRejected {
                status: status.as_u16(),
            })
        } else {
            Err(Error::DeliveryStatus {
                status: status.as_u16(),
            })
        }
    }
}
