use super::error::TrackerError;
use super::request::TrackerRequest;
use super::response::TrackerResponse;
use crate::constants::{HTTP_TRACKER_TIMEOUT, USER_AGENT};
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, warn};

/// Settings for [`HttpTracker`].
#[derive(Debug, Clone)]
pub struct TrackerConfig {
    /// Timeout for the whole announce, including reading the body.
    pub timeout: Duration,
    pub user_agent: String,
    /// Honor the `HTTP_PROXY`/`HTTPS_PROXY` environment variables.
    pub system_proxy: bool,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            timeout: HTTP_TRACKER_TIMEOUT,
            user_agent: USER_AGENT.to_string(),
            system_proxy: true,
        }
    }
}

/// An HTTP(S) tracker.
///
/// Sends the announce query exactly as [`TrackerRequest::query_string`]
/// builds it. Each call is a single attempt; retrying is up to the caller.
pub struct HttpTracker {
    client: Client,
    url: String,
}

impl HttpTracker {
    pub fn new(url: &str) -> Result<Self, TrackerError> {
        Self::with_config(url, TrackerConfig::default())
    }

    pub fn with_config(url: &str, config: TrackerConfig) -> Result<Self, TrackerError> {
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(TrackerError::InvalidUrl(url.to_string()));
        }

        let mut builder = Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent);
        if !config.system_proxy {
            builder = builder.no_proxy();
        }

        let client = builder.build().map_err(TrackerError::Http)?;

        Ok(Self {
            client,
            url: url.to_string(),
        })
    }

    pub async fn announce(&self, request: &TrackerRequest) -> Result<TrackerResponse, TrackerError> {
        let url = request.announce_url(&self.url);
        debug!("Announcing to {} (event: {:?})", self.url, request.event());

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            warn!("Tracker {} responded with status {}", self.url, status);
            return Err(TrackerError::HttpStatus(status.as_u16()));
        }

        let body = response.bytes().await?;
        match TrackerResponse::from_bytes(&body) {
            Ok(announce) => {
                debug!(
                    "Tracker {} returned {} peers, interval {}s",
                    self.url,
                    announce.peers.len(),
                    announce.interval
                );
                Ok(announce)
            }
            Err(e) => {
                warn!("Announce to {} failed: {}", self.url, e);
                Err(e)
            }
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}
