//! Upstream poller reading the current moment of a region

use reqwest::Client;
use stayreal_common::http::client::DEFAULT_TIMEOUT_SECS;
use stayreal_common::{create_client, BoxFuture, Event, EventSource, Region, StayrealError};
use stayreal_config::UpstreamConfig;
use tracing::debug;

/// [`EventSource`] reading `GET {base_url}/{region}`
///
/// Every call is a fresh request: no caching and no retry. A transport
/// failure, a non-2xx status and an undecodable body all surface as
/// [`StayrealError::UpstreamError`].
#[derive(Debug, Clone)]
pub struct HttpEventSource {
    client: Client,
    base_url: String,
}

impl HttpEventSource {
    pub fn new(config: &UpstreamConfig) -> Result<Self, StayrealError> {
        if config.base_url.is_empty() {
            return Err(StayrealError::ConfigError(
                "upstream.base_url is empty".to_string(),
            ));
        }

        let timeout = config.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS);
        let client = create_client(timeout, true).map_err(client_build_error)?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn url_for(&self, region: Region) -> String {
        format!("{}/{}", self.base_url, region)
    }

    async fn fetch(&self, region: Region) -> Result<Event, StayrealError> {
        let url = self.url_for(region);
        debug!(region = %region, "Fetching {}", url);

        let event = self
            .client
            .get(&url)
            .send()
            .await?
            .error_for_status()?
            .json::<Event>()
            .await?;

        Ok(event)
    }
}

/// A client that cannot be built is a setup problem, not an upstream outage.
fn client_build_error(err: impl std::fmt::Display) -> StayrealError {
    StayrealError::ConfigError(format!("Failed to build upstream HTTP client: {}", err))
}

impl EventSource for HttpEventSource {
    fn fetch_latest_event(&self, region: Region) -> BoxFuture<'_, Event, StayrealError> {
        Box::pin(self.fetch(region))
    }
}
