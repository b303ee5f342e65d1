//! HTTP page source
//!
//! Issues one GET per page against the configured endpoint:
//! - Window bounds, page size and offset as query parameters
//! - Optional API key header
//! - Redirects are never followed
//! - Optional client-side throttle
//!
//! Retry decisions belong to the harvester; this client reports every
//! status it receives.

use super::rate_limit::{RateLimiter, RateLimiterConfig};
use super::source::PageSource;
use super::types::{ExtraArg, RawResponse};
use crate::error::Result;
use crate::pagination::OffsetPaginator;
use crate::types::BackoffType;
use crate::window::HarvestWindow;
use async_trait::async_trait;
use reqwest::redirect::Policy;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;
use url::Url;

/// Configuration for the HTTP page source
#[derive(Debug, Clone)]
pub struct HttpSourceConfig {
    /// Endpoint queried for every page
    pub base_url: String,
    /// Window start parameter name
    pub start_param: String,
    /// Window end parameter name
    pub end_param: String,
    /// Page size and offset parameters
    pub paginator: OffsetPaginator,
    /// Header carrying the API key
    pub api_key_header: String,
    /// API key, if any
    pub api_key: Option<String>,
    /// Arguments sent ahead of the window parameters
    pub extra_args: Vec<ExtraArg>,
    /// Request timeout
    pub timeout: Duration,
    /// Client-side throttle
    pub throttle: Option<RateLimiterConfig>,
    /// User agent string
    pub user_agent: String,
}

impl HttpSourceConfig {
    /// Create a config for an endpoint
    pub fn new(base_url: impl Into<String>, paginator: OffsetPaginator) -> Self {
        Self {
            base_url: base_url.into(),
            start_param: "pubStartDate".to_string(),
            end_param: "pubEndDate".to_string(),
            paginator,
            api_key_header: "apiKey".to_string(),
            api_key: None,
            extra_args: Vec::new(),
            timeout: Duration::from_secs(60),
            throttle: None,
            user_agent: format!("cve-harvest/{}", env!("CARGO_PKG_VERSION")),
        }
    }

    /// Set the window bound parameter names
    #[must_use]
    pub fn with_bound_params(mut self, start: impl Into<String>, end: impl Into<String>) -> Self {
        self.start_param = start.into();
        self.end_param = end.into();
        self
    }

    /// Set the API key header name
    #[must_use]
    pub fn with_api_key_header(mut self, header: impl Into<String>) -> Self {
        self.api_key_header = header.into();
        self
    }

    /// Set the API key
    #[must_use]
    pub fn with_api_key(mut self, key: Option<String>) -> Self {
        self.api_key = key;
        self
    }

    /// Set extra query arguments
    #[must_use]
    pub fn with_extra_args(mut self, args: Vec<ExtraArg>) -> Self {
        self.extra_args = args;
        self
    }

    /// Set the request timeout
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the client-side throttle
    #[must_use]
    pub fn with_throttle(mut self, throttle: Option<RateLimiterConfig>) -> Self {
        self.throttle = throttle;
        self
    }

    /// Set user agent
    #[must_use]
    pub fn with_user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = agent.into();
        self
    }
}

/// Page source backed by reqwest
pub struct HttpPageSource {
    client: Client,
    base_url: Url,
    config: HttpSourceConfig,
    rate_limiter: Option<RateLimiter>,
}

impl HttpPageSource {
    /// Create a new page source
    pub fn new(config: HttpSourceConfig) -> Result<Self> {
        let base_url = Url::parse(&config.base_url)?;
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .redirect(Policy::none())
            .build()?;
        let rate_limiter = config.throttle.as_ref().map(RateLimiter::new);

        Ok(Self {
            client,
            base_url,
            config,
            rate_limiter,
        })
    }

    /// Check if rate limiting is enabled
    pub fn has_rate_limiter(&self) -> bool {
        self.rate_limiter.is_some()
    }

    /// Full request URL for a window and offset
    pub fn page_url(&self, window: &HarvestWindow, offset: u64) -> Url {
        let mut url = self.base_url.clone();
        {
            let mut query = url.query_pairs_mut();
            for arg in &self.config.extra_args {
                match &arg.value {
                    Some(value) => query.append_pair(&arg.key, value),
                    None => query.append_key_only(&arg.key),
                };
            }
            query.append_pair(&self.config.start_param, &window.start_bound());
            query.append_pair(&self.config.end_param, &window.end_bound());
            for (key, value) in self.config.paginator.params(offset) {
                query.append_pair(&key, &value);
            }
        }
        url
    }
}

#[async_trait]
impl PageSource for HttpPageSource {
    async fn fetch(&self, window: &HarvestWindow, offset: u64) -> Result<RawResponse> {
        if let Some(ref limiter) = self.rate_limiter {
            limiter.wait().await;
        }

        let url = self.page_url(window, offset);
        let mut req = self.client.get(url.as_str());
        if let Some(ref key) = self.config.api_key {
            req = req.header(self.config.api_key_header.as_str(), key.as_str());
        }

        let response = req.send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;
        debug!(%window, offset, status, bytes = body.len(), "Fetched page");

        Ok(RawResponse { status, body })
    }

    fn paginator(&self) -> &OffsetPaginator {
        &self.config.paginator
    }
}

impl std::fmt::Debug for HttpPageSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpPageSource")
            .field("base_url", &self.base_url.as_str())
            .field("has_api_key", &self.config.api_key.is_some())
            .field("has_rate_limiter", &self.rate_limiter.is_some())
            .finish_non_exhaustive()
    }
}

/// Calculate the pause before the next attempt after `attempt` failures
pub fn calculate_backoff(
    backoff_type: BackoffType,
    initial: Duration,
    max: Duration,
    attempt: u32,
) -> Duration {
    let delay = match backoff_type {
        BackoffType::Constant => initial,
        BackoffType::Linear => initial.saturating_mul(attempt + 1),
        BackoffType::Exponential => {
            let factor = 2u32.saturating_pow(attempt);
            initial.saturating_mul(factor)
        }
    };

    std::cmp::min(delay, max)
}
