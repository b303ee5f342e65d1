//! Configuration types for the remote source and the harvester
//!
//! `SourceConfig` is the YAML-loadable description of the paginated source.
//! Every field is defaulted so an empty document (or no file at all) targets
//! the NVD CVE 2.0 endpoint. `HarvesterConfig` is the runtime form the
//! harvester consumes, with durations instead of second counts.

use crate::error::{Error, Result};
use crate::http::{HttpSourceConfig, RateLimiterConfig};
use crate::pagination::OffsetPaginator;
use crate::types::BackoffType;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Default endpoint
pub const DEFAULT_BASE_URL: &str = "https://services.nvd.nist.gov/rest/json/cves/2.0/";

/// Largest page the source serves
pub const DEFAULT_PAGE_SIZE: u32 = 2000;

// ============================================================================
// Source Config
// ============================================================================

/// Remote source description loaded from YAML
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Endpoint queried for every page
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Response field holding the record array
    #[serde(default = "default_records_field")]
    pub records_field: String,

    /// Response field holding the window's total record count
    #[serde(default = "default_total_field")]
    pub total_field: String,

    /// Query parameter names
    #[serde(default)]
    pub params: QueryParams,

    /// Records requested per page
    #[serde(default = "default_page_size")]
    pub page_size: u32,

    /// Header carrying the API key
    #[serde(default = "default_api_key_header")]
    pub api_key_header: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,

    /// Pause after a 403 response
    #[serde(default = "default_cooldown")]
    pub rate_limit_cooldown_seconds: u64,

    /// Initial pause after a transient failure
    #[serde(default = "default_retry_delay")]
    pub retry_delay_seconds: u64,

    /// Growth of the transient-failure pause
    #[serde(default)]
    pub backoff: BackoffType,

    /// Upper bound on the transient-failure pause
    #[serde(default = "default_max_backoff")]
    pub max_backoff_seconds: u64,

    /// Transient failures tolerated per window before aborting
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Pause between consecutive years
    #[serde(default = "default_year_delay")]
    pub year_delay_seconds: u64,

    /// Client-side request throttle
    #[serde(default)]
    pub throttle: Option<ThrottleConfig>,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            records_field: default_records_field(),
            total_field: default_total_field(),
            params: QueryParams::default(),
            page_size: default_page_size(),
            api_key_header: default_api_key_header(),
            timeout_seconds: default_timeout(),
            rate_limit_cooldown_seconds: default_cooldown(),
            retry_delay_seconds: default_retry_delay(),
            backoff: BackoffType::default(),
            max_backoff_seconds: default_max_backoff(),
            max_attempts: default_max_attempts(),
            year_delay_seconds: default_year_delay(),
            throttle: None,
        }
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_records_field() -> String {
    "vulnerabilities".to_string()
}

fn default_total_field() -> String {
    "totalResults".to_string()
}

fn default_page_size() -> u32 {
    DEFAULT_PAGE_SIZE
}

fn default_api_key_header() -> String {
    "apiKey".to_string()
}

fn default_timeout() -> u64 {
    60
}

fn default_cooldown() -> u64 {
    31
}

fn default_retry_delay() -> u64 {
    2
}

fn default_max_backoff() -> u64 {
    60
}

fn default_max_attempts() -> u32 {
    10
}

fn default_year_delay() -> u64 {
    2
}

impl SourceConfig {
    /// Parse from YAML text
    pub fn from_yaml(content: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a YAML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::config(format!(
                "Failed to read source config '{}': {e}",
                path.display()
            ))
        })?;
        Self::from_yaml(&content)
    }

    /// Check values serde cannot
    pub fn validate(&self) -> Result<()> {
        if self.page_size == 0 {
            return Err(Error::config("page_size must be greater than 0"));
        }
        url::Url::parse(&self.base_url)?;
        if self.records_field.is_empty() || self.total_field.is_empty() {
            return Err(Error::config("records_field and total_field must not be empty"));
        }
        if let Some(throttle) = &self.throttle {
            if throttle.requests == 0 || throttle.per_seconds == 0 {
                return Err(Error::config(
                    "throttle requests and per_seconds must be greater than 0",
                ));
            }
        }
        Ok(())
    }

    /// Runtime harvester settings
    pub fn harvester_config(&self) -> HarvesterConfig {
        HarvesterConfig {
            records_field: self.records_field.clone(),
            total_field: self.total_field.clone(),
            rate_limit_cooldown: Duration::from_secs(self.rate_limit_cooldown_seconds),
            retry_delay: Duration::from_secs(self.retry_delay_seconds),
            backoff_type: self.backoff,
            max_backoff: Duration::from_secs(self.max_backoff_seconds),
            max_attempts: self.max_attempts,
            year_delay: Duration::from_secs(self.year_delay_seconds),
            ..HarvesterConfig::default()
        }
    }

    /// HTTP page source settings, without key, extra arguments or throttle
    pub fn http_config(&self) -> HttpSourceConfig {
        HttpSourceConfig::new(
            &self.base_url,
            OffsetPaginator::new(
                &self.params.offset,
                &self.params.page_size,
                self.page_size,
            ),
        )
        .with_bound_params(&self.params.start, &self.params.end)
        .with_api_key_header(&self.api_key_header)
        .with_timeout(Duration::from_secs(self.timeout_seconds))
        .with_throttle(self.throttle.map(ThrottleConfig::limiter_config))
    }
}

/// Query parameter names used by the source
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryParams {
    /// Window start bound
    #[serde(default = "default_start_param")]
    pub start: String,
    /// Window end bound
    #[serde(default = "default_end_param")]
    pub end: String,
    /// Page size
    #[serde(default = "default_page_size_param")]
    pub page_size: String,
    /// Page offset
    #[serde(default = "default_offset_param")]
    pub offset: String,
}

impl Default for QueryParams {
    fn default() -> Self {
        Self {
            start: default_start_param(),
            end: default_end_param(),
            page_size: default_page_size_param(),
            offset: default_offset_param(),
        }
    }
}

fn default_start_param() -> String {
    "pubStartDate".to_string()
}

fn default_end_param() -> String {
    "pubEndDate".to_string()
}

fn default_page_size_param() -> String {
    "resultsPerPage".to_string()
}

fn default_offset_param() -> String {
    "startIndex".to_string()
}

/// Client-side request budget
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThrottleConfig {
    /// Requests allowed per period
    pub requests: u32,
    /// Period length in seconds
    pub per_seconds: u64,
}

impl ThrottleConfig {
    /// Published quota without an API key
    pub const ANONYMOUS: Self = Self {
        requests: 5,
        per_seconds: 30,
    };

    /// Published quota with an API key
    pub const KEYED: Self = Self {
        requests: 50,
        per_seconds: 30,
    };

    /// Quota matching whether a key is present
    pub fn published(has_api_key: bool) -> Self {
        if has_api_key {
            Self::KEYED
        } else {
            Self::ANONYMOUS
        }
    }

    /// Convert to the rate limiter's configuration
    pub fn limiter_config(self) -> RateLimiterConfig {
        RateLimiterConfig::new(self.requests, Duration::from_secs(self.per_seconds))
    }
}

// ============================================================================
// Harvester Config
// ============================================================================

/// Runtime settings for the harvester state machine
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HarvesterConfig {
    /// Response field holding the record array
    pub records_field: String,
    /// Response field holding the window total
    pub total_field: String,
    /// Pause after a 403 response
    pub rate_limit_cooldown: Duration,
    /// Granularity of the cooldown countdown
    pub cooldown_tick: Duration,
    /// Initial pause after a transient failure
    pub retry_delay: Duration,
    /// Growth of the transient-failure pause
    pub backoff_type: BackoffType,
    /// Upper bound on the transient-failure pause
    pub max_backoff: Duration,
    /// Transient failures tolerated per window
    pub max_attempts: u32,
    /// Pause between consecutive years
    pub year_delay: Duration,
}

impl Default for HarvesterConfig {
    fn default() -> Self {
        Self {
            records_field: default_records_field(),
            total_field: default_total_field(),
            rate_limit_cooldown: Duration::from_secs(default_cooldown()),
            cooldown_tick: Duration::from_secs(1),
            retry_delay: Duration::from_secs(default_retry_delay()),
            backoff_type: BackoffType::default(),
            max_backoff: Duration::from_secs(default_max_backoff()),
            max_attempts: default_max_attempts(),
            year_delay: Duration::from_secs(default_year_delay()),
        }
    }
}

impl HarvesterConfig {
    /// Create a new config builder
    pub fn builder() -> HarvesterConfigBuilder {
        HarvesterConfigBuilder::default()
    }

    /// A config with every pause set to zero
    pub fn immediate() -> Self {
        Self::builder()
            .rate_limit_cooldown(Duration::ZERO)
            .retry_delay(Duration::ZERO)
            .year_delay(Duration::ZERO)
            .build()
    }
}

/// Builder for harvester config
#[derive(Debug, Default)]
pub struct HarvesterConfigBuilder {
    config: HarvesterConfig,
}

impl HarvesterConfigBuilder {
    /// Set the response field names
    #[must_use]
    pub fn fields(mut self, records: impl Into<String>, total: impl Into<String>) -> Self {
        self.config.records_field = records.into();
        self.config.total_field = total.into();
        self
    }

    /// Set the 403 cooldown
    #[must_use]
    pub fn rate_limit_cooldown(mut self, cooldown: Duration) -> Self {
        self.config.rate_limit_cooldown = cooldown;
        self
    }

    /// Set the countdown granularity
    #[must_use]
    pub fn cooldown_tick(mut self, tick: Duration) -> Self {
        self.config.cooldown_tick = tick;
        self
    }

    /// Set the transient-failure pause
    #[must_use]
    pub fn retry_delay(mut self, delay: Duration) -> Self {
        self.config.retry_delay = delay;
        self
    }

    /// Set backoff growth and cap
    #[must_use]
    pub fn backoff(mut self, backoff_type: BackoffType, max: Duration) -> Self {
        self.config.backoff_type = backoff_type;
        self.config.max_backoff = max;
        self
    }

    /// Set the per-window transient failure budget
    #[must_use]
    pub fn max_attempts(mut self, attempts: u32) -> Self {
        self.config.max_attempts = attempts;
        self
    }

    /// Set the inter-year pause
    #[must_use]
    pub fn year_delay(mut self, delay: Duration) -> Self {
        self.config.year_delay = delay;
        self
    }

    /// Build the config
    pub fn build(self) -> HarvesterConfig {
        self.config
    }
}
