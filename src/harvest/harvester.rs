//! Paginated harvester
//!
//! Drains each window one request at a time. Per request the outcome is
//! one of:
//!
//! | Outcome | Action |
//! |---|---|
//! | `Success` | hand the page on, advance the offset by the page size |
//! | `RateLimited` | count down the cooldown, retry the same offset |
//! | `TransientError` | pause, spend one attempt from the window's budget |
//!
//! Rate limiting never aborts a window. Exceeding the transient budget
//! aborts the whole run with `Error::HarvestExhausted`.

use super::shutdown::Shutdown;
use super::status::StatusSink;
use super::types::{FetchOutcome, HarvestStats, Page};
use crate::config::HarvesterConfig;
use crate::error::{Error, Result};
use crate::http::{calculate_backoff, PageSource};
use crate::pagination::PaginationState;
use crate::window::{HarvestWindow, WindowRouter};
use std::time::Duration;
use tracing::{debug, warn};

/// Consumer of harvested pages
pub trait PageHandler: Send {
    /// Handle one page of a window
    fn handle_page(&mut self, window: &HarvestWindow, page: Page) -> Result<()>;
}

impl PageHandler for Vec<Page> {
    fn handle_page(&mut self, _window: &HarvestWindow, page: Page) -> Result<()> {
        self.push(page);
        Ok(())
    }
}

/// Harvester state machine over a page source
pub struct Harvester<'a> {
    source: &'a dyn PageSource,
    config: HarvesterConfig,
    status: &'a mut dyn StatusSink,
    shutdown: Shutdown,
    stats: HarvestStats,
}

impl<'a> Harvester<'a> {
    /// Create a harvester
    pub fn new(
        source: &'a dyn PageSource,
        config: HarvesterConfig,
        status: &'a mut dyn StatusSink,
    ) -> Self {
        Self {
            source,
            config,
            status,
            shutdown: Shutdown::never(),
            stats: HarvestStats::default(),
        }
    }

    /// Race every wait against a shutdown signal
    #[must_use]
    pub fn with_shutdown(mut self, shutdown: Shutdown) -> Self {
        self.shutdown = shutdown;
        self
    }

    /// Counters so far
    pub fn stats(&self) -> HarvestStats {
        self.stats
    }

    /// Harvest every window of the router in chronological order
    pub async fn run(
        &mut self,
        router: &WindowRouter,
        handler: &mut dyn PageHandler,
    ) -> Result<HarvestStats> {
        for window in router.windows() {
            self.status.report(&format!(
                "Current year: {}, month: {}",
                window.year, window.month
            ));
            self.harvest_window(&window, handler).await?;

            if window.month == 12 {
                self.status.report("- - -");
                if window.year < router.end_year() && !self.config.year_delay.is_zero() {
                    self.shutdown.sleep(self.config.year_delay).await?;
                }
            }
        }
        Ok(self.stats)
    }

    /// Drain one window, handing each page on as it arrives
    pub async fn harvest_window(
        &mut self,
        window: &HarvestWindow,
        handler: &mut dyn PageHandler,
    ) -> Result<PaginationState> {
        let paginator = self.source.paginator().clone();
        let mut state = PaginationState::new();
        let mut attempts = 0u32;

        loop {
            let page = self.fetch_page(window, state.offset, &mut attempts).await?;
            let records_count = page.records.len();
            let total = page.total_available;

            self.stats.pages += 1;
            self.stats.records += records_count as u64;
            handler.handle_page(window, page)?;

            if paginator
                .process_page(records_count, total, &mut state)
                .is_done()
            {
                break;
            }
        }

        debug!(
            %window,
            pages = state.pages,
            records = state.total_fetched,
            "Window drained"
        );
        self.stats.windows += 1;
        Ok(state)
    }

    /// Fetch one page, absorbing rate limits and transient failures
    async fn fetch_page(
        &mut self,
        window: &HarvestWindow,
        offset: u64,
        attempts: &mut u32,
    ) -> Result<Page> {
        loop {
            if self.shutdown.is_triggered() {
                return Err(Error::Cancelled);
            }

            let result = self
                .shutdown
                .guard(self.source.fetch(window, offset))
                .await?;
            let outcome = FetchOutcome::classify(
                result,
                &self.config.records_field,
                &self.config.total_field,
                offset,
            )?;

            match outcome {
                FetchOutcome::Success(page) => return Ok(page),
                FetchOutcome::RateLimited => {
                    self.stats.rate_limited += 1;
                    self.cool_down().await?;
                }
                FetchOutcome::TransientError(error) => {
                    self.stats.transient_failures += 1;
                    *attempts += 1;
                    self.report_transient(&error);

                    if *attempts > self.config.max_attempts {
                        self.status.report("Exceeded attempts, aborting...");
                        return Err(Error::HarvestExhausted {
                            window: window.to_string(),
                            attempts: *attempts,
                        });
                    }

                    let delay = calculate_backoff(
                        self.config.backoff_type,
                        self.config.retry_delay,
                        self.config.max_backoff,
                        *attempts - 1,
                    );
                    self.shutdown.sleep(delay).await?;
                }
            }
        }
    }

    fn report_transient(&mut self, error: &Error) {
        match error {
            Error::HttpStatus { status, .. } => {
                self.status.report(&format!("Current Status: {status}"));
            }
            other => {
                warn!(error = %other, "Request failed");
                self.status.report(&format!("Request failed: {other}"));
            }
        }
        self.status.report("Processing another request...");
    }

    /// Wait out the rate-limit cooldown, reporting a countdown
    async fn cool_down(&mut self) -> Result<()> {
        let mut remaining = self.config.rate_limit_cooldown;
        if remaining.is_zero() {
            self.status.report("Waiting for API...");
            return Ok(());
        }

        let tick = if self.config.cooldown_tick.is_zero() {
            remaining
        } else {
            self.config.cooldown_tick
        };

        while !remaining.is_zero() {
            self.status
                .report(&format!("Waiting for API... {}s", ceil_secs(remaining)));
            let step = remaining.min(tick);
            self.shutdown.sleep(step).await?;
            remaining -= step;
        }
        Ok(())
    }
}

fn ceil_secs(duration: Duration) -> u64 {
    duration.as_secs() + u64::from(duration.subsec_nanos() > 0)
}
