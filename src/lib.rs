// Re-export modules
pub mod config;
pub mod dom;
pub mod error;
pub mod listing;
pub mod results;
pub mod sink;
pub mod utils;

#[cfg(test)]
mod testing;

// Re-export commonly used types for convenience
pub use config::HarvestConfig;
pub use error::{AdapterError, HarvestError};
pub use results::{HarvestReport, ListingRecord, SettleResult};

use dom::{DomAdapter, WebDriverSession};
use std::path::Path;
use url::Url;

/// Main builder for harvesting listings from one page
pub struct Harvester {
    config: HarvestConfig,
}

impl Harvester {
    /// Create a new Harvester for the given page with default settings
    pub fn new(start_url: &str) -> Self {
        Self {
            config: HarvestConfig::new(start_url),
        }
    }

    /// Replace the whole configuration
    pub fn with_config(mut self, config: HarvestConfig) -> Self {
        self.config = config;
        self
    }

    /// Load configuration from a file; the page given to `new` is kept
    pub fn with_config_file(mut self, path: impl AsRef<Path>) -> Result<Self, HarvestError> {
        let mut config = HarvestConfig::from_file(path)?;
        config.start_url = std::mem::take(&mut self.config.start_url);
        Ok(self.with_config(config))
    }

    /// Set the maximum number of scroll cycles
    pub fn with_max_cycles(mut self, max_cycles: usize) -> Self {
        self.config.settle.max_cycles = max_cycles;
        self
    }

    /// Set the wait after each scroll
    pub fn with_cycle_delay_ms(mut self, delay_ms: u64) -> Self {
        self.config.settle.cycle_delay_ms = delay_ms;
        self
    }

    /// Set how many unchanged readings count as settled
    pub fn with_stability_threshold(mut self, threshold: usize) -> Self {
        self.config.settle.stability_threshold = threshold;
        self
    }

    /// Set how long to wait for the first listing to render
    pub fn with_ready_timeout(mut self, timeout_seconds: u64) -> Self {
        self.config.ready_timeout_secs = timeout_seconds;
        self
    }

    /// Set the WebDriver server URL
    pub fn with_webdriver_url(mut self, webdriver_url: &str) -> Self {
        self.config.webdriver_url = webdriver_url.to_string();
        self
    }

    pub fn config(&self) -> &HarvestConfig {
        &self.config
    }

    /// Open a WebDriver session, load the page, harvest it and close the session
    pub async fn run(self) -> Result<HarvestReport, HarvestError> {
        let mut config = self.config;

        // Override the WebDriver URL with an environment variable if provided
        if let Ok(webdriver_url) = std::env::var("WEBDRIVER_URL") {
            if !webdriver_url.is_empty() {
                config.webdriver_url = webdriver_url;
            }
        }

        let start_url = Url::parse(&config.start_url)?;
        ::log::info!("Harvesting listings from {}", start_url);

        let session = WebDriverSession::connect(&config.webdriver_url).await?;
        if let Err(e) = session.goto(start_url.as_str()).await {
            session.close().await;
            return Err(e);
        }

        let report = listing::harvest(&session, &config).await;
        session.close().await;

        Ok(report)
    }

    /// Harvest through an already open session; the caller keeps ownership
    pub async fn run_with<A: DomAdapter>(&self, adapter: &A) -> HarvestReport {
        listing::harvest(adapter, &self.config).await
    }
}
