use crate::error::HarvestError;
use crate::listing::extractor::ExtractionRules;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::time::Duration;

/// Page harvested when no URL is given
pub const DEFAULT_START_URL: &str = "https://people.bamboohr.com/careers";

/// Configuration for one harvest run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HarvestConfig {
    /// Page to load and harvest
    #[serde(default = "default_start_url")]
    pub start_url: String,

    /// URL for the WebDriver instance
    #[serde(default = "default_webdriver_url")]
    pub webdriver_url: String,

    /// Where the CSV output is written
    #[serde(default = "default_output_path")]
    pub output_path: String,

    /// How long to wait for the first listing to render
    #[serde(default = "default_ready_timeout_secs")]
    pub ready_timeout_secs: u64,

    /// Selectors whose first match signals that listings have started rendering
    #[serde(default = "default_ready_patterns")]
    pub ready_patterns: Vec<String>,

    /// Scroll-until-stable settings
    #[serde(default)]
    pub settle: SettleConfig,

    /// Selectors for elements that may be listing entries, queried in order
    #[serde(default = "default_candidate_patterns")]
    pub candidate_patterns: Vec<String>,

    /// Title and location fallback chains
    #[serde(default)]
    pub rules: ExtractionRules,
}

/// Settings for the convergence scroller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettleConfig {
    /// Hard upper bound on scroll cycles
    #[serde(default = "default_max_cycles")]
    pub max_cycles: usize,

    /// Wait after each scroll, in milliseconds
    #[serde(default = "default_cycle_delay_ms")]
    pub cycle_delay_ms: u64,

    /// Consecutive unchanged readings needed to call the page settled
    #[serde(default = "default_stability_threshold")]
    pub stability_threshold: usize,
}

impl SettleConfig {
    pub fn cycle_delay(&self) -> Duration {
        Duration::from_millis(self.cycle_delay_ms)
    }
}

impl Default for SettleConfig {
    fn default() -> Self {
        Self {
            max_cycles: default_max_cycles(),
            cycle_delay_ms: default_cycle_delay_ms(),
            stability_threshold: default_stability_threshold(),
        }
    }
}

fn default_start_url() -> String {
    DEFAULT_START_URL.to_string()
}

/// Default value for webdriver_url
fn default_webdriver_url() -> String {
    "http://localhost:4444".to_string()
}

fn default_output_path() -> String {
    "jobs.csv".to_string()
}

fn default_ready_timeout_secs() -> u64 {
    15
}

fn default_ready_patterns() -> Vec<String> {
    vec![
        r#"a[href*="/jobs/"]"#.to_string(),
        r#"a[href*="/careers/"]"#.to_string(),
        r#"[class*="job" i], [data-automation*="job" i]"#.to_string(),
    ]
}

fn default_candidate_patterns() -> Vec<String> {
    vec![
        r#"a[href*="/jobs/"]"#.to_string(),
        r#"a[href*="/careers/"]"#.to_string(),
        r#"a[class*="job" i]"#.to_string(),
        r#"[role="link"][class*="job" i]"#.to_string(),
    ]
}

fn default_max_cycles() -> usize {
    20
}

fn default_cycle_delay_ms() -> u64 {
    1200
}

fn default_stability_threshold() -> usize {
    2
}

impl HarvestConfig {
    /// Create a new configuration with default values
    pub fn new(start_url: &str) -> Self {
        Self {
            start_url: start_url.to_string(),
            webdriver_url: default_webdriver_url(),
            output_path: default_output_path(),
            ready_timeout_secs: default_ready_timeout_secs(),
            ready_patterns: default_ready_patterns(),
            settle: SettleConfig::default(),
            candidate_patterns: default_candidate_patterns(),
            rules: ExtractionRules::default(),
        }
    }

    /// Load configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, HarvestError> {
        let mut file = File::open(path)?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)?;

        Self::from_json(&contents)
    }

    /// Parse configuration from a JSON string
    pub fn from_json(json: &str) -> Result<Self, HarvestError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn ready_timeout(&self) -> Duration {
        Duration::from_secs(self.ready_timeout_secs)
    }
}

impl Default for HarvestConfig {
    fn default() -> Self {
        Self::new(DEFAULT_START_URL)
    }
}
