use clap::Parser;
use std::path::PathBuf;
use yield_listings::HarvestConfig;
use yield_listings::HarvestError;

#[derive(Parser, Debug)]
#[command(name = "yield-listings")]
#[command(about = "Scroll a careers page until it settles and save its job listings as CSV")]
#[command(version)]
pub struct Args {
    /// Page to harvest (defaults to the configured or built-in careers page)
    pub url: Option<String>,

    /// JSON configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// CSV output path
    #[arg(short, long)]
    pub output: Option<String>,

    /// WebDriver server URL
    #[arg(long)]
    pub webdriver_url: Option<String>,

    /// Maximum scroll cycles
    #[arg(long)]
    pub max_cycles: Option<usize>,

    /// Wait after each scroll, in milliseconds
    #[arg(long)]
    pub cycle_delay_ms: Option<u64>,

    /// Unchanged readings needed to consider the page settled
    #[arg(long)]
    pub stability_threshold: Option<usize>,

    /// Seconds to wait for the first listing to render
    #[arg(long)]
    pub ready_timeout: Option<u64>,

    /// Harvest a saved HTML page instead of driving a browser
    #[arg(long)]
    pub html_file: Option<PathBuf>,
}

impl Args {
    /// Build the run configuration: file (or defaults) first, then flags
    pub fn to_config(&self) -> Result<HarvestConfig, HarvestError> {
        let mut config = match &self.config {
            Some(path) => HarvestConfig::from_file(path)?,
            None => HarvestConfig::default(),
        };

        if let Some(url) = &self.url {
            config.start_url = url.clone();
        }
        if let Some(output) = &self.output {
            config.output_path = output.clone();
        }
        if let Some(webdriver_url) = &self.webdriver_url {
            config.webdriver_url = webdriver_url.clone();
        }
        if let Some(max_cycles) = self.max_cycles {
            config.settle.max_cycles = max_cycles;
        }
        if let Some(delay) = self.cycle_delay_ms {
            config.settle.cycle_delay_ms = delay;
        }
        if let Some(threshold) = self.stability_threshold {
            config.settle.stability_threshold = threshold;
        }
        if let Some(timeout) = self.ready_timeout {
            config.ready_timeout_secs = timeout;
        }

        Ok(config)
    }
}
