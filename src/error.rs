use thiserror::Error;

/// Errors raised by a DOM adapter while talking to the page
#[derive(Error, Debug, Clone)]
pub enum AdapterError {
    #[error("WebDriver command failed: {0}")]
    Command(String),

    #[error("Script returned a non-numeric value: {0}")]
    NonNumericMetric(String),

    #[error("Invalid probe {probe}: {reason}")]
    InvalidProbe { probe: String, reason: String },

    #[error("Element handle {0} no longer refers to an element")]
    StaleElement(usize),
}

impl From<fantoccini::error::CmdError> for AdapterError {
    fn from(error: fantoccini::error::CmdError) -> Self {
        AdapterError::Command(error.to_string())
    }
}

/// Errors that abort a harvest run
#[derive(Error, Debug)]
pub enum HarvestError {
    #[error("Could not acquire a WebDriver session: {0}")]
    Session(String),

    #[error("Failed to load {url}: {source}")]
    Navigation {
        url: String,
        #[source]
        source: AdapterError,
    },

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid configuration: {0}")]
    Config(#[from] serde_json::Error),

    #[error("Failed to write records: {0}")]
    Csv(#[from] csv::Error),
}

pub type AdapterResult<T> = Result<T, AdapterError>;
