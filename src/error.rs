//! Error types for the scanner.
//!
//! Nothing here is fatal to the process except [`ConfigError`], which is only
//! raised while loading startup configuration.

use thiserror::Error;

/// Failure to acquire market data for one instrument or the universe.
#[derive(Error, Debug)]
pub enum MarketDataError {
    #[error("request timed out: {0}")]
    Timeout(String),

    #[error("exchange API error {code}: {msg}")]
    Api { code: String, msg: String },

    #[error("unexpected HTTP status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("malformed market data: {0}")]
    Malformed(String),

    #[error(transparent)]
    Http(reqwest::Error),
}

impl From<reqwest::Error> for MarketDataError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            MarketDataError::Timeout(e.to_string())
        } else {
            MarketDataError::Http(e)
        }
    }
}

impl MarketDataError {
    /// Whether retrying the same request could plausibly succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            MarketDataError::Timeout(_) => true,
            MarketDataError::Http(e) => e.is_connect() || e.is_request(),
            MarketDataError::Status { status, .. } => *status == 429 || *status >= 500,
            MarketDataError::Api { .. } | MarketDataError::Malformed(_) => false,
        }
    }
}

/// Per-instrument evaluation failure. Caught at the engine boundary.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("market data: {0}")]
    Acquisition(#[from] MarketDataError),

    #[error("malformed bars: {0}")]
    MalformedBars(String),

    #[error("invalid classifier input: {0}")]
    ClassificationInput(String),
}

/// Alert delivery failure. Logged, never retried.
#[derive(Error, Debug)]
pub enum NotifyError {
    #[error("notifier rejected message with status {status}: {body}")]
    Rejected { status: u16, body: String },

    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

/// Startup configuration failure.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    Missing(&'static str),

    #[error("invalid value {value:?} for {key}: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}
