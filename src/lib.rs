//! yfb-scrape: a CLI scraper for the Yale student directory card view
//!
//! This crate walks the authenticated, paginated "face book" photo pages,
//! classifies each student card's free-text block into typed fields with
//! heuristics, and writes the accumulated records as CSV.

pub mod classify;
pub mod config;
pub mod crawler;
pub mod output;
pub mod record;

use thiserror::Error;

/// Main error type for yfb-scrape operations
#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
///
/// These are the only errors that abort the process before a crawl starts.
/// Conditions discovered mid-crawl end the loop gracefully instead and keep
/// whatever was already collected.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read cookie file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Cookie file {0} is empty")]
    EmptyCookieFile(String),

    #[error("No cookies provided. Set {0} or pass --cookies-file (or create ./cookies.txt).")]
    NoCookieSource(String),
}

/// Result type alias for yfb-scrape operations
pub type Result<T> = std::result::Result<T, ScrapeError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use classify::{classify, KnownUnits};
pub use config::CrawlOptions;
pub use crawler::{CrawlOutcome, Crawler, FetchOutcome, Fetcher, StopReason};
pub use record::{RawCard, StudentRecord};
