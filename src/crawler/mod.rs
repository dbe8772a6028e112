//! Crawler module for directory fetching and pagination
//!
//! This module contains the networked half of the scraper:
//! - Building the cookie-carrying HTTP client
//! - Fetching with retry and backoff
//! - Page-level HTML extraction
//! - Crawl orchestration and stop conditions

mod client;
mod controller;
mod fetcher;
mod parser;

pub use client::build_client;
pub use controller::{CrawlOutcome, CrawlPhase, Crawler, StopReason};
pub use fetcher::{FetchOutcome, Fetcher};
pub use parser::{parse_directory_page, DirectoryPage, UNKNOWN_UNIT};
