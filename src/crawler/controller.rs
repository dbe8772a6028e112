//! Crawl controller
//!
//! Drives fetch → parse → classify across pages, applying the stop conditions
//! and the inter-page delay, and accumulates records. The crawl is strictly
//! sequential: each next-page link comes out of the page just fetched, and the
//! session cookie carries server-side pagination state, so pages must be
//! requested in order.

use crate::classify::{classify, KnownUnits};
use crate::config::CrawlOptions;
use crate::crawler::fetcher::{FetchOutcome, Fetcher};
use crate::crawler::parser::parse_directory_page;
use crate::record::StudentRecord;
use chrono::Utc;
use std::fmt;
use std::time::Duration;
use url::Url;

/// Phases of the crawl state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrawlPhase {
    Start,
    Fetching,
    Parsing,
    Paginating,
    Done,
    Failed,
}

impl CrawlPhase {
    /// Done and Failed are terminal; the controller returns the accumulator
    /// from both.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done | Self::Failed)
    }
}

impl fmt::Display for CrawlPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Start => "start",
            Self::Fetching => "fetching",
            Self::Parsing => "parsing",
            Self::Paginating => "paginating",
            Self::Done => "done",
            Self::Failed => "failed",
        };
        write!(f, "{}", name)
    }
}

/// Why a crawl stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// A page had no next-page link
    EndOfDirectory,

    /// The caller-supplied page ceiling was reached
    PageLimit,

    /// Redirected into the login flow mid-crawl
    SessionExpired,

    /// The directory answered with a 401/403-class status
    AuthRejected,

    /// Retries were exhausted without a usable response
    FetchExhausted,
}

impl StopReason {
    /// The terminal phase this reason maps to.
    pub fn terminal_phase(&self) -> CrawlPhase {
        match self {
            Self::EndOfDirectory | Self::PageLimit => CrawlPhase::Done,
            Self::SessionExpired | Self::AuthRejected | Self::FetchExhausted => CrawlPhase::Failed,
        }
    }

    pub fn is_failure(&self) -> bool {
        self.terminal_phase() == CrawlPhase::Failed
    }
}

/// Result of one crawl invocation.
///
/// `records` is populated on failure too: partial results are intentional,
/// not an error.
#[derive(Debug)]
pub struct CrawlOutcome {
    pub records: Vec<StudentRecord>,
    pub pages: u32,
    pub stop: StopReason,
}

/// Sequential directory crawler.
pub struct Crawler {
    fetcher: Fetcher,
    units: KnownUnits,
    options: CrawlOptions,
}

impl Crawler {
    pub fn new(fetcher: Fetcher, units: KnownUnits, options: CrawlOptions) -> Self {
        Self {
            fetcher,
            units,
            options,
        }
    }

    /// Runs the crawl from a start URL until a terminal phase is reached.
    ///
    /// Stop conditions are evaluated in order after each parsed page: the
    /// page ceiling first, then the absence of a next-page link; otherwise the
    /// next reference is resolved against the current page's URL and the loop
    /// re-enters fetching after the inter-page delay (clamped to
    /// non-negative).
    pub async fn run(&self, start_url: Url) -> CrawlOutcome {
        let mut records: Vec<StudentRecord> = Vec::new();
        let mut pages_scraped: u32 = 0;
        let mut current_url = start_url;
        let mut phase = CrawlPhase::Start;
        tracing::debug!(%phase, url = %current_url, "Crawl starting");

        let stop = loop {
            phase = CrawlPhase::Fetching;
            tracing::info!(%phase, url = %current_url, "Fetching page");

            let (final_url, body) = match self.fetcher.fetch(&current_url).await {
                FetchOutcome::Success { final_url, body } => (final_url, body),
                FetchOutcome::AuthRejected { status } => {
                    tracing::error!(%status, "Directory rejected the session");
                    break StopReason::AuthRejected;
                }
                FetchOutcome::SessionExpired => {
                    tracing::error!("Session expired mid-crawl; keeping partial results");
                    break StopReason::SessionExpired;
                }
                FetchOutcome::Exhausted => {
                    tracing::warn!(url = %current_url, "No usable response after retries");
                    break StopReason::FetchExhausted;
                }
            };

            if self.options.debug_save {
                save_debug_page(pages_scraped, &body);
            }

            phase = CrawlPhase::Parsing;
            let page = parse_directory_page(&body);
            tracing::info!(
                %phase,
                unit = %page.unit,
                cards = page.cards.len(),
                "Parsed page"
            );

            let scraped_at = Utc::now();
            for (idx, card) in page.cards.iter().enumerate() {
                let mut rec = classify(card, &page.unit, &self.units);
                rec.source_url = Some(final_url.to_string());
                rec.scraped_at = Some(scraped_at);
                if idx < self.options.debug_print {
                    tracing::info!(
                        name = ?rec.name,
                        lines = ?card.lines,
                        major = ?rec.major,
                        "card trace"
                    );
                }
                records.push(rec);
            }
            pages_scraped += 1;

            if let Some(max) = self.options.max_pages {
                if pages_scraped >= max {
                    tracing::info!(max_pages = max, "Reached page ceiling");
                    break StopReason::PageLimit;
                }
            }

            let Some(next_rel) = page.next_page else {
                tracing::info!("No further pages found");
                break StopReason::EndOfDirectory;
            };

            phase = CrawlPhase::Paginating;
            match final_url.join(&next_rel) {
                Ok(next_url) => {
                    tracing::debug!(%phase, next = %next_url, "Moving to next page");
                    let delay = self.options.delay_secs.max(0.0);
                    if delay > 0.0 {
                        tokio::time::sleep(Duration::from_secs_f64(delay)).await;
                    }
                    current_url = next_url;
                }
                Err(e) => {
                    tracing::warn!(href = %next_rel, "Next link did not resolve: {}", e);
                    break StopReason::EndOfDirectory;
                }
            }
        };

        phase = stop.terminal_phase();
        tracing::info!(
            %phase,
            pages = pages_scraped,
            records = records.len(),
            "Crawl finished"
        );

        CrawlOutcome {
            records,
            pages: pages_scraped,
            stop,
        }
    }
}

/// Dumps one fetched page for offline inspection.
fn save_debug_page(page_index: u32, body: &str) {
    let path = format!("debug_page_{:03}.html", page_index);
    if let Err(e) = std::fs::write(&path, body) {
        tracing::warn!(path, "Failed to write debug page: {}", e);
    }
}
