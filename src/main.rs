//! yfb-scrape main entry point
//!
//! Command-line interface for scraping the directory card view.

use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use url::Url;
use yfb_scrape::classify::KnownUnits;
use yfb_scrape::config::{load_cookie_string, CrawlOptions, BASE_URL};
use yfb_scrape::crawler::{build_client, Crawler, Fetcher};
use yfb_scrape::output::write_csv;

/// Scrape the student directory card view into a CSV file.
///
/// Authentication is cookie-based: copy a logged-in browser session into a
/// file or the YFB_COOKIES environment variable. An expired session ends the
/// crawl gracefully and whatever was collected is still written.
#[derive(Parser, Debug)]
#[command(name = "yfb-scrape")]
#[command(version, about = "Scrape the student directory card view", long_about = None)]
struct Cli {
    /// Output CSV filename
    #[arg(long, default_value = "students.csv")]
    out: PathBuf,

    /// Residential college to switch to before scraping (e.g. "Pierson College")
    #[arg(long)]
    college: Option<String>,

    /// Start URL (defaults to the first photo page)
    #[arg(long, value_name = "URL")]
    start: Option<String>,

    /// Maximum number of pages to scrape
    #[arg(long)]
    max_pages: Option<u32>,

    /// Delay (seconds) between pages
    #[arg(long, default_value_t = 1.0)]
    delay: f64,

    /// Path to a file containing the Cookie header value
    #[arg(long)]
    cookies_file: Option<PathBuf>,

    /// Save each fetched page to debug_page_NNN.html
    #[arg(long)]
    debug_save: bool,

    /// Log parsed info lines for the first N cards per page
    #[arg(long, default_value_t = 0, value_name = "N")]
    debug_print: usize,

    /// Increase logging verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    // The only process-fatal failure: no cookie source at all
    let cookie_header = match load_cookie_string(cli.cookies_file.as_deref()) {
        Ok(value) => value,
        Err(e) => {
            tracing::error!("{}", e);
            return Err(e.into());
        }
    };

    let start_url = build_start_url(cli.start.as_deref(), cli.college.as_deref())?;
    tracing::info!(url = %start_url, "Starting crawl");

    let client = build_client(&cookie_header)?;
    let options = CrawlOptions {
        max_pages: cli.max_pages,
        delay_secs: cli.delay,
        debug_save: cli.debug_save,
        debug_print: cli.debug_print,
    };
    let crawler = Crawler::new(Fetcher::new(client), KnownUnits::default(), options);

    let outcome = crawler.run(start_url).await;
    if outcome.stop.is_failure() {
        tracing::warn!(
            stop = ?outcome.stop,
            records = outcome.records.len(),
            "Crawl ended early; writing partial results"
        );
    }

    write_csv(&outcome.records, &cli.out)?;
    Ok(())
}

/// Sets up the tracing subscriber based on verbosity level.
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("yfb_scrape=info,warn"),
            1 => EnvFilter::new("yfb_scrape=debug,info"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

/// Resolves the crawl start URL against the directory base.
///
/// An explicit start URL overrides everything; otherwise a college name goes
/// through the unit-switch endpoint (which redirects into that college's
/// first page), and with neither the crawl begins at index zero.
fn build_start_url(start: Option<&str>, college: Option<&str>) -> Result<Url, url::ParseError> {
    let base = Url::parse(BASE_URL)?;

    if let Some(start) = start {
        return base.join(start);
    }

    if let Some(college) = college {
        let mut url = base.join("/facebook/ChangeCollege")?;
        url.query_pairs_mut().append_pair("newOrg", college);
        return Ok(url);
    }

    base.join("/facebook/PhotoPageNew?currentIndex=0")
}
