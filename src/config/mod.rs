//! Configuration for a crawl invocation
//!
//! Everything here is thin: the CLI supplies the knobs, and the cookie module
//! turns whichever cookie source the caller has into a single header value.

mod cookies;
mod types;

pub use cookies::{load_cookie_string, parse_cookie_file};
pub use types::{CrawlOptions, BASE_URL, COOKIE_ENV_VAR, DEFAULT_COOKIE_FILE};
