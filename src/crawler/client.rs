//! Authenticated HTTP client factory
//!
//! The directory accepts a browser session, so the client carries the
//! caller's cookie header on every request plus a desktop browser identity.
//! Cookie freshness is not validated here; a stale session surfaces later as
//! an auth failure during fetching.

use reqwest::header::{HeaderMap, HeaderValue, COOKIE};
use reqwest::{redirect::Policy, Client};
use std::time::Duration;

/// Fixed desktop browser identity sent with every request.
const USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/121.0.0.0 Safari/537.36";

/// Per-request timeout.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(20);

/// Builds an HTTP client carrying the supplied cookie header value.
///
/// Redirect following is disabled so the fetcher can observe a 302 on the
/// originally-requested resource directly — that status is how an expired
/// session announces itself, and auto-following would consume it before we
/// could tell it apart from ordinary navigation.
pub fn build_client(cookie_header: &str) -> reqwest::Result<Client> {
    let mut headers = HeaderMap::new();
    if let Ok(value) = HeaderValue::from_str(cookie_header.trim()) {
        headers.insert(COOKIE, value);
    }

    Client::builder()
        .user_agent(USER_AGENT)
        .default_headers(headers)
        .timeout(REQUEST_TIMEOUT)
        .redirect(Policy::none())
        .gzip(true)
        .brotli(true)
        .build()
}
