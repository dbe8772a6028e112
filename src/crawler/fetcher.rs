//! Resilient page fetcher
//!
//! Performs a GET with bounded retries and exponential backoff, sorting
//! responses into the handful of outcomes the crawl controller cares about.
//! Auth rejections and session expiry are terminal on first sight; everything
//! else transient is retried until the attempt budget runs out.

use reqwest::header::LOCATION;
use reqwest::{Client, StatusCode};
use std::time::Duration;
use url::Url;

/// Default number of GET attempts per URL.
const DEFAULT_RETRIES: u32 = 3;

/// Default base for the exponential backoff between attempts.
const DEFAULT_BACKOFF_BASE: f64 = 1.5;

/// Cap on manually-followed navigation redirects within one attempt.
const MAX_REDIRECT_HOPS: u32 = 5;

/// Result of a fetch operation.
///
/// Absence of a usable response is a value here, not an error: the controller
/// treats all of the non-success variants as reasons to stop the crawl while
/// keeping whatever it already collected.
#[derive(Debug)]
pub enum FetchOutcome {
    /// Got a success response
    Success {
        /// URL of the page actually served, after any followed navigation
        /// redirects
        final_url: Url,
        /// Response body
        body: String,
    },

    /// 401/403-class status: the session is not accepted at all
    AuthRejected { status: StatusCode },

    /// Redirected into the login flow: the session has expired
    SessionExpired,

    /// All attempts used up without a usable response
    Exhausted,
}

/// Outcome of a single attempt, before retry accounting.
enum Attempt {
    Done(FetchOutcome),
    Retry(String),
}

/// GET fetcher with bounded retry and exponential backoff.
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
    retries: u32,
    backoff_base: f64,
}

impl Fetcher {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            retries: DEFAULT_RETRIES,
            backoff_base: DEFAULT_BACKOFF_BASE,
        }
    }

    /// Overrides the attempt budget.
    pub fn with_retries(mut self, retries: u32) -> Self {
        self.retries = retries;
        self
    }

    /// Overrides the backoff base (tests use a near-zero base).
    pub fn with_backoff_base(mut self, base: f64) -> Self {
        self.backoff_base = base;
        self
    }

    /// Fetches a URL, retrying transient failures.
    ///
    /// Retryable: network errors, non-success statuses other than 401/403,
    /// redirect responses without a usable `Location`. The backoff before
    /// attempt `n + 1` is `base^n` seconds, so delays grow 1.5, 2.25, 3.375
    /// for the default base. No sleep follows the final failed attempt.
    pub async fn fetch(&self, url: &Url) -> FetchOutcome {
        for attempt in 1..=self.retries {
            match self.try_once(url).await {
                Attempt::Done(outcome) => return outcome,
                Attempt::Retry(reason) => {
                    tracing::warn!(attempt, url = %url, "Fetch attempt failed: {}", reason);
                    if attempt < self.retries {
                        let delay = self.backoff_base.powi(attempt as i32);
                        tokio::time::sleep(Duration::from_secs_f64(delay.max(0.0))).await;
                    }
                }
            }
        }
        FetchOutcome::Exhausted
    }

    /// One GET, with navigation redirects followed manually.
    ///
    /// The client has redirect-following disabled, so every 3xx is observed
    /// on the resource it was issued for. A redirect into the login flow
    /// means the session expired; any other redirect is ordinary navigation
    /// (the unit-switch endpoint answers with one) and is followed, up to
    /// [`MAX_REDIRECT_HOPS`] hops.
    async fn try_once(&self, url: &Url) -> Attempt {
        let mut current = url.clone();

        for _ in 0..MAX_REDIRECT_HOPS {
            let response = match self.client.get(current.clone()).send().await {
                Ok(r) => r,
                Err(e) => return Attempt::Retry(e.to_string()),
            };

            let status = response.status();

            if status.is_success() {
                let final_url = response.url().clone();
                return match response.text().await {
                    Ok(body) => Attempt::Done(FetchOutcome::Success { final_url, body }),
                    Err(e) => Attempt::Retry(format!("failed to read body: {}", e)),
                };
            }

            if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
                return Attempt::Done(FetchOutcome::AuthRejected { status });
            }

            if status.is_redirection() {
                let target = response
                    .headers()
                    .get(LOCATION)
                    .and_then(|v| v.to_str().ok())
                    .and_then(|loc| current.join(loc).ok());

                match target {
                    Some(t) if is_login_redirect(&current, &t) => {
                        tracing::error!(
                            from = %current,
                            to = %t,
                            "Redirected to login - cookies likely expired"
                        );
                        return Attempt::Done(FetchOutcome::SessionExpired);
                    }
                    Some(t) => {
                        tracing::debug!(from = %current, to = %t, "Following navigation redirect");
                        current = t;
                    }
                    None => {
                        return Attempt::Retry(format!("HTTP {} without usable Location", status))
                    }
                }
                continue;
            }

            return Attempt::Retry(format!("HTTP {}", status));
        }

        Attempt::Retry("too many redirects".to_string())
    }
}

/// A redirect is the login flow when it leaves the directory host (the SSO
/// gateway lives elsewhere) or lands on a path that names a login page.
fn is_login_redirect(from: &Url, to: &Url) -> bool {
    to.host_str() != from.host_str() || to.path().to_ascii_lowercase().contains("login")
}
