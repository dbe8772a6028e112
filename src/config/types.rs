/// Base URL of the directory; all start URLs resolve against it.
pub const BASE_URL: &str = "https://students.yale.edu";

/// Environment variable consulted for the cookie header value.
pub const COOKIE_ENV_VAR: &str = "YFB_COOKIES";

/// Default cookie file looked for when neither a path nor the environment
/// variable supplies cookies.
pub const DEFAULT_COOKIE_FILE: &str = "cookies.txt";

/// Caller-supplied knobs for one crawl invocation.
#[derive(Debug, Clone)]
pub struct CrawlOptions {
    /// Stop after this many pages, if set
    pub max_pages: Option<u32>,

    /// Seconds to sleep between pages; negative values are treated as zero
    pub delay_secs: f64,

    /// Dump each fetched page to debug_page_NNN.html
    pub debug_save: bool,

    /// Log collected lines and chosen major for the first N cards per page
    pub debug_print: usize,
}

impl Default for CrawlOptions {
    fn default() -> Self {
        Self {
            max_pages: None,
            delay_secs: 1.0,
            debug_save: false,
            debug_print: 0,
        }
    }
}
