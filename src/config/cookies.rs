//! Cookie source resolution and cookie-file format sniffing
//!
//! The directory is cookie-authenticated, so the caller has to hand us a
//! session copied out of a browser. That arrives in one of several shapes and
//! from one of several places; this module normalizes all of them into a
//! single `name=value; name=value` header string.

use crate::config::types::{COOKIE_ENV_VAR, DEFAULT_COOKIE_FILE};
use crate::{ConfigError, ConfigResult};
use std::path::Path;

/// Resolves the cookie header string, in order of precedence:
///
/// 1. An explicit `--cookies-file` path
/// 2. The `YFB_COOKIES` environment variable
/// 3. A `cookies.txt` file in the working directory
///
/// # Errors
///
/// Returns [`ConfigError::NoCookieSource`] when none of the three sources is
/// available, and [`ConfigError::EmptyCookieFile`] for a present-but-empty
/// file.
pub fn load_cookie_string(cookies_file: Option<&Path>) -> ConfigResult<String> {
    if let Some(path) = cookies_file {
        return parse_cookie_file(path);
    }

    if let Ok(value) = std::env::var(COOKIE_ENV_VAR) {
        if !value.trim().is_empty() {
            return Ok(value.trim().to_string());
        }
    }

    let default = Path::new(DEFAULT_COOKIE_FILE);
    if default.exists() {
        return parse_cookie_file(default);
    }

    Err(ConfigError::NoCookieSource(COOKIE_ENV_VAR.to_string()))
}

/// Reads a cookie file and sniffs its format.
///
/// Recognized shapes, tried in order:
///
/// 1. A `Cookie: <value>` header line anywhere in the file (case-insensitive)
/// 2. A tab-separated browser export (Netscape format): name and value are
///    the sixth and seventh columns, `#` comment lines skipped
/// 3. Multiple `name=value` lines, joined with `"; "`
///
/// Anything else is returned verbatim (trimmed) and assumed to already be a
/// raw header value.
pub fn parse_cookie_file(path: &Path) -> ConfigResult<String> {
    let text = std::fs::read_to_string(path)?;
    let text = text.trim();
    if text.is_empty() {
        return Err(ConfigError::EmptyCookieFile(path.display().to_string()));
    }
    Ok(sniff_cookie_text(text))
}

/// Applies the format sniffing to already-read file content.
fn sniff_cookie_text(text: &str) -> String {
    // Shape 1: a "Cookie: <value>" header line
    for line in text.lines() {
        let line = line.trim();
        if let Some(rest) = strip_cookie_prefix(line) {
            return rest.trim().to_string();
        }
    }

    // Shape 2: tab-separated browser export
    if text.contains('\t') && text.contains('\n') {
        let mut pairs = Vec::new();
        for line in text.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let parts: Vec<&str> = line.split('\t').collect();
            if parts.len() >= 7 {
                let (name, value) = (parts[5], parts[6]);
                if !name.is_empty() && !value.is_empty() {
                    pairs.push(format!("{}={}", name, value));
                }
            }
        }
        if !pairs.is_empty() {
            return pairs.join("; ");
        }
    }

    // Shape 3: one name=value pair per line
    let lines: Vec<&str> = text.lines().map(str::trim).filter(|ln| !ln.is_empty()).collect();
    if lines.len() > 1 && lines.iter().all(|ln| ln.contains('=')) {
        return lines.join("; ");
    }

    text.to_string()
}

/// Matches a leading `cookie:` label case-insensitively and returns the rest.
fn strip_cookie_prefix(line: &str) -> Option<&str> {
    let (label, rest) = line.split_once(':')?;
    if label.trim().eq_ignore_ascii_case("cookie") {
        Some(rest)
    } else {
        None
    }
}
