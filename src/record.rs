//! Data model for directory entries
//!
//! A [`RawCard`] is what the page parser pulls out of one entry's HTML block;
//! a [`StudentRecord`] is what the classifier turns it into.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// One classified directory entry.
///
/// Field order matters: it is the CSV column order. Every field the classifier
/// cannot determine stays `None` rather than an empty string, so "unset" and
/// "matched empty text" remain distinguishable. `source_url` and `scraped_at`
/// are stamped by the crawl controller after classification, never by the
/// classifier itself.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StudentRecord {
    /// Display name from the card's name sub-element
    pub name: Option<String>,

    /// Affiliated residential college; defaults to the page-level unit and is
    /// overridden at most once by a known unit name found on the card
    pub college: Option<String>,

    /// Class year with the leading apostrophe/smart-quote stripped (e.g. "27")
    pub class_year: Option<String>,

    /// Declared field of study, or the literal "Undeclared"
    pub major: Option<String>,

    /// Residual free-text lines joined with "; ", in original order
    pub bio: Option<String>,

    /// Resolved URL of the page this entry was found on
    pub source_url: Option<String>,

    /// UTC timestamp of extraction
    pub scraped_at: Option<DateTime<Utc>>,
}

impl StudentRecord {
    /// Creates a record seeded with the page-level unit name.
    pub fn with_page_unit(page_unit: &str) -> Self {
        Self {
            name: None,
            college: Some(page_unit.to_string()),
            class_year: None,
            major: None,
            bio: None,
            source_url: None,
            scraped_at: None,
        }
    }
}

/// One directory entry's raw content, extracted from its HTML block.
///
/// The name and class-year sub-elements are resolved during page parsing since
/// they are HTML concerns; `lines` is the ordered sequence of non-empty,
/// trimmed free-text lines (with `<br>` collapsed to newlines before
/// splitting) and is the sole input to heuristic classification.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawCard {
    pub name: Option<String>,
    pub class_year: Option<String>,
    pub lines: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_page_unit() {
        let rec = StudentRecord::with_page_unit("Pierson College");
        assert_eq!(rec.college.as_deref(), Some("Pierson College"));
        assert_eq!(rec.name, None);
        assert_eq!(rec.major, None);
        assert_eq!(rec.bio, None);
        assert_eq!(rec.source_url, None);
        assert_eq!(rec.scraped_at, None);
    }
}
