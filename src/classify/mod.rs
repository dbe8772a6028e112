//! Heuristic card classifier
//!
//! This module turns one card's unstructured free-text lines into typed
//! fields. The rules are best-effort: the directory gives no structural
//! guarantees for the info block, so every field the rules cannot pin down is
//! simply left unset. Classification never fails.

mod units;

pub use units::{KnownUnits, DEFAULT_UNIT_NAMES};

use crate::record::{RawCard, StudentRecord};
use regex::Regex;
use std::sync::LazyLock;

/// Three-letter month abbreviations used by the birthday heuristic.
/// Matching is case-sensitive, as the directory prints them.
const MONTH_ABBREVS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Subject-area keyword fragments, matched case-insensitively as substrings.
static SUBJECT_KEYWORDS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"(?i)(engineering|science|studies|econom|biology|bio|math|mathematics|history|english|",
        r"psychology|sociology|philosophy|political|global|chemical|electrical|mechanical|civil|",
        r"applied|neuro|physics|chemistry|art|architecture|music|theater|theatre|film|media|stat|",
        r"statistics|computer|cs\b|finance|anthropology|linguistics|literature|german|french|spanish|",
        r"italian|portuguese|russian|slav|judaic|hebrew|korean|japanese|chinese|latin|greek|classics|",
        r"environment|earth|geology|astronomy|religion|history of|east|afric|american|asian)",
    ))
    .expect("subject keyword pattern is valid")
});

/// Generic shape of a plausible freeform subject name: 3+ characters of
/// letters, commas, ampersands, apostrophes, spaces, and hyphens.
static SUBJECT_SHAPE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z,&' \-]{3,}$").expect("subject shape pattern is valid")
});

/// What a matched major rule produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MajorOutcome {
    /// The major becomes a fixed literal value
    Literal(&'static str),

    /// The major becomes the matched line's own text
    LineText,
}

/// One entry in the ordered major-selection rule table.
///
/// Rules are tried in table order against each candidate line; the first rule
/// that matches decides the outcome for that line.
pub struct MajorRule {
    pub name: &'static str,
    pub matches: fn(&str) -> bool,
    pub outcome: MajorOutcome,
}

/// The ordered rule table for major selection.
///
/// The sentinel rule comes first so a literal "undeclared" line is never
/// mistaken for a freeform subject name by the later rules.
pub const MAJOR_RULES: &[MajorRule] = &[
    MajorRule {
        name: "undeclared-sentinel",
        matches: is_undeclared,
        outcome: MajorOutcome::Literal("Undeclared"),
    },
    MajorRule {
        name: "subject-keyword",
        matches: has_subject_keyword,
        outcome: MajorOutcome::LineText,
    },
    MajorRule {
        name: "freeform-subject",
        matches: is_plausible_subject,
        outcome: MajorOutcome::LineText,
    },
];

/// Case-insensitive equality with the "undeclared" sentinel.
pub fn is_undeclared(line: &str) -> bool {
    line.eq_ignore_ascii_case("undeclared")
}

/// True if the line contains any known subject-area keyword fragment.
pub fn has_subject_keyword(line: &str) -> bool {
    SUBJECT_KEYWORDS.is_match(line)
}

/// True if the whole line has the generic shape of a subject name.
pub fn is_plausible_subject(line: &str) -> bool {
    SUBJECT_SHAPE.is_match(line)
}

/// Birthday heuristic: periods stripped, the first whitespace token's first
/// three characters must match a month abbreviation exactly.
fn looks_like_birthday(line: &str) -> bool {
    let cleaned = line.replace('.', "");
    match cleaned.split_whitespace().next() {
        Some(first) => {
            let prefix: String = first.chars().take(3).collect();
            MONTH_ABBREVS.contains(&prefix.as_str())
        }
        None => false,
    }
}

/// Address heuristic: any digit, or a slash (room/entryway notation).
fn looks_like_address(line: &str) -> bool {
    line.chars().any(|c| c.is_ascii_digit()) || line.contains('/')
}

/// Classifies one card against the page-level unit name.
///
/// This is a pure function of its inputs: identical card, unit, and unit set
/// always produce the identical record. `source_url` and `scraped_at` are left
/// unset for the caller to stamp.
///
/// The steps run in a fixed order because later steps only see lines the
/// earlier steps left behind:
///
/// 1. Seed the record with the page unit and the card's name/year.
/// 2. Return early if the card has no free-text lines.
/// 3. Remove the first line that exactly matches a known unit name and make it
///    the college (at most one override).
/// 4. Drop a trailing line that looks like a birthday.
/// 5. Pick the major by scanning non-address, non-unit candidates in reverse
///    order through [`MAJOR_RULES`] — the declared subject tends to sit near
///    the end of the block, after address-like lines.
/// 6. Everything left over, minus lines equal to the chosen major, becomes the
///    bio, joined with `"; "` in original order.
pub fn classify(card: &RawCard, page_unit: &str, units: &KnownUnits) -> StudentRecord {
    let mut rec = StudentRecord::with_page_unit(page_unit);
    rec.name = card.name.clone();
    rec.class_year = card.class_year.clone();

    if card.lines.is_empty() {
        return rec;
    }

    let (college_override, lines) = take_unit_line(&card.lines, units);
    if let Some(college) = college_override {
        rec.college = Some(college);
    }
    let lines = drop_trailing_birthday(lines);

    let major = select_major(&lines, units);

    let bio_lines: Vec<&str> = lines
        .iter()
        .map(String::as_str)
        .filter(|ln| major.as_deref() != Some(*ln))
        .collect();
    rec.bio = if bio_lines.is_empty() {
        None
    } else {
        Some(bio_lines.join("; "))
    };
    rec.major = major;

    rec
}

/// Removes the first line matching a known unit name, returning it alongside
/// the remaining lines in their original order.
fn take_unit_line(lines: &[String], units: &KnownUnits) -> (Option<String>, Vec<String>) {
    match lines.iter().position(|ln| units.contains(ln)) {
        Some(idx) => {
            let mut rest = lines.to_vec();
            let unit = rest.remove(idx);
            (Some(unit), rest)
        }
        None => (None, lines.to_vec()),
    }
}

/// Drops the last line if it looks like a birthday marker.
fn drop_trailing_birthday(mut lines: Vec<String>) -> Vec<String> {
    if lines.last().is_some_and(|ln| looks_like_birthday(ln)) {
        lines.pop();
    }
    lines
}

/// Selects the major from the post-override, post-birthday line sequence.
///
/// Candidates are the lines that are neither address-like nor unit names.
/// They are scanned last-to-first, and for each candidate the rules in
/// [`MAJOR_RULES`] are tried in order; the first hit wins.
pub fn select_major(lines: &[String], units: &KnownUnits) -> Option<String> {
    let candidates: Vec<&str> = lines
        .iter()
        .map(String::as_str)
        .filter(|ln| !looks_like_address(ln) && !units.contains(ln))
        .collect();

    for line in candidates.into_iter().rev() {
        for rule in MAJOR_RULES {
            if (rule.matches)(line) {
                tracing::trace!(rule = rule.name, line, "major rule matched");
                return Some(match rule.outcome {
                    MajorOutcome::Literal(text) => text.to_string(),
                    MajorOutcome::LineText => line.to_string(),
                });
            }
        }
    }

    None
}
