//! Directory page parser
//!
//! Given one HTML page, extracts the unit name active on that page, the raw
//! per-entry cards, and the next-page link if any. Everything HTML-shaped is
//! resolved here so the classifier only ever sees plain text lines.

use crate::record::RawCard;
use scraper::{ElementRef, Html, Node, Selector};

/// Sentinel unit name for pages without a selected unit option.
pub const UNKNOWN_UNIT: &str = "Unknown";

/// Everything extracted from one directory page.
#[derive(Debug, Clone)]
pub struct DirectoryPage {
    /// Text of the selected option in the unit-selector control
    pub unit: String,

    /// One raw card per entry container, in document order
    pub cards: Vec<RawCard>,

    /// Raw href of the next-page anchor, a relative reference for the caller
    /// to resolve against the current page URL
    pub next_page: Option<String>,
}

/// Parses one directory page.
pub fn parse_directory_page(html: &str) -> DirectoryPage {
    let document = Html::parse_document(html);

    DirectoryPage {
        unit: extract_unit_name(&document),
        cards: extract_cards(&document),
        next_page: extract_next_page(&document),
    }
}

/// Unit name from the college selector; "Unknown" when absent.
fn extract_unit_name(document: &Html) -> String {
    select_first(document, "#college_select option[selected]")
        .map(element_text)
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| UNKNOWN_UNIT.to_string())
}

/// Next-page anchor via the ordered fallback chain: a "next" link in the
/// pagination container, then one in a generic nav container, then any anchor
/// whose visible text starts with "next" (case-insensitive). The chosen
/// anchor's href is returned only if it actually has one.
fn extract_next_page(document: &Html) -> Option<String> {
    let anchor = select_first(document, "div.next > a")
        .or_else(|| select_first(document, "nav .next a"))
        .or_else(|| find_next_by_text(document));

    anchor.and_then(|a| a.value().attr("href").map(str::to_string))
}

fn find_next_by_text(document: &Html) -> Option<ElementRef<'_>> {
    let sel = Selector::parse("a").ok()?;
    document
        .select(&sel)
        .find(|a| element_text(*a).to_lowercase().starts_with("next"))
}

/// All entry cards on the page, in document order.
fn extract_cards(document: &Html) -> Vec<RawCard> {
    match Selector::parse("div.student_container") {
        Ok(sel) => document.select(&sel).map(parse_card).collect(),
        Err(_) => Vec::new(),
    }
}

/// Extracts one card's name, class year, and free-text lines.
fn parse_card(card: ElementRef<'_>) -> RawCard {
    let name = select_in(card, "div.student_name > h5")
        .map(element_text)
        .filter(|s| !s.is_empty());

    // Year renders as '27 or ’27; strip the quote marker
    let class_year = select_in(card, "div.student_year")
        .map(element_text)
        .map(|s| s.trim_start_matches(['\u{2019}', '\'']).to_string())
        .filter(|s| !s.is_empty());

    let mut lines = Vec::new();
    if let Ok(info_sel) = Selector::parse("div.student_info") {
        for info in card.select(&info_sel) {
            let text = text_with_breaks(info);
            lines.extend(
                text.split('\n')
                    .map(str::trim)
                    .filter(|ln| !ln.is_empty())
                    .map(str::to_string),
            );
        }
    }

    RawCard {
        name,
        class_year,
        lines,
    }
}

/// Element text with embedded `<br>` elements rendered as newlines, so the
/// caller can split an info block back into its visual lines.
fn text_with_breaks(el: ElementRef<'_>) -> String {
    let mut out = String::new();
    for node in el.descendants() {
        match node.value() {
            Node::Text(text) => out.push_str(&text.text),
            Node::Element(e) if e.name() == "br" => out.push('\n'),
            _ => {}
        }
    }
    out
}

/// Trimmed concatenated text of an element.
fn element_text(el: ElementRef<'_>) -> String {
    el.text().collect::<String>().trim().to_string()
}

fn select_first<'a>(document: &'a Html, selector: &str) -> Option<ElementRef<'a>> {
    let sel = Selector::parse(selector).ok()?;
    document.select(&sel).next()
}

fn select_in<'a>(scope: ElementRef<'a>, selector: &str) -> Option<ElementRef<'a>> {
    let sel = Selector::parse(selector).ok()?;
    scope.select(&sel).next()
}
