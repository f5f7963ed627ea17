#[cfg(test)]
mod tests;

use scraper::{ElementRef, Html, Selector};
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use tracing::debug;

/// Maximum number of characters kept in [`PageSummary::excerpt`]
pub const EXCERPT_MAX_CHARS: usize = 4000;

static TITLE_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("title").expect("valid selector"));
static META_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("meta").expect("valid selector"));
static H1_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("h1").expect("valid selector"));
static H2_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("h2").expect("valid selector"));
static PARAGRAPH_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("p").expect("valid selector"));

/// SEO-relevant fields extracted from a single HTML document
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageSummary {
    /// Text of the first `<title>`, trimmed
    pub title: String,
    /// `content` of the first `<meta name="description">`
    pub meta_description: String,
    /// Trimmed text of every `<h1>`, in document order
    pub headings_h1: Vec<String>,
    /// Trimmed text of every `<h2>`, in document order
    pub headings_h2: Vec<String>,
    /// Whitespace-separated tokens across all paragraph text (before truncation)
    pub word_count: usize,
    /// Paragraph text truncated to [`EXCERPT_MAX_CHARS`] characters
    pub excerpt: String,
}

/// Extract a [`PageSummary`] from an HTML document.
///
/// The parser is lenient, so malformed markup never fails; anything that
/// cannot be found is left empty.
#[inline]
pub fn extract_summary(html: &str) -> PageSummary {
    let document = Html::parse_document(html);

    let title = document
        .select(&TITLE_SELECTOR)
        .next()
        .map(|title| element_text(title).trim().to_string())
        .unwrap_or_default();

    let meta_description = extract_meta_description(&document);
    let headings_h1 = collect_headings(&document, &H1_SELECTOR);
    let headings_h2 = collect_headings(&document, &H2_SELECTOR);

    let text = paragraph_text(&document);
    let word_count = text.split_whitespace().count();
    let excerpt = truncate_chars(&text, EXCERPT_MAX_CHARS);

    debug!(
        "Extracted summary: title='{}', {} h1, {} h2, {} words, {} excerpt chars",
        title,
        headings_h1.len(),
        headings_h2.len(),
        word_count,
        excerpt.chars().count()
    );

    PageSummary {
        title,
        meta_description,
        headings_h1,
        headings_h2,
        word_count,
        excerpt,
    }
}

/// The first `meta` element named exactly "description" wins, even when it has no content
fn extract_meta_description(document: &Html) -> String {
    document
        .select(&META_SELECTOR)
        .find(|meta| meta.value().attr("name") == Some("description"))
        .and_then(|meta| meta.value().attr("content"))
        .map(|content| content.trim().to_string())
        .unwrap_or_default()
}

fn collect_headings(document: &Html, selector: &Selector) -> Vec<String> {
    document
        .select(selector)
        .map(|heading| element_text(heading).trim().to_string())
        .collect()
}

/// All paragraph text joined by single spaces, with whitespace inside each
/// paragraph collapsed. Paragraphs without text are skipped.
fn paragraph_text(document: &Html) -> String {
    let mut text = String::new();

    for paragraph in document.select(&PARAGRAPH_SELECTOR) {
        let mut words = paragraph.text().flat_map(str::split_whitespace).peekable();
        if words.peek().is_none() {
            continue;
        }

        if !text.is_empty() {
            text.push(' ');
        }
        for (i, word) in words.enumerate() {
            if i > 0 {
                text.push(' ');
            }
            text.push_str(word);
        }
    }

    text
}

fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect()
}

fn truncate_chars(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}
