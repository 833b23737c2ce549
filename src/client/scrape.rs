// File: src/client/scrape.rs
//! Flattens the content section of the term-date page into text lines.
use crate::error::ScrapeError;
use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};

static PARAGRAPH: Lazy<Selector> =
    Lazy::new(|| Selector::parse("p").expect("paragraph selector is valid"));

/// Empty lines and lines mentioning any skip word (case-insensitive) are dropped.
pub fn should_skip_line<S: AsRef<str>>(line: &str, skip_words: &[S]) -> bool {
    if line.is_empty() {
        return true;
    }
    let lower = line.to_lowercase();
    skip_words
        .iter()
        .map(|w| w.as_ref().to_lowercase())
        .any(|w| !w.is_empty() && lower.contains(&w))
}

fn find_content_section<'a, S: AsRef<str>>(
    document: &'a Html,
    selectors: &[S],
) -> Option<ElementRef<'a>> {
    selectors.iter().find_map(|raw| {
        let raw = raw.as_ref();
        match Selector::parse(raw) {
            Ok(selector) => document.select(&selector).next(),
            Err(e) => {
                log::warn!("Ignoring invalid content selector '{}': {:?}", raw, e);
                None
            }
        }
    })
}

/// Text of every `<p>` in the first section matching `selectors`, split on
/// line breaks, trimmed and filtered.
///
/// Fails with `NoContent` when none of the selectors match. An empty result
/// is returned as-is; the caller decides whether that is fatal.
pub fn extract_lines<S: AsRef<str>>(
    html: &str,
    selectors: &[S],
    skip_words: &[S],
) -> Result<Vec<String>, ScrapeError> {
    let document = Html::parse_document(html);
    let Some(content) = find_content_section(&document, selectors) else {
        log::warn!("Could not find content section on page");
        return Err(ScrapeError::NoContent(
            "no element matched the content selectors".to_string(),
        ));
    };

    let mut lines = Vec::new();
    for paragraph in content.select(&PARAGRAPH) {
        let text = paragraph.text().collect::<Vec<_>>().join("\n");
        for line in text.split('\n') {
            let line = line.trim();
            if should_skip_line(line, skip_words) {
                continue;
            }
            lines.push(line.to_string());
        }
    }
    log::debug!("Extracted {} line(s) from content section", lines.len());
    Ok(lines)
}
