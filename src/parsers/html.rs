use scraper::{Html, Selector};
use std::sync::LazyLock;

static ANCHOR_SELECTOR: LazyLock<Option<Selector>> =
    LazyLock::new(|| Selector::parse("a[href]").ok());

/// Parses HTML content and extracts the `href` of every anchor.
///
/// html5ever recovers from broken markup the way browsers do, so unclosed
/// tags or stray brackets only cost the anchors they swallow.
pub fn parse_links(html: &str) -> Vec<String> {
    let Some(selector) = ANCHOR_SELECTOR.as_ref() else {
        return Vec::new();
    };

    let doc = Html::parse_document(html);
    doc.select(selector)
        .filter_map(|e| e.value().attr("href"))
        .map(|s| s.to_string())
        .collect()
}
