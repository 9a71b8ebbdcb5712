pub mod html;


/// Pulls raw link targets out of a fetched document.
///
/// Implementations must be permissive: a broken fragment is skipped, never
/// turned into an error for the whole document.
pub trait LinkParser: Send + Sync {
    /// Every hyperlink target in document order, exactly as written
    fn parse_links(&self, document: &str) -> Vec<String>;
}

/// Default parser for HTML pages
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlLinkParser;

impl LinkParser for HtmlLinkParser {
    fn parse_links(&self, document: &str) -> Vec<String> {
        html::parse_links(document)
    }
}
