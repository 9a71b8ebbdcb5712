use std::collections::HashMap;

/// Cached outcome of fetching one URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageContent {
    /// Lower-cased body text
    Fetched(String),
    /// The fetch failed; the page takes no part in matching
    Failed,
}

impl PageContent {
    /// Store a fetched body, lower-casing it once up front
    pub fn fetched(body: &str) -> Self {
        PageContent::Fetched(body.to_lowercase())
    }

    pub fn text(&self) -> Option<&str> {
        match self {
            PageContent::Fetched(text) => Some(text),
            PageContent::Failed => None,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, PageContent::Failed)
    }
}

/// URL to content map for a single matching run.
///
/// Iteration follows insertion order, and the first entry written for a URL
/// is the only one ever kept.
#[derive(Debug, Clone, Default)]
pub struct PageCache {
    entries: Vec<(String, PageContent)>,
    index: HashMap<String, usize>,
}

impl PageCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record content for `url`. Returns false if the URL already has an entry,
    /// in which case the existing entry is left untouched.
    pub fn insert(&mut self, url: impl Into<String>, content: PageContent) -> bool {
        let url = url.into();
        if self.index.contains_key(&url) {
            return false;
        }
        self.index.insert(url.clone(), self.entries.len());
        self.entries.push((url, content));
        true
    }

    pub fn get(&self, url: &str) -> Option<&PageContent> {
        self.index.get(url).map(|&i| &self.entries[i].1)
    }

    /// All entries in population order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &PageContent)> {
        self.entries.iter().map(|(url, content)| (url.as_str(), content))
    }

    /// Successfully fetched pages in population order
    pub fn pages(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .filter_map(|(url, content)| content.text().map(|text| (url.as_str(), text)))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn failed_count(&self) -> usize {
        self.entries.iter().filter(|(_, c)| c.is_failed()).count()
    }
}
