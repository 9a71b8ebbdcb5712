use crate::cache::PageCache;
use crate::crawlers::pool::ContentPool;
use crate::fetch::{FetchSettings, Fetcher};
use crate::logging::DiagnosticLog;
use crate::results::{KeywordRecord, MatchLocation};
use regex::Regex;
use std::sync::Arc;

/// Trim and lower-case a raw keyword
pub fn normalize_keyword(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Literal, boundary-anchored matcher for one normalized keyword.
///
/// The keyword is escaped before compiling, so `c++`, `a.b` or `(sale)` are
/// searched for as plain text. A match must have a non-word character (or the
/// text edge) on each side, where word characters are letters, digits and
/// underscore. That holds whatever the keyword starts or ends with: `c#`
/// matches in "we write c# code" but not in "c#sharp".
#[derive(Debug, Clone)]
pub struct WholeWordMatcher {
    regex: Regex,
}

impl WholeWordMatcher {
    /// Compile a matcher.
    ///
    /// A blank keyword becomes a bare word boundary, so it matches any text
    /// containing at least one word character.
    pub fn compile(keyword: &str) -> Result<Self, regex::Error> {
        let pattern = if keyword.is_empty() {
            r"\b".to_string()
        } else {
            format!(r"(?:^|\W){}(?:\W|$)", regex::escape(keyword))
        };
        let regex = Regex::new(&pattern)?;
        Ok(Self { regex })
    }

    pub fn is_match(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }
}

/// Checks a list of keywords against the pages of a site.
///
/// Pages are fetched once each through a [`ContentPool`], then every keyword
/// is scanned against the cached content in the order the URLs were given.
#[derive(Clone)]
pub struct KeywordMatcher {
    fetcher: Arc<dyn Fetcher>,
    settings: FetchSettings,
    max_concurrency: usize,
    log: DiagnosticLog,
}

impl KeywordMatcher {
    pub fn new(fetcher: Arc<dyn Fetcher>, settings: FetchSettings, log: DiagnosticLog) -> Self {
        Self {
            fetcher,
            settings,
            max_concurrency: 5,
            log,
        }
    }

    /// Set the number of concurrent fetch workers
    pub fn with_max_concurrency(mut self, max_concurrency: usize) -> Self {
        self.max_concurrency = max_concurrency.max(1);
        self
    }

    /// Fetch every URL, then match every keyword. One record per keyword, in
    /// input order.
    pub async fn check<S: AsRef<str>>(
        &self,
        keywords: &[S],
        urls: &[String],
    ) -> Vec<KeywordRecord> {
        let cache = self.acquire(urls).await;
        self.match_cached(keywords, &cache)
    }

    /// Phase 1: fill a cache with one entry per distinct URL
    pub async fn acquire(&self, urls: &[String]) -> PageCache {
        ContentPool::new(
            Arc::clone(&self.fetcher),
            self.settings.clone(),
            self.max_concurrency,
            self.log.clone(),
        )
        .fill(urls)
        .await
    }

    /// Phase 2: match keywords against already cached content
    pub fn match_cached<S: AsRef<str>>(
        &self,
        keywords: &[S],
        cache: &PageCache,
    ) -> Vec<KeywordRecord> {
        keywords
            .iter()
            .map(|raw| self.match_keyword(raw.as_ref(), cache))
            .collect()
    }

    fn match_keyword(&self, raw: &str, cache: &PageCache) -> KeywordRecord {
        let keyword = normalize_keyword(raw);
        self.log.info(format_args!("Checking keyword: {:?}", keyword));

        let matcher = match WholeWordMatcher::compile(&keyword) {
            Ok(matcher) => matcher,
            Err(e) => {
                self.log.error(format_args!(
                    "Could not build matcher for {:?}: {}",
                    keyword, e
                ));
                return KeywordRecord::not_found(keyword);
            }
        };

        match cache.pages().find(|(_, text)| matcher.is_match(text)) {
            Some((url, _)) => {
                self.log.info(format_args!("Found {:?} in {}", keyword, url));
                KeywordRecord::found(keyword, url, MatchLocation::Body)
            }
            None => {
                self.log
                    .info(format_args!("Keyword {:?} not found on any page", keyword));
                KeywordRecord::not_found(keyword)
            }
        }
    }
}
