pub mod cache;
pub mod config;
pub mod crawlers;
pub mod error;
pub mod fetch;
pub mod filter;
pub mod keywords;
pub mod logging;
pub mod matcher;
pub mod parsers;
pub mod results;

// Re-export commonly used types for convenience
pub use config::ScanConfig;
pub use error::{FetchError, ScanError};
pub use fetch::{Fetcher, HttpFetcher};
pub use logging::DiagnosticLog;
pub use results::{KeywordRecord, MatchLocation, ResultRow};

use crawlers::LinkDiscoverer;
use fetch::FetchSettings;
use matcher::KeywordMatcher;
use parsers::{HtmlLinkParser, LinkParser};
use std::path::Path;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Everything a finished scan produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanReport {
    /// Seed URL as it was parsed
    pub seed: String,
    /// Internal links found on the seed page, in the order they were matched
    pub links: Vec<String>,
    /// One record per input keyword, in input order
    pub records: Vec<KeywordRecord>,
}

impl ScanReport {
    pub fn rows(&self) -> Vec<ResultRow> {
        self.records.iter().map(KeywordRecord::to_row).collect()
    }

    pub fn found_count(&self) -> usize {
        self.records.iter().filter(|r| r.is_found()).count()
    }
}

/// Builder for a discover-then-match scan of one website
pub struct Scan {
    config: ScanConfig,
    fetcher: Option<Arc<dyn Fetcher>>,
    parser: Arc<dyn LinkParser>,
    log: DiagnosticLog,
}

impl Default for Scan {
    fn default() -> Self {
        Self::new()
    }
}

impl Scan {
    /// Create a scan with default settings, the HTTP fetcher and the HTML parser
    pub fn new() -> Self {
        Self {
            config: ScanConfig::default(),
            fetcher: None,
            parser: Arc::new(HtmlLinkParser),
            log: DiagnosticLog::global(),
        }
    }

    /// Replace the whole configuration
    pub fn with_config(mut self, config: ScanConfig) -> Self {
        self.config = config;
        self
    }

    /// Load configuration from a JSON file
    pub fn with_config_file(self, path: impl AsRef<Path>) -> error::Result<Self> {
        let config = ScanConfig::from_file(path)?;
        Ok(self.with_config(config))
    }

    /// Load configuration from a JSON string
    pub fn with_config_str(self, json: &str) -> error::Result<Self> {
        let config = ScanConfig::from_json(json)?;
        Ok(self.with_config(config))
    }

    /// Set the maximum number of internal links to check
    pub fn with_max_links(mut self, max_links: usize) -> Self {
        self.config.max_links = max_links;
        self
    }

    /// Set the number of concurrent fetches
    pub fn with_max_concurrency(mut self, max_concurrency: usize) -> Self {
        self.config.max_concurrency = max_concurrency;
        self
    }

    /// Set the per-request timeout
    pub fn with_request_timeout(mut self, timeout_seconds: u64) -> Self {
        self.config.request_timeout_secs = timeout_seconds;
        self
    }

    /// Set the total timeout (maximum runtime of the whole scan)
    pub fn with_total_timeout(mut self, timeout_seconds: u64) -> Self {
        self.config.total_timeout_secs = Some(timeout_seconds);
        self
    }

    /// Set the User-Agent sent with every request
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.config.user_agent = user_agent.into();
        self
    }

    /// Use a custom fetcher instead of the HTTP one
    pub fn with_fetcher(mut self, fetcher: Arc<dyn Fetcher>) -> Self {
        self.fetcher = Some(fetcher);
        self
    }

    /// Use a custom link parser instead of the HTML one
    pub fn with_link_parser(mut self, parser: Arc<dyn LinkParser>) -> Self {
        self.parser = parser;
        self
    }

    /// Send diagnostics to `log` instead of the global logger
    pub fn with_log(mut self, log: DiagnosticLog) -> Self {
        self.log = log;
        self
    }

    pub fn config(&self) -> &ScanConfig {
        &self.config
    }

    /// Run the scan to completion (or until the total timeout, if one is set)
    pub async fn run<S: AsRef<str>>(
        &self,
        seed: &str,
        keywords: &[S],
    ) -> error::Result<ScanReport> {
        self.run_with_cancel(seed, keywords, CancellationToken::new())
            .await
    }

    /// Run the scan, abandoning it as soon as `cancel` fires.
    ///
    /// A cancelled or timed out scan returns an error and no partial
    /// records; fetches still in flight are aborted.
    pub async fn run_with_cancel<S: AsRef<str>>(
        &self,
        seed: &str,
        keywords: &[S],
        cancel: CancellationToken,
    ) -> error::Result<ScanReport> {
        self.config.validate()?;
        let seed = filter::parse_seed(seed)?;

        let fetcher: Arc<dyn Fetcher> = match &self.fetcher {
            Some(fetcher) => Arc::clone(fetcher),
            None => Arc::new(HttpFetcher::new().map_err(ScanError::ClientSetup)?),
        };
        let settings = FetchSettings::from_config(&self.config);

        let discoverer = LinkDiscoverer::new(
            Arc::clone(&fetcher),
            Arc::clone(&self.parser),
            settings.clone(),
            self.log.clone(),
        );
        let matcher = KeywordMatcher::new(fetcher, settings, self.log.clone())
            .with_max_concurrency(self.config.max_concurrency);
        let max_links = self.config.max_links;

        self.log.info(format_args!(
            "Scanning {} for {} keywords",
            seed,
            keywords.len()
        ));

        let work = async {
            let links = discoverer.discover(&seed, max_links).await;
            let records = matcher.check(keywords, &links).await;
            ScanReport {
                seed: seed.to_string(),
                links,
                records,
            }
        };

        let bounded = async {
            match self.config.total_timeout() {
                Some(limit) => tokio::time::timeout(limit, work)
                    .await
                    .map_err(|_| ScanError::TimedOut(limit)),
                None => Ok(work.await),
            }
        };

        let result = tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(ScanError::Cancelled),
            result = bounded => result,
        };

        match &result {
            Ok(report) => self.log.info(format_args!(
                "Scan of {} finished: {} of {} keywords found across {} pages",
                report.seed,
                report.found_count(),
                report.records.len(),
                report.links.len()
            )),
            Err(e) => self.log.warn(format_args!("Scan of {} abandoned: {}", seed, e)),
        }
        self.log.flush();

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::testing::StubFetcher;
    use std::time::Duration;

    const SEED_HTML: &str = r#"<html><body>
        <a href="/shop">Shop</a>
        <a href="/blog">Blog</a>
        <a href="/missing">Missing</a>
        <a href="http://other.com/cats">Elsewhere</a>
    </body></html>"#;

    fn site() -> StubFetcher {
        StubFetcher::new()
            .page("http://example.com/", SEED_HTML)
            .page("http://example.com/shop", "Special offer: cat food")
            .page("http://example.com/blog", "Welcome to our Catalog. Dogs welcome!")
            .status("http://example.com/missing", 404)
            .page("http://other.com/cats", "cat cat cat")
    }

    #[tokio::test]
    async fn test_end_to_end_with_stub() {
        let fetcher = Arc::new(site());
        let scan = Scan::new().with_fetcher(fetcher.clone());

        let report = scan
            .run("http://example.com", &["Cat", "dogs", "catalog", "bird", "cat"])
            .await
            .unwrap();

        assert_eq!(
            report.links,
            vec![
                "http://example.com/shop",
                "http://example.com/blog",
                "http://example.com/missing"
            ]
        );
        let rows: Vec<[String; 4]> = report
            .rows()
            .iter()
            .map(|r| r.columns().map(str::to_string))
            .collect();
        assert_eq!(
            rows,
            vec![
                ["cat", "Yes", "http://example.com/shop", "body"].map(str::to_string),
                ["dogs", "Yes", "http://example.com/blog", "body"].map(str::to_string),
                ["catalog", "Yes", "http://example.com/blog", "body"].map(str::to_string),
                ["bird", "No", "-", "-"].map(str::to_string),
                ["cat", "Yes", "http://example.com/shop", "body"].map(str::to_string),
            ]
        );
        assert_eq!(report.found_count(), 4);
        // External pages are never fetched
        assert_eq!(fetcher.call_count("http://other.com/cats"), 0);
    }

    #[tokio::test]
    async fn test_seed_failure_gives_all_no() {
        let scan = Scan::new().with_fetcher(Arc::new(StubFetcher::new()));
        let report = scan.run("http://example.com", &["a", "b"]).await.unwrap();
        assert!(report.links.is_empty());
        assert_eq!(report.records.len(), 2);
        assert!(report.records.iter().all(|r| !r.is_found()));
    }

    #[tokio::test]
    async fn test_invalid_seed() {
        let fetcher = Arc::new(site());
        let scan = Scan::new().with_fetcher(fetcher.clone());
        let result = scan.run("example.com", &["cat"]).await;
        assert!(matches!(result, Err(ScanError::InvalidSeedUrl(_))));
        assert!(fetcher.calls().is_empty());
    }

    #[tokio::test]
    async fn test_invalid_config() {
        let scan = Scan::new()
            .with_fetcher(Arc::new(site()))
            .with_max_links(0);
        let result = scan.run("http://example.com", &["cat"]).await;
        assert!(matches!(result, Err(ScanError::InvalidConfig(_))));
    }

    #[tokio::test]
    async fn test_max_links_limits_pages_checked() {
        let fetcher = Arc::new(site());
        let scan = Scan::new().with_fetcher(fetcher.clone()).with_max_links(1);
        let report = scan.run("http://example.com", &["dogs"]).await.unwrap();

        assert_eq!(report.links, vec!["http://example.com/shop"]);
        assert!(!report.records[0].is_found());
        assert_eq!(fetcher.call_count("http://example.com/blog"), 0);
    }

    #[tokio::test]
    async fn test_already_cancelled() {
        let fetcher = Arc::new(site());
        let scan = Scan::new().with_fetcher(fetcher.clone());
        let token = CancellationToken::new();
        token.cancel();

        let result = scan
            .run_with_cancel("http://example.com", &["cat"], token)
            .await;
        assert!(matches!(result, Err(ScanError::Cancelled)));
        assert!(fetcher.calls().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_while_fetching() {
        let fetcher = Arc::new(
            StubFetcher::new()
                .page("http://example.com/", r#"<a href="/slow">slow</a>"#)
                .hanging("http://example.com/slow"),
        );
        let scan = Scan::new()
            .with_fetcher(fetcher)
            .with_request_timeout(3600);
        let token = CancellationToken::new();

        let canceller = token.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_secs(1)).await;
            canceller.cancel();
        });

        let result = scan
            .run_with_cancel("http://example.com", &["cat"], token)
            .await;
        assert!(matches!(result, Err(ScanError::Cancelled)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_total_timeout() {
        let fetcher = Arc::new(
            StubFetcher::new()
                .page("http://example.com/", r#"<a href="/slow">slow</a>"#)
                .hanging("http://example.com/slow"),
        );
        let scan = Scan::new()
            .with_fetcher(fetcher)
            .with_request_timeout(3600)
            .with_total_timeout(5);

        let result = scan.run("http://example.com", &["cat"]).await;
        match result {
            Err(ScanError::TimedOut(limit)) => assert_eq!(limit, Duration::from_secs(5)),
            other => panic!("expected timeout, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_custom_link_parser() {
        struct FixedLinks;
        impl LinkParser for FixedLinks {
            fn parse_links(&self, _document: &str) -> Vec<String> {
                vec!["/blog".to_string()]
            }
        }

        let scan = Scan::new()
            .with_fetcher(Arc::new(site()))
            .with_link_parser(Arc::new(FixedLinks));
        let report = scan.run("http://example.com", &["cat"]).await.unwrap();
        assert_eq!(report.links, vec!["http://example.com/blog"]);
        assert!(!report.records[0].is_found());
    }

    #[test]
    fn test_builder_overrides() {
        let scan = Scan::new()
            .with_config_str(r#"{"max_links": 10}"#)
            .unwrap()
            .with_max_concurrency(2)
            .with_user_agent("scout/1.0");
        assert_eq!(scan.config().max_links, 10);
        assert_eq!(scan.config().max_concurrency, 2);
        assert_eq!(scan.config().user_agent, "scout/1.0");
    }
}
