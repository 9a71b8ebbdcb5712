use crate::error::ScanError;
use crate::fetch::{FetchSettings, Fetcher, fetch_page};
use crate::filter::{Candidate, ScopeFilter, parse_seed};
use crate::logging::DiagnosticLog;
use crate::parsers::LinkParser;
use std::collections::HashSet;
use std::sync::Arc;
use url::Url;

/// Finds the internal links on a seed page.
///
/// Only the seed page itself is fetched. Its anchors are resolved, scoped to
/// the seed's network location, deduplicated and capped.
#[derive(Clone)]
pub struct LinkDiscoverer {
    fetcher: Arc<dyn Fetcher>,
    parser: Arc<dyn LinkParser>,
    settings: FetchSettings,
    log: DiagnosticLog,
}

impl LinkDiscoverer {
    pub fn new(
        fetcher: Arc<dyn Fetcher>,
        parser: Arc<dyn LinkParser>,
        settings: FetchSettings,
        log: DiagnosticLog,
    ) -> Self {
        Self {
            fetcher,
            parser,
            settings,
            log,
        }
    }

    /// Validate `seed` and discover its internal links.
    ///
    /// Only a malformed seed is an error. Fetch failures give an empty list.
    pub async fn discover_str(
        &self,
        seed: &str,
        max_links: usize,
    ) -> Result<Vec<String>, ScanError> {
        let seed = parse_seed(seed)?;
        Ok(self.discover(&seed, max_links).await)
    }

    /// Internal links found on `seed`, in document order, at most `max_links`
    pub async fn discover(&self, seed: &Url, max_links: usize) -> Vec<String> {
        let html = match fetch_page(self.fetcher.as_ref(), seed.as_str(), &self.settings).await {
            Ok(html) => html,
            Err(e) => {
                self.log
                    .error(format_args!("Failed to fetch seed page {}: {}", seed, e));
                return Vec::new();
            }
        };

        let links = self.extract(seed, &html, max_links);
        self.log.info(format_args!(
            "Found {} internal links on {}",
            links.len(),
            seed
        ));
        links
    }

    /// Resolve, scope, deduplicate and cap the anchors of an already fetched page
    pub fn extract(&self, seed: &Url, html: &str, max_links: usize) -> Vec<String> {
        let filter = ScopeFilter::new(seed.clone());
        let mut seen = HashSet::new();
        let mut links = Vec::new();

        let hrefs = self.parser.parse_links(html);
        self.log
            .debug(format_args!("HTML parser found {} links", hrefs.len()));

        for href in hrefs {
            if links.len() >= max_links {
                self.log
                    .debug(format_args!("Reached the limit of {} links", max_links));
                break;
            }

            match filter.classify(&href) {
                Candidate::Internal(url) => {
                    let url = url.to_string();
                    if seen.insert(url.clone()) {
                        links.push(url);
                    }
                }
                Candidate::External(url) => {
                    self.log.debug(format_args!("Skipping external link: {}", url));
                }
                Candidate::Unsupported => {
                    self.log.debug(format_args!("Skipping unsupported href: {:?}", href));
                }
                Candidate::Malformed(reason) => {
                    self.log.debug(format_args!("Skipping malformed href: {}", reason));
                }
            }
        }

        links
    }
}
