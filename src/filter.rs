use crate::error::ScanError;
use std::fmt;
use url::Url;

/// Host plus explicit port of a URL. Scheme, path and credentials are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NetworkLocation {
    host: String,
    port: Option<u16>,
}

impl NetworkLocation {
    /// Network location of an absolute URL, if it has a host
    pub fn of(url: &Url) -> Option<Self> {
        url.host_str().map(|host| Self {
            host: host.to_ascii_lowercase(),
            port: url.port(),
        })
    }
}

impl fmt::Display for NetworkLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.port {
            Some(port) => write!(f, "{}:{}", self.host, port),
            None => write!(f, "{}", self.host),
        }
    }
}

/// Validate a seed address before anything is fetched.
///
/// The address has to spell out `http://` or `https://` and carry a host.
pub fn parse_seed(seed: &str) -> Result<Url, ScanError> {
    let seed = seed.trim();
    if !has_http_scheme(seed) {
        return Err(ScanError::InvalidSeedUrl(format!(
            "{} must start with http:// or https://",
            seed
        )));
    }

    let url = Url::parse(seed).map_err(|e| ScanError::InvalidSeedUrl(format!("{}: {}", seed, e)))?;
    if url.host_str().is_none() {
        return Err(ScanError::InvalidSeedUrl(format!("{} has no host", seed)));
    }
    Ok(url)
}

fn has_http_scheme(candidate: &str) -> bool {
    let lower = candidate
        .get(..8)
        .unwrap_or(candidate)
        .to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

/// Outcome of looking at one raw href
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Candidate {
    /// Absolute URL on the seed's network location
    Internal(Url),
    /// Resolved fine but lives somewhere else
    External(Url),
    /// Not root-relative and not an http(s) URL (mailto:, #top, page.html, ...)
    Unsupported,
    /// Looked like a URL but could not be parsed
    Malformed(String),
}

/// Decides which hrefs on the seed page count as internal links
#[derive(Debug, Clone)]
pub struct ScopeFilter {
    seed: Url,
    location: Option<NetworkLocation>,
}

impl ScopeFilter {
    pub fn new(seed: Url) -> Self {
        let location = NetworkLocation::of(&seed);
        Self { seed, location }
    }

    /// Whether `url` shares the seed's network location
    pub fn is_internal(&self, url: &Url) -> bool {
        match (&self.location, NetworkLocation::of(url)) {
            (Some(seed), Some(other)) => *seed == other,
            _ => false,
        }
    }

    /// Resolve a raw href and classify it.
    ///
    /// Root-relative hrefs are joined onto the seed. Anything else must
    /// already be an absolute http(s) URL.
    pub fn classify(&self, href: &str) -> Candidate {
        let href = href.trim();

        let resolved = if href.starts_with('/') {
            self.seed.join(href)
        } else if has_http_scheme(href) {
            Url::parse(href)
        } else {
            return Candidate::Unsupported;
        };

        match resolved {
            Ok(url) if self.is_internal(&url) => Candidate::Internal(url),
            Ok(url) => Candidate::External(url),
            Err(e) => Candidate::Malformed(format!("{}: {}", href, e)),
        }
    }
}
