use crate::error::{Result, ScanError};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::time::Duration;

/// Configuration for a keyword scan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanConfig {
    /// Maximum number of internal links kept from the seed page
    #[serde(default = "default_max_links")]
    pub max_links: usize,

    /// Number of fetch workers running at once
    #[serde(default = "default_max_concurrency")]
    pub max_concurrency: usize,

    /// Timeout applied to every single fetch
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Deadline for discovery and matching together (none means no deadline)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_timeout_secs: Option<u64>,

    /// Value sent in the User-Agent header; some servers reject clients without one
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

/// Default value for max_links
fn default_max_links() -> usize {
    100
}

/// Default value for max_concurrency
fn default_max_concurrency() -> usize {
    5
}

/// Default value for request_timeout_secs
fn default_request_timeout_secs() -> u64 {
    10
}

/// Default value for user_agent
fn default_user_agent() -> String {
    "Mozilla/5.0".to_string()
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            max_links: default_max_links(),
            max_concurrency: default_max_concurrency(),
            request_timeout_secs: default_request_timeout_secs(),
            total_timeout_secs: None,
            user_agent: default_user_agent(),
        }
    }
}

impl ScanConfig {
    /// Load configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut file = File::open(path)?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)?;

        Self::from_json(&contents)
    }

    /// Load configuration from a JSON string
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the scan cannot work with
    pub fn validate(&self) -> Result<()> {
        if self.max_links == 0 {
            return Err(ScanError::InvalidConfig(
                "max_links must be at least 1".to_string(),
            ));
        }
        if self.max_concurrency == 0 {
            return Err(ScanError::InvalidConfig(
                "max_concurrency must be at least 1".to_string(),
            ));
        }
        if self.request_timeout_secs == 0 {
            return Err(ScanError::InvalidConfig(
                "request_timeout_secs must be at least 1".to_string(),
            ));
        }
        if self.total_timeout_secs == Some(0) {
            return Err(ScanError::InvalidConfig(
                "total_timeout_secs must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn total_timeout(&self) -> Option<Duration> {
        self.total_timeout_secs.map(Duration::from_secs)
    }
}
