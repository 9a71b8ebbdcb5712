use crate::config::ScanConfig;
use crate::error::FetchError;
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

/// A single outbound GET
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    pub url: String,
    pub timeout: Duration,
    pub headers: Vec<(String, String)>,
}

/// What came back, whatever the status
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchResponse {
    pub status: u16,
    pub body: String,
}

impl FetchResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Page-fetch capability shared by the discoverer and the matcher.
///
/// Implementations only report transport failures as errors. Turning a
/// non-success status into a failure is done by [`fetch_page`].
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, request: &FetchRequest) -> Result<FetchResponse, FetchError>;
}

/// Fetcher backed by a pooled reqwest client
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new() -> Result<Self, FetchError> {
        let client = Client::builder()
            .redirect(reqwest::redirect::Policy::limited(5))
            .pool_idle_timeout(Duration::from_secs(90))
            .build()?;

        Ok(Self { client })
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, request: &FetchRequest) -> Result<FetchResponse, FetchError> {
        let mut builder = self.client.get(&request.url).timeout(request.timeout);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        let response = builder
            .send()
            .await
            .map_err(|e| classify(e, request))?;
        let status = response.status().as_u16();
        let body = response.text().await.map_err(|e| classify(e, request))?;

        Ok(FetchResponse { status, body })
    }
}

fn classify(error: reqwest::Error, request: &FetchRequest) -> FetchError {
    if error.is_timeout() {
        FetchError::Timeout {
            url: request.url.clone(),
            timeout: request.timeout,
        }
    } else {
        FetchError::Http(error)
    }
}

/// Timeout and identifying header used for every fetch in a scan
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchSettings {
    pub timeout: Duration,
    pub user_agent: String,
}

impl FetchSettings {
    pub fn new(timeout: Duration, user_agent: impl Into<String>) -> Self {
        Self {
            timeout,
            user_agent: user_agent.into(),
        }
    }

    pub fn from_config(config: &ScanConfig) -> Self {
        Self::new(config.request_timeout(), config.user_agent.clone())
    }

    pub fn request(&self, url: &str) -> FetchRequest {
        FetchRequest {
            url: url.to_string(),
            timeout: self.timeout,
            headers: vec![("User-Agent".to_string(), self.user_agent.clone())],
        }
    }
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self::from_config(&ScanConfig::default())
    }
}

/// Fetch `url` and return its body, treating any non-2xx status as a failure.
///
/// The timeout is enforced here as well so a fetcher that ignores
/// [`FetchRequest::timeout`] still cannot stall a worker.
pub async fn fetch_page(
    fetcher: &dyn Fetcher,
    url: &str,
    settings: &FetchSettings,
) -> Result<String, FetchError> {
    let request = settings.request(url);
    let response = match tokio::time::timeout(settings.timeout, fetcher.fetch(&request)).await {
        Ok(result) => result?,
        Err(_) => {
            return Err(FetchError::Timeout {
                url: url.to_string(),
                timeout: settings.timeout,
            });
        }
    };

    if !response.is_success() {
        return Err(FetchError::Status {
            url: url.to_string(),
            status: response.status,
        });
    }

    Ok(response.body)
}
