use crate::error::{Result, ScanError};
use crate::extract::{ExtractionRequest, ExtractionResponse, Extractor};
use futures::future::BoxFuture;
use reqwest::Client;
use serde::Deserialize;
use std::time::{Duration, Instant};
use tracing::debug;
use url::Url;

pub const DEFAULT_API_BASE: &str = "https://api.jigsawstack.com";
const SCRAPE_PATH: &str = "v1/ai/scrape";

/// Credentials and endpoint of the extraction service.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub api_key: String,
    pub base_url: String,
    pub timeout_secs: u64,
}

impl ClientConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_API_BASE.to_string(),
            timeout_secs: 60,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }
}

#[derive(Debug, Deserialize)]
struct ScrapeEnvelope {
    #[serde(default = "default_success")]
    success: bool,
    #[serde(default)]
    message: Option<String>,
    #[serde(flatten)]
    body: ExtractionResponse,
}

fn default_success() -> bool {
    true
}

/// Extraction service client over HTTPS.
#[derive(Debug, Clone)]
pub struct ScrapeClient {
    client: Client,
    endpoint: Url,
    api_key: String,
}

impl ScrapeClient {
    pub fn new(config: ClientConfig) -> Result<Self> {
        if config.api_key.trim().is_empty() {
            return Err(ScanError::ConfigError("API key must not be empty".to_string()));
        }

        // join() replaces the last segment unless the base ends with '/'
        let mut base = config.base_url.clone();
        if !base.ends_with('/') {
            base.push('/');
        }
        let endpoint = Url::parse(&base)
            .and_then(|u| u.join(SCRAPE_PATH))
            .map_err(|e| ScanError::InvalidUrl(format!("{}: {}", config.base_url, e)))?;

        let client = Client::builder()
            .user_agent(concat!("wikigraph/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs((config.timeout_secs / 2).max(1)))
            .build()?;

        Ok(Self {
            client,
            endpoint,
            api_key: config.api_key,
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    async fn scrape(&self, request: &ExtractionRequest) -> Result<ExtractionResponse> {
        debug!("Extracting {} via {}", request.url, self.endpoint);

        let start = Instant::now();
        let response = self
            .client
            .post(self.endpoint.clone())
            .header("x-api-key", &self.api_key)
            .json(request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        debug!("Extraction of {} answered {} in {:?}", request.url, status, start.elapsed());

        if !status.is_success() {
            return Err(ScanError::ExtractionError(format!(
                "HTTP {} for {}: {}",
                status.as_u16(),
                request.url,
                body.trim()
            )));
        }

        let envelope: ScrapeEnvelope = serde_json::from_str(&body)?;
        if !envelope.success {
            return Err(ScanError::ExtractionError(
                envelope
                    .message
                    .unwrap_or_else(|| format!("service reported failure for {}", request.url)),
            ));
        }

        Ok(envelope.body)
    }
}

impl Extractor for ScrapeClient {
    fn extract<'a>(
        &'a self,
        request: &'a ExtractionRequest,
    ) -> BoxFuture<'a, Result<ExtractionResponse>> {
        Box::pin(self.scrape(request))
    }
}
