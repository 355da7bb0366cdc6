use std::time::Duration;

use serde::de::DeserializeOwned;
use url::Url;

use crate::types::ViewRequest;
use crate::{
    BackendError, FailureKind, MatchingJobRecord, ScrapeStatusRecord, StartResponse, StatsRecord,
};

pub const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:5001";

const JOBS_PATH: &str = "api/matching/jobs";
const STATS_PATH: &str = "api/stats";
const VIEW_PATH: &str = "api/jobs/view";
const SCRAPE_FULL_PATH: &str = "api/scrape/full";
const SCRAPE_STATUS_PATH: &str = "api/scrape/status";

#[derive(Debug, Clone)]
pub struct BackendSettings {
    pub endpoint: String,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
}

impl Default for BackendSettings {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
        }
    }
}

/// The dashboard's view of the scraping backend.
#[async_trait::async_trait]
pub trait Backend: Send + Sync {
    async fn matching_jobs(&self) -> Result<Vec<MatchingJobRecord>, BackendError>;

    async fn stats(&self) -> Result<StatsRecord, BackendError>;

    async fn mark_viewed(&self, url: &str) -> Result<(), BackendError>;

    async fn start_full_scrape(&self) -> Result<StartResponse, BackendError>;

    async fn scrape_status(&self) -> Result<ScrapeStatusRecord, BackendError>;
}

/// JSON-over-HTTP backend.
#[derive(Debug, Clone)]
pub struct ReqwestBackend {
    base: Url,
    client: reqwest::Client,
}

impl ReqwestBackend {
    pub fn new(settings: &BackendSettings) -> Result<Self, BackendError> {
        let base = parse_base(&settings.endpoint)?;
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| BackendError::new(FailureKind::Network, err.to_string()))?;
        Ok(Self { base, client })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    fn endpoint(&self, path: &str) -> Result<Url, BackendError> {
        self.base
            .join(path)
            .map_err(|err| BackendError::new(FailureKind::InvalidUrl, err.to_string()))
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, BackendError> {
        let response = self
            .client
            .get(self.endpoint(path)?)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        decode(response).await
    }

    async fn send_checked(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<reqwest::Response, BackendError> {
        let response = request.send().await.map_err(map_reqwest_error)?;
        let status = response.status();
        if !status.is_success() {
            return Err(BackendError::new(
                FailureKind::HttpStatus(status.as_u16()),
                status.to_string(),
            ));
        }
        Ok(response)
    }
}

#[async_trait::async_trait]
impl Backend for ReqwestBackend {
    async fn matching_jobs(&self) -> Result<Vec<MatchingJobRecord>, BackendError> {
        self.get_json(JOBS_PATH).await
    }

    async fn stats(&self) -> Result<StatsRecord, BackendError> {
        self.get_json(STATS_PATH).await
    }

    async fn mark_viewed(&self, url: &str) -> Result<(), BackendError> {
        let request = self
            .client
            .post(self.endpoint(VIEW_PATH)?)
            .json(&ViewRequest { url });
        self.send_checked(request).await?;
        Ok(())
    }

    async fn start_full_scrape(&self) -> Result<StartResponse, BackendError> {
        let response = self
            .client
            .post(self.endpoint(SCRAPE_FULL_PATH)?)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        decode(response).await
    }

    async fn scrape_status(&self) -> Result<ScrapeStatusRecord, BackendError> {
        self.get_json(SCRAPE_STATUS_PATH).await
    }
}

/// Parses the endpoint and makes sure relative joins keep any path prefix.
fn parse_base(endpoint: &str) -> Result<Url, BackendError> {
    let mut base = Url::parse(endpoint.trim())
        .map_err(|err| BackendError::new(FailureKind::InvalidUrl, err.to_string()))?;
    if base.cannot_be_a_base() || !matches!(base.scheme(), "http" | "https") {
        return Err(BackendError::new(
            FailureKind::InvalidUrl,
            format!("not an http(s) base url: {endpoint}"),
        ));
    }
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }
    Ok(base)
}

async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, BackendError> {
    let status = response.status();
    if !status.is_success() {
        return Err(BackendError::new(
            FailureKind::HttpStatus(status.as_u16()),
            status.to_string(),
        ));
    }
    let body = response.bytes().await.map_err(map_reqwest_error)?;
    serde_json::from_slice(&body)
        .map_err(|err| BackendError::new(FailureKind::Decode, err.to_string()))
}

fn map_reqwest_error(err: reqwest::Error) -> BackendError {
    if err.is_timeout() {
        return BackendError::new(FailureKind::Timeout, err.to_string());
    }
    if err.is_decode() {
        return BackendError::new(FailureKind::Decode, err.to_string());
    }
    BackendError::new(FailureKind::Network, err.to_string())
}
