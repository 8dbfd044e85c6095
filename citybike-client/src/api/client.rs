//! Journeys API HTTP client.
//!
//! Provides async methods for every backend endpoint the client uses.
//! Handles status mapping, JSON decoding and conversion to domain types.

use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;
use tokio::sync::Semaphore;
use tracing::{debug, trace};

use crate::domain::{Journey, MonthSelection, Station, StationKey};
use crate::journeys::{SortOrder, journeys_path};

use super::backend::{Backend, Direction};
use super::error::ApiError;
use super::types::{ExceptionInfo, JourneyDto, StationDto};

/// Default base URL for the journeys API.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080/api";

/// Default maximum concurrent requests.
const DEFAULT_MAX_CONCURRENT: usize = 5;

/// Configuration for the API client.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Base URL for the API, without the trailing slash
    pub base_url: String,
    /// Maximum concurrent requests
    pub max_concurrent: usize,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl ApiConfig {
    /// Create a new config pointing at the given base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            max_concurrent: DEFAULT_MAX_CONCURRENT,
            timeout_secs: 30,
        }
    }

    /// Set a custom base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set maximum concurrent requests.
    pub fn with_max_concurrent(mut self, n: usize) -> Self {
        self.max_concurrent = n;
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

/// Journeys API client.
///
/// Cheap to clone; clones share the connection pool and the concurrency
/// limit.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    semaphore: Arc<Semaphore>,
}

impl ApiClient {
    /// Create a new API client with the given configuration.
    pub fn new(config: ApiConfig) -> Result<Self, ApiError> {
        if config.max_concurrent == 0 {
            return Err(ApiError::invalid_input("max_concurrent must be at least 1"));
        }

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            semaphore: Arc::new(Semaphore::new(config.max_concurrent)),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    /// GET `path` and return the raw body of a successful response.
    async fn get_body(&self, path: &str, months: Option<&MonthSelection>) -> Result<String, ApiError> {
        let _permit = self
            .semaphore
            .acquire()
            .await
            .map_err(|_| ApiError::Api {
                status: 0,
                message: "Semaphore closed".to_string(),
            })?;

        let url = self.url(path);
        let params: Vec<(&str, u8)> = months
            .map(|m| m.numbers().into_iter().map(|n| ("selectedMonths", n)).collect())
            .unwrap_or_default();

        debug!(%url, ?params, "GET");

        let response = self.http.get(&url).query(&params).send().await?;
        let status = response.status();

        if status == reqwest::StatusCode::NOT_FOUND {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::NotFound {
                message: exception_message(&body),
            });
        }

        if status == reqwest::StatusCode::BAD_REQUEST {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::InvalidInput {
                message: exception_message(&body),
            });
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let body = response.text().await?;
        trace!(%url, bytes = body.len(), "response");
        Ok(body)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        months: Option<&MonthSelection>,
    ) -> Result<T, ApiError> {
        let body = self.get_body(path, months).await?;
        decode(&body)
    }
}

/// Pull the message out of an `ExceptionInfo` body, or fall back to the
/// raw body.
fn exception_message(body: &str) -> String {
    serde_json::from_str::<ExceptionInfo>(body)
        .map(|info| info.exception_info)
        .unwrap_or_else(|_| body.to_string())
}

fn decode<T: DeserializeOwned>(body: &str) -> Result<T, ApiError> {
    serde_json::from_str(body).map_err(|e| ApiError::Json {
        message: e.to_string(),
        body: Some(body.chars().take(500).collect()),
    })
}

fn station_path(key: StationKey, rest: &str) -> String {
    format!("stations/{}/{}", key, rest)
}

impl Backend for ApiClient {
    async fn journeys_count(&self) -> Result<u64, ApiError> {
        self.get_json("journeysCount/", None).await
    }

    async fn journeys(
        &self,
        sort: Option<SortOrder>,
        months: &MonthSelection,
    ) -> Result<Vec<Journey>, ApiError> {
        let dtos: Vec<JourneyDto> = self.get_json(&journeys_path(sort), Some(months)).await?;
        Ok(dtos.into_iter().map(Journey::from).collect())
    }

    async fn journey(&self, id: u64) -> Result<Journey, ApiError> {
        let dto: JourneyDto = self.get_json(&format!("journeys/{}/", id), None).await?;
        Ok(dto.into())
    }

    async fn stations(&self) -> Result<Vec<Station>, ApiError> {
        let body = self.get_body("stations/", None).await?;

        // An empty station table comes back as an empty 200 body
        if body.trim().is_empty() {
            return Ok(Vec::new());
        }

        let dtos: Vec<StationDto> = decode(&body)?;
        Ok(dtos.into_iter().map(Station::from).collect())
    }

    async fn station(&self, key: StationKey) -> Result<Station, ApiError> {
        let dto: StationDto = self.get_json(&station_path(key, ""), None).await?;
        Ok(dto.into())
    }

    async fn total_journeys(
        &self,
        key: StationKey,
        direction: Direction,
        months: &MonthSelection,
    ) -> Result<u64, ApiError> {
        self.get_json(&station_path(key, direction.total_path()), Some(months))
            .await
    }

    async fn average_distance(
        &self,
        key: StationKey,
        direction: Direction,
        months: &MonthSelection,
    ) -> Result<f64, ApiError> {
        self.get_json(&station_path(key, direction.average_path()), Some(months))
            .await
    }

    async fn top5_stations(
        &self,
        key: StationKey,
        direction: Direction,
        months: &MonthSelection,
    ) -> Result<Vec<Station>, ApiError> {
        let dtos: Vec<StationDto> = self
            .get_json(&station_path(key, direction.top5_path()), Some(months))
            .await?;
        Ok(dtos.into_iter().map(Station::from).collect())
    }
}
