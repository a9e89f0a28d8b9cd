use std::time::Duration;

use async_trait::async_trait;
use reqwest::Url;
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

use crate::model::{DashboardStats, Device, FilterOptions};
use crate::state::DeviceQuery;

pub const FILTERS_PATH: &str = "/api/filters";
pub const DEVICES_PATH: &str = "/api/devices/paginated";
pub const STATS_PATH: &str = "/api/dashboard-stats";

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("invalid base URL: {url}: {message}")]
    InvalidBaseUrl { url: String, message: String },

    #[error("failed to build HTTP client: {source}")]
    HttpClientBuild {
        #[source]
        source: reqwest::Error,
    },

    #[error("request to {endpoint} failed: {source}")]
    Transport {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{endpoint} returned HTTP {status}")]
    Status { endpoint: String, status: u16 },

    #[error("invalid JSON from {endpoint}: {source}")]
    Decode {
        endpoint: String,
        #[source]
        source: serde_json::Error,
    },
}

/// A page body from `/api/devices/paginated`.
#[derive(Clone, Debug, PartialEq)]
pub enum DevicePage {
    Devices(Vec<Device>),
    /// Valid JSON that is not a list of records, kept for logging.
    Malformed(Value),
}

impl DevicePage {
    pub fn from_value(value: Value) -> Self {
        if !value.is_array() {
            return Self::Malformed(value);
        }
        match Vec::<Device>::deserialize(&value) {
            Ok(devices) => Self::Devices(devices),
            Err(_) => Self::Malformed(value),
        }
    }
}

/// The inventory backend as consumed by the dashboard.
#[async_trait]
pub trait Backend: Send + Sync {
    async fn filter_options(&self) -> Result<FilterOptions, ApiError>;

    async fn devices(&self, query: &DeviceQuery) -> Result<DevicePage, ApiError>;

    async fn dashboard_stats(&self) -> Result<DashboardStats, ApiError>;
}

#[derive(Clone, Debug)]
pub struct HttpBackend {
    client: reqwest::Client,
    base: Url,
}

impl HttpBackend {
    pub fn new(base_url: &str, timeout_seconds: u64) -> Result<Self, ApiError> {
        let base = Url::parse(base_url.trim()).map_err(|e| ApiError::InvalidBaseUrl {
            url: base_url.to_string(),
            message: e.to_string(),
        })?;
        if base.cannot_be_a_base() {
            return Err(ApiError::InvalidBaseUrl {
                url: base_url.to_string(),
                message: "URL cannot be used as a base".to_string(),
            });
        }

        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            reqwest::header::ACCEPT,
            reqwest::header::HeaderValue::from_static("application/json"),
        );
        let client = reqwest::Client::builder()
            .default_headers(headers)
            .user_agent(concat!("cpeboard/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(timeout_seconds.max(1)))
            .build()
            .map_err(|e| ApiError::HttpClientBuild { source: e })?;

        Ok(Self { client, base })
    }

    pub fn base(&self) -> &Url {
        &self.base
    }

    pub fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        self.base
            .join(path)
            .map_err(|e| ApiError::InvalidBaseUrl {
                url: self.base.to_string(),
                message: e.to_string(),
            })
    }

    async fn get_json(&self, url: Url, path: &str) -> Result<Value, ApiError> {
        tracing::debug!(%url, "GET");
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| ApiError::Transport {
                endpoint: path.to_string(),
                source: e,
            })?;
        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Status {
                endpoint: path.to_string(),
                status: status.as_u16(),
            });
        }
        let body = response.text().await.map_err(|e| ApiError::Transport {
            endpoint: path.to_string(),
            source: e,
        })?;
        serde_json::from_str(&body).map_err(|e| ApiError::Decode {
            endpoint: path.to_string(),
            source: e,
        })
    }
}

#[async_trait]
impl Backend for HttpBackend {
    async fn filter_options(&self) -> Result<FilterOptions, ApiError> {
        let value = self.get_json(self.endpoint(FILTERS_PATH)?, FILTERS_PATH).await?;
        serde_json::from_value(value).map_err(|e| ApiError::Decode {
            endpoint: FILTERS_PATH.to_string(),
            source: e,
        })
    }

    async fn devices(&self, query: &DeviceQuery) -> Result<DevicePage, ApiError> {
        let url = Url::parse_with_params(
            self.endpoint(DEVICES_PATH)?.as_str(),
            query.to_pairs(),
        )
        .map_err(|e| ApiError::InvalidBaseUrl {
            url: self.base.to_string(),
            message: e.to_string(),
        })?;
        let value = self.get_json(url, DEVICES_PATH).await?;
        Ok(DevicePage::from_value(value))
    }

    async fn dashboard_stats(&self) -> Result<DashboardStats, ApiError> {
        let value = self.get_json(self.endpoint(STATS_PATH)?, STATS_PATH).await?;
        serde_json::from_value(value).map_err(|e| ApiError::Decode {
            endpoint: STATS_PATH.to_string(),
            source: e,
        })
    }
}
