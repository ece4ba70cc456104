use reqwest::{Client, Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, info};

use super::types::{
    ClearHistoryResponse, DatasetStatistics, HealthStatus, HistoryPage, ModelInfo,
    PredictRequest, PredictResponse, PredictionLookup, PredictionStatus, ServerStats,
    ServiceHealth,
};
use crate::config::BackendConfig;
use crate::error::{ApiError, ApiResult};

/// Client for the CardioPredict backend API.
///
/// Each method issues exactly one HTTP attempt: no retry, no timeout, no
/// backoff. Non-success statuses become [`ApiError::Api`] carrying the
/// body's own error text; connection failures propagate as
/// [`ApiError::Http`] with the cause attached.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    /// Create a new backend client
    pub fn new(config: &BackendConfig) -> ApiResult<Self> {
        let client = Client::builder().build().map_err(ApiError::Http)?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Get the base URL (for testing)
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Submit a health snapshot for prediction
    pub async fn predict(&self, request: &PredictRequest) -> ApiResult<PredictResponse> {
        debug!(age = request.health.age, "Submitting prediction request");
        let response = self
            .request(Method::POST, "/predict", Some(request))
            .await?;
        info!("Prediction request succeeded");
        Ok(response)
    }

    /// Aggregate training-dataset statistics
    pub async fn statistics(&self) -> ApiResult<DatasetStatistics> {
        self.request::<DatasetStatistics, ()>(Method::GET, "/statistics", None)
            .await
    }

    /// Model metadata
    pub async fn model_info(&self) -> ApiResult<ModelInfo> {
        self.request::<ModelInfo, ()>(Method::GET, "/model-info", None)
            .await
    }

    /// API health check
    pub async fn health(&self) -> ApiResult<HealthStatus> {
        self.request::<HealthStatus, ()>(Method::GET, "/health", None)
            .await
    }

    /// Look up one server-side prediction by id
    pub async fn prediction(&self, prediction_id: &str) -> ApiResult<PredictionLookup> {
        self.request::<PredictionLookup, ()>(
            Method::GET,
            &format!("/prediction/{}", prediction_id),
            None,
        )
        .await
    }

    /// Server-side prediction tracker status
    pub async fn prediction_status(&self) -> ApiResult<PredictionStatus> {
        self.request::<PredictionStatus, ()>(Method::GET, "/prediction-status", None)
            .await
    }

    /// One page of the server-side prediction history
    pub async fn prediction_history(&self, limit: u32, offset: u32) -> ApiResult<HistoryPage> {
        self.request::<HistoryPage, ()>(
            Method::GET,
            &format!("/prediction-history?limit={}&offset={}", limit, offset),
            None,
        )
        .await
    }

    /// Server-side aggregate prediction statistics
    pub async fn prediction_stats(&self) -> ApiResult<ServerStats> {
        self.request::<ServerStats, ()>(Method::GET, "/prediction-stats", None)
            .await
    }

    /// Prediction service health
    pub async fn prediction_health(&self) -> ApiResult<ServiceHealth> {
        self.request::<ServiceHealth, ()>(Method::GET, "/prediction-health", None)
            .await
    }

    /// Clear the server-side prediction history
    pub async fn clear_history(&self) -> ApiResult<ClearHistoryResponse> {
        self.request::<ClearHistoryResponse, ()>(Method::POST, "/clear-history", None)
            .await
    }

    /// Issue a single request and decode the JSON body.
    async fn request<T: DeserializeOwned, B: Serialize>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> ApiResult<T> {
        let url = format!("{}{}", self.base_url, path);
        debug!(method = %method, url = %url, "Calling backend");

        let mut builder = self
            .client
            .request(method, &url)
            .header("Content-Type", "application/json");
        if let Some(body) = body {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(ApiError::Http)?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::Api {
                status: status.as_u16(),
                message: extract_error_message(&body, status),
            });
        }

        response.json().await.map_err(|e| ApiError::InvalidResponse {
            message: format!("Failed to parse response: {}", e),
        })
    }
}

/// Pull the backend's own error text out of a failure body.
///
/// The backend reports either a top-level `error` (string or object with a
/// `message`) or a top-level `message`; anything else falls back to the
/// status code.
fn extract_error_message(body: &str, status: StatusCode) -> String {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        if let Some(error) = value.get("error") {
            if let Some(text) = error.as_str() {
                return text.to_string();
            }
            if let Some(text) = error.get("message").and_then(|m| m.as_str()) {
                return text.to_string();
            }
        }
        if let Some(text) = value.get("message").and_then(|m| m.as_str()) {
            return text.to_string();
        }
    }
    format!("HTTP {}", status.as_u16())
}
