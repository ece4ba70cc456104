//! Backend API client and request/response types.

mod client;
mod types;

pub use client::ApiClient;
pub use types::{
    ClearHistoryResponse, DatasetStatistics, FeatureRange, FeatureStats, HealthStatus,
    HistoryPage, ModelInfo, PredictRequest, PredictResponse, PredictionLookup, PredictionStatus,
    RiskDistribution, ServerPrediction, ServerStats, ServiceHealth, StatRange,
};
