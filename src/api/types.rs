use serde::{Deserialize, Serialize};

use crate::risk::RiskLevel;
use crate::store::{HealthInput, PatientInfo, PredictionRecord};

/// Payload for `POST /predict`: the health snapshot plus optional patient
/// metadata, flattened into one JSON object as the backend expects.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictRequest {
    #[serde(flatten)]
    pub health: HealthInput,
    #[serde(flatten)]
    pub patient: PatientInfo,
}

impl PredictRequest {
    /// Create a request from a health snapshot
    pub fn new(health: HealthInput) -> Self {
        Self {
            health,
            patient: PatientInfo::default(),
        }
    }

    /// Attach patient metadata
    pub fn with_patient(mut self, patient: PatientInfo) -> Self {
        self.patient = patient;
        self
    }
}

/// Successful `POST /predict` body.
#[derive(Debug, Clone, Deserialize)]
pub struct PredictResponse {
    pub prediction_id: Option<String>,
    pub prediction: Option<i32>,
    pub has_disease: bool,
    pub disease_probability: f64,
    pub healthy_probability: f64,
    pub risk_percentage: f64,
    pub risk_level: RiskLevel,
    pub color: Option<String>,
    pub timestamp: Option<String>,
}

impl PredictResponse {
    /// Merge the backend result with the submitted input into a storable
    /// record. A missing prediction id is left empty for the store to
    /// synthesize.
    pub fn into_record(self, request: PredictRequest) -> PredictionRecord {
        let mut record = PredictionRecord::new(
            self.prediction_id.unwrap_or_default(),
            self.risk_percentage,
            self.disease_probability,
            self.healthy_probability,
            self.has_disease,
            request.health,
            request.patient,
        );
        // The backend's bucket is authoritative when present
        record.risk_level = self.risk_level;
        record
    }
}

/// Min/max/mean of one dataset feature.
#[derive(Debug, Clone, Deserialize)]
pub struct FeatureRange {
    pub min: f64,
    pub max: f64,
    pub mean: f64,
}

/// Per-feature ranges reported by `GET /statistics`.
#[derive(Debug, Clone, Deserialize)]
pub struct FeatureStats {
    /// Age range, reported in years by the backend converter.
    pub age: FeatureRange,
    pub weight: FeatureRange,
    pub height: FeatureRange,
}

/// Aggregate training-dataset metrics from `GET /statistics`.
#[derive(Debug, Clone, Deserialize)]
pub struct DatasetStatistics {
    pub total_records: u64,
    pub disease_cases: u64,
    pub healthy_cases: u64,
    pub disease_percentage: f64,
    pub features: FeatureStats,
    #[serde(default)]
    pub high_bp_count: u64,
    #[serde(default)]
    pub high_cholesterol_count: u64,
    #[serde(default)]
    pub smokers_count: u64,
}

/// `GET /model-info` body.
#[derive(Debug, Clone, Deserialize)]
pub struct ModelInfo {
    pub status: String,
    pub model_type: String,
    pub model_loaded: bool,
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(default)]
    pub feature_count: usize,
    pub version: String,
    pub timestamp: Option<String>,
}

/// `GET /health` body.
#[derive(Debug, Clone, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    pub message: String,
    pub version: Option<String>,
    pub timestamp: Option<String>,
}

/// `GET /prediction-health` body.
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceHealth {
    pub status: String,
    pub model_loaded: bool,
    #[serde(default)]
    pub predictions_made: u64,
    pub message: Option<String>,
    pub timestamp: Option<String>,
}

/// A prediction as the backend tracks it server-side.
///
/// Only the fields the client renders are modeled; everything else in the
/// body is ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerPrediction {
    #[serde(alias = "prediction_id")]
    pub id: String,
    pub risk_percentage: f64,
    pub risk_level: RiskLevel,
    #[serde(default)]
    pub has_disease: bool,
    #[serde(default)]
    pub age_years: Option<i64>,
    #[serde(default)]
    pub bp_systolic: Option<i32>,
    #[serde(default)]
    pub bp_diastolic: Option<i32>,
    #[serde(default)]
    pub patient_name: Option<String>,
    #[serde(default)]
    pub timestamp: Option<String>,
}

/// `GET /prediction/{id}` body.
#[derive(Debug, Clone, Deserialize)]
pub struct PredictionLookup {
    pub status: String,
    pub data: ServerPrediction,
    pub timestamp: Option<String>,
}

/// Counts per risk bucket in server-side summaries.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RiskDistribution {
    pub low_risk: u64,
    pub moderate_risk: u64,
    pub high_risk: u64,
}

/// `GET /prediction-status` body.
#[derive(Debug, Clone, Deserialize)]
pub struct PredictionStatus {
    pub status: String,
    pub total_predictions: u64,
    #[serde(default)]
    pub risk_distribution: RiskDistribution,
    #[serde(default)]
    pub disease_rate: f64,
    #[serde(default)]
    pub recent_predictions: Vec<ServerPrediction>,
    pub timestamp: Option<String>,
}

/// One page of `GET /prediction-history`.
#[derive(Debug, Clone, Deserialize)]
pub struct HistoryPage {
    pub status: String,
    pub total_records: u64,
    pub returned: u64,
    pub limit: u32,
    pub offset: u32,
    pub has_more: bool,
    #[serde(default)]
    pub predictions: Vec<ServerPrediction>,
}

/// Min/max/average of a server-side stat.
#[derive(Debug, Clone, Deserialize)]
pub struct StatRange {
    pub min: f64,
    pub max: f64,
    pub average: f64,
}

/// `GET /prediction-stats` body. `status` is `"no_data"` with zero totals
/// when nothing has been predicted yet.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerStats {
    pub status: String,
    pub total_predictions: u64,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub risk_distribution: RiskDistribution,
    #[serde(default)]
    pub disease_rate: f64,
    pub risk_percentage_stats: Option<StatRange>,
    pub age_stats: Option<StatRange>,
    pub weight_stats: Option<StatRange>,
}

/// `POST /clear-history` body.
#[derive(Debug, Clone, Deserialize)]
pub struct ClearHistoryResponse {
    pub status: String,
    pub message: String,
    #[serde(default)]
    pub cleared_count: Option<u64>,
}
