//! Client-side prediction history.
//!
//! This module owns the locally persisted record list: insert/dedupe/cap/
//! delete plus a one-pass aggregate, behind a repository trait with an
//! in-memory implementation for tests and a JSON-file implementation for
//! production use.

mod file;
mod memory;


pub use file::FileStore;
pub use memory::MemoryStore;

use async_trait::async_trait;
use chrono::{Local, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AppResult;
use crate::risk::RiskLevel;

/// Maximum number of records kept in the history, oldest evicted first.
pub const HISTORY_CAP: usize = 100;

/// Maximum number of bookmarked records.
pub const SAVED_CAP: usize = 50;

/// Gender code used by the training dataset (1 = male, 2 = female).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum Gender {
    Male = 1,
    Female = 2,
}

impl From<Gender> for u8 {
    fn from(gender: Gender) -> u8 {
        gender as u8
    }
}

impl TryFrom<u8> for Gender {
    type Error = String;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            1 => Ok(Gender::Male),
            2 => Ok(Gender::Female),
            _ => Err(format!("Unknown gender code: {}", code)),
        }
    }
}

impl std::fmt::Display for Gender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Gender::Male => write!(f, "Male"),
            Gender::Female => write!(f, "Female"),
        }
    }
}

impl std::str::FromStr for Gender {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "1" | "male" | "m" => Ok(Gender::Male),
            "2" | "female" | "f" => Ok(Gender::Female),
            _ => Err(format!("Unknown gender: {}", s)),
        }
    }
}

/// Cholesterol/glucose level on the dataset's 1-3 scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum Level {
    Normal = 1,
    AboveNormal = 2,
    WellAboveNormal = 3,
}

impl Level {
    /// The dataset code for this level.
    pub fn code(&self) -> u8 {
        *self as u8
    }
}

impl From<Level> for u8 {
    fn from(level: Level) -> u8 {
        level as u8
    }
}

impl TryFrom<u8> for Level {
    type Error = String;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            1 => Ok(Level::Normal),
            2 => Ok(Level::AboveNormal),
            3 => Ok(Level::WellAboveNormal),
            _ => Err(format!("Level must be 1-3, got {}", code)),
        }
    }
}

impl std::str::FromStr for Level {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "1" | "normal" => Ok(Level::Normal),
            "2" | "above-normal" => Ok(Level::AboveNormal),
            "3" | "well-above-normal" => Ok(Level::WellAboveNormal),
            _ => Err(format!("Level must be 1-3, got {}", s)),
        }
    }
}

/// Serde adapter for the dataset's 0/1 flag encoding.
pub mod flag {
    use serde::de::{self, Deserializer, Unexpected};
    use serde::Serializer;

    pub fn serialize<S: Serializer>(value: &bool, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(u8::from(*value))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
        struct FlagVisitor;

        impl de::Visitor<'_> for FlagVisitor {
            type Value = bool;

            fn expecting(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
                f.write_str("0, 1, or a boolean")
            }

            fn visit_bool<E: de::Error>(self, value: bool) -> Result<bool, E> {
                Ok(value)
            }

            fn visit_u64<E: de::Error>(self, value: u64) -> Result<bool, E> {
                match value {
                    0 => Ok(false),
                    1 => Ok(true),
                    _ => Err(E::invalid_value(Unexpected::Unsigned(value), &self)),
                }
            }

            fn visit_i64<E: de::Error>(self, value: i64) -> Result<bool, E> {
                match value {
                    0 => Ok(false),
                    1 => Ok(true),
                    _ => Err(E::invalid_value(Unexpected::Signed(value), &self)),
                }
            }
        }

        deserializer.deserialize_any(FlagVisitor)
    }
}

/// Health-metric snapshot submitted for a prediction.
///
/// Field names and encodings match the backend wire format: age in years
/// (the canonical unit at the API boundary), flags as 0/1.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthInput {
    /// Age in years.
    pub age: u32,
    pub gender: Gender,
    /// Height in cm.
    pub height: f64,
    /// Weight in kg.
    pub weight: f64,
    /// Systolic blood pressure (mmHg).
    pub ap_hi: i32,
    /// Diastolic blood pressure (mmHg).
    pub ap_lo: i32,
    pub cholesterol: Level,
    pub gluc: Level,
    #[serde(with = "flag")]
    pub smoke: bool,
    #[serde(with = "flag")]
    pub alco: bool,
    #[serde(with = "flag")]
    pub active: bool,
}

impl HealthInput {
    /// Validate the snapshot before it is sent anywhere.
    pub fn validate(&self) -> AppResult<()> {
        use crate::error::AppError;

        if self.age < 1 || self.age > 120 {
            return Err(AppError::validation("age", "must be between 1 and 120"));
        }
        if self.height <= 0.0 {
            return Err(AppError::validation("height", "must be positive"));
        }
        if self.weight <= 0.0 {
            return Err(AppError::validation("weight", "must be positive"));
        }
        if self.ap_hi <= 0 {
            return Err(AppError::validation("ap_hi", "must be positive"));
        }
        if self.ap_lo <= 0 {
            return Err(AppError::validation("ap_lo", "must be positive"));
        }
        Ok(())
    }
}

/// Optional patient metadata attached to a prediction.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PatientInfo {
    #[serde(rename = "patientName", skip_serializing_if = "Option::is_none")]
    pub patient_name: Option<String>,
    #[serde(rename = "fatherName", skip_serializing_if = "Option::is_none")]
    pub father_name: Option<String>,
    #[serde(rename = "bloodGroup", skip_serializing_if = "Option::is_none")]
    pub blood_group: Option<String>,
    #[serde(rename = "phoneNumber", skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(rename = "altPhoneNumber", skip_serializing_if = "Option::is_none")]
    pub alt_phone_number: Option<String>,
    #[serde(rename = "doctorName", skip_serializing_if = "Option::is_none")]
    pub doctor_name: Option<String>,
    #[serde(rename = "patientComments", skip_serializing_if = "Option::is_none")]
    pub comments: Option<String>,
}

impl PatientInfo {
    /// Set the patient name
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.patient_name = Some(name.into());
        self
    }

    /// Set the referring doctor
    pub fn with_doctor(mut self, doctor: impl Into<String>) -> Self {
        self.doctor_name = Some(doctor.into());
        self
    }
}

/// One stored prediction: backend result plus the input snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionRecord {
    pub prediction_id: String,
    /// Risk percentage in 0-100.
    pub risk_percentage: f64,
    pub risk_level: RiskLevel,
    /// Probability of disease in 0-1. Displayed as received; the pair is not
    /// validated to sum to 1.
    pub disease_probability: f64,
    /// Probability of a healthy outcome in 0-1.
    pub healthy_probability: f64,
    pub has_disease: bool,
    #[serde(flatten)]
    pub patient: PatientInfo,
    #[serde(rename = "healthData")]
    pub health: HealthInput,
    /// Human-readable save time for display.
    #[serde(rename = "savedAt")]
    pub saved_at: String,
    /// Epoch millis used for ordering.
    pub timestamp: i64,
}

impl PredictionRecord {
    /// Build a record from backend result fields and the submitted input.
    pub fn new(
        prediction_id: impl Into<String>,
        risk_percentage: f64,
        disease_probability: f64,
        healthy_probability: f64,
        has_disease: bool,
        health: HealthInput,
        patient: PatientInfo,
    ) -> Self {
        Self {
            prediction_id: prediction_id.into(),
            risk_percentage,
            risk_level: RiskLevel::classify(risk_percentage),
            disease_probability,
            healthy_probability,
            has_disease,
            patient,
            health,
            saved_at: Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            timestamp: Utc::now().timestamp_millis(),
        }
    }

    /// BMI of the stored snapshot, if computable.
    pub fn bmi(&self) -> Option<f64> {
        crate::risk::bmi(self.health.height, self.health.weight)
    }
}

/// Aggregate over the stored history, computed in one pass.
///
/// All fields are zero for an empty store; no division by zero leaks out as
/// NaN.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StoreSummary {
    pub total: usize,
    pub high_risk: usize,
    pub moderate_risk: usize,
    pub low_risk: usize,
    pub disease: usize,
    pub healthy: usize,
    /// Share of records flagged as disease, in percent.
    pub disease_rate: f64,
    pub avg_risk: f64,
    pub avg_age: f64,
    pub avg_weight: f64,
}

/// Summarize a record list.
pub fn summarize(records: &[PredictionRecord]) -> StoreSummary {
    let mut summary = StoreSummary {
        total: records.len(),
        ..StoreSummary::default()
    };

    if records.is_empty() {
        return summary;
    }

    let mut risk_sum = 0.0;
    let mut age_sum = 0u64;
    let mut weight_sum = 0.0;

    for record in records {
        match RiskLevel::classify(record.risk_percentage) {
            RiskLevel::High => summary.high_risk += 1,
            RiskLevel::Moderate => summary.moderate_risk += 1,
            RiskLevel::Low => summary.low_risk += 1,
        }
        if record.has_disease {
            summary.disease += 1;
        }
        risk_sum += record.risk_percentage;
        age_sum += u64::from(record.health.age);
        weight_sum += record.health.weight;
    }

    let total = records.len() as f64;
    summary.healthy = summary.total - summary.disease;
    summary.disease_rate = summary.disease as f64 / total * 100.0;
    summary.avg_risk = risk_sum / total;
    summary.avg_age = age_sum as f64 / total;
    summary.avg_weight = weight_sum / total;
    summary
}

/// Synthesize a client-side prediction id when the backend did not assign one.
pub(crate) fn synthesize_id() -> String {
    let suffix = Uuid::new_v4().simple().to_string();
    format!("pred_{}_{}", Utc::now().timestamp_millis(), &suffix[..9])
}

/// Insert-or-replace into an ordered record list: dedupe by id, prepend,
/// truncate to `HISTORY_CAP`. Returns the stored record (with an id assigned
/// if the caller left it empty).
pub(crate) fn insert_record(
    records: &mut Vec<PredictionRecord>,
    mut record: PredictionRecord,
) -> PredictionRecord {
    if record.prediction_id.is_empty() {
        record.prediction_id = synthesize_id();
    }
    records.retain(|r| r.prediction_id != record.prediction_id);
    records.insert(0, record.clone());
    records.truncate(HISTORY_CAP);
    record
}

/// Prepend into the bookmark list unless the id is already present.
/// Returns whether the record was added.
pub(crate) fn insert_saved(records: &mut Vec<PredictionRecord>, record: PredictionRecord) -> bool {
    if records.iter().any(|r| r.prediction_id == record.prediction_id) {
        return false;
    }
    records.insert(0, record);
    records.truncate(SAVED_CAP);
    true
}

/// Repository of locally persisted prediction records.
///
/// Implementations absorb storage failures rather than surfacing them: a
/// record file that cannot be read or parsed behaves as an empty store, and
/// a persist that fails drops the update. Both paths log; neither crashes
/// the caller. Read-modify-write is not atomic across processes - the last
/// writer wins.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Store a record, replacing any existing record with the same id and
    /// moving it to the front. Assigns a synthesized id when missing.
    async fn insert_or_replace(&self, record: PredictionRecord) -> PredictionRecord;

    /// A restartable slice of the ordered history for pagination.
    async fn list(&self, offset: usize, limit: usize) -> Vec<PredictionRecord>;

    /// Look up a record by id.
    async fn get(&self, id: &str) -> Option<PredictionRecord>;

    /// Remove the matching record. Returns `false` (not an error) if absent.
    async fn delete_by_id(&self, id: &str) -> bool;

    /// Empty the history.
    async fn clear(&self);

    /// Number of records currently stored.
    async fn count(&self) -> usize;

    /// One-pass aggregate over the history.
    async fn aggregate(&self) -> StoreSummary;

    /// Bookmark a record. Returns `false` when the id is already saved.
    async fn save(&self, record: PredictionRecord) -> bool;

    /// The bookmarked records, most recent first.
    async fn saved(&self) -> Vec<PredictionRecord>;
}
