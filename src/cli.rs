//! CLI commands for the CardioPredict client.
//!
//! Each subcommand is the orchestration layer for one user action: parse and
//! validate input, call the backend client and the record store, render the
//! outcome as plain text.

use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing::error;

use crate::api::{ApiClient, PredictRequest};
use crate::config::Config;
use crate::error::ApiError;
use crate::report;
use crate::risk;
use crate::store::{Gender, HealthInput, Level, PatientInfo, PredictionRecord, RecordStore};

/// Command-line interface for the CardioPredict backend and the local
/// prediction history.
#[derive(Parser, Debug)]
#[command(
    name = "cardiopredict",
    version,
    about = "Cardiovascular risk predictions from the command line"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// Top-level subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Submit health metrics for a risk prediction and store the result
    Predict(PredictArgs),

    /// Show the locally stored prediction history
    History {
        /// Maximum number of records to show
        #[arg(long, default_value_t = 10)]
        limit: usize,

        /// Number of records to skip
        #[arg(long, default_value_t = 0)]
        offset: usize,
    },

    /// Show one stored prediction in full
    Show {
        /// Prediction id
        id: String,
    },

    /// Summarize the locally stored prediction history
    Summary,

    /// Export a stored prediction as a report file
    Report {
        /// Prediction id
        id: String,

        /// Report format
        #[arg(long, value_enum, default_value_t = ReportFormat::Text)]
        format: ReportFormat,
    },

    /// Delete one stored prediction
    Delete {
        /// Prediction id
        id: String,
    },

    /// Clear the local prediction history
    Clear {
        /// Confirm the irreversible clear
        #[arg(long)]
        yes: bool,
    },

    /// Bookmark a stored prediction
    Save {
        /// Prediction id
        id: String,
    },

    /// List bookmarked predictions
    Saved,

    /// Training-dataset statistics from the backend
    Analytics,

    /// Backend model information
    ModelInfo,

    /// Backend health check
    Health,

    /// Prediction service health check
    ServiceHealth,

    /// Server-side prediction tracker status
    Status,

    /// Look up a prediction on the server by id
    Lookup {
        /// Prediction id
        id: String,
    },

    /// One page of the server-side prediction history
    ServerHistory {
        /// Maximum number of records per page
        #[arg(long, default_value_t = 100)]
        limit: u32,

        /// Number of records to skip
        #[arg(long, default_value_t = 0)]
        offset: u32,
    },

    /// Server-side aggregate prediction statistics
    ServerStats,

    /// Clear the server-side prediction history
    ClearServer {
        /// Confirm the irreversible clear
        #[arg(long)]
        yes: bool,
    },
}

/// Report output format.
#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum ReportFormat {
    /// Fixed-layout plain text
    Text,
    /// Flat Field,Value CSV
    Csv,
    /// Printable HTML document
    Html,
}

/// Health metrics and optional patient details for a prediction.
#[derive(Args, Debug, Clone)]
pub struct PredictArgs {
    /// Age in years (1-120)
    #[arg(long)]
    pub age: u32,

    /// Gender: male/female or dataset code 1/2
    #[arg(long)]
    pub gender: Gender,

    /// Height in cm
    #[arg(long)]
    pub height: f64,

    /// Weight in kg
    #[arg(long)]
    pub weight: f64,

    /// Systolic blood pressure (mmHg)
    #[arg(long)]
    pub ap_hi: i32,

    /// Diastolic blood pressure (mmHg)
    #[arg(long)]
    pub ap_lo: i32,

    /// Cholesterol level (1 = normal, 2 = above normal, 3 = well above normal)
    #[arg(long, default_value = "1")]
    pub cholesterol: Level,

    /// Glucose level (1 = normal, 2 = above normal, 3 = well above normal)
    #[arg(long, default_value = "1")]
    pub gluc: Level,

    /// Smoker
    #[arg(long)]
    pub smoke: bool,

    /// Consumes alcohol
    #[arg(long)]
    pub alco: bool,

    /// Physically active
    #[arg(long)]
    pub active: bool,

    /// Patient name
    #[arg(long)]
    pub patient_name: Option<String>,

    /// Father's name
    #[arg(long)]
    pub father_name: Option<String>,

    /// Blood group
    #[arg(long)]
    pub blood_group: Option<String>,

    /// Phone number
    #[arg(long)]
    pub phone: Option<String>,

    /// Alternative phone number
    #[arg(long)]
    pub alt_phone: Option<String>,

    /// Referring doctor
    #[arg(long)]
    pub doctor: Option<String>,

    /// Free-text notes
    #[arg(long)]
    pub comments: Option<String>,
}

impl PredictArgs {
    fn health_input(&self) -> HealthInput {
        HealthInput {
            age: self.age,
            gender: self.gender,
            height: self.height,
            weight: self.weight,
            ap_hi: self.ap_hi,
            ap_lo: self.ap_lo,
            cholesterol: self.cholesterol,
            gluc: self.gluc,
            smoke: self.smoke,
            alco: self.alco,
            active: self.active,
        }
    }

    fn patient_info(&self) -> PatientInfo {
        PatientInfo {
            patient_name: self.patient_name.clone(),
            father_name: self.father_name.clone(),
            blood_group: self.blood_group.clone(),
            phone_number: self.phone.clone(),
            alt_phone_number: self.alt_phone.clone(),
            doctor_name: self.doctor.clone(),
            comments: self.comments.clone(),
        }
    }
}

/// Result of CLI command execution.
pub struct CliResult {
    /// Exit code (0 = success)
    pub exit_code: i32,
    /// Output message
    pub message: String,
}

impl CliResult {
    /// Create a success result with the given message.
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            exit_code: 0,
            message: message.into(),
        }
    }

    /// Create an error result with the given message.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            exit_code: 1,
            message: message.into(),
        }
    }
}

/// Execute a CLI command.
pub async fn execute(
    command: Command,
    store: &dyn RecordStore,
    client: &ApiClient,
    config: &Config,
) -> CliResult {
    match command {
        Command::Predict(args) => execute_predict(args, store, client).await,
        Command::History { limit, offset } => execute_history(store, limit, offset).await,
        Command::Show { id } => execute_show(store, &id).await,
        Command::Summary => execute_summary(store).await,
        Command::Report { id, format } => execute_report(store, config, &id, format).await,
        Command::Delete { id } => execute_delete(store, &id).await,
        Command::Clear { yes } => execute_clear(store, yes).await,
        Command::Save { id } => execute_save(store, &id).await,
        Command::Saved => execute_saved(store).await,
        Command::Analytics => execute_analytics(client).await,
        Command::ModelInfo => execute_model_info(client).await,
        Command::Health => execute_health(client).await,
        Command::ServiceHealth => execute_service_health(client).await,
        Command::Status => execute_status(client).await,
        Command::Lookup { id } => execute_lookup(client, &id).await,
        Command::ServerHistory { limit, offset } => {
            execute_server_history(client, limit, offset).await
        }
        Command::ServerStats => execute_server_stats(client).await,
        Command::ClearServer { yes } => execute_clear_server(client, yes).await,
    }
}

/// Map an API failure to user-facing output: application errors surface the
/// backend's own text, transport trouble logs the cause and shows a generic
/// message.
fn api_failure(context: &str, err: ApiError) -> CliResult {
    match err {
        ApiError::Api { message, .. } => CliResult::error(format!("{}: {}", context, message)),
        err => {
            error!(error = %err, context, "Backend request failed");
            CliResult::error(format!(
                "{}: the backend could not be reached. Please try again.",
                context
            ))
        }
    }
}

async fn execute_predict(
    args: PredictArgs,
    store: &dyn RecordStore,
    client: &ApiClient,
) -> CliResult {
    let health = args.health_input();
    if let Err(err) = health.validate() {
        return CliResult::error(err.to_string());
    }

    let request = PredictRequest::new(health).with_patient(args.patient_info());
    let response = match client.predict(&request).await {
        Ok(response) => response,
        Err(err) => return api_failure("Prediction failed", err),
    };

    let record = response.into_record(request);
    let stored = store.insert_or_replace(record).await;

    let mut out = String::new();
    out.push_str(&format!("Prediction stored: {}\n\n", stored.prediction_id));
    out.push_str(&format!(
        "Risk Assessment: {} ({:.2}%)\n",
        stored.risk_level, stored.risk_percentage
    ));
    out.push_str(&format!(
        "Disease Probability: {:.2}%\n",
        stored.disease_probability * 100.0
    ));
    out.push_str(&format!(
        "Healthy Probability: {:.2}%\n",
        stored.healthy_probability * 100.0
    ));

    out.push_str("\nRecommendations:\n");
    for (i, rec) in risk::recommendations(stored.risk_percentage, &stored.health)
        .iter()
        .enumerate()
    {
        out.push_str(&format!("  {}. {}\n", i + 1, rec));
    }

    CliResult::success(out)
}

fn history_line(record: &PredictionRecord) -> String {
    format!(
        "{:<32} {:<20} {:>3}  {:>7.2}%  {:<13} {:<4} {:>7}",
        record.prediction_id,
        record.saved_at,
        record.health.age,
        record.risk_percentage,
        record.risk_level.to_string(),
        if record.has_disease { "Yes" } else { "No" },
        format!("{}/{}", record.health.ap_hi, record.health.ap_lo),
    )
}

async fn execute_history(store: &dyn RecordStore, limit: usize, offset: usize) -> CliResult {
    let total = store.count().await;
    let records = store.list(offset, limit).await;

    if records.is_empty() {
        return CliResult::success(
            "No predictions yet. Run `cardiopredict predict` to make one.",
        );
    }

    let mut out = String::new();
    out.push_str(&format!(
        "{:<32} {:<20} {:>3}  {:>8}  {:<13} {:<4} {:>7}\n",
        "Prediction ID", "Saved At", "Age", "Risk", "Level", "Dis", "BP"
    ));
    for record in &records {
        out.push_str(&history_line(record));
        out.push('\n');
    }
    out.push_str(&format!(
        "\nShowing {} of {} stored predictions\n",
        records.len(),
        total
    ));
    CliResult::success(out)
}

fn detail_field(out: &mut String, label: &str, value: &Option<String>) {
    out.push_str(&format!(
        "{}: {}\n",
        label,
        value.as_deref().filter(|s| !s.is_empty()).unwrap_or("Not Provided")
    ));
}

async fn execute_show(store: &dyn RecordStore, id: &str) -> CliResult {
    let Some(record) = store.get(id).await else {
        return CliResult::error(format!("Prediction not found: {}", id));
    };

    let mut out = String::new();
    out.push_str(&format!("Prediction {}\n", record.prediction_id));
    out.push_str(&format!("Saved at: {}\n\n", record.saved_at));

    out.push_str("Patient Information\n");
    detail_field(&mut out, "  Patient Name", &record.patient.patient_name);
    detail_field(&mut out, "  Father's Name", &record.patient.father_name);
    detail_field(&mut out, "  Blood Group", &record.patient.blood_group);
    detail_field(&mut out, "  Phone", &record.patient.phone_number);
    detail_field(&mut out, "  Doctor", &record.patient.doctor_name);
    if let Some(comments) = record
        .patient
        .comments
        .as_deref()
        .filter(|s| !s.is_empty())
    {
        out.push_str(&format!("  Notes: {}\n", comments));
    }

    out.push_str("\nPrediction Results\n");
    out.push_str(&format!("  Risk Level: {}\n", record.risk_level));
    out.push_str(&format!("  Risk Percentage: {:.2}%\n", record.risk_percentage));
    out.push_str(&format!(
        "  Disease Probability: {:.2}%\n",
        record.disease_probability * 100.0
    ));
    out.push_str(&format!(
        "  Prediction: {}\n",
        if record.has_disease {
            "High Risk - Disease Likely"
        } else {
            "Good - Healthy"
        }
    ));

    let health = &record.health;
    out.push_str("\nHealth Parameters\n");
    out.push_str(&format!("  Age: {} years\n", health.age));
    out.push_str(&format!("  Gender: {}\n", health.gender));
    out.push_str(&format!("  Height: {} cm\n", health.height));
    out.push_str(&format!("  Weight: {} kg\n", health.weight));
    if let Some(bmi) = record.bmi() {
        out.push_str(&format!("  BMI: {:.2} kg/m2\n", bmi));
    }
    out.push_str(&format!(
        "  Blood Pressure: {}/{} mmHg\n",
        health.ap_hi, health.ap_lo
    ));
    out.push_str(&format!("  Cholesterol: {}\n", health.cholesterol.code()));
    out.push_str(&format!("  Glucose: {}\n", health.gluc.code()));
    out.push_str(&format!("  Smoker: {}\n", if health.smoke { "Yes" } else { "No" }));
    out.push_str(&format!("  Alcohol: {}\n", if health.alco { "Yes" } else { "No" }));
    out.push_str(&format!("  Active: {}\n", if health.active { "Yes" } else { "No" }));

    CliResult::success(out)
}

async fn execute_summary(store: &dyn RecordStore) -> CliResult {
    let summary = store.aggregate().await;

    let mut out = String::new();
    out.push_str(&format!("Total Predictions: {}\n", summary.total));
    out.push_str(&format!("  High Risk: {}\n", summary.high_risk));
    out.push_str(&format!("  Moderate Risk: {}\n", summary.moderate_risk));
    out.push_str(&format!("  Low Risk: {}\n", summary.low_risk));
    out.push('\n');
    out.push_str(&format!("Disease Predicted: {}\n", summary.disease));
    out.push_str(&format!("Healthy: {}\n", summary.healthy));
    out.push_str(&format!("Disease Rate: {:.2}%\n", summary.disease_rate));
    out.push_str(&format!("Average Risk: {:.2}%\n", summary.avg_risk));
    out.push_str(&format!("Average Age: {:.1} years\n", summary.avg_age));
    out.push_str(&format!("Average Weight: {:.2} kg\n", summary.avg_weight));
    CliResult::success(out)
}

async fn execute_report(
    store: &dyn RecordStore,
    config: &Config,
    id: &str,
    format: ReportFormat,
) -> CliResult {
    let Some(record) = store.get(id).await else {
        return CliResult::error(format!("Prediction not found: {}", id));
    };

    let dir = &config.storage.report_dir;
    let written = match format {
        ReportFormat::Text => report::write_text_report(dir, &record),
        ReportFormat::Csv => report::write_csv_report(dir, &record),
        ReportFormat::Html => report::write_html_report(dir, &record),
    };

    match written {
        Ok(path) => CliResult::success(format!("Report written to {}", path.display())),
        Err(err) => {
            error!(error = %err, "Failed to write report");
            CliResult::error(format!("Failed to write report: {}", err))
        }
    }
}

async fn execute_delete(store: &dyn RecordStore, id: &str) -> CliResult {
    if store.delete_by_id(id).await {
        CliResult::success("Prediction deleted")
    } else {
        CliResult::success(format!("No stored prediction with id {}", id))
    }
}

async fn execute_clear(store: &dyn RecordStore, yes: bool) -> CliResult {
    if !yes {
        return CliResult::error(
            "This clears all locally stored predictions and cannot be undone. Re-run with --yes to confirm.",
        );
    }
    store.clear().await;
    CliResult::success("Prediction history cleared")
}

async fn execute_save(store: &dyn RecordStore, id: &str) -> CliResult {
    let Some(record) = store.get(id).await else {
        return CliResult::error(format!("Prediction not found: {}", id));
    };

    if store.save(record).await {
        CliResult::success("Prediction saved")
    } else {
        CliResult::success("This prediction is already saved")
    }
}

async fn execute_saved(store: &dyn RecordStore) -> CliResult {
    let records = store.saved().await;
    if records.is_empty() {
        return CliResult::success("No saved predictions.");
    }

    let mut out = String::new();
    for record in &records {
        out.push_str(&history_line(record));
        out.push('\n');
    }
    CliResult::success(out)
}

async fn execute_analytics(client: &ApiClient) -> CliResult {
    let stats = match client.statistics().await {
        Ok(stats) => stats,
        Err(err) => return api_failure("Failed to load statistics", err),
    };

    let mut out = String::new();
    out.push_str(&format!("Total Records: {}\n", stats.total_records));
    out.push_str(&format!("Disease Cases: {}\n", stats.disease_cases));
    out.push_str(&format!("Healthy Cases: {}\n", stats.healthy_cases));
    out.push_str(&format!("Disease Percentage: {:.2}%\n", stats.disease_percentage));
    out.push('\n');

    let features = &stats.features;
    out.push_str(&format!(
        "Age (years):  min {:.0}  mean {:.0}  max {:.0}\n",
        features.age.min, features.age.mean, features.age.max
    ));
    out.push_str(&format!(
        "Weight (kg):  min {:.1}  mean {:.1}  max {:.1}\n",
        features.weight.min, features.weight.mean, features.weight.max
    ));
    out.push_str(&format!(
        "Height (cm):  min {:.0}  mean {:.0}  max {:.0}\n",
        features.height.min, features.height.mean, features.height.max
    ));

    if let Some(avg_bmi) = risk::bmi(features.height.mean, features.weight.mean) {
        out.push_str(&format!("Average BMI: {:.1}\n", avg_bmi));
    }

    out.push('\n');
    out.push_str(&format!("High Blood Pressure: {}\n", stats.high_bp_count));
    out.push_str(&format!("High Cholesterol: {}\n", stats.high_cholesterol_count));
    out.push_str(&format!("Smokers: {}\n", stats.smokers_count));
    CliResult::success(out)
}

async fn execute_model_info(client: &ApiClient) -> CliResult {
    let info = match client.model_info().await {
        Ok(info) => info,
        Err(err) => return api_failure("Failed to load model info", err),
    };

    let mut out = String::new();
    out.push_str(&format!("Model: {}\n", info.model_type));
    out.push_str(&format!(
        "Loaded: {}\n",
        if info.model_loaded { "yes" } else { "no" }
    ));
    out.push_str(&format!("Version: {}\n", info.version));
    out.push_str(&format!("Features ({}):", info.feature_count));
    for feature in &info.features {
        out.push_str(&format!(" {}", feature));
    }
    out.push('\n');
    CliResult::success(out)
}

async fn execute_health(client: &ApiClient) -> CliResult {
    match client.health().await {
        Ok(health) => {
            CliResult::success(format!("Status: {} - {}", health.status, health.message))
        }
        Err(err) => api_failure("Health check failed", err),
    }
}

async fn execute_service_health(client: &ApiClient) -> CliResult {
    match client.prediction_health().await {
        Ok(health) => CliResult::success(format!(
            "Status: {} ({} predictions made)",
            health.status, health.predictions_made
        )),
        Err(err) => api_failure("Service health check failed", err),
    }
}

async fn execute_status(client: &ApiClient) -> CliResult {
    let status = match client.prediction_status().await {
        Ok(status) => status,
        Err(err) => return api_failure("Failed to load prediction status", err),
    };

    let mut out = String::new();
    out.push_str(&format!("Status: {}\n", status.status));
    out.push_str(&format!("Total Predictions: {}\n", status.total_predictions));
    out.push_str(&format!(
        "Risk Distribution: {} high / {} moderate / {} low\n",
        status.risk_distribution.high_risk,
        status.risk_distribution.moderate_risk,
        status.risk_distribution.low_risk
    ));
    out.push_str(&format!("Disease Rate: {:.2}%\n", status.disease_rate));
    if !status.recent_predictions.is_empty() {
        out.push_str("\nRecent Predictions:\n");
        for pred in &status.recent_predictions {
            out.push_str(&format!(
                "  {}  {:.2}%  {}\n",
                pred.id, pred.risk_percentage, pred.risk_level
            ));
        }
    }
    CliResult::success(out)
}

async fn execute_lookup(client: &ApiClient, id: &str) -> CliResult {
    let lookup = match client.prediction(id).await {
        Ok(lookup) => lookup,
        Err(err) => return api_failure("Lookup failed", err),
    };

    let pred = &lookup.data;
    let mut out = String::new();
    out.push_str(&format!("Prediction {}\n", pred.id));
    out.push_str(&format!("  Risk: {:.2}% ({})\n", pred.risk_percentage, pred.risk_level));
    if let Some(age) = pred.age_years {
        out.push_str(&format!("  Age: {} years\n", age));
    }
    if let (Some(hi), Some(lo)) = (pred.bp_systolic, pred.bp_diastolic) {
        out.push_str(&format!("  Blood Pressure: {}/{} mmHg\n", hi, lo));
    }
    CliResult::success(out)
}

async fn execute_server_history(client: &ApiClient, limit: u32, offset: u32) -> CliResult {
    let page = match client.prediction_history(limit, offset).await {
        Ok(page) => page,
        Err(err) => return api_failure("Failed to load server history", err),
    };

    if page.predictions.is_empty() {
        return CliResult::success("No predictions on the server.");
    }

    let mut out = String::new();
    for pred in &page.predictions {
        out.push_str(&format!(
            "{:<32} {:>7.2}%  {:<13} {}\n",
            pred.id,
            pred.risk_percentage,
            pred.risk_level.to_string(),
            pred.timestamp.as_deref().unwrap_or("-")
        ));
    }
    out.push_str(&format!(
        "\nShowing {} of {} server-side predictions{}\n",
        page.returned,
        page.total_records,
        if page.has_more { " (more available)" } else { "" }
    ));
    CliResult::success(out)
}

async fn execute_server_stats(client: &ApiClient) -> CliResult {
    let stats = match client.prediction_stats().await {
        Ok(stats) => stats,
        Err(err) => return api_failure("Failed to load server statistics", err),
    };

    if stats.status == "no_data" {
        return CliResult::success(
            stats
                .message
                .unwrap_or_else(|| "No predictions made yet".to_string()),
        );
    }

    let mut out = String::new();
    out.push_str(&format!("Total Predictions: {}\n", stats.total_predictions));
    out.push_str(&format!(
        "Risk Distribution: {} high / {} moderate / {} low\n",
        stats.risk_distribution.high_risk,
        stats.risk_distribution.moderate_risk,
        stats.risk_distribution.low_risk
    ));
    out.push_str(&format!("Disease Rate: {:.2}%\n", stats.disease_rate));
    if let Some(range) = &stats.risk_percentage_stats {
        out.push_str(&format!(
            "Risk %: min {:.2}  avg {:.2}  max {:.2}\n",
            range.min, range.average, range.max
        ));
    }
    if let Some(range) = &stats.age_stats {
        out.push_str(&format!(
            "Age: min {:.0}  avg {:.1}  max {:.0}\n",
            range.min, range.average, range.max
        ));
    }
    if let Some(range) = &stats.weight_stats {
        out.push_str(&format!(
            "Weight: min {:.1}  avg {:.1}  max {:.1}\n",
            range.min, range.average, range.max
        ));
    }
    CliResult::success(out)
}

async fn execute_clear_server(client: &ApiClient, yes: bool) -> CliResult {
    if !yes {
        return CliResult::error(
            "This clears the server-side prediction history and cannot be undone. Re-run with --yes to confirm.",
        );
    }

    match client.clear_history().await {
        Ok(response) => CliResult::success(response.message),
        Err(err) => api_failure("Failed to clear server history", err),
    }
}
