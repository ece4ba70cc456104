//! Risk classification, recommendations, and unit helpers.
//!
//! The three-way risk bucketing and the advisory messages were historically
//! duplicated per page controller; they live here once and every consumer
//! (CLI rendering, reports, aggregation) imports them.

use serde::{Deserialize, Serialize};

use crate::store::{HealthInput, Level};

/// Days per year used by the dataset's age encoding.
pub const DAYS_PER_YEAR: f64 = 365.25;

/// Risk bucket derived from the risk percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskLevel {
    #[serde(rename = "Low Risk")]
    Low,
    #[serde(rename = "Moderate Risk")]
    Moderate,
    #[serde(rename = "High Risk")]
    High,
}

impl RiskLevel {
    /// Bucket a risk percentage: `< 30` Low, `30 <= x < 60` Moderate, `>= 60` High.
    pub fn classify(percentage: f64) -> Self {
        if percentage < 30.0 {
            RiskLevel::Low
        } else if percentage < 60.0 {
            RiskLevel::Moderate
        } else {
            RiskLevel::High
        }
    }

    /// Display color used by badges and charts.
    pub fn color(&self) -> &'static str {
        match self {
            RiskLevel::Low => "green",
            RiskLevel::Moderate => "orange",
            RiskLevel::High => "red",
        }
    }

    /// CSS class used by the printable report badge.
    pub fn css_class(&self) -> &'static str {
        match self {
            RiskLevel::Low => "risk-low",
            RiskLevel::Moderate => "risk-medium",
            RiskLevel::High => "risk-high",
        }
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RiskLevel::Low => write!(f, "Low Risk"),
            RiskLevel::Moderate => write!(f, "Moderate Risk"),
            RiskLevel::High => write!(f, "High Risk"),
        }
    }
}

impl std::str::FromStr for RiskLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "low risk" | "low" => Ok(RiskLevel::Low),
            "moderate risk" | "moderate" => Ok(RiskLevel::Moderate),
            "high risk" | "high" => Ok(RiskLevel::High),
            _ => Err(format!("Unknown risk level: {}", s)),
        }
    }
}

/// Body mass index from height in cm and weight in kg.
///
/// Returns `None` for non-positive inputs so renderers can fall back to a
/// placeholder instead of printing infinities.
pub fn bmi(height_cm: f64, weight_kg: f64) -> Option<f64> {
    if height_cm <= 0.0 || weight_kg <= 0.0 {
        return None;
    }
    let height_m = height_cm / 100.0;
    Some(weight_kg / (height_m * height_m))
}

/// Convert a dataset age in days to whole years.
pub fn age_days_to_years(days: i64) -> i64 {
    (days as f64 / DAYS_PER_YEAR).round() as i64
}

/// Convert an age in years to the dataset's day encoding.
pub fn age_years_to_days(years: i64) -> i64 {
    (years as f64 * DAYS_PER_YEAR).round() as i64
}

/// Advisory messages for a prediction.
///
/// The baseline messages for the matching risk tier come first, then the
/// input-specific messages in a fixed order: blood pressure, cholesterol,
/// smoking, inactivity, BMI. Consumers rely on this order being stable.
pub fn recommendations(risk_percentage: f64, input: &HealthInput) -> Vec<String> {
    let mut recs: Vec<String> = Vec::new();

    match RiskLevel::classify(risk_percentage) {
        RiskLevel::High => {
            recs.push("High Risk: Please consult with a healthcare professional immediately".into());
            recs.push("Schedule a comprehensive cardiovascular evaluation".into());
            recs.push("Discuss medications or lifestyle modifications with your doctor".into());
        }
        RiskLevel::Moderate => {
            recs.push("Moderate Risk: Consider consulting with a healthcare provider".into());
            recs.push("Monitor your blood pressure regularly".into());
            recs.push("Review and improve your lifestyle habits".into());
        }
        RiskLevel::Low => {
            recs.push("Low Risk: Maintain your current healthy habits".into());
            recs.push("Continue regular exercise and balanced diet".into());
            recs.push("Have regular health check-ups".into());
        }
    }

    if input.ap_hi > 140 || input.ap_lo > 90 {
        recs.push("Your blood pressure is elevated - monitor it regularly".into());
    }

    if input.cholesterol >= Level::AboveNormal {
        recs.push("Consider dietary changes to manage cholesterol levels".into());
    }

    if input.smoke {
        recs.push("Smoking cessation is strongly recommended".into());
    }

    if !input.active {
        recs.push("Increase physical activity - aim for 30 minutes of exercise daily".into());
    }

    if input.weight > 80.0 {
        if let Some(bmi) = bmi(input.height, input.weight) {
            if bmi > 25.0 {
                recs.push(format!(
                    "Your BMI ({:.2}) is above normal - consider weight management",
                    bmi
                ));
            }
        }
    }

    recs
}
