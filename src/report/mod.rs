//! Report rendering for stored predictions.
//!
//! One record renders three ways: a fixed-layout plain-text report, a flat
//! `Field,Value` CSV, and a standalone printable HTML document. All three
//! are pure functions of the record and a generation timestamp; the write
//! helpers stamp the current time and place files under the report
//! directory as `Cardio_Prediction_<id>_<date>.<ext>`.

use std::fmt::Write as _;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local, NaiveDate};

use crate::store::PredictionRecord;

/// Placeholder for absent patient metadata in the text report.
const NOT_PROVIDED: &str = "Not Provided";

/// Placeholder for values that cannot be computed or are absent in the CSV.
const NA: &str = "N/A";

/// Report file name: `Cardio_Prediction_<id>_<ISO-date>.<ext>`.
pub fn file_name(prediction_id: &str, date: NaiveDate, ext: &str) -> String {
    format!(
        "Cardio_Prediction_{}_{}.{}",
        prediction_id,
        date.format("%Y-%m-%d"),
        ext
    )
}

fn or_placeholder<'a>(value: &'a Option<String>, placeholder: &'a str) -> &'a str {
    value
        .as_deref()
        .filter(|s| !s.is_empty())
        .unwrap_or(placeholder)
}

fn yes_no(value: bool) -> &'static str {
    if value {
        "Yes"
    } else {
        "No"
    }
}

fn bmi_text(record: &PredictionRecord) -> String {
    record
        .bmi()
        .map(|bmi| format!("{:.2}", bmi))
        .unwrap_or_else(|| NA.to_string())
}

/// Fixed-layout plain-text report.
pub fn text_report(record: &PredictionRecord, generated_at: DateTime<Local>) -> String {
    let health = &record.health;
    let patient = &record.patient;

    let mut out = String::new();
    let _ = writeln!(out, "CARDIOVASCULAR DISEASE PREDICTION REPORT");
    let _ = writeln!(out, "==========================================");
    let _ = writeln!(out, "Generated: {}", generated_at.format("%Y-%m-%d %H:%M:%S"));
    let _ = writeln!(out, "Report ID: {}", record.prediction_id);
    let _ = writeln!(out);
    let _ = writeln!(out, "PATIENT INFORMATION");
    let _ = writeln!(out, "-------------------");
    let _ = writeln!(out, "Patient Name: {}", or_placeholder(&patient.patient_name, NOT_PROVIDED));
    let _ = writeln!(out, "Father's Name: {}", or_placeholder(&patient.father_name, NOT_PROVIDED));
    let _ = writeln!(out, "Blood Group: {}", or_placeholder(&patient.blood_group, NOT_PROVIDED));
    let _ = writeln!(out, "Phone Number: {}", or_placeholder(&patient.phone_number, NOT_PROVIDED));
    let _ = writeln!(out, "Alternative Phone: {}", or_placeholder(&patient.alt_phone_number, NOT_PROVIDED));
    let _ = writeln!(out, "Reference Doctor: {}", or_placeholder(&patient.doctor_name, NOT_PROVIDED));
    let _ = writeln!(out);
    let _ = writeln!(out, "PREDICTION RESULTS");
    let _ = writeln!(out, "------------------");
    let _ = writeln!(out, "Risk Level: {}", record.risk_level);
    let _ = writeln!(out, "Disease Risk Percentage: {:.2}%", record.risk_percentage);
    let _ = writeln!(out, "Disease Probability: {:.2}%", record.disease_probability * 100.0);
    let _ = writeln!(out, "Healthy Probability: {:.2}%", record.healthy_probability * 100.0);
    let _ = writeln!(
        out,
        "Prediction: {}",
        if record.has_disease {
            "HIGH RISK - Disease Likely"
        } else {
            "LOW RISK - Healthy"
        }
    );
    let _ = writeln!(out);
    let _ = writeln!(out, "HEALTH PARAMETERS");
    let _ = writeln!(out, "-----------------");
    let _ = writeln!(out, "Age: {} years", health.age);
    let _ = writeln!(out, "Gender: {}", health.gender);
    let _ = writeln!(out, "Height: {} cm", health.height);
    let _ = writeln!(out, "Weight: {} kg", health.weight);
    let _ = writeln!(out, "BMI: {} kg/m2", bmi_text(record));
    let _ = writeln!(out, "Systolic BP: {} mmHg", health.ap_hi);
    let _ = writeln!(out, "Diastolic BP: {} mmHg", health.ap_lo);
    let _ = writeln!(out, "Cholesterol Level: {}", health.cholesterol.code());
    let _ = writeln!(out, "Glucose Level: {}", health.gluc.code());
    let _ = writeln!(out, "Smoker: {}", yes_no(health.smoke));
    let _ = writeln!(out, "Alcohol Consumption: {}", yes_no(health.alco));
    let _ = writeln!(out, "Physically Active: {}", yes_no(health.active));
    let _ = writeln!(out);
    let _ = writeln!(out, "RECOMMENDATIONS");
    let _ = writeln!(out, "----------------");
    let _ = writeln!(out, "1. Consult with a healthcare professional about your results");
    let _ = writeln!(out, "2. Follow doctor's advice for lifestyle modifications");
    let _ = writeln!(out, "3. Maintain regular health check-ups");
    let _ = writeln!(out, "4. Monitor your vital parameters regularly");
    let _ = writeln!(out);
    let _ = writeln!(out, "Report generated by: CardioPredict v2.0");
    out
}

/// Flat `Field,Value` CSV covering the same data as the text report.
///
/// Embedded commas in values are not quoted; spreadsheet imports of
/// comma-bearing free text will split. Carried over as a known limitation.
pub fn csv_report(record: &PredictionRecord, generated_at: DateTime<Local>) -> String {
    let health = &record.health;
    let patient = &record.patient;

    let mut out = String::new();
    let _ = writeln!(out, "Field,Value");
    let _ = writeln!(out, "Prediction ID,{}", record.prediction_id);
    let _ = writeln!(out, "Patient Name,{}", or_placeholder(&patient.patient_name, NA));
    let _ = writeln!(out, "Father's Name,{}", or_placeholder(&patient.father_name, NA));
    let _ = writeln!(out, "Blood Group,{}", or_placeholder(&patient.blood_group, NA));
    let _ = writeln!(out, "Phone Number,{}", or_placeholder(&patient.phone_number, NA));
    let _ = writeln!(out, "Reference Doctor,{}", or_placeholder(&patient.doctor_name, NA));
    let _ = writeln!(out, "Generated Date,{}", generated_at.format("%Y-%m-%d %H:%M:%S"));
    let _ = writeln!(out, ",");
    let _ = writeln!(out, "Age (years),{}", health.age);
    let _ = writeln!(out, "Gender,{}", health.gender);
    let _ = writeln!(out, "Height (cm),{}", health.height);
    let _ = writeln!(out, "Weight (kg),{}", health.weight);
    let _ = writeln!(out, "BMI,{}", bmi_text(record));
    let _ = writeln!(out, "Systolic BP,{}", health.ap_hi);
    let _ = writeln!(out, "Diastolic BP,{}", health.ap_lo);
    let _ = writeln!(out, "Cholesterol,{}", health.cholesterol.code());
    let _ = writeln!(out, "Glucose,{}", health.gluc.code());
    let _ = writeln!(out, "Smoker,{}", yes_no(health.smoke));
    let _ = writeln!(out, "Alcohol,{}", yes_no(health.alco));
    let _ = writeln!(out, "Active,{}", yes_no(health.active));
    let _ = writeln!(out, ",");
    let _ = writeln!(out, "Risk Level,{}", record.risk_level);
    let _ = writeln!(out, "Risk Percentage,{:.2}%", record.risk_percentage);
    let _ = writeln!(out, "Disease Probability,{:.2}%", record.disease_probability * 100.0);
    let _ = writeln!(out, "Healthy Probability,{:.2}%", record.healthy_probability * 100.0);
    let _ = writeln!(
        out,
        "Prediction,{}",
        if record.has_disease { "High Risk" } else { "Healthy" }
    );
    out
}

const HTML_STYLE: &str = r#"        * { margin: 0; padding: 0; box-sizing: border-box; }
        body { font-family: Arial, sans-serif; padding: 20px; background: white; }
        .header { text-align: center; margin-bottom: 30px; border-bottom: 2px solid #FF6B6B; padding-bottom: 15px; }
        h1 { color: #2c3e50; }
        .section { margin: 20px 0; }
        .section-title { background: #FF6B6B; color: white; padding: 10px; font-weight: bold; margin-bottom: 10px; }
        table { width: 100%; border-collapse: collapse; margin: 10px 0; }
        td { padding: 8px; border: 1px solid #ddd; }
        .label { font-weight: bold; width: 40%; }
        .risk-high { color: red; font-weight: bold; }
        .risk-medium { color: orange; font-weight: bold; }
        .risk-low { color: green; font-weight: bold; }
        .footer { margin-top: 30px; text-align: center; font-size: 12px; color: #999; }
        @media print {
            body { padding: 0; }
            .no-print { display: none; }
        }"#;

fn html_row(out: &mut String, label: &str, value: impl std::fmt::Display) {
    let _ = writeln!(
        out,
        "            <tr><td class=\"label\">{}</td><td>{}</td></tr>",
        label, value
    );
}

/// Standalone printable HTML document with a risk-colored badge.
///
/// The embedded script triggers the browser's print dialog shortly after the
/// document opens, once layout has settled.
pub fn html_report(record: &PredictionRecord, generated_at: DateTime<Local>) -> String {
    let health = &record.health;
    let patient = &record.patient;

    let mut out = String::new();
    let _ = writeln!(out, "<!DOCTYPE html>");
    let _ = writeln!(out, "<html>");
    let _ = writeln!(out, "<head>");
    let _ = writeln!(out, "    <title>CardioPredict Report - {}</title>", record.prediction_id);
    let _ = writeln!(out, "    <style>");
    let _ = writeln!(out, "{}", HTML_STYLE);
    let _ = writeln!(out, "    </style>");
    let _ = writeln!(out, "</head>");
    let _ = writeln!(out, "<body>");
    let _ = writeln!(out, "    <div class=\"header\">");
    let _ = writeln!(out, "        <h1>CardioPredict Report</h1>");
    let _ = writeln!(out, "        <p>Cardiovascular Disease Prediction Analysis</p>");
    let _ = writeln!(out, "        <p>Generated: {}</p>", generated_at.format("%Y-%m-%d %H:%M:%S"));
    let _ = writeln!(out, "        <p>Report ID: {}</p>", record.prediction_id);
    let _ = writeln!(out, "    </div>");

    let _ = writeln!(out, "    <div class=\"section\">");
    let _ = writeln!(out, "        <div class=\"section-title\">PATIENT INFORMATION</div>");
    let _ = writeln!(out, "        <table>");
    html_row(&mut out, "Patient Name", or_placeholder(&patient.patient_name, NOT_PROVIDED));
    html_row(&mut out, "Father's Name", or_placeholder(&patient.father_name, NOT_PROVIDED));
    html_row(&mut out, "Blood Group", or_placeholder(&patient.blood_group, NOT_PROVIDED));
    html_row(&mut out, "Phone Number", or_placeholder(&patient.phone_number, NOT_PROVIDED));
    html_row(&mut out, "Alternative Phone", or_placeholder(&patient.alt_phone_number, NOT_PROVIDED));
    html_row(&mut out, "Reference Doctor", or_placeholder(&patient.doctor_name, NOT_PROVIDED));
    let _ = writeln!(out, "        </table>");
    let _ = writeln!(out, "    </div>");

    let _ = writeln!(out, "    <div class=\"section\">");
    let _ = writeln!(out, "        <div class=\"section-title\">PREDICTION RESULTS</div>");
    let _ = writeln!(out, "        <table>");
    let _ = writeln!(
        out,
        "            <tr><td class=\"label\">Risk Assessment</td><td class=\"{}\">{}</td></tr>",
        record.risk_level.css_class(),
        record.risk_level
    );
    html_row(&mut out, "Risk Percentage", format!("{:.2}%", record.risk_percentage));
    html_row(&mut out, "Disease Probability", format!("{:.2}%", record.disease_probability * 100.0));
    html_row(&mut out, "Healthy Probability", format!("{:.2}%", record.healthy_probability * 100.0));
    let _ = writeln!(out, "        </table>");
    let _ = writeln!(out, "    </div>");

    let _ = writeln!(out, "    <div class=\"section\">");
    let _ = writeln!(out, "        <div class=\"section-title\">HEALTH PARAMETERS</div>");
    let _ = writeln!(out, "        <table>");
    html_row(&mut out, "Age", format!("{} years", health.age));
    html_row(&mut out, "Gender", health.gender);
    html_row(&mut out, "Height", format!("{} cm", health.height));
    html_row(&mut out, "Weight", format!("{} kg", health.weight));
    html_row(&mut out, "BMI", format!("{} kg/m2", bmi_text(record)));
    html_row(&mut out, "Blood Pressure", format!("{}/{} mmHg", health.ap_hi, health.ap_lo));
    html_row(&mut out, "Cholesterol", health.cholesterol.code());
    html_row(&mut out, "Glucose", health.gluc.code());
    html_row(&mut out, "Smoker", yes_no(health.smoke));
    html_row(&mut out, "Alcohol", yes_no(health.alco));
    html_row(&mut out, "Physically Active", yes_no(health.active));
    let _ = writeln!(out, "        </table>");
    let _ = writeln!(out, "    </div>");

    let _ = writeln!(out, "    <div class=\"footer\">");
    let _ = writeln!(out, "        <p>This report is generated by CardioPredict v2.0 - Cardiovascular Disease Prediction System</p>");
    let _ = writeln!(out, "        <p>Disclaimer: This is an AI-based assessment and should not replace professional medical advice.</p>");
    let _ = writeln!(out, "        <p>Always consult with a qualified healthcare professional for proper diagnosis and treatment.</p>");
    let _ = writeln!(out, "    </div>");

    let _ = writeln!(out, "    <div class=\"no-print\" style=\"text-align: center; margin-top: 20px;\">");
    let _ = writeln!(out, "        <button onclick=\"window.print()\">Print</button>");
    let _ = writeln!(out, "        <button onclick=\"window.close()\">Close</button>");
    let _ = writeln!(out, "    </div>");

    let _ = writeln!(out, "    <script>setTimeout(function () {{ window.print(); }}, 250);</script>");
    let _ = writeln!(out, "</body>");
    let _ = writeln!(out, "</html>");
    out
}

fn write_report(
    dir: &Path,
    record: &PredictionRecord,
    ext: &str,
    render: impl Fn(&PredictionRecord, DateTime<Local>) -> String,
) -> io::Result<PathBuf> {
    fs::create_dir_all(dir)?;
    let now = Local::now();
    let path = dir.join(file_name(&record.prediction_id, now.date_naive(), ext));
    fs::write(&path, render(record, now))?;
    Ok(path)
}

/// Write the plain-text report, returning the file path.
pub fn write_text_report(dir: &Path, record: &PredictionRecord) -> io::Result<PathBuf> {
    write_report(dir, record, "txt", text_report)
}

/// Write the CSV report, returning the file path.
pub fn write_csv_report(dir: &Path, record: &PredictionRecord) -> io::Result<PathBuf> {
    write_report(dir, record, "csv", csv_report)
}

/// Write the printable HTML report, returning the file path.
pub fn write_html_report(dir: &Path, record: &PredictionRecord) -> io::Result<PathBuf> {
    write_report(dir, record, "html", html_report)
}
