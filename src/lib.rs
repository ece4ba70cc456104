//! # CardioPredict Client
//!
//! A client library and CLI for the CardioPredict cardiovascular-risk
//! prediction backend. It validates health-metric input, calls the backend
//! over HTTP, keeps a local prediction history, and exports prediction
//! reports.
//!
//! ## Features
//!
//! - **API client**: one method per backend endpoint, single attempt per
//!   call, backend error text surfaced verbatim
//! - **Record store**: capped, deduplicated, most-recent-first prediction
//!   history behind a repository trait (in-memory and JSON-file backed)
//! - **Risk module**: shared three-way risk bucketing, recommendations,
//!   BMI and age-unit helpers
//! - **Report renderer**: plain-text, CSV, and printable-HTML reports for
//!   any stored prediction
//!
//! ## Architecture
//!
//! ```text
//! CLI -> ApiClient (HTTP) -> CardioPredict backend
//!   |
//!   +-> RecordStore (JSON files) -> Report renderer
//! ```
//!
//! ## Example
//!
//! ```ignore
//! use cardiopredict::{Config, api::ApiClient, store::FileStore};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::from_env()?;
//!     let store = FileStore::open(&config.storage)?;
//!     let client = ApiClient::new(&config.backend)?;
//!     let stats = client.statistics().await?;
//!     println!("dataset records: {}", stats.total_records);
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]

/// Backend API client and request/response types.
pub mod api;
/// CLI argument parsing and command execution.
pub mod cli;
/// Configuration management.
pub mod config;
/// Error types and result aliases for the application.
pub mod error;
/// Report rendering for stored predictions.
pub mod report;
/// Risk classification, recommendations, and unit helpers.
pub mod risk;
/// Local prediction history storage.
pub mod store;

pub use config::Config;
pub use error::{AppError, AppResult};
pub use risk::RiskLevel;
pub use store::{PredictionRecord, RecordStore};
