use std::env;
use std::path::PathBuf;

use crate::error::AppError;

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub backend: BackendConfig,
    pub storage: StorageConfig,
    pub logging: LoggingConfig,
}

/// Prediction backend configuration
#[derive(Debug, Clone)]
pub struct BackendConfig {
    pub base_url: String,
}

/// Local storage configuration
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// Directory holding the JSON record files.
    pub data_dir: PathBuf,
    /// Directory exported reports are written to.
    pub report_dir: PathBuf,
}

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

/// Log output format
#[derive(Debug, Clone, PartialEq)]
pub enum LogFormat {
    Pretty,
    Json,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, AppError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let backend = BackendConfig {
            base_url: env::var("CARDIO_API_BASE_URL")
                .unwrap_or_else(|_| "http://localhost:5000/api".to_string()),
        };

        let storage = StorageConfig {
            data_dir: PathBuf::from(
                env::var("CARDIO_DATA_DIR").unwrap_or_else(|_| "./data".to_string()),
            ),
            report_dir: PathBuf::from(
                env::var("CARDIO_REPORT_DIR").unwrap_or_else(|_| "./reports".to_string()),
            ),
        };

        let logging = LoggingConfig {
            level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            format: match env::var("LOG_FORMAT")
                .unwrap_or_else(|_| "pretty".to_string())
                .to_lowercase()
                .as_str()
            {
                "json" => LogFormat::Json,
                _ => LogFormat::Pretty,
            },
        };

        if backend.base_url.is_empty() {
            return Err(AppError::Config {
                message: "CARDIO_API_BASE_URL must not be empty".to_string(),
            });
        }

        Ok(Config {
            backend,
            storage,
            logging,
        })
    }
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000/api".to_string(),
        }
    }
}
