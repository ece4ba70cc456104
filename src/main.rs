use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cardiopredict::{
    api::ApiClient,
    cli::{self, Cli},
    config::Config,
    store::FileStore,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Cli::parse();

    // Load configuration
    let config = match Config::from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    // Initialize logging
    init_logging(&config);

    info!(
        version = env!("CARGO_PKG_VERSION"),
        "CardioPredict client starting..."
    );

    // Open the local record store
    let store = match FileStore::open(&config.storage) {
        Ok(s) => {
            info!(dir = %config.storage.data_dir.display(), "Record store opened");
            s
        }
        Err(e) => {
            error!(error = %e, "Failed to open record store");
            return Err(e.into());
        }
    };

    // Initialize the backend client
    let client = match ApiClient::new(&config.backend) {
        Ok(c) => {
            info!(base_url = %config.backend.base_url, "Backend client initialized");
            c
        }
        Err(e) => {
            error!(error = %e, "Failed to initialize backend client");
            return Err(e.into());
        }
    };

    let result = cli::execute(args.command, &store, &client, &config).await;
    println!("{}", result.message.trim_end());

    if result.exit_code != 0 {
        std::process::exit(result.exit_code);
    }
    Ok(())
}

/// Initialize tracing/logging
fn init_logging(config: &Config) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format {
        cardiopredict::config::LogFormat::Json => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().json().with_writer(std::io::stderr))
                .init();
        }
        cardiopredict::config::LogFormat::Pretty => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().with_writer(std::io::stderr))
                .init();
        }
    }
}
