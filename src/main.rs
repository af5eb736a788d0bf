use anyhow::Result;
use interview_relay::{
    config::{self, ConfigSource},
    server,
};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, filter::LevelFilter};

/// Validates that a log level string is valid
fn validate_log_level(level: &str) -> Result<LevelFilter> {
    level.parse::<LevelFilter>().map_err(|_| {
        anyhow::anyhow!(
            "Invalid log level: '{}'. Valid levels: error, warn, info, debug, trace",
            level
        )
    })
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (before logging setup)
    let (config, source) = match config::load().await {
        Ok(loaded) => loaded,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    // Determine log level: environment variable overrides config
    let env_directives = std::env::var("RUST_LOG").ok();
    let log_level = env_directives
        .clone()
        .unwrap_or_else(|| config.server.logs.level.clone());

    let filter = match env_directives {
        Some(directives) => EnvFilter::try_new(&directives)
            .map_err(|e| anyhow::anyhow!("Invalid RUST_LOG '{}': {}", directives, e)),
        None => validate_log_level(&log_level)
            .map(|level| EnvFilter::default().add_directive(level.into())),
    };
    let filter = match filter {
        Ok(filter) => filter,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .json()
        .init();

    info!("Starting interview relay with log level: {}", log_level);
    match source {
        ConfigSource::File(_) => info!("{}", source),
        ConfigSource::Defaults(_) => warn!("{}", source),
    }

    server::run(config).await?;

    Ok(())
}
