//! Logging initialization
//!
//! Console output always, plus an optional plain-text log file. The filter
//! comes from `RUST_LOG` when set, otherwise from the configured level.

use anyhow::Result;
use std::fs::File;
use std::path::Path;
use std::sync::Arc;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Build the env filter: `RUST_LOG` wins over the configured default.
fn build_filter(default_level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Initialize the global tracing subscriber.
///
/// # Arguments
/// * `level` - Filter directive used when `RUST_LOG` is not set
/// * `log_file_path` - Optional file that receives a copy of every event
///
/// # Returns
/// * `Ok(())` - Logger initialized successfully
/// * `Err(anyhow::Error)` - Log file could not be created or a subscriber is already set
pub fn init_logger(level: &str, log_file_path: Option<&Path>) -> Result<()> {
    let file_layer = match log_file_path {
        Some(path) => {
            let file = File::create(path).map_err(|e| anyhow::anyhow!("Failed to create log file: {}", e))?;
            Some(fmt::layer().with_ansi(false).with_writer(Arc::new(file)))
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(build_filter(level))
        .with(fmt::layer().with_target(false))
        .with(file_layer)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logger: {}", e))?;

    Ok(())
}
