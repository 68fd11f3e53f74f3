use anyhow::{Context, Result};
use dotenvy::dotenv;
use std::sync::Arc;

use tubecore::core::init_logger;
use tubecore::{Config, MediaDownloader, QualityCeiling, YtDlp};
use tubepipe::cli::{Cli, Commands};
use tubepipe::{start_server, AppState};

/// Main entry point
///
/// Loads `.env`, layers the configuration, sets up logging and dispatches to
/// the subcommand.
///
/// # Errors
/// Returns an error if the config is invalid, the listener cannot bind, or
/// `check` finds no working yt-dlp.
#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env if present
    let _ = dotenv();

    let cli = Cli::parse_args();
    let config = Config::load(cli.config.as_deref()).context("Failed to load configuration")?;

    init_logger(&config.log_level, config.log_file.as_deref())?;

    config
        .default_quality
        .parse::<QualityCeiling>()
        .with_context(|| format!("Invalid default_quality {:?}", config.default_quality))?;

    let ytdlp = YtDlp::new(config.ytdlp());

    match cli.resolved_command() {
        Commands::Serve { bind } => {
            let addr = bind.unwrap_or(config.bind_addr);
            tracing::info!(ytdlp = %config.ytdlp_path, %addr, default_quality = %config.default_quality, "starting tubepipe");

            if !ytdlp.is_installed().await {
                tracing::warn!("yt-dlp is not available; downloads will fail until it is installed");
            }

            let state = AppState::new(Arc::new(ytdlp), config.default_quality.clone());
            start_server(addr, state).await
        }
        Commands::Check => {
            let version = ytdlp
                .version()
                .await
                .with_context(|| format!("yt-dlp not usable at {:?}", config.ytdlp_path))?;
            println!("yt-dlp {} ({})", version, config.ytdlp_path);
            Ok(())
        }
    }
}
