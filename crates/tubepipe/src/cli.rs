use clap::{Parser, Subcommand};
use std::net::SocketAddr;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "tubepipe")]
#[command(author, version, about = "Streams yt-dlp downloads straight to the browser", long_about = None)]
pub struct Cli {
    /// Config file (default: ./tubepipe.toml if present)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Run the HTTP server (default)
    Serve {
        /// Listen address, overrides the configured one
        #[arg(short, long)]
        bind: Option<SocketAddr>,
    },

    /// Check that yt-dlp is installed and print its version
    Check,
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// The subcommand to run, `serve` when none was given.
    pub fn resolved_command(&self) -> Commands {
        self.command.clone().unwrap_or(Commands::Serve { bind: None })
    }
}
