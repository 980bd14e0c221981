mod app;
mod dialogs;
mod effects;
mod logging;
mod ui;

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

pub use app::run_app;
pub use logging::LogDestination;

/// How the shell reaches the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum TransportKind {
    /// Through the host bridge gateway, as plain JSON requests.
    #[default]
    Bridge,
    /// Straight to the API client.
    Direct,
}

/// Terminal client for the Contents Lenz summarization API.
#[derive(Debug, Parser)]
#[command(name = "lenz", version, about)]
pub struct Cli {
    /// API base URL; overrides the saved endpoint.
    #[arg(long, value_name = "URL")]
    pub api_url: Option<String>,

    /// Settings file (default: ~/.config/contents-lenz/settings.json).
    #[arg(long, value_name = "PATH")]
    pub settings: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = TransportKind::Bridge)]
    pub transport: TransportKind,

    /// Where log lines go.
    #[arg(long, value_enum, default_value_t = LogDestination::File)]
    pub log: LogDestination,

    #[arg(long, value_name = "PATH", default_value = logging::DEFAULT_LOG_FILE)]
    pub log_file: PathBuf,

    /// Log at debug level.
    #[arg(short, long)]
    pub verbose: bool,
}
