//! Command-line flags

use clap::Parser;
use session_core::TimeMode;
use std::path::PathBuf;

/// Play White against a best-move service
#[derive(Parser, Debug)]
#[command(name = "chess_session")]
#[command(about = "Play White against a best-move service", long_about = None)]
#[command(version)]
pub struct Cli {
    /// TOML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Best-move service base URL, overrides the config file
    #[arg(short, long)]
    pub url: Option<String>,

    /// Time mode for the first game: unlimited, blitz, rapid or classical
    #[arg(short, long)]
    pub mode: Option<TimeMode>,

    /// Seconds the service may think per move
    #[arg(long)]
    pub time_limit: Option<f64>,
}
