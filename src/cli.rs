use std::path::PathBuf;

use clap::Parser;

/// Summarize the recent public activity of a GitHub user
#[derive(Debug, Clone, Parser)]
#[command(name = "gh-activity", version, about)]
pub struct Cli {
    /// GitHub user name
    pub username: String,

    /// API base URL, overriding the configuration file
    #[arg(long)]
    pub base_url: Option<String>,

    /// Configuration file path
    #[arg(long, short)]
    pub config: Option<PathBuf>,

    /// Write raw API responses to the debug log directory
    #[arg(long)]
    pub debug: bool,
}
