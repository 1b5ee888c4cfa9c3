//! CLI argument definitions

use clap::Parser;
use std::path::PathBuf;

/// Prompt used when --query is not given
pub const DEFAULT_QUERY: &str = "What are often overlooked tips for AI engineering? Use one paragraph maximum.";

/// Toolagent - a tool-calling LLM agent confined to one working directory
#[derive(Debug, Parser)]
#[command(
    name = "ta",
    about = "Ask a model a question and let it list, read, write and run files in its working directory",
    version
)]
pub struct Cli {
    /// Prompt sent to the model
    #[arg(long, default_value = DEFAULT_QUERY, help = "Prompt sent to the model")]
    pub query: String,

    /// Print per-iteration diagnostics (tool calls, results, token counts)
    #[arg(long, help = "Print per-iteration diagnostics")]
    pub verbose: bool,

    /// Path to config file
    #[arg(short, long, help = "Path to config file")]
    pub config: Option<PathBuf>,

    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    #[arg(short = 'l', long = "log-level", help = "Log level (TRACE, DEBUG, INFO, WARN, ERROR)")]
    pub log_level: Option<String>,
}

/// Directory the diagnostic log file is written to
pub fn log_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("toolagent")
        .join("logs")
}

/// Full path of the diagnostic log file
pub fn log_path() -> PathBuf {
    log_dir().join("toolagent.log")
}

/// Help footer pointing at the log file
pub fn generate_after_help() -> String {
    format!("Logs are written to: {}", log_path().display())
}
