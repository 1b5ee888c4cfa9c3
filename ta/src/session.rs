//! Session log - one JSON file per run
//!
//! Written once, after the agent loop terminates. Nothing in-process reads it
//! back.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use eyre::{Context, Result};
use serde::Serialize;
use tracing::{debug, info};

use crate::llm::TokenUsage;
use crate::r#loop::LoopOutcome;

/// How the session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    /// The model produced a final answer
    Done,
    /// The iteration cap was reached without one
    Exhausted,
}

impl From<&LoopOutcome> for SessionStatus {
    fn from(outcome: &LoopOutcome) -> Self {
        match outcome {
            LoopOutcome::Done { .. } => SessionStatus::Done,
            LoopOutcome::Exhausted { .. } => SessionStatus::Exhausted,
        }
    }
}

/// Token counts; null when the provider never reported usage
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct UsageRecord {
    pub prompt_tokens: Option<u64>,
    pub completion_tokens: Option<u64>,
}

impl From<Option<TokenUsage>> for UsageRecord {
    fn from(usage: Option<TokenUsage>) -> Self {
        Self {
            prompt_tokens: usage.map(|u| u.prompt_tokens),
            completion_tokens: usage.map(|u| u.completion_tokens),
        }
    }
}

/// Everything recorded about one session
#[derive(Debug, Clone, Serialize)]
pub struct SessionLog {
    #[serde(serialize_with = "serialize_rfc3339")]
    pub timestamp: DateTime<Local>,
    pub model: String,
    pub system_prompt: String,
    pub prompt: String,
    pub response: Option<String>,
    pub status: SessionStatus,
    pub iterations: u32,
    pub usage: UsageRecord,
}

fn serialize_rfc3339<S: serde::Serializer>(ts: &DateTime<Local>, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&ts.to_rfc3339())
}

impl SessionLog {
    /// File name for this session, e.g. `2025-01-31_14-05-09_session.json`
    pub fn file_name(&self) -> String {
        format!("{}_session.json", self.timestamp.format("%Y-%m-%d_%H-%M-%S"))
    }

    /// Write the log into `dir`, creating it if needed; returns the file path
    pub fn write_to(&self, dir: &Path) -> Result<PathBuf> {
        debug!(?dir, "SessionLog::write_to: called");
        std::fs::create_dir_all(dir).context(format!("Failed to create session log directory {}", dir.display()))?;

        let path = dir.join(self.file_name());
        let json = serde_json::to_string_pretty(self).context("Failed to serialize session log")?;
        std::fs::write(&path, json).context(format!("Failed to write session log {}", path.display()))?;

        info!("Session log written to {}", path.display());
        Ok(path)
    }
}
