//! Tool trait definition

use std::fmt::Display;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use super::ToolError;
use super::context::ToolContext;

/// Prefix the model (and callers) branch on to detect a failed tool call
pub const ERROR_PREFIX: &str = "Error:";

/// A tool that can be called by the LLM
#[async_trait]
pub trait Tool: Send + Sync {
    /// Tool name (matches the function name the model calls)
    fn name(&self) -> &'static str;

    /// Human-readable description
    fn description(&self) -> &'static str;

    /// JSON Schema for input parameters
    fn input_schema(&self) -> Value;

    /// Execute the tool against the session's working root
    async fn execute(&self, input: Value, ctx: &ToolContext) -> Result<String, ToolError>;
}

/// Deserialize a tool's JSON arguments into its typed argument struct
pub fn parse_args<T: DeserializeOwned>(tool: &str, input: Value) -> Result<T, ToolError> {
    serde_json::from_value(input).map_err(|e| ToolError::InvalidArgument {
        tool: tool.to_string(),
        message: e.to_string(),
    })
}

/// Result of a tool execution, as text handed back to the model
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolResult {
    pub content: String,
    pub is_error: bool,
}

impl ToolResult {
    /// Create a successful result
    pub fn success(content: impl Into<String>) -> Self {
        debug!("ToolResult::success: called");
        Self {
            content: content.into(),
            is_error: false,
        }
    }

    /// Create an error result, prefixed with `Error:`
    pub fn error(err: impl Display) -> Self {
        debug!("ToolResult::error: called");
        Self {
            content: format!("{} {}", ERROR_PREFIX, err),
            is_error: true,
        }
    }
}
