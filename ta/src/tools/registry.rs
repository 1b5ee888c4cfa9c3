//! ToolRegistry - advertises tools to the model and dispatches its calls

use std::collections::BTreeMap;
use std::panic::AssertUnwindSafe;

use futures::FutureExt;
use serde_json::Value;
use tracing::{debug, warn};

use crate::llm::{ToolCall, ToolDefinition};

use super::builtin::{ListDirectoryTool, ReadFileTool, RunScriptTool, WriteFileTool};
use super::{Tool, ToolContext, ToolError, ToolResult};

/// Argument the model may try to pass; the root always comes from the context
const ROOT_ARGUMENT: &str = "working_directory";

/// Name to tool mapping, built once at startup
pub struct ToolRegistry {
    tools: BTreeMap<String, Box<dyn Tool>>,
}

impl ToolRegistry {
    /// Registry with the four built-in tools
    pub fn standard() -> Self {
        debug!("ToolRegistry::standard: called");
        let mut registry = Self::empty();
        registry.add_tool(Box::new(ListDirectoryTool));
        registry.add_tool(Box::new(ReadFileTool));
        registry.add_tool(Box::new(RunScriptTool));
        registry.add_tool(Box::new(WriteFileTool));
        registry
    }

    /// Create an empty registry (for testing)
    pub fn empty() -> Self {
        debug!("ToolRegistry::empty: called");
        Self { tools: BTreeMap::new() }
    }

    /// Add a tool, replacing any tool with the same name
    pub fn add_tool(&mut self, tool: Box<dyn Tool>) {
        debug!(tool_name = %tool.name(), "ToolRegistry::add_tool: called");
        self.tools.insert(tool.name().to_string(), tool);
    }

    /// Tool definitions for the model, ordered by name
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        debug!("ToolRegistry::definitions: called");
        self.tools
            .values()
            .map(|t| ToolDefinition {
                name: t.name().to_string(),
                description: t.description().to_string(),
                input_schema: t.input_schema(),
            })
            .collect()
    }

    /// Dispatch one tool call
    ///
    /// Never fails: unknown tools, tool errors and panics all come back as an
    /// `Error:`-prefixed result the model can read and recover from.
    pub async fn dispatch(&self, call: &ToolCall, ctx: &ToolContext) -> ToolResult {
        debug!(tool_name = %call.name, tool_id = %call.id, "ToolRegistry::dispatch: called");
        let Some(tool) = self.tools.get(&call.name) else {
            debug!("ToolRegistry::dispatch: unknown tool");
            return ToolResult::error(ToolError::UnknownTool {
                name: call.name.clone(),
            });
        };

        let input = scrub_arguments(call.input.clone());
        let outcome = AssertUnwindSafe(tool.execute(input, ctx)).catch_unwind().await;

        match outcome {
            Ok(Ok(content)) => {
                debug!(content_len = content.len(), "ToolRegistry::dispatch: tool succeeded");
                ToolResult::success(content)
            }
            Ok(Err(e)) => {
                debug!(%e, "ToolRegistry::dispatch: tool returned error");
                ToolResult::error(e)
            }
            Err(panic) => {
                let message = panic_message(panic.as_ref());
                warn!(tool_name = %call.name, %message, "ToolRegistry::dispatch: tool panicked");
                ToolResult::error(ToolError::HandlerFault {
                    name: call.name.clone(),
                    message,
                })
            }
        }
    }

    /// One `- name: description` line per tool
    pub fn summary(&self) -> String {
        self.tools
            .values()
            .map(|t| format!("- {}: {}", t.name(), t.description()))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::standard()
    }
}

/// Drop any model-supplied root and treat a missing argument object as empty
fn scrub_arguments(input: Value) -> Value {
    match input {
        Value::Object(mut map) => {
            if map.remove(ROOT_ARGUMENT).is_some() {
                warn!("ToolRegistry::dispatch: ignoring model-supplied working_directory");
            }
            Value::Object(map)
        }
        Value::Null => Value::Object(Default::default()),
        other => other,
    }
}

fn panic_message(panic: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
