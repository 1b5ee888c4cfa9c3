//! Toolagent - a tool-calling LLM agent confined to one directory
//!
//! The model is given four tools (list a directory, read a file, write a
//! file, run a script) and a working root. Every path it supplies is resolved
//! against that root and rejected if it escapes; scripts run under a hard
//! timeout. The agent loop alternates model calls and tool dispatch until the
//! model answers or the iteration cap is hit.
//!
//! # Modules
//!
//! - [`tools`] - Sandboxed tools, path confinement and the tool registry
//! - [`r#loop`] - Agent loop state machine
//! - [`llm`] - LLM client trait and OpenAI implementation
//! - [`prompts`] - System prompt loading and rendering
//! - [`session`] - Per-session JSON log
//! - [`config`] - Configuration types and loading
//! - [`cli`] - Command-line interface

pub mod cli;
pub mod config;
pub mod llm;
pub mod prompts;
pub mod session;
pub mod tools;

// Note: 'loop' is a reserved keyword, so we use r#loop
#[path = "loop/mod.rs"]
pub mod r#loop;

// Re-export commonly used types
pub use config::{Config, LlmConfig};
pub use llm::{CompletionRequest, CompletionResponse, LlmClient, LlmError, OpenAIClient, ToolCall, create_client};
pub use prompts::{PromptLoader, PromptVars};
pub use r#loop::{AgentLoop, IterationExhausted, LoopConfig, LoopOutcome, LoopState};
pub use session::{SessionLog, SessionStatus};
pub use tools::{Tool, ToolContext, ToolError, ToolRegistry, ToolResult};
