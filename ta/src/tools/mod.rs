//! Sandboxed tool system
//!
//! Tools give the model directory listing, file read/write and script
//! execution. Every call receives the session's `ToolContext` and every path
//! goes through [`guard::resolve`], so nothing a tool touches can sit outside
//! the working root.

mod context;
mod error;
mod registry;
mod traits;

pub mod builtin;
pub mod guard;

pub use context::{DEFAULT_MAX_CHARS, DEFAULT_SCRIPT_TIMEOUT, RunnerSettings, ToolContext};
pub use error::ToolError;
pub use guard::ConfinementError;
pub use registry::ToolRegistry;
pub use traits::{ERROR_PREFIX, Tool, ToolResult, parse_args};
