//! ToolContext - execution context for tools

use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

use super::guard;

/// Default read budget for `get_file_content`
pub const DEFAULT_MAX_CHARS: usize = 10_000;

/// Default wall-clock budget for a script run
pub const DEFAULT_SCRIPT_TIMEOUT: Duration = Duration::from_secs(30);

/// How scripts are launched by the run tool
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunnerSettings {
    /// Interpreter executable (looked up on PATH)
    pub interpreter: String,

    /// Required script extension, without the dot
    pub extension: String,

    /// Language label used in messages ("Python")
    pub language: String,

    /// Hard timeout; the child is killed when it elapses
    pub timeout: Duration,
}

impl Default for RunnerSettings {
    fn default() -> Self {
        Self {
            interpreter: "python3".to_string(),
            extension: "py".to_string(),
            language: "Python".to_string(),
            timeout: DEFAULT_SCRIPT_TIMEOUT,
        }
    }
}

/// Execution context for tools - fixed for the whole session
///
/// Every tool invocation receives the same `ToolContext`. The working root
/// is set once here and never taken from tool arguments, so the model cannot
/// move the sandbox boundary.
#[derive(Debug, Clone)]
pub struct ToolContext {
    /// Working root - all file ops constrained here
    root: PathBuf,

    /// Character budget for file reads
    pub max_chars: usize,

    /// Script runner configuration
    pub runner: RunnerSettings,
}

impl ToolContext {
    /// Create a new tool context rooted at `root`
    pub fn new(root: impl AsRef<Path>) -> Self {
        let root = guard::normalize(root.as_ref());
        debug!(?root, "ToolContext::new: called");
        Self {
            root,
            max_chars: DEFAULT_MAX_CHARS,
            runner: RunnerSettings::default(),
        }
    }

    /// Builder method to set the read budget
    pub fn with_max_chars(mut self, max_chars: usize) -> Self {
        debug!(max_chars, "ToolContext::with_max_chars: called");
        self.max_chars = max_chars;
        self
    }

    /// Builder method to set the script runner
    pub fn with_runner(mut self, runner: RunnerSettings) -> Self {
        debug!(?runner, "ToolContext::with_runner: called");
        self.runner = runner;
        self
    }

    /// The session's working root
    pub fn root(&self) -> &Path {
        &self.root
    }
}
