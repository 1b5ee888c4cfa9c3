//! run_python_file tool - execute a script under the working root

use std::fmt;
use std::path::Path;
use std::process::Stdio;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::tools::guard::resolve;
use crate::tools::{RunnerSettings, Tool, ToolContext, ToolError, parse_args};

/// Captured result of a finished script run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionReport {
    /// `None` when the process was terminated by a signal
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl fmt::Display for ExecutionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.stdout.is_empty() && self.stderr.is_empty() {
            return write!(f, "No output produced");
        }

        let mut parts = Vec::new();
        match self.exit_code {
            Some(0) => {}
            Some(code) => parts.push(format!("Process exited with code {}", code)),
            None => parts.push("Process terminated by signal".to_string()),
        }
        if !self.stdout.is_empty() {
            parts.push(format!("STDOUT:\n{}", self.stdout));
        }
        if !self.stderr.is_empty() {
            parts.push(format!("STDERR:\n{}", self.stderr));
        }

        write!(f, "{}", parts.join("\n"))
    }
}

/// Run `relative` under `root` with the configured interpreter
///
/// The child runs with `root` as its working directory and is killed if it
/// outlives `runner.timeout`; nothing it printed is reported in that case.
pub async fn run_script(
    root: &Path,
    relative: &str,
    args: &[String],
    runner: &RunnerSettings,
) -> Result<ExecutionReport, ToolError> {
    debug!(?root, %relative, ?args, "run_script: called");
    let target = resolve(root, relative).map_err(|e| ToolError::outside("execute", e))?;

    let is_file = tokio::fs::metadata(&target).await.map(|m| m.is_file()).unwrap_or(false);
    if !is_file {
        debug!(?target, "run_script: missing or not a regular file");
        return Err(ToolError::NotFound {
            path: relative.to_string(),
        });
    }

    let has_extension = target
        .extension()
        .is_some_and(|ext| ext.to_string_lossy() == runner.extension);
    if !has_extension {
        debug!(?target, extension = %runner.extension, "run_script: wrong file type");
        return Err(ToolError::WrongFileType {
            path: relative.to_string(),
            language: runner.language.clone(),
        });
    }

    debug!(interpreter = %runner.interpreter, "run_script: spawning process");
    let child = tokio::process::Command::new(&runner.interpreter)
        .arg(&target)
        .args(args)
        .current_dir(root)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
        .map_err(|source| ToolError::Spawn {
            language: runner.language.clone(),
            source,
        })?;

    // Dropping the future on timeout drops the child, and kill_on_drop reaps it
    let output = match tokio::time::timeout(runner.timeout, child.wait_with_output()).await {
        Ok(Ok(output)) => {
            debug!(status = ?output.status, "run_script: process completed");
            output
        }
        Ok(Err(source)) => {
            debug!(%source, "run_script: failed waiting for process");
            return Err(ToolError::Spawn {
                language: runner.language.clone(),
                source,
            });
        }
        Err(_) => {
            warn!(%relative, timeout = ?runner.timeout, "run_script: process timed out, killed");
            return Err(ToolError::Timeout {
                language: runner.language.clone(),
                timeout: runner.timeout,
            });
        }
    };

    let report = ExecutionReport {
        exit_code: output.status.code(),
        stdout: String::from_utf8_lossy(&output.stdout).to_string(),
        stderr: String::from_utf8_lossy(&output.stderr).to_string(),
    };
    debug!(
        exit_code = ?report.exit_code,
        stdout_len = report.stdout.len(),
        stderr_len = report.stderr.len(),
        "run_script: output captured"
    );
    Ok(report)
}

#[derive(Debug, Deserialize)]
struct RunArgs {
    file_path: String,
    #[serde(default)]
    args: Vec<String>,
}

/// Execute a script file with the configured interpreter
pub struct RunScriptTool;

#[async_trait]
impl Tool for RunScriptTool {
    fn name(&self) -> &'static str {
        "run_python_file"
    }

    fn description(&self) -> &'static str {
        "Executes a Python file relative to the working directory, with optional command-line arguments."
    }

    fn input_schema(&self) -> Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "file_path": {
                    "type": "string",
                    "description": "Python file path to execute, relative to the working directory"
                },
                "args": {
                    "type": "array",
                    "items": { "type": "string" },
                    "description": "Optional list of command-line arguments to pass to the script"
                }
            },
            "required": ["file_path"]
        })
    }

    async fn execute(&self, input: Value, ctx: &ToolContext) -> Result<String, ToolError> {
        debug!(?input, "RunScriptTool::execute: called");
        let args: RunArgs = parse_args(self.name(), input)?;
        let report = run_script(ctx.root(), &args.file_path, &args.args, &ctx.runner).await?;
        Ok(report.to_string())
    }
}
