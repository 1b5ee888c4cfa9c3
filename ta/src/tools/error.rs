//! Tool error types
//!
//! The display text of each variant is what the model sees after the
//! `Error: ` prefix, so the wording is part of the tool contract.

use std::time::Duration;
use thiserror::Error;

use super::guard::ConfinementError;

/// Errors that can occur during tool execution
#[derive(Debug, Error)]
pub enum ToolError {
    #[error("Cannot {action} \"{path}\" as it is outside the permitted working directory")]
    OutsideRoot { action: &'static str, path: String },

    #[error("\"{path}\" does not exist or is not a regular file")]
    NotFound { path: String },

    #[error("\"{path}\" is not a directory")]
    NotADirectory { path: String },

    #[error("Cannot write to \"{path}\" as it is a directory")]
    IsADirectory { path: String },

    #[error("\"{path}\" is not a {language} file")]
    WrongFileType { path: String, language: String },

    #[error("executing {language} file: Process timed out after {}", describe_timeout(.timeout))]
    Timeout { language: String, timeout: Duration },

    #[error("executing {language} file: {source}")]
    Spawn {
        language: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid arguments for {tool}: {message}")]
    InvalidArgument { tool: String, message: String },

    #[error("Unknown function: {name}")]
    UnknownTool { name: String },

    #[error("Tool {name} failed unexpectedly: {message}")]
    HandlerFault { name: String, message: String },

    #[error("{0}")]
    Io(#[from] std::io::Error),
}

impl ToolError {
    /// Attach the attempted action to a confinement failure
    pub fn outside(action: &'static str, err: ConfinementError) -> Self {
        ToolError::OutsideRoot { action, path: err.path }
    }
}

fn describe_timeout(timeout: &Duration) -> String {
    if timeout.subsec_millis() == 0 {
        format!("{} seconds", timeout.as_secs())
    } else {
        format!("{}ms", timeout.as_millis())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outside_root_message() {
        let err = ToolError::outside(
            "read",
            ConfinementError {
                path: "/bin/cat".to_string(),
            },
        );

        let msg = err.to_string();
        assert_eq!(
            msg,
            "Cannot read \"/bin/cat\" as it is outside the permitted working directory"
        );
    }

    #[test]
    fn test_timeout_message_in_seconds() {
        let err = ToolError::Timeout {
            language: "Python".to_string(),
            timeout: Duration::from_secs(30),
        };
        assert_eq!(
            err.to_string(),
            "executing Python file: Process timed out after 30 seconds"
        );
    }

    #[test]
    fn test_timeout_message_sub_second() {
        let err = ToolError::Timeout {
            language: "Python".to_string(),
            timeout: Duration::from_millis(250),
        };
        assert!(err.to_string().ends_with("after 250ms"));
    }

    #[test]
    fn test_wrong_file_type_message() {
        let err = ToolError::WrongFileType {
            path: "lorem.txt".to_string(),
            language: "Python".to_string(),
        };
        assert_eq!(err.to_string(), "\"lorem.txt\" is not a Python file");
    }
}
