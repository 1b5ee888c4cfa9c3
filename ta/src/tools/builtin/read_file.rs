//! get_file_content tool - read a file with a character budget

use std::io;
use std::path::Path;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use tokio::io::{AsyncReadExt, BufReader};
use tracing::debug;

use crate::tools::guard::resolve;
use crate::tools::{Tool, ToolContext, ToolError, parse_args};

/// Notice appended when a read stops at the character budget
pub fn truncation_notice(path: &str, max_chars: usize) -> String {
    format!("\n[...File \"{}\" truncated at {} characters]", path, max_chars)
}

/// Read at most `max_chars` characters of `relative` under `root`
pub async fn read_file(root: &Path, relative: &str, max_chars: usize) -> Result<String, ToolError> {
    debug!(?root, %relative, max_chars, "read_file: called");
    let target = resolve(root, relative).map_err(|e| ToolError::outside("read", e))?;

    let is_file = tokio::fs::metadata(&target).await.map(|m| m.is_file()).unwrap_or(false);
    if !is_file {
        debug!(?target, "read_file: missing or not a regular file");
        return Err(ToolError::NotFound {
            path: relative.to_string(),
        });
    }

    // A character is at most four bytes, so this prefix covers max_chars + 1 of them
    let limit = (max_chars as u64).saturating_add(1).saturating_mul(4);
    let file = tokio::fs::File::open(&target).await?;
    let mut bytes = Vec::new();
    BufReader::new(file).take(limit).read_to_end(&mut bytes).await?;

    let (text, clean) = match std::str::from_utf8(&bytes) {
        Ok(text) => (text, true),
        Err(e) => (std::str::from_utf8(&bytes[..e.valid_up_to()]).unwrap_or_default(), false),
    };

    // Byte offset of the first character past the budget, if there is one
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => {
            debug!(prefix_bytes = bytes.len(), cut, "read_file: truncating");
            Ok(format!("{}{}", &text[..cut], truncation_notice(relative, max_chars)))
        }
        None if clean => Ok(text.to_string()),
        // Undecodable bytes start right at the budget; they are never returned
        None if text.chars().count() == max_chars => {
            debug!(prefix_bytes = bytes.len(), "read_file: truncating before undecodable tail");
            Ok(format!("{}{}", text, truncation_notice(relative, max_chars)))
        }
        None => {
            debug!(?target, "read_file: invalid UTF-8 within budget");
            Err(ToolError::Io(io::Error::new(
                io::ErrorKind::InvalidData,
                "stream did not contain valid UTF-8",
            )))
        }
    }
}

#[derive(Debug, Deserialize)]
struct ReadArgs {
    file_path: String,
}

/// Read a file's contents
pub struct ReadFileTool;

#[async_trait]
impl Tool for ReadFileTool {
    fn name(&self) -> &'static str {
        "get_file_content"
    }

    fn description(&self) -> &'static str {
        "Reads the content of a file relative to the working directory. Long files are truncated."
    }

    fn input_schema(&self) -> Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "file_path": {
                    "type": "string",
                    "description": "File path to read, relative to the working directory"
                }
            },
            "required": ["file_path"]
        })
    }

    async fn execute(&self, input: Value, ctx: &ToolContext) -> Result<String, ToolError> {
        debug!(?input, "ReadFileTool::execute: called");
        let args: ReadArgs = parse_args(self.name(), input)?;
        read_file(ctx.root(), &args.file_path, ctx.max_chars).await
    }
}
