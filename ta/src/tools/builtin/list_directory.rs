//! get_files_info tool - list a directory under the working root

use std::fmt;
use std::path::Path;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::tools::guard::resolve;
use crate::tools::{Tool, ToolContext, ToolError, parse_args};

/// One directory entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryInfo {
    pub name: String,
    pub size_bytes: u64,
    pub is_directory: bool,
}

impl fmt::Display for EntryInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "- {}: file_size={} bytes, is_dir={}",
            self.name, self.size_bytes, self.is_directory
        )
    }
}

/// List `relative` under `root`, sorted by name
///
/// Entries that cannot be stat'ed are skipped rather than failing the listing.
pub async fn list_directory(root: &Path, relative: &str) -> Result<Vec<EntryInfo>, ToolError> {
    debug!(?root, %relative, "list_directory: called");
    let target = resolve(root, relative).map_err(|e| ToolError::outside("list", e))?;

    let is_dir = tokio::fs::metadata(&target).await.map(|m| m.is_dir()).unwrap_or(false);
    if !is_dir {
        debug!(?target, "list_directory: not a directory");
        return Err(ToolError::NotADirectory {
            path: relative.to_string(),
        });
    }

    let mut entries = Vec::new();
    let mut dir = tokio::fs::read_dir(&target).await?;

    while let Some(entry) = dir.next_entry().await? {
        let name = entry.file_name().to_string_lossy().to_string();
        let metadata = match tokio::fs::metadata(entry.path()).await {
            Ok(m) => m,
            Err(e) => {
                debug!(%name, %e, "list_directory: failed to get metadata, skipping entry");
                continue;
            }
        };

        entries.push(EntryInfo {
            name,
            size_bytes: metadata.len(),
            is_directory: metadata.is_dir(),
        });
    }

    entries.sort_by(|a, b| a.name.cmp(&b.name));
    debug!(entries_count = %entries.len(), "list_directory: entries collected");
    Ok(entries)
}

#[derive(Debug, Deserialize)]
struct ListArgs {
    #[serde(default = "default_directory")]
    directory: String,
}

fn default_directory() -> String {
    ".".to_string()
}

/// List files and directories in a path
pub struct ListDirectoryTool;

#[async_trait]
impl Tool for ListDirectoryTool {
    fn name(&self) -> &'static str {
        "get_files_info"
    }

    fn description(&self) -> &'static str {
        "Lists files in a directory relative to the working directory, with file size and directory status"
    }

    fn input_schema(&self) -> Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "directory": {
                    "type": "string",
                    "description": "Directory to list, relative to the working directory (default is '.')"
                }
            },
            "required": []
        })
    }

    async fn execute(&self, input: Value, ctx: &ToolContext) -> Result<String, ToolError> {
        debug!(?input, "ListDirectoryTool::execute: called");
        let args: ListArgs = parse_args(self.name(), input)?;

        let entries = list_directory(ctx.root(), &args.directory).await?;

        if entries.is_empty() {
            debug!("ListDirectoryTool::execute: empty directory");
            return Ok("(empty directory)".to_string());
        }

        Ok(entries.iter().map(ToString::to_string).collect::<Vec<_>>().join("\n"))
    }
}
