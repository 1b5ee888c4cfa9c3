//! write_file tool - write content to a file

use std::path::Path;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::tools::guard::resolve;
use crate::tools::{Tool, ToolContext, ToolError, parse_args};

/// Write `content` to `relative` under `root`, replacing any existing file
///
/// Missing parent directories are created.
pub async fn write_file(root: &Path, relative: &str, content: &str) -> Result<String, ToolError> {
    debug!(?root, %relative, content_len = content.len(), "write_file: called");
    let target = resolve(root, relative).map_err(|e| ToolError::outside("write to", e))?;

    let is_dir = tokio::fs::metadata(&target).await.map(|m| m.is_dir()).unwrap_or(false);
    if is_dir {
        debug!(?target, "write_file: target is a directory");
        return Err(ToolError::IsADirectory {
            path: relative.to_string(),
        });
    }

    if let Some(parent) = target.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    debug!("write_file: parent directories ensured");

    tokio::fs::write(&target, content).await?;

    let written = content.chars().count();
    debug!(written, "write_file: file written successfully");
    Ok(format!(
        "Successfully wrote to \"{}\" ({} characters written)",
        relative, written
    ))
}

#[derive(Debug, Deserialize)]
struct WriteArgs {
    file_path: String,
    content: String,
}

/// Write content to a file
pub struct WriteFileTool;

#[async_trait]
impl Tool for WriteFileTool {
    fn name(&self) -> &'static str {
        "write_file"
    }

    fn description(&self) -> &'static str {
        "Writes or overwrites content to a file."
    }

    fn input_schema(&self) -> Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "file_path": {
                    "type": "string",
                    "description": "File path to write, relative to the working directory"
                },
                "content": {
                    "type": "string",
                    "description": "Content string to write to the file"
                }
            },
            "required": ["file_path", "content"]
        })
    }

    async fn execute(&self, input: Value, ctx: &ToolContext) -> Result<String, ToolError> {
        debug!("WriteFileTool::execute: called");
        let args: WriteArgs = parse_args(self.name(), input)?;
        write_file(ctx.root(), &args.file_path, &args.content).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::builtin::read_file;
    use std::fs;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_write_then_read_round_trip() {
        let temp = tempdir().unwrap();

        let msg = write_file(temp.path(), "a.txt", "wait, this isn't lorem ipsum").await.unwrap();
        assert_eq!(msg, "Successfully wrote to \"a.txt\" (28 characters written)");

        let content = read_file(temp.path(), "a.txt", 10_000).await.unwrap();
        assert_eq!(content, "wait, this isn't lorem ipsum");
    }

    #[tokio::test]
    async fn test_write_file_creates_directories() {
        let temp = tempdir().unwrap();

        write_file(temp.path(), "pkg/morelorem.txt", "lorem ipsum dolor sit amet")
            .await
            .unwrap();

        let content = fs::read_to_string(temp.path().join("pkg/morelorem.txt")).unwrap();
        assert_eq!(content, "lorem ipsum dolor sit amet");
    }

    #[tokio::test]
    async fn test_write_file_overwrites_existing() {
        let temp = tempdir().unwrap();
        let file_path = temp.path().join("lorem.txt");
        fs::write(&file_path, "a much longer old content").unwrap();

        write_file(temp.path(), "lorem.txt", "new").await.unwrap();

        assert_eq!(fs::read_to_string(&file_path).unwrap(), "new");
    }

    #[tokio::test]
    async fn test_write_file_refuses_directory() {
        let temp = tempdir().unwrap();
        fs::create_dir(temp.path().join("pkg")).unwrap();

        let err = write_file(temp.path(), "pkg", "content").await.unwrap_err();
        assert_eq!(err.to_string(), "Cannot write to \"pkg\" as it is a directory");
    }

    #[tokio::test]
    async fn test_write_file_outside_root_touches_nothing() {
        let temp = tempdir().unwrap();
        let root = temp.path().join("calculator");
        fs::create_dir(&root).unwrap();

        let err = write_file(&root, "../escaped.txt", "nope").await.unwrap_err();
        assert!(err.to_string().contains("outside"));
        assert!(!temp.path().join("escaped.txt").exists());

        let err = write_file(&root, "../nested/escaped.txt", "nope").await.unwrap_err();
        assert!(matches!(err, ToolError::OutsideRoot { action: "write to", .. }));
        assert!(!temp.path().join("nested").exists());
    }

    #[tokio::test]
    async fn test_write_file_counts_characters() {
        let temp = tempdir().unwrap();
        let msg = write_file(temp.path(), "u.txt", "héllo").await.unwrap();
        assert!(msg.contains("(5 characters written)"));
    }

    #[tokio::test]
    async fn test_tool_missing_content() {
        let temp = tempdir().unwrap();
        let ctx = ToolContext::new(temp.path());

        let err = WriteFileTool
            .execute(serde_json::json!({"file_path": "test.txt"}), &ctx)
            .await
            .unwrap_err();

        assert!(err.to_string().contains("content"));
        assert!(!temp.path().join("test.txt").exists());
    }
}
