//! Built-in tools advertised to the model

mod list_directory;
mod read_file;
mod run_script;
mod write_file;

pub use list_directory::{EntryInfo, ListDirectoryTool, list_directory};
pub use read_file::{ReadFileTool, read_file, truncation_notice};
pub use run_script::{ExecutionReport, RunScriptTool, run_script};
pub use write_file::{WriteFileTool, write_file};
