//! System prompt loading
//!
//! A prompt is a YAML document with a Handlebars `template` and a map of
//! `parameters`. Loading chain:
//! 1. `<prompts dir>/<name>.yaml`
//! 2. Embedded fallback in code

pub mod embedded;
mod loader;

pub use loader::{PromptDocument, PromptLoader, PromptVars};
