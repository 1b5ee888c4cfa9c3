//! Embedded prompts
//!
//! Compiled into the binary so ta runs without a prompts directory.

use tracing::debug;

/// Default system prompt document
pub const DEFAULT: &str = include_str!("../../prompts/default.yaml");

/// Get the embedded prompt document by name
pub fn get_embedded(name: &str) -> Option<&'static str> {
    debug!(%name, "get_embedded: called");
    match name {
        "default" => Some(DEFAULT),
        _ => {
            debug!("get_embedded: no match found");
            None
        }
    }
}
