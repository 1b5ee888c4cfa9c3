//! Agent loop configuration

use crate::config::Config;

/// Settings for one agent loop run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoopConfig {
    /// Model invocations allowed before the loop gives up
    pub max_iterations: u32,

    /// Max tokens requested per model call
    pub max_tokens: u32,

    /// Print per-iteration diagnostics to stdout
    pub verbose: bool,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            max_iterations: 20,
            max_tokens: 4096,
            verbose: false,
        }
    }
}

impl LoopConfig {
    /// Derive loop settings from the application config
    pub fn from_config(config: &Config, verbose: bool) -> Self {
        Self {
            max_iterations: config.agent.max_iterations,
            max_tokens: config.llm.max_tokens,
            verbose,
        }
    }
}
