//! Toolagent configuration types and loading

use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::tools::RunnerSettings;

/// Main toolagent configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// LLM provider configuration
    pub llm: LlmConfig,

    /// Agent loop and sandbox settings
    pub agent: AgentConfig,

    /// Script runner used by run_python_file
    pub runner: RunnerConfig,

    /// System prompt selection
    pub prompts: PromptsConfig,

    /// Session log output
    pub logs: LogsConfig,

    /// Log level for the diagnostic log file (overridden by --log-level)
    #[serde(rename = "log-level")]
    pub log_level: Option<String>,
}

impl Config {
    /// Validate configuration before use
    ///
    /// Checks that required environment variables are set.
    /// Call this early in startup to fail fast with clear error messages.
    pub fn validate(&self) -> Result<()> {
        if self.llm.api_key().is_err() {
            return Err(eyre::eyre!(
                "LLM API key not found. Set the {} environment variable.",
                self.llm.api_key_env
            ));
        }
        if self.agent.max_iterations == 0 {
            return Err(eyre::eyre!("agent.max-iterations must be at least 1"));
        }
        Ok(())
    }

    /// Load configuration with fallback chain
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        // If explicit config path provided, try to load it
        if let Some(path) = config_path {
            return Self::load_from_file(path).context(format!("Failed to load config from {}", path.display()));
        }

        // Try project-local config: .toolagent.yml
        let local_config = PathBuf::from(".toolagent.yml");
        if local_config.exists() {
            match Self::load_from_file(&local_config) {
                Ok(config) => return Ok(config),
                Err(e) => {
                    tracing::warn!("Failed to load config from {}: {}", local_config.display(), e);
                }
            }
        }

        // Try user config: ~/.config/toolagent/toolagent.yml
        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("toolagent").join("toolagent.yml");
            if user_config.exists() {
                match Self::load_from_file(&user_config) {
                    Ok(config) => return Ok(config),
                    Err(e) => {
                        tracing::warn!("Failed to load config from {}: {}", user_config.display(), e);
                    }
                }
            }
        }

        // No config file found, use defaults
        tracing::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).context("Failed to read config file")?;

        let config: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;

        tracing::info!("Loaded config from: {}", path.as_ref().display());
        Ok(config)
    }

    /// The session's working root: absolute, canonical and existing
    pub fn working_root(&self) -> Result<PathBuf> {
        let path = resolve_from_install_dir(&self.agent.working_directory)?;
        path.canonicalize()
            .context(format!("Working directory {} does not exist", path.display()))
    }

    /// Directory holding the system prompt YAML files
    pub fn prompts_dir(&self) -> Result<PathBuf> {
        resolve_from_install_dir(&self.prompts.dir)
    }
}

/// Directory containing the running executable
pub fn install_dir() -> Result<PathBuf> {
    let exe = std::env::current_exe().context("Failed to locate the running executable")?;
    exe.parent()
        .map(Path::to_path_buf)
        .ok_or_else(|| eyre::eyre!("Executable {} has no parent directory", exe.display()))
}

/// Absolute paths are used as is; relative ones hang off the install dir
fn resolve_from_install_dir(path: &Path) -> Result<PathBuf> {
    if path.is_absolute() {
        Ok(path.to_path_buf())
    } else {
        Ok(install_dir()?.join(path))
    }
}

/// LLM provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Provider name (currently only "openai" supported)
    pub provider: String,

    /// Model identifier, unless the `model-env` variable is set
    pub model: String,

    /// Environment variable that overrides `model`
    #[serde(rename = "model-env")]
    pub model_env: String,

    /// Environment variable containing the API key
    #[serde(rename = "api-key-env")]
    pub api_key_env: String,

    /// API base URL
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Maximum tokens per response
    #[serde(rename = "max-tokens")]
    pub max_tokens: u32,

    /// Request timeout in milliseconds
    #[serde(rename = "timeout-ms")]
    pub timeout_ms: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: "openai".to_string(),
            model: "gpt-4o-mini".to_string(),
            model_env: "OPENAI_MODEL".to_string(),
            api_key_env: "OPENAI_API_KEY".to_string(),
            base_url: "https://api.openai.com".to_string(),
            max_tokens: 4096,
            timeout_ms: 120_000,
        }
    }
}

impl LlmConfig {
    /// Effective model: `model-env` wins when set and non-empty
    pub fn model(&self) -> String {
        std::env::var(&self.model_env)
            .ok()
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| self.model.clone())
    }

    /// Read the API key from the configured environment variable
    pub fn api_key(&self) -> Result<String> {
        std::env::var(&self.api_key_env)
            .ok()
            .filter(|k| !k.is_empty())
            .ok_or_else(|| eyre::eyre!("Environment variable {} is not set", self.api_key_env))
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// Agent loop and sandbox settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    /// Working root for every tool call
    #[serde(rename = "working-directory")]
    pub working_directory: PathBuf,

    /// Model invocations allowed before giving up
    #[serde(rename = "max-iterations")]
    pub max_iterations: u32,

    /// Character budget for get_file_content
    #[serde(rename = "max-chars")]
    pub max_chars: usize,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            working_directory: PathBuf::from("calculator"),
            max_iterations: 20,
            max_chars: 10_000,
        }
    }
}

/// Script runner configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RunnerConfig {
    /// Interpreter executable
    pub interpreter: String,

    /// Required script extension, without the dot
    pub extension: String,

    /// Language label used in tool messages
    pub language: String,

    /// Hard wall-clock limit per run
    #[serde(rename = "timeout-ms")]
    pub timeout_ms: u64,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            interpreter: "python3".to_string(),
            extension: "py".to_string(),
            language: "Python".to_string(),
            timeout_ms: 30_000,
        }
    }
}

impl RunnerConfig {
    pub fn settings(&self) -> RunnerSettings {
        RunnerSettings {
            interpreter: self.interpreter.clone(),
            extension: self.extension.trim_start_matches('.').to_string(),
            language: self.language.clone(),
            timeout: Duration::from_millis(self.timeout_ms),
        }
    }
}

/// System prompt selection
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PromptsConfig {
    /// Name of the prompt file (without .yaml) to use
    pub active: String,

    /// Directory of prompt files, relative to the install dir unless absolute
    pub dir: PathBuf,
}

impl Default for PromptsConfig {
    fn default() -> Self {
        Self {
            active: "default".to_string(),
            dir: PathBuf::from("system_prompts"),
        }
    }
}

/// Session log output
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LogsConfig {
    /// Directory for per-session JSON logs, relative to the current directory
    #[serde(rename = "session-dir")]
    pub session_dir: PathBuf,
}

impl Default for LogsConfig {
    fn default() -> Self {
        Self {
            session_dir: PathBuf::from("logs"),
        }
    }
}
