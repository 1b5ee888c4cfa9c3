//! Prompt Loader
//!
//! Loads system prompt documents from a directory or falls back to embedded
//! defaults, then renders them with Handlebars.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use eyre::{Result, eyre};
use handlebars::Handlebars;
use serde::Deserialize;
use tracing::{debug, info};

use super::embedded;

/// A system prompt document as stored on disk
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PromptDocument {
    /// Handlebars template
    pub template: String,

    /// Values substituted into the template
    pub parameters: BTreeMap<String, serde_yaml::Value>,
}

/// Built-in variables available to every template
#[derive(Debug, Clone)]
pub struct PromptVars {
    /// The session's working root
    pub working_directory: String,

    /// Tool summary, one `- name: description` line per tool
    pub tools: String,
}

/// Loads and renders system prompts
pub struct PromptLoader {
    /// Handlebars template engine
    hbs: Handlebars<'static>,
    /// Prompt directory, if it exists
    dir: Option<PathBuf>,
}

impl PromptLoader {
    /// Create a loader reading from `dir`, falling back to embedded prompts
    pub fn new(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        let dir_exists = dir.is_dir();
        debug!(?dir, %dir_exists, "PromptLoader::new: called");

        Self {
            hbs: Self::engine(),
            dir: dir_exists.then(|| dir.to_path_buf()),
        }
    }

    /// Create a loader that only uses embedded prompts (for testing)
    pub fn embedded_only() -> Self {
        debug!("PromptLoader::embedded_only: called");
        Self {
            hbs: Self::engine(),
            dir: None,
        }
    }

    fn engine() -> Handlebars<'static> {
        let mut hbs = Handlebars::new();
        // Prompts are plain text; HTML escaping would mangle quotes and angle brackets
        hbs.register_escape_fn(handlebars::no_escape);
        hbs.set_strict_mode(true);
        hbs
    }

    /// Load a prompt document by name
    pub fn load(&self, name: &str) -> Result<PromptDocument> {
        debug!(%name, "PromptLoader::load: called");
        if let Some(ref dir) = self.dir {
            let path = dir.join(format!("{}.yaml", name));
            if path.exists() {
                debug!(?path, "PromptLoader::load: found in prompt directory");
                let content = std::fs::read_to_string(&path)
                    .map_err(|e| eyre!("Failed to read prompt {}: {}", path.display(), e))?;
                return serde_yaml::from_str(&content)
                    .map_err(|e| eyre!("Failed to parse prompt {}: {}", path.display(), e));
            }
            debug!(?path, "PromptLoader::load: not found in prompt directory");
        }

        debug!("PromptLoader::load: trying embedded fallback");
        let content = embedded::get_embedded(name).ok_or_else(|| eyre!("Prompt not found: {}", name))?;
        serde_yaml::from_str(content).map_err(|e| eyre!("Failed to parse embedded prompt {}: {}", name, e))
    }

    /// Load and render a prompt with its parameters plus the built-in variables
    pub fn render(&self, name: &str, vars: &PromptVars) -> Result<String> {
        debug!(%name, "PromptLoader::render: called");
        let doc = self.load(name)?;

        let mut data: BTreeMap<String, serde_yaml::Value> = doc.parameters;
        data.insert(
            "working_directory".to_string(),
            serde_yaml::Value::String(vars.working_directory.clone()),
        );
        data.insert("tools".to_string(), serde_yaml::Value::String(vars.tools.clone()));

        info!("Rendering system prompt '{}'", name);
        self.hbs
            .render_template(&doc.template, &data)
            .map_err(|e| eyre!("Failed to render prompt {}: {}", name, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn vars() -> PromptVars {
        PromptVars {
            working_directory: "/srv/calculator".to_string(),
            tools: "- get_files_info: List files".to_string(),
        }
    }

    #[test]
    fn test_embedded_default_renders() {
        let loader = PromptLoader::embedded_only();
        let prompt = loader.render("default", &vars()).unwrap();

        assert!(prompt.contains("/srv/calculator"));
        assert!(prompt.contains("- get_files_info: List files"));
        assert!(prompt.contains("a calculator maintainer"));
        assert!(!prompt.contains("{{"));
    }

    #[test]
    fn test_directory_prompt_overrides_embedded() {
        let temp = tempdir().unwrap();
        fs::write(
            temp.path().join("default.yaml"),
            "template: \"Hi {{name}} in <{{working_directory}}>\"\nparameters:\n  name: Robot\n",
        )
        .unwrap();

        let loader = PromptLoader::new(temp.path());
        let prompt = loader.render("default", &vars()).unwrap();

        assert_eq!(prompt, "Hi Robot in </srv/calculator>");
    }

    #[test]
    fn test_missing_directory_falls_back() {
        let temp = tempdir().unwrap();
        let loader = PromptLoader::new(temp.path().join("nope"));
        assert!(loader.render("default", &vars()).is_ok());
    }

    #[test]
    fn test_unknown_prompt_is_error() {
        let loader = PromptLoader::embedded_only();
        let err = loader.load("v2_pirate").unwrap_err();
        assert!(err.to_string().contains("Prompt not found"));
    }

    #[test]
    fn test_unparsable_prompt_is_error() {
        let temp = tempdir().unwrap();
        fs::write(temp.path().join("broken.yaml"), "template: [unclosed").unwrap();

        let loader = PromptLoader::new(temp.path());
        assert!(loader.load("broken").is_err());
    }

    #[test]
    fn test_missing_parameter_is_render_error() {
        let temp = tempdir().unwrap();
        fs::write(temp.path().join("strict.yaml"), "template: \"{{undefined_thing}}\"\n").unwrap();

        let loader = PromptLoader::new(temp.path());
        assert!(loader.render("strict", &vars()).is_err());
    }
}
