//! Prompt Loader
//!
//! Loads prompt templates from files or falls back to embedded defaults.

use std::path::{Path, PathBuf};

use eyre::{Result, eyre};
use tracing::{debug, info};

use super::embedded;

/// Name of the breakdown system prompt
pub const BREAKDOWN_PROMPT: &str = "breakdown";

/// Loads prompt templates
pub struct PromptLoader {
    /// Explicit override file from config (breakdown prompt only)
    override_path: Option<PathBuf>,
    /// User override directory (e.g., `.goaltask/prompts/`)
    user_dir: Option<PathBuf>,
}

impl PromptLoader {
    /// Create a new prompt loader
    ///
    /// # Arguments
    /// * `root` - directory searched for `.goaltask/prompts/`
    /// * `override_path` - file that replaces the breakdown prompt outright
    pub fn new(root: impl AsRef<Path>, override_path: Option<PathBuf>) -> Self {
        let root = root.as_ref();
        debug!(?root, ?override_path, "PromptLoader::new: called");
        let user_dir = root.join(".goaltask/prompts");

        let user_dir_exists = user_dir.exists();
        debug!(?user_dir, %user_dir_exists, "PromptLoader::new: checking user directory");

        Self {
            override_path,
            user_dir: if user_dir_exists { Some(user_dir) } else { None },
        }
    }

    /// Create a loader that only uses embedded prompts (for testing)
    pub fn embedded_only() -> Self {
        debug!("PromptLoader::embedded_only: called");
        Self {
            override_path: None,
            user_dir: None,
        }
    }

    /// Load a template by name
    ///
    /// Checks in order:
    /// 1. Configured override file (breakdown prompt only)
    /// 2. User override: `.goaltask/prompts/{name}.pmt`
    /// 3. Embedded fallback
    fn load_template(&self, name: &str) -> Result<String> {
        debug!(%name, "PromptLoader::load_template: called");
        if name == BREAKDOWN_PROMPT
            && let Some(ref path) = self.override_path
        {
            debug!(?path, "PromptLoader::load_template: using configured override");
            return std::fs::read_to_string(path)
                .map_err(|e| eyre!("Failed to read prompt override {}: {}", path.display(), e));
        }

        if let Some(ref user_dir) = self.user_dir {
            let path = user_dir.join(format!("{}.pmt", name));
            if path.exists() {
                debug!(?path, "PromptLoader::load_template: found in user override");
                return std::fs::read_to_string(&path)
                    .map_err(|e| eyre!("Failed to read user prompt {}: {}", path.display(), e));
            }
            debug!(?path, "PromptLoader::load_template: not found in user override");
        }

        if let Some(content) = embedded::get_embedded(name) {
            debug!(%name, "PromptLoader::load_template: found in embedded");
            return Ok(content.to_string());
        }

        debug!(%name, "PromptLoader::load_template: not found anywhere");
        Err(eyre!("Prompt template not found: {}", name))
    }

    /// Get the breakdown system prompt
    pub fn breakdown_prompt(&self) -> Result<String> {
        debug!("PromptLoader::breakdown_prompt: called");
        let prompt = self.load_template(BREAKDOWN_PROMPT)?;
        if prompt.trim().is_empty() {
            return Err(eyre!("Breakdown prompt is empty"));
        }
        info!("Loaded breakdown prompt ({} bytes)", prompt.len());
        Ok(prompt)
    }
}
