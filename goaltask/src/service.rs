//! BreakdownService - one goal submission, start to finish
//!
//! A submission is an explicit [`SubmitRequest`] in and a [`SubmitOutcome`]
//! out. The web layer only renders outcomes; all checks, the generator call
//! and session updates happen here.

use std::path::Path;
use std::sync::Arc;

use eyre::Context;
use tracing::{debug, error, info, warn};

use crate::breakdown::{BreakdownGenerator, GeneratorConfig};
use crate::config::Config;
use crate::domain::{Breakdown, Goal, example_goal};
use crate::llm::create_client;
use crate::prompts::PromptLoader;
use crate::secrets::resolve_api_key;
use crate::session::{SessionId, SessionStore};

/// Warning shown when the same session submits while a request is running
pub const BUSY_WARNING: &str = "A breakdown is already being generated for this session. Please wait for it to finish.";

/// Whether the generator can be used
pub enum Backend {
    /// Credential present, generator ready
    Ready(BreakdownGenerator),
    /// Credential or client setup failed; the message is shown to users
    Unconfigured(String),
}

impl Backend {
    /// Build the generator from configuration
    ///
    /// A missing credential or an unusable client yields
    /// [`Backend::Unconfigured`] so the server can still start and tell users
    /// what is wrong. An unreadable prompt override is an operator error and
    /// fails startup.
    pub fn from_config(config: &Config, prompt_root: &Path) -> eyre::Result<Self> {
        debug!(?prompt_root, "Backend::from_config: called");
        let system_prompt = PromptLoader::new(prompt_root, config.prompt.override_path.clone())
            .breakdown_prompt()
            .context("Failed to load breakdown prompt")?;

        let api_key = match resolve_api_key(&config.secrets) {
            Ok(key) => key,
            Err(e) => {
                error!(error = %e, "API key unavailable");
                return Ok(Backend::Unconfigured(format!(
                    "OpenAI API key not found! Configure {} in the environment or in {}.",
                    config.secrets.key_name,
                    config.secrets.path.display()
                )));
            }
        };

        match create_client(&config.llm, &api_key) {
            Ok(llm) => Ok(Backend::Ready(BreakdownGenerator::new(
                llm,
                system_prompt,
                GeneratorConfig::from(&config.llm),
            ))),
            Err(e) => {
                error!(error = %e, "Failed to create LLM client");
                Ok(Backend::Unconfigured(format!("LLM client configuration error: {}", e)))
            }
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, Backend::Ready(_))
    }
}

/// One form submission
#[derive(Debug, Clone)]
pub struct SubmitRequest {
    pub session: SessionId,
    pub goal_text: String,
}

/// Result of a submission, one variant per UI state
#[derive(Debug, Clone)]
pub enum SubmitOutcome {
    /// Blocking configuration problem (no credential)
    ConfigError(String),
    /// Non-blocking input problem; the user may resubmit
    Warning(String),
    /// The generation call failed
    Failed(String),
    /// A new breakdown was stored for the session
    Generated(Breakdown),
}

/// Handles submissions and example selection against a session store
pub struct BreakdownService {
    backend: Backend,
    sessions: SessionStore,
}

impl BreakdownService {
    pub fn new(backend: Backend, sessions: SessionStore) -> Self {
        Self { backend, sessions }
    }

    /// Configuration problem to show on every page, if any
    pub fn config_error(&self) -> Option<&str> {
        match &self.backend {
            Backend::Ready(_) => None,
            Backend::Unconfigured(message) => Some(message),
        }
    }

    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    /// Pre-fill the form with an example goal
    ///
    /// Returns the chosen goal, or `None` if `index` is out of range.
    pub fn select_example(&self, session: SessionId, index: usize) -> Option<&'static str> {
        debug!(%session, %index, "select_example: called");
        let goal = example_goal(index)?;
        self.sessions.select_goal(session, goal);
        Some(goal)
    }

    /// Process one goal submission
    pub async fn submit(&self, request: SubmitRequest) -> SubmitOutcome {
        debug!(session = %request.session, goal_len = request.goal_text.len(), "submit: called");

        let generator = match &self.backend {
            Backend::Ready(generator) => generator,
            Backend::Unconfigured(message) => {
                warn!(session = %request.session, "Submission rejected: generator not configured");
                return SubmitOutcome::ConfigError(message.clone());
            }
        };

        let goal = match Goal::parse(&request.goal_text) {
            Ok(goal) => goal,
            Err(e) => {
                debug!(session = %request.session, "submit: goal rejected");
                return SubmitOutcome::Warning(e.to_string());
            }
        };

        let Some(_guard) = self.sessions.try_begin(request.session) else {
            warn!(session = %request.session, "Submission rejected: generation already in flight");
            return SubmitOutcome::Warning(BUSY_WARNING.to_string());
        };

        match generator.generate(&goal).await {
            Ok(breakdown) => {
                info!(session = %request.session, goal = %goal, "Breakdown stored for session");
                self.sessions.store_breakdown(request.session, breakdown.clone());
                SubmitOutcome::Generated(breakdown)
            }
            Err(e) => {
                error!(session = %request.session, goal = %goal, error = %e, "Breakdown generation failed");
                SubmitOutcome::Failed(e.to_string())
            }
        }
    }
}

/// Convenience for sharing the service across handlers
pub type SharedService = Arc<BreakdownService>;
