//! BreakdownGenerator - one LLM call per goal
//!
//! Sends the goal with the fixed breakdown instruction and turns the reply into
//! a sanitized [`Breakdown`].

use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, error, info, warn};

use super::sanitize::sanitize;
use crate::config::LlmConfig;
use crate::domain::{Breakdown, Goal};
use crate::llm::{CompletionRequest, LlmClient, LlmError, Message, StopReason};

/// Why a breakdown could not be produced
#[derive(Debug, Error)]
pub enum GenerateError {
    #[error(transparent)]
    Llm(#[from] LlmError),

    #[error("The model returned an empty response")]
    EmptyCompletion,
}

/// Sampling settings for breakdown requests
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeneratorConfig {
    /// Response token cap
    pub max_tokens: u32,
    /// Sampling temperature
    pub temperature: f32,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            max_tokens: 4000,
            temperature: 0.7,
        }
    }
}

impl From<&LlmConfig> for GeneratorConfig {
    fn from(config: &LlmConfig) -> Self {
        Self {
            max_tokens: config.max_tokens,
            temperature: config.temperature,
        }
    }
}

/// Turns goals into breakdowns
pub struct BreakdownGenerator {
    llm: Arc<dyn LlmClient>,
    system_prompt: String,
    config: GeneratorConfig,
}

impl BreakdownGenerator {
    /// Create a new generator
    pub fn new(llm: Arc<dyn LlmClient>, system_prompt: impl Into<String>, config: GeneratorConfig) -> Self {
        Self {
            llm,
            system_prompt: system_prompt.into(),
            config,
        }
    }

    /// The request sent for `goal`
    pub fn build_request(&self, goal: &Goal) -> CompletionRequest {
        debug!(goal = %goal, "build_request: called");
        CompletionRequest {
            system_prompt: self.system_prompt.clone(),
            messages: vec![Message::user(goal.as_str())],
            max_tokens: self.config.max_tokens,
            temperature: Some(self.config.temperature),
        }
    }

    /// Ask the model for a breakdown and return its raw text
    pub async fn generate_raw(&self, goal: &Goal) -> Result<String, GenerateError> {
        info!(goal = %goal, "Generating task breakdown");
        let response = self.llm.complete(self.build_request(goal)).await.map_err(|e| {
            log_llm_failure(&e);
            e
        })?;

        debug!(
            input_tokens = response.usage.input_tokens,
            output_tokens = response.usage.output_tokens,
            stop_reason = ?response.stop_reason,
            "generate_raw: completion received"
        );
        if response.stop_reason == StopReason::MaxTokens {
            warn!(max_tokens = self.config.max_tokens, "Breakdown hit the token cap and may be truncated");
        }

        match response.content {
            Some(text) if !text.trim().is_empty() => Ok(text),
            _ => {
                debug!("generate_raw: empty completion");
                Err(GenerateError::EmptyCompletion)
            }
        }
    }

    /// Generate and sanitize a breakdown for `goal`
    pub async fn generate(&self, goal: &Goal) -> Result<Breakdown, GenerateError> {
        let raw = self.generate_raw(goal).await?;
        let html = sanitize(&raw);
        if html.is_empty() {
            debug!("generate: nothing left after sanitizing");
            return Err(GenerateError::EmptyCompletion);
        }

        info!(goal = %goal, html_len = html.len(), "Task breakdown generated");
        Ok(Breakdown::new(goal.clone(), html))
    }
}

fn log_llm_failure(e: &LlmError) {
    if e.is_auth() {
        error!(error = %e, "Provider rejected the API key");
    } else if let Some(wait) = e.retry_after() {
        warn!(retry_after = ?wait, "Provider rate limited the request");
    } else {
        warn!(error = %e, "LLM request failed");
    }
}
