//! goaltask - turn a free-text goal into an HTML task breakdown
//!
//! A small web tool: the user types a goal (or picks an example), the goal is
//! sent to a chat-completion model with a fixed instruction, code fences are
//! stripped from the reply, and the resulting HTML is previewed and offered as
//! a download.
//!
//! # Modules
//!
//! - [`llm`] - LLM client trait and OpenAI implementation
//! - [`breakdown`] - generator and fence sanitizer
//! - [`service`] - one submission as request in, outcome out
//! - [`session`] - per-session in-memory state
//! - [`web`] - axum router and page rendering
//! - [`config`] - configuration types and loading
//! - [`secrets`] - API credential lookup
//! - [`cli`] - command-line interface

pub mod breakdown;
pub mod cli;
pub mod config;
pub mod domain;
pub mod llm;
pub mod prompts;
pub mod secrets;
pub mod service;
pub mod session;
pub mod web;

// Re-export commonly used types
pub use breakdown::{BreakdownGenerator, FENCE_RULES, FenceRule, GenerateError, GeneratorConfig, sanitize};
pub use config::{Config, LlmConfig};
pub use domain::{Breakdown, EXAMPLE_GOALS, Goal, GoalError, download_filename};
pub use llm::{CompletionRequest, CompletionResponse, LlmClient, LlmError, OpenAIClient, create_client};
pub use service::{Backend, BreakdownService, SubmitOutcome, SubmitRequest};
pub use session::{SessionId, SessionState, SessionStore};
pub use web::{AppState, create_router, serve};
