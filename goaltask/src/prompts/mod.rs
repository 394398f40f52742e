//! Prompt Template System
//!
//! Loads `.pmt` (prompt template) files.
//!
//! Template loading chain:
//! 1. `prompt.override-path` from config
//! 2. `.goaltask/prompts/{name}.pmt` (user override)
//! 3. Embedded fallback in code

pub mod embedded;
mod loader;

pub use loader::{BREAKDOWN_PROMPT, PromptLoader};
