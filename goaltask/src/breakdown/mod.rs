//! Breakdown generation
//!
//! - [`generator`] - LLM call for a goal
//! - [`sanitize`] - code-fence stripping rules

pub mod generator;
pub mod sanitize;

pub use generator::{BreakdownGenerator, GenerateError, GeneratorConfig};
pub use sanitize::{FENCE_RULES, FenceRule, sanitize, sanitize_with};
