//! Goal - the user's free-text objective

use serde::Serialize;
use thiserror::Error;
use tracing::debug;

/// Example goals offered as one-click shortcuts, in display order
pub const EXAMPLE_GOALS: [&str; 6] = [
    "Learn Spanish in 6 months",
    "Start a YouTube channel",
    "Build a mobile app",
    "Write a novel",
    "Get fit and run a marathon",
    "Launch an online business",
];

/// Look up an example goal by its position in [`EXAMPLE_GOALS`]
pub fn example_goal(index: usize) -> Option<&'static str> {
    debug!(%index, "example_goal: called");
    EXAMPLE_GOALS.get(index).copied()
}

/// Rejected goal input
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GoalError {
    #[error("Please enter a goal!")]
    Empty,
}

/// A validated goal: trimmed and never empty
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Goal(String);

impl Goal {
    /// Validate raw form input
    pub fn parse(input: &str) -> Result<Self, GoalError> {
        let trimmed = input.trim();
        debug!(input_len = input.len(), trimmed_len = trimmed.len(), "Goal::parse: called");
        if trimmed.is_empty() {
            debug!("Goal::parse: empty after trimming");
            return Err(GoalError::Empty);
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Goal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_trims() {
        let goal = Goal::parse("  Write a novel \n").unwrap();
        assert_eq!(goal.as_str(), "Write a novel");
        assert_eq!(goal.to_string(), "Write a novel");
    }

    #[test]
    fn test_parse_rejects_blank() {
        for input in ["", " ", "\n\t  \r\n", "\u{3000}"] {
            assert_eq!(Goal::parse(input), Err(GoalError::Empty), "input {:?}", input);
        }
    }

    #[test]
    fn test_empty_message() {
        assert_eq!(GoalError::Empty.to_string(), "Please enter a goal!");
    }

    #[test]
    fn test_example_goals() {
        assert_eq!(EXAMPLE_GOALS.len(), 6);
        assert_eq!(example_goal(0), Some("Learn Spanish in 6 months"));
        assert_eq!(example_goal(5), Some("Launch an online business"));
        assert_eq!(example_goal(6), None);
        assert!(EXAMPLE_GOALS.iter().all(|g| Goal::parse(g).is_ok()));
    }
}
