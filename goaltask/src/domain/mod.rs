//! Domain types for goaltask
//!
//! - [`Goal`] - validated user input
//! - [`Breakdown`] - the sanitized HTML result for a goal

mod breakdown;
mod goal;

pub use breakdown::{Breakdown, HTML_MIME, download_filename};
pub use goal::{EXAMPLE_GOALS, Goal, GoalError, example_goal};
