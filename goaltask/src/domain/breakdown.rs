//! Breakdown - the generated HTML plan for a goal

use chrono::{DateTime, Local};
use tracing::debug;

use super::Goal;

/// MIME type the breakdown is served and downloaded with
pub const HTML_MIME: &str = "text/html; charset=utf-8";

/// Sanitized HTML document produced for a goal
#[derive(Debug, Clone, PartialEq)]
pub struct Breakdown {
    goal: Goal,
    html: String,
    generated_at: DateTime<Local>,
}

impl Breakdown {
    pub fn new(goal: Goal, html: impl Into<String>) -> Self {
        let html = html.into();
        debug!(goal = %goal, html_len = html.len(), "Breakdown::new: called");
        Self {
            goal,
            html,
            generated_at: Local::now(),
        }
    }

    pub fn goal(&self) -> &Goal {
        &self.goal
    }

    pub fn html(&self) -> &str {
        &self.html
    }

    pub fn generated_at(&self) -> DateTime<Local> {
        self.generated_at
    }
}

/// Download filename for a breakdown saved at `at`
///
/// Format: `goal_breakdown_YYYYMMDD_HHMMSS.html`
pub fn download_filename(at: DateTime<Local>) -> String {
    format!("goal_breakdown_{}.html", at.format("%Y%m%d_%H%M%S"))
}
