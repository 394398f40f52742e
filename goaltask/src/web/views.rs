//! Page rendering
//!
//! The single page is a handlebars template compiled into the binary.

use eyre::{Context, Result};
use handlebars::Handlebars;
use serde::Serialize;
use tracing::debug;

use crate::domain::{Breakdown, EXAMPLE_GOALS};
use crate::service::SubmitOutcome;

/// Page template
const INDEX_TEMPLATE: &str = include_str!("../../templates/index.hbs");

/// Height of the breakdown preview frame, in pixels
pub const PREVIEW_HEIGHT: u32 = 800;

/// Banner style
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BannerKind {
    Error,
    Warning,
    Success,
}

/// Message shown under the form
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Banner {
    pub kind: BannerKind,
    pub message: String,
}

impl Banner {
    /// Banner for a submission outcome
    pub fn from_outcome(outcome: &SubmitOutcome) -> Self {
        let (kind, message) = match outcome {
            SubmitOutcome::ConfigError(_) => (
                BannerKind::Error,
                "⚠️ API key configuration error. Please contact the app administrator.".to_string(),
            ),
            SubmitOutcome::Warning(message) => (BannerKind::Warning, format!("⚠️ {}", message)),
            SubmitOutcome::Failed(message) => (BannerKind::Error, format!("❌ Error: {}", message)),
            SubmitOutcome::Generated(_) => (
                BannerKind::Success,
                "✅ Task breakdown generated successfully!".to_string(),
            ),
        };
        Self { kind, message }
    }
}

#[derive(Debug, Serialize)]
struct ExampleLink {
    index: usize,
    label: &'static str,
}

#[derive(Debug, Serialize)]
struct BreakdownSummary {
    goal: String,
    generated_at: String,
}

/// Everything the page template needs
#[derive(Debug, Serialize)]
pub struct PageContext {
    examples: Vec<ExampleLink>,
    goal_text: String,
    config_error: Option<String>,
    banner: Option<Banner>,
    breakdown: Option<BreakdownSummary>,
    preview_height: u32,
}

impl PageContext {
    pub fn new(goal_text: impl Into<String>) -> Self {
        Self {
            examples: EXAMPLE_GOALS
                .iter()
                .enumerate()
                .map(|(index, label)| ExampleLink { index, label })
                .collect(),
            goal_text: goal_text.into(),
            config_error: None,
            banner: None,
            breakdown: None,
            preview_height: PREVIEW_HEIGHT,
        }
    }

    pub fn with_config_error(mut self, message: Option<&str>) -> Self {
        self.config_error = message.map(str::to_string);
        self
    }

    pub fn with_banner(mut self, banner: Banner) -> Self {
        self.banner = Some(banner);
        self
    }

    pub fn with_breakdown(mut self, breakdown: Option<&Breakdown>) -> Self {
        self.breakdown = breakdown.map(|b| BreakdownSummary {
            goal: b.goal().to_string(),
            generated_at: b.generated_at().format("%Y-%m-%d %H:%M:%S").to_string(),
        });
        self
    }
}

/// Template registry
pub struct Views {
    hbs: Handlebars<'static>,
}

impl Views {
    pub fn new() -> Result<Self> {
        debug!("Views::new: called");
        let mut hbs = Handlebars::new();
        hbs.register_template_string("index", INDEX_TEMPLATE)
            .context("Failed to register index template")?;
        Ok(Self { hbs })
    }

    /// Render the page
    pub fn render_index(&self, context: &PageContext) -> Result<String> {
        debug!(
            has_banner = context.banner.is_some(),
            has_breakdown = context.breakdown.is_some(),
            "Views::render_index: called"
        );
        self.hbs
            .render("index", context)
            .context("Failed to render index template")
    }
}
