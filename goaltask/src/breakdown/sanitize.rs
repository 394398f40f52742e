//! Fence stripping for model output
//!
//! Models sometimes wrap the HTML in markdown code fences despite being told
//! not to. Rules are checked in order against the start of the raw text; the
//! first rule whose trigger matches removes every occurrence of its markers and
//! trims the result. Text matching no rule is returned untouched.

use tracing::debug;

/// One fence-stripping rule
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FenceRule {
    /// Prefix of the raw text that activates this rule
    pub trigger: &'static str,
    /// Markers removed everywhere in the text, in order
    pub strip: &'static [&'static str],
}

/// Default rule table: tagged fence first, then bare fence
pub const FENCE_RULES: &[FenceRule] = &[
    FenceRule {
        trigger: "```html",
        strip: &["```html", "```"],
    },
    FenceRule {
        trigger: "```",
        strip: &["```"],
    },
];

/// Strip code fences using [`FENCE_RULES`]
pub fn sanitize(raw: &str) -> String {
    sanitize_with(raw, FENCE_RULES)
}

/// Strip code fences using a caller-supplied rule table
pub fn sanitize_with(raw: &str, rules: &[FenceRule]) -> String {
    debug!(raw_len = raw.len(), rule_count = rules.len(), "sanitize_with: called");
    let Some(rule) = rules.iter().find(|r| raw.starts_with(r.trigger)) else {
        debug!("sanitize_with: no fence rule matched");
        return raw.to_string();
    };

    debug!(trigger = %rule.trigger, "sanitize_with: fence rule matched");
    let stripped = rule
        .strip
        .iter()
        .fold(raw.to_string(), |text, marker| text.replace(marker, ""));

    stripped.trim().to_string()
}
