//! Embedded prompts
//!
//! These are compiled into the binary from .pmt files at build time.

use tracing::debug;

/// Goal-to-task breakdown system prompt
pub const BREAKDOWN: &str = include_str!("../../prompts/breakdown.pmt");

/// Get the embedded prompt by name
pub fn get_embedded(name: &str) -> Option<&'static str> {
    debug!(%name, "get_embedded: called");
    match name {
        "breakdown" => {
            debug!("get_embedded: matched breakdown");
            Some(BREAKDOWN)
        }
        _ => {
            debug!("get_embedded: no match found");
            None
        }
    }
}
