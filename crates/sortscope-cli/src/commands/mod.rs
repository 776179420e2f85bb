pub mod advise;
pub mod config;
pub mod play;
pub mod run;
pub mod steps;

use anyhow::{Context, Result};

/// Parse a comma-separated list of integers. Unlike the TUI input box,
/// any length is accepted, including none.
pub fn parse_values(input: &str) -> Result<Vec<i64>> {
    let input = input.trim();
    if input.is_empty() {
        return Ok(Vec::new());
    }
    input
        .split(',')
        .map(|token| {
            token
                .trim()
                .parse::<i64>()
                .with_context(|| format!("Invalid number: '{}'", token.trim()))
        })
        .collect()
}
