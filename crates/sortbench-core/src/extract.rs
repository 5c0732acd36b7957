//! Metric extraction from the server's captured output.
//!
//! The server prints free-form diagnostics around a single labeled line such as
//! `total sort time: 0.0500 seconds`. Only the first labeled line counts.

use std::sync::LazyLock;

use regex::Regex;

use crate::constants::{ELAPSED_LABEL, ELAPSED_UNIT, VERDICT_CORRECT, VERDICT_INCORRECT};
use crate::error::TrialError;
use crate::trial::{Harvest, Verdict};

static ELAPSED_LINE: LazyLock<Regex> = LazyLock::new(|| {
    let pattern = format!(
        r"{}[ \t]*([0-9.]+)[ \t]*{}",
        regex::escape(ELAPSED_LABEL),
        regex::escape(ELAPSED_UNIT)
    );
    Regex::new(&pattern).expect("static pattern is valid")
});

/// Elapsed seconds from the first labeled line of `stdout`.
///
/// Returns `None` if no line carries the label or if its number does not parse.
#[must_use]
pub fn extract_elapsed_seconds(stdout: &str) -> Option<f64> {
    let line = stdout.lines().find(|line| ELAPSED_LINE.is_match(line))?;
    let caps = ELAPSED_LINE.captures(line)?;
    let value: f64 = caps[1].parse().ok()?;
    value.is_finite().then_some(value)
}

/// The server's self-check, first occurrence wins.
#[must_use]
pub fn extract_verdict(stdout: &str) -> Verdict {
    for line in stdout.lines() {
        if line.contains(VERDICT_INCORRECT) {
            return Verdict::Incorrect;
        }
        if line.contains(VERDICT_CORRECT) {
            return Verdict::Correct;
        }
    }
    Verdict::Unknown
}

/// Elapsed seconds of a harvested server, or why there are none.
pub fn extract(server: &Harvest) -> Result<f64, TrialError> {
    if !server.success() {
        return Err(TrialError::NonZeroExit {
            code: server.exit_code,
            stderr: server.stderr.clone(),
        });
    }
    extract_elapsed_seconds(&server.stdout).ok_or_else(|| TrialError::MetricNotFound {
        stdout: server.stdout.clone(),
    })
}
