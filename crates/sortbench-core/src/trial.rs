//! Trial identity, harvested output, and per-trial outcome.

use std::fmt;

use serde::{Serialize, Serializer};

use crate::constants::BASELINE_WORKERS;
use crate::error::TrialError;

/// One point of the measurement matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct TrialSpec {
    /// Number of elements the server sorts.
    pub input_size: u64,
    /// Number of client processes.
    pub worker_count: u32,
}

impl TrialSpec {
    #[must_use]
    pub fn new(input_size: u64, worker_count: u32) -> Self {
        Self {
            input_size,
            worker_count,
        }
    }

    /// Serial reference trial for `input_size`.
    #[must_use]
    pub fn baseline(input_size: u64) -> Self {
        Self::new(input_size, BASELINE_WORKERS)
    }

    #[must_use]
    pub fn is_baseline(&self) -> bool {
        self.worker_count == BASELINE_WORKERS
    }
}

impl fmt::Display for TrialSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "size={}, workers={}", self.input_size, self.worker_count)
    }
}

/// Role a child process plays in a trial.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Server,
    /// Client with its ordinal worker id.
    Client(u32),
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Server => f.write_str("server"),
            Self::Client(id) => write!(f, "client {id}"),
        }
    }
}

/// Exit status and captured streams of one finished child.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Harvest {
    /// `None` when the child was terminated by a signal.
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl Harvest {
    #[must_use]
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }
}

/// The server's own check of the merged output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    Correct,
    Incorrect,
    #[default]
    Unknown,
}

/// A client that did not exit cleanly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClientFailure {
    pub worker_id: u32,
    pub exit_code: Option<i32>,
    pub stderr: String,
}

/// Outcome of one trial.
#[derive(Debug, Serialize)]
pub struct TrialResult {
    pub trial: TrialSpec,
    /// Absent when the trial failed or its metric was not found.
    pub elapsed_seconds: Option<f64>,
    /// Cause of an absent value.
    #[serde(serialize_with = "serialize_failure")]
    pub failure: Option<TrialError>,
    pub failed_clients: Vec<ClientFailure>,
    pub verdict: Verdict,
}

impl TrialResult {
    /// A trial whose server reported an elapsed time.
    #[must_use]
    pub fn measured(
        trial: TrialSpec,
        elapsed_seconds: f64,
        verdict: Verdict,
        failed_clients: Vec<ClientFailure>,
    ) -> Self {
        Self {
            trial,
            elapsed_seconds: Some(elapsed_seconds),
            failure: None,
            failed_clients,
            verdict,
        }
    }

    /// A trial that produced no value.
    #[must_use]
    pub fn failed(trial: TrialSpec, failure: TrialError) -> Self {
        Self {
            trial,
            elapsed_seconds: None,
            failure: Some(failure),
            failed_clients: Vec::new(),
            verdict: Verdict::Unknown,
        }
    }

    /// Attach client failures observed while the server failed too.
    #[must_use]
    pub fn with_failed_clients(mut self, failed_clients: Vec<ClientFailure>) -> Self {
        self.failed_clients = failed_clients;
        self
    }

    /// The server reported a time but at least one client failed.
    #[must_use]
    pub fn is_partial(&self) -> bool {
        self.elapsed_seconds.is_some() && !self.failed_clients.is_empty()
    }

    /// Anything worth listing in the failure section of a report.
    #[must_use]
    pub fn needs_attention(&self) -> bool {
        self.elapsed_seconds.is_none()
            || !self.failed_clients.is_empty()
            || self.verdict == Verdict::Incorrect
    }
}

#[allow(clippy::ref_option)]
fn serialize_failure<S: Serializer>(
    failure: &Option<TrialError>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match failure {
        Some(err) => serializer.serialize_some(&err.to_string()),
        None => serializer.serialize_none(),
    }
}
