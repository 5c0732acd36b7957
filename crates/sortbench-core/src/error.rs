//! Error types for trials and sweep configuration.

use crate::trial::Role;

/// Why a trial produced no elapsed time.
#[derive(Debug, thiserror::Error)]
pub enum TrialError {
    /// The operating system could not start a child.
    #[error("failed to launch {role}: {source}")]
    Launch {
        role: Role,
        #[source]
        source: std::io::Error,
    },

    /// Waiting on a child or draining its output failed.
    #[error("failed to harvest {role}: {source}")]
    Harvest {
        role: Role,
        #[source]
        source: std::io::Error,
    },

    /// The server signaled failure.
    #[error("server exited with {}", describe_exit(.code))]
    NonZeroExit { code: Option<i32>, stderr: String },

    /// The server succeeded but printed no usable measurement.
    #[error("elapsed time not found in server output")]
    MetricNotFound { stdout: String },
}

impl TrialError {
    /// Short tag used in reports.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Launch { .. } => "launch-failure",
            Self::Harvest { .. } => "harvest-failure",
            Self::NonZeroExit { .. } => "non-zero-exit",
            Self::MetricNotFound { .. } => "metric-not-found",
        }
    }
}

fn describe_exit(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("code {code}"),
        None => "no exit code (terminated by signal)".to_string(),
    }
}

/// Invalid sweep configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("no input sizes configured")]
    NoSizes,

    #[error("no worker counts configured")]
    NoWorkers,

    #[error("input sizes must be positive")]
    ZeroSize,

    #[error("worker counts must be positive")]
    ZeroWorkers,

    #[error("input size {0} listed more than once")]
    DuplicateSize(u64),

    #[error("worker count {0} listed more than once")]
    DuplicateWorkers(u32),

    #[error("invalid list entry {0:?}")]
    InvalidEntry(String),

    #[error("invalid duration {0:?}")]
    InvalidDuration(String),

    #[error("executable path is empty")]
    EmptyExecutable,
}
