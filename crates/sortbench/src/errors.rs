//! Error handling and exit codes.

use sortbench_core::constants::exit_codes;
use sortbench_core::ConfigError;

/// Application-level failures that map to a dedicated exit code.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("{missing} result cell(s) missing")]
    Incomplete { missing: usize },
}

impl AppError {
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) => exit_codes::ERROR_CONFIG,
            Self::Incomplete { .. } => exit_codes::ERROR_INCOMPLETE,
        }
    }
}

/// Exit code for an error returned by [`crate::app::run`].
#[must_use]
pub fn exit_code(err: &anyhow::Error) -> i32 {
    err.downcast_ref::<AppError>()
        .map_or(exit_codes::ERROR_GENERIC, AppError::exit_code)
}
