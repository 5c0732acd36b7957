//! # sortbench-core
//!
//! Data model of the sortbench harness: trial identity and outcome, sweep
//! configuration, metric extraction from the tested server's output, and the
//! result and speedup tables.

pub mod config;
pub mod constants;
pub mod error;
pub mod extract;
pub mod host;
pub mod speedup;
pub mod table;
pub mod trial;

// Re-exports
pub use config::{Readiness, SweepConfig};
pub use constants::{exit_codes, BASELINE_WORKERS, NOT_AVAILABLE};
pub use error::{ConfigError, TrialError};
pub use extract::{extract, extract_elapsed_seconds, extract_verdict};
pub use host::HostInfo;
pub use speedup::{speedup, SpeedupTable};
pub use table::ResultTable;
pub use trial::{ClientFailure, Harvest, Role, TrialResult, TrialSpec, Verdict};
