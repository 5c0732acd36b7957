//! # sortbench-orchestration
//!
//! Child process lifecycle, single-trial execution, and the two-pass
//! measurement sweep.

pub mod interfaces;
pub mod orchestrator;
pub mod process;
pub mod runner;

pub use interfaces::{NullProgressReporter, Pass, ProgressReporter, TrialExecutor};
pub use orchestrator::ProcessOrchestrator;
pub use process::ProcessHandle;
pub use runner::{MatrixRunner, SweepReport};
