//! # sortbench-cli
//!
//! Progress narration, the final report, and shell completion.

pub mod completion;
pub mod output;
pub mod presenter;
pub mod report;
pub mod ui;

pub use presenter::CLIProgressReporter;
pub use report::{render_json, render_report};
