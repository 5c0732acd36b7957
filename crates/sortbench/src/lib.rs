//! sortbench library: application logic for the scaling benchmark harness.

pub mod app;
pub mod config;
pub mod errors;
