//! Orchestration interfaces.

use std::fmt;

use sortbench_core::{TrialResult, TrialSpec};

/// Runs one trial to completion.
pub trait TrialExecutor {
    /// Execute `trial`. Failures are reported inside the result, never raised.
    fn execute(&self, trial: TrialSpec) -> TrialResult;
}

/// Phase of the sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pass {
    /// Single-worker trials for every size.
    Baseline,
    /// Multi-worker trials.
    Scaling,
}

impl fmt::Display for Pass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Baseline => f.write_str("baseline"),
            Self::Scaling => f.write_str("scaling"),
        }
    }
}

/// Trait for narrating sweep progress to the user.
pub trait ProgressReporter: Send + Sync {
    /// A pass with `trials` trials begins.
    fn pass_started(&self, pass: Pass, trials: usize);

    /// A trial is about to launch.
    fn trial_started(&self, trial: &TrialSpec);

    /// A trial finished, successfully or not.
    fn trial_finished(&self, result: &TrialResult);

    /// A new speedup became computable.
    fn speedup_available(&self, trial: &TrialSpec, speedup: f64);

    /// Report completion.
    fn complete(&self);
}

/// Null progress reporter (does nothing).
pub struct NullProgressReporter;

impl ProgressReporter for NullProgressReporter {
    fn pass_started(&self, _pass: Pass, _trials: usize) {}
    fn trial_started(&self, _trial: &TrialSpec) {}
    fn trial_finished(&self, _result: &TrialResult) {}
    fn speedup_available(&self, _trial: &TrialSpec, _speedup: f64) {}
    fn complete(&self) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use sortbench_core::Verdict;

    #[test]
    fn null_reporter() {
        let reporter = NullProgressReporter;
        let trial = TrialSpec::new(1000, 2);
        reporter.pass_started(Pass::Scaling, 1);
        reporter.trial_started(&trial);
        reporter.trial_finished(&TrialResult::measured(trial, 0.1, Verdict::Correct, vec![]));
        reporter.speedup_available(&trial, 2.0);
        reporter.complete();
    }

    #[test]
    fn pass_display() {
        assert_eq!(Pass::Baseline.to_string(), "baseline");
        assert_eq!(Pass::Scaling.to_string(), "scaling");
    }
}
