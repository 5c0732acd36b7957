//! The measurement sweep: a baseline pass, then a scaling pass.

use serde::Serialize;

use sortbench_core::{
    speedup, HostInfo, ResultTable, SpeedupTable, SweepConfig, TrialError, TrialResult, TrialSpec,
    Verdict,
};

use crate::interfaces::{Pass, ProgressReporter, TrialExecutor};

/// Immutable outcome of a sweep, handed to the report stage.
#[derive(Debug, Serialize)]
pub struct SweepReport {
    pub config: SweepConfig,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub host: Option<HostInfo>,
    pub results: ResultTable,
    pub speedups: SpeedupTable,
    /// Per-trial outcomes in visitation order.
    pub trials: Vec<TrialResult>,
}

impl SweepReport {
    #[must_use]
    pub fn with_host(mut self, host: HostInfo) -> Self {
        self.host = Some(host);
        self
    }

    /// Cells that were visited but have no value.
    #[must_use]
    pub fn missing(&self) -> usize {
        self.results.missing()
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.missing() == 0
    }

    /// Trials to list in a failure section.
    pub fn attention(&self) -> impl Iterator<Item = &TrialResult> {
        self.trials.iter().filter(|t| t.needs_attention())
    }
}

/// Sequences every trial of a sweep, strictly one at a time.
pub struct MatrixRunner<'a> {
    executor: &'a dyn TrialExecutor,
    reporter: &'a dyn ProgressReporter,
}

impl<'a> MatrixRunner<'a> {
    #[must_use]
    pub fn new(executor: &'a dyn TrialExecutor, reporter: &'a dyn ProgressReporter) -> Self {
        Self { executor, reporter }
    }

    /// Run the baseline pass and the scaling pass over `config`.
    ///
    /// Never aborts: failed trials leave their cell absent and the sweep moves on.
    #[must_use]
    pub fn run(&self, config: &SweepConfig) -> SweepReport {
        let (baseline, scaling): (Vec<TrialSpec>, Vec<TrialSpec>) = config
            .trial_plan()
            .into_iter()
            .partition(TrialSpec::is_baseline);

        let mut results = ResultTable::new();
        let mut trials = Vec::with_capacity(baseline.len() + scaling.len());

        for (pass, plan) in [(Pass::Baseline, baseline), (Pass::Scaling, scaling)] {
            if plan.is_empty() {
                continue;
            }
            tracing::info!(%pass, trials = plan.len(), "pass started");
            self.reporter.pass_started(pass, plan.len());
            for trial in plan {
                trials.push(self.run_trial(trial, &mut results));
            }
        }

        self.reporter.complete();
        let speedups = SpeedupTable::derive(&results);
        tracing::info!(
            cells = results.len(),
            missing = results.missing(),
            speedups = speedups.len(),
            "sweep finished"
        );

        SweepReport {
            config: config.clone(),
            host: None,
            results,
            speedups,
            trials,
        }
    }

    fn run_trial(&self, trial: TrialSpec, results: &mut ResultTable) -> TrialResult {
        let _span = tracing::info_span!(
            "trial",
            size = trial.input_size,
            workers = trial.worker_count
        )
        .entered();

        self.reporter.trial_started(&trial);
        let result = self.executor.execute(trial);
        log_outcome(&result);

        results.record(trial, result.elapsed_seconds);
        self.reporter.trial_finished(&result);

        if !trial.is_baseline() {
            if let Some(ratio) = speedup(results, trial.input_size, trial.worker_count) {
                self.reporter.speedup_available(&trial, ratio);
            }
        }
        result
    }
}

fn log_outcome(result: &TrialResult) {
    match &result.failure {
        Some(TrialError::NonZeroExit { code, stderr }) => {
            tracing::warn!(?code, stderr = %stderr, "server failed");
        }
        Some(TrialError::MetricNotFound { stdout }) => {
            tracing::warn!(stdout = %stdout, "elapsed time missing from server output");
        }
        Some(err) => tracing::warn!(%err, "trial failed"),
        None => {}
    }
    for client in &result.failed_clients {
        tracing::warn!(
            worker_id = client.worker_id,
            code = ?client.exit_code,
            stderr = %client.stderr,
            "client failed"
        );
    }
    if result.verdict == Verdict::Incorrect {
        tracing::warn!("server reported an incorrectly sorted result");
    }
}
