//! CLI progress narration.

use std::time::Instant;

use parking_lot::Mutex;

use sortbench_core::{TrialResult, TrialSpec};
use sortbench_orchestration::interfaces::{Pass, ProgressReporter};

use crate::output::{first_line, format_duration, format_seconds, format_speedup};
use crate::ui;

struct ProgressState {
    pass: Option<Pass>,
    index: usize,
    total: usize,
    trial_started: Instant,
    sweep_started: Instant,
}

/// Prints interleaved progress lines to stdout while the sweep runs.
pub struct CLIProgressReporter {
    quiet: bool,
    state: Mutex<ProgressState>,
}

impl CLIProgressReporter {
    #[must_use]
    pub fn new(quiet: bool) -> Self {
        let now = Instant::now();
        Self {
            quiet,
            state: Mutex::new(ProgressState {
                pass: None,
                index: 0,
                total: 0,
                trial_started: now,
                sweep_started: now,
            }),
        }
    }
}

impl ProgressReporter for CLIProgressReporter {
    fn pass_started(&self, pass: Pass, trials: usize) {
        let mut state = self.state.lock();
        state.pass = Some(pass);
        state.index = 0;
        state.total = trials;
        if !self.quiet {
            println!();
            ui::print_pass_banner(&pass_title(pass, trials));
        }
    }

    fn trial_started(&self, trial: &TrialSpec) {
        let mut state = self.state.lock();
        state.index += 1;
        state.trial_started = Instant::now();
        if !self.quiet {
            println!("[{}/{}] {}", state.index, state.total, running_line(trial));
        }
    }

    fn trial_finished(&self, result: &TrialResult) {
        let state = self.state.lock();
        if self.quiet {
            return;
        }
        let wall = format_duration(state.trial_started.elapsed());
        match result.elapsed_seconds {
            Some(_) => ui::print_success(&format!("{} (wall {wall})", done_line(result))),
            None => ui::print_error(&format!("{} (wall {wall})", done_line(result))),
        }
    }

    fn speedup_available(&self, _trial: &TrialSpec, speedup: f64) {
        if !self.quiet {
            println!("      speedup={}", format_speedup(Some(speedup)));
        }
    }

    fn complete(&self) {
        let state = self.state.lock();
        tracing::debug!(pass = ?state.pass, "progress complete");
        if !self.quiet {
            println!(
                "\nsweep finished in {}",
                format_duration(state.sweep_started.elapsed())
            );
        }
    }
}

fn pass_title(pass: Pass, trials: usize) -> String {
    match pass {
        Pass::Baseline => format!("baseline pass (1 worker, {trials} trials)"),
        Pass::Scaling => format!("scaling pass ({trials} trials)"),
    }
}

/// "running trial: size=X, workers=Y"
#[must_use]
pub fn running_line(trial: &TrialSpec) -> String {
    format!("running trial: {trial}")
}

/// "done: elapsed=Z", or the failure cause when no value was measured.
#[must_use]
pub fn done_line(result: &TrialResult) -> String {
    match (&result.failure, result.elapsed_seconds) {
        (_, Some(_)) => {
            let mut line = format!("done: elapsed={}", format_seconds(result.elapsed_seconds));
            if result.is_partial() {
                line.push_str(&format!(
                    " ({} client(s) failed)",
                    result.failed_clients.len()
                ));
            }
            line
        }
        (Some(err), None) => format!("done: elapsed={} ({err})", format_seconds(None)),
        (None, None) => format!("done: elapsed={}", format_seconds(None)),
    }
}

/// One-line description of a client failure.
#[must_use]
pub fn client_failure_line(worker_id: u32, exit_code: Option<i32>, stderr: &str) -> String {
    let code = exit_code.map_or_else(|| "no exit code".to_string(), |c| format!("code {c}"));
    let detail = first_line(stderr);
    if detail.is_empty() {
        format!("client {worker_id} exited with {code}")
    } else {
        format!("client {worker_id} exited with {code}: {detail}")
    }
}
