//! Process orchestration for a single trial: one server, `worker_count` clients.

use std::path::PathBuf;
use std::process::Command;
use std::thread;
use std::time::{Duration, Instant};

use crossbeam_channel::{Receiver, RecvTimeoutError};

use sortbench_core::constants::{CLIENT_ROLE, SERVER_ROLE};
use sortbench_core::{
    extract, extract_verdict, ClientFailure, Harvest, Readiness, Role, SweepConfig, TrialError,
    TrialResult, TrialSpec,
};

use crate::interfaces::TrialExecutor;
use crate::process::ProcessHandle;

/// Drives the tested executable through its server/client contract.
#[derive(Debug, Clone)]
pub struct ProcessOrchestrator {
    executable: PathBuf,
    server_address: String,
    readiness: Readiness,
}

impl ProcessOrchestrator {
    #[must_use]
    pub fn new(
        executable: impl Into<PathBuf>,
        server_address: impl Into<String>,
        readiness: Readiness,
    ) -> Self {
        Self {
            executable: executable.into(),
            server_address: server_address.into(),
            readiness,
        }
    }

    #[must_use]
    pub fn from_config(config: &SweepConfig) -> Self {
        Self::new(
            config.executable.clone(),
            config.server_address.clone(),
            config.readiness.clone(),
        )
    }

    /// Start the server for `worker_count` clients sorting `input_size` elements.
    pub fn launch_server(
        &self,
        worker_count: u32,
        input_size: u64,
    ) -> Result<ProcessHandle, TrialError> {
        let mut cmd = Command::new(&self.executable);
        cmd.arg(SERVER_ROLE)
            .arg(worker_count.to_string())
            .arg(input_size.to_string());
        match self.readiness {
            Readiness::Delay(_) => ProcessHandle::spawn(Role::Server, &mut cmd),
            Readiness::Marker { .. } => ProcessHandle::spawn_tapped(Role::Server, &mut cmd),
        }
    }

    /// Wait until the server is presumed ready to accept clients.
    pub fn settle(&self, server: &mut ProcessHandle) {
        match &self.readiness {
            Readiness::Delay(delay) => thread::sleep(*delay),
            // Marker readiness needs a handle from `spawn_tapped`, which
            // `launch_server` uses in that mode.
            Readiness::Marker { text, limit } => match server.take_lines() {
                Some(lines) => {
                    wait_for_marker(&lines, text, *limit);
                }
                None => tracing::warn!(
                    role = %server.role(),
                    marker = %text,
                    "server stdout is not tapped, launching clients without waiting"
                ),
            },
        }
    }

    /// Start one client per worker id in `0..worker_count`.
    ///
    /// If any client fails to start, the ones already running are killed and
    /// reaped before the error is returned.
    pub fn launch_clients(
        &self,
        server_address: &str,
        worker_count: u32,
    ) -> Result<Vec<ProcessHandle>, TrialError> {
        let mut clients = Vec::with_capacity(worker_count as usize);
        for worker_id in 0..worker_count {
            let mut cmd = Command::new(&self.executable);
            cmd.arg(CLIENT_ROLE)
                .arg(server_address)
                .arg(worker_id.to_string())
                .arg(worker_count.to_string());
            match ProcessHandle::spawn(Role::Client(worker_id), &mut cmd) {
                Ok(client) => clients.push(client),
                Err(err) => {
                    abandon(clients);
                    return Err(err);
                }
            }
        }
        Ok(clients)
    }

    /// Join barrier: block until every handle has exited. No timeout.
    pub fn await_completion(
        handles: Vec<ProcessHandle>,
    ) -> Vec<(Role, Result<Harvest, TrialError>)> {
        handles
            .into_iter()
            .map(|handle| (handle.role(), handle.harvest()))
            .collect()
    }

    /// Collect the server's exit code and output. Call once all clients are done.
    pub fn harvest_server(server: ProcessHandle) -> Result<Harvest, TrialError> {
        server.harvest()
    }
}

impl TrialExecutor for ProcessOrchestrator {
    fn execute(&self, trial: TrialSpec) -> TrialResult {
        let mut server = match self.launch_server(trial.worker_count, trial.input_size) {
            Ok(server) => server,
            Err(err) => return TrialResult::failed(trial, err),
        };
        self.settle(&mut server);

        let clients = match self.launch_clients(&self.server_address, trial.worker_count) {
            Ok(clients) => clients,
            Err(err) => {
                abandon(vec![server]);
                return TrialResult::failed(trial, err);
            }
        };

        let failed_clients = client_failures(Self::await_completion(clients));
        let harvest = match Self::harvest_server(server) {
            Ok(harvest) => harvest,
            Err(err) => return TrialResult::failed(trial, err).with_failed_clients(failed_clients),
        };

        match extract(&harvest) {
            Ok(elapsed) => TrialResult::measured(
                trial,
                elapsed,
                extract_verdict(&harvest.stdout),
                failed_clients,
            ),
            Err(err) => TrialResult::failed(trial, err).with_failed_clients(failed_clients),
        }
    }
}

/// Kill and reap children of a trial that cannot proceed.
fn abandon(handles: Vec<ProcessHandle>) {
    for mut handle in handles {
        handle.kill();
        let role = handle.role();
        if let Err(err) = handle.harvest() {
            tracing::debug!(%role, %err, "failed to reap abandoned child");
        }
    }
}

/// Block on `lines` until one contains `marker`, the server closes stdout, or
/// `limit` elapses. Returns whether the marker was seen.
///
/// A `limit` too large to form a deadline waits without one.
pub fn wait_for_marker(lines: &Receiver<String>, marker: &str, limit: Duration) -> bool {
    let deadline = Instant::now().checked_add(limit);
    loop {
        let next = match deadline {
            Some(deadline) => lines.recv_deadline(deadline),
            None => lines.recv().map_err(|_| RecvTimeoutError::Disconnected),
        };
        match next {
            Ok(line) if line.contains(marker) => {
                tracing::debug!(%line, "server ready");
                return true;
            }
            Ok(_) => {}
            Err(RecvTimeoutError::Timeout) => {
                tracing::warn!(
                    marker,
                    ?limit,
                    "readiness marker not seen, launching clients anyway"
                );
                return false;
            }
            Err(RecvTimeoutError::Disconnected) => {
                tracing::debug!(marker, "server closed stdout before readiness marker");
                return false;
            }
        }
    }
}

/// Clients that exited unsuccessfully or could not be reaped.
pub fn client_failures(
    harvested: Vec<(Role, Result<Harvest, TrialError>)>,
) -> Vec<ClientFailure> {
    harvested
        .into_iter()
        .filter_map(|(role, outcome)| {
            let Role::Client(worker_id) = role else {
                return None;
            };
            match outcome {
                Ok(harvest) if harvest.success() => None,
                Ok(harvest) => Some(ClientFailure {
                    worker_id,
                    exit_code: harvest.exit_code,
                    stderr: harvest.stderr,
                }),
                Err(err) => Some(ClientFailure {
                    worker_id,
                    exit_code: None,
                    stderr: err.to_string(),
                }),
            }
        })
        .collect()
}
