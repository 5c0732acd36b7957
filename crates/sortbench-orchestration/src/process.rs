//! Spawned child processes and their captured output.
//!
//! Every piped stream gets its own drain thread, so a child writing a lot of
//! output never blocks on a full pipe while the harness waits on another child.

use std::io::{BufRead, BufReader, Read};
use std::process::{Child, Command, Stdio};
use std::thread::{self, JoinHandle};

use crossbeam_channel::{Receiver, Sender};

use sortbench_core::{Harvest, Role, TrialError};

/// One running child. Harvesting consumes the handle.
#[derive(Debug)]
pub struct ProcessHandle {
    role: Role,
    child: Child,
    stdout: Option<JoinHandle<String>>,
    stderr: Option<JoinHandle<String>>,
    lines: Option<Receiver<String>>,
}

impl ProcessHandle {
    /// Spawn `command` with both output streams captured.
    pub fn spawn(role: Role, command: &mut Command) -> Result<Self, TrialError> {
        Self::spawn_inner(role, command, None)
    }

    /// Like [`spawn`](Self::spawn), additionally forwarding each stdout line
    /// to a channel available through [`take_lines`](Self::take_lines).
    pub fn spawn_tapped(role: Role, command: &mut Command) -> Result<Self, TrialError> {
        let (tx, rx) = crossbeam_channel::unbounded();
        let mut handle = Self::spawn_inner(role, command, Some(tx))?;
        handle.lines = Some(rx);
        Ok(handle)
    }

    fn spawn_inner(
        role: Role,
        command: &mut Command,
        tap: Option<Sender<String>>,
    ) -> Result<Self, TrialError> {
        command
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        let mut child = command
            .spawn()
            .map_err(|source| TrialError::Launch { role, source })?;
        tracing::debug!(%role, pid = child.id(), ?command, "spawned");

        let stdout = child.stdout.take().map(|out| drain(out, tap));
        let stderr = child.stderr.take().map(|err| drain(err, None));

        Ok(Self {
            role,
            child,
            stdout,
            stderr,
            lines: None,
        })
    }

    #[must_use]
    pub fn role(&self) -> Role {
        self.role
    }

    #[must_use]
    pub fn pid(&self) -> u32 {
        self.child.id()
    }

    /// Receiver of stdout lines, if the handle was spawned tapped.
    pub fn take_lines(&mut self) -> Option<Receiver<String>> {
        self.lines.take()
    }

    /// Best-effort termination.
    pub fn kill(&mut self) {
        if let Err(err) = self.child.kill() {
            tracing::debug!(role = %self.role, %err, "kill failed");
        }
    }

    /// Block until the child exits, then collect its exit code and output.
    pub fn harvest(mut self) -> Result<Harvest, TrialError> {
        let role = self.role;
        let status = self
            .child
            .wait()
            .map_err(|source| TrialError::Harvest { role, source })?;
        drop(self.lines.take());

        let stdout = join_drain(self.stdout.take());
        let stderr = join_drain(self.stderr.take());
        tracing::debug!(%role, code = ?status.code(), "harvested");

        Ok(Harvest {
            exit_code: status.code(),
            stdout,
            stderr,
        })
    }
}

fn drain<R>(reader: R, tap: Option<Sender<String>>) -> JoinHandle<String>
where
    R: Read + Send + 'static,
{
    thread::spawn(move || {
        let mut reader = BufReader::new(reader);
        let mut captured = String::new();
        let mut buf = Vec::new();
        loop {
            buf.clear();
            match reader.read_until(b'\n', &mut buf) {
                Ok(0) => break,
                Ok(_) => {
                    let line = String::from_utf8_lossy(&buf);
                    captured.push_str(&line);
                    if let Some(tx) = &tap {
                        // The receiver goes away once readiness is settled.
                        let _ = tx.send(line.trim_end_matches(['\r', '\n']).to_string());
                    }
                }
                Err(err) => {
                    tracing::debug!(%err, "pipe read failed");
                    break;
                }
            }
        }
        captured
    })
}

fn join_drain(handle: Option<JoinHandle<String>>) -> String {
    handle
        .map(|h| h.join().unwrap_or_default())
        .unwrap_or_default()
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    fn sh(script: &str) -> Command {
        let mut cmd = Command::new("sh");
        cmd.arg("-c").arg(script);
        cmd
    }

    #[test]
    fn harvest_collects_streams_and_code() {
        let handle =
            ProcessHandle::spawn(Role::Server, &mut sh("echo out; echo err >&2; exit 3")).unwrap();
        let harvest = handle.harvest().unwrap();
        assert_eq!(harvest.exit_code, Some(3));
        assert_eq!(harvest.stdout, "out\n");
        assert_eq!(harvest.stderr, "err\n");
    }

    #[test]
    fn tapped_lines_are_forwarded() {
        let mut handle =
            ProcessHandle::spawn_tapped(Role::Server, &mut sh("echo ready; echo more")).unwrap();
        let lines = handle.take_lines().unwrap();
        assert_eq!(lines.recv().unwrap(), "ready");
        assert_eq!(lines.recv().unwrap(), "more");
        let harvest = handle.harvest().unwrap();
        assert!(harvest.success());
        assert_eq!(harvest.stdout, "ready\nmore\n");
    }

    #[test]
    fn large_output_does_not_block() {
        let handle = ProcessHandle::spawn(
            Role::Client(0),
            &mut sh("i=0; while [ $i -lt 20000 ]; do echo line-$i; i=$((i+1)); done"),
        )
        .unwrap();
        let harvest = handle.harvest().unwrap();
        assert!(harvest.success());
        assert_eq!(harvest.stdout.lines().count(), 20_000);
    }

    #[test]
    fn invalid_utf8_is_decoded_lossily() {
        let handle = ProcessHandle::spawn(Role::Server, &mut sh("printf 'a\\377b\\n'")).unwrap();
        let harvest = handle.harvest().unwrap();
        assert!(harvest.stdout.starts_with('a'));
        assert!(harvest.stdout.contains('\u{fffd}'));
    }

    #[test]
    fn missing_executable_is_a_launch_failure() {
        let err = ProcessHandle::spawn(
            Role::Client(1),
            &mut Command::new("/nonexistent/sortbench-target"),
        )
        .unwrap_err();
        assert!(matches!(err, TrialError::Launch { role: Role::Client(1), .. }));
    }

    #[test]
    fn killed_child_has_no_exit_code() {
        let mut handle = ProcessHandle::spawn(Role::Server, &mut sh("exec sleep 30")).unwrap();
        handle.kill();
        let harvest = handle.harvest().unwrap();
        assert_eq!(harvest.exit_code, None);
    }
}
