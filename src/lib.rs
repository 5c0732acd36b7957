//! Shared fixtures for workspace-level integration tests.
//!
//! [`StubExecutable`] writes a POSIX shell script that honors the server/client
//! argument contract of the tested sort executable, so trials can run against
//! real child processes.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

/// A shell script standing in for the distributed sort executable.
///
/// The server body sees `$1 = server`, `$2 = worker_count`, `$3 = input_size`.
/// The client body sees `$1 = client`, `$2 = address`, `$3 = worker_id`,
/// `$4 = worker_count`. The directory is removed on drop.
pub struct StubExecutable {
    dir: TempDir,
    path: PathBuf,
}

impl StubExecutable {
    /// Build a stub from a server body and a client body.
    pub fn new(server: &str, client: &str) -> io::Result<Self> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("sort-stub");
        let script = format!(
            "#!/bin/sh\n\
             if [ \"$1\" = server ]; then\n{server}\nexit 0\nfi\n\
             {client}\nexit 0\n"
        );
        fs::write(&path, script)?;
        make_executable(&path)?;
        Ok(Self { dir, path })
    }

    /// Server reporting `seconds` regardless of the trial.
    pub fn reporting(seconds: &str) -> io::Result<Self> {
        Self::new(
            &format!("echo \"total sort time: {seconds} seconds\"\necho \"sort result correct!\""),
            ":",
        )
    }

    /// Server whose reported time depends on the worker count: the classic
    /// 0.05 s serial, 0.03 s on two workers, 0.02 s otherwise.
    pub fn scaling() -> io::Result<Self> {
        Self::new(
            "case \"$2\" in\n\
             1) t=0.0500 ;;\n\
             2) t=0.0300 ;;\n\
             *) t=0.0200 ;;\n\
             esac\n\
             echo \"server on port 12345, waiting for $2 clients\"\n\
             echo \"total sort time: $t seconds\"\n\
             echo \"sort result correct!\"",
            ":",
        )
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Scratch directory next to the script, for files the stub writes.
    #[must_use]
    pub fn dir(&self) -> &Path {
        self.dir.path()
    }
}

#[cfg(unix)]
fn make_executable(path: &Path) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o755))
}

#[cfg(not(unix))]
fn make_executable(_path: &Path) -> io::Result<()> {
    Ok(())
}
