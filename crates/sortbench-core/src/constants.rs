//! Constants for the tested executable's contract and sweep defaults.

use std::time::Duration;

/// Label that precedes the elapsed time in the server's output.
pub const ELAPSED_LABEL: &str = "total sort time:";

/// Unit printed after the elapsed time.
pub const ELAPSED_UNIT: &str = "seconds";

/// Self-check line printed by the server when the merged output is ordered.
pub const VERDICT_CORRECT: &str = "sort result correct!";

/// Self-check line printed by the server when the merged output is out of order.
pub const VERDICT_INCORRECT: &str = "sort result incorrect!";

/// First argument selecting the server role.
pub const SERVER_ROLE: &str = "server";

/// First argument selecting the client role.
pub const CLIENT_ROLE: &str = "client";

/// Worker count of the serial reference trial.
pub const BASELINE_WORKERS: u32 = 1;

/// Default pause between server launch and client launch.
pub const DEFAULT_SETTLE_DELAY: Duration = Duration::from_secs(1);

/// Default fallback when waiting for a readiness marker.
pub const DEFAULT_READY_LIMIT: Duration = Duration::from_secs(30);

/// Default address handed to clients. The server binds a fixed loopback port.
pub const DEFAULT_SERVER_ADDRESS: &str = "127.0.0.1";

/// Default input sizes: 1K, 5K, 10K, 100K, 1M elements.
pub const DEFAULT_SIZES: [u64; 5] = [1_000, 5_000, 10_000, 100_000, 1_000_000];

/// Default worker counts. The first entry is the baseline.
pub const DEFAULT_WORKERS: [u32; 3] = [1, 2, 4];

/// Marker rendered for a missing time or speedup.
pub const NOT_AVAILABLE: &str = "N/A";

/// Process exit codes.
pub mod exit_codes {
    /// Sweep completed.
    pub const SUCCESS: i32 = 0;
    /// Generic error.
    pub const ERROR_GENERIC: i32 = 1;
    /// At least one cell is missing and `--fail-on-missing` was given.
    pub const ERROR_INCOMPLETE: i32 = 3;
    /// Invalid configuration.
    pub const ERROR_CONFIG: i32 = 4;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_workers_start_with_baseline() {
        assert_eq!(DEFAULT_WORKERS[0], BASELINE_WORKERS);
    }

    #[test]
    fn verdict_lines_are_distinct() {
        assert!(!VERDICT_INCORRECT.contains(VERDICT_CORRECT));
    }
}
