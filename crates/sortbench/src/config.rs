//! Application configuration from CLI flags and environment.

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use clap::{Parser, ValueEnum};

use sortbench_core::constants::DEFAULT_READY_LIMIT;
use sortbench_core::{ConfigError, Readiness, SweepConfig};

/// Final report format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Aligned text table.
    Table,
    /// Pretty-printed JSON document.
    Json,
}

/// sortbench: measure how a distributed sort scales with its worker count.
#[derive(Parser, Debug)]
#[command(name = "sortbench", version, about)]
#[allow(clippy::struct_excessive_bools)]
pub struct AppConfig {
    /// Tested executable (server and client roles).
    #[arg(short, long, default_value = "./psrs_socket", env = "SORTBENCH_EXECUTABLE")]
    pub executable: PathBuf,

    /// Comma-separated input sizes, one report row each.
    #[arg(
        short,
        long,
        default_value = "1000,5000,10000,100000,1000000",
        env = "SORTBENCH_SIZES"
    )]
    pub sizes: String,

    /// Comma-separated worker counts. 1 is the serial baseline.
    #[arg(short, long, default_value = "1,2,4", env = "SORTBENCH_WORKERS")]
    pub workers: String,

    /// Address handed to every client.
    #[arg(short = 'a', long, default_value = "127.0.0.1", env = "SORTBENCH_SERVER_ADDRESS")]
    pub server_address: String,

    /// Delay between server start and client start (e.g. "500ms", "1s").
    #[arg(long, default_value = "1s", env = "SORTBENCH_SETTLE")]
    pub settle: String,

    /// Wait for a server output line containing this text instead of sleeping.
    #[arg(long, env = "SORTBENCH_READY_MARKER")]
    pub ready_marker: Option<String>,

    /// Longest wait for the readiness marker before launching clients anyway [default: 30s].
    #[arg(long, env = "SORTBENCH_READY_LIMIT")]
    pub ready_limit: Option<String>,

    /// Final report format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Table, env = "SORTBENCH_FORMAT")]
    pub format: OutputFormat,

    /// No progress narration, only the final report.
    #[arg(short, long, env = "SORTBENCH_QUIET")]
    pub quiet: bool,

    /// Debug logging on stderr.
    #[arg(short, long, env = "SORTBENCH_VERBOSE")]
    pub verbose: bool,

    /// Exit with a distinct code when any result cell is missing.
    #[arg(long, env = "SORTBENCH_FAIL_ON_MISSING")]
    pub fail_on_missing: bool,

    /// Generate shell completion.
    #[arg(long, value_enum)]
    pub completion: Option<clap_complete::Shell>,
}

impl AppConfig {
    /// Parse CLI arguments.
    #[must_use]
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }

    /// Default log level, before `RUST_LOG` is applied.
    #[must_use]
    pub fn log_level(&self) -> tracing::Level {
        if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::WARN
        }
    }

    /// Narration is suppressed when asked for, and whenever stdout carries JSON.
    #[must_use]
    pub fn narration_quiet(&self) -> bool {
        self.quiet || self.format == OutputFormat::Json
    }

    /// Build and validate the sweep configuration.
    pub fn to_sweep_config(&self) -> Result<SweepConfig, ConfigError> {
        let readiness = match self.ready_marker.as_deref() {
            Some(text) if !text.is_empty() => Readiness::Marker {
                text: text.to_string(),
                limit: match self.ready_limit.as_deref() {
                    Some(limit) => parse_duration(limit)?,
                    None => DEFAULT_READY_LIMIT,
                },
            },
            _ => Readiness::Delay(parse_duration(&self.settle)?),
        };

        let config = SweepConfig {
            executable: self.executable.clone(),
            sizes: parse_list(&self.sizes)?,
            workers: parse_list(&self.workers)?,
            server_address: self.server_address.clone(),
            readiness,
        };
        config.validate()?;
        Ok(config)
    }
}

/// Parse a comma-separated list of positive integers. Blank entries are skipped.
pub fn parse_list<T: FromStr>(s: &str) -> Result<Vec<T>, ConfigError> {
    s.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| {
            entry
                .parse()
                .map_err(|_| ConfigError::InvalidEntry(entry.to_string()))
        })
        .collect()
}

/// Longest settle delay or readiness limit accepted.
pub const MAX_DURATION: Duration = Duration::from_secs(24 * 60 * 60);

/// Parse a duration string like "500ms", "30s", "2m". A bare number is seconds.
/// Anything above [`MAX_DURATION`] is rejected.
pub fn parse_duration(s: &str) -> Result<Duration, ConfigError> {
    let s = s.trim();
    let invalid = || ConfigError::InvalidDuration(s.to_string());
    let number = |digits: &str| digits.trim().parse::<u64>().map_err(|_| invalid());

    let duration = if let Some(ms) = s.strip_suffix("ms") {
        Duration::from_millis(number(ms)?)
    } else if let Some(mins) = s.strip_suffix('m') {
        Duration::from_secs(number(mins)?.checked_mul(60).ok_or_else(invalid)?)
    } else if let Some(secs) = s.strip_suffix('s') {
        Duration::from_secs(number(secs)?)
    } else {
        Duration::from_secs(number(s)?)
    };

    if duration > MAX_DURATION {
        return Err(invalid());
    }
    Ok(duration)
}
