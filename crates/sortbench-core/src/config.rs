//! Sweep configuration.

use std::collections::HashSet;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use serde::{Serialize, Serializer};

use crate::constants::{
    BASELINE_WORKERS, DEFAULT_SERVER_ADDRESS, DEFAULT_SETTLE_DELAY, DEFAULT_SIZES, DEFAULT_WORKERS,
};
use crate::error::ConfigError;
use crate::trial::TrialSpec;

/// How the harness decides the server is ready for clients.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Readiness {
    /// Sleep for a fixed settling delay.
    Delay(Duration),
    /// Wait for a server stdout line containing `text`, proceeding anyway after `limit`.
    Marker { text: String, limit: Duration },
}

impl Default for Readiness {
    fn default() -> Self {
        Self::Delay(DEFAULT_SETTLE_DELAY)
    }
}

impl fmt::Display for Readiness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Delay(delay) => write!(f, "delay {delay:?}"),
            Self::Marker { text, limit } => write!(f, "marker {text:?} (limit {limit:?})"),
        }
    }
}

/// Everything one harness run needs to know.
#[derive(Debug, Clone, Serialize)]
pub struct SweepConfig {
    /// Tested executable.
    pub executable: PathBuf,
    /// Input sizes in row order.
    pub sizes: Vec<u64>,
    /// Worker counts in column order. Conventionally starts with 1.
    pub workers: Vec<u32>,
    /// Address handed to every client.
    pub server_address: String,
    #[serde(serialize_with = "serialize_display")]
    pub readiness: Readiness,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            executable: PathBuf::from("./psrs_socket"),
            sizes: DEFAULT_SIZES.to_vec(),
            workers: DEFAULT_WORKERS.to_vec(),
            server_address: DEFAULT_SERVER_ADDRESS.to_string(),
            readiness: Readiness::default(),
        }
    }
}

impl SweepConfig {
    /// Reject configurations that cannot describe a sweep.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.executable.as_os_str().is_empty() {
            return Err(ConfigError::EmptyExecutable);
        }
        if self.sizes.is_empty() {
            return Err(ConfigError::NoSizes);
        }
        if self.workers.is_empty() {
            return Err(ConfigError::NoWorkers);
        }
        if self.sizes.contains(&0) {
            return Err(ConfigError::ZeroSize);
        }
        if self.workers.contains(&0) {
            return Err(ConfigError::ZeroWorkers);
        }

        let mut seen = HashSet::new();
        if let Some(&dup) = self.sizes.iter().find(|s| !seen.insert(**s)) {
            return Err(ConfigError::DuplicateSize(dup));
        }
        let mut seen = HashSet::new();
        if let Some(&dup) = self.workers.iter().find(|w| !seen.insert(**w)) {
            return Err(ConfigError::DuplicateWorkers(dup));
        }
        Ok(())
    }

    /// Worker counts other than the baseline, in configured order.
    pub fn scaling_workers(&self) -> impl Iterator<Item = u32> + '_ {
        self.workers
            .iter()
            .copied()
            .filter(|&w| w != BASELINE_WORKERS)
    }

    /// Every trial in visitation order: the baseline pass over all sizes, then
    /// for each scaling worker count, every size.
    #[must_use]
    pub fn trial_plan(&self) -> Vec<TrialSpec> {
        let baseline = self.sizes.iter().map(|&size| TrialSpec::baseline(size));
        let scaling = self.scaling_workers().flat_map(|workers| {
            self.sizes
                .iter()
                .map(move |&size| TrialSpec::new(size, workers))
        });
        baseline.chain(scaling).collect()
    }
}

fn serialize_display<T: fmt::Display, S: Serializer>(
    value: &T,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.collect_str(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(sizes: &[u64], workers: &[u32]) -> SweepConfig {
        SweepConfig {
            sizes: sizes.to_vec(),
            workers: workers.to_vec(),
            ..SweepConfig::default()
        }
    }

    #[test]
    fn default_is_valid() {
        assert!(SweepConfig::default().validate().is_ok());
        assert_eq!(
            SweepConfig::default().readiness,
            Readiness::Delay(Duration::from_secs(1))
        );
    }

    #[test]
    fn rejects_empty_lists() {
        assert_eq!(config(&[], &[1]).validate(), Err(ConfigError::NoSizes));
        assert_eq!(config(&[10], &[]).validate(), Err(ConfigError::NoWorkers));
    }

    #[test]
    fn rejects_zero_entries() {
        assert_eq!(config(&[0, 10], &[1]).validate(), Err(ConfigError::ZeroSize));
        assert_eq!(
            config(&[10], &[1, 0]).validate(),
            Err(ConfigError::ZeroWorkers)
        );
    }

    #[test]
    fn rejects_duplicates() {
        assert_eq!(
            config(&[10, 20, 10], &[1]).validate(),
            Err(ConfigError::DuplicateSize(10))
        );
        assert_eq!(
            config(&[10], &[1, 2, 2]).validate(),
            Err(ConfigError::DuplicateWorkers(2))
        );
    }

    #[test]
    fn rejects_empty_executable() {
        let cfg = SweepConfig {
            executable: PathBuf::new(),
            ..SweepConfig::default()
        };
        assert_eq!(cfg.validate(), Err(ConfigError::EmptyExecutable));
    }

    #[test]
    fn plan_runs_baselines_first() {
        let plan = config(&[1000, 1_000_000], &[1, 2, 4]).trial_plan();
        assert_eq!(
            plan,
            vec![
                TrialSpec::new(1000, 1),
                TrialSpec::new(1_000_000, 1),
                TrialSpec::new(1000, 2),
                TrialSpec::new(1_000_000, 2),
                TrialSpec::new(1000, 4),
                TrialSpec::new(1_000_000, 4),
            ]
        );
    }

    #[test]
    fn plan_without_listed_baseline_still_measures_it() {
        let cfg = config(&[100], &[4, 2]);
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.scaling_workers().collect::<Vec<_>>(), vec![4, 2]);
        assert_eq!(
            cfg.trial_plan(),
            vec![
                TrialSpec::new(100, 1),
                TrialSpec::new(100, 4),
                TrialSpec::new(100, 2)
            ]
        );
    }

    #[test]
    fn readiness_display() {
        assert_eq!(
            Readiness::Delay(Duration::from_millis(500)).to_string(),
            "delay 500ms"
        );
        let marker = Readiness::Marker {
            text: "listening".into(),
            limit: Duration::from_secs(5),
        };
        assert_eq!(marker.to_string(), "marker \"listening\" (limit 5s)");
    }
}
