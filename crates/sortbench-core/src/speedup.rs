//! Speedup ratios derived from a [`ResultTable`].

use std::collections::BTreeMap;

use serde::Serialize;

use crate::constants::BASELINE_WORKERS;
use crate::table::ResultTable;

/// `baseline / parallel`, or `None` if either side is missing or unusable.
#[must_use]
pub fn ratio(baseline: Option<f64>, parallel: Option<f64>) -> Option<f64> {
    let baseline = baseline?;
    let parallel = parallel?;
    if !(parallel.is_finite() && parallel > 0.0) || !baseline.is_finite() {
        return None;
    }
    Some(baseline / parallel)
}

/// Speedup of `(input_size, worker_count)` over the baseline of the same size.
#[must_use]
pub fn speedup(table: &ResultTable, input_size: u64, worker_count: u32) -> Option<f64> {
    if worker_count == BASELINE_WORKERS {
        return None;
    }
    ratio(
        table.baseline(input_size),
        table.elapsed(input_size, worker_count),
    )
}

/// Speedups keyed by input size, then worker count (> 1).
///
/// Only pairs with both operands present have an entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct SpeedupTable {
    ratios: BTreeMap<u64, BTreeMap<u32, f64>>,
}

impl SpeedupTable {
    /// Derive every available ratio from `results`.
    #[must_use]
    pub fn derive(results: &ResultTable) -> Self {
        let mut ratios: BTreeMap<u64, BTreeMap<u32, f64>> = BTreeMap::new();
        for (size, row) in results.rows() {
            for &workers in row.keys() {
                if let Some(r) = speedup(results, size, workers) {
                    ratios.entry(size).or_default().insert(workers, r);
                }
            }
        }
        Self { ratios }
    }

    #[must_use]
    pub fn get(&self, input_size: u64, worker_count: u32) -> Option<f64> {
        self.ratios
            .get(&input_size)
            .and_then(|row| row.get(&worker_count))
            .copied()
    }

    /// Number of derived ratios.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ratios.values().map(BTreeMap::len).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ratios.is_empty()
    }
}
