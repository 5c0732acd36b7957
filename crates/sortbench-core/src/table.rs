//! Append-only table of measured elapsed times.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::constants::BASELINE_WORKERS;
use crate::trial::TrialSpec;

/// Elapsed seconds keyed by input size, then worker count.
///
/// A visited cell whose trial failed holds `None`, so "visited" and
/// "measured" stay distinguishable.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ResultTable {
    cells: BTreeMap<u64, BTreeMap<u32, Option<f64>>>,
}

impl ResultTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the outcome of `trial`. A cell is written at most once; a second
    /// write is ignored and reported as `false`.
    pub fn record(&mut self, trial: TrialSpec, elapsed_seconds: Option<f64>) -> bool {
        let row = self.cells.entry(trial.input_size).or_default();
        if row.contains_key(&trial.worker_count) {
            tracing::warn!(%trial, "cell already recorded, ignoring second write");
            return false;
        }
        row.insert(trial.worker_count, elapsed_seconds);
        true
    }

    /// Elapsed seconds of a measured cell.
    #[must_use]
    pub fn elapsed(&self, input_size: u64, worker_count: u32) -> Option<f64> {
        self.cells
            .get(&input_size)
            .and_then(|row| row.get(&worker_count))
            .copied()
            .flatten()
    }

    /// Baseline (single worker) time for `input_size`.
    #[must_use]
    pub fn baseline(&self, input_size: u64) -> Option<f64> {
        self.elapsed(input_size, BASELINE_WORKERS)
    }

    /// Whether the cell was recorded, with or without a value.
    #[must_use]
    pub fn visited(&self, input_size: u64, worker_count: u32) -> bool {
        self.cells
            .get(&input_size)
            .is_some_and(|row| row.contains_key(&worker_count))
    }

    /// Number of recorded cells.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.values().map(BTreeMap::len).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of recorded cells without a value.
    #[must_use]
    pub fn missing(&self) -> usize {
        self.cells
            .values()
            .flat_map(BTreeMap::values)
            .filter(|v| v.is_none())
            .count()
    }

    /// Recorded rows in ascending input size.
    pub fn rows(&self) -> impl Iterator<Item = (u64, &BTreeMap<u32, Option<f64>>)> {
        self.cells.iter().map(|(size, row)| (*size, row))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_table() {
        let table = ResultTable::new();
        assert!(table.is_empty());
        assert_eq!(table.baseline(1000), None);
        assert!(!table.visited(1000, 1));
    }

    #[test]
    fn records_values_and_absences() {
        let mut table = ResultTable::new();
        assert!(table.record(TrialSpec::baseline(1000), Some(0.05)));
        assert!(table.record(TrialSpec::new(1000, 2), None));
        assert_eq!(table.baseline(1000), Some(0.05));
        assert_eq!(table.elapsed(1000, 2), None);
        assert!(table.visited(1000, 2));
        assert_eq!(table.len(), 2);
        assert_eq!(table.missing(), 1);
    }

    #[test]
    fn cells_are_write_once() {
        let mut table = ResultTable::new();
        assert!(table.record(TrialSpec::baseline(10), Some(1.0)));
        assert!(!table.record(TrialSpec::baseline(10), Some(2.0)));
        assert_eq!(table.baseline(10), Some(1.0));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn rows_are_sorted_by_size() {
        let mut table = ResultTable::new();
        table.record(TrialSpec::baseline(5000), Some(0.2));
        table.record(TrialSpec::baseline(1000), Some(0.1));
        let sizes: Vec<u64> = table.rows().map(|(size, _)| size).collect();
        assert_eq!(sizes, vec![1000, 5000]);
    }

    #[test]
    fn serializes_as_nested_map() {
        let mut table = ResultTable::new();
        table.record(TrialSpec::baseline(1000), Some(0.5));
        table.record(TrialSpec::new(1000, 2), None);
        let json = serde_json::to_string(&table).unwrap();
        assert_eq!(json, r#"{"1000":{"1":0.5,"2":null}}"#);
    }
}
