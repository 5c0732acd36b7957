//! Property-based tests for extraction and speedup derivation.

use proptest::prelude::*;

use sortbench_core::{extract_elapsed_seconds, speedup, ResultTable, SpeedupTable, TrialSpec};

/// Diagnostic lines that never carry the elapsed-time label.
fn noise_line() -> impl Strategy<Value = String> {
    "[a-z0-9 ,.!:]{0,40}".prop_filter("must not contain the label", |s| {
        !s.contains("total sort time:")
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// The labeled value is returned exactly, whatever surrounds it.
    #[test]
    fn labeled_value_round_trips(
        x in 0.0f64..1.0e6,
        before in prop::collection::vec(noise_line(), 0..5),
        after in prop::collection::vec(noise_line(), 0..5),
    ) {
        let mut lines = before;
        lines.push(format!("total sort time: {x} seconds"));
        lines.extend(after);
        let out = lines.join("\n");
        prop_assert_eq!(extract_elapsed_seconds(&out), Some(x));
    }

    /// Output without the label never yields a value.
    #[test]
    fn unlabeled_output_is_absent(lines in prop::collection::vec(noise_line(), 0..10)) {
        prop_assert_eq!(extract_elapsed_seconds(&lines.join("\n")), None);
    }

    /// Every derived ratio equals baseline / elapsed; absent operands give no ratio.
    #[test]
    fn speedup_identity(
        cells in prop::collection::vec(
            (1u64..5, 1u32..5, prop::option::of(0.001f64..100.0)),
            0..20,
        ),
    ) {
        let mut table = ResultTable::new();
        for (size, workers, elapsed) in cells {
            table.record(TrialSpec::new(size * 1000, workers), elapsed);
        }
        let derived = SpeedupTable::derive(&table);
        for (size, row) in table.rows() {
            for &workers in row.keys() {
                let expected = match (table.baseline(size), table.elapsed(size, workers)) {
                    (Some(b), Some(e)) if workers > 1 => Some(b / e),
                    _ => None,
                };
                prop_assert_eq!(derived.get(size, workers), expected);
                prop_assert_eq!(speedup(&table, size, workers), expected);
            }
        }
    }
}
