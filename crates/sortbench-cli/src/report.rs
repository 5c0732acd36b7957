//! Final report rendering: aligned summary table, failure section, JSON.

use std::fmt::Write as _;

use sortbench_core::{TrialResult, Verdict};
use sortbench_orchestration::SweepReport;

use crate::output::{format_seconds, format_speedup};
use crate::presenter::client_failure_line;

/// Minimum width of every column.
pub const COLUMN_WIDTH: usize = 15;

/// Column headers in display order.
#[must_use]
pub fn table_headers(report: &SweepReport) -> Vec<String> {
    let mut headers = vec!["Size".to_string(), "Serial time (s)".to_string()];
    for workers in report.config.scaling_workers() {
        headers.push(format!("{workers}-worker time"));
        headers.push(format!("{workers}-worker speedup"));
    }
    headers
}

/// One row per configured size: the size, then the data cells.
#[must_use]
pub fn table_rows(report: &SweepReport) -> Vec<Vec<String>> {
    let config = &report.config;
    config
        .sizes
        .iter()
        .map(|&size| {
            let mut row = vec![
                size.to_string(),
                format_seconds(report.results.baseline(size)),
            ];
            for workers in config.scaling_workers() {
                row.push(format_seconds(report.results.elapsed(size, workers)));
                row.push(format_speedup(report.speedups.get(size, workers)));
            }
            row
        })
        .collect()
}

/// Every column is at least [`COLUMN_WIDTH`] wide and one wider than its
/// longest header or cell, so neighbouring cells never touch.
fn column_widths(headers: &[String], rows: &[Vec<String>]) -> Vec<usize> {
    headers
        .iter()
        .enumerate()
        .map(|(i, header)| {
            let longest = rows
                .iter()
                .filter_map(|row| row.get(i))
                .map(String::len)
                .fold(header.len(), usize::max);
            COLUMN_WIDTH.max(longest + 1)
        })
        .collect()
}

fn format_line(cells: &[String], widths: &[usize]) -> String {
    let mut line = String::new();
    for (cell, &width) in cells.iter().zip(widths) {
        let _ = write!(line, "{cell:<width$}");
    }
    line.trim_end().to_string()
}

/// The aligned summary table.
#[must_use]
pub fn render_table(report: &SweepReport) -> String {
    let headers = table_headers(report);
    let rows = table_rows(report);
    let widths = column_widths(&headers, &rows);
    let rule_width: usize = widths.iter().sum();

    let mut out = String::new();
    let _ = writeln!(out, "{}", format_line(&headers, &widths));
    let _ = writeln!(out, "{}", "-".repeat(rule_width));
    for row in &rows {
        let _ = writeln!(out, "{}", format_line(row, &widths));
    }
    out
}

/// Lines describing every trial that needs attention.
#[must_use]
pub fn failure_lines(report: &SweepReport) -> Vec<String> {
    let mut lines = Vec::new();
    for result in report.attention() {
        describe(result, &mut lines);
    }
    lines
}

fn describe(result: &TrialResult, lines: &mut Vec<String>) {
    let trial = result.trial;
    if let Some(err) = &result.failure {
        lines.push(format!("{trial}: {} ({err})", err.kind()));
    }
    for client in &result.failed_clients {
        lines.push(format!(
            "{trial}: {}",
            client_failure_line(client.worker_id, client.exit_code, &client.stderr)
        ));
    }
    if result.verdict == Verdict::Incorrect {
        lines.push(format!("{trial}: server reported an incorrectly sorted result"));
    }
}

/// Title, host line, table, and failure section.
#[must_use]
pub fn render_report(report: &SweepReport) -> String {
    let widths = column_widths(&table_headers(report), &table_rows(report));
    let rule = "=".repeat(widths.iter().sum());

    let mut out = String::new();
    let _ = writeln!(out, "{rule}");
    let _ = writeln!(out, "Distributed sort scaling report");
    let _ = writeln!(out, "executable: {}", report.config.executable.display());
    let _ = writeln!(out, "readiness: {}", report.config.readiness);
    if let Some(host) = &report.host {
        let _ = writeln!(out, "host: {}", host.summary());
    }
    let _ = writeln!(out, "{rule}");
    out.push_str(&render_table(report));
    let _ = writeln!(out, "{rule}");

    let failures = failure_lines(report);
    if !failures.is_empty() {
        let _ = writeln!(out, "Failures ({}):", failures.len());
        for line in &failures {
            let _ = writeln!(out, "  {line}");
        }
    }
    out
}

/// Pretty JSON rendering of the whole report.
pub fn render_json(report: &SweepReport) -> serde_json::Result<String> {
    serde_json::to_string_pretty(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sortbench_core::{
        ClientFailure, HostInfo, ResultTable, SpeedupTable, SweepConfig, TrialError, TrialSpec,
    };

    fn report(sizes: &[u64], workers: &[u32], cells: &[(u64, u32, Option<f64>)]) -> SweepReport {
        let config = SweepConfig {
            sizes: sizes.to_vec(),
            workers: workers.to_vec(),
            ..SweepConfig::default()
        };
        let mut results = ResultTable::new();
        let mut trials = Vec::new();
        for &(size, w, value) in cells {
            let trial = TrialSpec::new(size, w);
            results.record(trial, value);
            trials.push(match value {
                Some(v) => TrialResult::measured(trial, v, Verdict::Correct, vec![]),
                None => TrialResult::failed(
                    trial,
                    TrialError::NonZeroExit {
                        code: Some(1),
                        stderr: "connection refused".into(),
                    },
                ),
            });
        }
        let speedups = SpeedupTable::derive(&results);
        SweepReport {
            config,
            host: None,
            results,
            speedups,
            trials,
        }
    }

    #[test]
    fn scenario_one_renders_speedup() {
        let r = report(&[1000], &[1, 2], &[(1000, 1, Some(0.05)), (1000, 2, Some(0.03))]);
        assert_eq!(
            table_rows(&r),
            vec![vec!["1000", "0.0500", "0.0300", "1.67"]]
        );
    }

    #[test]
    fn scenario_two_missing_baseline() {
        let r = report(&[1000, 5000], &[1], &[(1000, 1, None), (5000, 1, Some(0.2))]);
        let rows = table_rows(&r);
        assert_eq!(rows[0], vec!["1000", "N/A"]);
        assert_eq!(rows[1], vec!["5000", "0.2000"]);
        let failures = failure_lines(&r);
        assert_eq!(
            failures,
            vec!["size=1000, workers=1: non-zero-exit (server exited with code 1)"]
        );
    }

    #[test]
    fn scenario_four_shape() {
        let r = report(
            &[1000, 1_000_000],
            &[1, 2, 4],
            &[(1000, 1, Some(0.01)), (1000, 2, Some(0.008))],
        );
        assert_eq!(
            table_headers(&r),
            vec![
                "Size",
                "Serial time (s)",
                "2-worker time",
                "2-worker speedup",
                "4-worker time",
                "4-worker speedup"
            ]
        );
        let rows = table_rows(&r);
        assert_eq!(rows.len(), 2);
        let data_cells: usize = rows.iter().map(|row| row.len() - 1).sum();
        assert_eq!(data_cells, 10);
        assert_eq!(rows[0][3], "1.25");
        assert!(rows[1][1..].iter().all(|c| c == "N/A"));
    }

    #[test]
    fn empty_table_renders_all_not_available() {
        let r = report(&[10, 20], &[1, 2], &[]);
        let table = render_table(&r);
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[2].split_whitespace().collect::<Vec<_>>(), vec!["10", "N/A", "N/A", "N/A"]);
        assert_eq!(lines[3].split_whitespace().collect::<Vec<_>>(), vec!["20", "N/A", "N/A", "N/A"]);
        assert!(failure_lines(&r).is_empty());
    }

    #[test]
    fn columns_are_aligned() {
        let r = report(&[1000, 1_000_000], &[1, 2], &[(1000, 1, Some(0.05)), (1_000_000, 1, Some(12.5))]);
        let table = render_table(&r);
        let lines: Vec<&str> = table.lines().collect();
        let header_pos = lines[0].find("Serial").unwrap();
        assert_eq!(lines[2].find("0.0500").unwrap(), header_pos);
        assert_eq!(lines[3].find("12.5000").unwrap(), header_pos);
        assert_eq!(lines[1].len(), 15 + 16 + 15 + 17);
    }

    #[test]
    fn wide_cells_keep_a_separator() {
        let r = report(
            &[100_000_000_000_000, 10],
            &[1, 2],
            &[(10, 1, Some(123_456_789_012.5)), (10, 2, Some(1.0))],
        );
        let table = render_table(&r);
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(
            lines[2].split_whitespace().collect::<Vec<_>>(),
            vec!["100000000000000", "N/A", "N/A", "N/A"]
        );
        assert_eq!(
            lines[3].split_whitespace().collect::<Vec<_>>(),
            vec!["10", "123456789012.5000", "1.0000", "123456789012.50"]
        );
        let serial = lines[0].find("Serial").unwrap();
        assert_eq!(lines[2].find("N/A").unwrap(), serial);
        assert_eq!(lines[3].find("123456789012.5000").unwrap(), serial);
        assert_eq!(lines[1].len(), 16 + 18 + 15 + 17);
    }

    #[test]
    fn report_lists_partial_and_incorrect_trials() {
        let mut r = report(&[10], &[1, 2], &[(10, 1, Some(1.0))]);
        let trial = TrialSpec::new(10, 2);
        r.results.record(trial, Some(0.5));
        let partial = TrialResult::measured(
            trial,
            0.5,
            Verdict::Incorrect,
            vec![ClientFailure {
                worker_id: 1,
                exit_code: Some(3),
                stderr: "connect failed\n".into(),
            }],
        );
        r.trials.push(partial);
        r.host = Some(HostInfo {
            cpu_brand: "Test CPU".into(),
            logical_cpus: 4,
            total_memory_mib: 1024,
        });

        let text = render_report(&r);
        assert!(text.contains("host: Test CPU, 4 logical CPUs, 1024 MiB RAM"));
        assert!(text.contains("Failures (2):"));
        assert!(text.contains("size=10, workers=2: client 1 exited with code 3: connect failed"));
        assert!(text.contains("size=10, workers=2: server reported an incorrectly sorted result"));
    }

    #[test]
    fn json_contains_tables() {
        let r = report(&[1000], &[1, 2], &[(1000, 1, Some(0.05)), (1000, 2, None)]);
        let json: serde_json::Value = serde_json::from_str(&render_json(&r).unwrap()).unwrap();
        assert_eq!(json["results"]["1000"]["1"], 0.05);
        assert!(json["results"]["1000"]["2"].is_null());
        assert_eq!(json["config"]["workers"], serde_json::json!([1, 2]));
    }
}
