//! Human-readable run summary.

use crate::orchestrator::{RunSummary, WorkerOutcome};
use comfy_table::{presets::UTF8_FULL, Cell, Color, Table};

/// Format a run summary as a table, one row per client plus totals.
pub fn format_table(summary: &RunSummary) -> String {
    let mut output = String::new();

    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["Client", "Attempted", "Failed", "Succeeded", "Status"]);

    for worker in &summary.workers {
        match worker {
            WorkerOutcome::Finished(report) => {
                let status_cell = if report.cancelled {
                    Cell::new("CANCELLED").fg(Color::Yellow)
                } else {
                    Cell::new("OK").fg(Color::Green)
                };
                table.add_row(vec![
                    Cell::new(report.worker_id),
                    Cell::new(format_number(report.counters.inserted)),
                    Cell::new(format_number(report.counters.failed)),
                    Cell::new(format_number(report.counters.succeeded())),
                    status_cell,
                ]);
            }
            WorkerOutcome::Failed { worker_id, .. } => {
                table.add_row(vec![
                    Cell::new(worker_id),
                    Cell::new("-"),
                    Cell::new("-"),
                    Cell::new("-"),
                    Cell::new("FAILED").fg(Color::Red),
                ]);
            }
        }
    }

    let totals = summary.totals();
    table.add_row(vec![
        Cell::new("TOTAL").fg(Color::Cyan),
        Cell::new(format_number(totals.inserted)),
        Cell::new(format_number(totals.failed)),
        Cell::new(format_number(totals.succeeded())),
        Cell::new(format!(
            "{}/{}",
            summary.concurrency - summary.workers_failed(),
            summary.concurrency
        )),
    ]);

    output.push_str(&format!("Table: {}\n", summary.table));
    output.push_str(&table.to_string());
    output.push_str(&format!(
        "\nDuration: {}  Throughput: {:.1} rows/sec\n",
        format_duration(summary.elapsed.as_secs_f64()),
        summary.rows_per_second()
    ));
    output.push_str(&format!(
        "Last reported: {} inserted, {} failed (counters publish in steps, totals above are exact)\n",
        format_number(summary.reported.total_inserted),
        format_number(summary.reported.total_failed)
    ));

    if summary.workers_failed() > 0 {
        output.push_str("\nFailed Clients:\n");
        for worker in &summary.workers {
            if let WorkerOutcome::Failed { worker_id, error } = worker {
                output.push_str(&format!("  {worker_id}: {error}\n"));
            }
        }
    }

    output
}

/// Format duration in human-readable format.
fn format_duration(secs: f64) -> String {
    if secs < 60.0 {
        format!("{secs:.1}s")
    } else if secs < 3600.0 {
        let mins = (secs / 60.0).floor();
        let remaining_secs = secs - (mins * 60.0);
        format!("{}m {:02.0}s", mins as u64, remaining_secs)
    } else {
        let hours = (secs / 3600.0).floor();
        let remaining = secs - (hours * 3600.0);
        let mins = (remaining / 60.0).floor();
        format!("{}h {:02.0}m", hours as u64, mins as u64)
    }
}

/// Format number with thousands separators.
fn format_number(n: u64) -> String {
    let s = n.to_string();
    let mut result = String::new();

    for (i, c) in s.chars().enumerate() {
        if i > 0 && (s.len() - i) % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }

    result
}
