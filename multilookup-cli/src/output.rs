//! Plain-text rendering of session state.

use multilookup_engine::{LookupSession, ReconcileReport};
use std::fmt::Write;

/// The option list under its "All ..." header.
pub fn render_options(session: &LookupSession) -> String {
    let mut out = String::new();
    if let Some(header) = session.all_records_label() {
        let _ = writeln!(out, "{header}");
    }
    if session.options().is_empty() {
        let _ = writeln!(out, "  (no results)");
    }
    for record in session.options() {
        let _ = writeln!(out, "  {}  [{}]", record.display_value, record.id);
    }
    out
}

pub fn render_selection(selection: &[String]) -> String {
    if selection.is_empty() {
        return "Selected: (none)\n".to_string();
    }
    format!("Selected: {}\n", selection.join(", "))
}

pub fn render_report(report: &ReconcileReport) -> String {
    let Some(batch_id) = report.batch_id else {
        return "No changes.\n".to_string();
    };

    let mut out = String::new();
    let _ = writeln!(out, "Batch {batch_id}");
    for id in &report.associated {
        let _ = writeln!(out, "  + {id}");
    }
    for id in &report.disassociated {
        let _ = writeln!(out, "  - {id}");
    }
    for value in &report.skipped {
        let _ = writeln!(out, "  ? {value} (not found)");
    }
    for failure in &report.failed {
        let _ = writeln!(out, "  ! {} {}: {}", failure.op, failure.id, failure.error);
    }
    if !report.refreshed {
        let _ = writeln!(out, "  (selection could not be reloaded)");
    }
    out
}
