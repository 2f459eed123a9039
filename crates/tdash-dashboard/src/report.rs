//! Printing task reports as text sections or JSON.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::io::Write;
use tdash_graphs::{TaskOutcome, TaskReport};

/// Page heading shown above the tabs.
pub const PAGE_TITLE: &str = "Twitter Analytics Dashboard";

/// Everything one run produced, as printed by `--json`.
#[derive(Debug, Serialize)]
pub struct RunSummary<'a> {
    pub title: &'static str,
    pub generated_at: DateTime<Utc>,
    pub timezone: &'a str,
    pub reports: &'a [TaskReport],
}

/// One section per tab: its title, then the chart path, the placeholder
/// message or the error.
pub fn write_text<W: Write>(out: &mut W, reports: &[TaskReport]) -> std::io::Result<()> {
    writeln!(out, "{PAGE_TITLE}")?;
    writeln!(out, "{}", "=".repeat(PAGE_TITLE.len()))?;

    for report in reports {
        writeln!(out)?;
        writeln!(out, "[{}]", report.tab_title)?;
        match &report.outcome {
            TaskOutcome::Rendered { path, chart } if chart.is_empty() => {
                writeln!(out, "No records matched; placeholder written to {}", path.display())?;
            }
            TaskOutcome::Rendered { path, chart } => {
                let noun = if chart.records == 1 { "record" } else { "records" };
                writeln!(
                    out,
                    "Chart written to {} ({} {noun})",
                    path.display(),
                    chart.records
                )?;
            }
            TaskOutcome::Unavailable { message } => writeln!(out, "{message}")?,
            TaskOutcome::Failed { error, .. } => writeln!(out, "Error: {error}")?,
        }
    }
    Ok(())
}

pub fn write_json<W: Write>(out: &mut W, summary: &RunSummary<'_>) -> serde_json::Result<()> {
    serde_json::to_writer_pretty(&mut *out, summary)?;
    writeln!(out).map_err(serde_json::Error::io)
}
