//! Report rendering.
//!
//! Plain output mirrors a terminal audit: a framed heading per mechanism and
//! one `LABEL [STATUS] message` line per finding.

use colored::*;

use super::types::{CheckReport, Section, Status};
use crate::config::{REPORT_LABEL_WIDTH, REPORT_WIDTH};

/// Renders the report as human-readable text.
///
/// With `color` set, status tags and headings carry ANSI colors
/// (subject to `colored`'s global override).
pub fn render_plain(report: &CheckReport, color: bool) -> String {
    let mut out = String::new();
    for section in &report.sections {
        render_section(&mut out, section, color);
    }

    out.push('\n');
    out.push_str(&header("Check Complete", color));
    out.push_str(&format!(
        "{} passed, {} warning(s), {} failed\n",
        report.summary.pass, report.summary.warn, report.summary.fail
    ));
    out
}

/// Renders the report as pretty-printed JSON.
pub fn render_json(report: &CheckReport) -> serde_json::Result<String> {
    serde_json::to_string_pretty(report)
}

fn render_section(out: &mut String, section: &Section, color: bool) {
    out.push('\n');
    out.push_str(&header(&section.title, color));
    for result in &section.results {
        out.push_str(&format!(
            "{:<width$} [{}] {}\n",
            result.label,
            status_tag(result.status, color),
            result.message,
            width = REPORT_LABEL_WIDTH
        ));
    }
}

fn header(title: &str, color: bool) -> String {
    let bar = "=".repeat(REPORT_WIDTH);
    let centered = format!("{title:^width$}", width = REPORT_WIDTH);
    let centered = if color {
        centered.cyan().bold().to_string()
    } else {
        centered
    };
    format!("{bar}\n{centered}\n{bar}\n")
}

fn status_tag(status: Status, color: bool) -> String {
    let text = status.as_str();
    if !color {
        return text.to_string();
    }
    match status {
        Status::Pass => text.green().bold().to_string(),
        Status::Warn => text.yellow().bold().to_string(),
        Status::Fail => text.red().bold().to_string(),
    }
}
