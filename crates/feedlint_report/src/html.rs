//! Minimal human-readable rendering of the validation report.

use std::fmt::Write as _;
use std::path::Path;

use feedlint_core::NoticeSeverity;

use crate::{ReportError, ValidationReport};

pub fn write_html_report(
    path: impl AsRef<Path>,
    report: &ValidationReport,
    feed_label: &str,
) -> Result<(), ReportError> {
    let path = path.as_ref();
    std::fs::write(path, render(report, feed_label)).map_err(|source| ReportError::Io {
        path: path.display().to_string(),
        source,
    })
}

fn render(report: &ValidationReport, feed_label: &str) -> String {
    let mut page = String::new();
    page.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n");
    page.push_str("<title>GTFS validation report</title>\n");
    page.push_str(
        "<style>body{font-family:sans-serif;margin:2em}table{border-collapse:collapse}\
         td,th{border:1px solid #ccc;padding:4px 8px;text-align:left}\
         .ERROR{color:#b00020}.WARNING{color:#8a6d00}.INFO{color:#33691e}</style>\n",
    );
    page.push_str("</head>\n<body>\n");
    let _ = writeln!(page, "<h1>GTFS validation report</h1>");
    let _ = writeln!(page, "<p>Feed: {}</p>", escape(feed_label));
    let _ = writeln!(
        page,
        "<p>{} errors, {} warnings, {} infos</p>",
        report.count_by_severity(NoticeSeverity::Error),
        report.count_by_severity(NoticeSeverity::Warning),
        report.count_by_severity(NoticeSeverity::Info),
    );

    if report.notices.is_empty() {
        page.push_str("<p>No notices.</p>\n");
    } else {
        page.push_str("<table>\n<tr><th>Code</th><th>Severity</th><th>Total</th></tr>\n");
        for group in &report.notices {
            let severity = match group.severity {
                NoticeSeverity::Error => "ERROR",
                NoticeSeverity::Warning => "WARNING",
                NoticeSeverity::Info => "INFO",
            };
            let _ = writeln!(
                page,
                "<tr><td>{}</td><td class=\"{severity}\">{severity}</td><td>{}</td></tr>",
                escape(&group.code),
                group.total_notices,
            );
        }
        page.push_str("</table>\n");
    }

    page.push_str("</body>\n</html>\n");
    page
}

fn escape(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
