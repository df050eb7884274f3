// Report rendering - HTML document and plain-text summary

use super::{ArtifactSummary, ExecutiveSummary};
use crate::port::artifact_store::to_pretty_json;
use crate::port::StoredArtifact;

const STYLE: &str = "body { font-family: sans-serif; margin: 2em; }
table { border-collapse: collapse; margin-bottom: 2em; }
th, td { border: 1px solid #ccc; padding: 4px 10px; text-align: left; }
td.pass { color: #1a7f37; }
td.fail { color: #cf222e; }
pre { background: #f6f8fa; padding: 1em; overflow-x: auto; }";

/// Escape text for inclusion in HTML element content or attribute values
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// HTML report embedding every artifact's pretty-printed JSON
pub fn render_html(
    generated: &str,
    artifacts: &[StoredArtifact],
    summary: &ExecutiveSummary,
) -> String {
    let mut html = String::new();
    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n");
    html.push_str(&format!(
        "<title>Server Test Report - {}</title>\n<style>\n{}\n</style>\n</head>\n<body>\n",
        escape_html(generated),
        STYLE
    ));
    html.push_str("<h1>Server Test Report</h1>\n");
    html.push_str(&format!(
        "<p>Generated: {}<br>Artifacts: {}<br>Checks passed: {} / {}</p>\n",
        escape_html(generated),
        artifacts.len(),
        summary.total_passed(),
        summary.total_checks()
    ));

    html.push_str("<table>\n<tr><th>Artifact</th><th>Suite</th><th>Passed</th><th>Failed</th><th>Total</th></tr>\n");
    for row in &summary.rows {
        html.push_str(&format!(
            "<tr><td><a href=\"#{anchor}\">{name}</a></td><td>{suite}</td><td class=\"pass\">{passed}</td><td class=\"fail\">{failed}</td><td>{total}</td></tr>\n",
            anchor = escape_html(&row.file_name),
            name = escape_html(&row.file_name),
            suite = escape_html(&row.suite),
            passed = row.passed,
            failed = row.failed,
            total = row.total(),
        ));
    }
    html.push_str("</table>\n");

    for artifact in artifacts {
        let body = to_pretty_json(&artifact.contents)
            .unwrap_or_else(|_| artifact.contents.to_string());
        html.push_str(&format!(
            "<section id=\"{id}\">\n<h2>{name}</h2>\n<pre>{body}</pre>\n</section>\n",
            id = escape_html(&artifact.file_name),
            name = escape_html(&artifact.file_name),
            body = escape_html(&body),
        ));
    }

    html.push_str("</body>\n</html>\n");
    html
}

/// Plain-text summary written next to the HTML report
pub fn render_text(
    generated: &str,
    artifacts: &[StoredArtifact],
    summary: &ExecutiveSummary,
) -> String {
    let mut text = String::new();
    text.push_str("SERVER TEST SUMMARY\n");
    text.push_str(&"=".repeat(60));
    text.push('\n');
    text.push_str(&format!("Generated: {}\n", generated));
    text.push_str(&format!("Artifacts: {}\n\n", artifacts.len()));

    for (artifact, row) in artifacts.iter().zip(&summary.rows) {
        push_artifact_section(&mut text, artifact, row);
    }

    text.push_str(&"-".repeat(60));
    text.push('\n');
    text.push_str(&format!(
        "TOTAL: {} passed, {} failed, {} checks\n",
        summary.total_passed(),
        summary.total_failed(),
        summary.total_checks()
    ));
    text
}

fn push_artifact_section(text: &mut String, artifact: &StoredArtifact, row: &ArtifactSummary) {
    text.push_str(&format!("{} ({})\n", row.file_name, row.suite));
    text.push_str(&format!(
        "  passed {} / failed {} / total {}\n",
        row.passed,
        row.failed,
        row.total()
    ));

    for (label, result) in artifact.check_results() {
        if !result.succeeded() {
            text.push_str(&format!("  FAILED {}: {}\n", label, result.summary_line()));
        }
    }
    text.push('\n');
}
