//! Console output: menus, check progress, summary tables

use colored::Colorize;
use tabled::{Table, Tabled};
use toolkit_core::application::monitor::MonitorSample;
use toolkit_core::application::report::{ExecutiveSummary, TrendRow};
use toolkit_core::application::{FullSuiteOutcome, SuiteOutcome};
use toolkit_core::domain::{CheckRecord, CommandResult};

use crate::menu::Menu;

const RULE_WIDTH: usize = 60;

pub fn header(title: &str) {
    println!();
    println!("{}", "=".repeat(RULE_WIDTH).cyan());
    println!("{}", title.cyan().bold());
    println!("{}", "=".repeat(RULE_WIDTH).cyan());
}

pub fn menu(menu: &Menu) {
    header(menu.title);
    for (index, (label, _)) in menu.entries.iter().enumerate() {
        println!("  {}. {}", index + 1, label);
    }
    println!();
}

pub fn success(message: &str) {
    println!("{}", format!("✓ {}", message).green().bold());
}

pub fn failure(message: &str) {
    println!("{}", format!("✗ {}", message).red().bold());
}

pub fn notice(message: &str) {
    println!("{}", message.yellow());
}

/// First non-empty stderr line, for one-line failure hints
fn stderr_hint(result: &CommandResult) -> Option<&str> {
    result.stderr().lines().map(str::trim).find(|line| !line.is_empty())
}

/// Progress line for a finished check
pub fn check_record(record: &CheckRecord) {
    if record.result.succeeded() {
        println!("  {} {}", "✓".green(), record.label);
    } else {
        println!(
            "  {} {} {}",
            "✗".red(),
            record.label,
            format!("(exit {})", record.result.exit_status()).red()
        );
        if let Some(hint) = stderr_hint(&record.result) {
            println!("      {}", hint.dimmed());
        }
    }
}

pub fn suite_outcome(outcome: &SuiteOutcome) {
    let results = &outcome.results;
    let line = format!(
        "{}: {}/{} checks passed in {:.1}s",
        results.kind().title(),
        results.passed(),
        results.len(),
        outcome.elapsed.as_secs_f64()
    );
    if results.failed() == 0 {
        success(&line);
    } else {
        failure(&line);
    }
    println!("Results saved to {}", outcome.path.display());
}

#[derive(Tabled)]
struct SuiteRow {
    #[tabled(rename = "Suite")]
    suite: String,
    #[tabled(rename = "Passed")]
    passed: usize,
    #[tabled(rename = "Failed")]
    failed: usize,
    #[tabled(rename = "Saved to")]
    path: String,
}

fn full_suite_rows(outcome: &FullSuiteOutcome) -> Vec<SuiteRow> {
    outcome
        .suites
        .iter()
        .map(|suite| SuiteRow {
            suite: suite.results.kind().title().to_string(),
            passed: suite.results.passed(),
            failed: suite.results.failed(),
            path: suite.path.display().to_string(),
        })
        .collect()
}

pub fn full_suite_outcome(outcome: &FullSuiteOutcome) {
    println!();
    println!("{}", Table::new(full_suite_rows(outcome)));
    println!(
        "Full test suite completed in {:.1}s",
        outcome.elapsed.as_secs_f64()
    );
}

pub fn monitor_sample(sample: &MonitorSample) {
    let metrics = &sample.metrics;
    println!(
        "[{}] CPU {:>5.1}% | Memory {:>5.1}% ({}/{} MB) | Disk {:>5.1}% ({:.1}/{:.1} GB)",
        sample.taken_at,
        metrics.cpu_usage_percent,
        metrics.memory_usage_percent(),
        metrics.memory_used_mb,
        metrics.memory_total_mb,
        metrics.disk_usage_percent(),
        metrics.disk_used_gb(),
        metrics.disk_total_gb()
    );
    for alert in &sample.alerts {
        println!("  {} {}", "ALERT".red().bold(), alert);
    }
}

#[derive(Tabled)]
struct SummaryRow {
    #[tabled(rename = "Artifact")]
    file_name: String,
    #[tabled(rename = "Suite")]
    suite: String,
    #[tabled(rename = "Passed")]
    passed: usize,
    #[tabled(rename = "Failed")]
    failed: usize,
    #[tabled(rename = "Total")]
    total: usize,
}

fn summary_rows(summary: &ExecutiveSummary) -> Vec<SummaryRow> {
    summary
        .rows
        .iter()
        .map(|row| SummaryRow {
            file_name: row.file_name.clone(),
            suite: row.suite.clone(),
            passed: row.passed,
            failed: row.failed,
            total: row.total(),
        })
        .collect()
}

pub fn executive_summary(summary: &ExecutiveSummary) {
    println!("{}", Table::new(summary_rows(summary)));
    println!(
        "Total: {} checks, {} passed, {} failed",
        summary.total_checks(),
        summary.total_passed().to_string().green(),
        summary.total_failed().to_string().red()
    );
}

#[derive(Tabled)]
struct TrendTableRow {
    #[tabled(rename = "Suite")]
    suite: String,
    #[tabled(rename = "Runs")]
    runs: usize,
    #[tabled(rename = "Pass rate")]
    pass_rate: String,
    #[tabled(rename = "Last run")]
    last_pass_rate: String,
    #[tabled(rename = "First")]
    first_stamp: String,
    #[tabled(rename = "Last")]
    last_stamp: String,
}

fn trend_rows(rows: &[TrendRow]) -> Vec<TrendTableRow> {
    rows.iter()
        .map(|row| TrendTableRow {
            suite: row.kind.title().to_string(),
            runs: row.runs,
            pass_rate: format!("{:.1}%", row.pass_rate()),
            last_pass_rate: format!("{:.1}%", row.last_pass_rate),
            first_stamp: row.first_stamp.clone(),
            last_stamp: row.last_stamp.clone(),
        })
        .collect()
}

pub fn trend_analysis(rows: &[TrendRow]) {
    println!("{}", Table::new(trend_rows(rows)));
}
