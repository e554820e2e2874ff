use std::path::Path;

use crate::report::report_model::SummaryStats;

// ============================================================================
// Console summary — printed by the CLI once the report is written
// ============================================================================

/// Format the closing line for the terminal.
///
/// Produces output like:
/// ```text
/// ✗ 2 tests: 1 failed, 1 passed in 0.4s
///   report: /tmp/run/report.html
/// ```
pub fn format_console_summary(summary: &SummaryStats, total_time: f64, report_path: &Path) -> String {
    let marker = if summary.all_passed() {
        "\u{2713}"
    } else {
        "\u{2717}"
    };

    let counts = summary
        .counts
        .iter()
        .map(|(outcome, count)| format!("{} {}", count, outcome))
        .collect::<Vec<_>>()
        .join(", ");

    let noun = if summary.total == 1 { "test" } else { "tests" };
    let mut out = format!("{} {} {}", marker, summary.total, noun);
    if !counts.is_empty() {
        out.push_str(": ");
        out.push_str(&counts);
    }
    out.push_str(&format!(" in {:.1}s\n", total_time));
    out.push_str(&format!("  report: {}\n", report_path.display()));
    out
}
