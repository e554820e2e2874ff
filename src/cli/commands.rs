use std::io::{BufRead, BufReader};

use tracing::info;

use crate::cli::config::{AppConfig, ReportOverrides, build_report_config};
use crate::event::libtest::drive_session;
use crate::report::collector::HtmlReporter;
use crate::report::console::format_console_summary;
use crate::report::render::BUNDLED_TEMPLATE;
use crate::session::session::Session;

// ============================================================================
// run subcommand
// ============================================================================

/// Render a report from a libtest JSON stream and return whether every test
/// passed (skips count as passing).
pub fn cmd_run(
    input: Option<&str>,
    overrides: &ReportOverrides<'_>,
    config: &AppConfig,
) -> Result<bool, Box<dyn std::error::Error>> {
    let report_config = build_report_config(overrides, config);
    let mut reporter = HtmlReporter::new(report_config);

    let reader: Box<dyn BufRead> = match input {
        Some(path) => Box::new(BufReader::new(std::fs::File::open(path)?)),
        None => Box::new(BufReader::new(std::io::stdin().lock())),
    };

    {
        let mut session = Session::new();
        session.register(Box::new(&mut reporter));

        let stats = drive_session(reader, &mut session)?;
        info!(
            suites = stats.suites,
            outcomes = stats.outcomes,
            skipped_lines = stats.skipped_lines,
            "event stream finished"
        );

        session.after_summary_report()?;
    }

    print!(
        "{}",
        format_console_summary(
            reporter.summary_stats(),
            reporter.total_time(),
            &reporter.config().report_path,
        )
    );

    Ok(reporter.summary_stats().all_passed())
}

// ============================================================================
// template subcommand
// ============================================================================

pub fn cmd_template(output: Option<&str>) -> Result<(), Box<dyn std::error::Error>> {
    match output {
        Some(path) => {
            std::fs::write(path, BUNDLED_TEMPLATE)?;
            info!("wrote bundled template to {}", path);
        }
        None => print!("{}", BUNDLED_TEMPLATE),
    }
    Ok(())
}
