use std::path::PathBuf;
use std::time::{Instant, SystemTime};

use tracing::{debug, info, warn};

use crate::error::ReportError;
use crate::event::event_model::{OutcomeEvent, StartTestEvent, format_exception};
use crate::report::render::render;
use crate::report::report_model::{ReportContext, SummaryStats, TestResult};
use crate::report::search::{build_search_index, search_index_json, sort_results};
use crate::session::plugin::Plugin;

pub const DEFAULT_TITLE: &str = "Test Report";
pub const DEFAULT_TEST_ID: &str = "Test01";
pub const DEFAULT_REPORT_PATH: &str = "report.html";

/// Resolved reporter settings.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportConfig {
    pub report_title: String,
    pub test_id: String,
    pub report_path: PathBuf,

    /// `None` renders with the bundled template
    pub template: Option<PathBuf>,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            report_title: DEFAULT_TITLE.to_string(),
            test_id: DEFAULT_TEST_ID.to_string(),
            report_path: PathBuf::from(DEFAULT_REPORT_PATH),
            template: None,
        }
    }
}

// ============================================================================
// HtmlReporter — collects outcomes, renders at end of run
// ============================================================================

/// Observes test lifecycle events and writes an HTML report when the run ends.
///
/// Keeps a single in-flight start time, so start/outcome pairs must arrive
/// sequentially.
pub struct HtmlReporter {
    config: ReportConfig,
    summary_stats: SummaryStats,
    test_results: Vec<TestResult>,
    start: Option<SystemTime>,
    init_time: Instant,
}

impl HtmlReporter {
    pub fn new(config: ReportConfig) -> Self {
        Self {
            config,
            summary_stats: SummaryStats::new(),
            test_results: Vec::new(),
            start: None,
            init_time: Instant::now(),
        }
    }

    pub fn config(&self) -> &ReportConfig {
        &self.config
    }

    pub fn summary_stats(&self) -> &SummaryStats {
        &self.summary_stats
    }

    /// Results in arrival order.
    pub fn test_results(&self) -> &[TestResult] {
        &self.test_results
    }

    /// Seconds since the reporter was created.
    pub fn total_time(&self) -> f64 {
        self.init_time.elapsed().as_secs_f64()
    }

    /// Record when the current test started.
    pub fn start_test(&mut self, event: &StartTestEvent) {
        if let Some(ref id) = event.test_id {
            debug!(test = %id, "test started");
        }
        self.start = Some(event.start_time);
    }

    /// Record one test outcome.
    pub fn test_outcome(&mut self, event: &dyn OutcomeEvent) {
        let outcome = event.outcome().clone();

        let traceback = if outcome.is_failure() {
            event.exc_info().map(format_exception)
        } else {
            None
        };

        self.summary_stats.record(&outcome);

        let elapsed_seconds = self.elapsed_since_start(SystemTime::now());
        debug!(
            test = event.test_id(),
            outcome = %outcome,
            elapsed = elapsed_seconds,
            "test finished"
        );

        self.test_results.push(TestResult {
            name: event.test_id().to_string(),
            description: event.description().map(str::to_string),
            outcome,
            reason: event.reason().map(str::to_string),
            traceback,
            metadata: event.metadata().clone(),
            elapsed_seconds,
        });
    }

    /// Seconds since the last start event; zero when there was none.
    /// Clears the stored start either way.
    fn elapsed_since_start(&mut self, now: SystemTime) -> f64 {
        match self.start.take() {
            Some(start) => match now.duration_since(start) {
                Ok(elapsed) => elapsed.as_secs_f64(),
                Err(e) => {
                    warn!("test start time is {:?} in the future, recording 0s", e.duration());
                    0.0
                }
            },
            None => {
                warn!("outcome received without a start event, recording 0s");
                0.0
            }
        }
    }

    /// Snapshot the collected state into what the template renders.
    pub fn build_context(&self) -> Result<ReportContext, ReportError> {
        let index = build_search_index(&self.test_results);
        Ok(ReportContext {
            title: self.config.report_title.clone(),
            test_id: self.config.test_id.clone(),
            summary: self.summary_stats.clone(),
            results: sort_results(&self.test_results),
            search_index: search_index_json(&index)?,
            total_time: self.total_time(),
            timestamp: chrono::Utc::now().format("%Y/%m/%d %H:%M:%S UTC").to_string(),
        })
    }

    /// Render the report and write it to the configured path.
    pub fn generate_report(&self) -> Result<ReportContext, ReportError> {
        info!("Generating HTML report...");
        let context = self.build_context()?;
        render(
            &context,
            self.config.template.as_deref(),
            &self.config.report_path,
        )?;
        info!(
            total = context.summary.total,
            "wrote HTML report to {}",
            self.config.report_path.display()
        );
        Ok(context)
    }
}

impl Plugin for HtmlReporter {
    fn name(&self) -> &str {
        "html-report"
    }

    fn start_test(&mut self, event: &StartTestEvent) {
        HtmlReporter::start_test(self, event);
    }

    fn test_outcome(&mut self, event: &dyn OutcomeEvent) {
        HtmlReporter::test_outcome(self, event);
    }

    fn after_summary_report(&mut self) -> Result<(), ReportError> {
        self.generate_report().map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[test]
    fn elapsed_is_measured_from_start_and_then_cleared() {
        let mut reporter = HtmlReporter::new(ReportConfig::default());
        let start = SystemTime::now();
        reporter.start_test(&StartTestEvent::new(start));

        let elapsed = reporter.elapsed_since_start(start + Duration::from_millis(1500));
        assert!((elapsed - 1.5).abs() < 1e-9);
        assert!(reporter.start.is_none());
        assert_eq!(reporter.elapsed_since_start(SystemTime::now()), 0.0);
    }

    #[test]
    fn start_in_the_future_records_zero() {
        let mut reporter = HtmlReporter::new(ReportConfig::default());
        let now = SystemTime::now();
        reporter.start_test(&StartTestEvent::new(now + Duration::from_secs(60)));
        assert_eq!(reporter.elapsed_since_start(now), 0.0);
    }
}
