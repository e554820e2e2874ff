#![allow(dead_code)]

use std::path::Path;

use html_test_report::event::event_model::{ExceptionInfo, Metadata, Outcome, TestOutcomeEvent};
use html_test_report::report::collector::ReportConfig;
use html_test_report::report::report_model::TestResult;

pub fn result(name: &str, description: Option<&str>) -> TestResult {
    TestResult {
        name: name.to_string(),
        description: description.map(str::to_string),
        outcome: Outcome::Passed,
        reason: None,
        traceback: None,
        metadata: Metadata::new(),
        elapsed_seconds: 0.25,
    }
}

pub fn passing(name: &str) -> TestOutcomeEvent {
    TestOutcomeEvent::new(name, Outcome::Passed)
}

/// A failing outcome carrying the panic from a real failed `assert!`.
pub fn failing_with_assertion(name: &str) -> TestOutcomeEvent {
    let payload = std::panic::catch_unwind(|| {
        let (left, right) = (1, 2);
        assert!(left == right);
    })
    .expect_err("assertion should fail");
    TestOutcomeEvent::new(name, Outcome::Failed).with_exc_info(ExceptionInfo::from_panic(payload.as_ref()))
}

pub fn config_in(dir: &Path) -> ReportConfig {
    ReportConfig {
        report_path: dir.join("report.html"),
        ..ReportConfig::default()
    }
}
