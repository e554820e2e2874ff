use std::io::BufRead;
use std::time::{Duration, SystemTime};

use serde::Deserialize;
use tracing::{debug, warn};

use crate::error::ReportError;
use crate::event::event_model::{ExceptionInfo, Outcome, StartTestEvent, TestOutcomeEvent};
use crate::session::session::Session;

// ============================================================================
// libtest JSON stream adapter
// ============================================================================
//
// `cargo test -- -Z unstable-options --format json [--report-time]` prints one
// JSON object per line:
//
//   {"type":"suite","event":"started","test_count":2}
//   {"type":"test","event":"started","name":"tests::a"}
//   {"type":"test","name":"tests::a","event":"ok","exec_time":0.001}
//   {"type":"test","name":"tests::b","event":"failed","stdout":"thread ... panicked ..."}
//   {"type":"suite","event":"failed","passed":1,"failed":1,...}
//
// Cargo interleaves plain-text lines, which are skipped.

/// One decoded libtest line.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum LibtestEvent {
    Suite(SuiteEvent),
    Test(TestEvent),
    Bench { name: String },
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SuiteEvent {
    pub event: String,
    pub test_count: Option<usize>,
    pub passed: Option<usize>,
    pub failed: Option<usize>,
    pub ignored: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TestEvent {
    pub event: String,
    pub name: String,
    pub stdout: Option<String>,
    pub message: Option<String>,

    /// Seconds as a number on recent toolchains, `"0.001s"` on older ones
    pub exec_time: Option<serde_json::Value>,
}

/// Counters returned once the stream is drained.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AdapterStats {
    pub lines: usize,
    pub skipped_lines: usize,
    pub suites: usize,
    pub started: usize,
    pub outcomes: usize,
}

/// Decode one line.
///
/// `Ok(None)` for blank lines, plain text, and JSON objects that are not
/// libtest events. Only a `{`-prefixed line that is not valid JSON is an error.
pub fn parse_line(line: &str) -> Result<Option<LibtestEvent>, serde_json::Error> {
    let trimmed = line.trim();
    if !trimmed.starts_with('{') {
        return Ok(None);
    }
    let value: serde_json::Value = serde_json::from_str(trimmed)?;
    match serde_json::from_value(value) {
        Ok(event) => Ok(Some(event)),
        Err(e) => {
            debug!("ignoring non-libtest JSON line: {}", e);
            Ok(None)
        }
    }
}

/// Convert a finished test into an outcome event; `None` for lifecycle noise
/// like `started` or `timeout`.
pub fn outcome_event(test: &TestEvent) -> Option<TestOutcomeEvent> {
    let mut event = match test.event.as_str() {
        "ok" => TestOutcomeEvent::new(&test.name, Outcome::Passed),
        "failed" => {
            let mut event = TestOutcomeEvent::new(&test.name, Outcome::Failed);
            if let Some(exc) = test.stdout.as_deref().and_then(panic_info) {
                event = event.with_exc_info(exc);
            }
            event
        }
        "ignored" => TestOutcomeEvent::new(&test.name, Outcome::Skipped),
        _ => return None,
    };

    if let Some(ref message) = test.message {
        event = event.with_reason(message.clone());
    }
    if let Some(ref exec_time) = test.exec_time {
        event = event.with_metadata("exec_time", exec_time.clone());
    }
    Some(event)
}

// Captured stdout of a failed test: panic message, then an optional
// `stack backtrace:` section when RUST_BACKTRACE is set.
fn panic_info(stdout: &str) -> Option<ExceptionInfo> {
    let stdout = stdout.trim();
    if stdout.is_empty() {
        return None;
    }
    match stdout.split_once("stack backtrace:\n") {
        Some((message, backtrace)) => {
            Some(ExceptionInfo::new("panic", message.trim_end()).with_backtrace(backtrace))
        }
        None => Some(ExceptionInfo::new("panic", stdout)),
    }
}

/// Seconds from an `exec_time` value: `2.5` or `"2.5s"`.
pub fn exec_time_secs(value: &serde_json::Value) -> Option<f64> {
    match value {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => s.trim().trim_end_matches('s').parse().ok(),
        _ => None,
    }
}

// `now` minus the reported duration; `None` without a usable `exec_time`.
fn reported_start(test: &TestEvent, now: SystemTime) -> Option<SystemTime> {
    let secs = test.exec_time.as_ref().and_then(exec_time_secs)?;
    let elapsed = Duration::try_from_secs_f64(secs).ok()?;
    now.checked_sub(elapsed)
}

/// Feed a whole libtest stream through the session's start/outcome hooks.
///
/// The end-of-run hook is left to the caller.
pub fn drive_session<R: BufRead>(reader: R, session: &mut Session<'_>) -> Result<AdapterStats, ReportError> {
    let mut stats = AdapterStats::default();

    for (idx, line) in reader.lines().enumerate() {
        let line = line.map_err(ReportError::EventRead)?;
        stats.lines += 1;

        let event = parse_line(&line).map_err(|source| ReportError::EventParse {
            line: idx + 1,
            source,
        })?;

        match event {
            None | Some(LibtestEvent::Unknown) => stats.skipped_lines += 1,
            Some(LibtestEvent::Suite(suite)) => {
                if suite.event == "started" {
                    stats.suites += 1;
                }
                debug!(event = %suite.event, tests = ?suite.test_count, "suite");
            }
            Some(LibtestEvent::Bench { name }) => {
                debug!(bench = %name, "benchmark results are not reported");
            }
            Some(LibtestEvent::Test(test)) => match test.event.as_str() {
                "started" => {
                    stats.started += 1;
                    session.start_test(&StartTestEvent::now().for_test(&test.name));
                }
                "timeout" => warn!(test = %test.name, "test has been running for over 60 seconds"),
                _ => match outcome_event(&test) {
                    Some(outcome) => {
                        stats.outcomes += 1;
                        // Back-date the start by libtest's own measurement so
                        // replayed streams keep their real durations.
                        if let Some(start) = reported_start(&test, SystemTime::now()) {
                            session.start_test(&StartTestEvent::new(start).for_test(&test.name));
                        }
                        session.test_outcome(&outcome);
                    }
                    None => debug!(test = %test.name, event = %test.event, "unhandled test event"),
                },
            },
        }
    }

    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn panic_info_splits_off_backtrace() {
        let exc = panic_info("thread 't' panicked at src/lib.rs:1:1:\nboom\nstack backtrace:\n   0: foo\n")
            .unwrap();
        assert_eq!(exc.message, "thread 't' panicked at src/lib.rs:1:1:\nboom");
        assert_eq!(exc.backtrace.as_deref(), Some("   0: foo"));
    }

    #[test]
    fn exec_time_accepts_number_and_suffixed_string() {
        assert_eq!(exec_time_secs(&serde_json::json!(2.5)), Some(2.5));
        assert_eq!(exec_time_secs(&serde_json::json!("0.25s")), Some(0.25));
        assert_eq!(exec_time_secs(&serde_json::json!(null)), None);
    }

    #[test]
    fn reported_start_ignores_negative_exec_time() {
        let test = TestEvent {
            event: "ok".into(),
            name: "t".into(),
            stdout: None,
            message: None,
            exec_time: Some(serde_json::json!(-1.0)),
        };
        assert!(reported_start(&test, SystemTime::now()).is_none());
    }

    #[test]
    fn panic_info_empty_stdout_is_none() {
        assert!(panic_info("  \n").is_none());
    }
}
