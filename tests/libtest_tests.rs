use std::io::Cursor;

use html_test_report::event::event_model::{OutcomeEvent, Outcome};
use html_test_report::event::libtest::{LibtestEvent, drive_session, outcome_event, parse_line};
use html_test_report::report::collector::{HtmlReporter, ReportConfig};
use html_test_report::{ReportError, Session};

const STREAM: &str = r#"
    Running unittests src/lib.rs (target/debug/deps/demo-1234)
{ "type": "suite", "event": "started", "test_count": 3 }
{ "type": "test", "event": "started", "name": "tests::adds" }
{ "type": "test", "name": "tests::adds", "event": "ok", "exec_time": 0.001 }
{ "type": "test", "event": "started", "name": "tests::breaks" }
{ "type": "test", "name": "tests::breaks", "event": "failed", "stdout": "\nthread 'tests::breaks' panicked at src/lib.rs:10:9:\nassertion failed: 1 == 2\nnote: run with `RUST_BACKTRACE=1` environment variable to display a backtrace\n" }
{ "type": "test", "event": "started", "name": "tests::slow" }
{ "type": "test", "name": "tests::slow", "event": "ignored", "message": "needs a database" }
{ "type": "suite", "event": "failed", "passed": 1, "failed": 1, "ignored": 1, "measured": 0, "filtered_out": 0, "exec_time": 0.01 }
"#;

fn run_stream(stream: &str) -> (HtmlReporter, Result<html_test_report::event::libtest::AdapterStats, ReportError>) {
    let mut reporter = HtmlReporter::new(ReportConfig::default());
    let stats = {
        let mut session = Session::new();
        session.register(Box::new(&mut reporter));
        drive_session(Cursor::new(stream), &mut session)
    };
    (reporter, stats)
}

// ============================================================================
// 1. Line parsing
// ============================================================================

#[test]
fn parse_plain_text_is_skipped() {
    assert_eq!(parse_line("   Running unittests src/lib.rs").unwrap(), None);
    assert_eq!(parse_line("").unwrap(), None);
}

#[test]
fn parse_test_event() {
    let event = parse_line(r#"{"type":"test","event":"started","name":"a::b"}"#)
        .unwrap()
        .unwrap();
    match event {
        LibtestEvent::Test(test) => {
            assert_eq!(test.event, "started");
            assert_eq!(test.name, "a::b");
        }
        other => panic!("Expected test event, got {:?}", other),
    }
}

#[test]
fn parse_unknown_type_is_tolerated() {
    assert_eq!(
        parse_line(r#"{"type":"report","event":"x"}"#).unwrap(),
        Some(LibtestEvent::Unknown)
    );
    assert_eq!(parse_line(r#"{"reason":"compiler-artifact"}"#).unwrap(), None);
}

#[test]
fn parse_malformed_json_is_an_error() {
    assert!(parse_line(r#"{"type": "test", "#).is_err());
}

// ============================================================================
// 2. Outcome mapping
// ============================================================================

#[test]
fn failed_event_carries_panic_as_exception() {
    let LibtestEvent::Test(test) = parse_line(
        r#"{"type":"test","name":"t","event":"failed","stdout":"thread 't' panicked:\nassertion failed: x\n"}"#,
    )
    .unwrap()
    .unwrap() else {
        panic!("Expected test event");
    };

    let event = outcome_event(&test).unwrap();
    assert_eq!(event.outcome(), &Outcome::Failed);
    let exc = event.exc_info().unwrap();
    assert_eq!(exc.kind, "panic");
    assert!(exc.message.contains("assertion failed: x"));
}

#[test]
fn ignored_event_is_skipped_with_reason() {
    let LibtestEvent::Test(test) =
        parse_line(r#"{"type":"test","name":"t","event":"ignored","message":"slow"}"#)
            .unwrap()
            .unwrap()
    else {
        panic!("Expected test event");
    };

    let event = outcome_event(&test).unwrap();
    assert_eq!(event.outcome(), &Outcome::Skipped);
    assert_eq!(event.reason(), Some("slow"));
}

#[test]
fn started_and_timeout_are_not_outcomes() {
    for kind in ["started", "timeout"] {
        let line = format!(r#"{{"type":"test","name":"t","event":"{}"}}"#, kind);
        let Some(LibtestEvent::Test(test)) = parse_line(&line).unwrap() else {
            panic!("Expected test event");
        };
        assert!(outcome_event(&test).is_none());
    }
}

// ============================================================================
// 3. Driving a session
// ============================================================================

#[test]
fn drive_session_collects_every_outcome() {
    let (reporter, stats) = run_stream(STREAM);
    let stats = stats.unwrap();

    assert_eq!(stats.suites, 1);
    assert_eq!(stats.started, 3);
    assert_eq!(stats.outcomes, 3);

    let summary = reporter.summary_stats();
    assert_eq!(summary.total, 3);
    assert_eq!(summary.count(&Outcome::Passed), 1);
    assert_eq!(summary.count(&Outcome::Failed), 1);
    assert_eq!(summary.count(&Outcome::Skipped), 1);

    let results = reporter.test_results();
    assert_eq!(results[0].name, "tests::adds");
    assert_eq!(results[0].metadata["exec_time"], serde_json::json!(0.001));
    assert!(results[1].traceback.as_deref().unwrap().contains("assertion failed: 1 == 2"));
    assert_eq!(results[2].reason.as_deref(), Some("needs a database"));
}

#[test]
fn drive_session_reports_malformed_line_number() {
    let (_, stats) = run_stream("plain\n{\"type\": \"test\"\n");
    match stats {
        Err(ReportError::EventParse { line, .. }) => assert_eq!(line, 2),
        other => panic!("Expected EventParse, got {:?}", other),
    }
}

// ============================================================================
// 4. Reported durations
// ============================================================================

#[test]
fn reported_exec_time_becomes_elapsed_seconds() {
    let (reporter, stats) = run_stream(concat!(
        "{\"type\":\"test\",\"event\":\"started\",\"name\":\"t::slow\"}\n",
        "{\"type\":\"test\",\"name\":\"t::slow\",\"event\":\"ok\",\"exec_time\":2.5}\n",
        "{\"type\":\"test\",\"name\":\"t::old_format\",\"event\":\"ok\",\"exec_time\":\"0.75s\"}\n",
    ));
    stats.unwrap();

    let results = reporter.test_results();
    assert!((results[0].elapsed_seconds - 2.5).abs() < 0.1, "{}", results[0].elapsed_seconds);
    assert!((results[1].elapsed_seconds - 0.75).abs() < 0.1, "{}", results[1].elapsed_seconds);
    assert_eq!(results[0].metadata["exec_time"], serde_json::json!(2.5));
}

#[test]
fn missing_exec_time_falls_back_to_live_timing() {
    let (reporter, _) = run_stream(concat!(
        "{\"type\":\"test\",\"event\":\"started\",\"name\":\"t\"}\n",
        "{\"type\":\"test\",\"name\":\"t\",\"event\":\"ok\"}\n",
    ));
    let elapsed = reporter.test_results()[0].elapsed_seconds;
    assert!((0.0..1.0).contains(&elapsed));
}
