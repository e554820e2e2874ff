use std::any::Any;
use std::collections::BTreeMap;
use std::fmt;
use std::time::SystemTime;

use serde::{Deserialize, Serialize};

/// Arbitrary per-test data attached by the host (tags, timings, ids).
pub type Metadata = BTreeMap<String, serde_json::Value>;

// ============================================================================
// Outcome
// ============================================================================

/// Classification of a single test's result.
///
/// Serialized as its lowercase name so templates and the summary map can key
/// on it directly. Names the host invents beyond the common four survive as
/// `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Outcome {
    Passed,
    Failed,
    Error,
    Skipped,
    Other(String),
}

impl Outcome {
    pub fn as_str(&self) -> &str {
        match self {
            Outcome::Passed => "passed",
            Outcome::Failed => "failed",
            Outcome::Error => "error",
            Outcome::Skipped => "skipped",
            Outcome::Other(name) => name,
        }
    }

    /// Failures and errors are the outcomes that may carry a traceback.
    pub fn is_failure(&self) -> bool {
        matches!(self, Outcome::Failed | Outcome::Error)
    }
}

impl From<String> for Outcome {
    fn from(name: String) -> Self {
        match name.as_str() {
            "passed" => Outcome::Passed,
            "failed" => Outcome::Failed,
            "error" => Outcome::Error,
            "skipped" => Outcome::Skipped,
            _ => Outcome::Other(name),
        }
    }
}

impl From<&str> for Outcome {
    fn from(name: &str) -> Self {
        Outcome::from(name.to_string())
    }
}

impl From<Outcome> for String {
    fn from(outcome: Outcome) -> Self {
        match outcome {
            Outcome::Other(name) => name,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Exception info
// ============================================================================

/// What the host caught when a test blew up: a kind, a message and, when the
/// host captured one, a backtrace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExceptionInfo {
    pub kind: String,
    pub message: String,
    pub backtrace: Option<String>,
}

impl ExceptionInfo {
    pub fn new(kind: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            message: message.into(),
            backtrace: None,
        }
    }

    /// Build from the payload returned by `std::panic::catch_unwind`.
    ///
    /// `panic!`/`assert!` payloads are either `&'static str` or `String`;
    /// anything else is reported without a message.
    pub fn from_panic(payload: &(dyn Any + Send)) -> Self {
        let message = if let Some(s) = payload.downcast_ref::<&str>() {
            (*s).to_string()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "Box<dyn Any>".to_string()
        };
        Self::new("panic", message)
    }

    /// Build from an error value, folding its `source()` chain into the message.
    pub fn from_error<E: std::error::Error + ?Sized>(err: &E) -> Self {
        let mut message = err.to_string();
        let mut source = err.source();
        while let Some(cause) = source {
            message.push_str("\nCaused by: ");
            message.push_str(&cause.to_string());
            source = cause.source();
        }
        Self::new(std::any::type_name::<E>(), message)
    }

    pub fn with_backtrace(mut self, backtrace: impl Into<String>) -> Self {
        self.backtrace = Some(backtrace.into());
        self
    }
}

/// Render exception info as the traceback text shown in the report.
pub fn format_exception(exc: &ExceptionInfo) -> String {
    let mut out = format!("{}: {}", exc.kind, exc.message.trim_end());
    if let Some(ref backtrace) = exc.backtrace {
        out.push_str("\nstack backtrace:\n");
        out.push_str(backtrace.trim_end());
    }
    out
}

// ============================================================================
// Host events
// ============================================================================

/// Start-of-test notification.
#[derive(Debug, Clone)]
pub struct StartTestEvent {
    pub test_id: Option<String>,
    pub start_time: SystemTime,
}

impl StartTestEvent {
    pub fn new(start_time: SystemTime) -> Self {
        Self {
            test_id: None,
            start_time,
        }
    }

    pub fn now() -> Self {
        Self::new(SystemTime::now())
    }

    pub fn for_test(mut self, test_id: impl Into<String>) -> Self {
        self.test_id = Some(test_id.into());
        self
    }
}

/// The fields of a per-test outcome notification the reporter actually reads.
///
/// Host adapters implement this for their own event types; `TestOutcomeEvent`
/// is the owned implementation used by the bundled adapter and by tests.
pub trait OutcomeEvent {
    fn test_id(&self) -> &str;
    fn description(&self) -> Option<&str>;
    fn outcome(&self) -> &Outcome;
    fn reason(&self) -> Option<&str>;
    fn exc_info(&self) -> Option<&ExceptionInfo>;
    fn metadata(&self) -> &Metadata;
}

#[derive(Debug, Clone)]
pub struct TestOutcomeEvent {
    pub test_id: String,
    pub description: Option<String>,
    pub outcome: Outcome,
    pub reason: Option<String>,
    pub exc_info: Option<ExceptionInfo>,
    pub metadata: Metadata,
}

impl TestOutcomeEvent {
    pub fn new(test_id: impl Into<String>, outcome: Outcome) -> Self {
        Self {
            test_id: test_id.into(),
            description: None,
            outcome,
            reason: None,
            exc_info: None,
            metadata: Metadata::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    pub fn with_exc_info(mut self, exc_info: ExceptionInfo) -> Self {
        self.exc_info = Some(exc_info);
        self
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }
}

impl OutcomeEvent for TestOutcomeEvent {
    fn test_id(&self) -> &str {
        &self.test_id
    }

    fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    fn outcome(&self) -> &Outcome {
        &self.outcome
    }

    fn reason(&self) -> Option<&str> {
        self.reason.as_deref()
    }

    fn exc_info(&self) -> Option<&ExceptionInfo> {
        self.exc_info.as_ref()
    }

    fn metadata(&self) -> &Metadata {
        &self.metadata
    }
}
