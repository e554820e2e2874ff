use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::event::event_model::{Metadata, Outcome};

// ============================================================================
// Per-test result
// ============================================================================

/// One observed test outcome, as it appears in the report.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TestResult {
    /// Unique test identifier (e.g. `crate::module::test_name`)
    pub name: String,

    /// Doc text supplied by the host, if any
    pub description: Option<String>,

    pub outcome: Outcome,

    /// Why the test was skipped or failed, when the host says
    pub reason: Option<String>,

    /// Formatted exception, only for failures/errors that carried one
    pub traceback: Option<String>,

    pub metadata: Metadata,

    /// Wall time between the start and outcome notifications
    pub elapsed_seconds: f64,
}

// ============================================================================
// Summary statistics
// ============================================================================

/// Per-outcome counts plus a running total.
///
/// Serialized as `{"total": 3, "counts": {"failed": 1, "passed": 2}}`. The
/// counts stay nested because outcome names are open-ended and one of them
/// may itself be called `total`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SummaryStats {
    pub total: usize,
    pub counts: BTreeMap<String, usize>,
}

impl SummaryStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, outcome: &Outcome) {
        *self.counts.entry(outcome.as_str().to_string()).or_insert(0) += 1;
        self.total += 1;
    }

    /// Count for one outcome; zero if never seen.
    pub fn count(&self, outcome: &Outcome) -> usize {
        self.counts.get(outcome.as_str()).copied().unwrap_or(0)
    }

    /// True when no failure or error was recorded.
    pub fn all_passed(&self) -> bool {
        self.count(&Outcome::Failed) == 0 && self.count(&Outcome::Error) == 0
    }
}

// ============================================================================
// Search index
// ============================================================================

/// Token → names of the tests it is relevant to.
pub type SearchIndex = BTreeMap<String, Vec<String>>;

// ============================================================================
// Render context
// ============================================================================

/// Everything the template sees.
#[derive(Debug, Clone, Serialize)]
pub struct ReportContext {
    pub title: String,

    /// Run identifier shown next to the title
    pub test_id: String,

    pub summary: SummaryStats,

    /// Sorted by name
    pub results: Vec<TestResult>,

    /// Search index as JSON, safe to drop into a `<script>` block
    pub search_index: String,

    /// Seconds since the reporter was created
    pub total_time: f64,

    /// `YYYY/MM/DD HH:MM:SS UTC`
    pub timestamp: String,
}
