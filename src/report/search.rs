use crate::error::ReportError;
use crate::report::report_model::{SearchIndex, TestResult};

/// Map search terms to the test(s) they relate to.
///
/// A test's own name always maps to itself; every whitespace-separated word
/// of its description maps to each test whose description contains it.
///
/// ```text
/// {
///   "1234":                 ["ui::tests::hello_world"],
///   "buggy":                ["ui::tests::buggy_case", "ui::tests::hello_world"],
///   "ui::tests::hello_world": ["ui::tests::hello_world"]
/// }
/// ```
pub fn build_search_index(results: &[TestResult]) -> SearchIndex {
    let mut index = SearchIndex::new();

    for result in results {
        push_unique(index.entry(result.name.clone()).or_default(), &result.name);

        if let Some(ref description) = result.description {
            for token in description.split_whitespace() {
                push_unique(index.entry(token.to_string()).or_default(), &result.name);
            }
        }
    }

    index
}

/// Serialize the index for embedding in an inline `<script>`.
pub fn search_index_json(index: &SearchIndex) -> Result<String, ReportError> {
    let json = serde_json::to_string(index).map_err(|source| ReportError::Serialize {
        context: "search index".to_string(),
        source,
    })?;
    // Unicode escapes keep the JSON valid while no `</script>` or `<!--` can
    // appear in the page source.
    Ok(json
        .replace('<', "\\u003c")
        .replace('>', "\\u003e")
        .replace('&', "\\u0026"))
}

/// Stable sort by test name, ascending.
pub fn sort_results(results: &[TestResult]) -> Vec<TestResult> {
    let mut sorted = results.to_vec();
    sorted.sort_by(|a, b| a.name.cmp(&b.name));
    sorted
}

// A test's tokens are pushed back to back, so comparing with the last entry
// is enough to list a repeated word once.
fn push_unique(names: &mut Vec<String>, name: &str) {
    if names.last().map(String::as_str) != Some(name) {
        names.push(name.to_string());
    }
}
