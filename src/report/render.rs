use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use tera::Tera;
use tracing::debug;

use crate::error::ReportError;
use crate::report::report_model::ReportContext;

// ============================================================================
// Template loading and rendering (tera)
// ============================================================================

/// Template shipped with the crate, used when no template path is configured.
pub const BUNDLED_TEMPLATE: &str = include_str!("../../templates/report.html");

// Registered under an `.html` name so tera autoescapes every template,
// whatever its file extension.
const REGISTERED_NAME: &str = "report.html";

/// Template source plus a display name for error messages.
#[derive(Debug, Clone)]
pub struct Template {
    pub name: String,
    pub source: String,
}

impl Template {
    pub fn bundled() -> Self {
        Self {
            name: "<bundled report.html>".to_string(),
            source: BUNDLED_TEMPLATE.to_string(),
        }
    }
}

/// Load a template from disk, or the bundled one when `path` is `None`.
pub fn load_template(path: Option<&Path>) -> Result<Template, ReportError> {
    let Some(path) = path else {
        return Ok(Template::bundled());
    };
    let source = std::fs::read_to_string(path).map_err(|source| ReportError::TemplateLoad {
        path: path.to_path_buf(),
        source,
    })?;
    debug!("loaded template {}", path.display());
    Ok(Template {
        name: path.display().to_string(),
        source,
    })
}

/// Substitute the report context into a template.
pub fn render_template(template: &Template, context: &ReportContext) -> Result<String, ReportError> {
    let render_err = |source| ReportError::TemplateRender {
        name: template.name.clone(),
        source,
    };

    let mut tera = Tera::default();
    tera.add_raw_template(REGISTERED_NAME, &template.source)
        .map_err(render_err)?;
    let mut ctx = tera::Context::from_serialize(context).map_err(render_err)?;
    insert_nose2_names(&mut ctx, context)?;
    tera.render(REGISTERED_NAME, &ctx).map_err(render_err)
}

/// Expose the context under the variable names nose2-html-report templates
/// use, so an existing template can be passed with `--template`.
///
/// `test_summary` is flat there (`{"total": .., "passed": ..}`); `total` is
/// written last so an outcome of that name cannot replace it. Each entry of
/// `test_results` also gets `result` (the outcome) and `time` (`%f` seconds).
fn insert_nose2_names(ctx: &mut tera::Context, context: &ReportContext) -> Result<(), ReportError> {
    let mut summary: BTreeMap<&str, usize> = context
        .summary
        .counts
        .iter()
        .map(|(outcome, count)| (outcome.as_str(), *count))
        .collect();
    summary.insert("total", context.summary.total);

    let mut results = Vec::with_capacity(context.results.len());
    for result in &context.results {
        let mut value = serde_json::to_value(result).map_err(|source| ReportError::Serialize {
            context: format!("result '{}'", result.name),
            source,
        })?;
        if let Some(fields) = value.as_object_mut() {
            fields.insert("result".into(), result.outcome.as_str().into());
            fields.insert("time".into(), format!("{:.6}", result.elapsed_seconds).into());
        }
        results.push(value);
    }

    ctx.insert("test_report_title", &context.title);
    ctx.insert("test_summary", &summary);
    ctx.insert("test_results", &results);
    ctx.insert("autocomplete_terms", &context.search_index);
    Ok(())
}

/// Write the rendered report, replacing any existing file.
pub fn write_report(path: &Path, contents: &str) -> Result<(), ReportError> {
    std::fs::write(path, contents).map_err(|source| ReportError::ReportWrite {
        path: PathBuf::from(path),
        source,
    })
}

/// Load, render and write in one go.
pub fn render(
    context: &ReportContext,
    template_path: Option<&Path>,
    output_path: &Path,
) -> Result<(), ReportError> {
    let template = load_template(template_path)?;
    let html = render_template(&template, context)?;
    write_report(output_path, &html)?;
    debug!(bytes = html.len(), "wrote {}", output_path.display());
    Ok(())
}
