use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::report::collector::{DEFAULT_REPORT_PATH, DEFAULT_TEST_ID, DEFAULT_TITLE, ReportConfig};

pub const DEFAULT_CONFIG_PATH: &str = "html-test-report.yaml";

// ============================================================================
// CLI Argument Parsing (clap derive)
// ============================================================================

#[derive(Parser, Debug)]
#[command(
    name = "html-test-report",
    version,
    about = "Render libtest JSON output into a static HTML test report"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to config file (default: html-test-report.yaml in current dir)
    #[arg(long, global = true)]
    pub config: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Read a libtest JSON event stream and write the HTML report
    Run {
        /// File with libtest JSON lines (default: stdin)
        #[arg(long)]
        input: Option<String>,

        /// Report title
        #[arg(long)]
        title: Option<String>,

        /// Run identifier shown in the report header
        #[arg(long)]
        test_id: Option<String>,

        /// Output file path (default: report.html)
        #[arg(short, long)]
        output: Option<String>,

        /// Template file (default: bundled template)
        #[arg(long)]
        template: Option<String>,
    },

    /// Write the bundled template, to start a custom one from
    Template {
        /// Destination file (default: stdout)
        #[arg(short, long)]
        output: Option<String>,
    },
}

// ============================================================================
// Config File Model (optional YAML)
// ============================================================================

/// Optional YAML config file: `html-test-report.yaml`
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AppConfig {
    #[serde(default, rename = "html-report")]
    pub html_report: HtmlReportSection,
}

/// The `html-report` section. Every key is optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct HtmlReportSection {
    pub title: Option<String>,
    pub test_id: Option<String>,
    pub path: Option<String>,
    pub template: Option<String>,
}

// ============================================================================
// Config File Loading
// ============================================================================

/// Load config from a YAML file. Returns defaults if the file is missing;
/// a malformed file is logged and ignored.
pub fn load_config(path: Option<&str>) -> AppConfig {
    let config_path = path.unwrap_or(DEFAULT_CONFIG_PATH);
    let Ok(content) = std::fs::read_to_string(config_path) else {
        return AppConfig::default();
    };
    match serde_yaml::from_str(&content) {
        Ok(config) => config,
        Err(e) => {
            warn!("ignoring malformed config {}: {}", config_path, e);
            AppConfig::default()
        }
    }
}

// ============================================================================
// Config Builder (merge CLI args with config file)
// ============================================================================

/// Command-line values that override the config file.
#[derive(Debug, Clone, Default)]
pub struct ReportOverrides<'a> {
    pub title: Option<&'a str>,
    pub test_id: Option<&'a str>,
    pub output: Option<&'a str>,
    pub template: Option<&'a str>,
}

/// Resolve reporter settings: CLI > config file > defaults.
/// Paths come back absolute.
pub fn build_report_config(overrides: &ReportOverrides<'_>, config: &AppConfig) -> ReportConfig {
    let section = &config.html_report;

    let report_title = overrides
        .title
        .or(section.title.as_deref())
        .unwrap_or(DEFAULT_TITLE);
    let test_id = overrides
        .test_id
        .or(section.test_id.as_deref())
        .unwrap_or(DEFAULT_TEST_ID);
    let report_path = overrides
        .output
        .or(section.path.as_deref())
        .unwrap_or(DEFAULT_REPORT_PATH);
    let template = overrides.template.or(section.template.as_deref());

    ReportConfig {
        report_title: report_title.to_string(),
        test_id: test_id.to_string(),
        report_path: absolute(report_path),
        template: template.map(absolute),
    }
}

fn absolute(path: &str) -> PathBuf {
    let path = Path::new(path);
    std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf())
}
