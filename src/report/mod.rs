pub mod console;
pub mod html;
pub mod junit;
pub mod report_model;
pub mod summary;

use serde::{Deserialize, Serialize};

pub use report_model::TestSuiteReport;

/// Output formats `run` and `report` can render.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    #[default]
    Console,
    Text,
    Html,
    Junit,
}

impl ReportFormat {
    /// File written when no `--output` is given; console goes to stdout.
    pub fn default_file(&self) -> Option<&'static str> {
        match self {
            ReportFormat::Console => None,
            ReportFormat::Text => Some("test_summary.txt"),
            ReportFormat::Html => Some("report.html"),
            ReportFormat::Junit => Some("report.xml"),
        }
    }
}

/// Render `report` in `format`. `browser` labels the text summary.
pub fn render(report: &TestSuiteReport, format: ReportFormat, browser: &str) -> String {
    match format {
        ReportFormat::Console => console::format_console_report(report),
        ReportFormat::Text => summary::generate_text_summary(report, browser),
        ReportFormat::Html => html::generate_html_report(report),
        ReportFormat::Junit => junit::generate_junit_xml(report),
    }
}
