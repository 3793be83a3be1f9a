use crate::report::report_model::{TestSuiteReport, format_seconds};
use crate::runner::record::Status;

// ============================================================================
// HTML reporter: self-contained HTML report
// ============================================================================

/// Generate a self-contained HTML report.
///
/// Green/red header by overall result, one section per scenario with its
/// steps, failed steps highlighted and known defects badged. Inline CSS only.
pub fn generate_html_report(report: &TestSuiteReport) -> String {
    let header_color = if report.all_passed() {
        "#4CAF50"
    } else {
        "#f44336"
    };

    let status_text = if report.all_passed() {
        "ALL SCENARIOS PASSED"
    } else {
        "SOME SCENARIOS FAILED"
    };

    let duration_text = report
        .duration_ms
        .map(|ms| format!(" in {:.1}s", ms as f64 / 1000.0))
        .unwrap_or_default();

    let mut test_cases = String::new();
    for scenario in &report.scenarios {
        let case_class = if scenario.passed() { "pass" } else { "fail" };
        let case_marker = if scenario.passed() {
            "\u{2713}"
        } else {
            "\u{2717}"
        };
        let badge = if scenario.is_unexpected_pass() {
            r#" <span class="badge">known defect: passed unexpectedly</span>"#
        } else if scenario.known_defect {
            r#" <span class="badge">known defect</span>"#
        } else {
            ""
        };

        test_cases.push_str(&format!(
            r#"<div class="test-case {class}">
<h3>{marker} {name}{badge}</h3>
<p>{feature} | {duration}</p>
<ul class="steps">
"#,
            class = case_class,
            marker = case_marker,
            name = escape_html(&scenario.name),
            badge = badge,
            feature = escape_html(&scenario.feature),
            duration = format_seconds(scenario.duration_ms),
        ));

        for step in &scenario.steps {
            test_cases.push_str(&format!(
                "<li class=\"{}\">{}",
                step.status.as_str(),
                escape_html(&step.line())
            ));
            if let Some(ref error) = step.error {
                test_cases.push_str(&format!(
                    "<div class=\"error\">{}</div>",
                    escape_html(error)
                ));
            }
            test_cases.push_str("</li>\n");
        }
        test_cases.push_str("</ul>\n");

        for shot in &scenario.screenshots {
            test_cases.push_str(&format!(
                "<p class=\"shot\">Screenshot: {}</p>\n",
                escape_html(shot)
            ));
        }

        test_cases.push_str("</div>\n");
    }

    let failed_steps = report
        .scenarios
        .iter()
        .flat_map(|s| s.steps.iter())
        .filter(|s| s.status == Status::Failed)
        .count();

    format!(
        r##"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="UTF-8">
<meta name="viewport" content="width=device-width, initial-scale=1.0">
<title>{suite_name} - Test Report</title>
<style>
body {{ font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", Roboto, sans-serif; margin: 0; padding: 0; background: #f5f5f5; }}
.header {{ background: {header_color}; color: white; padding: 20px 30px; }}
.header h1 {{ margin: 0 0 8px 0; font-size: 24px; }}
.header p {{ margin: 0; font-size: 16px; opacity: 0.9; }}
.content {{ max-width: 900px; margin: 20px auto; padding: 0 20px; }}
.test-case {{ background: white; border-radius: 6px; padding: 16px 20px; margin-bottom: 12px; border-left: 4px solid #ccc; }}
.test-case.pass {{ border-left-color: #4CAF50; }}
.test-case.fail {{ border-left-color: #f44336; }}
.test-case h3 {{ margin: 0 0 8px 0; font-size: 16px; }}
.test-case p {{ margin: 4px 0; color: #666; font-size: 14px; }}
.badge {{ background: #ff9800; color: white; border-radius: 3px; padding: 1px 6px; font-size: 12px; }}
.steps {{ margin: 8px 0 0 0; padding-left: 20px; font-size: 13px; }}
.steps li.passed {{ color: #2e7d32; }}
.steps li.failed, .steps li.undefined {{ color: #c62828; font-weight: bold; }}
.steps li.skipped {{ color: #9e9e9e; }}
.error {{ font-weight: normal; margin: 2px 0 4px 0; }}
</style>
</head>
<body>
<div class="header">
<h1>{status_text}</h1>
<p>{suite_name}: {passed} passed, {failed} failed ({total} total, {failed_steps} failed steps, {rate:.2}% success){duration}</p>
<p>Started {started_at}</p>
</div>
<div class="content">
{test_cases}
</div>
</body>
</html>"##,
        suite_name = escape_html(&report.suite_name),
        header_color = header_color,
        status_text = status_text,
        passed = report.passed,
        failed = report.failed,
        total = report.total,
        failed_steps = failed_steps,
        rate = report.success_rate(),
        duration = duration_text,
        started_at = escape_html(&report.started_at),
        test_cases = test_cases,
    )
}

/// Escape HTML special characters.
pub fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
