use crate::report::report_model::{TestSuiteReport, format_seconds};

// ============================================================================
// Text summary: the `test_summary.txt` artifact
// ============================================================================

const RULE: &str = "================================================================================";

fn section(out: &mut String, title: &str) {
    out.push_str(RULE);
    out.push('\n');
    out.push_str(title);
    out.push('\n');
    out.push_str(RULE);
    out.push('\n');
}

/// Plain-text execution summary: statistics, passed and failed scenarios,
/// known defects and screenshots.
pub fn generate_text_summary(report: &TestSuiteReport, browser: &str) -> String {
    let mut out = String::new();

    section(&mut out, &format!("{} - TEST EXECUTION SUMMARY", report.suite_name.to_uppercase()));
    out.push('\n');
    out.push_str(&format!("Execution Date: {}\n", report.started_at));
    out.push_str(&format!("Browser: {}\n\n", browser));

    section(&mut out, "STATISTICS");
    out.push_str(&format!("Total Scenarios:  {}\n", report.total));
    out.push_str(&format!("Passed:           {}\n", report.passed));
    out.push_str(&format!("Failed:           {}\n", report.failed));
    out.push_str(&format!("Success Rate:     {:.2}%\n", report.success_rate()));
    out.push_str(&format!("Screenshots:      {}\n\n", report.screenshots().len()));

    let passed: Vec<_> = report.passed_scenarios().collect();
    if !passed.is_empty() {
        section(&mut out, "PASSED SCENARIOS");
        for scenario in passed {
            out.push_str(&format!(
                "[OK] {} - {} ({})\n",
                scenario.feature,
                scenario.name,
                format_seconds(scenario.duration_ms)
            ));
        }
        out.push('\n');
    }

    let failed: Vec<_> = report.failed_scenarios().collect();
    if !failed.is_empty() {
        section(&mut out, "FAILED SCENARIOS");
        for scenario in failed {
            out.push_str(&format!(
                "[X] {} - {} ({})\n",
                scenario.feature,
                scenario.name,
                format_seconds(scenario.duration_ms)
            ));
            if let Some(message) = scenario.error_message() {
                out.push_str(&format!("    {}\n", message));
            }
        }
        out.push('\n');
    }

    let known = report.known_defects();
    if !known.is_empty() {
        section(&mut out, "KNOWN DEFECTS");
        for scenario in known {
            let note = if scenario.passed() {
                "passed unexpectedly"
            } else {
                "reproduced"
            };
            out.push_str(&format!("[!] {} - {} ({})\n", scenario.feature, scenario.name, note));
        }
        out.push('\n');
    }

    let screenshots = report.screenshots();
    if !screenshots.is_empty() {
        section(&mut out, "SCREENSHOTS");
        for path in screenshots {
            out.push_str(&format!("  - {}\n", path));
        }
        out.push('\n');
    }

    section(&mut out, "END OF REPORT");
    out
}
