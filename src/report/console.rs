use crate::report::report_model::TestSuiteReport;
use crate::runner::record::Status;

// ============================================================================
// Console reporter: formatted terminal output
// ============================================================================

/// Format a test suite report for terminal output.
///
/// Produces output like:
/// ```text
/// === Test Suite: bdd-lab ===
///
/// ✓ PASS  Mens page - TC1 - Test page loads correctly (7 steps)
/// ✗ FAIL  Mens page - TC6 - Test search functionality (5 steps) [known defect]
///     [FAIL] Then search results should display relevant products: BUG: ...
///
/// === Results: 1 passed, 1 failed (2 total) in 12.3s ===
/// ```
pub fn format_console_report(report: &TestSuiteReport) -> String {
    let mut out = String::new();

    out.push_str(&format!("=== Test Suite: {} ===\n\n", report.suite_name));

    for scenario in &report.scenarios {
        let marker = if scenario.passed() {
            "\u{2713} PASS"
        } else {
            "\u{2717} FAIL"
        };
        let defect = if scenario.is_unexpected_pass() {
            " [known defect, passed unexpectedly]"
        } else if scenario.known_defect {
            " [known defect]"
        } else {
            ""
        };

        out.push_str(&format!(
            "{}  {} - {} ({} steps){}\n",
            marker,
            scenario.feature,
            scenario.name,
            scenario.steps.len(),
            defect
        ));

        for step in &scenario.steps {
            let label = match step.status {
                Status::Failed => "FAIL",
                Status::Undefined => "UNDEFINED",
                Status::Passed | Status::Skipped => continue,
            };
            let detail = step.error.as_deref().unwrap_or("step failed");
            out.push_str(&format!("    [{}] {}: {}\n", label, step.line(), detail));
        }
    }

    let known = report.known_defects();
    if !known.is_empty() {
        out.push_str(&format!("\nKnown defects ({}):\n", known.len()));
        for scenario in known {
            out.push_str(&format!(
                "  - {} ({})\n",
                scenario.name,
                scenario.status.as_str()
            ));
        }
    }

    let unexpected = report.unexpected_passes();
    if !unexpected.is_empty() {
        out.push_str("\nUnexpected passes (defect may be fixed):\n");
        for scenario in unexpected {
            out.push_str(&format!("  - {}\n", scenario.name));
        }
    }

    // Summary line
    out.push_str(&format!(
        "\n=== Results: {} passed, {} failed ({} total)",
        report.passed, report.failed, report.total
    ));

    if let Some(ms) = report.duration_ms {
        let secs = ms as f64 / 1000.0;
        out.push_str(&format!(" in {:.1}s", secs));
    }

    out.push_str(" ===\n");

    out
}
