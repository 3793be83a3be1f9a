use crate::report::report_model::TestSuiteReport;
use crate::runner::record::Status;

// ============================================================================
// JUnit XML reporter: standard CI integration format
// ============================================================================

/// Generate a JUnit XML report for CI systems.
///
/// One `<testcase>` per scenario, classname = feature name. Failed scenarios
/// carry a `<failure>` with the failing step and its message; known defects
/// are marked in a `<properties>` entry.
/// ```xml
/// <?xml version="1.0" encoding="UTF-8"?>
/// <testsuite name="bdd-lab" tests="2" failures="1" time="12.345">
///   <testcase name="TC1 - Test page loads correctly" classname="Mens page" time="3.100" />
///   <testcase name="TC6 - Test search functionality" classname="Mens page" time="4.000">
///     <failure message="Then ... failed" type="StepFailure">BUG: ...</failure>
///   </testcase>
/// </testsuite>
/// ```
pub fn generate_junit_xml(report: &TestSuiteReport) -> String {
    let time_attr = report
        .duration_ms
        .map(|ms| format!(" time=\"{:.3}\"", ms as f64 / 1000.0))
        .unwrap_or_default();

    let mut cases = String::new();
    for scenario in &report.scenarios {
        let open = format!(
            "  <testcase name=\"{name}\" classname=\"{class}\" time=\"{time:.3}\"",
            name = escape_xml(&scenario.name),
            class = escape_xml(&scenario.feature),
            time = scenario.duration_ms as f64 / 1000.0,
        );

        let properties = if scenario.known_defect {
            "    <properties><property name=\"known_defect\" value=\"true\" /></properties>\n"
        } else {
            ""
        };

        if scenario.passed() && properties.is_empty() {
            cases.push_str(&open);
            cases.push_str(" />\n");
            continue;
        }

        cases.push_str(&open);
        cases.push_str(">\n");
        cases.push_str(properties);

        if let Some(step) = scenario.failure() {
            let failure_type = match step.status {
                Status::Undefined => "UndefinedStep",
                _ => "StepFailure",
            };
            let message = format!("{} {}", step.line(), step.status.as_str());
            let body = step.error.as_deref().unwrap_or_default();
            cases.push_str(&format!(
                "    <failure message=\"{message}\" type=\"{kind}\">{body}</failure>\n",
                message = escape_xml(&message),
                kind = failure_type,
                body = escape_xml(body),
            ));
        }
        cases.push_str("  </testcase>\n");
    }

    format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<testsuite name=\"{name}\" tests=\"{tests}\" failures=\"{failures}\"{time}>\n{cases}</testsuite>\n",
        name = escape_xml(&report.suite_name),
        tests = report.total,
        failures = report.failed,
        time = time_attr,
        cases = cases,
    )
}

/// Escape XML special characters.
pub fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
