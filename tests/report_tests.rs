use bdd_lab::report::console::format_console_report;
use bdd_lab::report::html::{escape_html, generate_html_report};
use bdd_lab::report::junit::{escape_xml, generate_junit_xml};
use bdd_lab::report::report_model::{TestSuiteReport, format_seconds};
use bdd_lab::report::summary::generate_text_summary;
use bdd_lab::report::{ReportFormat, render};
use bdd_lab::runner::record::{FeatureRecord, RunRecord, ScenarioRecord, Status, StepRecord};

// ============================================================================
// Helper builders
// ============================================================================

fn step(keyword: &str, text: &str, status: Status, error: Option<&str>) -> StepRecord {
    StepRecord {
        keyword: keyword.to_string(),
        text: text.to_string(),
        status,
        duration_ms: 120,
        error: error.map(str::to_string),
        screenshot: None,
    }
}

fn scenario(name: &str, status: Status, steps: Vec<StepRecord>) -> ScenarioRecord {
    ScenarioRecord {
        feature: "Mens page".to_string(),
        name: name.to_string(),
        tags: vec!["mens".to_string()],
        status,
        duration_ms: 3250,
        steps,
        screenshots: vec![format!("reports/screenshots/{}_{}.png", status.as_str(), name)],
        known_defect: false,
    }
}

fn passing(name: &str) -> ScenarioRecord {
    scenario(
        name,
        Status::Passed,
        vec![
            step("Given", "I am on the Mens page", Status::Passed, None),
            step("Then", "the page title should be \"Mens\"", Status::Passed, None),
        ],
    )
}

fn failing(name: &str) -> ScenarioRecord {
    let mut failed = step(
        "Then",
        "search results should display relevant products",
        Status::Failed,
        Some("BUG: search shows 'Page not Found' for \"shirt\""),
    );
    failed.screenshot = Some("reports/screenshots/FAILED_search_step3.png".to_string());
    let mut record = scenario(
        name,
        Status::Failed,
        vec![
            step("Given", "I am on the Mens page", Status::Passed, None),
            step("When", "I search for \"shirt\"", Status::Passed, None),
            failed,
            step("And", "the results should contain <prices>", Status::Skipped, None),
        ],
    );
    record.known_defect = true;
    record
}

fn mixed_record() -> RunRecord {
    let mut record = RunRecord::new("Elite & Google");
    record.duration_ms = 12_345;
    record.features.push(FeatureRecord {
        name: "Mens page".to_string(),
        path: "features/elite_shoppy/05_mens_page.feature".to_string(),
        scenarios: vec![
            passing("TC1 - Test page loads correctly"),
            passing("TC2 - Test navigation menu"),
            failing("TC6 - Test search functionality"),
        ],
    });
    record
}

fn mixed_report() -> TestSuiteReport {
    TestSuiteReport::from_record(&mixed_record())
}

// ============================================================================
// 1. Suite report model
// ============================================================================

#[test]
fn suite_report_from_record_counts() {
    let report = mixed_report();
    assert_eq!(report.total, 3);
    assert_eq!(report.passed, 2);
    assert_eq!(report.failed, 1);
    assert_eq!(report.suite_name, "Elite & Google");
    assert_eq!(report.duration_ms, Some(12_345));
    assert!(!report.all_passed());
    assert!((report.success_rate() - 66.666).abs() < 0.01);
}

#[test]
fn suite_report_collects_every_screenshot() {
    let report = mixed_report();
    let shots = report.screenshots();
    assert_eq!(shots.len(), 4);
    assert!(shots.contains(&"reports/screenshots/FAILED_search_step3.png"));
}

#[test]
fn suite_report_known_defects() {
    let report = mixed_report();
    assert_eq!(report.known_defects().len(), 1);
    assert!(report.unexpected_passes().is_empty());

    let mut record = mixed_record();
    record.features[0].scenarios[0].known_defect = true;
    let report = TestSuiteReport::from_record(&record);
    assert_eq!(report.unexpected_passes().len(), 1);
}

#[test]
fn empty_report_has_zero_rate() {
    let report = TestSuiteReport::from_record(&RunRecord::new("empty"));
    assert_eq!(report.total, 0);
    assert!(report.all_passed());
    assert_eq!(report.success_rate(), 0.0);
}

#[test]
fn format_seconds_two_decimals() {
    assert_eq!(format_seconds(3250), "3.25s");
    assert_eq!(format_seconds(0), "0.00s");
}

// ============================================================================
// 2. Console reporter
// ============================================================================

#[test]
fn console_report_lists_scenarios_and_failures() {
    let output = format_console_report(&mixed_report());
    assert!(output.starts_with("=== Test Suite: Elite & Google ===\n"));
    assert!(output.contains("\u{2713} PASS  Mens page - TC1 - Test page loads correctly (2 steps)"));
    assert!(output.contains("\u{2717} FAIL  Mens page - TC6 - Test search functionality (4 steps) [known defect]"));
    assert!(output.contains("[FAIL] Then search results should display relevant products"));
    assert!(!output.contains("[SKIPPED]"));
    assert!(output.contains("Known defects (1):"));
    assert!(output.contains("=== Results: 2 passed, 1 failed (3 total) in 12.3s ==="));
}

#[test]
fn console_report_shows_undefined_steps() {
    let mut record = mixed_record();
    record.features[0].scenarios.push(scenario(
        "TC9 - Unwritten",
        Status::Failed,
        vec![step("When", "I do something new", Status::Undefined, None)],
    ));
    let output = format_console_report(&TestSuiteReport::from_record(&record));
    assert!(output.contains("[UNDEFINED] When I do something new"));
}

#[test]
fn console_report_flags_unexpected_pass() {
    let mut record = mixed_record();
    record.features[0].scenarios[1].known_defect = true;
    let output = format_console_report(&TestSuiteReport::from_record(&record));
    assert!(output.contains("[known defect, passed unexpectedly]"));
    assert!(output.contains("Unexpected passes (defect may be fixed):\n  - TC2 - Test navigation menu"));
}

#[test]
fn console_report_without_duration() {
    let report = mixed_report();
    let report = TestSuiteReport {
        duration_ms: None,
        ..report
    };
    let output = format_console_report(&report);
    assert!(output.contains("(3 total) ===\n"));
}

// ============================================================================
// 3. Text summary
// ============================================================================

#[test]
fn text_summary_sections() {
    let output = generate_text_summary(&mixed_report(), "chrome");
    assert!(output.contains("ELITE & GOOGLE - TEST EXECUTION SUMMARY"));
    assert!(output.contains("Browser: chrome"));
    assert!(output.contains("Total Scenarios:  3"));
    assert!(output.contains("Success Rate:     66.67%"));
    assert!(output.contains("Screenshots:      4"));
    assert!(output.contains("[OK] Mens page - TC1 - Test page loads correctly (3.25s)"));
    assert!(output.contains("[X] Mens page - TC6 - Test search functionality (3.25s)"));
    assert!(output.contains(
        "    Then search results should display relevant products: BUG: search shows 'Page not Found' for \"shirt\""
    ));
    assert!(output.contains("[!] Mens page - TC6 - Test search functionality (reproduced)"));
    assert!(output.trim_end().ends_with("END OF REPORT\n================================================================================"));
}

#[test]
fn text_summary_omits_empty_sections() {
    let mut record = mixed_record();
    record.features[0].scenarios.truncate(1);
    record.features[0].scenarios[0].screenshots.clear();
    let output = generate_text_summary(&TestSuiteReport::from_record(&record), "firefox");
    assert!(!output.contains("FAILED SCENARIOS"));
    assert!(!output.contains("KNOWN DEFECTS"));
    assert!(!output.contains("\nSCREENSHOTS\n"));
    assert!(output.contains("PASSED SCENARIOS"));
}

// ============================================================================
// 4. HTML reporter
// ============================================================================

#[test]
fn html_report_structure() {
    let html = generate_html_report(&mixed_report());
    assert!(html.starts_with("<!DOCTYPE html>"));
    assert!(html.contains("<title>Elite &amp; Google - Test Report</title>"));
    assert!(html.contains("SOME SCENARIOS FAILED"));
    assert!(html.contains("#f44336"));
    assert!(html.contains("2 passed, 1 failed (3 total, 1 failed steps, 66.67% success) in 12.3s"));
    assert!(html.contains(r#"<span class="badge">known defect</span>"#));
    assert!(html.contains("<li class=\"skipped\">And the results should contain &lt;prices&gt;</li>"));
    assert!(html.contains("&#39;Page not Found&#39; for &quot;shirt&quot;"));
    assert!(html.contains("Screenshot: reports/screenshots/"));
}

#[test]
fn html_report_all_passed_is_green() {
    let mut record = mixed_record();
    record.features[0].scenarios.pop();
    let html = generate_html_report(&TestSuiteReport::from_record(&record));
    assert!(html.contains("ALL SCENARIOS PASSED"));
    assert!(html.contains("#4CAF50"));
    assert!(!html.contains("class=\"error\""));
}

#[test]
fn escape_html_special_characters() {
    assert_eq!(
        escape_html(r#"<a href="x">Women's & Men's</a>"#),
        "&lt;a href=&quot;x&quot;&gt;Women&#39;s &amp; Men&#39;s&lt;/a&gt;"
    );
}

// ============================================================================
// 5. JUnit reporter
// ============================================================================

#[test]
fn junit_xml_structure() {
    let xml = generate_junit_xml(&mixed_report());
    assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n"));
    assert!(xml.contains("<testsuite name=\"Elite &amp; Google\" tests=\"3\" failures=\"1\" time=\"12.345\">"));
    assert!(xml.contains(
        "<testcase name=\"TC1 - Test page loads correctly\" classname=\"Mens page\" time=\"3.250\" />"
    ));
    assert!(xml.contains("<property name=\"known_defect\" value=\"true\" />"));
    assert!(xml.contains(
        "<failure message=\"Then search results should display relevant products failed\" type=\"StepFailure\">"
    ));
    assert!(xml.contains("&apos;Page not Found&apos; for &quot;shirt&quot;"));
    assert!(xml.trim_end().ends_with("</testsuite>"));
}

#[test]
fn junit_undefined_step_type() {
    let mut record = RunRecord::new("suite");
    record.features.push(FeatureRecord {
        name: "Google".to_string(),
        path: "features/google/google_search.feature".to_string(),
        scenarios: vec![scenario(
            "New step",
            Status::Failed,
            vec![step("When", "I do something new", Status::Undefined, Some("undefined step: When I do something new"))],
        )],
    });
    let xml = generate_junit_xml(&TestSuiteReport::from_record(&record));
    assert!(xml.contains("type=\"UndefinedStep\""));
    assert!(xml.contains("message=\"When I do something new undefined\""));
}

#[test]
fn escape_xml_special_characters() {
    assert_eq!(escape_xml("a<b>&\"c'"), "a&lt;b&gt;&amp;&quot;c&apos;");
}

// ============================================================================
// 6. Format dispatch
// ============================================================================

#[test]
fn render_dispatches_by_format() {
    let report = mixed_report();
    assert!(render(&report, ReportFormat::Console, "chrome").starts_with("=== Test Suite"));
    assert!(render(&report, ReportFormat::Text, "chrome").contains("TEST EXECUTION SUMMARY"));
    assert!(render(&report, ReportFormat::Html, "chrome").starts_with("<!DOCTYPE html>"));
    assert!(render(&report, ReportFormat::Junit, "chrome").starts_with("<?xml"));
}

#[test]
fn default_files_per_format() {
    assert_eq!(ReportFormat::Console.default_file(), None);
    assert_eq!(ReportFormat::Text.default_file(), Some("test_summary.txt"));
    assert_eq!(ReportFormat::Html.default_file(), Some("report.html"));
    assert_eq!(ReportFormat::Junit.default_file(), Some("report.xml"));
}

#[test]
fn report_json_round_trip_keeps_scenarios() {
    let report = mixed_report();
    let json = serde_json::to_string(&report).unwrap();
    let back: TestSuiteReport = serde_json::from_str(&json).unwrap();
    assert_eq!(back.total, 3);
    assert_eq!(back.scenarios[2].steps[2].status, Status::Failed);
}
