mod common;

use std::fs;
use std::time::Duration;

use bdd_lab::cli::commands::{cmd_check, cmd_report, format_step_list, run_suite};
use bdd_lab::cli::config::{
    AppConfig, Cli, Commands, ConfigError, RunArgs, TimeoutsConfig, load_config,
};
use bdd_lab::report::ReportFormat;
use bdd_lab::runner::{RunError, RunMode, Status};
use bdd_lab::steps::{StepKind, StepRegistry, default_registry};
use clap::Parser;

use crate::common::fake_browser::{FakeBrowser, FakeFactory};
use crate::common::sites;

const TITLE_FEATURE: &str = r#"Feature: Title checks

  @smoke
  Scenario: Title matches
    Then the page title should be "Mens"

  @known_defect
  Scenario: Title is wrong
    Then the page title should be "Womens"
"#;

// ============================================================================
// CLI Argument Parsing Tests
// ============================================================================

#[test]
fn cli_parse_run_defaults() {
    let cli = Cli::parse_from(["bdd-lab", "run"]);
    match cli.command {
        Commands::Run(args) => {
            assert_eq!(args.mode, RunMode::All);
            assert!(args.features.is_none());
            assert!(args.tags.is_empty());
            assert!(args.format.is_none());
            assert!(!args.headless);
        }
        _ => panic!("Expected Run command"),
    }
    assert_eq!(cli.verbose, 0);
}

#[test]
fn cli_parse_run_all_args() {
    let cli = Cli::parse_from([
        "bdd-lab",
        "run",
        "--features",
        "features/google",
        "--mode",
        "area",
        "--area",
        "google",
        "--tags",
        "@smoke,@regression",
        "--tags",
        "~@slow",
        "--format",
        "junit",
        "-o",
        "out.xml",
        "--webdriver-url",
        "http://grid:4444",
        "--headless",
        "-vv",
    ]);
    assert_eq!(cli.verbose, 2);
    match cli.command {
        Commands::Run(args) => {
            assert_eq!(args.features.as_deref(), Some("features/google"));
            assert_eq!(args.mode, RunMode::Area);
            assert_eq!(args.area.as_deref(), Some("google"));
            assert_eq!(args.tags, vec!["@smoke,@regression", "~@slow"]);
            assert_eq!(args.format, Some(ReportFormat::Junit));
            assert_eq!(args.output.as_deref(), Some("out.xml"));
            assert_eq!(args.webdriver_url.as_deref(), Some("http://grid:4444"));
            assert!(args.headless);
        }
        _ => panic!("Expected Run command"),
    }
}

#[test]
fn cli_parse_report_and_check() {
    let cli = Cli::parse_from(["bdd-lab", "report", "--json", "reports/run.json", "--format", "html"]);
    match cli.command {
        Commands::Report { json, format, output } => {
            assert_eq!(json, "reports/run.json");
            assert_eq!(format, ReportFormat::Html);
            assert!(output.is_none());
        }
        _ => panic!("Expected Report command"),
    }

    let cli = Cli::parse_from(["bdd-lab", "check", "--tags", "@google", "--config", "ci.yaml"]);
    assert_eq!(cli.config.as_deref(), Some("ci.yaml"));
    assert!(matches!(cli.command, Commands::Check { features: None, ref tags } if tags == &["@google"]));

    assert!(matches!(Cli::parse_from(["bdd-lab", "steps"]).command, Commands::Steps));
}

#[test]
fn cli_rejects_unknown_mode() {
    assert!(Cli::try_parse_from(["bdd-lab", "run", "--mode", "flaky"]).is_err());
}

// ============================================================================
// Config Tests
// ============================================================================

#[test]
fn config_defaults() {
    let config = AppConfig::default();
    assert_eq!(config.browser.name, "chrome");
    assert_eq!(config.browser.webdriver_url, "http://localhost:9515");
    assert_eq!(config.browser.window_width, 1920);
    assert!(config.browser.args.contains(&"--disable-notifications".to_string()));
    assert_eq!(config.reports.dir, "reports");
    assert!(config.reports.screenshots);
    assert_eq!(config.run.features, "features");
    assert_eq!(config.run.format, ReportFormat::Console);
    assert!(config.validate().is_ok());
}

#[test]
fn config_validate_rejects_bad_values() {
    let mut config = AppConfig::default();
    config.browser.name = "safari".into();
    assert_eq!(
        config.validate(),
        Err(ConfigError::UnsupportedBrowser("safari".into()))
    );

    let mut config = AppConfig::default();
    config.browser.window_height = 0;
    assert!(matches!(config.validate(), Err(ConfigError::WindowSize { .. })));

    let mut config = AppConfig::default();
    config.browser.webdriver_url = "localhost:9515".into();
    assert!(matches!(config.validate(), Err(ConfigError::WebDriverUrl(_))));

    let mut config = AppConfig::default();
    config.browser.name = "Firefox".into();
    assert!(config.validate().is_ok());
}

#[test]
fn config_apply_run_args_overrides_file_values() {
    let mut config = AppConfig::default();
    let args = RunArgs {
        features: Some("features/google".into()),
        format: Some(ReportFormat::Html),
        webdriver_url: Some("http://grid:4444".into()),
        headless: true,
        ..RunArgs::default()
    };
    config.apply_run_args(&args);
    assert_eq!(config.run.features, "features/google");
    assert_eq!(config.run.format, ReportFormat::Html);
    assert_eq!(config.browser.webdriver_url, "http://grid:4444");
    assert!(config.browser.headless);

    let options = config.browser.to_options();
    assert!(options.headless);
    assert_eq!(options.command_timeout, Duration::from_secs(60));
}

#[test]
fn config_timeouts_to_policy() {
    let timeouts = TimeoutsConfig {
        element: 1.5,
        page_load: -3.0,
        settle: f64::NAN,
        probe: 0.25,
    };
    let policy = timeouts.to_policy();
    assert_eq!(policy.element, Duration::from_millis(1500));
    assert_eq!(policy.page_load, Duration::ZERO);
    assert_eq!(policy.settle, Duration::ZERO);
    assert_eq!(policy.probe, Duration::from_millis(250));
}

#[test]
fn config_report_paths_resolve_against_dir() {
    let mut config = AppConfig::default();
    config.reports.dir = "out".into();
    assert_eq!(config.reports.json_path(), std::path::PathBuf::from("out/run.json"));
    assert_eq!(
        config.reports.summary_path(),
        std::path::PathBuf::from("out/test_summary.txt")
    );
    assert!(config.reports.trace_path().is_none());
    config.reports.trace = Some("/tmp/trace.jsonl".into());
    assert_eq!(
        config.reports.trace_path(),
        Some(std::path::PathBuf::from("/tmp/trace.jsonl"))
    );
}

#[test]
fn load_config_from_yaml() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bdd-lab.yaml");
    fs::write(
        &path,
        r#"
browser:
  name: firefox
  headless: true
timeouts:
  element: 3
sites:
  google_url: "https://www.google.test"
reports:
  trace: trace.jsonl
run:
  format: html
"#,
    )
    .unwrap();

    let config = load_config(Some(path.to_str().unwrap()));
    assert_eq!(config.browser.name, "firefox");
    assert!(config.browser.headless);
    assert_eq!(config.browser.window_width, 1920);
    assert_eq!(config.timeouts.element, 3.0);
    assert_eq!(config.timeouts.page_load, 20.0);
    assert_eq!(config.sites.google_url, "https://www.google.test");
    assert!(config.sites.elite_home_url.contains("netlify"));
    assert_eq!(config.reports.trace.as_deref(), Some("trace.jsonl"));
    assert_eq!(config.run.format, ReportFormat::Html);
}

#[test]
fn load_config_missing_or_malformed_gives_defaults() {
    let config = load_config(Some("/nonexistent/bdd-lab.yaml"));
    assert_eq!(config.browser.name, "chrome");

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.yaml");
    fs::write(&path, "browser: [not, a, map").unwrap();
    let config = load_config(Some(path.to_str().unwrap()));
    assert_eq!(config.run.features, "features");
}

// ============================================================================
// Command Tests
// ============================================================================

fn config_for(dir: &std::path::Path) -> AppConfig {
    let mut config = AppConfig::default();
    config.run.features = dir.join("features").display().to_string();
    config.run.suite_name = "cli suite".into();
    config.reports.dir = dir.join("reports").display().to_string();
    config.reports.screenshots = false;
    config.sites = sites();
    config.timeouts = TimeoutsConfig {
        element: 0.0,
        page_load: 0.0,
        settle: 0.0,
        probe: 0.0,
    };
    config
}

fn write_features(dir: &std::path::Path) {
    fs::create_dir_all(dir.join("features")).unwrap();
    fs::write(dir.join("features").join("title.feature"), TITLE_FEATURE).unwrap();
}

#[test]
fn format_step_list_groups_by_keyword() {
    let mut registry = StepRegistry::new();
    registry.then(&["the page title should be {string}"], |_, _| Ok(())).unwrap();
    registry.given(&["I am on the home page"], |_, _| Ok(())).unwrap();
    registry.any(&["I take a screenshot named {string}"], |_, _| Ok(())).unwrap();

    let listing = format_step_list(&registry);
    let given = listing.find("Given (1):").unwrap();
    let then = listing.find("Then (1):").unwrap();
    let any = listing.find("Step (1):").unwrap();
    assert!(given < then && then < any);
    assert!(listing.contains("  the page title should be {string}\n"));
    assert!(listing.ends_with("3 step definitions\n"));
    assert!(!listing.contains("When ("));
}

#[test]
fn format_step_list_default_registry() {
    let registry = default_registry().unwrap();
    let listing = format_step_list(&registry);
    for kind in [StepKind::Given, StepKind::When, StepKind::Then, StepKind::Any] {
        assert!(listing.contains(&format!("{} (", kind)), "missing {}", kind);
    }
    assert!(listing.ends_with(&format!("{} step definitions\n", registry.len())));
}

#[test]
fn run_suite_with_fake_sessions() {
    let dir = tempfile::tempdir().unwrap();
    write_features(dir.path());
    let config = config_for(dir.path());
    let mut factory = FakeFactory::new(|| FakeBrowser::new().titled("Mens"));

    let record = run_suite(&config, RunMode::All, None, &[], &mut factory).unwrap();
    assert_eq!(record.suite_name, "cli suite");
    assert_eq!(record.total(), 2);
    assert_eq!(record.passed(), 1);
    let failed = record.scenarios().find(|s| !s.passed()).unwrap();
    assert!(failed.known_defect);
    assert_eq!(failed.steps[0].status, Status::Failed);
    assert_eq!(
        failed.steps[0].error.as_deref(),
        Some("page title is 'Mens', expected 'Womens'")
    );
    assert!(factory.sessions.iter().all(FakeBrowser::is_quit));
}

#[test]
fn run_suite_passed_mode_skips_known_defects() {
    let dir = tempfile::tempdir().unwrap();
    write_features(dir.path());
    let config = config_for(dir.path());
    let mut factory = FakeFactory::new(|| FakeBrowser::new().titled("Mens"));

    let record = run_suite(&config, RunMode::Passed, None, &[], &mut factory).unwrap();
    assert_eq!(record.total(), 1);
    assert!(record.all_passed());
    assert_eq!(factory.sessions.len(), 1);
}

#[test]
fn run_suite_rejects_bad_selection_before_running() {
    let dir = tempfile::tempdir().unwrap();
    write_features(dir.path());
    let config = config_for(dir.path());
    let mut factory = FakeFactory::new(FakeBrowser::new);

    let err = run_suite(&config, RunMode::Area, None, &[], &mut factory).unwrap_err();
    assert!(matches!(err, RunError::Filter(_)));
    let err = run_suite(&config, RunMode::All, None, &["smoke".to_string()], &mut factory).unwrap_err();
    assert!(matches!(err, RunError::Filter(_)));
    assert!(factory.sessions.is_empty());
}

#[test]
fn run_suite_missing_features_dir() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_for(dir.path());
    let mut factory = FakeFactory::new(FakeBrowser::new);
    let err = run_suite(&config, RunMode::All, None, &[], &mut factory).unwrap_err();
    assert!(matches!(err, RunError::Feature(_)));
}

#[test]
fn cmd_check_flags_undefined_steps() {
    let dir = tempfile::tempdir().unwrap();
    write_features(dir.path());
    let config = config_for(dir.path());
    assert!(cmd_check(None, &[], &config).unwrap());

    let extra = dir.path().join("extra.feature");
    fs::write(
        &extra,
        "Feature: Extra\n\n  Scenario: New step\n    When I do something nobody wrote\n",
    )
    .unwrap();
    assert!(!cmd_check(extra.to_str(), &[], &config).unwrap());
}

#[test]
fn cmd_check_bundled_features() {
    let config = AppConfig::default();
    assert!(cmd_check(Some("features"), &[], &config).unwrap());
}

#[test]
fn cmd_report_renders_saved_record() {
    let dir = tempfile::tempdir().unwrap();
    write_features(dir.path());
    let config = config_for(dir.path());
    let mut factory = FakeFactory::new(|| FakeBrowser::new().titled("Mens"));
    let record = run_suite(&config, RunMode::All, None, &[], &mut factory).unwrap();
    let json = dir.path().join("run.json");
    record.save(&json).unwrap();

    let html = dir.path().join("out").join("report.html");
    let all_passed = cmd_report(
        json.to_str().unwrap(),
        ReportFormat::Html,
        html.to_str(),
        &config,
    )
    .unwrap();
    assert!(!all_passed);
    let content = fs::read_to_string(&html).unwrap();
    assert!(content.contains("SOME SCENARIOS FAILED"));
    assert!(content.contains("Title is wrong"));

    cmd_report(json.to_str().unwrap(), ReportFormat::Junit, None, &config).unwrap();
    let xml = fs::read_to_string(dir.path().join("reports").join("report.xml")).unwrap();
    assert!(xml.contains("tests=\"2\" failures=\"1\""));
}

#[test]
fn cmd_report_missing_record_is_an_error() {
    let config = AppConfig::default();
    assert!(cmd_report("/nonexistent/run.json", ReportFormat::Console, None, &config).is_err());
}
