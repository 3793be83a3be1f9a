use std::collections::BTreeMap;
use std::path::Path;

use tracing::info;

use crate::cli::config::{AppConfig, RunArgs};
use crate::report::{ReportFormat, TestSuiteReport, render};
use crate::runner::executor::{IssueKind, RunSettings, SuiteRunner, dry_run};
use crate::runner::feature;
use crate::runner::filter::{RunMode, Selection, TagFilter};
use crate::runner::hooks::{Lifecycle, SessionFactory, WebDriverFactory};
use crate::runner::record::RunRecord;
use crate::runner::RunError;
use crate::steps::{StepKind, StepRegistry, default_registry};
use crate::trace::logger::TraceLogger;

// ============================================================================
// run subcommand
// ============================================================================

/// Run the selected scenarios and return whether all passed.
pub fn cmd_run(args: &RunArgs, config: &AppConfig) -> Result<bool, Box<dyn std::error::Error>> {
    let mut config = config.clone();
    config.apply_run_args(args);
    config.validate()?;

    let mut factory = WebDriverFactory::new(config.browser.to_options());
    let record = run_suite(&config, args.mode, args.area.as_deref(), &args.tags, &mut factory)?;

    let json_path = args
        .json
        .as_ref()
        .map(|p| Path::new(p).to_path_buf())
        .unwrap_or_else(|| config.reports.json_path());
    record.save(&json_path)?;
    info!("Run record written to {}", json_path.display());

    let report = TestSuiteReport::from_record(&record);
    let summary_path = config.reports.summary_path();
    std::fs::write(
        &summary_path,
        render(&report, ReportFormat::Text, &config.browser.name),
    )?;
    info!("Text summary written to {}", summary_path.display());

    emit(
        &report,
        config.run.format,
        args.output.as_deref(),
        &config,
    )?;

    Ok(record.all_passed())
}

/// Load, select and run scenarios with sessions from `factory`.
pub fn run_suite(
    config: &AppConfig,
    mode: RunMode,
    area: Option<&str>,
    tags: &[String],
    factory: &mut dyn SessionFactory,
) -> Result<RunRecord, RunError> {
    let selection = Selection::new(mode, area, TagFilter::parse(tags)?)?;
    let features = feature::load(Path::new(&config.run.features))?;
    let registry = default_registry()?;

    info!(
        "Running {} feature file(s) from {} with {} step definitions",
        features.len(),
        config.run.features,
        registry.len()
    );

    let settings = RunSettings {
        suite_name: config.run.suite_name.clone(),
        sites: config.sites.clone(),
        policy: config.timeouts.to_policy(),
    };
    let hooks = Lifecycle::new(&config.reports.dir).with_screenshots(config.reports.screenshots);
    let trace = match config.reports.trace_path() {
        Some(path) => TraceLogger::new(&path),
        None => TraceLogger::disabled(),
    };

    let mut runner = SuiteRunner::new(&registry, factory, hooks, settings).with_trace(trace);
    runner.run(&features, &selection)
}

// ============================================================================
// check subcommand
// ============================================================================

/// Dry run. Returns whether every step dispatches to exactly one definition.
pub fn cmd_check(
    features_path: Option<&str>,
    tags: &[String],
    config: &AppConfig,
) -> Result<bool, Box<dyn std::error::Error>> {
    let root = features_path.unwrap_or(&config.run.features);
    let features = feature::load(Path::new(root))?;
    let registry = default_registry()?;
    let selection = Selection::new(RunMode::All, None, TagFilter::parse(tags)?)?;

    let issues = dry_run(&registry, &features, &selection);
    let scenarios: usize = features
        .iter()
        .map(|f| f.scenarios().iter().filter(|p| selection.includes(p)).count())
        .sum();

    for issue in &issues {
        match &issue.kind {
            IssueKind::Undefined => {
                println!("UNDEFINED  {}: {} ({})", issue.path, issue.step, issue.scenario)
            }
            IssueKind::Ambiguous(patterns) => println!(
                "AMBIGUOUS  {}: {} ({}) matches {}",
                issue.path, issue.step, issue.scenario, patterns
            ),
        }
    }
    println!(
        "Checked {} scenario(s) in {} feature file(s): {} issue(s)",
        scenarios,
        features.len(),
        issues.len()
    );
    Ok(issues.is_empty())
}

// ============================================================================
// steps subcommand
// ============================================================================

/// Registered templates grouped by keyword, in registration order.
pub fn format_step_list(registry: &StepRegistry) -> String {
    let mut grouped: BTreeMap<u8, (StepKind, Vec<&str>)> = BTreeMap::new();
    for definition in registry.definitions() {
        let order = match definition.kind {
            StepKind::Given => 0,
            StepKind::When => 1,
            StepKind::Then => 2,
            StepKind::Any => 3,
        };
        grouped
            .entry(order)
            .or_insert_with(|| (definition.kind, Vec::new()))
            .1
            .push(definition.template());
    }

    let mut out = String::new();
    for (kind, templates) in grouped.values() {
        out.push_str(&format!("{} ({}):\n", kind, templates.len()));
        for template in templates {
            out.push_str(&format!("  {}\n", template));
        }
        out.push('\n');
    }
    out.push_str(&format!("{} step definitions\n", registry.len()));
    out
}

pub fn cmd_steps() -> Result<(), Box<dyn std::error::Error>> {
    let registry = default_registry()?;
    print!("{}", format_step_list(&registry));
    Ok(())
}

// ============================================================================
// report subcommand
// ============================================================================

pub fn cmd_report(
    json: &str,
    format: ReportFormat,
    output: Option<&str>,
    config: &AppConfig,
) -> Result<bool, Box<dyn std::error::Error>> {
    let record = RunRecord::load(Path::new(json))?;
    let report = TestSuiteReport::from_record(&record);
    emit(&report, format, output, config)?;
    Ok(report.all_passed())
}

// ============================================================================
// Helpers
// ============================================================================

/// Print console output, write file formats to `output` or the reports dir.
fn emit(
    report: &TestSuiteReport,
    format: ReportFormat,
    output: Option<&str>,
    config: &AppConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let content = render(report, format, &config.browser.name);
    let target = match (output, format.default_file()) {
        (Some(path), _) => Some(Path::new(path).to_path_buf()),
        (None, Some(file)) => Some(Path::new(&config.reports.dir).join(file)),
        (None, None) => None,
    };
    match target {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(&path, &content)?;
            println!("Report written to {}", path.display());
        }
        None => print!("{}", content),
    }
    Ok(())
}
