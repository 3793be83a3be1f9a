use std::any::Any;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::time::Instant;

use gherkin::{Step, StepType};
use tracing::{debug, warn};

use crate::element::wait::WaitPolicy;
use crate::runner::RunError;
use crate::runner::feature::{LoadedFeature, ScenarioPlan};
use crate::runner::filter::Selection;
use crate::runner::hooks::{Lifecycle, SessionFactory};
use crate::runner::record::{
    FeatureRecord, KNOWN_DEFECT_TAG, RunRecord, ScenarioRecord, Status, StepRecord,
};
use crate::steps::context::Sites;
use crate::steps::{
    DataTable, ScenarioContext, StepArgs, StepError, StepFailure, StepKind, StepMatch,
    StepRegistry,
};
use crate::trace::logger::TraceLogger;
use crate::trace::trace::{TraceEvent, TraceKind};

/// Keyword a parsed step is dispatched under. `And`/`But` already carry the
/// type of the step they continue.
pub fn step_kind(ty: &StepType) -> StepKind {
    match ty {
        StepType::Given => StepKind::Given,
        StepType::When => StepKind::When,
        StepType::Then => StepKind::Then,
    }
}

fn step_args(step: &Step, matched: StepMatch<'_>) -> StepArgs {
    StepArgs::new(matched.captures)
        .with_table(step.table.as_ref().map(|t| DataTable::from_rows(t.rows.clone())))
        .with_docstring(step.docstring.clone())
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "step handler panicked".to_string()
    }
}

fn new_record(step: &Step, status: Status) -> StepRecord {
    StepRecord {
        keyword: step.keyword.trim().to_string(),
        text: step.value.clone(),
        status,
        duration_ms: 0,
        error: None,
        screenshot: None,
    }
}

/// Match and run one step. Never panics: handler panics are caught and
/// recorded as failures.
pub fn execute_step(registry: &StepRegistry, ctx: &mut ScenarioContext, step: &Step) -> StepRecord {
    let started = Instant::now();
    let kind = step_kind(&step.ty);

    let mut record = match registry.find(kind, &step.value) {
        Ok(Some(matched)) => {
            let definition = matched.definition;
            let args = step_args(step, matched);
            debug!("{} {} -> '{}'", kind, step.value, definition.template());
            let outcome = catch_unwind(AssertUnwindSafe(|| definition.call(ctx, &args)))
                .unwrap_or_else(|payload| Err(StepFailure::Panicked(panic_message(payload))));
            match outcome {
                Ok(()) => new_record(step, Status::Passed),
                Err(failure) => {
                    let mut record = new_record(step, Status::Failed);
                    record.error = Some(failure.to_string());
                    record
                }
            }
        }
        Ok(None) => {
            let mut record = new_record(step, Status::Undefined);
            record.error = Some(format!("undefined step: {} {}", kind, step.value));
            record
        }
        Err(e) => {
            let mut record = new_record(step, Status::Failed);
            record.error = Some(e.to_string());
            record
        }
    };
    record.duration_ms = started.elapsed().as_millis();
    record
}

/// Settings every scenario in a run shares.
#[derive(Debug, Clone)]
pub struct RunSettings {
    pub suite_name: String,
    pub sites: Sites,
    pub policy: WaitPolicy,
}

impl Default for RunSettings {
    fn default() -> Self {
        RunSettings {
            suite_name: "bdd-lab".into(),
            sites: Sites::default(),
            policy: WaitPolicy::default(),
        }
    }
}

/// Runs selected scenarios one after another, each in a fresh session.
pub struct SuiteRunner<'a> {
    registry: &'a StepRegistry,
    factory: &'a mut dyn SessionFactory,
    hooks: Lifecycle,
    settings: RunSettings,
    trace: TraceLogger,
}

impl<'a> SuiteRunner<'a> {
    pub fn new(
        registry: &'a StepRegistry,
        factory: &'a mut dyn SessionFactory,
        hooks: Lifecycle,
        settings: RunSettings,
    ) -> Self {
        SuiteRunner {
            registry,
            factory,
            hooks,
            settings,
            trace: TraceLogger::disabled(),
        }
    }

    pub fn with_trace(mut self, trace: TraceLogger) -> Self {
        self.trace = trace;
        self
    }

    pub fn hooks(&self) -> &Lifecycle {
        &self.hooks
    }

    /// Run every selected scenario. Scenario failures are recorded; only a
    /// failure to obtain a browser session aborts the run.
    pub fn run(
        &mut self,
        features: &[LoadedFeature],
        selection: &Selection,
    ) -> Result<RunRecord, RunError> {
        let started = Instant::now();
        let mut record = RunRecord::new(&self.settings.suite_name);
        self.hooks.before_all()?;

        for feature in features {
            let plans: Vec<ScenarioPlan<'_>> = feature
                .scenarios()
                .into_iter()
                .filter(|plan| selection.includes(plan))
                .collect();
            if plans.is_empty() {
                debug!("no selected scenarios in {}", feature.path.display());
                continue;
            }

            self.hooks.before_feature(feature);
            let mut feature_record = FeatureRecord {
                name: feature.name().to_string(),
                path: feature.path.display().to_string(),
                scenarios: Vec::with_capacity(plans.len()),
            };
            for plan in &plans {
                let scenario = self.run_scenario(plan)?;
                feature_record.scenarios.push(scenario);
            }
            self.hooks.after_feature(&feature_record);
            record.features.push(feature_record);
        }

        record.duration_ms = started.elapsed().as_millis();
        self.hooks.after_all(&record);
        Ok(record)
    }

    fn run_scenario(&mut self, plan: &ScenarioPlan<'_>) -> Result<ScenarioRecord, RunError> {
        let feature_name = plan.feature.name().to_string();
        let mut active = self.hooks.before_scenario(
            &mut *self.factory,
            plan.name(),
            &self.settings.sites,
            self.settings.policy,
        )?;
        self.trace
            .log(&TraceEvent::now(TraceKind::ScenarioStarted, &feature_name, plan.name()));

        let mut steps = Vec::new();
        let mut failed = false;
        for (index, step) in plan.steps().enumerate() {
            let step_record = if failed {
                new_record(step, Status::Skipped)
            } else {
                let mut step_record = execute_step(self.registry, &mut active.context, step);
                self.hooks.after_step(&mut active.context, index, &mut step_record);
                step_record
            };
            if matches!(step_record.status, Status::Failed | Status::Undefined) {
                failed = true;
            }
            self.trace.log(
                &TraceEvent::now(TraceKind::StepFinished, &feature_name, plan.name())
                    .with_step(index, step_record.line())
                    .with_status(step_record.status)
                    .with_duration(step_record.duration_ms)
                    .with_error(step_record.error.as_deref()),
            );
            steps.push(step_record);
        }

        let mut record = ScenarioRecord {
            feature: feature_name,
            name: plan.name().to_string(),
            tags: plan.tags.clone(),
            status: if failed { Status::Failed } else { Status::Passed },
            duration_ms: 0,
            steps,
            screenshots: Vec::new(),
            known_defect: plan.has_tag(KNOWN_DEFECT_TAG),
        };
        self.hooks.after_scenario(active, &mut record);

        if record.is_unexpected_pass() {
            warn!(
                "Known defect scenario '{}' passed; the defect may be fixed",
                record.name
            );
        }
        self.trace.log(
            &TraceEvent::now(TraceKind::ScenarioFinished, &record.feature, &record.name)
                .with_status(record.status)
                .with_duration(record.duration_ms)
                .with_error(record.error_message().as_deref()),
        );
        Ok(record)
    }
}

// ============================================================================
// Dry run: match every step without a browser
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IssueKind {
    Undefined,
    Ambiguous(String),
}

/// A step that would not dispatch to exactly one definition.
#[derive(Debug, Clone)]
pub struct StepIssue {
    pub path: String,
    pub scenario: String,
    pub step: String,
    pub kind: IssueKind,
}

/// Every undefined or ambiguous step in the selected scenarios. Steps
/// shared through a background are reported once per feature.
pub fn dry_run(
    registry: &StepRegistry,
    features: &[LoadedFeature],
    selection: &Selection,
) -> Vec<StepIssue> {
    let mut issues: Vec<StepIssue> = Vec::new();
    for feature in features {
        for plan in feature.scenarios().iter().filter(|p| selection.includes(p)) {
            for step in plan.steps() {
                let kind = step_kind(&step.ty);
                let issue = match registry.find(kind, &step.value) {
                    Ok(Some(_)) => continue,
                    Ok(None) => IssueKind::Undefined,
                    Err(StepError::Ambiguous { patterns, .. }) => {
                        IssueKind::Ambiguous(patterns.join(" | "))
                    }
                    Err(e) => IssueKind::Ambiguous(e.to_string()),
                };
                let text = format!("{} {}", step.keyword.trim(), step.value);
                let path = feature.path.display().to_string();
                let seen = issues.iter().any(|i| i.path == path && i.step == text);
                if !seen {
                    issues.push(StepIssue {
                        path,
                        scenario: plan.name().to_string(),
                        step: text,
                        kind: issue,
                    });
                }
            }
        }
    }
    issues
}
