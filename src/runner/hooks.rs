use std::path::{Path, PathBuf};
use std::time::Instant;

use tracing::{info, warn};

use crate::browser::capability::Browser;
use crate::browser::error::BrowserError;
use crate::browser::webdriver::{WebDriverOptions, WebDriverSession};
use crate::element::wait::WaitPolicy;
use crate::runner::RunError;
use crate::runner::feature::LoadedFeature;
use crate::runner::record::{FeatureRecord, RunRecord, ScenarioRecord, Status, StepRecord};
use crate::runner::screenshot;
use crate::steps::ScenarioContext;
use crate::steps::context::Sites;

/// Where browser sessions come from. One session is created per scenario.
pub trait SessionFactory {
    fn create(&mut self) -> Result<Box<dyn Browser>, BrowserError>;
}

/// Opens a new session on a running WebDriver server for every scenario.
pub struct WebDriverFactory {
    options: WebDriverOptions,
}

impl WebDriverFactory {
    pub fn new(options: WebDriverOptions) -> Self {
        WebDriverFactory { options }
    }

    pub fn options(&self) -> &WebDriverOptions {
        &self.options
    }
}

impl SessionFactory for WebDriverFactory {
    fn create(&mut self) -> Result<Box<dyn Browser>, BrowserError> {
        let session = WebDriverSession::launch(&self.options)?;
        Ok(Box::new(session))
    }
}

/// A scenario in flight: its context and when it started.
pub struct ActiveScenario {
    pub context: ScenarioContext,
    pub started: Instant,
}

/// Suite, feature, scenario and step hooks.
///
/// Owns the screenshot directory and the pass/fail bookkeeping that the
/// console output at suite end is built from.
pub struct Lifecycle {
    reports_dir: PathBuf,
    screenshots_dir: PathBuf,
    screenshots: bool,
    passed: Vec<String>,
    failed: Vec<String>,
}

impl Lifecycle {
    pub fn new(reports_dir: impl Into<PathBuf>) -> Self {
        let reports_dir = reports_dir.into();
        let screenshots_dir = reports_dir.join("screenshots");
        Lifecycle {
            reports_dir,
            screenshots_dir,
            screenshots: true,
            passed: Vec::new(),
            failed: Vec::new(),
        }
    }

    /// Turn screenshot capture on or off.
    pub fn with_screenshots(mut self, enabled: bool) -> Self {
        self.screenshots = enabled;
        self
    }

    pub fn reports_dir(&self) -> &Path {
        &self.reports_dir
    }

    pub fn screenshots_dir(&self) -> &Path {
        &self.screenshots_dir
    }

    pub fn passed_scenarios(&self) -> &[String] {
        &self.passed
    }

    pub fn failed_scenarios(&self) -> &[String] {
        &self.failed
    }

    // ---- Suite ----

    pub fn before_all(&mut self) -> Result<(), RunError> {
        info!("Starting test execution");
        for dir in [&self.reports_dir, &self.screenshots_dir] {
            std::fs::create_dir_all(dir).map_err(|source| RunError::Io {
                path: dir.display().to_string(),
                source,
            })?;
        }
        match screenshot::clear_stale(&self.screenshots_dir) {
            Ok(0) => {}
            Ok(n) => info!("Deleted {} old screenshot(s)", n),
            Err(e) => warn!("Could not clean up old screenshots: {}", e),
        }
        self.passed.clear();
        self.failed.clear();
        Ok(())
    }

    pub fn after_all(&mut self, record: &RunRecord) {
        info!(
            "Finished: {} total, {} passed, {} failed, success rate {:.2}%",
            record.total(),
            record.passed(),
            record.failed(),
            record.success_rate()
        );
        for name in &self.failed {
            info!("  failed: {}", name);
        }
    }

    // ---- Feature ----

    pub fn before_feature(&mut self, feature: &LoadedFeature) {
        info!("Feature: {} ({})", feature.name(), feature.path.display());
    }

    pub fn after_feature(&mut self, feature: &FeatureRecord) {
        let passed = feature.scenarios.iter().filter(|s| s.passed()).count();
        info!(
            "Feature '{}' done: {}/{} scenarios passed",
            feature.name,
            passed,
            feature.scenarios.len()
        );
    }

    // ---- Scenario ----

    /// Acquire a session and build the scenario context. A factory failure
    /// is fatal for the whole run.
    pub fn before_scenario(
        &mut self,
        factory: &mut dyn SessionFactory,
        scenario: &str,
        sites: &Sites,
        policy: WaitPolicy,
    ) -> Result<ActiveScenario, RunError> {
        info!("Scenario: {}", scenario);
        let browser = factory.create().map_err(RunError::SessionUnavailable)?;
        let mut context = ScenarioContext::new(scenario, browser, sites.clone(), policy);
        if self.screenshots {
            context = context.with_screenshot_dir(&self.screenshots_dir);
        }
        Ok(ActiveScenario {
            context,
            started: Instant::now(),
        })
    }

    /// Capture the final screenshot, record the outcome and quit the session.
    pub fn after_scenario(&mut self, active: ActiveScenario, record: &mut ScenarioRecord) {
        let ActiveScenario { context, started } = active;
        record.duration_ms = started.elapsed().as_millis();
        let mut browser = context.into_browser();

        if self.screenshots {
            let prefix = if record.passed() { "PASSED" } else { "FAILED" };
            let stem = format!("{}_{}", prefix, screenshot::sanitize(&record.name));
            match screenshot::capture(browser.as_mut(), &self.screenshots_dir, &stem) {
                Ok(path) => record.screenshots.push(path.display().to_string()),
                Err(e) => warn!("Failed to take screenshot for '{}': {}", record.name, e),
            }
        }

        let label = format!("{} - {}", record.feature, record.name);
        if record.passed() {
            info!("Scenario passed: {} ({} ms)", record.name, record.duration_ms);
            self.passed.push(label);
        } else {
            info!("Scenario failed: {} ({} ms)", record.name, record.duration_ms);
            self.failed.push(label);
        }

        if let Err(e) = browser.quit() {
            warn!("Failed to quit browser session: {}", e);
        }
    }

    // ---- Step ----

    /// On failure, capture `FAILED_<scenario>_step<N>` and attach it.
    pub fn after_step(&mut self, context: &mut ScenarioContext, index: usize, step: &mut StepRecord) {
        if step.status != Status::Failed {
            return;
        }
        warn!("Step failed: {}", step.line());
        if !self.screenshots {
            return;
        }
        let stem = format!(
            "FAILED_{}_step{}",
            screenshot::sanitize(context.scenario_name()),
            index + 1
        );
        match screenshot::capture(context.browser(), &self.screenshots_dir, &stem) {
            Ok(path) => step.screenshot = Some(path.display().to_string()),
            Err(e) => warn!("Failed to take step screenshot: {}", e),
        }
    }
}
