use serde::{Deserialize, Serialize};

use crate::runner::record::{RunRecord, ScenarioRecord};

// ============================================================================
// Test suite report: flattened view of a run record
// ============================================================================

/// Aggregated report for one run.
///
/// Built from a [`RunRecord`] via `from_record()`. Consumed by the console,
/// text summary, HTML and JUnit reporters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestSuiteReport {
    pub suite_name: String,

    /// `YYYY-mm-dd HH:MM:SS` local time the run started.
    pub started_at: String,

    pub total: usize,
    pub passed: usize,
    pub failed: usize,

    /// Total execution duration in milliseconds (optional)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u128>,

    /// Scenarios in run order.
    pub scenarios: Vec<ScenarioRecord>,
}

impl TestSuiteReport {
    pub fn from_record(record: &RunRecord) -> Self {
        let scenarios: Vec<ScenarioRecord> = record.scenarios().cloned().collect();
        let total = scenarios.len();
        let passed = scenarios.iter().filter(|s| s.passed()).count();
        Self {
            suite_name: record.suite_name.clone(),
            started_at: record.started_at.format("%Y-%m-%d %H:%M:%S").to_string(),
            total,
            passed,
            failed: total - passed,
            duration_ms: Some(record.duration_ms),
            scenarios,
        }
    }

    /// Set the total execution duration.
    pub fn with_duration(mut self, duration_ms: u128) -> Self {
        self.duration_ms = Some(duration_ms);
        self
    }

    /// Whether all scenarios passed.
    pub fn all_passed(&self) -> bool {
        self.failed == 0
    }

    pub fn success_rate(&self) -> f64 {
        match self.total {
            0 => 0.0,
            total => self.passed as f64 / total as f64 * 100.0,
        }
    }

    /// Scenarios tagged as known defects, whatever their outcome.
    pub fn known_defects(&self) -> Vec<&ScenarioRecord> {
        self.scenarios.iter().filter(|s| s.known_defect).collect()
    }

    pub fn unexpected_passes(&self) -> Vec<&ScenarioRecord> {
        self.scenarios
            .iter()
            .filter(|s| s.is_unexpected_pass())
            .collect()
    }

    pub fn passed_scenarios(&self) -> impl Iterator<Item = &ScenarioRecord> {
        self.scenarios.iter().filter(|s| s.passed())
    }

    pub fn failed_scenarios(&self) -> impl Iterator<Item = &ScenarioRecord> {
        self.scenarios.iter().filter(|s| !s.passed())
    }

    /// Every screenshot path, scenario-level and step-level.
    pub fn screenshots(&self) -> Vec<&str> {
        let mut paths = Vec::new();
        for scenario in &self.scenarios {
            for step in &scenario.steps {
                if let Some(path) = &step.screenshot {
                    paths.push(path.as_str());
                }
            }
            paths.extend(scenario.screenshots.iter().map(String::as_str));
        }
        paths
    }
}

/// Seconds with two decimals, e.g. `3.25s`.
pub fn format_seconds(ms: u128) -> String {
    format!("{:.2}s", ms as f64 / 1000.0)
}
