use std::fs;
use std::path::Path;

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Tag marking a scenario that reproduces a seeded bug.
pub const KNOWN_DEFECT_TAG: &str = "known_defect";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Passed,
    Failed,
    Skipped,
    Undefined,
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Passed => "passed",
            Status::Failed => "failed",
            Status::Skipped => "skipped",
            Status::Undefined => "undefined",
        }
    }
}

// ============================================================================
// Run record: features → scenarios → steps
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepRecord {
    /// Keyword as written in the file (`Given`, `And`, ...).
    pub keyword: String,
    pub text: String,
    pub status: Status,
    pub duration_ms: u128,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub screenshot: Option<String>,
}

impl StepRecord {
    pub fn line(&self) -> String {
        format!("{} {}", self.keyword.trim(), self.text)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioRecord {
    pub feature: String,
    pub name: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub status: Status,
    pub duration_ms: u128,
    #[serde(default)]
    pub steps: Vec<StepRecord>,
    #[serde(default)]
    pub screenshots: Vec<String>,
    #[serde(default)]
    pub known_defect: bool,
}

impl ScenarioRecord {
    pub fn passed(&self) -> bool {
        self.status == Status::Passed
    }

    /// First step that did not pass or skip, with its message.
    pub fn failure(&self) -> Option<&StepRecord> {
        self.steps
            .iter()
            .find(|s| matches!(s.status, Status::Failed | Status::Undefined))
    }

    pub fn error_message(&self) -> Option<String> {
        self.failure().map(|step| match &step.error {
            Some(error) => format!("{}: {}", step.line(), error),
            None => format!("{}: {}", step.line(), step.status.as_str()),
        })
    }

    /// Known defect that no longer reproduces.
    pub fn is_unexpected_pass(&self) -> bool {
        self.known_defect && self.passed()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureRecord {
    pub name: String,
    pub path: String,
    #[serde(default)]
    pub scenarios: Vec<ScenarioRecord>,
}

#[derive(Debug, Error)]
pub enum RecordError {
    #[error("IO error on '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid run record '{path}': {source}")]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Everything one `run` produced. Serialized as the JSON run record and
/// consumed by every reporter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunRecord {
    pub suite_name: String,
    pub started_at: DateTime<Local>,
    pub duration_ms: u128,
    #[serde(default)]
    pub features: Vec<FeatureRecord>,
}

impl RunRecord {
    pub fn new(suite_name: &str) -> Self {
        RunRecord {
            suite_name: suite_name.to_string(),
            started_at: Local::now(),
            duration_ms: 0,
            features: Vec::new(),
        }
    }

    pub fn scenarios(&self) -> impl Iterator<Item = &ScenarioRecord> {
        self.features.iter().flat_map(|f| f.scenarios.iter())
    }

    pub fn total(&self) -> usize {
        self.scenarios().count()
    }

    pub fn passed(&self) -> usize {
        self.scenarios().filter(|s| s.passed()).count()
    }

    pub fn failed(&self) -> usize {
        self.total() - self.passed()
    }

    pub fn all_passed(&self) -> bool {
        self.scenarios().all(|s| s.passed())
    }

    /// Percentage of passed scenarios; 0 for an empty run.
    pub fn success_rate(&self) -> f64 {
        match self.total() {
            0 => 0.0,
            total => self.passed() as f64 / total as f64 * 100.0,
        }
    }

    pub fn known_defects(&self) -> Vec<&ScenarioRecord> {
        self.scenarios().filter(|s| s.known_defect).collect()
    }

    pub fn unexpected_passes(&self) -> Vec<&ScenarioRecord> {
        self.scenarios().filter(|s| s.is_unexpected_pass()).collect()
    }

    pub fn screenshot_count(&self) -> usize {
        self.scenarios()
            .map(|s| {
                s.screenshots.len() + s.steps.iter().filter(|st| st.screenshot.is_some()).count()
            })
            .sum()
    }

    pub fn save(&self, path: &Path) -> Result<(), RecordError> {
        let io_err = |source| RecordError::Io {
            path: path.display().to_string(),
            source,
        };
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
        let json = serde_json::to_string_pretty(self).map_err(|source| RecordError::Json {
            path: path.display().to_string(),
            source,
        })?;
        fs::write(path, json).map_err(io_err)
    }

    pub fn load(path: &Path) -> Result<Self, RecordError> {
        let content = fs::read_to_string(path).map_err(|source| RecordError::Io {
            path: path.display().to_string(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| RecordError::Json {
            path: path.display().to_string(),
            source,
        })
    }
}
