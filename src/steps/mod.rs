pub mod args;
pub mod context;
pub mod elite_shoppy;
pub mod generic;
pub mod google;
pub mod pattern;
pub mod registry;

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::browser::error::BrowserError;
use crate::page::PageId;

pub use args::{DataTable, StepArgs};
pub use context::ScenarioContext;
pub use pattern::{Capture, StepPattern};
pub use registry::{StepDefinition, StepMatch, StepRegistry};

/// Keyword a step definition answers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StepKind {
    Given,
    When,
    Then,
    /// Matches steps of every keyword.
    Any,
}

impl StepKind {
    pub fn overlaps(self, other: StepKind) -> bool {
        self == other || self == StepKind::Any || other == StepKind::Any
    }
}

impl fmt::Display for StepKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StepKind::Given => "Given",
            StepKind::When => "When",
            StepKind::Then => "Then",
            StepKind::Any => "Step",
        };
        f.write_str(name)
    }
}

/// Errors from building or querying a [`StepRegistry`].
#[derive(Debug, Error)]
pub enum StepError {
    #[error("invalid step template '{template}': {reason}")]
    InvalidTemplate { template: String, reason: String },

    #[error("step '{template}' is already registered")]
    Duplicate { template: String },

    #[error("step '{step}' is ambiguous between: {}", patterns.join(" | "))]
    Ambiguous { step: String, patterns: Vec<String> },

    #[error("step template regex: {0}")]
    Regex(#[from] regex::Error),
}

/// Why a step handler failed.
#[derive(Debug, Error)]
pub enum StepFailure {
    #[error("{0}")]
    Assertion(String),

    #[error("browser error: {0}")]
    Browser(#[from] BrowserError),

    #[error("scenario context has no value for '{key}'")]
    MissingContext { key: String },

    #[error("scenario context value '{key}' is not a {expected}")]
    WrongType { key: String, expected: &'static str },

    #[error("{0} was used before it was opened in this scenario")]
    PageNotOpened(PageId),

    #[error("bad step argument: {0}")]
    BadArgument(String),

    #[error("step panicked: {0}")]
    Panicked(String),
}

pub type StepResult = Result<(), StepFailure>;

/// Fail the step with `message` unless `condition` holds.
pub fn ensure(condition: bool, message: impl Into<String>) -> StepResult {
    if condition {
        Ok(())
    } else {
        Err(StepFailure::Assertion(message.into()))
    }
}

/// Registry with every bundled step library.
pub fn default_registry() -> Result<StepRegistry, StepError> {
    let mut registry = StepRegistry::new();
    elite_shoppy::register(&mut registry)?;
    google::register(&mut registry)?;
    generic::register(&mut registry)?;
    Ok(registry)
}
