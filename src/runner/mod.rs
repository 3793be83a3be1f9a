//! Scenario discovery, selection, execution and lifecycle hooks.

pub mod executor;
pub mod feature;
pub mod filter;
pub mod hooks;
pub mod record;
pub mod screenshot;

use thiserror::Error;

use crate::browser::error::BrowserError;

pub use executor::{RunSettings, SuiteRunner, dry_run, execute_step};
pub use feature::{LoadedFeature, ScenarioPlan};
pub use filter::{RunMode, Selection, TagFilter};
pub use hooks::{Lifecycle, SessionFactory, WebDriverFactory};
pub use record::{RunRecord, ScenarioRecord, Status, StepRecord};

/// Failures that stop a run. Scenario and step failures are not errors;
/// they are recorded in the [`RunRecord`].
#[derive(Debug, Error)]
pub enum RunError {
    #[error("could not start a browser session: {0}")]
    SessionUnavailable(#[source] BrowserError),

    #[error(transparent)]
    Feature(#[from] feature::FeatureError),

    #[error(transparent)]
    Filter(#[from] filter::FilterError),

    #[error(transparent)]
    Steps(#[from] crate::steps::StepError),

    #[error(transparent)]
    Record(#[from] record::RecordError),

    #[error("IO error on '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}
