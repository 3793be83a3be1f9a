use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::runner::feature::ScenarioPlan;
use crate::runner::record::KNOWN_DEFECT_TAG;

#[derive(Debug, Error, PartialEq)]
pub enum FilterError {
    #[error("empty tag expression")]
    Empty,

    #[error("invalid tag term '{0}': expected @tag, ~@tag or not @tag")]
    InvalidTerm(String),

    #[error("--mode area requires --area NAME")]
    MissingArea,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct TagTerm {
    tag: String,
    negated: bool,
}

impl TagTerm {
    fn parse(raw: &str) -> Result<Self, FilterError> {
        let raw = raw.trim();
        let (negated, rest) = if let Some(rest) = raw.strip_prefix('~') {
            (true, rest.trim_start())
        } else if let Some(rest) = raw.strip_prefix("not ") {
            (true, rest.trim_start())
        } else {
            (false, raw)
        };
        match rest.strip_prefix('@') {
            Some(tag) if !tag.is_empty() && !tag.contains(char::is_whitespace) => Ok(TagTerm {
                tag: tag.to_string(),
                negated,
            }),
            _ => Err(FilterError::InvalidTerm(raw.to_string())),
        }
    }

    fn matches(&self, tags: &[String]) -> bool {
        tags.iter().any(|t| *t == self.tag) != self.negated
    }
}

impl fmt::Display for TagTerm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.negated {
            write!(f, "~@{}", self.tag)
        } else {
            write!(f, "@{}", self.tag)
        }
    }
}

/// Behave-style tag selection: each expression is a comma-separated OR of
/// terms, and all expressions must hold.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagFilter {
    clauses: Vec<Vec<TagTerm>>,
}

impl TagFilter {
    pub fn parse<S: AsRef<str>>(expressions: &[S]) -> Result<Self, FilterError> {
        let mut filter = TagFilter::default();
        for expression in expressions {
            filter.push(expression.as_ref())?;
        }
        Ok(filter)
    }

    /// AND one more expression onto the filter.
    pub fn push(&mut self, expression: &str) -> Result<(), FilterError> {
        if expression.trim().is_empty() {
            return Err(FilterError::Empty);
        }
        let clause = expression
            .split(',')
            .map(TagTerm::parse)
            .collect::<Result<Vec<_>, _>>()?;
        self.clauses.push(clause);
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    /// `tags` are given without the leading `@`.
    pub fn matches(&self, tags: &[String]) -> bool {
        self.clauses
            .iter()
            .all(|clause| clause.iter().any(|term| term.matches(tags)))
    }
}

impl fmt::Display for TagFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let clauses: Vec<String> = self
            .clauses
            .iter()
            .map(|c| {
                c.iter()
                    .map(|t| t.to_string())
                    .collect::<Vec<_>>()
                    .join(",")
            })
            .collect();
        write!(f, "{}", clauses.join(" and "))
    }
}

/// Which scenarios a run selects before tag filtering.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum RunMode {
    #[default]
    All,
    /// Only feature files whose path contains the area name.
    Area,
    /// Everything except known defects.
    Passed,
    /// Only known defects.
    Failed,
}

/// Run mode, optional area and tag filter combined.
#[derive(Debug, Clone, Default)]
pub struct Selection {
    pub area: Option<String>,
    pub tags: TagFilter,
}

impl Selection {
    pub fn new(mode: RunMode, area: Option<&str>, tags: TagFilter) -> Result<Self, FilterError> {
        let mut tags = tags;
        let area = match mode {
            RunMode::Area => Some(area.ok_or(FilterError::MissingArea)?.to_lowercase()),
            _ => None,
        };
        match mode {
            RunMode::Passed => tags.push(&format!("~@{}", KNOWN_DEFECT_TAG))?,
            RunMode::Failed => tags.push(&format!("@{}", KNOWN_DEFECT_TAG))?,
            RunMode::All | RunMode::Area => {}
        }
        Ok(Selection { area, tags })
    }

    pub fn includes_feature(&self, path: &Path) -> bool {
        match &self.area {
            Some(area) => path.to_string_lossy().to_lowercase().contains(area),
            None => true,
        }
    }

    pub fn includes(&self, plan: &ScenarioPlan<'_>) -> bool {
        self.includes_feature(&plan.feature.path) && self.tags.matches(&plan.tags)
    }
}
