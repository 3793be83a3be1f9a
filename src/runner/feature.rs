use std::fs;
use std::path::{Path, PathBuf};

use gherkin::{Feature, GherkinEnv, Scenario, Step};
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Error)]
pub enum FeatureError {
    #[error("feature path '{0}' does not exist")]
    NotFound(String),

    #[error("IO error reading '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse '{path}': {source}")]
    Parse {
        path: String,
        #[source]
        source: gherkin::ParseFileError,
    },
}

/// A parsed `.feature` file and where it came from.
#[derive(Debug)]
pub struct LoadedFeature {
    pub path: PathBuf,
    pub feature: Feature,
}

impl LoadedFeature {
    pub fn name(&self) -> &str {
        &self.feature.name
    }

    pub fn tags(&self) -> Vec<String> {
        normalize_tags(&self.feature.tags)
    }

    /// Every scenario in file order, rules flattened, with the background
    /// steps it inherits and the tags it carries (feature, rule, own).
    pub fn scenarios(&self) -> Vec<ScenarioPlan<'_>> {
        let feature_tags = self.tags();
        let feature_background: Vec<&Step> = self
            .feature
            .background
            .as_ref()
            .map(|b| b.steps.iter().collect())
            .unwrap_or_default();

        let mut plans = Vec::new();
        for scenario in &self.feature.scenarios {
            plans.push(ScenarioPlan::new(
                self,
                scenario,
                feature_background.clone(),
                &feature_tags,
            ));
        }
        for rule in &self.feature.rules {
            let mut background = feature_background.clone();
            if let Some(rule_background) = &rule.background {
                background.extend(rule_background.steps.iter());
            }
            let mut tags = feature_tags.clone();
            tags.extend(normalize_tags(&rule.tags));
            for scenario in &rule.scenarios {
                plans.push(ScenarioPlan::new(self, scenario, background.clone(), &tags));
            }
        }
        plans
    }
}

/// One runnable scenario.
#[derive(Debug, Clone)]
pub struct ScenarioPlan<'f> {
    pub feature: &'f LoadedFeature,
    pub scenario: &'f Scenario,
    pub background: Vec<&'f Step>,
    pub tags: Vec<String>,
}

impl<'f> ScenarioPlan<'f> {
    fn new(
        feature: &'f LoadedFeature,
        scenario: &'f Scenario,
        background: Vec<&'f Step>,
        inherited: &[String],
    ) -> Self {
        let mut tags = inherited.to_vec();
        for tag in normalize_tags(&scenario.tags) {
            if !tags.contains(&tag) {
                tags.push(tag);
            }
        }
        if !scenario.examples.is_empty() {
            warn!(
                "Scenario '{}' has Examples; outline placeholders are not expanded",
                scenario.name
            );
        }
        ScenarioPlan {
            feature,
            scenario,
            background,
            tags,
        }
    }

    pub fn name(&self) -> &str {
        &self.scenario.name
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    /// Background steps followed by the scenario's own.
    pub fn steps(&self) -> impl Iterator<Item = &'f Step> + '_ {
        self.background
            .iter()
            .copied()
            .chain(self.scenario.steps.iter())
    }
}

/// Tags without their leading `@`.
pub fn normalize_tags(tags: &[String]) -> Vec<String> {
    tags.iter()
        .map(|t| t.trim().trim_start_matches('@').to_string())
        .filter(|t| !t.is_empty())
        .collect()
}

/// `.feature` files under `root` (or `root` itself), sorted by path.
pub fn discover(root: &Path) -> Result<Vec<PathBuf>, FeatureError> {
    if !root.exists() {
        return Err(FeatureError::NotFound(root.display().to_string()));
    }
    if root.is_file() {
        return Ok(vec![root.to_path_buf()]);
    }
    let mut found = Vec::new();
    walk(root, &mut found)?;
    found.sort();
    Ok(found)
}

fn walk(dir: &Path, found: &mut Vec<PathBuf>) -> Result<(), FeatureError> {
    let entries = fs::read_dir(dir).map_err(|source| FeatureError::Io {
        path: dir.display().to_string(),
        source,
    })?;
    for entry in entries {
        let path = entry
            .map_err(|source| FeatureError::Io {
                path: dir.display().to_string(),
                source,
            })?
            .path();
        if path.is_dir() {
            walk(&path, found)?;
        } else if path.extension().and_then(|e| e.to_str()) == Some("feature") {
            found.push(path);
        }
    }
    Ok(())
}

pub fn parse(path: &Path) -> Result<LoadedFeature, FeatureError> {
    let feature =
        Feature::parse_path(path, GherkinEnv::default()).map_err(|source| FeatureError::Parse {
            path: path.display().to_string(),
            source,
        })?;
    debug!("parsed {} ({} scenarios)", path.display(), feature.scenarios.len());
    Ok(LoadedFeature {
        path: path.to_path_buf(),
        feature,
    })
}

/// Discover and parse every feature under `root`.
pub fn load(root: &Path) -> Result<Vec<LoadedFeature>, FeatureError> {
    discover(root)?.iter().map(|path| parse(path)).collect()
}
