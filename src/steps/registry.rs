use std::rc::Rc;

use tracing::debug;

use crate::steps::args::StepArgs;
use crate::steps::context::ScenarioContext;
use crate::steps::pattern::{Capture, StepPattern};
use crate::steps::{StepError, StepKind, StepResult};

/// Handler signature shared by every step definition.
pub type StepHandler = dyn Fn(&mut ScenarioContext, &StepArgs) -> StepResult;

/// One phrasing bound to a handler. Aliases registered together share the
/// handler and a group number.
pub struct StepDefinition {
    pub kind: StepKind,
    pub pattern: StepPattern,
    group: usize,
    handler: Rc<StepHandler>,
}

impl StepDefinition {
    pub fn template(&self) -> &str {
        self.pattern.template()
    }

    pub fn call(&self, ctx: &mut ScenarioContext, args: &StepArgs) -> StepResult {
        (self.handler)(ctx, args)
    }
}

/// A definition matched against step text, with the values it captured.
pub struct StepMatch<'r> {
    pub definition: &'r StepDefinition,
    pub captures: Vec<Capture>,
}

/// Ordered list of step definitions. Ties are rejected when registering,
/// so lookup never has to pick between two matches.
#[derive(Default)]
pub struct StepRegistry {
    definitions: Vec<StepDefinition>,
    groups: usize,
}

impl StepRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn given<F>(&mut self, templates: &[&str], handler: F) -> Result<(), StepError>
    where
        F: Fn(&mut ScenarioContext, &StepArgs) -> StepResult + 'static,
    {
        self.register(StepKind::Given, templates, handler)
    }

    pub fn when<F>(&mut self, templates: &[&str], handler: F) -> Result<(), StepError>
    where
        F: Fn(&mut ScenarioContext, &StepArgs) -> StepResult + 'static,
    {
        self.register(StepKind::When, templates, handler)
    }

    pub fn then<F>(&mut self, templates: &[&str], handler: F) -> Result<(), StepError>
    where
        F: Fn(&mut ScenarioContext, &StepArgs) -> StepResult + 'static,
    {
        self.register(StepKind::Then, templates, handler)
    }

    /// Register for every keyword.
    pub fn any<F>(&mut self, templates: &[&str], handler: F) -> Result<(), StepError>
    where
        F: Fn(&mut ScenarioContext, &StepArgs) -> StepResult + 'static,
    {
        self.register(StepKind::Any, templates, handler)
    }

    /// Bind `handler` to each phrasing in `templates`.
    ///
    /// Fails without registering anything when a phrasing repeats an existing
    /// template of an overlapping keyword, or when it and an existing pattern
    /// can match the same text.
    ///
    /// Overlap is detected from sample texts: each template's default sample,
    /// and samples with one placeholder filled by a literal word of the other
    /// template. Overlaps that need several placeholders filled at once can
    /// still slip through and surface as `Ambiguous` from `find`.
    pub fn register<F>(&mut self, kind: StepKind, templates: &[&str], handler: F) -> Result<(), StepError>
    where
        F: Fn(&mut ScenarioContext, &StepArgs) -> StepResult + 'static,
    {
        let patterns = templates
            .iter()
            .map(|t| StepPattern::compile(t))
            .collect::<Result<Vec<_>, _>>()?;

        for (i, pattern) in patterns.iter().enumerate() {
            if patterns[..i].iter().any(|p| p.template() == pattern.template()) {
                return Err(StepError::Duplicate {
                    template: pattern.template().to_string(),
                });
            }
            self.check_conflicts(kind, pattern)?;
        }

        let group = self.groups;
        self.groups += 1;
        let handler: Rc<StepHandler> = Rc::new(handler);
        for pattern in patterns {
            debug!("registered {} '{}'", kind, pattern);
            self.definitions.push(StepDefinition {
                kind,
                pattern,
                group,
                handler: Rc::clone(&handler),
            });
        }
        Ok(())
    }

    fn check_conflicts(&self, kind: StepKind, pattern: &StepPattern) -> Result<(), StepError> {
        let sample = pattern.sample();
        for existing in self.definitions.iter().filter(|d| d.kind.overlaps(kind)) {
            if existing.template() == pattern.template() {
                return Err(StepError::Duplicate {
                    template: pattern.template().to_string(),
                });
            }
            let crossed = pattern
                .samples_crossed_with(&existing.pattern)
                .into_iter()
                .chain(existing.pattern.samples_crossed_with(pattern))
                .any(|text| pattern.is_match(&text) && existing.pattern.is_match(&text));
            if crossed
                || existing.pattern.is_match(&sample)
                || pattern.is_match(&existing.pattern.sample())
            {
                return Err(StepError::Ambiguous {
                    step: pattern.template().to_string(),
                    patterns: vec![existing.template().to_string()],
                });
            }
        }
        Ok(())
    }

    /// The definition matching `text` for a step of `kind`, if any.
    pub fn find(&self, kind: StepKind, text: &str) -> Result<Option<StepMatch<'_>>, StepError> {
        let mut matches = self
            .definitions
            .iter()
            .filter(|d| d.kind.overlaps(kind))
            .filter_map(|d| d.pattern.captures(text).map(|c| (d, c)));

        let Some((definition, captures)) = matches.next() else {
            return Ok(None);
        };
        let others: Vec<&StepDefinition> = matches
            .map(|(d, _)| d)
            .filter(|d| d.group != definition.group)
            .collect();
        if !others.is_empty() {
            let mut patterns = vec![definition.template().to_string()];
            patterns.extend(others.iter().map(|d| d.template().to_string()));
            return Err(StepError::Ambiguous {
                step: text.to_string(),
                patterns,
            });
        }
        Ok(Some(StepMatch {
            definition,
            captures,
        }))
    }

    pub fn definitions(&self) -> impl Iterator<Item = &StepDefinition> {
        self.definitions.iter()
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}
