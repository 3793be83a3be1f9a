use std::borrow::Cow;
use std::collections::HashMap;
use std::fmt;

use thiserror::Error;

/// How an expression is interpreted when finding elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Strategy {
    Css,
    XPath,
    /// Matches the `name` attribute.
    Name,
    /// Matches the `id` attribute.
    Id,
    /// Exact visible text of an anchor.
    LinkText,
    TagName,
}

impl Strategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Strategy::Css => "css",
            Strategy::XPath => "xpath",
            Strategy::Name => "name",
            Strategy::Id => "id",
            Strategy::LinkText => "link text",
            Strategy::TagName => "tag name",
        }
    }
}

/// A semantic element name bound to one finding strategy and expression.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Locator {
    pub name: Cow<'static, str>,
    pub strategy: Strategy,
    pub expression: Cow<'static, str>,
}

impl Locator {
    pub const fn new(name: &'static str, strategy: Strategy, expression: &'static str) -> Self {
        Locator {
            name: Cow::Borrowed(name),
            strategy,
            expression: Cow::Borrowed(expression),
        }
    }

    pub const fn css(name: &'static str, expression: &'static str) -> Self {
        Locator::new(name, Strategy::Css, expression)
    }

    pub const fn xpath(name: &'static str, expression: &'static str) -> Self {
        Locator::new(name, Strategy::XPath, expression)
    }

    pub const fn by_name(name: &'static str, attribute: &'static str) -> Self {
        Locator::new(name, Strategy::Name, attribute)
    }

    pub const fn by_id(name: &'static str, id: &'static str) -> Self {
        Locator::new(name, Strategy::Id, id)
    }

    pub const fn link_text(name: &'static str, text: &'static str) -> Self {
        Locator::new(name, Strategy::LinkText, text)
    }

    pub const fn tag(name: &'static str, tag: &'static str) -> Self {
        Locator::new(name, Strategy::TagName, tag)
    }

    /// Locator built at runtime, e.g. a child selector derived from user input.
    pub fn dynamic(
        name: impl Into<String>,
        strategy: Strategy,
        expression: impl Into<String>,
    ) -> Self {
        Locator {
            name: Cow::Owned(name.into()),
            strategy,
            expression: Cow::Owned(expression.into()),
        }
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "'{}' ({}: {})",
            self.name,
            self.strategy.as_str(),
            self.expression
        )
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LocatorError {
    #[error("locator '{name}' is already registered in scope '{scope}'")]
    Duplicate { scope: String, name: String },
}

// ============================================================================
// Registry: one scope per page or feature area
// ============================================================================

/// Name-to-locator table for one page or feature area.
///
/// Insertion order is kept so audits can iterate the registry
/// deterministically.
#[derive(Debug, Clone)]
pub struct LocatorRegistry {
    scope: String,
    entries: Vec<Locator>,
    index: HashMap<String, usize>,
}

impl LocatorRegistry {
    pub fn new(scope: &str) -> Self {
        Self {
            scope: scope.to_string(),
            entries: Vec::new(),
            index: HashMap::new(),
        }
    }

    pub fn from_entries(
        scope: &str,
        entries: impl IntoIterator<Item = Locator>,
    ) -> Result<Self, LocatorError> {
        let mut registry = Self::new(scope);
        for locator in entries {
            registry.insert(locator)?;
        }
        Ok(registry)
    }

    /// Add a locator. A name may only be bound once per scope.
    pub fn insert(&mut self, locator: Locator) -> Result<(), LocatorError> {
        if self.index.contains_key(locator.name.as_ref()) {
            return Err(LocatorError::Duplicate {
                scope: self.scope.clone(),
                name: locator.name.to_string(),
            });
        }
        self.index
            .insert(locator.name.to_string(), self.entries.len());
        self.entries.push(locator);
        Ok(())
    }

    pub fn resolve(&self, name: &str) -> Option<&Locator> {
        self.index.get(name).map(|&i| &self.entries[i])
    }

    pub fn scope(&self) -> &str {
        &self.scope
    }

    pub fn iter(&self) -> impl Iterator<Item = &Locator> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
