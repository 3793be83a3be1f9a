use crate::browser::error::BrowserError;

/// Result of a query against the page.
///
/// Separates "the element is not there" from "the query itself broke", so a
/// dead session is never mistaken for a missing element.
#[derive(Debug)]
pub enum Outcome<T> {
    Found(T),
    NotFound,
    Errored(BrowserError),
}

impl<T> Outcome<T> {
    /// Classify a browser result: lookup-class errors become `NotFound`.
    pub fn from_result(result: Result<T, BrowserError>) -> Self {
        match result {
            Ok(value) => Outcome::Found(value),
            Err(e) if e.is_lookup() => Outcome::NotFound,
            Err(e) => Outcome::Errored(e),
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, Outcome::Found(_))
    }

    pub fn found(self) -> Option<T> {
        match self {
            Outcome::Found(value) => Some(value),
            _ => None,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Outcome<U> {
        match self {
            Outcome::Found(value) => Outcome::Found(f(value)),
            Outcome::NotFound => Outcome::NotFound,
            Outcome::Errored(e) => Outcome::Errored(e),
        }
    }

    pub fn and_then<U>(self, f: impl FnOnce(T) -> Outcome<U>) -> Outcome<U> {
        match self {
            Outcome::Found(value) => f(value),
            Outcome::NotFound => Outcome::NotFound,
            Outcome::Errored(e) => Outcome::Errored(e),
        }
    }

    /// Collapse `NotFound` into `default`, keep infrastructure errors.
    pub fn or_default_value(self, default: T) -> Result<T, BrowserError> {
        match self {
            Outcome::Found(value) => Ok(value),
            Outcome::NotFound => Ok(default),
            Outcome::Errored(e) => Err(e),
        }
    }

    /// Collapse `NotFound` into `None`, keep infrastructure errors.
    pub fn into_option(self) -> Result<Option<T>, BrowserError> {
        match self {
            Outcome::Found(value) => Ok(Some(value)),
            Outcome::NotFound => Ok(None),
            Outcome::Errored(e) => Err(e),
        }
    }
}

impl Outcome<bool> {
    /// `false` for both a negative answer and a missing element.
    pub fn holds(self) -> Result<bool, BrowserError> {
        self.or_default_value(false)
    }
}

impl Outcome<String> {
    pub fn or_empty(self) -> Result<String, BrowserError> {
        self.or_default_value(String::new())
    }
}
