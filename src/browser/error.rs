use thiserror::Error;

/// Failures reported by a [`Browser`](crate::browser::capability::Browser) implementation.
#[derive(Debug, Error)]
pub enum BrowserError {
    /// No element matched the locator.
    #[error("no element matches {locator}")]
    NoSuchElement { locator: String },

    /// The element handle refers to a node that left the DOM.
    #[error("stale element reference: {0}")]
    StaleElement(String),

    /// The element exists but cannot receive the interaction.
    #[error("element not interactable: {0}")]
    NotInteractable(String),

    /// A wait elapsed before its condition held.
    #[error("timed out after {waited_ms}ms waiting for {condition}")]
    Timeout { condition: String, waited_ms: u64 },

    /// The driver answered a command with an error payload.
    #[error("command '{command}' failed: {error}")]
    Protocol { command: String, error: String },

    /// The session is gone (browser crashed or was quit).
    #[error("invalid session: {0}")]
    InvalidSession(String),

    /// A script raised inside the page.
    #[error("script error: {0}")]
    Script(String),

    /// HTTP transport to the driver failed.
    #[error("transport error ({context}): {source}")]
    Transport {
        context: String,
        #[source]
        source: reqwest::Error,
    },

    /// A payload could not be decoded.
    #[error("JSON parse error ({context}): {source}")]
    JsonParse {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// Screenshot payload was not valid base64.
    #[error("screenshot decode error: {0}")]
    Decode(#[from] base64::DecodeError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl BrowserError {
    /// Whether this is a lookup-class failure (element absent, stale, hidden,
    /// or a wait that timed out) as opposed to an infrastructure failure.
    pub fn is_lookup(&self) -> bool {
        matches!(
            self,
            BrowserError::NoSuchElement { .. }
                | BrowserError::StaleElement(_)
                | BrowserError::NotInteractable(_)
                | BrowserError::Timeout { .. }
        )
    }

    pub fn no_such_element(locator: impl Into<String>) -> Self {
        BrowserError::NoSuchElement {
            locator: locator.into(),
        }
    }
}
