use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::browser::error::BrowserError;
use crate::locator::registry::Locator;

/// Opaque reference to a live element.
///
/// Handles are only valid until the next navigation or DOM mutation and are
/// never stored across steps; callers re-resolve the locator instead.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ElementHandle(String);

impl ElementHandle {
    pub fn new(id: impl Into<String>) -> Self {
        ElementHandle(id.into())
    }

    pub fn id(&self) -> &str {
        &self.0
    }
}

/// Element bounding box in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Rect {
            x,
            y,
            width,
            height,
        }
    }
}

/// The browser operations the test layers rely on.
///
/// Everything above this trait (element access, page models, steps) talks to
/// the browser only through it, so a scripted in-memory implementation can
/// stand in for a real driver in tests.
pub trait Browser {
    fn navigate(&mut self, url: &str) -> Result<(), BrowserError>;

    fn current_url(&mut self) -> Result<String, BrowserError>;

    fn title(&mut self) -> Result<String, BrowserError>;

    fn page_source(&mut self) -> Result<String, BrowserError>;

    /// All elements matching `locator`, in document order. An empty vector
    /// means nothing matched; it is not an error.
    fn find_elements(&mut self, locator: &Locator) -> Result<Vec<ElementHandle>, BrowserError>;

    /// Elements matching `locator` inside `parent`.
    fn find_child_elements(
        &mut self,
        parent: &ElementHandle,
        locator: &Locator,
    ) -> Result<Vec<ElementHandle>, BrowserError>;

    fn text(&mut self, element: &ElementHandle) -> Result<String, BrowserError>;

    /// Attribute (or, failing that, DOM property) value. `None` when unset.
    fn attribute(
        &mut self,
        element: &ElementHandle,
        name: &str,
    ) -> Result<Option<String>, BrowserError>;

    fn is_displayed(&mut self, element: &ElementHandle) -> Result<bool, BrowserError>;

    fn is_enabled(&mut self, element: &ElementHandle) -> Result<bool, BrowserError>;

    fn rect(&mut self, element: &ElementHandle) -> Result<Rect, BrowserError>;

    fn click(&mut self, element: &ElementHandle) -> Result<(), BrowserError>;

    fn clear(&mut self, element: &ElementHandle) -> Result<(), BrowserError>;

    fn send_keys(&mut self, element: &ElementHandle, text: &str) -> Result<(), BrowserError>;

    /// Move the pointer over the element.
    fn hover(&mut self, element: &ElementHandle) -> Result<(), BrowserError>;

    /// Run a synchronous script. `args` are exposed to the script as
    /// `arguments[0..]`.
    fn execute_script(
        &mut self,
        script: &str,
        args: &[&ElementHandle],
    ) -> Result<Value, BrowserError>;

    fn set_window_size(&mut self, width: u32, height: u32) -> Result<(), BrowserError>;

    /// PNG bytes of the current viewport.
    fn screenshot_png(&mut self) -> Result<Vec<u8>, BrowserError>;

    /// End the session. Further calls fail with `InvalidSession`.
    fn quit(&mut self) -> Result<(), BrowserError>;
}

/// Key code WebDriver uses for Enter in `send_keys`.
pub const ENTER_KEY: &str = "\u{E007}";
