use std::time::Duration;

use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::browser::capability::{Browser, ElementHandle, Rect};
use crate::browser::error::BrowserError;
use crate::element::outcome::Outcome;
use crate::element::scripts;
use crate::element::wait::{WaitError, WaitPolicy, poll_until};
use crate::locator::registry::Locator;

/// What `scroll_into_view` should bring on screen.
#[derive(Debug, Clone, Copy)]
pub enum ScrollTarget<'a> {
    Locator(&'a Locator),
    Handle(&'a ElementHandle),
}

impl<'a> From<&'a Locator> for ScrollTarget<'a> {
    fn from(locator: &'a Locator) -> Self {
        ScrollTarget::Locator(locator)
    }
}

impl<'a> From<&'a ElementHandle> for ScrollTarget<'a> {
    fn from(handle: &'a ElementHandle) -> Self {
        ScrollTarget::Handle(handle)
    }
}

/// Document and window extents reported by the page.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewportMetrics {
    pub scroll_width: f64,
    pub inner_width: f64,
    pub scroll_height: f64,
    pub inner_height: f64,
}

impl ViewportMetrics {
    pub fn overflows_horizontally(&self) -> bool {
        self.scroll_width > self.inner_width
    }

    pub fn overflows_vertically(&self) -> bool {
        self.scroll_height > self.inner_height
    }
}

// ============================================================================
// Element access: the only path from page models to the browser
// ============================================================================

/// Synchronized element operations over a borrowed browser session.
///
/// Two families of calls exist side by side:
/// - `try_*`, `visibility`, `enablement` return [`Outcome`] and keep
///   infrastructure errors visible;
/// - `click`, `type_text`, `read_text`, `read_attribute`, `is_visible`,
///   `is_enabled` collapse every failure into `false` / `""` for use in plain
///   boolean assertions.
pub struct ElementAccess<'b> {
    browser: &'b mut dyn Browser,
    policy: WaitPolicy,
}

impl<'b> ElementAccess<'b> {
    pub fn new(browser: &'b mut dyn Browser, policy: WaitPolicy) -> Self {
        Self { browser, policy }
    }

    pub fn policy(&self) -> WaitPolicy {
        self.policy
    }

    pub fn browser(&mut self) -> &mut dyn Browser {
        &mut *self.browser
    }

    // ---- Finding ----

    /// First element matching `locator`, without waiting.
    pub fn find_one(&mut self, locator: &Locator) -> Outcome<ElementHandle> {
        match self.browser.find_elements(locator) {
            Ok(found) => match found.into_iter().next() {
                Some(handle) => Outcome::Found(handle),
                None => Outcome::NotFound,
            },
            Err(e) => Outcome::from_result(Err(e)),
        }
    }

    /// All matches; empty on no match and on error.
    pub fn find_all(&mut self, locator: &Locator) -> Vec<ElementHandle> {
        match self.try_find_all(locator) {
            Ok(found) => found,
            Err(e) => {
                warn!("find_all {} failed: {}", locator, e);
                Vec::new()
            }
        }
    }

    /// All matches; lookup errors read as "none", other errors propagate.
    pub fn try_find_all(&mut self, locator: &Locator) -> Result<Vec<ElementHandle>, BrowserError> {
        match self.browser.find_elements(locator) {
            Ok(found) => Ok(found),
            Err(e) if e.is_lookup() => Ok(Vec::new()),
            Err(e) => Err(e),
        }
    }

    /// Elements matching `locator` inside `parent`.
    pub fn find_children(
        &mut self,
        parent: &ElementHandle,
        locator: &Locator,
    ) -> Result<Vec<ElementHandle>, BrowserError> {
        match self.browser.find_child_elements(parent, locator) {
            Ok(found) => Ok(found),
            Err(e) if e.is_lookup() => Ok(Vec::new()),
            Err(e) => Err(e),
        }
    }

    pub fn find_child(&mut self, parent: &ElementHandle, locator: &Locator) -> Outcome<ElementHandle> {
        match self.find_children(parent, locator) {
            Ok(found) => match found.into_iter().next() {
                Some(handle) => Outcome::Found(handle),
                None => Outcome::NotFound,
            },
            Err(e) => Outcome::Errored(e),
        }
    }

    // ---- Waiting ----

    pub fn wait_until_present(
        &mut self,
        locator: &Locator,
        timeout: Option<Duration>,
    ) -> Result<ElementHandle, WaitError> {
        let budget = timeout.unwrap_or(self.policy.element);
        let browser = &mut *self.browser;
        poll_until(&format!("presence of {}", locator), budget, || {
            Ok(browser.find_elements(locator)?.into_iter().next())
        })
    }

    pub fn wait_until_visible(
        &mut self,
        locator: &Locator,
        timeout: Option<Duration>,
    ) -> Result<ElementHandle, WaitError> {
        let budget = timeout.unwrap_or(self.policy.element);
        let browser = &mut *self.browser;
        poll_until(&format!("visibility of {}", locator), budget, || {
            for handle in browser.find_elements(locator)? {
                if browser.is_displayed(&handle)? {
                    return Ok(Some(handle));
                }
            }
            Ok(None)
        })
    }

    /// Visible and enabled.
    pub fn wait_until_clickable(
        &mut self,
        locator: &Locator,
        timeout: Option<Duration>,
    ) -> Result<ElementHandle, WaitError> {
        let budget = timeout.unwrap_or(self.policy.element);
        let browser = &mut *self.browser;
        poll_until(&format!("clickability of {}", locator), budget, || {
            for handle in browser.find_elements(locator)? {
                if browser.is_displayed(&handle)? && browser.is_enabled(&handle)? {
                    return Ok(Some(handle));
                }
            }
            Ok(None)
        })
    }

    /// Wait until nothing matching `locator` is displayed. An absent element
    /// counts as hidden.
    pub fn wait_until_hidden(
        &mut self,
        locator: &Locator,
        timeout: Option<Duration>,
    ) -> Result<(), WaitError> {
        let budget = timeout.unwrap_or(self.policy.element);
        let browser = &mut *self.browser;
        poll_until(&format!("{} to disappear", locator), budget, || {
            for handle in browser.find_elements(locator)? {
                match browser.is_displayed(&handle) {
                    Ok(true) => return Ok(None),
                    Ok(false) => {}
                    Err(e) if e.is_lookup() => {}
                    Err(e) => return Err(e),
                }
            }
            Ok(Some(()))
        })
    }

    /// Poll until `document.readyState` is `complete`.
    pub fn wait_for_document_ready(&mut self) -> Result<(), WaitError> {
        let budget = self.policy.page_load;
        let browser = &mut *self.browser;
        poll_until("document ready", budget, || {
            let state = browser.execute_script(scripts::READY_STATE, &[])?;
            Ok((state.as_str() == Some("complete")).then_some(()))
        })
    }

    /// Poll the current URL until `predicate` accepts it.
    pub fn wait_for_url<P>(&mut self, description: &str, predicate: P) -> Result<String, WaitError>
    where
        P: Fn(&str) -> bool,
    {
        let budget = self.policy.page_load;
        let browser = &mut *self.browser;
        poll_until(description, budget, || {
            let url = browser.current_url()?;
            Ok(predicate(&url).then_some(url))
        })
    }

    /// Poll viewport metrics until two consecutive reads agree.
    pub fn wait_for_layout_stable(&mut self) -> Result<ViewportMetrics, WaitError> {
        let budget = self.policy.settle;
        let browser = &mut *self.browser;
        let mut previous: Option<ViewportMetrics> = None;
        poll_until("layout to settle", budget, || {
            let current = read_metrics(browser)?;
            let stable = previous == Some(current);
            previous = Some(current);
            Ok(stable.then_some(current))
        })
    }

    // ---- Actions ----

    pub fn try_click(&mut self, locator: &Locator) -> Outcome<()> {
        let clicked = self
            .wait_until_clickable(locator, None)
            .map_err(BrowserError::from)
            .and_then(|handle| self.browser.click(&handle));
        Outcome::from_result(clicked)
    }

    /// Wait until clickable, then click. `false` on any failure.
    pub fn click(&mut self, locator: &Locator) -> bool {
        collapse("click", locator, self.try_click(locator)).is_some()
    }

    pub fn click_handle(&mut self, handle: &ElementHandle) -> Outcome<()> {
        Outcome::from_result(self.browser.click(handle))
    }

    /// Click through the page's own event dispatch.
    pub fn js_click(&mut self, handle: &ElementHandle) -> Outcome<()> {
        Outcome::from_result(
            self.browser
                .execute_script(scripts::JS_CLICK, &[handle])
                .map(|_| ()),
        )
    }

    pub fn try_type_text(&mut self, locator: &Locator, text: &str) -> Outcome<()> {
        let typed = self
            .wait_until_present(locator, None)
            .map_err(BrowserError::from)
            .and_then(|handle| {
                self.browser.clear(&handle)?;
                self.browser.send_keys(&handle, text)
            });
        Outcome::from_result(typed)
    }

    /// Wait until present, clear, then type. `false` on any failure.
    pub fn type_text(&mut self, locator: &Locator, text: &str) -> bool {
        collapse("type_text", locator, self.try_type_text(locator, text)).is_some()
    }

    /// Send keys without clearing first.
    pub fn send_keys(&mut self, locator: &Locator, keys: &str) -> Outcome<()> {
        self.find_one(locator)
            .and_then(|handle| Outcome::from_result(self.browser.send_keys(&handle, keys)))
    }

    pub fn try_clear(&mut self, locator: &Locator) -> Outcome<()> {
        self.find_one(locator)
            .and_then(|handle| Outcome::from_result(self.browser.clear(&handle)))
    }

    pub fn hover(&mut self, handle: &ElementHandle) -> Outcome<()> {
        Outcome::from_result(self.browser.hover(handle))
    }

    // ---- Reads ----

    pub fn try_read_text(&mut self, locator: &Locator) -> Outcome<String> {
        self.find_one(locator).and_then(|handle| self.element_text(&handle))
    }

    /// Visible text, empty on any failure.
    pub fn read_text(&mut self, locator: &Locator) -> String {
        collapse("read_text", locator, self.try_read_text(locator)).unwrap_or_default()
    }

    /// Attribute value; an unset attribute reads as empty.
    pub fn try_read_attribute(&mut self, locator: &Locator, name: &str) -> Outcome<String> {
        self.find_one(locator)
            .and_then(|handle| self.element_attribute(&handle, name))
    }

    pub fn read_attribute(&mut self, locator: &Locator, name: &str) -> String {
        collapse("read_attribute", locator, self.try_read_attribute(locator, name))
            .unwrap_or_default()
    }

    pub fn visibility(&mut self, locator: &Locator) -> Outcome<bool> {
        self.find_one(locator)
            .and_then(|handle| self.element_visible(&handle))
    }

    pub fn is_visible(&mut self, locator: &Locator) -> bool {
        collapse("is_visible", locator, self.visibility(locator)).unwrap_or(false)
    }

    pub fn enablement(&mut self, locator: &Locator) -> Outcome<bool> {
        self.find_one(locator)
            .and_then(|handle| Outcome::from_result(self.browser.is_enabled(&handle)))
    }

    pub fn is_enabled(&mut self, locator: &Locator) -> bool {
        collapse("is_enabled", locator, self.enablement(locator)).unwrap_or(false)
    }

    /// Whether at least one element matches; errors other than lookup errors
    /// propagate.
    pub fn is_present(&mut self, locator: &Locator) -> Result<bool, BrowserError> {
        Ok(!self.try_find_all(locator)?.is_empty())
    }

    pub fn element_text(&mut self, handle: &ElementHandle) -> Outcome<String> {
        Outcome::from_result(self.browser.text(handle))
    }

    pub fn element_attribute(&mut self, handle: &ElementHandle, name: &str) -> Outcome<String> {
        Outcome::from_result(self.browser.attribute(handle, name)).map(Option::unwrap_or_default)
    }

    pub fn element_visible(&mut self, handle: &ElementHandle) -> Outcome<bool> {
        Outcome::from_result(self.browser.is_displayed(handle))
    }

    pub fn element_rect(&mut self, handle: &ElementHandle) -> Outcome<Rect> {
        Outcome::from_result(self.browser.rect(handle))
    }

    // ---- Scrolling & page-level ----

    /// Scroll the target into view, then wait (bounded by the settle budget)
    /// until it intersects the viewport.
    pub fn scroll_into_view<'t>(&mut self, target: impl Into<ScrollTarget<'t>>) -> Outcome<()> {
        let handle = match target.into() {
            ScrollTarget::Handle(handle) => handle.clone(),
            ScrollTarget::Locator(locator) => match self.find_one(locator) {
                Outcome::Found(handle) => handle,
                Outcome::NotFound => return Outcome::NotFound,
                Outcome::Errored(e) => return Outcome::Errored(e),
            },
        };

        if let Err(e) = self.browser.execute_script(scripts::SCROLL_INTO_VIEW, &[&handle]) {
            return Outcome::from_result(Err(e));
        }

        let budget = self.policy.settle;
        let browser = &mut *self.browser;
        let settled = poll_until("element in viewport", budget, || {
            let inside = browser.execute_script(scripts::IN_VIEWPORT, &[&handle])?;
            Ok(inside.as_bool().unwrap_or(false).then_some(()))
        });
        match settled {
            Ok(()) => Outcome::Found(()),
            Err(WaitError::TimedOut { .. }) => {
                debug!("element {} scrolled but not yet in viewport", handle.id());
                Outcome::Found(())
            }
            Err(WaitError::Browser(e)) => Outcome::from_result(Err(e)),
        }
    }

    pub fn execute(&mut self, script: &str, args: &[&ElementHandle]) -> Result<Value, BrowserError> {
        self.browser.execute_script(script, args)
    }

    pub fn viewport_metrics(&mut self) -> Result<ViewportMetrics, BrowserError> {
        read_metrics(&mut *self.browser)
    }

    pub fn navigate(&mut self, url: &str) -> Result<(), BrowserError> {
        debug!("navigate {}", url);
        self.browser.navigate(url)
    }

    pub fn current_url(&mut self) -> Result<String, BrowserError> {
        self.browser.current_url()
    }

    pub fn title(&mut self) -> Result<String, BrowserError> {
        self.browser.title()
    }

    pub fn page_source(&mut self) -> Result<String, BrowserError> {
        self.browser.page_source()
    }

    pub fn set_window_size(&mut self, width: u32, height: u32) -> Result<(), BrowserError> {
        self.browser.set_window_size(width, height)
    }
}

fn read_metrics(browser: &mut dyn Browser) -> Result<ViewportMetrics, BrowserError> {
    let value = browser.execute_script(scripts::VIEWPORT_METRICS, &[])?;
    serde_json::from_value(value).map_err(|e| BrowserError::JsonParse {
        context: "viewport metrics".into(),
        source: e,
    })
}

/// Collapse an outcome to `Option`, logging why it was lost.
fn collapse<T>(operation: &str, locator: &Locator, outcome: Outcome<T>) -> Option<T> {
    match outcome {
        Outcome::Found(value) => Some(value),
        Outcome::NotFound => {
            debug!("{} {}: not found", operation, locator);
            None
        }
        Outcome::Errored(e) => {
            warn!("{} {}: {}", operation, locator, e);
            None
        }
    }
}
