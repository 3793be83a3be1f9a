use std::cell::{RefCell, RefMut};
use std::collections::HashMap;
use std::rc::Rc;

use serde_json::{Value, json};

use bdd_lab::browser::capability::ENTER_KEY;
use bdd_lab::browser::{Browser, BrowserError, ElementHandle, Rect};
use bdd_lab::element::scripts;
use bdd_lab::locator::Locator;
use bdd_lab::runner::SessionFactory;

// ============================================================================
// Scripted page model
// ============================================================================

/// What clicking an element does to the page.
#[derive(Debug, Clone)]
pub enum Effect {
    Navigate(String),
    Show(String),
    Hide(String),
    SetSource(String),
}

/// One element of the fake document. An element matches a locator when the
/// locator's expression is one of its selectors.
#[derive(Debug, Clone)]
pub struct FakeElement {
    pub id: String,
    pub selectors: Vec<String>,
    pub parent: Option<String>,
    pub text: String,
    pub attributes: HashMap<String, String>,
    pub displayed: bool,
    pub enabled: bool,
    pub rect: Rect,
    /// `rect` fails for this element while the rest of it stays usable.
    pub unmeasurable: bool,
    pub on_click: Vec<Effect>,
}

impl FakeElement {
    pub fn new(id: &str, locator: &Locator) -> Self {
        Self::matching(id, &locator.expression)
    }

    pub fn matching(id: &str, expression: &str) -> Self {
        FakeElement {
            id: id.to_string(),
            selectors: vec![expression.to_string()],
            parent: None,
            text: String::new(),
            attributes: HashMap::new(),
            displayed: true,
            enabled: true,
            rect: Rect::new(0.0, 0.0, 120.0, 48.0),
            unmeasurable: false,
            on_click: Vec::new(),
        }
    }

    pub fn also(mut self, locator: &Locator) -> Self {
        self.selectors.push(locator.expression.to_string());
        self
    }

    pub fn text(mut self, text: &str) -> Self {
        self.text = text.to_string();
        self
    }

    pub fn attr(mut self, name: &str, value: &str) -> Self {
        self.attributes.insert(name.to_string(), value.to_string());
        self
    }

    pub fn hidden(mut self) -> Self {
        self.displayed = false;
        self
    }

    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    pub fn sized(mut self, width: f64, height: f64) -> Self {
        self.rect = Rect::new(0.0, 0.0, width, height);
        self
    }

    pub fn unmeasurable(mut self) -> Self {
        self.unmeasurable = true;
        self
    }

    pub fn child_of(mut self, parent: &str) -> Self {
        self.parent = Some(parent.to_string());
        self
    }

    pub fn on_click(mut self, effect: Effect) -> Self {
        self.on_click.push(effect);
        self
    }
}

#[derive(Debug)]
pub struct FakePage {
    pub url: String,
    pub title: String,
    pub source: String,
    pub elements: Vec<FakeElement>,
    pub metrics: Value,
    /// Script overrides: first entry whose needle the script contains wins.
    pub scripts: Vec<(String, Value)>,
    pub window: (u32, u32),
    pub log: Vec<String>,
    pub screenshots: usize,
    pub quit: bool,
    /// Every call fails as if the session were gone.
    pub broken: bool,
}

impl Default for FakePage {
    fn default() -> Self {
        FakePage {
            url: "about:blank".to_string(),
            title: String::new(),
            source: "<html><body></body></html>".to_string(),
            elements: Vec::new(),
            metrics: metrics_value(1024.0, 1024.0, 3000.0, 768.0),
            scripts: Vec::new(),
            window: (1920, 1080),
            log: Vec::new(),
            screenshots: 0,
            quit: false,
            broken: false,
        }
    }
}

impl FakePage {
    fn element(&self, handle: &ElementHandle) -> Result<&FakeElement, BrowserError> {
        self.elements
            .iter()
            .find(|e| e.id == handle.id())
            .ok_or_else(|| BrowserError::StaleElement(handle.id().to_string()))
    }

    fn element_mut(&mut self, handle: &ElementHandle) -> Result<&mut FakeElement, BrowserError> {
        self.elements
            .iter_mut()
            .find(|e| e.id == handle.id())
            .ok_or_else(|| BrowserError::StaleElement(handle.id().to_string()))
    }

    fn apply(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::Navigate(url) => self.url = url,
                Effect::Show(id) => self.set_displayed(&id, true),
                Effect::Hide(id) => self.set_displayed(&id, false),
                Effect::SetSource(source) => self.source = source,
            }
        }
    }

    fn set_displayed(&mut self, id: &str, displayed: bool) {
        if let Some(element) = self.elements.iter_mut().find(|e| e.id == id) {
            element.displayed = displayed;
        }
    }
}

pub fn metrics_value(scroll_width: f64, inner_width: f64, scroll_height: f64, inner_height: f64) -> Value {
    json!({
        "scrollWidth": scroll_width,
        "innerWidth": inner_width,
        "scrollHeight": scroll_height,
        "innerHeight": inner_height,
    })
}

// ============================================================================
// FakeBrowser: shared handle so tests can inspect the page afterwards
// ============================================================================

#[derive(Debug, Clone, Default)]
pub struct FakeBrowser {
    page: Rc<RefCell<FakePage>>,
}

impl FakeBrowser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn at(self, url: &str) -> Self {
        self.page.borrow_mut().url = url.to_string();
        self
    }

    pub fn titled(self, title: &str) -> Self {
        self.page.borrow_mut().title = title.to_string();
        self
    }

    pub fn with_source(self, source: &str) -> Self {
        self.page.borrow_mut().source = source.to_string();
        self
    }

    pub fn with(self, element: FakeElement) -> Self {
        self.page.borrow_mut().elements.push(element);
        self
    }

    pub fn with_script(self, needle: &str, result: Value) -> Self {
        self.page
            .borrow_mut()
            .scripts
            .push((needle.to_string(), result));
        self
    }

    pub fn with_metrics(self, metrics: Value) -> Self {
        self.page.borrow_mut().metrics = metrics;
        self
    }

    pub fn broken(self) -> Self {
        self.page.borrow_mut().broken = true;
        self
    }

    pub fn page(&self) -> RefMut<'_, FakePage> {
        self.page.borrow_mut()
    }

    pub fn log(&self) -> Vec<String> {
        self.page.borrow().log.clone()
    }

    pub fn url(&self) -> String {
        self.page.borrow().url.clone()
    }

    pub fn value_of(&self, id: &str) -> String {
        self.page
            .borrow()
            .elements
            .iter()
            .find(|e| e.id == id)
            .and_then(|e| e.attributes.get("value").cloned())
            .unwrap_or_default()
    }

    pub fn is_displayed(&self, id: &str) -> bool {
        self.page
            .borrow()
            .elements
            .iter()
            .any(|e| e.id == id && e.displayed)
    }

    pub fn is_quit(&self) -> bool {
        self.page.borrow().quit
    }

    pub fn screenshots(&self) -> usize {
        self.page.borrow().screenshots
    }

    fn live(&self) -> Result<RefMut<'_, FakePage>, BrowserError> {
        let page = self.page.borrow_mut();
        if page.broken || page.quit {
            return Err(BrowserError::InvalidSession("session deleted".to_string()));
        }
        Ok(page)
    }
}

impl Browser for FakeBrowser {
    fn navigate(&mut self, url: &str) -> Result<(), BrowserError> {
        let mut page = self.live()?;
        page.log.push(format!("navigate {}", url));
        page.url = url.to_string();
        Ok(())
    }

    fn current_url(&mut self) -> Result<String, BrowserError> {
        Ok(self.live()?.url.clone())
    }

    fn title(&mut self) -> Result<String, BrowserError> {
        Ok(self.live()?.title.clone())
    }

    fn page_source(&mut self) -> Result<String, BrowserError> {
        Ok(self.live()?.source.clone())
    }

    fn find_elements(&mut self, locator: &Locator) -> Result<Vec<ElementHandle>, BrowserError> {
        let page = self.live()?;
        Ok(page
            .elements
            .iter()
            .filter(|e| e.selectors.iter().any(|s| *s == locator.expression))
            .map(|e| ElementHandle::new(e.id.clone()))
            .collect())
    }

    fn find_child_elements(
        &mut self,
        parent: &ElementHandle,
        locator: &Locator,
    ) -> Result<Vec<ElementHandle>, BrowserError> {
        let page = self.live()?;
        page.element(parent)?;
        Ok(page
            .elements
            .iter()
            .filter(|e| e.parent.as_deref() == Some(parent.id()))
            .filter(|e| e.selectors.iter().any(|s| *s == locator.expression))
            .map(|e| ElementHandle::new(e.id.clone()))
            .collect())
    }

    fn text(&mut self, element: &ElementHandle) -> Result<String, BrowserError> {
        Ok(self.live()?.element(element)?.text.clone())
    }

    fn attribute(
        &mut self,
        element: &ElementHandle,
        name: &str,
    ) -> Result<Option<String>, BrowserError> {
        Ok(self.live()?.element(element)?.attributes.get(name).cloned())
    }

    fn is_displayed(&mut self, element: &ElementHandle) -> Result<bool, BrowserError> {
        Ok(self.live()?.element(element)?.displayed)
    }

    fn is_enabled(&mut self, element: &ElementHandle) -> Result<bool, BrowserError> {
        Ok(self.live()?.element(element)?.enabled)
    }

    fn rect(&mut self, element: &ElementHandle) -> Result<Rect, BrowserError> {
        let page = self.live()?;
        let target = page.element(element)?;
        if target.unmeasurable {
            return Err(BrowserError::Script(format!("cannot measure {}", target.id)));
        }
        Ok(target.rect)
    }

    fn click(&mut self, element: &ElementHandle) -> Result<(), BrowserError> {
        let mut page = self.live()?;
        let target = page.element(element)?;
        if !target.displayed {
            return Err(BrowserError::NotInteractable(element.id().to_string()));
        }
        let effects = target.on_click.clone();
        page.log.push(format!("click {}", element.id()));
        page.apply(effects);
        Ok(())
    }

    fn clear(&mut self, element: &ElementHandle) -> Result<(), BrowserError> {
        let mut page = self.live()?;
        page.element_mut(element)?
            .attributes
            .insert("value".to_string(), String::new());
        page.log.push(format!("clear {}", element.id()));
        Ok(())
    }

    fn send_keys(&mut self, element: &ElementHandle, text: &str) -> Result<(), BrowserError> {
        let mut page = self.live()?;
        if text == ENTER_KEY {
            page.element(element)?;
            page.log.push(format!("enter {}", element.id()));
            return Ok(());
        }
        page.element_mut(element)?
            .attributes
            .entry("value".to_string())
            .or_default()
            .push_str(text);
        page.log.push(format!("keys {} {}", element.id(), text));
        Ok(())
    }

    fn hover(&mut self, element: &ElementHandle) -> Result<(), BrowserError> {
        let mut page = self.live()?;
        page.element(element)?;
        page.log.push(format!("hover {}", element.id()));
        Ok(())
    }

    fn execute_script(
        &mut self,
        script: &str,
        args: &[&ElementHandle],
    ) -> Result<Value, BrowserError> {
        let mut page = self.live()?;
        if let Some((_, result)) = page.scripts.iter().find(|(needle, _)| script.contains(needle.as_str())) {
            return Ok(result.clone());
        }
        if script == scripts::READY_STATE {
            return Ok(json!("complete"));
        }
        if script == scripts::VIEWPORT_METRICS {
            return Ok(page.metrics.clone());
        }
        if script == scripts::JS_CLICK {
            let Some(handle) = args.first() else {
                return Err(BrowserError::Script("no element argument".to_string()));
            };
            let effects = page.element(handle)?.on_click.clone();
            page.log.push(format!("js-click {}", handle.id()));
            page.apply(effects);
            return Ok(json!(true));
        }
        if script == scripts::SCROLL_INTO_VIEW || script == scripts::IN_VIEWPORT {
            return Ok(json!(true));
        }
        page.log.push(format!("script {}", script));
        Ok(Value::Null)
    }

    fn set_window_size(&mut self, width: u32, height: u32) -> Result<(), BrowserError> {
        let mut page = self.live()?;
        page.window = (width, height);
        page.log.push(format!("resize {}x{}", width, height));
        Ok(())
    }

    fn screenshot_png(&mut self) -> Result<Vec<u8>, BrowserError> {
        let mut page = self.live()?;
        page.screenshots += 1;
        Ok(vec![0x89, b'P', b'N', b'G', b'\r', b'\n', 0x1a, b'\n'])
    }

    fn quit(&mut self) -> Result<(), BrowserError> {
        let mut page = self.page.borrow_mut();
        page.quit = true;
        page.log.push("quit".to_string());
        Ok(())
    }
}

// ============================================================================
// FakeFactory: hands out a fresh fake per scenario
// ============================================================================

pub struct FakeFactory {
    build: Box<dyn FnMut() -> FakeBrowser>,
    fail: bool,
    pub sessions: Vec<FakeBrowser>,
}

impl FakeFactory {
    pub fn new(build: impl FnMut() -> FakeBrowser + 'static) -> Self {
        FakeFactory {
            build: Box::new(build),
            fail: false,
            sessions: Vec::new(),
        }
    }

    /// A factory whose driver is unreachable.
    pub fn failing() -> Self {
        FakeFactory {
            build: Box::new(FakeBrowser::new),
            fail: true,
            sessions: Vec::new(),
        }
    }
}

impl SessionFactory for FakeFactory {
    fn create(&mut self) -> Result<Box<dyn Browser>, BrowserError> {
        if self.fail {
            return Err(BrowserError::InvalidSession("driver not reachable".to_string()));
        }
        let browser = (self.build)();
        self.sessions.push(browser.clone());
        Ok(Box::new(browser))
    }
}
