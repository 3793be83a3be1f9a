use std::time::Duration;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use reqwest::Method;
use reqwest::blocking::Client;
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::{debug, info, warn};

use crate::browser::capability::{Browser, ElementHandle, Rect};
use crate::browser::error::BrowserError;
use crate::locator::registry::{Locator, Strategy};

/// Key under which W3C WebDriver serializes element references.
pub const ELEMENT_KEY: &str = "element-6066-11e4-a52e-4f735466cecf";

/// How to reach the driver and what browser to ask it for.
#[derive(Debug, Clone)]
pub struct WebDriverOptions {
    /// Base URL of a running driver, e.g. `http://localhost:9515`.
    pub webdriver_url: String,
    /// `chrome` or `firefox`.
    pub browser: String,
    pub headless: bool,
    pub window_width: u32,
    pub window_height: u32,
    /// Extra command-line switches handed to the browser.
    pub args: Vec<String>,
    /// HTTP timeout for a single driver command.
    pub command_timeout: Duration,
}

impl Default for WebDriverOptions {
    fn default() -> Self {
        WebDriverOptions {
            webdriver_url: "http://localhost:9515".into(),
            browser: "chrome".into(),
            headless: false,
            window_width: 1920,
            window_height: 1080,
            args: Vec::new(),
            command_timeout: Duration::from_secs(60),
        }
    }
}

impl WebDriverOptions {
    /// New-session payload with vendor options for the chosen browser.
    pub fn capabilities(&self) -> Value {
        let mut args = self.args.clone();
        let always_match = match self.browser.to_ascii_lowercase().as_str() {
            "firefox" => {
                if self.headless {
                    args.push("-headless".into());
                }
                json!({
                    "browserName": "firefox",
                    "moz:firefoxOptions": { "args": args },
                })
            }
            _ => {
                if self.headless {
                    args.push("--headless=new".into());
                }
                args.push(format!(
                    "--window-size={},{}",
                    self.window_width, self.window_height
                ));
                json!({
                    "browserName": "chrome",
                    "goog:chromeOptions": { "args": args },
                })
            }
        };
        json!({ "capabilities": { "alwaysMatch": always_match } })
    }
}

#[derive(Debug, Deserialize)]
struct DriverFailure {
    error: String,
    #[serde(default)]
    message: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NewSession {
    session_id: String,
}

/// A browser session held by a W3C WebDriver server.
///
/// Every `Browser` call is one HTTP round trip to
/// `<webdriver_url>/session/<id>/...`. The session is deleted by `quit`, and
/// best-effort on drop.
pub struct WebDriverSession {
    client: Client,
    base_url: String,
    session_id: String,
    closed: bool,
}

impl WebDriverSession {
    /// Open a new session on an already running driver.
    pub fn launch(options: &WebDriverOptions) -> Result<Self, BrowserError> {
        let client = Client::builder()
            .timeout(options.command_timeout)
            .build()
            .map_err(|e| BrowserError::Transport {
                context: "building HTTP client".into(),
                source: e,
            })?;
        let base_url = options.webdriver_url.trim_end_matches('/').to_string();

        let value = send_raw(
            &client,
            Method::POST,
            &format!("{}/session", base_url),
            Some(options.capabilities()),
            "new session",
        )?;
        let created: NewSession =
            serde_json::from_value(value).map_err(|e| BrowserError::JsonParse {
                context: "new session response".into(),
                source: e,
            })?;

        info!(
            "Started {} session {} via {}",
            options.browser, created.session_id, base_url
        );

        let mut session = WebDriverSession {
            client,
            base_url,
            session_id: created.session_id,
            closed: false,
        };
        if options.browser.eq_ignore_ascii_case("firefox") {
            session.set_window_size(options.window_width, options.window_height)?;
        }
        Ok(session)
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    fn send(&self, method: Method, path: &str, body: Option<Value>, command: &str) -> Result<Value, BrowserError> {
        if self.closed {
            return Err(BrowserError::InvalidSession(format!(
                "session {} already quit",
                self.session_id
            )));
        }
        let url = format!("{}/session/{}{}", self.base_url, self.session_id, path);
        send_raw(&self.client, method, &url, body, command)
    }

    fn get(&self, path: &str, command: &str) -> Result<Value, BrowserError> {
        self.send(Method::GET, path, None, command)
    }

    fn post(&self, path: &str, body: Value, command: &str) -> Result<Value, BrowserError> {
        self.send(Method::POST, path, Some(body), command)
    }

    fn get_string(&self, path: &str, command: &str) -> Result<String, BrowserError> {
        let value = self.get(path, command)?;
        Ok(value.as_str().unwrap_or_default().to_string())
    }

    fn get_bool(&self, path: &str, command: &str) -> Result<bool, BrowserError> {
        Ok(self.get(path, command)?.as_bool().unwrap_or(false))
    }

    fn element_path(element: &ElementHandle, suffix: &str) -> String {
        format!("/element/{}{}", element.id(), suffix)
    }
}

impl Browser for WebDriverSession {
    fn navigate(&mut self, url: &str) -> Result<(), BrowserError> {
        self.post("/url", json!({ "url": url }), "navigate")?;
        Ok(())
    }

    fn current_url(&mut self) -> Result<String, BrowserError> {
        self.get_string("/url", "current url")
    }

    fn title(&mut self) -> Result<String, BrowserError> {
        self.get_string("/title", "title")
    }

    fn page_source(&mut self) -> Result<String, BrowserError> {
        self.get_string("/source", "page source")
    }

    fn find_elements(&mut self, locator: &Locator) -> Result<Vec<ElementHandle>, BrowserError> {
        let value = self.post("/elements", locator_body(locator), "find elements")?;
        Ok(element_handles(&value))
    }

    fn find_child_elements(
        &mut self,
        parent: &ElementHandle,
        locator: &Locator,
    ) -> Result<Vec<ElementHandle>, BrowserError> {
        let path = Self::element_path(parent, "/elements");
        let value = self.post(&path, locator_body(locator), "find child elements")?;
        Ok(element_handles(&value))
    }

    fn text(&mut self, element: &ElementHandle) -> Result<String, BrowserError> {
        self.get_string(&Self::element_path(element, "/text"), "element text")
    }

    fn attribute(
        &mut self,
        element: &ElementHandle,
        name: &str,
    ) -> Result<Option<String>, BrowserError> {
        let path = Self::element_path(element, &format!("/attribute/{}", name));
        if let Some(value) = scalar_string(&self.get(&path, "element attribute")?) {
            return Ok(Some(value));
        }
        let path = Self::element_path(element, &format!("/property/{}", name));
        Ok(scalar_string(&self.get(&path, "element property")?))
    }

    fn is_displayed(&mut self, element: &ElementHandle) -> Result<bool, BrowserError> {
        self.get_bool(&Self::element_path(element, "/displayed"), "is displayed")
    }

    fn is_enabled(&mut self, element: &ElementHandle) -> Result<bool, BrowserError> {
        self.get_bool(&Self::element_path(element, "/enabled"), "is enabled")
    }

    fn rect(&mut self, element: &ElementHandle) -> Result<Rect, BrowserError> {
        let value = self.get(&Self::element_path(element, "/rect"), "element rect")?;
        serde_json::from_value(value).map_err(|e| BrowserError::JsonParse {
            context: "element rect".into(),
            source: e,
        })
    }

    fn click(&mut self, element: &ElementHandle) -> Result<(), BrowserError> {
        self.post(&Self::element_path(element, "/click"), json!({}), "click")?;
        Ok(())
    }

    fn clear(&mut self, element: &ElementHandle) -> Result<(), BrowserError> {
        self.post(&Self::element_path(element, "/clear"), json!({}), "clear")?;
        Ok(())
    }

    fn send_keys(&mut self, element: &ElementHandle, text: &str) -> Result<(), BrowserError> {
        let path = Self::element_path(element, "/value");
        self.post(&path, json!({ "text": text }), "send keys")?;
        Ok(())
    }

    fn hover(&mut self, element: &ElementHandle) -> Result<(), BrowserError> {
        let actions = json!({
            "actions": [{
                "type": "pointer",
                "id": "mouse",
                "parameters": { "pointerType": "mouse" },
                "actions": [{
                    "type": "pointerMove",
                    "duration": 100,
                    "origin": element_reference(element),
                    "x": 0,
                    "y": 0,
                }],
            }]
        });
        self.post("/actions", actions, "hover")?;
        Ok(())
    }

    fn execute_script(
        &mut self,
        script: &str,
        args: &[&ElementHandle],
    ) -> Result<Value, BrowserError> {
        let args: Vec<Value> = args.iter().map(|h| element_reference(h)).collect();
        self.post(
            "/execute/sync",
            json!({ "script": script, "args": args }),
            "execute script",
        )
    }

    fn set_window_size(&mut self, width: u32, height: u32) -> Result<(), BrowserError> {
        self.post(
            "/window/rect",
            json!({ "width": width, "height": height }),
            "set window rect",
        )?;
        Ok(())
    }

    fn screenshot_png(&mut self) -> Result<Vec<u8>, BrowserError> {
        let encoded = self.get_string("/screenshot", "screenshot")?;
        Ok(STANDARD.decode(encoded.as_bytes())?)
    }

    fn quit(&mut self) -> Result<(), BrowserError> {
        if self.closed {
            return Ok(());
        }
        let result = self.send(Method::DELETE, "", None, "delete session");
        self.closed = true;
        debug!("Session {} closed", self.session_id);
        result.map(|_| ())
    }
}

impl Drop for WebDriverSession {
    fn drop(&mut self) {
        if !self.closed {
            if let Err(e) = self.quit() {
                warn!("Failed to quit session {}: {}", self.session_id, e);
            }
        }
    }
}

/// One HTTP exchange with the driver. Returns the `value` member of the
/// response body, or the driver's error mapped onto [`BrowserError`].
fn send_raw(
    client: &Client,
    method: Method,
    url: &str,
    body: Option<Value>,
    command: &str,
) -> Result<Value, BrowserError> {
    debug!("{} {}", method, url);
    let mut request = client.request(method, url);
    if let Some(body) = body {
        request = request.json(&body);
    }
    let response = request.send().map_err(|e| BrowserError::Transport {
        context: command.to_string(),
        source: e,
    })?;
    let status = response.status();
    let text = response.text().map_err(|e| BrowserError::Transport {
        context: format!("{} response body", command),
        source: e,
    })?;

    let mut payload: Value = serde_json::from_str(&text).map_err(|e| BrowserError::JsonParse {
        context: format!("{} response", command),
        source: e,
    })?;
    let value = payload
        .get_mut("value")
        .map(Value::take)
        .unwrap_or(Value::Null);

    if status.is_success() {
        return Ok(value);
    }
    match serde_json::from_value::<DriverFailure>(value) {
        Ok(DriverFailure { error, message }) => Err(classify_failure(command, &error, message)),
        Err(_) => Err(BrowserError::Protocol {
            command: command.to_string(),
            error: format!("HTTP {}", status),
        }),
    }
}

/// Map a W3C error code to the error kind the element layer reasons about.
/// Only element lookup timeouts are `Timeout`; a timed-out script is a script
/// failure.
pub fn classify_failure(command: &str, error: &str, message: String) -> BrowserError {
    match error {
        "no such element" => BrowserError::no_such_element(message),
        "stale element reference" => BrowserError::StaleElement(message),
        "element not interactable" | "element click intercepted" => {
            BrowserError::NotInteractable(message)
        }
        "invalid session id" | "no such window" => BrowserError::InvalidSession(message),
        "javascript error" | "script timeout" => BrowserError::Script(message),
        "timeout" => BrowserError::Timeout {
            condition: format!("{}: {}", command, message),
            waited_ms: 0,
        },
        _ => BrowserError::Protocol {
            command: command.to_string(),
            error: format!("{}: {}", error, message),
        },
    }
}

/// W3C only knows css, xpath, link text and tag name; id and name are
/// rewritten as attribute selectors.
pub fn locator_body(locator: &Locator) -> Value {
    let (using, value) = match locator.strategy {
        Strategy::Css => ("css selector", locator.expression.to_string()),
        Strategy::XPath => ("xpath", locator.expression.to_string()),
        Strategy::Id => ("css selector", attribute_selector("id", &locator.expression)),
        Strategy::Name => ("css selector", attribute_selector("name", &locator.expression)),
        Strategy::LinkText => ("link text", locator.expression.to_string()),
        Strategy::TagName => ("tag name", locator.expression.to_string()),
    };
    json!({ "using": using, "value": value })
}

fn attribute_selector(attribute: &str, value: &str) -> String {
    format!(
        "[{}=\"{}\"]",
        attribute,
        value.replace('\\', "\\\\").replace('"', "\\\"")
    )
}

fn element_reference(handle: &ElementHandle) -> Value {
    json!({ ELEMENT_KEY: handle.id() })
}

fn element_handles(value: &Value) -> Vec<ElementHandle> {
    value
        .as_array()
        .map(|items| {
            items
                .iter()
                .filter_map(|item| item.get(ELEMENT_KEY).and_then(Value::as_str))
                .map(ElementHandle::new)
                .collect()
        })
        .unwrap_or_default()
}

fn scalar_string(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}
