use std::time::Duration;

use bdd_lab::browser::webdriver::{WebDriverOptions, WebDriverSession, classify_failure};
use bdd_lab::browser::{BrowserError, ElementHandle, Rect};
use bdd_lab::runner::{SessionFactory, WebDriverFactory};

fn unreachable_driver() -> WebDriverOptions {
    WebDriverOptions {
        webdriver_url: "http://127.0.0.1:1/".into(),
        command_timeout: Duration::from_secs(2),
        ..WebDriverOptions::default()
    }
}

// =========================================================================
// Session capabilities
// =========================================================================

#[test]
fn chrome_capabilities_carry_window_size() {
    let options = WebDriverOptions {
        args: vec!["--disable-notifications".into()],
        ..WebDriverOptions::default()
    };
    let caps = options.capabilities();
    let always = &caps["capabilities"]["alwaysMatch"];
    assert_eq!(always["browserName"], "chrome");
    let args = always["goog:chromeOptions"]["args"].as_array().unwrap();
    assert_eq!(args.len(), 2);
    assert_eq!(args[0], "--disable-notifications");
    assert_eq!(args[1], "--window-size=1920,1080");
}

#[test]
fn chrome_headless_flag_precedes_window_size() {
    let options = WebDriverOptions {
        headless: true,
        window_width: 375,
        window_height: 812,
        ..WebDriverOptions::default()
    };
    let caps = options.capabilities();
    let args = caps["capabilities"]["alwaysMatch"]["goog:chromeOptions"]["args"]
        .as_array()
        .unwrap();
    assert_eq!(args[0], "--headless=new");
    assert_eq!(args[1], "--window-size=375,812");
}

#[test]
fn firefox_capabilities_use_moz_options() {
    let options = WebDriverOptions {
        browser: "Firefox".into(),
        headless: true,
        ..WebDriverOptions::default()
    };
    let caps = options.capabilities();
    let always = &caps["capabilities"]["alwaysMatch"];
    assert_eq!(always["browserName"], "firefox");
    assert!(always.get("goog:chromeOptions").is_none());
    assert_eq!(always["moz:firefoxOptions"]["args"][0], "-headless");
}

// =========================================================================
// Session startup failures
// =========================================================================

#[test]
fn launch_without_driver_is_transport_error() {
    let err = WebDriverSession::launch(&unreachable_driver()).err().unwrap();
    assert!(matches!(err, BrowserError::Transport { .. }));
    assert!(!err.is_lookup());
    assert!(err.to_string().contains("new session"));
}

#[test]
fn factory_reports_unreachable_driver() {
    let mut factory = WebDriverFactory::new(unreachable_driver());
    assert_eq!(factory.options().webdriver_url, "http://127.0.0.1:1/");
    assert!(factory.create().is_err());
}

// =========================================================================
// Value types
// =========================================================================

#[test]
fn element_handles_compare_by_id() {
    let a = ElementHandle::new("e-1");
    assert_eq!(a, ElementHandle::new(String::from("e-1")));
    assert_ne!(a, ElementHandle::new("e-2"));
    assert_eq!(a.id(), "e-1");
}

#[test]
fn rect_deserializes_from_driver_payload() {
    let rect: Rect =
        serde_json::from_value(serde_json::json!({"x": 1.0, "y": 2.5, "width": 48, "height": 44}))
            .unwrap();
    assert_eq!(rect, Rect::new(1.0, 2.5, 48.0, 44.0));
}

#[test]
fn lookup_errors_are_classified() {
    assert!(BrowserError::no_such_element("#x").is_lookup());
    assert!(BrowserError::NotInteractable("covered".into()).is_lookup());
    assert!(!BrowserError::Script("boom".into()).is_lookup());
    assert_eq!(
        BrowserError::no_such_element("'logo' (css: #logo)").to_string(),
        "no element matches 'logo' (css: #logo)"
    );
}

#[test]
fn driver_timeouts_split_by_command_kind() {
    let script = classify_failure("execute/sync", "script timeout", "script ran too long".into());
    assert!(matches!(script, BrowserError::Script(ref m) if m == "script ran too long"));
    assert!(!script.is_lookup());

    let lookup = classify_failure("find element", "timeout", "implicit wait expired".into());
    assert!(matches!(lookup, BrowserError::Timeout { .. }));
    assert!(lookup.is_lookup());

    let gone = classify_failure("find element", "no such element", "#logo".into());
    assert!(gone.is_lookup());
    let unknown = classify_failure("get title", "unknown error", "boom".into());
    assert!(matches!(unknown, BrowserError::Protocol { .. }));
}
