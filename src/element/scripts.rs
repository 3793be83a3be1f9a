//! Page-side scripts run through `Browser::execute_script`.

/// Current `document.readyState`.
pub const READY_STATE: &str = "return document.readyState";

/// Document vs viewport extents, used for scroll and layout checks.
pub const VIEWPORT_METRICS: &str = "return {\
scrollWidth: Math.max(document.body.scrollWidth, document.documentElement.scrollWidth), \
innerWidth: window.innerWidth, \
scrollHeight: Math.max(document.body.scrollHeight, document.documentElement.scrollHeight), \
innerHeight: window.innerHeight}";

pub const SCROLL_INTO_VIEW: &str =
    "arguments[0].scrollIntoView({block: 'center', inline: 'nearest'}); return true";

/// Whether `arguments[0]` intersects the viewport.
pub const IN_VIEWPORT: &str = "var r = arguments[0].getBoundingClientRect(); \
return r.bottom > 0 && r.right > 0 && \
r.top < (window.innerHeight || document.documentElement.clientHeight) && \
r.left < (window.innerWidth || document.documentElement.clientWidth)";

/// Click dispatched from the page, for elements a native click cannot reach.
pub const JS_CLICK: &str = "arguments[0].click(); return true";

/// Stylesheets present and at least one script loaded.
pub const RESOURCES_AVAILABLE: &str = "return document.styleSheets.length > 0 && \
(typeof jQuery !== 'undefined' || document.querySelector('script') !== null)";

pub const SCROLL_TO_BOTTOM: &str = "window.scrollTo(0, document.body.scrollHeight); return true";

pub const SCROLL_TO_TOP: &str = "window.scrollTo(0, 0); return true";
