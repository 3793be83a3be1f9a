pub mod google_home;
pub mod google_results;
pub mod home;
pub mod layout;
pub mod login;
pub mod mens;
pub mod signup;

use std::fmt;

use tracing::debug;

use crate::browser::error::BrowserError;
use crate::element::access::ElementAccess;
use crate::element::wait::WaitError;
use crate::locator::registry::Locator;

pub use google_home::GoogleHomePage;
pub use google_results::GoogleResultsPage;
pub use home::HomePage;
pub use layout::Viewport;
pub use login::LoginModal;
pub use mens::MensPage;
pub use signup::SignUpModal;

/// Identifies a page model, used to track which pages a scenario has opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PageId {
    EliteHome,
    LoginModal,
    SignUpModal,
    Mens,
    GoogleHome,
    GoogleResults,
}

impl fmt::Display for PageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PageId::EliteHome => "Elite Shoppy home page",
            PageId::LoginModal => "Sign In modal",
            PageId::SignUpModal => "Sign Up modal",
            PageId::Mens => "Mens page",
            PageId::GoogleHome => "Google home page",
            PageId::GoogleResults => "Google results page",
        };
        f.write_str(name)
    }
}

/// A page reachable by URL.
pub trait Navigable {
    fn url(&self) -> &str;

    /// Navigate to [`url`](Navigable::url) and wait for the page's loaded signal.
    fn open(&mut self) -> Result<&mut Self, BrowserError>
    where
        Self: Sized;

    /// Whether the page's canonical element is present. Repeated calls
    /// without navigation in between give the same answer.
    fn is_loaded(&mut self) -> Result<bool, BrowserError>;
}

/// A page backed by an [`ElementAccess`] layer.
pub trait ElementQueryable<'b> {
    fn access(&mut self) -> &mut ElementAccess<'b>;

    fn is_visible(&mut self, locator: &Locator) -> Result<bool, BrowserError> {
        self.access().visibility(locator).holds()
    }

    fn read_text(&mut self, locator: &Locator) -> Result<String, BrowserError> {
        self.access().try_read_text(locator).or_empty()
    }

    fn current_url(&mut self) -> Result<String, BrowserError> {
        self.access().current_url()
    }

    fn page_source(&mut self) -> Result<String, BrowserError> {
        self.access().page_source()
    }

    fn title(&mut self) -> Result<String, BrowserError> {
        self.access().title()
    }
}

/// Wait for the document to finish loading after a navigation-triggering
/// action. A page that is still loading when the budget runs out is left to
/// the following checks.
pub(crate) fn settle_navigation(access: &mut ElementAccess<'_>) -> Result<(), BrowserError> {
    match access.wait_for_document_ready() {
        Ok(()) => Ok(()),
        Err(WaitError::TimedOut { waited_ms, .. }) => {
            debug!("document not ready after {}ms", waited_ms);
            Ok(())
        }
        Err(WaitError::Browser(e)) => Err(e),
    }
}

/// Wait for the element whose presence marks a page as loaded. A page that
/// never shows it is left for `is_loaded` to report.
pub(crate) fn await_loaded_signal(
    access: &mut ElementAccess<'_>,
    locator: &Locator,
) -> Result<bool, BrowserError> {
    match access.wait_until_present(locator, None) {
        Ok(_) => Ok(true),
        Err(WaitError::TimedOut { .. }) => {
            debug!("{} not present after open", locator);
            Ok(false)
        }
        Err(WaitError::Browser(e)) => Err(e),
    }
}

/// Lowercased path component of a URL, without scheme, host, query or fragment.
pub(crate) fn url_path(url: &str) -> String {
    let without_scheme = url.split_once("://").map_or(url, |(_, rest)| rest);
    let path = without_scheme
        .find('/')
        .map_or("", |i| &without_scheme[i..]);
    let end = path.find(['?', '#']).unwrap_or(path.len());
    path[..end].to_lowercase()
}
