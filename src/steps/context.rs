use std::any::{Any, type_name};
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::browser::capability::Browser;
use crate::element::access::ElementAccess;
use crate::element::wait::WaitPolicy;
use crate::page::{
    GoogleHomePage, GoogleResultsPage, HomePage, LoginModal, MensPage, Navigable, PageId,
    SignUpModal,
};
use crate::steps::StepFailure;

/// Keys the bundled step libraries store in the scenario context.
pub mod keys {
    pub const SEARCH_TERM: &str = "search_term";
    pub const SEARCH_TERMS: &str = "search_terms";
    pub const RESULTS_COUNT: &str = "results_count";
    pub const PREVIOUS_TITLES: &str = "previous_result_titles";
    pub const URL_BEFORE_CLICK: &str = "url_before_click";
    pub const LOAD_TIME: &str = "load_time";
    pub const SORT_OPTION: &str = "sort_option";
    pub const EMAIL: &str = "email";
    pub const EMAIL_VALID: &str = "email_valid";
    pub const NAME: &str = "name";
    pub const NAME_VALID: &str = "name_valid";
    pub const PASSWORD: &str = "password";
    pub const PASSWORD_VALID: &str = "password_valid";
}

/// URLs of the sites under test.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Sites {
    pub elite_home_url: String,
    pub elite_mens_url: String,
    pub google_url: String,
}

impl Default for Sites {
    fn default() -> Self {
        Self {
            elite_home_url: "https://adoring-pasteur-3ae17d.netlify.app/".to_string(),
            elite_mens_url: "https://adoring-pasteur-3ae17d.netlify.app/mens".to_string(),
            google_url: "https://www.google.co.in".to_string(),
        }
    }
}

/// State shared by the steps of one scenario.
///
/// Owns the scenario's browser session. Pages are built on demand and borrow
/// the session for as long as a step uses them; which pages the scenario has
/// reached is tracked so a step cannot act on a page nobody opened.
pub struct ScenarioContext {
    scenario: String,
    browser: Box<dyn Browser>,
    sites: Sites,
    policy: WaitPolicy,
    screenshot_dir: Option<PathBuf>,
    values: HashMap<String, Box<dyn Any>>,
    opened: HashSet<PageId>,
}

impl ScenarioContext {
    pub fn new(scenario: &str, browser: Box<dyn Browser>, sites: Sites, policy: WaitPolicy) -> Self {
        Self {
            scenario: scenario.to_string(),
            browser,
            sites,
            policy,
            screenshot_dir: None,
            values: HashMap::new(),
            opened: HashSet::new(),
        }
    }

    pub fn with_screenshot_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.screenshot_dir = Some(dir.into());
        self
    }

    pub fn scenario_name(&self) -> &str {
        &self.scenario
    }

    pub fn sites(&self) -> &Sites {
        &self.sites
    }

    pub fn policy(&self) -> WaitPolicy {
        self.policy
    }

    pub fn screenshot_dir(&self) -> Option<&Path> {
        self.screenshot_dir.as_deref()
    }

    // ========================================================================
    // Typed values
    // ========================================================================

    pub fn set<T: Any>(&mut self, key: &str, value: T) {
        self.values.insert(key.to_string(), Box::new(value));
    }

    pub fn get<T: Any>(&self, key: &str) -> Result<&T, StepFailure> {
        let value = self.values.get(key).ok_or_else(|| missing(key))?;
        value.downcast_ref::<T>().ok_or_else(|| wrong_type::<T>(key))
    }

    pub fn get_mut<T: Any>(&mut self, key: &str) -> Result<&mut T, StepFailure> {
        let value = self.values.get_mut(key).ok_or_else(|| missing(key))?;
        value.downcast_mut::<T>().ok_or_else(|| wrong_type::<T>(key))
    }

    pub fn get_or_insert_with<T: Any>(
        &mut self,
        key: &str,
        default: impl FnOnce() -> T,
    ) -> Result<&mut T, StepFailure> {
        let value = self
            .values
            .entry(key.to_string())
            .or_insert_with(|| Box::new(default()) as Box<dyn Any>);
        value.downcast_mut::<T>().ok_or_else(|| wrong_type::<T>(key))
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn remove(&mut self, key: &str) -> bool {
        self.values.remove(key).is_some()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    // ========================================================================
    // Browser & pages
    // ========================================================================

    pub fn browser(&mut self) -> &mut dyn Browser {
        self.browser.as_mut()
    }

    /// Element access without a page model, for generic steps.
    pub fn access(&mut self) -> ElementAccess<'_> {
        ElementAccess::new(self.browser.as_mut(), self.policy)
    }

    /// Record that the scenario reached `page` through an interaction.
    pub fn mark_entered(&mut self, page: PageId) {
        self.opened.insert(page);
    }

    pub fn is_opened(&self, page: PageId) -> bool {
        self.opened.contains(&page)
    }

    fn require(&self, page: PageId) -> Result<(), StepFailure> {
        if self.opened.contains(&page) {
            Ok(())
        } else {
            Err(StepFailure::PageNotOpened(page))
        }
    }

    pub fn open_home_page(&mut self) -> Result<HomePage<'_>, StepFailure> {
        let access = ElementAccess::new(self.browser.as_mut(), self.policy);
        let mut page = HomePage::new(access, &self.sites.elite_home_url);
        page.open()?;
        self.opened.insert(PageId::EliteHome);
        Ok(page)
    }

    pub fn home_page(&mut self) -> Result<HomePage<'_>, StepFailure> {
        self.require(PageId::EliteHome)?;
        let access = ElementAccess::new(self.browser.as_mut(), self.policy);
        Ok(HomePage::new(access, &self.sites.elite_home_url))
    }

    pub fn open_mens_page(&mut self) -> Result<MensPage<'_>, StepFailure> {
        let access = ElementAccess::new(self.browser.as_mut(), self.policy);
        let mut page = MensPage::new(access, &self.sites.elite_mens_url);
        page.open()?;
        self.opened.insert(PageId::Mens);
        Ok(page)
    }

    pub fn mens_page(&mut self) -> Result<MensPage<'_>, StepFailure> {
        self.require(PageId::Mens)?;
        let access = ElementAccess::new(self.browser.as_mut(), self.policy);
        Ok(MensPage::new(access, &self.sites.elite_mens_url))
    }

    pub fn open_google_home(&mut self) -> Result<GoogleHomePage<'_>, StepFailure> {
        let access = ElementAccess::new(self.browser.as_mut(), self.policy);
        let mut page = GoogleHomePage::new(access, &self.sites.google_url);
        page.open()?;
        self.opened.insert(PageId::GoogleHome);
        Ok(page)
    }

    pub fn google_home(&mut self) -> Result<GoogleHomePage<'_>, StepFailure> {
        self.require(PageId::GoogleHome)?;
        let access = ElementAccess::new(self.browser.as_mut(), self.policy);
        Ok(GoogleHomePage::new(access, &self.sites.google_url))
    }

    pub fn login_modal(&mut self) -> Result<LoginModal<'_>, StepFailure> {
        self.require(PageId::LoginModal)?;
        Ok(LoginModal::new(self.access()))
    }

    pub fn signup_modal(&mut self) -> Result<SignUpModal<'_>, StepFailure> {
        self.require(PageId::SignUpModal)?;
        Ok(SignUpModal::new(self.access()))
    }

    pub fn google_results(&mut self) -> Result<GoogleResultsPage<'_>, StepFailure> {
        self.require(PageId::GoogleResults)?;
        Ok(GoogleResultsPage::new(self.access()))
    }

    /// Give the session back to the lifecycle hooks at scenario end.
    pub fn into_browser(self) -> Box<dyn Browser> {
        self.browser
    }
}

fn missing(key: &str) -> StepFailure {
    StepFailure::MissingContext {
        key: key.to_string(),
    }
}

fn wrong_type<T>(key: &str) -> StepFailure {
    StepFailure::WrongType {
        key: key.to_string(),
        expected: type_name::<T>(),
    }
}
