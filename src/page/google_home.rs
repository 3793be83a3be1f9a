use tracing::{debug, info};

use crate::browser::capability::{ENTER_KEY, ElementHandle};
use crate::browser::error::BrowserError;
use crate::element::access::ElementAccess;
use crate::element::outcome::Outcome;
use crate::element::wait::WaitError;
use crate::locator::google as loc;
use crate::page::{ElementQueryable, Navigable, settle_navigation};

/// Google Search landing page.
pub struct GoogleHomePage<'b> {
    access: ElementAccess<'b>,
    url: String,
}

impl<'b> GoogleHomePage<'b> {
    pub fn new(access: ElementAccess<'b>, url: &str) -> Self {
        Self {
            access,
            url: url.to_string(),
        }
    }

    /// The search input, trying the `name=q` input before the textarea
    /// variant.
    fn search_box(&mut self) -> Result<Option<ElementHandle>, BrowserError> {
        for locator in [&loc::SEARCH_BOX, &loc::SEARCH_BOX_ALTERNATIVE] {
            if let Some(handle) = self.access.find_one(locator).into_option()? {
                return Ok(Some(handle));
            }
        }
        Ok(None)
    }

    pub fn is_search_box_visible(&mut self) -> Result<bool, BrowserError> {
        match self.search_box()? {
            Some(handle) => self.access.element_visible(&handle).holds(),
            None => Ok(false),
        }
    }

    pub fn enter_search_term(&mut self, term: &str) -> Result<bool, BrowserError> {
        let Some(search_box) = self.search_box()? else {
            return Ok(false);
        };
        let browser = self.access.browser();
        let typed = browser
            .clear(&search_box)
            .and_then(|_| browser.send_keys(&search_box, term));
        let typed = Outcome::from_result(typed).into_option()?.is_some();
        if typed {
            info!("Entered search term '{}'", term);
        }
        Ok(typed)
    }

    /// Click "Google Search". The button is often covered by the suggestion
    /// list, so a failed native click is retried as a page-side click.
    pub fn click_search_button(&mut self) -> Result<bool, BrowserError> {
        for locator in [&loc::SEARCH_BUTTON, &loc::SEARCH_BUTTON_ALTERNATIVE] {
            let Some(button) = self.access.find_one(locator).into_option()? else {
                continue;
            };
            let clicked = match self.access.click_handle(&button) {
                Outcome::Found(()) => true,
                Outcome::NotFound => {
                    debug!("native click on {} failed, using script click", locator);
                    self.access.js_click(&button).into_option()?.is_some()
                }
                Outcome::Errored(e) => return Err(e),
            };
            if clicked {
                settle_navigation(&mut self.access)?;
                info!("Clicked Google Search button");
                return Ok(true);
            }
        }
        Ok(false)
    }

    pub fn press_enter(&mut self) -> Result<bool, BrowserError> {
        let Some(search_box) = self.search_box()? else {
            return Ok(false);
        };
        let pressed = self.access.browser().send_keys(&search_box, ENTER_KEY);
        if Outcome::from_result(pressed).into_option()?.is_none() {
            return Ok(false);
        }
        settle_navigation(&mut self.access)?;
        Ok(true)
    }

    /// Type `term` and submit it, then wait for the results URL.
    pub fn search_for(&mut self, term: &str, use_enter: bool) -> Result<bool, BrowserError> {
        if !self.enter_search_term(term)? {
            return Ok(false);
        }
        let submitted = if use_enter {
            self.press_enter()?
        } else {
            self.click_search_button()? || self.press_enter()?
        };
        if !submitted {
            return Ok(false);
        }
        match self.access.wait_for_url("results URL", |url| url.contains("search?")) {
            Ok(url) => debug!("landed on {}", url),
            Err(WaitError::TimedOut { .. }) => debug!("results URL did not appear"),
            Err(WaitError::Browser(e)) => return Err(e),
        }
        Ok(true)
    }

    pub fn click_feeling_lucky(&mut self) -> Result<bool, BrowserError> {
        let Some(button) = self.access.find_one(&loc::FEELING_LUCKY_BUTTON).into_option()? else {
            return Ok(false);
        };
        let clicked = match self.access.click_handle(&button) {
            Outcome::Found(()) => true,
            Outcome::NotFound => self.access.js_click(&button).into_option()?.is_some(),
            Outcome::Errored(e) => return Err(e),
        };
        if clicked {
            settle_navigation(&mut self.access)?;
        }
        Ok(clicked)
    }

    pub fn are_suggestions_visible(&mut self) -> Result<bool, BrowserError> {
        self.access.visibility(&loc::SUGGESTIONS_CONTAINER).holds()
    }

    pub fn suggestions(&mut self) -> Result<Vec<String>, BrowserError> {
        let mut texts = Vec::new();
        for item in self.access.try_find_all(&loc::SUGGESTIONS)? {
            let text = self.access.element_text(&item).or_empty()?;
            if !text.trim().is_empty() {
                texts.push(text);
            }
        }
        Ok(texts)
    }

    /// Any of the known logo variants is displayed, checked in order.
    pub fn is_logo_visible(&mut self) -> Result<bool, BrowserError> {
        for locator in &loc::LOGO_CANDIDATES {
            match self.access.visibility(locator) {
                Outcome::Found(true) => return Ok(true),
                Outcome::Found(false) | Outcome::NotFound => continue,
                Outcome::Errored(e) => return Err(e),
            }
        }
        Ok(false)
    }

    pub fn search_box_text(&mut self) -> Result<String, BrowserError> {
        match self.search_box()? {
            Some(handle) => self.access.element_attribute(&handle, "value").or_empty(),
            None => Ok(String::new()),
        }
    }

    pub fn clear_search_box(&mut self) -> Result<bool, BrowserError> {
        let Some(search_box) = self.search_box()? else {
            return Ok(false);
        };
        let cleared = self.access.browser().clear(&search_box);
        Ok(Outcome::from_result(cleared).into_option()?.is_some())
    }

    pub fn is_search_box_empty(&mut self) -> Result<bool, BrowserError> {
        Ok(self.search_box_text()?.trim().is_empty())
    }
}

impl<'b> Navigable for GoogleHomePage<'b> {
    fn url(&self) -> &str {
        &self.url
    }

    fn open(&mut self) -> Result<&mut Self, BrowserError> {
        self.access.navigate(&self.url)?;
        settle_navigation(&mut self.access)?;
        match self.access.wait_until_visible(&loc::SEARCH_BOX, None) {
            Ok(_) => info!("Opened Google home page"),
            Err(WaitError::TimedOut { .. }) => debug!("search box not visible after open"),
            Err(WaitError::Browser(e)) => return Err(e),
        }
        Ok(self)
    }

    /// On a Google domain with the search box visible.
    fn is_loaded(&mut self) -> Result<bool, BrowserError> {
        let url = self.access.current_url()?;
        Ok(url.to_lowercase().contains("google") && self.is_search_box_visible()?)
    }
}

impl<'b> ElementQueryable<'b> for GoogleHomePage<'b> {
    fn access(&mut self) -> &mut ElementAccess<'b> {
        &mut self.access
    }
}
