use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, info};

use crate::browser::capability::ElementHandle;
use crate::browser::error::BrowserError;
use crate::element::access::ElementAccess;
use crate::element::outcome::Outcome;
use crate::element::scripts;
use crate::element::wait::WaitError;
use crate::locator::google as loc;
use crate::page::{ElementQueryable, settle_navigation};

/// First number in a result-stats line, thousands separators included.
static STATS_NUMBER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\d[\d,.\u{00A0}]*").expect("result stats pattern is valid")
});

/// Google results page, reached by submitting a search.
pub struct GoogleResultsPage<'b> {
    access: ElementAccess<'b>,
}

impl<'b> GoogleResultsPage<'b> {
    pub fn new(access: ElementAccess<'b>) -> Self {
        Self { access }
    }

    /// URL is a search URL and the search box is present.
    pub fn is_loaded(&mut self) -> Result<bool, BrowserError> {
        if !self.access.current_url()?.contains("search?") {
            return Ok(false);
        }
        Ok(self.access.is_present(&loc::SEARCH_BOX)?
            || self.access.is_present(&loc::SEARCH_BOX_ALTERNATIVE)?)
    }

    /// Wait until result titles appear.
    pub fn wait_for_results(&mut self) -> Result<bool, BrowserError> {
        match self.access.wait_until_present(&loc::RESULT_TITLES, None) {
            Ok(_) => Ok(true),
            Err(WaitError::TimedOut { .. }) => Ok(false),
            Err(WaitError::Browser(e)) => Err(e),
        }
    }

    /// Result elements: headline titles when any exist, otherwise the result
    /// containers, otherwise the alternative containers.
    pub fn results(&mut self) -> Result<Vec<ElementHandle>, BrowserError> {
        for locator in [&loc::RESULT_TITLES, &loc::RESULTS, &loc::RESULTS_ALTERNATIVE] {
            let found = self.access.try_find_all(locator)?;
            if !found.is_empty() {
                return Ok(found);
            }
        }
        Ok(Vec::new())
    }

    /// Result titles that have text and are displayed.
    pub fn visible_result_count(&mut self) -> Result<usize, BrowserError> {
        let mut count = 0;
        for title in self.access.try_find_all(&loc::RESULT_TITLES)? {
            let text = self.access.element_text(&title).or_empty()?;
            if !text.trim().is_empty() && self.access.element_visible(&title).holds()? {
                count += 1;
            }
        }
        debug!("{} visible results", count);
        Ok(count)
    }

    pub fn result_stats_text(&mut self) -> Result<String, BrowserError> {
        self.access.try_read_text(&loc::RESULT_STATS).or_empty()
    }

    /// Total from the stats line, e.g. "About 1,234 results" gives 1234.
    /// Zero when the line is missing or has no number.
    pub fn total_results_count(&mut self) -> Result<u64, BrowserError> {
        Ok(parse_total_results(&self.result_stats_text()?))
    }

    /// Any spelling-correction marker is displayed, checked in order.
    pub fn is_did_you_mean_visible(&mut self) -> Result<bool, BrowserError> {
        Ok(self.did_you_mean_link()?.is_some())
    }

    fn did_you_mean_link(&mut self) -> Result<Option<ElementHandle>, BrowserError> {
        for locator in &loc::DID_YOU_MEAN_CANDIDATES {
            let Some(handle) = self.access.find_one(locator).into_option()? else {
                continue;
            };
            if self.access.element_visible(&handle).holds()? {
                return Ok(Some(handle));
            }
        }
        Ok(None)
    }

    pub fn did_you_mean_text(&mut self) -> Result<String, BrowserError> {
        match self.did_you_mean_link()? {
            Some(link) => self.access.element_text(&link).or_empty(),
            None => Ok(String::new()),
        }
    }

    pub fn click_did_you_mean(&mut self) -> Result<bool, BrowserError> {
        let Some(link) = self.did_you_mean_link()? else {
            return Ok(false);
        };
        if self.access.click_handle(&link).into_option()?.is_none() {
            return Ok(false);
        }
        settle_navigation(&mut self.access)?;
        Ok(true)
    }

    pub fn result_titles(&mut self) -> Result<Vec<String>, BrowserError> {
        let mut titles = Vec::new();
        for title in self.access.try_find_all(&loc::RESULT_TITLES)? {
            let text = self.access.element_text(&title).or_empty()?;
            if !text.trim().is_empty() {
                titles.push(text);
            }
        }
        Ok(titles)
    }

    pub fn click_result(&mut self, index: usize) -> Result<bool, BrowserError> {
        let results = self.results()?;
        let Some(result) = results.get(index) else {
            return Ok(false);
        };
        self.access.scroll_into_view(result).into_option()?;
        if self.access.click_handle(result).into_option()?.is_none() {
            return Ok(false);
        }
        settle_navigation(&mut self.access)?;
        info!("Opened result {}", index);
        Ok(true)
    }

    pub fn is_next_page_visible(&mut self) -> Result<bool, BrowserError> {
        self.access.visibility(&loc::NEXT_PAGE).holds()
    }

    pub fn click_next_page(&mut self) -> Result<bool, BrowserError> {
        self.click_pager(&loc::NEXT_PAGE)
    }

    pub fn is_previous_page_visible(&mut self) -> Result<bool, BrowserError> {
        self.access.visibility(&loc::PREVIOUS_PAGE).holds()
    }

    pub fn click_previous_page(&mut self) -> Result<bool, BrowserError> {
        self.click_pager(&loc::PREVIOUS_PAGE)
    }

    fn click_pager(&mut self, locator: &crate::locator::registry::Locator) -> Result<bool, BrowserError> {
        if self.access.try_click(locator).into_option()?.is_none() {
            return Ok(false);
        }
        settle_navigation(&mut self.access)?;
        Ok(true)
    }

    pub fn search_box_value(&mut self) -> Result<String, BrowserError> {
        for locator in [&loc::SEARCH_BOX, &loc::SEARCH_BOX_ALTERNATIVE] {
            match self.access.try_read_attribute(locator, "value") {
                Outcome::Found(value) => return Ok(value),
                Outcome::NotFound => continue,
                Outcome::Errored(e) => return Err(e),
            }
        }
        Ok(String::new())
    }

    pub fn is_search_box_visible(&mut self) -> Result<bool, BrowserError> {
        Ok(self.access.visibility(&loc::SEARCH_BOX).holds()?
            || self.access.visibility(&loc::SEARCH_BOX_ALTERNATIVE).holds()?)
    }

    pub fn has_results(&mut self) -> Result<bool, BrowserError> {
        Ok(!self.results()?.is_empty())
    }

    pub fn is_no_results_message_visible(&mut self) -> Result<bool, BrowserError> {
        self.access.visibility(&loc::NO_RESULTS_MESSAGE).holds()
    }

    pub fn scroll_to_result(&mut self, index: usize) -> Result<bool, BrowserError> {
        let results = self.results()?;
        let Some(result) = results.get(index) else {
            return Ok(false);
        };
        Ok(self.access.scroll_into_view(result).into_option()?.is_some())
    }

    pub fn scroll_to_bottom(&mut self) -> Result<(), BrowserError> {
        self.access.execute(scripts::SCROLL_TO_BOTTOM, &[])?;
        Ok(())
    }
}

impl<'b> ElementQueryable<'b> for GoogleResultsPage<'b> {
    fn access(&mut self) -> &mut ElementAccess<'b> {
        &mut self.access
    }
}

pub fn parse_total_results(stats: &str) -> u64 {
    STATS_NUMBER
        .find(stats)
        .map(|m| {
            m.as_str()
                .chars()
                .filter(char::is_ascii_digit)
                .collect::<String>()
        })
        .and_then(|digits| digits.parse().ok())
        .unwrap_or(0)
}
