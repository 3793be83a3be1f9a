//! Locators for Google Search (home and results pages).
//!
//! Google ships several markup generations at once, so many elements carry
//! alternatives that page models try in order.

use crate::locator::registry::{Locator, LocatorError, LocatorRegistry};

// ---- Home page ----
pub const SEARCH_BOX: Locator = Locator::by_name("search_box", "q");
pub const SEARCH_BOX_ALTERNATIVE: Locator =
    Locator::css("search_box_alternative", "textarea[name='q']");
pub const SEARCH_BUTTON: Locator = Locator::by_name("search_button", "btnK");
pub const SEARCH_BUTTON_ALTERNATIVE: Locator =
    Locator::css("search_button_alternative", "input[name='btnK']");
pub const FEELING_LUCKY_BUTTON: Locator = Locator::by_name("feeling_lucky_button", "btnI");
pub const SUGGESTIONS: Locator = Locator::css("suggestions", "ul[role='listbox'] li");
pub const SUGGESTIONS_CONTAINER: Locator =
    Locator::css("suggestions_container", "ul[role='listbox']");
pub const LOGO: Locator = Locator::css("logo", "img[alt*='Google']");
pub const LOGO_ALTERNATIVE: Locator = Locator::by_id("logo_alternative", "hplogo");
pub const LOGO_ALTERNATIVE2: Locator = Locator::css("logo_alternative2", "div[jsname] img");
pub const LOGO_ALTERNATIVE3: Locator =
    Locator::xpath("logo_alternative3", "//img[contains(@src, 'logo')]");
pub const FOOTER_LINKS: Locator = Locator::css("footer_links", "#fbar a");

// ---- Results page ----
pub const RESULTS: Locator = Locator::css("results", "div.g, div[data-sokoban-container]");
pub const RESULTS_ALTERNATIVE: Locator =
    Locator::css("results_alternative", "div[jscontroller][lang]");
pub const RESULT_LINKS: Locator =
    Locator::css("result_links", "div.g a, div[data-sokoban-container] a");
pub const RESULT_TITLES: Locator = Locator::tag("result_titles", "h3");
pub const RESULT_DESCRIPTIONS: Locator = Locator::css(
    "result_descriptions",
    "div.VwiC3b, div[data-content-feature='1']",
);
pub const RESULT_STATS: Locator = Locator::by_id("result_stats", "result-stats");
pub const DID_YOU_MEAN: Locator = Locator::css("did_you_mean", "a.gL9Hy");
pub const DID_YOU_MEAN_ALTERNATIVE: Locator =
    Locator::xpath("did_you_mean_alternative", "//a[contains(@class, 'spell')]");
pub const SHOWING_RESULTS_FOR: Locator = Locator::css("showing_results_for", "p.card-section a");
pub const SHOWING_RESULTS_FOR_TEXT: Locator = Locator::xpath(
    "showing_results_for_text",
    "//*[contains(text(), 'Showing results for')]",
);
pub const SEARCH_INSTEAD_FOR: Locator = Locator::xpath(
    "search_instead_for",
    "//*[contains(text(), 'Search instead for')]",
);
pub const NEXT_PAGE: Locator = Locator::by_id("next_page", "pnnext");
pub const PREVIOUS_PAGE: Locator = Locator::by_id("previous_page", "pnprev");
pub const PAGE_NUMBERS: Locator = Locator::css("page_numbers", "td a.fl");
pub const NO_RESULTS_MESSAGE: Locator = Locator::css("no_results_message", "div.mnr-c");
pub const IMAGES_TAB: Locator = Locator::link_text("images_tab", "Images");
pub const NEWS_TAB: Locator = Locator::link_text("news_tab", "News");

/// Logo locators in the order they are tried.
pub const LOGO_CANDIDATES: [Locator; 4] = [LOGO, LOGO_ALTERNATIVE, LOGO_ALTERNATIVE2, LOGO_ALTERNATIVE3];

/// Spelling-correction locators in the order they are tried.
pub const DID_YOU_MEAN_CANDIDATES: [Locator; 5] = [
    DID_YOU_MEAN,
    DID_YOU_MEAN_ALTERNATIVE,
    SHOWING_RESULTS_FOR,
    SHOWING_RESULTS_FOR_TEXT,
    SEARCH_INSTEAD_FOR,
];

pub fn home_registry() -> Result<LocatorRegistry, LocatorError> {
    LocatorRegistry::from_entries(
        "google_home",
        [
            SEARCH_BOX,
            SEARCH_BOX_ALTERNATIVE,
            SEARCH_BUTTON,
            SEARCH_BUTTON_ALTERNATIVE,
            FEELING_LUCKY_BUTTON,
            SUGGESTIONS,
            SUGGESTIONS_CONTAINER,
            LOGO,
            LOGO_ALTERNATIVE,
            LOGO_ALTERNATIVE2,
            LOGO_ALTERNATIVE3,
            FOOTER_LINKS,
        ],
    )
}

pub fn results_registry() -> Result<LocatorRegistry, LocatorError> {
    LocatorRegistry::from_entries(
        "google_results",
        [
            SEARCH_BOX,
            SEARCH_BOX_ALTERNATIVE,
            RESULTS,
            RESULTS_ALTERNATIVE,
            RESULT_LINKS,
            RESULT_TITLES,
            RESULT_DESCRIPTIONS,
            RESULT_STATS,
            DID_YOU_MEAN,
            DID_YOU_MEAN_ALTERNATIVE,
            SHOWING_RESULTS_FOR,
            SHOWING_RESULTS_FOR_TEXT,
            SEARCH_INSTEAD_FOR,
            NEXT_PAGE,
            PREVIOUS_PAGE,
            PAGE_NUMBERS,
            NO_RESULTS_MESSAGE,
            IMAGES_TAB,
            NEWS_TAB,
        ],
    )
}
