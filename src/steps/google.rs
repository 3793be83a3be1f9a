//! Step library for Google Search.

use tracing::{debug, info};

use crate::page::{ElementQueryable, Navigable, PageId, settle_navigation};
use crate::steps::context::keys;
use crate::steps::{
    ScenarioContext, StepArgs, StepError, StepFailure, StepRegistry, StepResult, ensure,
};

/// Result titles compared by the "differ from previous search" check.
const COMPARED_TITLES: usize = 3;

pub fn register(registry: &mut StepRegistry) -> Result<(), StepError> {
    registry.given(
        &[
            "the user opens the Chrome browser",
            "that the user opens the Chrome browser",
        ],
        browser_is_open,
    )?;
    registry.given(
        &[
            "the user is on the Google page",
            "that the user is on the Google page",
        ],
        open_google,
    )?;

    registry.when(&["the user navigates to {string}"], navigate_to)?;
    registry.when(&["the user searches for {string}"], search_for)?;
    registry.when(&["the user types {string} in the search box"], type_search_term)?;
    registry.when(&["the user leaves the search box empty"], leave_search_box_empty)?;
    registry.when(&["the user clicks the {string} button"], click_button)?;
    registry.when(&["the user goes to the next results page"], next_results_page)?;
    registry.when(&["the user follows the \"Did you mean\" suggestion"], follow_did_you_mean)?;

    registry.any(&["the Google page should open successfully"], google_page_open)?;
    registry.any(&["the search box should be visible"], search_box_visible)?;
    registry.any(&["the Google logo should be displayed"], logo_displayed)?;
    registry.any(&["search suggestions should be displayed"], suggestions_displayed)?;
    registry.any(&["the results page should load"], results_page_loaded)?;
    registry.any(&["search results should be displayed"], results_displayed)?;
    registry.any(
        &["the number of results on the page should be between {int} and {int}"],
        result_count_between,
    )?;
    registry.any(&["the total number of results should be displayed"], total_results_shown)?;
    registry.any(&["the user should remain on the Google home page"], still_on_google)?;
    registry.any(&["the URL should not contain {string}"], url_lacks)?;
    registry.any(&["no search results should be displayed"], no_results_displayed)?;
    registry.any(&["the \"Did you mean\" link should be displayed"], did_you_mean_shown)?;
    registry.any(
        &["the correction suggestion should contain alternative text"],
        did_you_mean_has_text,
    )?;
    registry.any(&["at least {int} results should be displayed"], at_least_results)?;
    registry.any(&["each result should have a title"], results_have_titles)?;
    registry.any(&["the \"Next\" pagination button should be present"], next_button_present)?;
    registry.any(
        &["the results should differ from the previous search"],
        results_differ,
    )?;
    registry.any(
        &["the search box should be visible on the results page"],
        results_search_box_visible,
    )?;
    registry.any(
        &["the search box should contain the searched term"],
        search_box_has_term,
    )?;
    Ok(())
}

// ============================================================================
// Given
// ============================================================================

/// The lifecycle hooks start the session; this only checks it answers.
fn browser_is_open(ctx: &mut ScenarioContext, _: &StepArgs) -> StepResult {
    let url = ctx.access().current_url()?;
    debug!("browser session ready at {}", url);
    Ok(())
}

fn open_google(ctx: &mut ScenarioContext, _: &StepArgs) -> StepResult {
    let loaded = ctx.open_google_home()?.is_loaded()?;
    ensure(loaded, "Google page not loaded properly")
}

// ============================================================================
// When
// ============================================================================

fn navigate_to(ctx: &mut ScenarioContext, args: &StepArgs) -> StepResult {
    let url = args.string(0)?;
    let mut access = ctx.access();
    access.navigate(url)?;
    settle_navigation(&mut access)?;
    ctx.mark_entered(PageId::GoogleHome);
    info!("Navigated to {}", url);
    Ok(())
}

fn search_for(ctx: &mut ScenarioContext, args: &StepArgs) -> StepResult {
    let term = args.string(0)?.to_string();
    ctx.get_or_insert_with(keys::SEARCH_TERMS, Vec::<String>::new)?
        .push(term.clone());
    let searched = ctx.google_home()?.search_for(&term, false)?;
    ensure(searched, format!("failed to search for '{}'", term))?;
    ctx.mark_entered(PageId::GoogleResults);
    Ok(())
}

fn type_search_term(ctx: &mut ScenarioContext, args: &StepArgs) -> StepResult {
    let term = args.string(0)?;
    let typed = ctx.google_home()?.enter_search_term(term)?;
    ensure(typed, format!("could not type '{}' into the search box", term))
}

fn leave_search_box_empty(ctx: &mut ScenarioContext, _: &StepArgs) -> StepResult {
    let mut page = ctx.google_home()?;
    page.clear_search_box()?;
    ensure(page.is_search_box_empty()?, "search box is not empty")
}

/// A click that does nothing is fine here: an empty search leaves the
/// button inert and the following steps check where the browser ended up.
fn click_button(ctx: &mut ScenarioContext, args: &StepArgs) -> StepResult {
    let button = args.string(0)?;
    let url = ctx.access().current_url()?;
    ctx.set(keys::URL_BEFORE_CLICK, url);

    let mut page = ctx.google_home()?;
    let clicked = if button.contains("Google Search") {
        page.click_search_button()?
    } else if button.contains("Feeling Lucky") {
        page.click_feeling_lucky()?
    } else {
        return Err(StepFailure::BadArgument(format!("unknown button '{}'", button)));
    };
    if !clicked {
        debug!("'{}' button did not respond", button);
    }
    if page.current_url()?.contains("search?") {
        ctx.mark_entered(PageId::GoogleResults);
    }
    Ok(())
}

fn next_results_page(ctx: &mut ScenarioContext, _: &StepArgs) -> StepResult {
    let mut page = ctx.google_results()?;
    page.scroll_to_bottom()?;
    let titles = page.result_titles()?;
    let clicked = page.click_next_page()?;
    ensure(clicked, "could not open the next results page")?;
    ctx.set(keys::PREVIOUS_TITLES, titles);
    Ok(())
}

fn follow_did_you_mean(ctx: &mut ScenarioContext, _: &StepArgs) -> StepResult {
    let clicked = ctx.google_results()?.click_did_you_mean()?;
    ensure(clicked, "could not follow the \"Did you mean\" suggestion")
}

// ============================================================================
// Then
// ============================================================================

fn google_page_open(ctx: &mut ScenarioContext, _: &StepArgs) -> StepResult {
    let mut page = ctx.google_home()?;
    let url = page.current_url()?;
    ensure(
        url.to_lowercase().contains("google"),
        format!("not on Google page, current URL: {}", url),
    )?;
    ensure(page.is_loaded()?, "Google page not loaded properly")
}

fn search_box_visible(ctx: &mut ScenarioContext, _: &StepArgs) -> StepResult {
    let visible = ctx.google_home()?.is_search_box_visible()?;
    ensure(visible, "search box is not visible")
}

fn logo_displayed(ctx: &mut ScenarioContext, _: &StepArgs) -> StepResult {
    let visible = ctx.google_home()?.is_logo_visible()?;
    ensure(visible, "Google logo is not displayed")
}

fn suggestions_displayed(ctx: &mut ScenarioContext, _: &StepArgs) -> StepResult {
    let mut page = ctx.google_home()?;
    ensure(page.are_suggestions_visible()?, "search suggestions are not displayed")?;
    let suggestions = page.suggestions()?;
    info!("{} suggestions: {:?}", suggestions.len(), suggestions);
    ensure(!suggestions.is_empty(), "suggestion list is empty")
}

fn results_page_loaded(ctx: &mut ScenarioContext, _: &StepArgs) -> StepResult {
    let mut page = ctx.google_results()?;
    let url = page.current_url()?;
    ensure(
        url.contains("search?"),
        format!("not on results page, current URL: {}", url),
    )?;
    ensure(page.is_loaded()?, "results page not loaded properly")
}

fn results_displayed(ctx: &mut ScenarioContext, _: &StepArgs) -> StepResult {
    let mut page = ctx.google_results()?;
    page.wait_for_results()?;
    ensure(page.has_results()?, "no search results displayed")
}

fn result_count_between(ctx: &mut ScenarioContext, args: &StepArgs) -> StepResult {
    let min = args.count(0)?;
    let max = args.count(1)?;
    let count = ctx.google_results()?.visible_result_count()?;
    ctx.set(keys::RESULTS_COUNT, count);
    info!("Number of results on page: {}", count);
    ensure(
        (min..=max).contains(&count),
        format!("results count {} is not between {} and {}", count, min, max),
    )
}

fn total_results_shown(ctx: &mut ScenarioContext, _: &StepArgs) -> StepResult {
    let mut page = ctx.google_results()?;
    let stats = page.result_stats_text()?;
    ensure(!stats.trim().is_empty(), "result stats not displayed")?;
    let total = page.total_results_count()?;
    info!("Result stats '{}' give {} results", stats, total);
    ensure(total > 0, "total results count is 0 or not found")
}

fn still_on_google(ctx: &mut ScenarioContext, _: &StepArgs) -> StepResult {
    let url = ctx.access().current_url()?;
    ensure(
        on_google_domain(&url),
        format!("not on Google home page, current URL: {}", url),
    )
}

fn url_lacks(ctx: &mut ScenarioContext, args: &StepArgs) -> StepResult {
    let fragment = args.string(0)?;
    let url = ctx.access().current_url()?;
    ensure(
        !url.contains(fragment),
        format!("URL contains '{}', current URL: {}", fragment, url),
    )
}

/// On a results URL there must be no results; anywhere else the browser
/// must still be on Google.
fn no_results_displayed(ctx: &mut ScenarioContext, _: &StepArgs) -> StepResult {
    let url = ctx.access().current_url()?;
    if url.contains("search?") && ctx.is_opened(PageId::GoogleResults) {
        let has_results = ctx.google_results()?.has_results()?;
        return ensure(!has_results, "search results are displayed but shouldn't be");
    }
    ensure(on_google_domain(&url), "not on Google home page")
}

fn did_you_mean_shown(ctx: &mut ScenarioContext, _: &StepArgs) -> StepResult {
    let visible = ctx.google_results()?.is_did_you_mean_visible()?;
    ensure(visible, "\"Did you mean\" link is not displayed")
}

fn did_you_mean_has_text(ctx: &mut ScenarioContext, _: &StepArgs) -> StepResult {
    let text = ctx.google_results()?.did_you_mean_text()?;
    info!("Did you mean suggestion: {}", text);
    ensure(!text.trim().is_empty(), "\"Did you mean\" text is empty")
}

fn at_least_results(ctx: &mut ScenarioContext, args: &StepArgs) -> StepResult {
    let min = args.count(0)?;
    let count = ctx.google_results()?.visible_result_count()?;
    ensure(
        count >= min,
        format!("expected at least {} results, found {}", min, count),
    )
}

fn results_have_titles(ctx: &mut ScenarioContext, _: &StepArgs) -> StepResult {
    let titles = ctx.google_results()?.result_titles()?;
    ensure(!titles.is_empty(), "no result titles found")?;
    let empty = titles.iter().filter(|t| t.trim().is_empty()).count();
    ensure(empty == 0, format!("found {} results without titles", empty))
}

fn next_button_present(ctx: &mut ScenarioContext, _: &StepArgs) -> StepResult {
    let mut page = ctx.google_results()?;
    page.scroll_to_bottom()?;
    ensure(page.is_next_page_visible()?, "Next button is not visible")
}

/// Compares the top titles with the ones stored by the previous check and
/// stores the current ones for the next comparison.
fn results_differ(ctx: &mut ScenarioContext, _: &StepArgs) -> StepResult {
    let current = ctx.google_results()?.result_titles()?;
    let previous = ctx.get::<Vec<String>>(keys::PREVIOUS_TITLES).ok().cloned();
    ctx.set(keys::PREVIOUS_TITLES, current.clone());

    let Some(previous) = previous else {
        debug!("no previous search to compare with");
        return Ok(());
    };
    let different = current
        .iter()
        .zip(previous.iter())
        .take(COMPARED_TITLES)
        .filter(|(now, before)| now != before)
        .count();
    ensure(different > 0, "results are identical to previous search")
}

fn results_search_box_visible(ctx: &mut ScenarioContext, _: &StepArgs) -> StepResult {
    let visible = ctx.google_results()?.is_search_box_visible()?;
    ensure(visible, "search box is not visible on results page")
}

fn search_box_has_term(ctx: &mut ScenarioContext, _: &StepArgs) -> StepResult {
    let term = ctx
        .get::<Vec<String>>(keys::SEARCH_TERMS)?
        .last()
        .cloned()
        .ok_or_else(|| StepFailure::MissingContext {
            key: keys::SEARCH_TERMS.to_string(),
        })?;
    let value = ctx.google_results()?.search_box_value()?;
    ensure(
        value.to_lowercase().contains(&term.to_lowercase()),
        format!("search box should contain '{}', found '{}'", term, value),
    )
}

fn on_google_domain(url: &str) -> bool {
    url.contains("google.co.in") || url.contains("google.com")
}
