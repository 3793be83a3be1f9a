//! Mens category page steps: load, navigation menu, products, footer,
//! responsiveness and search.

use std::time::{Duration, Instant};

use tracing::{debug, info};

use crate::element::wait::WaitError;
use crate::page::layout::MIN_TOUCH_TARGET_PX;
use crate::page::{ElementQueryable, Navigable, Viewport};
use crate::steps::context::keys;
use crate::steps::{
    ScenarioContext, StepArgs, StepError, StepFailure, StepRegistry, StepResult, ensure,
};

/// Menu entries exercised by the hover step.
const MENU_ITEMS: [&str; 4] = ["Home", "Womens", "Mens", "Contact"];
/// Upper bound for the page load check.
const MAX_LOAD_TIME: Duration = Duration::from_secs(3);
/// Below this many products a page may legitimately fit without scrolling.
const SCROLL_EXEMPT_PRODUCTS: usize = 5;

pub fn register(registry: &mut StepRegistry) -> Result<(), StepError> {
    // TC1: page load
    registry.given(&["I navigate to the Mens page"], navigate_to_mens)?;
    registry.given(&["the Mens page is loaded completely"], mens_page_loaded)?;
    registry.when(&["I wait for page to load"], wait_for_page_load)?;
    registry.then(&["the page should load within 3 seconds"], loads_within_limit)?;
    registry.then(&["all main elements should be visible"], landmarks_visible)?;
    registry.then(&["product images should be loaded"], product_images_loaded)?;
    registry.then(&["CSS and JS resources should be available"], resources_available)?;

    // TC2: navigation menu
    registry.given(&["the navigation menu is visible"], navigation_menu_visible)?;
    registry.then(&["menu should remain accessible"], navigation_menu_visible)?;
    registry.when(&["I hover over each menu item"], hover_menu_items)?;
    registry.then(&["each menu item should respond to hover"], menu_responds_to_hover)?;
    registry.when(&["I click on {string} link"], click_menu_link)?;
    registry.then(&["I should be redirected to home page"], on_home_page)?;
    registry.then(&["I should be redirected to womens page"], on_womens_page)?;
    registry.then(&["I should stay on mens page"], on_mens_page)?;
    registry.then(&["no 404 or 500 errors should appear"], no_error_markers)?;

    // TC3: products
    registry.given(&["products from Mens category are loaded"], products_loaded)?;
    registry.when(&["I scroll to products section"], scroll_to_products)?;
    registry.then(&["each product should display"], each_product_complete)?;
    registry.then(
        &["product data should be correctly fetched from database"],
        product_data_present,
    )?;
    registry.then(
        &["product graphic consistency should be maintained"],
        products_consistent,
    )?;

    // TC4: footer contact link
    registry.when(&["I scroll to footer section"], scroll_to_footer)?;
    registry.given(&["the footer is visible"], footer_visible)?;
    registry.when(&["I click on the Contact link in the footer"], click_footer_contact)?;
    registry.then(&["I should be redirected to contact page"], on_contact_page)?;
    registry.then(&["no broken links should occur"], no_broken_links)?;
    registry.then(
        &[
            "response time should be acceptable",
            "search response time should be reasonable",
        ],
        page_responded,
    )?;

    // TC5: responsiveness
    registry.when(&["I view page on desktop (1920x1080)"], |ctx, _| {
        set_viewport(ctx, Viewport::DESKTOP)
    })?;
    registry.when(&["I resize to tablet (768x1024)"], |ctx, _| {
        set_viewport(ctx, Viewport::TABLET)
    })?;
    registry.when(&["I resize to mobile (375x667)"], |ctx, _| {
        set_viewport(ctx, Viewport::MOBILE)
    })?;
    registry.when(&["I resize the window to {int}x{int}"], resize_window)?;
    registry.then(
        &["all elements should be visible without horizontal scroll"],
        no_horizontal_scroll,
    )?;
    registry.then(
        &["layout should be correct", "layout should adapt correctly"],
        layout_acceptable,
    )?;
    registry.then(&["no overlapping elements"], no_overlap)?;
    registry.then(&["vertical scroll should work smoothly"], vertical_scroll_works)?;
    registry.then(&["touch interactions should be accessible"], touch_accessible)?;
    registry.then(&["buttons should be properly sized for touch"], touch_targets_sized)?;

    // TC6: search
    registry.given(&["the search bar is visible and active"], search_bar_ready)?;
    registry.when(&["I enter {string} in search field"], enter_search_term)?;
    registry.when(&["I press Enter or click Search button"], submit_search)?;
    registry.then(&["search results should display relevant products"], results_relevant)?;
    registry.then(&["no \"Page not Found\" error should occur"], no_page_not_found)?;
    Ok(())
}

// ============================================================================
// TC1: page load
// ============================================================================

fn navigate_to_mens(ctx: &mut ScenarioContext, _: &StepArgs) -> StepResult {
    let start = Instant::now();
    let loaded = ctx.open_mens_page()?.is_loaded()?;
    let elapsed = start.elapsed();
    debug!("Mens page opened in {:?} (loaded: {})", elapsed, loaded);
    ctx.set(keys::LOAD_TIME, elapsed);
    Ok(())
}

fn mens_page_loaded(ctx: &mut ScenarioContext, _: &StepArgs) -> StepResult {
    let loaded = ctx.mens_page()?.is_loaded()?;
    ensure(loaded, "Mens page failed to load")
}

fn wait_for_page_load(ctx: &mut ScenarioContext, _: &StepArgs) -> StepResult {
    match ctx.mens_page()?.access().wait_for_document_ready() {
        Ok(()) => Ok(()),
        Err(WaitError::TimedOut { waited_ms, .. }) => {
            debug!("document still loading after {}ms", waited_ms);
            Ok(())
        }
        Err(WaitError::Browser(e)) => Err(e.into()),
    }
}

/// Uses the time measured when the page was opened, or measures the load
/// signal now when the page was opened some other way.
fn loads_within_limit(ctx: &mut ScenarioContext, _: &StepArgs) -> StepResult {
    let measured = ctx.get::<Duration>(keys::LOAD_TIME).ok().copied();
    let load_time = match measured {
        Some(load_time) => load_time,
        None => ctx.mens_page()?.page_load_time()?,
    };
    info!("Load time: {:.2}s", load_time.as_secs_f64());
    ensure(
        load_time < MAX_LOAD_TIME,
        format!(
            "page took {:.2}s to load (expected < {}s)",
            load_time.as_secs_f64(),
            MAX_LOAD_TIME.as_secs()
        ),
    )
}

fn landmarks_visible(ctx: &mut ScenarioContext, _: &StepArgs) -> StepResult {
    let visible = ctx.mens_page()?.are_landmarks_visible()?;
    ensure(visible, "not all main elements are visible")
}

fn product_images_loaded(ctx: &mut ScenarioContext, _: &StepArgs) -> StepResult {
    let loaded = ctx.mens_page()?.are_product_images_loaded()?;
    ensure(loaded, "product images not loaded")
}

fn resources_available(ctx: &mut ScenarioContext, _: &StepArgs) -> StepResult {
    let available = ctx.mens_page()?.are_resources_available()?;
    ensure(available, "CSS and JS resources not available")
}

// ============================================================================
// TC2: navigation menu
// ============================================================================

fn navigation_menu_visible(ctx: &mut ScenarioContext, _: &StepArgs) -> StepResult {
    let visible = ctx.mens_page()?.is_navigation_menu_visible()?;
    ensure(visible, "navigation menu not visible")
}

fn hover_menu_items(ctx: &mut ScenarioContext, _: &StepArgs) -> StepResult {
    let mut page = ctx.mens_page()?;
    for item in MENU_ITEMS {
        let hovered = page.hover_menu_item(item)?;
        ensure(hovered, format!("failed to hover over '{}'", item))?;
    }
    Ok(())
}

/// Hover effects are CSS only; every item must still be displayed after the
/// pointer moved across the menu.
fn menu_responds_to_hover(ctx: &mut ScenarioContext, _: &StepArgs) -> StepResult {
    let visible = ctx.mens_page()?.is_navigation_menu_visible()?;
    ensure(visible, "navigation menu disappeared after hovering")
}

fn click_menu_link(ctx: &mut ScenarioContext, args: &StepArgs) -> StepResult {
    let name = args.string(0)?;
    let clicked = ctx.mens_page()?.click_menu_link(name)?;
    ensure(clicked, format!("failed to click on '{}'", name))
}

fn on_home_page(ctx: &mut ScenarioContext, _: &StepArgs) -> StepResult {
    let mut page = ctx.mens_page()?;
    let url = page.current_url()?;
    ensure(page.is_on_home_page()?, format!("not redirected to home page: {}", url))
}

fn on_womens_page(ctx: &mut ScenarioContext, _: &StepArgs) -> StepResult {
    let mut page = ctx.mens_page()?;
    let url = page.current_url()?;
    ensure(page.is_on_womens_page()?, format!("not redirected to womens page: {}", url))
}

fn on_mens_page(ctx: &mut ScenarioContext, _: &StepArgs) -> StepResult {
    let mut page = ctx.mens_page()?;
    let url = page.current_url()?;
    ensure(page.is_on_mens_page()?, format!("not on mens page anymore: {}", url))
}

fn no_error_markers(ctx: &mut ScenarioContext, _: &StepArgs) -> StepResult {
    let clean = ctx.mens_page()?.has_no_error_status_markers()?;
    ensure(clean, "404 or 500 errors found on page")
}

// ============================================================================
// TC3: products
// ============================================================================

fn products_loaded(ctx: &mut ScenarioContext, _: &StepArgs) -> StepResult {
    let count = ctx.mens_page()?.product_count()?;
    info!("{} products loaded", count);
    ensure(count > 0, "no products loaded")
}

fn scroll_to_products(ctx: &mut ScenarioContext, _: &StepArgs) -> StepResult {
    let scrolled = ctx.mens_page()?.scroll_to_products()?;
    ensure(scrolled, "could not scroll to the products section")
}

/// Image, title, price and action button for every product. The step's data
/// table, when given, only names the fields.
fn each_product_complete(ctx: &mut ScenarioContext, _: &StepArgs) -> StepResult {
    let mut page = ctx.mens_page()?;
    let count = page.product_count()?;
    for i in 0..count {
        ensure(page.product_has_image(i)?, format!("product {} missing image", i))?;
        ensure(page.product_has_title(i)?, format!("product {} missing title", i))?;
        ensure(page.product_has_price(i)?, format!("product {} missing price", i))?;
        ensure(
            page.product_has_action_button(i)?,
            format!("product {} missing action button", i),
        )?;
    }
    Ok(())
}

fn product_data_present(ctx: &mut ScenarioContext, _: &StepArgs) -> StepResult {
    let mut page = ctx.mens_page()?;
    let count = page.product_count()?;
    for i in 0..count {
        let title = page.product_title(i)?.unwrap_or_default();
        let price = page.product_price(i)?.unwrap_or_default();
        ensure(!title.trim().is_empty(), format!("product {} has empty title", i))?;
        ensure(!price.trim().is_empty(), format!("product {} has empty price", i))?;
    }
    Ok(())
}

fn products_consistent(ctx: &mut ScenarioContext, _: &StepArgs) -> StepResult {
    let consistent = ctx.mens_page()?.all_products_have_required_fields()?;
    ensure(consistent, "graphic consistency issues between products")
}

// ============================================================================
// TC4: footer contact link
// ============================================================================

fn scroll_to_footer(ctx: &mut ScenarioContext, _: &StepArgs) -> StepResult {
    let scrolled = ctx.mens_page()?.scroll_to_footer()?;
    ensure(scrolled, "could not scroll to the footer")
}

fn footer_visible(ctx: &mut ScenarioContext, _: &StepArgs) -> StepResult {
    let visible = ctx.mens_page()?.is_footer_visible()?;
    ensure(visible, "footer not visible")
}

fn click_footer_contact(ctx: &mut ScenarioContext, _: &StepArgs) -> StepResult {
    let clicked = ctx.mens_page()?.click_contact_link()?;
    ensure(clicked, "failed to click the Contact link in the footer")
}

/// The footer link is known to lead to YouTube; that case gets its own
/// message so it reads as the known bug rather than a generic miss.
fn on_contact_page(ctx: &mut ScenarioContext, _: &StepArgs) -> StepResult {
    let mut page = ctx.mens_page()?;
    let url = page.current_url()?;
    if url.to_lowercase().contains("youtube.com") {
        return ensure(
            false,
            format!("BUG: Contact link redirects to YouTube instead of contact page ({})", url),
        );
    }
    ensure(page.is_on_contact_page()?, format!("not redirected to contact page: {}", url))
}

fn no_broken_links(ctx: &mut ScenarioContext, _: &StepArgs) -> StepResult {
    let source = ctx.mens_page()?.page_source()?.to_lowercase();
    ensure(
        !source.contains("404") && !source.contains("not found"),
        "broken link detected",
    )
}

fn page_responded(ctx: &mut ScenarioContext, _: &StepArgs) -> StepResult {
    match ctx.mens_page()?.access().wait_for_document_ready() {
        Ok(()) => Ok(()),
        Err(WaitError::TimedOut { waited_ms, .. }) => ensure(
            false,
            format!("page still loading after {}ms", waited_ms),
        ),
        Err(WaitError::Browser(e)) => Err(e.into()),
    }
}

// ============================================================================
// TC5: responsiveness
// ============================================================================

fn set_viewport(ctx: &mut ScenarioContext, viewport: Viewport) -> StepResult {
    ctx.mens_page()?.set_viewport(viewport)?;
    info!(
        "Viewport set to {} ({}x{})",
        viewport.name, viewport.width, viewport.height
    );
    Ok(())
}

fn resize_window(ctx: &mut ScenarioContext, args: &StepArgs) -> StepResult {
    let width = u32::try_from(args.int(0)?)
        .map_err(|_| StepFailure::BadArgument("width out of range".to_string()))?;
    let height = u32::try_from(args.int(1)?)
        .map_err(|_| StepFailure::BadArgument("height out of range".to_string()))?;
    ctx.mens_page()?.resize(width, height)?;
    Ok(())
}

fn no_horizontal_scroll(ctx: &mut ScenarioContext, _: &StepArgs) -> StepResult {
    let scrolls = ctx.mens_page()?.has_horizontal_scroll()?;
    ensure(!scrolls, "horizontal scroll detected")
}

fn layout_acceptable(ctx: &mut ScenarioContext, _: &StepArgs) -> StepResult {
    let acceptable = ctx.mens_page()?.is_layout_acceptable()?;
    ensure(acceptable, "layout issues detected")
}

fn no_overlap(ctx: &mut ScenarioContext, _: &StepArgs) -> StepResult {
    let overlap = ctx.mens_page()?.has_overlapping_critical_elements()?;
    ensure(!overlap, "overlapping elements found")
}

fn vertical_scroll_works(ctx: &mut ScenarioContext, _: &StepArgs) -> StepResult {
    let mut page = ctx.mens_page()?;
    if page.has_vertical_scroll_capacity()? {
        return Ok(());
    }
    let count = page.product_count()?;
    debug!("page does not scroll vertically with {} products", count);
    ensure(
        count < SCROLL_EXEMPT_PRODUCTS,
        format!("page cannot scroll vertically with {} products", count),
    )
}

fn touch_accessible(ctx: &mut ScenarioContext, _: &StepArgs) -> StepResult {
    let visible = ctx.mens_page()?.is_navigation_menu_visible()?;
    ensure(visible, "navigation menu not reachable on this viewport")
}

fn touch_targets_sized(ctx: &mut ScenarioContext, _: &StepArgs) -> StepResult {
    let sized = ctx
        .mens_page()?
        .all_interactive_elements_meet_minimum_size(MIN_TOUCH_TARGET_PX)?;
    ensure(
        sized,
        format!("buttons smaller than {}px for touch", MIN_TOUCH_TARGET_PX),
    )
}

// ============================================================================
// TC6: search
// ============================================================================

fn search_bar_ready(ctx: &mut ScenarioContext, _: &StepArgs) -> StepResult {
    let mut page = ctx.mens_page()?;
    ensure(page.is_search_bar_visible()?, "search bar not visible")?;
    ensure(page.is_search_bar_active()?, "search bar not active")
}

fn enter_search_term(ctx: &mut ScenarioContext, args: &StepArgs) -> StepResult {
    let term = args.string(0)?.to_string();
    let entered = ctx.mens_page()?.enter_search_term(&term)?;
    ensure(entered, format!("could not type '{}' into the search field", term))?;
    ctx.set(keys::SEARCH_TERM, term);
    Ok(())
}

fn submit_search(ctx: &mut ScenarioContext, _: &StepArgs) -> StepResult {
    let submitted = ctx.mens_page()?.submit_search()?;
    ensure(submitted, "could not submit the search")
}

fn results_relevant(ctx: &mut ScenarioContext, _: &StepArgs) -> StepResult {
    let term = ctx.get::<String>(keys::SEARCH_TERM)?.clone();
    let mut page = ctx.mens_page()?;
    ensure(page.has_results()?, "no search results displayed")?;
    ensure(
        page.results_are_relevant(&term)?,
        format!("search results not relevant for '{}'", term),
    )
}

fn no_page_not_found(ctx: &mut ScenarioContext, _: &StepArgs) -> StepResult {
    let not_found = ctx.mens_page()?.shows_not_found_indicator()?;
    ensure(!not_found, "BUG: Search redirected to 'Page not Found' error")
}
