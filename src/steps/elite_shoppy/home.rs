//! Home page steps: header buttons, products, poll and sorting.

use tracing::info;

use crate::locator::elite_shoppy as loc;
use crate::page::{ElementQueryable, Navigable};
use crate::steps::context::keys;
use crate::steps::{ScenarioContext, StepArgs, StepError, StepRegistry, StepResult, ensure};

pub fn register(registry: &mut StepRegistry) -> Result<(), StepError> {
    registry.given(&["I am on the Elite Shoppy home page"], open_home_page)?;
    registry.then(&["the home page should be loaded successfully"], home_page_loaded)?;
    registry.then(&["Sign In button should be visible"], sign_in_button_visible)?;
    registry.then(&["Sign Up button should be visible"], sign_up_button_visible)?;
    registry.then(&["Cart button should be visible"], cart_button_visible)?;
    registry.then(
        &[
            "the page should display products",
            "at least one product should be visible",
        ],
        products_displayed,
    )?;
    registry.when(&["I click on a product Quick View button"], open_quick_view)?;
    registry.then(&["the product details should be displayed"], product_details_displayed)?;
    registry.when(&["I select a poll option"], select_poll_option)?;
    registry.when(&["I submit the poll"], submit_poll)?;
    registry.then(&["the poll should be submitted successfully"], poll_submitted)?;
    registry.when(&["I sort products by {string}"], sort_products)?;
    registry.then(&["products should be sorted correctly"], products_sorted)?;
    Ok(())
}

fn open_home_page(ctx: &mut ScenarioContext, _: &StepArgs) -> StepResult {
    ctx.open_home_page()?;
    info!("Navigated to Elite Shoppy home page");
    Ok(())
}

fn home_page_loaded(ctx: &mut ScenarioContext, _: &StepArgs) -> StepResult {
    let loaded = ctx.home_page()?.is_loaded()?;
    ensure(loaded, "home page did not load: Sign In / Sign Up buttons missing")
}

fn sign_in_button_visible(ctx: &mut ScenarioContext, _: &StepArgs) -> StepResult {
    let visible = ctx.home_page()?.is_sign_in_button_visible()?;
    ensure(visible, "Sign In button is not visible")
}

fn sign_up_button_visible(ctx: &mut ScenarioContext, _: &StepArgs) -> StepResult {
    let visible = ctx.home_page()?.is_sign_up_button_visible()?;
    ensure(visible, "Sign Up button is not visible")
}

fn cart_button_visible(ctx: &mut ScenarioContext, _: &StepArgs) -> StepResult {
    let visible = ctx.home_page()?.is_cart_button_visible()?;
    ensure(visible, "Cart button is not visible")
}

fn products_displayed(ctx: &mut ScenarioContext, _: &StepArgs) -> StepResult {
    let count = ctx.home_page()?.product_count()?;
    info!("{} products displayed", count);
    ensure(count > 0, "no products are displayed")
}

fn open_quick_view(ctx: &mut ScenarioContext, _: &StepArgs) -> StepResult {
    let opened = ctx.home_page()?.open_quick_view(0)?;
    ensure(opened, "could not open Quick View for the first product")
}

fn product_details_displayed(ctx: &mut ScenarioContext, _: &StepArgs) -> StepResult {
    let mut page = ctx.home_page()?;
    let not_found = page.is_visible(&loc::PAGE_NOT_FOUND)?;
    ensure(!not_found, "Quick View led to a 'Page not Found' error")
}

fn select_poll_option(ctx: &mut ScenarioContext, _: &StepArgs) -> StepResult {
    let selected = ctx.home_page()?.select_poll_option(0)?;
    ensure(selected, "could not select the first poll option")
}

fn submit_poll(ctx: &mut ScenarioContext, _: &StepArgs) -> StepResult {
    let submitted = ctx.home_page()?.submit_poll()?;
    ensure(submitted, "could not submit the poll")
}

fn poll_submitted(ctx: &mut ScenarioContext, _: &StepArgs) -> StepResult {
    let mut page = ctx.home_page()?;
    let error = page.is_visible(&loc::ERROR_MESSAGE)?;
    ensure(!error, "poll submission shows an error message")
}

fn sort_products(ctx: &mut ScenarioContext, args: &StepArgs) -> StepResult {
    let option = args.string(0)?.to_string();
    let sorted = ctx.home_page()?.sort_products(&option)?;
    ensure(sorted, format!("could not sort products by '{}'", option))?;
    ctx.set(keys::SORT_OPTION, option);
    Ok(())
}

fn products_sorted(ctx: &mut ScenarioContext, _: &StepArgs) -> StepResult {
    let option = ctx.get::<String>(keys::SORT_OPTION)?.clone();
    let mut page = ctx.home_page()?;
    let value = page.sort_value()?;
    ensure(
        !value.is_empty(),
        format!("sort dropdown has no value after sorting by '{}'", option),
    )?;
    ensure(page.product_count()? > 0, "no products shown after sorting")
}
