//! Site-independent steps addressing elements by id, class or XPath.

use std::time::Duration;

use tracing::info;

use crate::element::access::ElementAccess;
use crate::element::scripts;
use crate::element::wait::WaitError;
use crate::locator::registry::{Locator, Strategy};
use crate::runner::screenshot;
use crate::steps::{
    ScenarioContext, StepArgs, StepError, StepFailure, StepRegistry, StepResult, ensure,
};

pub fn register(registry: &mut StepRegistry) -> Result<(), StepError> {
    registry.then(&["the current URL should contain {string}"], url_contains)?;
    registry.then(&["the current URL should be {string}"], url_equals)?;
    registry.then(&["the page title should be {string}"], title_equals)?;
    registry.then(&["the page title should contain {string}"], title_contains)?;
    registry.then(&["the page should contain the text {string}"], page_contains_text)?;

    registry.then(&["the element with id {string} should be visible"], |ctx, args| {
        element_visible(ctx, by_id(args.string(0)?))
    })?;
    registry.then(&["the element with class {string} should be visible"], |ctx, args| {
        element_visible(ctx, by_class(args.string(0)?))
    })?;
    registry.then(&["the element with xpath {string} should be visible"], |ctx, args| {
        element_visible(ctx, by_xpath(args.string(0)?))
    })?;
    registry.then(&["the element with id {string} should be present"], |ctx, args| {
        element_present(ctx, by_id(args.string(0)?))
    })?;
    registry.then(&["the element with class {string} should be present"], |ctx, args| {
        element_present(ctx, by_class(args.string(0)?))
    })?;
    registry.then(
        &["the element with id {string} should contain the text {string}"],
        element_contains_text,
    )?;
    registry.then(
        &["the element with id {string} should have attribute {string} with value {string}"],
        element_attribute_equals,
    )?;
    registry.then(&["the element with id {string} should be enabled"], |ctx, args| {
        element_enabled(ctx, args, true)
    })?;
    registry.then(&["the element with id {string} should be disabled"], |ctx, args| {
        element_enabled(ctx, args, false)
    })?;
    registry.then(
        &["the element with id {string} should disappear within {int} seconds"],
        element_disappears,
    )?;

    registry.then(
        &["there should be exactly {int} elements with class {string}"],
        |ctx, args| class_count(ctx, args, |n, expected| n == expected, "exactly"),
    )?;
    registry.then(
        &["there should be at least {int} elements with class {string}"],
        |ctx, args| class_count(ctx, args, |n, expected| n >= expected, "at least"),
    )?;
    registry.then(
        &["there should be at most {int} elements with class {string}"],
        |ctx, args| class_count(ctx, args, |n, expected| n <= expected, "at most"),
    )?;

    registry.any(&["I take a screenshot named {string}"], take_screenshot)?;
    registry.when(
        &["I type {string} into the element with id {string}"],
        type_into_element,
    )?;
    registry.when(&["I click the element with id {string}"], |ctx, args| {
        click(ctx, by_id(args.string(0)?))
    })?;
    registry.when(&["I click the element with class {string}"], |ctx, args| {
        click(ctx, by_class(args.string(0)?))
    })?;
    registry.when(&["I scroll to the bottom of the page"], |ctx, _| {
        run_script(ctx, scripts::SCROLL_TO_BOTTOM)
    })?;
    registry.when(&["I scroll to the top of the page"], |ctx, _| {
        run_script(ctx, scripts::SCROLL_TO_TOP)
    })?;
    registry.when(&["I scroll to the element with id {string}"], scroll_to_element)?;
    Ok(())
}

fn by_id(id: &str) -> Locator {
    Locator::dynamic(format!("#{}", id), Strategy::Id, id)
}

/// Space-separated class lists select elements carrying all of them.
fn by_class(class: &str) -> Locator {
    let selector: String = class.split_whitespace().map(|c| format!(".{}", c)).collect();
    Locator::dynamic(format!("class {}", class), Strategy::Css, selector)
}

fn by_xpath(xpath: &str) -> Locator {
    Locator::dynamic("xpath", Strategy::XPath, xpath)
}

fn url_contains(ctx: &mut ScenarioContext, args: &StepArgs) -> StepResult {
    let fragment = args.string(0)?;
    let url = ctx.access().current_url()?;
    ensure(
        url.contains(fragment),
        format!("URL '{}' does not contain '{}'", url, fragment),
    )
}

fn url_equals(ctx: &mut ScenarioContext, args: &StepArgs) -> StepResult {
    let expected = args.string(0)?;
    let url = ctx.access().current_url()?;
    ensure(
        url.trim_end_matches('/') == expected.trim_end_matches('/'),
        format!("URL is '{}', expected '{}'", url, expected),
    )
}

fn title_equals(ctx: &mut ScenarioContext, args: &StepArgs) -> StepResult {
    let expected = args.string(0)?;
    let title = ctx.access().title()?;
    ensure(
        title == expected,
        format!("page title is '{}', expected '{}'", title, expected),
    )
}

fn title_contains(ctx: &mut ScenarioContext, args: &StepArgs) -> StepResult {
    let fragment = args.string(0)?;
    let title = ctx.access().title()?;
    ensure(
        title.contains(fragment),
        format!("page title '{}' does not contain '{}'", title, fragment),
    )
}

fn page_contains_text(ctx: &mut ScenarioContext, args: &StepArgs) -> StepResult {
    let text = args.string(0)?;
    let source = ctx.access().page_source()?;
    ensure(source.contains(text), format!("page does not contain '{}'", text))
}

fn element_visible(ctx: &mut ScenarioContext, locator: Locator) -> StepResult {
    match ctx.access().wait_until_visible(&locator, None) {
        Ok(_) => Ok(()),
        Err(WaitError::TimedOut { .. }) => ensure(false, format!("{} is not visible", locator)),
        Err(WaitError::Browser(e)) => Err(e.into()),
    }
}

fn element_present(ctx: &mut ScenarioContext, locator: Locator) -> StepResult {
    match ctx.access().wait_until_present(&locator, None) {
        Ok(_) => Ok(()),
        Err(WaitError::TimedOut { .. }) => ensure(false, format!("{} is not present", locator)),
        Err(WaitError::Browser(e)) => Err(e.into()),
    }
}

fn element_contains_text(ctx: &mut ScenarioContext, args: &StepArgs) -> StepResult {
    let locator = by_id(args.string(0)?);
    let expected = args.string(1)?;
    let text = ctx.access().try_read_text(&locator).or_empty()?;
    ensure(
        text.contains(expected),
        format!("{} has text '{}', expected it to contain '{}'", locator, text, expected),
    )
}

fn element_attribute_equals(ctx: &mut ScenarioContext, args: &StepArgs) -> StepResult {
    let locator = by_id(args.string(0)?);
    let attribute = args.string(1)?;
    let expected = args.string(2)?;
    let value = ctx.access().try_read_attribute(&locator, attribute).or_empty()?;
    ensure(
        value == expected,
        format!(
            "{} has {}='{}', expected '{}'",
            locator, attribute, value, expected
        ),
    )
}

fn element_enabled(ctx: &mut ScenarioContext, args: &StepArgs, expected: bool) -> StepResult {
    let locator = by_id(args.string(0)?);
    let mut access = ctx.access();
    ensure(access.is_present(&locator)?, format!("{} is not present", locator))?;
    let enabled = access.enablement(&locator).holds()?;
    let wanted = if expected { "enabled" } else { "disabled" };
    ensure(enabled == expected, format!("{} should be {}", locator, wanted))
}

fn element_disappears(ctx: &mut ScenarioContext, args: &StepArgs) -> StepResult {
    let locator = by_id(args.string(0)?);
    let seconds = args.count(1)?;
    let timeout = Duration::from_secs(seconds as u64);
    match ctx.access().wait_until_hidden(&locator, Some(timeout)) {
        Ok(()) => Ok(()),
        Err(WaitError::TimedOut { .. }) => ensure(
            false,
            format!("{} still visible after {}s", locator, seconds),
        ),
        Err(WaitError::Browser(e)) => Err(e.into()),
    }
}

fn class_count(
    ctx: &mut ScenarioContext,
    args: &StepArgs,
    holds: fn(usize, usize) -> bool,
    relation: &str,
) -> StepResult {
    let expected = args.count(0)?;
    let locator = by_class(args.string(1)?);
    let found = ctx.access().try_find_all(&locator)?.len();
    ensure(
        holds(found, expected),
        format!(
            "expected {} {} elements for {}, found {}",
            relation, expected, locator, found
        ),
    )
}

fn take_screenshot(ctx: &mut ScenarioContext, args: &StepArgs) -> StepResult {
    let name = args.string(0)?;
    let Some(dir) = ctx.screenshot_dir().map(|d| d.to_path_buf()) else {
        return Err(StepFailure::BadArgument(
            "no screenshot directory configured".to_string(),
        ));
    };
    let path = screenshot::capture(ctx.browser(), &dir, &screenshot::sanitize(name))?;
    info!("Screenshot saved to {}", path.display());
    Ok(())
}

fn type_into_element(ctx: &mut ScenarioContext, args: &StepArgs) -> StepResult {
    let text = args.string(0)?;
    let locator = by_id(args.string(1)?);
    let typed = ctx.access().type_text(&locator, text);
    ensure(typed, format!("could not type into {}", locator))
}

fn click(ctx: &mut ScenarioContext, locator: Locator) -> StepResult {
    let clicked = ctx.access().try_click(&locator).into_option()?.is_some();
    ensure(clicked, format!("could not click {}", locator))
}

fn scroll_to_element(ctx: &mut ScenarioContext, args: &StepArgs) -> StepResult {
    let locator = by_id(args.string(0)?);
    let scrolled = ctx.access().scroll_into_view(&locator).into_option()?.is_some();
    ensure(scrolled, format!("could not scroll to {}", locator))
}

fn run_script(ctx: &mut ScenarioContext, script: &str) -> StepResult {
    let mut access: ElementAccess<'_> = ctx.access();
    access.execute(script, &[])?;
    Ok(())
}
