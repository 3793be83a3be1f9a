//! Sign In modal steps.

use tracing::info;

use crate::locator::elite_shoppy as loc;
use crate::page::{ElementQueryable, PageId};
use crate::steps::{ScenarioContext, StepArgs, StepError, StepRegistry, StepResult, ensure};
use crate::validation;

pub fn register(registry: &mut StepRegistry) -> Result<(), StepError> {
    registry.when(&["I click on the Sign In button"], click_sign_in)?;
    registry.when(&["I fill the login form with valid data"], fill_login_form)?;
    registry.when(&["I click the Sign In submit button"], submit_login)?;
    registry.then(&["I should see a success message"], success_message)?;
    registry.then(&["the Sign In modal should be displayed"], modal_displayed)?;
    registry.then(&["the Sign In modal should contain Name field"], has_name_field)?;
    registry.then(&["the Sign In modal should contain Email field"], has_email_field)?;
    registry.then(&["the Sign In submit button should be enabled"], submit_enabled)?;
    registry.when(&["I clear the login form"], clear_form)?;
    registry.then(&["the Sign In form should show validation errors"], form_is_empty)?;
    registry.when(
        &[
            "I enter invalid email {string} in Sign In form",
            "I enter text {string} in Sign In email field",
        ],
        enter_email,
    )?;
    registry.then(
        &[
            "I should see email validation error",
            "an email validation message should appear",
        ],
        email_rejected,
    )?;
    registry.when(&["I close the Sign In modal"], close_modal)?;
    registry.then(&["the Sign In modal should not be displayed"], modal_closed)?;
    Ok(())
}

fn click_sign_in(ctx: &mut ScenarioContext, _: &StepArgs) -> StepResult {
    let clicked = ctx.home_page()?.click_sign_in()?;
    ensure(clicked, "could not click the Sign In button")?;
    ctx.mark_entered(PageId::LoginModal);
    ctx.login_modal()?.wait_until_open()?;
    Ok(())
}

fn fill_login_form(ctx: &mut ScenarioContext, args: &StepArgs) -> StepResult {
    let table = args.table()?;
    let mut modal = ctx.login_modal()?;
    for row in table.hashes() {
        let name = row.get("name").copied().unwrap_or_default();
        let email = row.get("email").copied().unwrap_or_default();
        let filled = modal.fill(name, email)?;
        ensure(filled, format!("could not fill the login form for '{}'", email))?;
    }
    Ok(())
}

fn submit_login(ctx: &mut ScenarioContext, _: &StepArgs) -> StepResult {
    let submitted = ctx.login_modal()?.submit()?;
    ensure(submitted, "could not click the Sign In submit button")
}

fn success_message(ctx: &mut ScenarioContext, _: &StepArgs) -> StepResult {
    let mut modal = ctx.login_modal()?;
    let error = modal.is_visible(&loc::ERROR_MESSAGE)?;
    ensure(!error, "an error message is shown after signing in")?;
    if modal.is_visible(&loc::SUCCESS_MESSAGE)? {
        info!("Sign In success message: {}", modal.read_text(&loc::SUCCESS_MESSAGE)?);
    }
    Ok(())
}

fn modal_displayed(ctx: &mut ScenarioContext, _: &StepArgs) -> StepResult {
    let displayed = ctx.login_modal()?.is_displayed()?;
    ensure(displayed, "Sign In modal is not displayed")
}

fn has_name_field(ctx: &mut ScenarioContext, _: &StepArgs) -> StepResult {
    let present = ctx.login_modal()?.has_name_field()?;
    ensure(present, "Sign In modal has no Name field")
}

fn has_email_field(ctx: &mut ScenarioContext, _: &StepArgs) -> StepResult {
    let present = ctx.login_modal()?.has_email_field()?;
    ensure(present, "Sign In modal has no Email field")
}

fn submit_enabled(ctx: &mut ScenarioContext, _: &StepArgs) -> StepResult {
    let enabled = ctx.login_modal()?.is_submit_enabled()?;
    ensure(enabled, "Sign In submit button is not enabled")
}

fn clear_form(ctx: &mut ScenarioContext, _: &StepArgs) -> StepResult {
    let cleared = ctx.login_modal()?.clear_fields()?;
    ensure(cleared, "could not clear the login form")
}

/// Both inputs are empty, so the required-field checks are what the browser
/// would report on submit.
fn form_is_empty(ctx: &mut ScenarioContext, _: &StepArgs) -> StepResult {
    let mut modal = ctx.login_modal()?;
    let name = modal.name_value()?;
    let email = modal.email_value()?;
    ensure(
        validation::check_name(&name).is_err() && validation::check_email(&email).is_err(),
        format!("login form still passes validation (name '{}', email '{}')", name, email),
    )
}

fn enter_email(ctx: &mut ScenarioContext, args: &StepArgs) -> StepResult {
    let email = args.string(0)?;
    let entered = ctx.login_modal()?.enter_email(email)?;
    ensure(entered, format!("could not type '{}' into the Sign In email field", email))
}

fn email_rejected(ctx: &mut ScenarioContext, _: &StepArgs) -> StepResult {
    let email = ctx.login_modal()?.email_value()?;
    ensure(
        !validation::is_valid_email(&email),
        format!("email '{}' should be rejected as invalid", email),
    )
}

fn close_modal(ctx: &mut ScenarioContext, _: &StepArgs) -> StepResult {
    let closed = ctx.login_modal()?.close()?;
    ensure(closed, "Sign In modal did not close")
}

fn modal_closed(ctx: &mut ScenarioContext, _: &StepArgs) -> StepResult {
    let displayed = ctx.login_modal()?.is_displayed()?;
    ensure(!displayed, "Sign In modal should not be displayed")
}
