//! Sign Up modal steps.

use tracing::info;

use crate::locator::elite_shoppy as loc;
use crate::page::signup::{SignUpField, SignUpForm};
use crate::page::{ElementQueryable, PageId};
use crate::steps::{ScenarioContext, StepArgs, StepError, StepRegistry, StepResult, ensure};
use crate::validation;

pub fn register(registry: &mut StepRegistry) -> Result<(), StepError> {
    registry.when(&["I click on the Sign Up button"], click_sign_up)?;
    registry.when(
        &[
            "I fill the sign up form with valid data",
            "I fill the sign up form with mismatched passwords",
            "I fill the sign up form with weak password",
        ],
        fill_signup_form,
    )?;
    registry.when(
        &[
            "I click the Sign Up submit button",
            "I try to submit without filling any field",
        ],
        submit_signup,
    )?;
    registry.then(&["I should see a registration success message"], success_message)?;
    registry.then(&["the Sign Up modal should be displayed"], modal_displayed)?;
    registry.then(&["the Sign Up modal should contain Name field"], |ctx, _| {
        has_field(ctx, SignUpField::Name)
    })?;
    registry.then(&["the Sign Up modal should contain Email field"], |ctx, _| {
        has_field(ctx, SignUpField::Email)
    })?;
    registry.then(&["the Sign Up modal should contain Password field"], |ctx, _| {
        has_field(ctx, SignUpField::Password)
    })?;
    registry.then(
        &["the Sign Up modal should contain Confirm Password field"],
        |ctx, _| has_field(ctx, SignUpField::ConfirmPassword),
    )?;
    registry.then(&["the Sign Up submit button should be enabled"], submit_enabled)?;
    registry.when(&["I clear the sign up form"], clear_form)?;
    registry.then(
        &[
            "the Sign Up form should show validation errors",
            "validation errors should be shown for all required fields",
        ],
        form_fails_validation,
    )?;
    registry.then(
        &[
            "I should see password mismatch error",
            "a password mismatch message should appear",
        ],
        passwords_mismatch,
    )?;
    registry.when(&["I enter invalid email {string} in Sign Up form"], |ctx, args| {
        enter(ctx, SignUpField::Email, args.string(0)?)
    })?;
    registry.when(&["I enter text {string} in Sign Up name field"], |ctx, args| {
        enter(ctx, SignUpField::Name, args.string(0)?)
    })?;
    registry.when(&["I enter password {string} in Sign Up password field"], |ctx, args| {
        enter(ctx, SignUpField::Password, args.string(0)?)
    })?;
    registry.when(
        &["I enter password {string} in Sign Up confirm password field"],
        |ctx, args| enter(ctx, SignUpField::ConfirmPassword, args.string(0)?),
    )?;
    registry.then(&["I should see email validation error in Sign Up modal"], email_rejected)?;
    registry.then(&["a name validation message should appear"], name_rejected)?;
    registry.then(&["I should see password strength warning"], password_weak)?;
    registry.when(&["I close the Sign Up modal"], close_modal)?;
    registry.then(&["the Sign Up modal should not be displayed"], modal_closed)?;
    Ok(())
}

fn click_sign_up(ctx: &mut ScenarioContext, _: &StepArgs) -> StepResult {
    let clicked = ctx.home_page()?.click_sign_up()?;
    ensure(clicked, "could not click the Sign Up button")?;
    ctx.mark_entered(PageId::SignUpModal);
    ctx.signup_modal()?.wait_until_open()?;
    Ok(())
}

/// Fill the four inputs from the step table's `name`, `email`, `password`
/// and `confirmPassword` columns.
fn fill_signup_form(ctx: &mut ScenarioContext, args: &StepArgs) -> StepResult {
    let table = args.table()?;
    let mut modal = ctx.signup_modal()?;
    for row in table.hashes() {
        let cell = |column: &str| row.get(column).copied().unwrap_or_default().to_string();
        let form = SignUpForm {
            name: cell("name"),
            email: cell("email"),
            password: cell("password"),
            confirm_password: cell("confirmPassword"),
        };
        let filled = modal.fill(&form)?;
        ensure(filled, format!("could not fill the sign up form for '{}'", form.email))?;
    }
    Ok(())
}

fn submit_signup(ctx: &mut ScenarioContext, _: &StepArgs) -> StepResult {
    let submitted = ctx.signup_modal()?.submit()?;
    ensure(submitted, "could not click the Sign Up submit button")
}

fn success_message(ctx: &mut ScenarioContext, _: &StepArgs) -> StepResult {
    let mut modal = ctx.signup_modal()?;
    let error = modal.is_visible(&loc::ERROR_MESSAGE)?;
    ensure(!error, "an error message is shown after registering")?;
    if modal.is_visible(&loc::SUCCESS_MESSAGE)? {
        info!("Sign Up success message: {}", modal.read_text(&loc::SUCCESS_MESSAGE)?);
    }
    Ok(())
}

fn modal_displayed(ctx: &mut ScenarioContext, _: &StepArgs) -> StepResult {
    let displayed = ctx.signup_modal()?.is_displayed()?;
    ensure(displayed, "Sign Up modal is not displayed")
}

fn has_field(ctx: &mut ScenarioContext, field: SignUpField) -> StepResult {
    let present = ctx.signup_modal()?.has_field(field)?;
    ensure(present, format!("Sign Up modal has no {:?} field", field))
}

fn submit_enabled(ctx: &mut ScenarioContext, _: &StepArgs) -> StepResult {
    let enabled = ctx.signup_modal()?.is_submit_enabled()?;
    ensure(enabled, "Sign Up submit button is not enabled")
}

fn clear_form(ctx: &mut ScenarioContext, _: &StepArgs) -> StepResult {
    let cleared = ctx.signup_modal()?.clear_fields()?;
    ensure(cleared, "could not clear the sign up form")
}

fn form_fails_validation(ctx: &mut ScenarioContext, _: &StepArgs) -> StepResult {
    let form = ctx.signup_modal()?.read_form()?;
    let failures = [
        validation::check_name(&form.name).is_err(),
        validation::check_email(&form.email).is_err(),
        validation::check_password(&form.password).is_err(),
    ];
    ensure(
        failures.iter().all(|failed| *failed),
        format!("sign up form still passes validation: {:?}", form),
    )
}

fn passwords_mismatch(ctx: &mut ScenarioContext, _: &StepArgs) -> StepResult {
    let form = ctx.signup_modal()?.read_form()?;
    ensure(
        validation::check_confirmation(&form.password, &form.confirm_password).is_err(),
        "password and confirmation should differ",
    )
}

fn enter(ctx: &mut ScenarioContext, field: SignUpField, value: &str) -> StepResult {
    let entered = ctx.signup_modal()?.enter(field, value)?;
    ensure(entered, format!("could not type into the Sign Up {:?} field", field))
}

fn email_rejected(ctx: &mut ScenarioContext, _: &StepArgs) -> StepResult {
    let email = ctx.signup_modal()?.value_of(SignUpField::Email)?;
    ensure(
        !validation::is_valid_email(&email),
        format!("email '{}' should be rejected as invalid", email),
    )
}

fn name_rejected(ctx: &mut ScenarioContext, _: &StepArgs) -> StepResult {
    let name = ctx.signup_modal()?.value_of(SignUpField::Name)?;
    ensure(
        !validation::is_valid_name(&name),
        format!("name '{}' should be rejected as invalid", name),
    )
}

fn password_weak(ctx: &mut ScenarioContext, _: &StepArgs) -> StepResult {
    let password = ctx.signup_modal()?.value_of(SignUpField::Password)?;
    ensure(
        !validation::is_valid_password(&password),
        "password should be reported as weak",
    )
}

fn close_modal(ctx: &mut ScenarioContext, _: &StepArgs) -> StepResult {
    let closed = ctx.signup_modal()?.close()?;
    ensure(closed, "Sign Up modal did not close")
}

fn modal_closed(ctx: &mut ScenarioContext, _: &StepArgs) -> StepResult {
    let displayed = ctx.signup_modal()?.is_displayed()?;
    ensure(!displayed, "Sign Up modal should not be displayed")
}
