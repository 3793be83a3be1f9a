//! Data validation steps. These check form values without a browser.

use crate::steps::context::keys;
use crate::steps::{ScenarioContext, StepArgs, StepError, StepRegistry, StepResult, ensure};
use crate::validation;

pub fn register(registry: &mut StepRegistry) -> Result<(), StepError> {
    registry.when(&["I validate email {string}"], validate_email)?;
    registry.then(&["the email should be valid"], |ctx, _| email_verdict(ctx, true))?;
    registry.then(&["the email should be invalid"], |ctx, _| email_verdict(ctx, false))?;
    registry.when(&["I validate name {string}"], validate_name)?;
    registry.then(&["the name should be valid"], |ctx, _| name_verdict(ctx, true))?;
    registry.then(&["the name should be invalid"], |ctx, _| name_verdict(ctx, false))?;
    registry.when(&["I validate password {string}"], validate_password)?;
    registry.then(&["the password should be strong"], |ctx, _| password_verdict(ctx, true))?;
    registry.then(&["the password should be weak"], |ctx, _| password_verdict(ctx, false))?;
    Ok(())
}

fn validate_email(ctx: &mut ScenarioContext, args: &StepArgs) -> StepResult {
    let email = args.string(0)?.to_string();
    ctx.set(keys::EMAIL_VALID, validation::is_valid_email(&email));
    ctx.set(keys::EMAIL, email);
    Ok(())
}

fn email_verdict(ctx: &mut ScenarioContext, expected: bool) -> StepResult {
    let email = ctx.get::<String>(keys::EMAIL)?;
    let valid = *ctx.get::<bool>(keys::EMAIL_VALID)?;
    let reason = match validation::check_email(email) {
        Ok(()) => "it is well formed".to_string(),
        Err(e) => e.to_string(),
    };
    ensure(
        valid == expected,
        format!("email '{}' should be {}: {}", email, verdict(expected), reason),
    )
}

fn validate_name(ctx: &mut ScenarioContext, args: &StepArgs) -> StepResult {
    let name = args.string(0)?.to_string();
    ctx.set(keys::NAME_VALID, validation::is_valid_name(&name));
    ctx.set(keys::NAME, name);
    Ok(())
}

fn name_verdict(ctx: &mut ScenarioContext, expected: bool) -> StepResult {
    let name = ctx.get::<String>(keys::NAME)?;
    let valid = *ctx.get::<bool>(keys::NAME_VALID)?;
    ensure(
        valid == expected,
        format!("name '{}' should be {}", name, verdict(expected)),
    )
}

fn validate_password(ctx: &mut ScenarioContext, args: &StepArgs) -> StepResult {
    let password = args.string(0)?.to_string();
    ctx.set(keys::PASSWORD_VALID, validation::is_valid_password(&password));
    ctx.set(keys::PASSWORD, password);
    Ok(())
}

fn password_verdict(ctx: &mut ScenarioContext, expected_strong: bool) -> StepResult {
    let password = ctx.get::<String>(keys::PASSWORD)?;
    let strong = *ctx.get::<bool>(keys::PASSWORD_VALID)?;
    let expected = if expected_strong { "strong" } else { "weak" };
    ensure(
        strong == expected_strong,
        format!(
            "password of {} characters should be {}",
            password.chars().count(),
            expected
        ),
    )
}

fn verdict(valid: bool) -> &'static str {
    if valid { "valid" } else { "invalid" }
}
