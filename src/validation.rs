//! Form-data rules used by the sign-in, sign-up and data validation steps.

use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

/// Shortest accepted password, in characters.
pub const MIN_PASSWORD_LEN: usize = 6;
/// Shortest accepted name, in characters after trimming.
pub const MIN_NAME_LEN: usize = 2;

static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").expect("email pattern is valid")
});

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field} is required")]
    Required { field: &'static str },

    #[error("email '{0}' is not in a valid format")]
    EmailFormat(String),

    #[error("name must have at least {MIN_NAME_LEN} characters")]
    NameTooShort,

    #[error("name '{0}' must be letters only or contain a space")]
    NameCharacters(String),

    #[error("password must have at least {MIN_PASSWORD_LEN} characters")]
    PasswordTooShort,

    #[error("passwords do not match")]
    PasswordMismatch,
}

pub fn is_valid_email(email: &str) -> bool {
    EMAIL.is_match(email)
}

/// Letters only with at least two characters, or any name containing a space.
pub fn is_valid_name(name: &str) -> bool {
    let letters_only = !name.is_empty() && name.chars().all(char::is_alphabetic);
    (name.trim().chars().count() >= MIN_NAME_LEN && letters_only) || name.contains(' ')
}

pub fn is_valid_password(password: &str) -> bool {
    password.chars().count() >= MIN_PASSWORD_LEN
}

pub fn passwords_match(password: &str, confirmation: &str) -> bool {
    password == confirmation
}

pub fn check_email(email: &str) -> Result<(), ValidationError> {
    if email.is_empty() {
        return Err(ValidationError::Required { field: "email" });
    }
    if !is_valid_email(email) {
        return Err(ValidationError::EmailFormat(email.to_string()));
    }
    Ok(())
}

pub fn check_name(name: &str) -> Result<(), ValidationError> {
    if name.is_empty() {
        return Err(ValidationError::Required { field: "name" });
    }
    if name.trim().chars().count() < MIN_NAME_LEN {
        return Err(ValidationError::NameTooShort);
    }
    if !is_valid_name(name) {
        return Err(ValidationError::NameCharacters(name.to_string()));
    }
    Ok(())
}

pub fn check_password(password: &str) -> Result<(), ValidationError> {
    if password.is_empty() {
        return Err(ValidationError::Required { field: "password" });
    }
    if !is_valid_password(password) {
        return Err(ValidationError::PasswordTooShort);
    }
    Ok(())
}

pub fn check_confirmation(password: &str, confirmation: &str) -> Result<(), ValidationError> {
    if !passwords_match(password, confirmation) {
        return Err(ValidationError::PasswordMismatch);
    }
    Ok(())
}
