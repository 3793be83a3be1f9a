use tracing::info;

use crate::browser::error::BrowserError;
use crate::element::access::ElementAccess;
use crate::element::wait::WaitError;
use crate::locator::elite_shoppy as loc;
use crate::locator::registry::Locator;
use crate::page::ElementQueryable;

/// The Sign Up modal (`#myModal2`).
pub struct SignUpModal<'b> {
    access: ElementAccess<'b>,
}

/// Values for the four Sign Up inputs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignUpForm {
    pub name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

impl<'b> SignUpModal<'b> {
    pub fn new(access: ElementAccess<'b>) -> Self {
        Self { access }
    }

    pub fn wait_until_open(&mut self) -> Result<bool, BrowserError> {
        match self.access.wait_until_visible(&loc::SIGNUP_MODAL, None) {
            Ok(_) => Ok(true),
            Err(WaitError::TimedOut { .. }) => Ok(false),
            Err(WaitError::Browser(e)) => Err(e),
        }
    }

    pub fn is_displayed(&mut self) -> Result<bool, BrowserError> {
        self.access.visibility(&loc::SIGNUP_MODAL).holds()
    }

    pub fn heading(&mut self) -> Result<String, BrowserError> {
        self.access.try_read_text(&loc::SIGNUP_HEADING).or_empty()
    }

    pub fn has_field(&mut self, field: SignUpField) -> Result<bool, BrowserError> {
        self.access.visibility(&field.locator()).holds()
    }

    pub fn enter(&mut self, field: SignUpField, value: &str) -> Result<bool, BrowserError> {
        Ok(self
            .access
            .try_type_text(&field.locator(), value)
            .into_option()?
            .is_some())
    }

    pub fn value_of(&mut self, field: SignUpField) -> Result<String, BrowserError> {
        self.access
            .try_read_attribute(&field.locator(), "value")
            .or_empty()
    }

    pub fn fill(&mut self, form: &SignUpForm) -> Result<bool, BrowserError> {
        let filled = self.enter(SignUpField::Name, &form.name)?
            && self.enter(SignUpField::Email, &form.email)?
            && self.enter(SignUpField::Password, &form.password)?
            && self.enter(SignUpField::ConfirmPassword, &form.confirm_password)?;
        if filled {
            info!("Filled Sign Up form for '{}'", form.email);
        }
        Ok(filled)
    }

    /// Current values of all four inputs.
    pub fn read_form(&mut self) -> Result<SignUpForm, BrowserError> {
        Ok(SignUpForm {
            name: self.value_of(SignUpField::Name)?,
            email: self.value_of(SignUpField::Email)?,
            password: self.value_of(SignUpField::Password)?,
            confirm_password: self.value_of(SignUpField::ConfirmPassword)?,
        })
    }

    pub fn are_all_fields_empty(&mut self) -> Result<bool, BrowserError> {
        Ok(self.read_form()? == SignUpForm::default())
    }

    pub fn is_submit_enabled(&mut self) -> Result<bool, BrowserError> {
        self.access.enablement(&loc::SIGNUP_SUBMIT_BUTTON).holds()
    }

    pub fn submit(&mut self) -> Result<bool, BrowserError> {
        Ok(self
            .access
            .try_click(&loc::SIGNUP_SUBMIT_BUTTON)
            .into_option()?
            .is_some())
    }

    pub fn clear_fields(&mut self) -> Result<bool, BrowserError> {
        let mut all = true;
        for field in SignUpField::ALL {
            all &= self.access.try_clear(&field.locator()).into_option()?.is_some();
        }
        Ok(all)
    }

    pub fn close(&mut self) -> Result<bool, BrowserError> {
        if self.access.try_click(&loc::SIGNUP_MODAL_CLOSE).into_option()?.is_none() {
            return Ok(false);
        }
        match self.access.wait_until_hidden(&loc::SIGNUP_MODAL, None) {
            Ok(()) => Ok(true),
            Err(WaitError::TimedOut { .. }) => Ok(false),
            Err(WaitError::Browser(e)) => Err(e),
        }
    }
}

impl<'b> ElementQueryable<'b> for SignUpModal<'b> {
    fn access(&mut self) -> &mut ElementAccess<'b> {
        &mut self.access
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignUpField {
    Name,
    Email,
    Password,
    ConfirmPassword,
}

impl SignUpField {
    pub const ALL: [SignUpField; 4] = [
        SignUpField::Name,
        SignUpField::Email,
        SignUpField::Password,
        SignUpField::ConfirmPassword,
    ];

    fn locator(self) -> Locator {
        match self {
            SignUpField::Name => loc::SIGNUP_NAME_INPUT,
            SignUpField::Email => loc::SIGNUP_EMAIL_INPUT,
            SignUpField::Password => loc::SIGNUP_PASSWORD_INPUT,
            SignUpField::ConfirmPassword => loc::SIGNUP_CONFIRM_PASSWORD_INPUT,
        }
    }
}
