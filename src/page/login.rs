use tracing::info;

use crate::browser::error::BrowserError;
use crate::element::access::ElementAccess;
use crate::element::wait::WaitError;
use crate::locator::elite_shoppy as loc;
use crate::page::ElementQueryable;

/// The Sign In modal (`#myModal`) opened from the home page header.
pub struct LoginModal<'b> {
    access: ElementAccess<'b>,
}

impl<'b> LoginModal<'b> {
    pub fn new(access: ElementAccess<'b>) -> Self {
        Self { access }
    }

    /// Wait for the modal to become visible after the header button was clicked.
    pub fn wait_until_open(&mut self) -> Result<bool, BrowserError> {
        match self.access.wait_until_visible(&loc::LOGIN_MODAL, None) {
            Ok(_) => Ok(true),
            Err(WaitError::TimedOut { .. }) => Ok(false),
            Err(WaitError::Browser(e)) => Err(e),
        }
    }

    pub fn is_displayed(&mut self) -> Result<bool, BrowserError> {
        self.access.visibility(&loc::LOGIN_MODAL).holds()
    }

    pub fn heading(&mut self) -> Result<String, BrowserError> {
        self.access.try_read_text(&loc::LOGIN_HEADING).or_empty()
    }

    pub fn has_name_field(&mut self) -> Result<bool, BrowserError> {
        self.access.visibility(&loc::LOGIN_NAME_INPUT).holds()
    }

    pub fn has_email_field(&mut self) -> Result<bool, BrowserError> {
        self.access.visibility(&loc::LOGIN_EMAIL_INPUT).holds()
    }

    pub fn enter_name(&mut self, name: &str) -> Result<bool, BrowserError> {
        Ok(self
            .access
            .try_type_text(&loc::LOGIN_NAME_INPUT, name)
            .into_option()?
            .is_some())
    }

    pub fn enter_email(&mut self, email: &str) -> Result<bool, BrowserError> {
        Ok(self
            .access
            .try_type_text(&loc::LOGIN_EMAIL_INPUT, email)
            .into_option()?
            .is_some())
    }

    pub fn name_value(&mut self) -> Result<String, BrowserError> {
        self.access
            .try_read_attribute(&loc::LOGIN_NAME_INPUT, "value")
            .or_empty()
    }

    pub fn email_value(&mut self) -> Result<String, BrowserError> {
        self.access
            .try_read_attribute(&loc::LOGIN_EMAIL_INPUT, "value")
            .or_empty()
    }

    pub fn fill(&mut self, name: &str, email: &str) -> Result<bool, BrowserError> {
        let filled = self.enter_name(name)? && self.enter_email(email)?;
        if filled {
            info!("Filled Sign In form for '{}'", email);
        }
        Ok(filled)
    }

    pub fn is_submit_enabled(&mut self) -> Result<bool, BrowserError> {
        self.access.enablement(&loc::LOGIN_SUBMIT_BUTTON).holds()
    }

    pub fn submit(&mut self) -> Result<bool, BrowserError> {
        Ok(self
            .access
            .try_click(&loc::LOGIN_SUBMIT_BUTTON)
            .into_option()?
            .is_some())
    }

    pub fn clear_fields(&mut self) -> Result<bool, BrowserError> {
        let name = self.access.try_clear(&loc::LOGIN_NAME_INPUT).into_option()?;
        let email = self.access.try_clear(&loc::LOGIN_EMAIL_INPUT).into_option()?;
        Ok(name.is_some() && email.is_some())
    }

    /// Click the close button and wait for the modal to disappear.
    pub fn close(&mut self) -> Result<bool, BrowserError> {
        if self.access.try_click(&loc::LOGIN_MODAL_CLOSE).into_option()?.is_none() {
            return Ok(false);
        }
        match self.access.wait_until_hidden(&loc::LOGIN_MODAL, None) {
            Ok(()) => Ok(true),
            Err(WaitError::TimedOut { .. }) => Ok(false),
            Err(WaitError::Browser(e)) => Err(e),
        }
    }
}

impl<'b> ElementQueryable<'b> for LoginModal<'b> {
    fn access(&mut self) -> &mut ElementAccess<'b> {
        &mut self.access
    }
}
