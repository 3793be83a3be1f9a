use tracing::info;

use crate::browser::error::BrowserError;
use crate::element::access::ElementAccess;
use crate::element::outcome::Outcome;
use crate::locator::elite_shoppy as loc;
use crate::page::{ElementQueryable, Navigable, await_loaded_signal, settle_navigation};

/// Elite Shoppy landing page: header buttons, product grid, poll and sorting.
pub struct HomePage<'b> {
    access: ElementAccess<'b>,
    url: String,
}

impl<'b> HomePage<'b> {
    pub fn new(access: ElementAccess<'b>, url: &str) -> Self {
        Self {
            access,
            url: url.to_string(),
        }
    }

    pub fn click_sign_in(&mut self) -> Result<bool, BrowserError> {
        Ok(self.access.try_click(&loc::SIGN_IN_BUTTON).into_option()?.is_some())
    }

    pub fn click_sign_up(&mut self) -> Result<bool, BrowserError> {
        Ok(self.access.try_click(&loc::SIGN_UP_BUTTON).into_option()?.is_some())
    }

    pub fn is_sign_in_button_visible(&mut self) -> Result<bool, BrowserError> {
        self.access.visibility(&loc::SIGN_IN_BUTTON).holds()
    }

    pub fn is_sign_up_button_visible(&mut self) -> Result<bool, BrowserError> {
        self.access.visibility(&loc::SIGN_UP_BUTTON).holds()
    }

    pub fn is_cart_button_visible(&mut self) -> Result<bool, BrowserError> {
        self.access.visibility(&loc::CART_BUTTON).holds()
    }

    pub fn click_cart(&mut self) -> Result<bool, BrowserError> {
        Ok(self.access.try_click(&loc::CART_BUTTON).into_option()?.is_some())
    }

    pub fn product_count(&mut self) -> Result<usize, BrowserError> {
        Ok(self.access.try_find_all(&loc::PRODUCT_ITEMS)?.len())
    }

    /// Open the quick-view link of the product at `index`.
    pub fn open_quick_view(&mut self, index: usize) -> Result<bool, BrowserError> {
        let products = self.access.try_find_all(&loc::PRODUCT_ITEMS)?;
        let Some(product) = products.get(index) else {
            return Ok(false);
        };
        let Some(link) = self.access.find_child(product, &loc::PRODUCT_LINK).into_option()? else {
            return Ok(false);
        };
        match self.access.click_handle(&link) {
            Outcome::Found(()) => {
                info!("Opened quick view for product {}", index);
                Ok(true)
            }
            Outcome::NotFound => Ok(false),
            Outcome::Errored(e) => Err(e),
        }
    }

    pub fn select_poll_option(&mut self, index: usize) -> Result<bool, BrowserError> {
        let options = self.access.try_find_all(&loc::POLL_OPTIONS)?;
        let Some(option) = options.get(index) else {
            return Ok(false);
        };
        Ok(self.access.click_handle(option).into_option()?.is_some())
    }

    pub fn is_poll_option_selected(&mut self, index: usize) -> Result<bool, BrowserError> {
        let options = self.access.try_find_all(&loc::POLL_OPTIONS)?;
        let Some(option) = options.get(index) else {
            return Ok(false);
        };
        let checked = self.access.element_attribute(option, "checked").or_empty()?;
        Ok(!checked.is_empty() && checked != "false")
    }

    pub fn submit_poll(&mut self) -> Result<bool, BrowserError> {
        Ok(self
            .access
            .try_click(&loc::POLL_SUBMIT_BUTTON)
            .into_option()?
            .is_some())
    }

    /// Choose `value` in the sort dropdown by typing it.
    pub fn sort_products(&mut self, value: &str) -> Result<bool, BrowserError> {
        Ok(self
            .access
            .send_keys(&loc::SORT_DROPDOWN, value)
            .into_option()?
            .is_some())
    }

    pub fn sort_value(&mut self) -> Result<String, BrowserError> {
        self.access.try_read_attribute(&loc::SORT_DROPDOWN, "value").or_empty()
    }
}

impl<'b> Navigable for HomePage<'b> {
    fn url(&self) -> &str {
        &self.url
    }

    fn open(&mut self) -> Result<&mut Self, BrowserError> {
        self.access.navigate(&self.url)?;
        settle_navigation(&mut self.access)?;
        await_loaded_signal(&mut self.access, &loc::SIGN_IN_BUTTON)?;
        info!("Opened Elite Shoppy home page");
        Ok(self)
    }

    /// Both header account buttons are visible.
    fn is_loaded(&mut self) -> Result<bool, BrowserError> {
        Ok(self.is_sign_in_button_visible()? && self.is_sign_up_button_visible()?)
    }
}

impl<'b> ElementQueryable<'b> for HomePage<'b> {
    fn access(&mut self) -> &mut ElementAccess<'b> {
        &mut self.access
    }
}
