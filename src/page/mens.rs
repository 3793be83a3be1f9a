use std::time::{Duration, Instant};

use tracing::{debug, info};

use crate::browser::capability::{ENTER_KEY, ElementHandle};
use crate::browser::error::BrowserError;
use crate::element::access::ElementAccess;
use crate::element::outcome::Outcome;
use crate::element::scripts;
use crate::element::wait::WaitError;
use crate::locator::elite_shoppy as loc;
use crate::locator::registry::Locator;
use crate::page::layout::{self, Viewport};
use crate::page::{ElementQueryable, Navigable, await_loaded_signal, settle_navigation, url_path};

/// The Mens catalog page of the Elite Shoppy store.
pub struct MensPage<'b> {
    access: ElementAccess<'b>,
    url: String,
}

impl<'b> MensPage<'b> {
    pub fn new(access: ElementAccess<'b>, url: &str) -> Self {
        Self {
            access,
            url: url.to_string(),
        }
    }

    /// Time until the page title (the loaded signal) is present.
    pub fn page_load_time(&mut self) -> Result<Duration, BrowserError> {
        let start = Instant::now();
        self.is_loaded()?;
        Ok(start.elapsed())
    }

    // ========================================================================
    // Landmarks & resources
    // ========================================================================

    /// Header and products visible, footer present in the document.
    pub fn are_landmarks_visible(&mut self) -> Result<bool, BrowserError> {
        for (name, landmark) in [("header", &loc::HEADER), ("products", &loc::PRODUCT_ITEMS)] {
            if !self.access.visibility(landmark).holds()? {
                info!("Landmark '{}' not visible", name);
                return Ok(false);
            }
        }
        if !self.access.is_present(&loc::FOOTER)? {
            info!("Landmark 'footer' not found");
            return Ok(false);
        }
        Ok(true)
    }

    /// Every product image has a non-empty `src`. No images at all is a failure.
    pub fn are_product_images_loaded(&mut self) -> Result<bool, BrowserError> {
        let images = self.access.try_find_all(&loc::PRODUCT_IMAGES)?;
        if images.is_empty() {
            return Ok(false);
        }
        for image in &images {
            let src = self.access.element_attribute(image, "src").or_empty()?;
            if src.trim().is_empty() {
                return Ok(false);
            }
        }
        info!("All {} product images loaded", images.len());
        Ok(true)
    }

    pub fn are_resources_available(&mut self) -> Result<bool, BrowserError> {
        let available = self.access.execute(scripts::RESOURCES_AVAILABLE, &[])?;
        Ok(available.as_bool().unwrap_or(false))
    }

    // ========================================================================
    // Navigation menu
    // ========================================================================

    pub fn is_navigation_menu_visible(&mut self) -> Result<bool, BrowserError> {
        self.access.visibility(&loc::NAVIGATION_MENU).holds()
    }

    pub fn hover_menu_item(&mut self, name: &str) -> Result<bool, BrowserError> {
        let Some(link) = self.find_menu_link(name)? else {
            return Ok(false);
        };
        let hovered = self.access.hover(&link).into_option()?.is_some();
        if hovered {
            info!("Hovered over menu item '{}'", name);
        }
        Ok(hovered)
    }

    pub fn click_menu_link(&mut self, name: &str) -> Result<bool, BrowserError> {
        let Some(link) = self.find_menu_link(name)? else {
            return Ok(false);
        };
        if self.access.click_handle(&link).into_option()?.is_none() {
            return Ok(false);
        }
        settle_navigation(&mut self.access)?;
        info!("Clicked menu link '{}'", name);
        Ok(true)
    }

    /// Menu link whose text matches `name` case-insensitively, treating
    /// "Womens"/"Women's" as "women" and "Mens"/"Men's" as "men". An exact
    /// match wins over a substring match.
    fn find_menu_link(&mut self, name: &str) -> Result<Option<ElementHandle>, BrowserError> {
        let wanted = normalize_menu_label(name);
        let mut partial = None;
        for link in self.access.try_find_all(&loc::MENU_LINKS)? {
            let text = normalize_menu_label(&self.access.element_text(&link).or_empty()?);
            if text == wanted {
                return Ok(Some(link));
            }
            if partial.is_none() && text.contains(&wanted) {
                partial = Some(link);
            }
        }
        if partial.is_none() {
            debug!("no menu link matches '{}'", name);
        }
        Ok(partial)
    }

    pub fn is_on_mens_page(&mut self) -> Result<bool, BrowserError> {
        let path = url_path(&self.access.current_url()?);
        Ok(path.contains("mens") && !path.contains("womens"))
    }

    pub fn is_on_womens_page(&mut self) -> Result<bool, BrowserError> {
        Ok(url_path(&self.access.current_url()?).contains("womens"))
    }

    pub fn is_on_home_page(&mut self) -> Result<bool, BrowserError> {
        let path = url_path(&self.access.current_url()?);
        let trimmed = path.trim_matches('/');
        Ok(trimmed.is_empty() || trimmed.contains("index"))
    }

    pub fn is_on_contact_page(&mut self) -> Result<bool, BrowserError> {
        Ok(self.access.current_url()?.to_lowercase().contains("contact"))
    }

    /// No "404" or "500" marker anywhere in the page source.
    pub fn has_no_error_status_markers(&mut self) -> Result<bool, BrowserError> {
        let source = self.access.page_source()?.to_lowercase();
        Ok(!source.contains("404") && !source.contains("500"))
    }

    // ========================================================================
    // Products
    // ========================================================================

    pub fn product_count(&mut self) -> Result<usize, BrowserError> {
        let count = self.access.try_find_all(&loc::PRODUCT_ITEMS)?.len();
        debug!("{} products on page", count);
        Ok(count)
    }

    fn product(&mut self, index: usize) -> Result<Option<ElementHandle>, BrowserError> {
        Ok(self.access.try_find_all(&loc::PRODUCT_ITEMS)?.into_iter().nth(index))
    }

    /// Text of the first child matching `primary`, or `secondary` when the
    /// primary selector finds nothing.
    fn product_field(
        &mut self,
        index: usize,
        primary: &Locator,
        secondary: &Locator,
    ) -> Result<Option<String>, BrowserError> {
        let Some(product) = self.product(index)? else {
            return Ok(None);
        };
        for locator in [primary, secondary] {
            match self.access.find_child(&product, locator) {
                Outcome::Found(field) => return self.access.element_text(&field).into_option(),
                Outcome::NotFound => continue,
                Outcome::Errored(e) => return Err(e),
            }
        }
        Ok(None)
    }

    pub fn product_title(&mut self, index: usize) -> Result<Option<String>, BrowserError> {
        self.product_field(index, &loc::ITEM_TITLE, &loc::ITEM_TITLE_FALLBACK)
    }

    pub fn product_price(&mut self, index: usize) -> Result<Option<String>, BrowserError> {
        self.product_field(index, &loc::ITEM_PRICE, &loc::ITEM_PRICE_FALLBACK)
    }

    pub fn product_has_image(&mut self, index: usize) -> Result<bool, BrowserError> {
        let Some(product) = self.product(index)? else {
            return Ok(false);
        };
        let Some(image) = self.access.find_child(&product, &loc::ITEM_IMAGE).into_option()? else {
            return Ok(false);
        };
        let src = self.access.element_attribute(&image, "src").or_empty()?;
        Ok(!src.trim().is_empty())
    }

    pub fn product_has_title(&mut self, index: usize) -> Result<bool, BrowserError> {
        Ok(self.product_title(index)?.is_some())
    }

    pub fn product_has_price(&mut self, index: usize) -> Result<bool, BrowserError> {
        Ok(self.product_price(index)?.is_some())
    }

    pub fn product_has_action_button(&mut self, index: usize) -> Result<bool, BrowserError> {
        let Some(product) = self.product(index)? else {
            return Ok(false);
        };
        Ok(!self
            .access
            .find_children(&product, &loc::ITEM_ACTION_BUTTON)?
            .is_empty())
    }

    /// Image, title and price present on every product card.
    pub fn all_products_have_required_fields(&mut self) -> Result<bool, BrowserError> {
        let count = self.product_count()?;
        for i in 0..count {
            if !(self.product_has_image(i)? && self.product_has_title(i)? && self.product_has_price(i)?) {
                debug!("product {} is missing a required field", i);
                return Ok(false);
            }
        }
        info!("All {} products have required fields", count);
        Ok(true)
    }

    pub fn scroll_to_products(&mut self) -> Result<bool, BrowserError> {
        Ok(self.access.scroll_into_view(&loc::PRODUCT_ITEMS).into_option()?.is_some())
    }

    // ========================================================================
    // Search
    // ========================================================================

    pub fn is_search_bar_visible(&mut self) -> Result<bool, BrowserError> {
        self.access.visibility(&loc::SEARCH_BAR).holds()
    }

    /// Present and accepting input.
    pub fn is_search_bar_active(&mut self) -> Result<bool, BrowserError> {
        self.access.enablement(&loc::SEARCH_BAR).holds()
    }

    pub fn enter_search_term(&mut self, term: &str) -> Result<bool, BrowserError> {
        let typed = self
            .access
            .try_type_text(&loc::SEARCH_BAR, term)
            .into_option()?
            .is_some();
        if typed {
            info!("Entered search term '{}'", term);
        }
        Ok(typed)
    }

    /// Click the search button, or submit the form with Enter when no button
    /// can be clicked, then wait for the resulting page to load.
    pub fn submit_search(&mut self) -> Result<bool, BrowserError> {
        let submitted = match self.access.try_click(&loc::SEARCH_BUTTON) {
            Outcome::Found(()) => true,
            Outcome::NotFound => {
                debug!("no clickable search button, submitting with Enter");
                self.access
                    .send_keys(&loc::SEARCH_BAR, ENTER_KEY)
                    .into_option()?
                    .is_some()
            }
            Outcome::Errored(e) => return Err(e),
        };
        if submitted {
            settle_navigation(&mut self.access)?;
            info!("Submitted search");
        }
        Ok(submitted)
    }

    pub fn has_results(&mut self) -> Result<bool, BrowserError> {
        Ok(self.product_count()? > 0)
    }

    /// "not found" or "404" anywhere in the page source.
    pub fn shows_not_found_indicator(&mut self) -> Result<bool, BrowserError> {
        let source = self.access.page_source()?.to_lowercase();
        Ok(source.contains("not found") || source.contains("404"))
    }

    /// The term appears in the page and at least one product is listed.
    pub fn results_are_relevant(&mut self, term: &str) -> Result<bool, BrowserError> {
        let source = self.access.page_source()?.to_lowercase();
        Ok(source.contains(&term.to_lowercase()) && self.product_count()? > 0)
    }

    // ========================================================================
    // Footer
    // ========================================================================

    pub fn scroll_to_footer(&mut self) -> Result<bool, BrowserError> {
        Ok(self.access.scroll_into_view(&loc::FOOTER).into_option()?.is_some())
    }

    pub fn is_footer_visible(&mut self) -> Result<bool, BrowserError> {
        self.access.visibility(&loc::FOOTER).holds()
    }

    pub fn click_contact_link(&mut self) -> Result<bool, BrowserError> {
        if self.access.try_click(&loc::FOOTER_CONTACT_LINK).into_option()?.is_none() {
            return Ok(false);
        }
        settle_navigation(&mut self.access)?;
        info!("Clicked contact link in footer");
        Ok(true)
    }

    // ========================================================================
    // Responsiveness
    // ========================================================================

    pub fn resize(&mut self, width: u32, height: u32) -> Result<(), BrowserError> {
        layout::resize(&mut self.access, width, height)
    }

    pub fn set_viewport(&mut self, viewport: Viewport) -> Result<(), BrowserError> {
        self.resize(viewport.width, viewport.height)
    }

    pub fn has_horizontal_scroll(&mut self) -> Result<bool, BrowserError> {
        layout::has_horizontal_scroll(&mut self.access)
    }

    pub fn has_vertical_scroll_capacity(&mut self) -> Result<bool, BrowserError> {
        layout::has_vertical_scroll_capacity(&mut self.access)
    }

    /// A present landmark (header, nav, products, footer) that is not
    /// displayed is taken to be covered by something else.
    pub fn has_overlapping_critical_elements(&mut self) -> Result<bool, BrowserError> {
        layout::has_hidden_landmark(
            &mut self.access,
            &[loc::HEADER, loc::NAVIGATION_MENU, loc::PRODUCT_ITEMS, loc::FOOTER],
        )
    }

    pub fn is_layout_acceptable(&mut self) -> Result<bool, BrowserError> {
        Ok(!self.has_horizontal_scroll()? && !self.has_overlapping_critical_elements()?)
    }

    pub fn all_interactive_elements_meet_minimum_size(&mut self, min_px: f64) -> Result<bool, BrowserError> {
        layout::all_meet_minimum_size(&mut self.access, &loc::TOUCH_TARGETS, min_px)
    }
}

impl<'b> Navigable for MensPage<'b> {
    fn url(&self) -> &str {
        &self.url
    }

    fn open(&mut self) -> Result<&mut Self, BrowserError> {
        self.access.navigate(&self.url)?;
        settle_navigation(&mut self.access)?;
        await_loaded_signal(&mut self.access, &loc::PAGE_TITLE)?;
        info!("Opened Mens page");
        Ok(self)
    }

    /// The page title is present within the probe budget.
    fn is_loaded(&mut self) -> Result<bool, BrowserError> {
        let budget = self.access.policy().probe;
        match self.access.wait_until_present(&loc::PAGE_TITLE, Some(budget)) {
            Ok(_) => Ok(true),
            Err(WaitError::TimedOut { .. }) => Ok(false),
            Err(WaitError::Browser(e)) => Err(e),
        }
    }
}

impl<'b> ElementQueryable<'b> for MensPage<'b> {
    fn access(&mut self) -> &mut ElementAccess<'b> {
        &mut self.access
    }
}

fn normalize_menu_label(label: &str) -> String {
    label
        .trim()
        .to_lowercase()
        .replace(['\'', '\u{2019}'], "")
        .replace("womens", "women")
        .replace("mens", "men")
}
