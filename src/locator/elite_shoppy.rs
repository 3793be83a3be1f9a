//! Locators for the Elite Shoppy storefront (home page, modals, Mens catalog).

use crate::locator::registry::{Locator, LocatorError, LocatorRegistry};

// ---- Header & navigation ----
pub const SIGN_IN_BUTTON: Locator =
    Locator::css("sign_in_button", r##"[data-toggle="modal"][data-target="#myModal"]"##);
pub const SIGN_UP_BUTTON: Locator =
    Locator::css("sign_up_button", r##"[data-toggle="modal"][data-target="#myModal2"]"##);
pub const CART_BUTTON: Locator = Locator::css("cart_button", ".w3view-cart");
pub const HEADER: Locator = Locator::css("header", ".header-bot");
pub const NAVIGATION_MENU: Locator = Locator::css("navigation_menu", "nav.navbar");
pub const MENU_LINKS: Locator = Locator::css("menu_links", "a.menu__link");

// ---- Sign In modal ----
pub const LOGIN_MODAL: Locator = Locator::css("login_modal", "#myModal");
pub const LOGIN_HEADING: Locator = Locator::css("login_heading", "#myModal .agileinfo_sign");
pub const LOGIN_NAME_INPUT: Locator =
    Locator::css("login_name_input", r#"#myModal input[name="Name"]"#);
pub const LOGIN_EMAIL_INPUT: Locator =
    Locator::css("login_email_input", r#"#myModal input[name="Email"]"#);
pub const LOGIN_SUBMIT_BUTTON: Locator = Locator::css(
    "login_submit_button",
    r#"#myModal input[type="submit"][value="Sign In"]"#,
);
pub const LOGIN_MODAL_CLOSE: Locator = Locator::css("login_modal_close", "#myModal button.close");

// ---- Sign Up modal ----
pub const SIGNUP_MODAL: Locator = Locator::css("signup_modal", "#myModal2");
pub const SIGNUP_HEADING: Locator =
    Locator::css("signup_heading", "#myModal2 .agileinfo_sign");
pub const SIGNUP_NAME_INPUT: Locator =
    Locator::css("signup_name_input", r#"#myModal2 input[name="Name"]"#);
pub const SIGNUP_EMAIL_INPUT: Locator =
    Locator::css("signup_email_input", r#"#myModal2 input[name="Email"]"#);
pub const SIGNUP_PASSWORD_INPUT: Locator =
    Locator::css("signup_password_input", r#"#myModal2 input[name="password"]"#);
pub const SIGNUP_CONFIRM_PASSWORD_INPUT: Locator = Locator::css(
    "signup_confirm_password_input",
    r#"#myModal2 input[name="Confirm Password"]"#,
);
pub const SIGNUP_SUBMIT_BUTTON: Locator = Locator::css(
    "signup_submit_button",
    r#"#myModal2 input[type="submit"][value="Sign Up"]"#,
);
pub const SIGNUP_MODAL_CLOSE: Locator =
    Locator::css("signup_modal_close", "#myModal2 button.close");

// ---- Products ----
pub const PRODUCT_ITEMS: Locator = Locator::css("product_items", ".product-men");
pub const PRODUCT_IMAGES: Locator =
    Locator::css("product_images", ".product-men .pro-image-front");
pub const PRODUCT_LINK: Locator = Locator::css("product_link", ".link-product-add-cart");

// Relative to one product card.
pub const ITEM_IMAGE: Locator = Locator::css("item_image", ".pro-image-front");
pub const ITEM_TITLE: Locator = Locator::tag("item_title", "h4");
pub const ITEM_TITLE_FALLBACK: Locator = Locator::tag("item_title_fallback", "h5");
pub const ITEM_PRICE: Locator = Locator::css("item_price", ".item_price");
pub const ITEM_PRICE_FALLBACK: Locator = Locator::css("item_price_fallback", ".price");
pub const ITEM_ACTION_BUTTON: Locator =
    Locator::css("item_action_button", r#"input[type="submit"]"#);

// ---- Search ----
pub const SEARCH_BAR: Locator = Locator::css("search_bar", r#"input[type="search"]"#);
pub const SEARCH_BUTTON: Locator = Locator::css(
    "search_button",
    r#"form:has(input[type="search"]) input[type="submit"]"#,
);
pub const NO_RESULTS_MESSAGE: Locator =
    Locator::css("no_results_message", ".no-results, .error-message");

// ---- Community poll, sort & filter ----
pub const POLL_OPTIONS: Locator = Locator::css("poll_options", r#"input[name="radio"]"#);
pub const POLL_SUBMIT_BUTTON: Locator = Locator::css("poll_submit_button", r#"input[value="SEND"]"#);
pub const SORT_DROPDOWN: Locator = Locator::by_id("sort_dropdown", "country1");
pub const PRICE_FILTER_INPUT: Locator = Locator::by_id("price_filter_input", "amount");

// ---- Footer & page info ----
pub const FOOTER: Locator = Locator::css("footer", ".copy-right, .footer-social");
pub const FOOTER_CONTACT_LINK: Locator =
    Locator::css("footer_contact_link", r#"a.menu__link[href*="contact"]"#);
pub const PAGE_TITLE: Locator = Locator::css("page_title", "h1, .page-head_agile_info_w3l h3");
pub const PHONE_LINK: Locator = Locator::css("phone_link", r#"a[href*="phone"]"#);
pub const EMAIL_LINK: Locator = Locator::css("email_link", r#"a[href*="mailto"]"#);

// ---- Generic ----
pub const SPINNER: Locator = Locator::css("spinner", ".loading");
pub const ERROR_MESSAGE: Locator = Locator::css("error_message", ".error-message");
pub const SUCCESS_MESSAGE: Locator = Locator::css("success_message", ".success-message");
pub const PAGE_NOT_FOUND: Locator = Locator::css("page_not_found", ".not-found, .error-404");
pub const TOUCH_TARGETS: Locator = Locator::css(
    "touch_targets",
    r#"button, input[type="button"], input[type="submit"], a.button"#,
);

/// Every Elite Shoppy locator in one scope.
pub fn registry() -> Result<LocatorRegistry, LocatorError> {
    LocatorRegistry::from_entries(
        "elite_shoppy",
        [
            SIGN_IN_BUTTON,
            SIGN_UP_BUTTON,
            CART_BUTTON,
            HEADER,
            NAVIGATION_MENU,
            MENU_LINKS,
            LOGIN_MODAL,
            LOGIN_HEADING,
            LOGIN_NAME_INPUT,
            LOGIN_EMAIL_INPUT,
            LOGIN_SUBMIT_BUTTON,
            LOGIN_MODAL_CLOSE,
            SIGNUP_MODAL,
            SIGNUP_HEADING,
            SIGNUP_NAME_INPUT,
            SIGNUP_EMAIL_INPUT,
            SIGNUP_PASSWORD_INPUT,
            SIGNUP_CONFIRM_PASSWORD_INPUT,
            SIGNUP_SUBMIT_BUTTON,
            SIGNUP_MODAL_CLOSE,
            PRODUCT_ITEMS,
            PRODUCT_IMAGES,
            PRODUCT_LINK,
            ITEM_IMAGE,
            ITEM_TITLE,
            ITEM_TITLE_FALLBACK,
            ITEM_PRICE,
            ITEM_PRICE_FALLBACK,
            ITEM_ACTION_BUTTON,
            SEARCH_BAR,
            SEARCH_BUTTON,
            NO_RESULTS_MESSAGE,
            POLL_OPTIONS,
            POLL_SUBMIT_BUTTON,
            SORT_DROPDOWN,
            PRICE_FILTER_INPUT,
            FOOTER,
            FOOTER_CONTACT_LINK,
            PAGE_TITLE,
            PHONE_LINK,
            EMAIL_LINK,
            SPINNER,
            ERROR_MESSAGE,
            SUCCESS_MESSAGE,
            PAGE_NOT_FOUND,
            TOUCH_TARGETS,
        ],
    )
}
