#![allow(dead_code)]

pub mod fake_browser;

use bdd_lab::element::WaitPolicy;
use bdd_lab::locator::elite_shoppy as loc;
use bdd_lab::locator::google;
use bdd_lab::steps::ScenarioContext;
use bdd_lab::steps::context::Sites;

use crate::common::fake_browser::{Effect, FakeBrowser, FakeElement};

pub const HOME_URL: &str = "https://shop.test/";
pub const MENS_URL: &str = "https://shop.test/mens.html";
pub const GOOGLE_URL: &str = "https://www.google.test";

pub fn sites() -> Sites {
    Sites {
        elite_home_url: HOME_URL.to_string(),
        elite_mens_url: MENS_URL.to_string(),
        google_url: GOOGLE_URL.to_string(),
    }
}

/// Context over `browser` whose waits probe once and never sleep.
pub fn context(browser: &FakeBrowser) -> ScenarioContext {
    ScenarioContext::new(
        "fixture scenario",
        Box::new(browser.clone()),
        sites(),
        WaitPolicy::immediate(),
    )
}

/// Elite Shoppy home page: header buttons, two product cards, a poll and
/// both modals (hidden until their header button is clicked).
pub fn elite_home() -> FakeBrowser {
    FakeBrowser::new()
        .at(HOME_URL)
        .titled("Elite Shoppy")
        .with(
            FakeElement::new("sign-in", &loc::SIGN_IN_BUTTON)
                .text("Sign In")
                .on_click(Effect::Show("login-modal".into())),
        )
        .with(
            FakeElement::new("sign-up", &loc::SIGN_UP_BUTTON)
                .text("Sign Up")
                .on_click(Effect::Show("signup-modal".into())),
        )
        .with(FakeElement::new("cart", &loc::CART_BUTTON))
        .with(FakeElement::new("product-1", &loc::PRODUCT_ITEMS))
        .with(FakeElement::new("product-2", &loc::PRODUCT_ITEMS))
        .with(
            FakeElement::new("quick-view-1", &loc::PRODUCT_LINK)
                .child_of("product-1")
                .on_click(Effect::Show("product-details".into())),
        )
        .with(FakeElement::matching("product-details", ".modal-body").hidden())
        .with(FakeElement::new("poll-1", &loc::POLL_OPTIONS))
        .with(FakeElement::new("poll-2", &loc::POLL_OPTIONS))
        .with(FakeElement::new("poll-send", &loc::POLL_SUBMIT_BUTTON))
        .with(FakeElement::new("sort", &loc::SORT_DROPDOWN))
        // Sign In modal
        .with(FakeElement::new("login-modal", &loc::LOGIN_MODAL).hidden())
        .with(FakeElement::new("login-name", &loc::LOGIN_NAME_INPUT))
        .with(FakeElement::new("login-email", &loc::LOGIN_EMAIL_INPUT))
        .with(FakeElement::new("login-submit", &loc::LOGIN_SUBMIT_BUTTON))
        .with(
            FakeElement::new("login-close", &loc::LOGIN_MODAL_CLOSE)
                .on_click(Effect::Hide("login-modal".into())),
        )
        // Sign Up modal
        .with(FakeElement::new("signup-modal", &loc::SIGNUP_MODAL).hidden())
        .with(FakeElement::new("signup-name", &loc::SIGNUP_NAME_INPUT))
        .with(FakeElement::new("signup-email", &loc::SIGNUP_EMAIL_INPUT))
        .with(FakeElement::new("signup-password", &loc::SIGNUP_PASSWORD_INPUT))
        .with(FakeElement::new("signup-confirm", &loc::SIGNUP_CONFIRM_PASSWORD_INPUT))
        .with(FakeElement::new("signup-submit", &loc::SIGNUP_SUBMIT_BUTTON))
        .with(
            FakeElement::new("signup-close", &loc::SIGNUP_MODAL_CLOSE)
                .on_click(Effect::Hide("signup-modal".into())),
        )
}

fn product_card(browser: FakeBrowser, n: usize, title: &str, price: &str) -> FakeBrowser {
    let card = format!("card-{}", n);
    browser
        .with(FakeElement::new(&card, &loc::PRODUCT_ITEMS))
        .with(
            FakeElement::new(&format!("{}-img", card), &loc::ITEM_IMAGE)
                .also(&loc::PRODUCT_IMAGES)
                .child_of(&card)
                .attr("src", &format!("images/m{}.jpg", n)),
        )
        .with(FakeElement::new(&format!("{}-title", card), &loc::ITEM_TITLE).child_of(&card).text(title))
        .with(FakeElement::new(&format!("{}-price", card), &loc::ITEM_PRICE).child_of(&card).text(price))
        .with(FakeElement::new(&format!("{}-buy", card), &loc::ITEM_ACTION_BUTTON).child_of(&card))
}

/// Elite Shoppy Mens page with the seeded defects: the footer Contact link
/// leads to YouTube and searching lands on a "Page not Found" page.
pub fn mens_page() -> FakeBrowser {
    let browser = FakeBrowser::new()
        .at(MENS_URL)
        .titled("Mens")
        .with_source("<html><body><h1>Mens wear</h1></body></html>")
        .with(FakeElement::new("title", &loc::PAGE_TITLE).text("Mens wear"))
        .with(FakeElement::new("header", &loc::HEADER))
        .with(FakeElement::new("nav", &loc::NAVIGATION_MENU))
        .with(
            FakeElement::new("menu-home", &loc::MENU_LINKS)
                .text("Home")
                .on_click(Effect::Navigate(HOME_URL.into())),
        )
        .with(
            FakeElement::new("menu-womens", &loc::MENU_LINKS)
                .text("Women's wear")
                .on_click(Effect::Navigate("https://shop.test/womens.html".into())),
        )
        .with(
            FakeElement::new("menu-mens", &loc::MENU_LINKS)
                .text("Mens")
                .on_click(Effect::Navigate(MENS_URL.into())),
        )
        .with(
            FakeElement::new("menu-contact", &loc::MENU_LINKS)
                .text("Contact")
                .on_click(Effect::Navigate("https://shop.test/contact.html".into())),
        )
        .with(
            FakeElement::new("footer", &loc::FOOTER).also(&loc::FOOTER_CONTACT_LINK).on_click(
                Effect::Navigate("https://www.youtube.com/watch?v=elite".into()),
            ),
        )
        .with(FakeElement::new("search", &loc::SEARCH_BAR))
        .with(
            FakeElement::new("search-go", &loc::SEARCH_BUTTON)
                .on_click(Effect::Navigate("https://shop.test/search?q=shirt".into()))
                .on_click(Effect::SetSource(
                    "<html><body><h2>Page not Found</h2></body></html>".into(),
                )),
        );
    let browser = product_card(browser, 1, "Formal Shirt", "$45.99");
    product_card(browser, 2, "Casual Jeans", "$39.99")
}

/// Google home page whose search button leads to a results page with ten
/// titled results, a stats line and a pager. Only the second logo variant
/// is on the page.
pub fn google_home() -> FakeBrowser {
    let mut browser = FakeBrowser::new()
        .at(GOOGLE_URL)
        .titled("Google")
        .with(FakeElement::new("q", &google::SEARCH_BOX))
        .with(
            FakeElement::new("btn-k", &google::SEARCH_BUTTON)
                .on_click(Effect::Navigate(format!("{}/search?q=selenium", GOOGLE_URL))),
        )
        .with(FakeElement::new("btn-i", &google::FEELING_LUCKY_BUTTON))
        .with(FakeElement::new("logo", &google::LOGO_ALTERNATIVE))
        .with(FakeElement::new("suggest-box", &google::SUGGESTIONS_CONTAINER).hidden())
        .with(FakeElement::new("stats", &google::RESULT_STATS).text("About 1,230,000 results (0.41 seconds)"))
        .with(
            FakeElement::new("next", &google::NEXT_PAGE)
                .on_click(Effect::Navigate(format!("{}/search?q=selenium&start=10", GOOGLE_URL))),
        );
    for i in 0..10 {
        browser = browser.with(
            FakeElement::new(&format!("result-{}", i), &google::RESULT_TITLES)
                .text(&format!("Selenium result {}", i)),
        );
    }
    browser
}
