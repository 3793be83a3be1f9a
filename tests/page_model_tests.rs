mod common;

use std::time::{Duration, Instant};

use bdd_lab::element::{ElementAccess, WaitPolicy};
use bdd_lab::locator::elite_shoppy as loc;
use bdd_lab::page::google_results::parse_total_results;
use bdd_lab::page::layout::MIN_TOUCH_TARGET_PX;
use bdd_lab::page::signup::{SignUpField, SignUpForm};
use bdd_lab::page::{
    ElementQueryable, GoogleHomePage, GoogleResultsPage, HomePage, LoginModal, MensPage, Navigable,
    PageId, SignUpModal, Viewport,
};

use crate::common::fake_browser::{FakeBrowser, FakeElement, metrics_value};
use crate::common::{GOOGLE_URL, HOME_URL, MENS_URL, elite_home, google_home, mens_page};

fn access(browser: &mut FakeBrowser) -> ElementAccess<'_> {
    ElementAccess::new(browser, WaitPolicy::immediate())
}

// ============================================================================
// Home page and modals
// ============================================================================

#[test]
fn test_home_page_open_and_loaded() {
    let mut browser = FakeBrowser::new().at("about:blank");
    let inspect = browser.clone();
    {
        let mut home = HomePage::new(access(&mut browser), HOME_URL);
        home.open().unwrap();
        assert_eq!(home.url(), HOME_URL);
        assert!(!home.is_loaded().unwrap());
    }
    assert_eq!(inspect.log(), vec![format!("navigate {}", HOME_URL)]);

    let mut browser = elite_home();
    let mut home = HomePage::new(access(&mut browser), HOME_URL);
    assert!(home.is_loaded().unwrap());
    assert!(home.is_cart_button_visible().unwrap());
    assert_eq!(home.title().unwrap(), "Elite Shoppy");
}

#[test]
fn test_home_page_products_and_quick_view() {
    let mut browser = elite_home();
    let inspect = browser.clone();
    let mut home = HomePage::new(access(&mut browser), HOME_URL);

    assert_eq!(home.product_count().unwrap(), 2);
    assert!(home.open_quick_view(0).unwrap());
    assert!(inspect.is_displayed("product-details"));
    // Second card has no quick-view link, third card does not exist.
    assert!(!home.open_quick_view(1).unwrap());
    assert!(!home.open_quick_view(2).unwrap());
}

#[test]
fn test_home_page_poll_and_sorting() {
    let mut browser = elite_home();
    let inspect = browser.clone();
    let mut home = HomePage::new(access(&mut browser), HOME_URL);

    assert!(home.select_poll_option(1).unwrap());
    assert!(!home.select_poll_option(5).unwrap());
    assert!(!home.is_poll_option_selected(0).unwrap());
    inspect
        .page()
        .elements
        .iter_mut()
        .find(|e| e.id == "poll-2")
        .unwrap()
        .attributes
        .insert("checked".into(), "true".into());
    assert!(home.is_poll_option_selected(1).unwrap());
    assert!(home.submit_poll().unwrap());

    assert!(home.sort_products("Price: Low to High").unwrap());
    assert_eq!(home.sort_value().unwrap(), "Price: Low to High");
}

#[test]
fn test_login_modal_opens_fills_and_closes() {
    let mut browser = elite_home();
    let inspect = browser.clone();
    {
        let mut home = HomePage::new(access(&mut browser), HOME_URL);
        assert!(home.click_sign_in().unwrap());
    }
    let mut modal = LoginModal::new(access(&mut browser));
    assert!(modal.wait_until_open().unwrap());
    assert!(modal.has_name_field().unwrap());
    assert!(modal.has_email_field().unwrap());

    assert!(modal.fill("John Doe", "john@example.com").unwrap());
    assert_eq!(modal.name_value().unwrap(), "John Doe");
    assert_eq!(modal.email_value().unwrap(), "john@example.com");
    assert!(modal.is_submit_enabled().unwrap());

    assert!(modal.clear_fields().unwrap());
    assert_eq!(inspect.value_of("login-email"), "");

    assert!(modal.close().unwrap());
    assert!(!modal.is_displayed().unwrap());
}

#[test]
fn test_login_modal_not_open_without_click() {
    let mut browser = elite_home();
    let mut modal = LoginModal::new(access(&mut browser));
    assert!(!modal.wait_until_open().unwrap());
    assert_eq!(modal.heading().unwrap(), "");
}

#[test]
fn test_signup_modal_round_trips_form() {
    let mut browser = elite_home();
    {
        let mut home = HomePage::new(access(&mut browser), HOME_URL);
        assert!(home.click_sign_up().unwrap());
    }
    let mut modal = SignUpModal::new(access(&mut browser));
    assert!(modal.wait_until_open().unwrap());
    for field in SignUpField::ALL {
        assert!(modal.has_field(field).unwrap());
    }
    assert!(modal.are_all_fields_empty().unwrap());

    let form = SignUpForm {
        name: "Jane Doe".into(),
        email: "jane@example.com".into(),
        password: "secret12".into(),
        confirm_password: "secret12".into(),
    };
    assert!(modal.fill(&form).unwrap());
    assert_eq!(modal.read_form().unwrap(), form);
    assert_eq!(modal.value_of(SignUpField::Password).unwrap(), "secret12");

    assert!(modal.clear_fields().unwrap());
    assert!(modal.are_all_fields_empty().unwrap());
    assert!(modal.close().unwrap());
}

#[test]
fn test_broken_session_surfaces_as_error() {
    let mut browser = elite_home().broken();
    let mut home = HomePage::new(access(&mut browser), HOME_URL);
    assert!(home.is_loaded().is_err());
    assert!(home.click_sign_in().is_err());
}

// ============================================================================
// Mens page
// ============================================================================

#[test]
fn test_mens_page_loaded_signal_and_landmarks() {
    let mut browser = mens_page();
    let mut mens = MensPage::new(access(&mut browser), MENS_URL);
    assert!(mens.is_loaded().unwrap());
    assert!(mens.page_load_time().unwrap().as_secs() < 5);
    assert!(mens.are_landmarks_visible().unwrap());
    assert!(mens.are_product_images_loaded().unwrap());
    assert!(mens.has_no_error_status_markers().unwrap());
    assert!(mens.is_on_mens_page().unwrap());

    let mut empty = FakeBrowser::new().at(MENS_URL);
    let mut mens = MensPage::new(access(&mut empty), MENS_URL);
    assert!(!mens.is_loaded().unwrap());
    assert!(!mens.are_product_images_loaded().unwrap());
}

#[test]
fn test_open_waits_for_loaded_signal() {
    let patient = WaitPolicy {
        element: Duration::from_millis(300),
        ..WaitPolicy::immediate()
    };

    let mut empty = FakeBrowser::new().at("about:blank");
    let started = Instant::now();
    {
        let mut mens = MensPage::new(ElementAccess::new(&mut empty, patient), MENS_URL);
        mens.open().unwrap();
        assert!(started.elapsed() >= Duration::from_millis(300));
        assert!(!mens.is_loaded().unwrap());
    }
    let started = Instant::now();
    {
        let mut home = HomePage::new(ElementAccess::new(&mut empty, patient), HOME_URL);
        home.open().unwrap();
        assert!(started.elapsed() >= Duration::from_millis(300));
    }

    let mut browser = mens_page();
    let started = Instant::now();
    let mut mens = MensPage::new(ElementAccess::new(&mut browser, patient), MENS_URL);
    mens.open().unwrap();
    assert!(started.elapsed() < Duration::from_millis(300));
    assert!(mens.is_loaded().unwrap());

    let mut browser = elite_home();
    let mut home = HomePage::new(ElementAccess::new(&mut browser, patient), HOME_URL);
    home.open().unwrap();
    assert!(home.is_loaded().unwrap());
}

#[test]
fn test_is_loaded_is_stable_across_calls() {
    let mut browser = mens_page();
    let mut mens = MensPage::new(access(&mut browser), MENS_URL);
    assert!(mens.is_loaded().unwrap());
    assert!(mens.is_loaded().unwrap());

    let mut browser = elite_home();
    let mut home = HomePage::new(access(&mut browser), HOME_URL);
    assert!(home.is_loaded().unwrap());
    assert!(home.is_loaded().unwrap());

    let mut browser = google_home();
    let mut google = GoogleHomePage::new(access(&mut browser), GOOGLE_URL);
    assert!(google.is_loaded().unwrap());
    assert!(google.is_loaded().unwrap());

    let mut empty = FakeBrowser::new().at(MENS_URL);
    let mut mens = MensPage::new(access(&mut empty), MENS_URL);
    assert!(!mens.is_loaded().unwrap());
    assert!(!mens.is_loaded().unwrap());
}

#[test]
fn test_mens_page_resources_come_from_script() {
    let mut browser = mens_page().with_script("styleSheets", serde_json::json!(true));
    let mut mens = MensPage::new(access(&mut browser), MENS_URL);
    assert!(mens.are_resources_available().unwrap());

    let mut bare = mens_page();
    let mut mens = MensPage::new(access(&mut bare), MENS_URL);
    assert!(!mens.are_resources_available().unwrap());
}

#[test]
fn test_menu_exact_label_beats_substring() {
    // "Women's wear" normalizes to "women wear", which contains "men".
    let mut browser = mens_page();
    let mut mens = MensPage::new(access(&mut browser), MENS_URL);
    assert!(mens.click_menu_link("Mens").unwrap());
    assert!(mens.is_on_mens_page().unwrap());

    assert!(mens.click_menu_link("Womens").unwrap());
    assert!(mens.is_on_womens_page().unwrap());
    assert!(!mens.is_on_mens_page().unwrap());

    assert!(mens.click_menu_link("home").unwrap());
    assert!(mens.is_on_home_page().unwrap());

    assert!(!mens.click_menu_link("Kids").unwrap());
}

#[test]
fn test_menu_hover_logs_target() {
    let mut browser = mens_page();
    let inspect = browser.clone();
    let mut mens = MensPage::new(access(&mut browser), MENS_URL);
    assert!(mens.is_navigation_menu_visible().unwrap());
    assert!(mens.hover_menu_item("Contact").unwrap());
    assert_eq!(inspect.log(), vec!["hover menu-contact"]);
}

#[test]
fn test_mens_products_have_required_fields() {
    let mut browser = mens_page();
    let mut mens = MensPage::new(access(&mut browser), MENS_URL);
    assert_eq!(mens.product_count().unwrap(), 2);
    assert_eq!(mens.product_title(0).unwrap().as_deref(), Some("Formal Shirt"));
    assert_eq!(mens.product_price(1).unwrap().as_deref(), Some("$39.99"));
    assert!(mens.product_has_action_button(1).unwrap());
    assert!(mens.all_products_have_required_fields().unwrap());
    assert_eq!(mens.product_title(7).unwrap(), None);
    assert!(mens.scroll_to_products().unwrap());
}

#[test]
fn test_product_fields_fall_back_to_secondary_selectors() {
    let mut browser = FakeBrowser::new()
        .with(FakeElement::new("card", &loc::PRODUCT_ITEMS))
        .with(FakeElement::new("img", &loc::ITEM_IMAGE).child_of("card").attr("src", ""))
        .with(FakeElement::new("t", &loc::ITEM_TITLE_FALLBACK).child_of("card").text("Belt"))
        .with(FakeElement::new("p", &loc::ITEM_PRICE_FALLBACK).child_of("card").text("$5"));
    let mut mens = MensPage::new(access(&mut browser), MENS_URL);
    assert_eq!(mens.product_title(0).unwrap().as_deref(), Some("Belt"));
    assert_eq!(mens.product_price(0).unwrap().as_deref(), Some("$5"));
    assert!(!mens.product_has_image(0).unwrap());
    assert!(!mens.all_products_have_required_fields().unwrap());
}

#[test]
fn test_mens_search_lands_on_not_found_page() {
    let mut browser = mens_page();
    let inspect = browser.clone();
    let mut mens = MensPage::new(access(&mut browser), MENS_URL);
    assert!(mens.is_search_bar_visible().unwrap());
    assert!(mens.is_search_bar_active().unwrap());
    assert!(mens.enter_search_term("shirt").unwrap());
    assert_eq!(inspect.value_of("search"), "shirt");
    assert!(mens.submit_search().unwrap());
    assert!(mens.shows_not_found_indicator().unwrap());
    assert!(!mens.results_are_relevant("shirt").unwrap());
}

#[test]
fn test_search_falls_back_to_enter_without_button() {
    let mut browser = FakeBrowser::new().with(FakeElement::new("search", &loc::SEARCH_BAR));
    let inspect = browser.clone();
    let mut mens = MensPage::new(access(&mut browser), MENS_URL);
    assert!(mens.submit_search().unwrap());
    assert_eq!(inspect.log(), vec!["enter search"]);
}

#[test]
fn test_footer_contact_link_leaves_the_site() {
    let mut browser = mens_page();
    let mut mens = MensPage::new(access(&mut browser), MENS_URL);
    assert!(mens.scroll_to_footer().unwrap());
    assert!(mens.is_footer_visible().unwrap());
    assert!(mens.click_contact_link().unwrap());
    assert!(!mens.is_on_contact_page().unwrap());
    assert!(mens.current_url().unwrap().contains("youtube"));
}

#[test]
fn test_menu_contact_link_reaches_contact_page() {
    let mut browser = mens_page();
    let mut mens = MensPage::new(access(&mut browser), MENS_URL);
    assert!(mens.click_menu_link("Contact").unwrap());
    assert!(mens.is_on_contact_page().unwrap());
}

// ============================================================================
// Layout
// ============================================================================

#[test]
fn test_viewport_presets() {
    let names: Vec<&str> = Viewport::presets().iter().map(|v| v.name).collect();
    assert_eq!(names, vec!["desktop", "tablet", "mobile"]);
    assert_eq!(Viewport::MOBILE.width, 375);
}

#[test]
fn test_resize_and_horizontal_scroll() {
    let mut browser = mens_page().with_metrics(metrics_value(375.0, 375.0, 4000.0, 667.0));
    let inspect = browser.clone();
    let mut mens = MensPage::new(access(&mut browser), MENS_URL);
    mens.set_viewport(Viewport::MOBILE).unwrap();
    assert_eq!(inspect.page().window, (375, 667));
    assert!(!mens.has_horizontal_scroll().unwrap());
    assert!(mens.has_vertical_scroll_capacity().unwrap());
    assert!(mens.is_layout_acceptable().unwrap());

    inspect.page().metrics = metrics_value(520.0, 375.0, 4000.0, 667.0);
    assert!(mens.has_horizontal_scroll().unwrap());
    assert!(!mens.is_layout_acceptable().unwrap());
}

#[test]
fn test_hidden_landmark_counts_as_overlap() {
    let mut browser = mens_page();
    let inspect = browser.clone();
    let mut mens = MensPage::new(access(&mut browser), MENS_URL);
    assert!(!mens.has_overlapping_critical_elements().unwrap());

    inspect
        .page()
        .elements
        .iter_mut()
        .find(|e| e.id == "nav")
        .unwrap()
        .displayed = false;
    assert!(mens.has_overlapping_critical_elements().unwrap());
}

#[test]
fn test_touch_target_audit_skips_unmeasurable_elements() {
    let targets = || {
        FakeBrowser::new()
            .with(FakeElement::new("cart", &loc::TOUCH_TARGETS).sized(48.0, 48.0))
            .with(FakeElement::new("menu", &loc::TOUCH_TARGETS).sized(120.0, 44.0))
            .with(FakeElement::new("search", &loc::TOUCH_TARGETS).sized(200.0, 60.0))
            .with(FakeElement::new("detached", &loc::TOUCH_TARGETS).sized(1.0, 1.0).unmeasurable())
    };

    let mut browser = targets().with(FakeElement::new("icon", &loc::TOUCH_TARGETS).sized(30.0, 30.0));
    let mut mens = MensPage::new(access(&mut browser), MENS_URL);
    assert!(!mens.all_interactive_elements_meet_minimum_size(MIN_TOUCH_TARGET_PX).unwrap());
    assert!(mens.all_interactive_elements_meet_minimum_size(30.0).unwrap());

    // The only offender cannot be measured, so nothing fails the audit.
    let mut browser = targets().with(FakeElement::new("link", &loc::TOUCH_TARGETS).sized(64.0, 48.0));
    let mut mens = MensPage::new(access(&mut browser), MENS_URL);
    assert!(mens.all_interactive_elements_meet_minimum_size(MIN_TOUCH_TARGET_PX).unwrap());
}

// ============================================================================
// Google
// ============================================================================

#[test]
fn test_google_home_loaded_with_fallback_logo() {
    let mut browser = google_home();
    let mut home = GoogleHomePage::new(access(&mut browser), GOOGLE_URL);
    assert!(home.is_loaded().unwrap());
    assert!(home.is_logo_visible().unwrap());
    assert!(!home.are_suggestions_visible().unwrap());
    assert!(home.suggestions().unwrap().is_empty());
    assert!(home.is_search_box_empty().unwrap());
}

#[test]
fn test_google_search_reaches_results() {
    let mut browser = google_home();
    {
        let mut home = GoogleHomePage::new(access(&mut browser), GOOGLE_URL);
        assert!(home.search_for("selenium", false).unwrap());
        assert_eq!(home.search_box_text().unwrap(), "selenium");
    }
    let mut results = GoogleResultsPage::new(access(&mut browser));
    assert!(results.is_loaded().unwrap());
    assert!(results.wait_for_results().unwrap());
    assert_eq!(results.visible_result_count().unwrap(), 10);
    assert_eq!(results.total_results_count().unwrap(), 1_230_000);
    assert_eq!(results.search_box_value().unwrap(), "selenium");
    assert!(!results.is_did_you_mean_visible().unwrap());
    assert_eq!(results.did_you_mean_text().unwrap(), "");

    assert!(results.is_next_page_visible().unwrap());
    assert!(results.click_next_page().unwrap());
    assert!(results.current_url().unwrap().contains("start=10"));
}

#[test]
fn test_search_with_enter_key() {
    let mut browser = google_home();
    let inspect = browser.clone();
    let mut home = GoogleHomePage::new(access(&mut browser), GOOGLE_URL);
    assert!(home.search_for("rust", true).unwrap());
    assert!(inspect.log().contains(&"enter q".to_string()));
}

#[test]
fn test_parse_total_results() {
    assert_eq!(parse_total_results("About 1,234 results (0.32 seconds)"), 1234);
    assert_eq!(parse_total_results("Page 2 of about 98,700 results"), 2);
    assert_eq!(parse_total_results("Ungefähr 5.430.000 Ergebnisse"), 5_430_000);
    assert_eq!(parse_total_results("No results"), 0);
    assert_eq!(parse_total_results(""), 0);
}

#[test]
fn test_page_id_display() {
    assert_eq!(PageId::Mens.to_string(), "Mens page");
    assert_eq!(PageId::GoogleResults.to_string(), "Google results page");
}
