use bdd_lab::browser::webdriver::locator_body;
use bdd_lab::locator::{Locator, LocatorError, LocatorRegistry, Strategy, elite_shoppy, google};

// ============================================================================
// Locator values
// ============================================================================

#[test]
fn test_display_names_strategy_and_expression() {
    assert_eq!(
        elite_shoppy::SORT_DROPDOWN.to_string(),
        "'sort_dropdown' (id: country1)"
    );
    assert_eq!(
        google::IMAGES_TAB.to_string(),
        "'images_tab' (link text: Images)"
    );
}

#[test]
fn test_dynamic_locator_owns_its_text() {
    let label = String::from("Women's wear");
    let locator = Locator::dynamic(format!("menu:{}", label), Strategy::LinkText, label.clone());
    drop(label);
    assert_eq!(locator.name, "menu:Women's wear");
    assert_eq!(locator.strategy, Strategy::LinkText);
    assert_eq!(locator.expression, "Women's wear");
}

#[test]
fn test_locator_body_rewrites_id_and_name() {
    let by_id = locator_body(&elite_shoppy::SORT_DROPDOWN);
    assert_eq!(by_id["using"], "css selector");
    assert_eq!(by_id["value"], "[id=\"country1\"]");

    let by_name = locator_body(&google::SEARCH_BOX);
    assert_eq!(by_name["value"], "[name=\"q\"]");

    let tag = locator_body(&google::RESULT_TITLES);
    assert_eq!(tag["using"], "tag name");
    assert_eq!(tag["value"], "h3");

    let xpath = locator_body(&google::SEARCH_INSTEAD_FOR);
    assert_eq!(xpath["using"], "xpath");
}

#[test]
fn test_locator_body_escapes_quotes() {
    let locator = Locator::dynamic("odd", Strategy::Name, "a\"b");
    assert_eq!(locator_body(&locator)["value"], "[name=\"a\\\"b\"]");
}

// ============================================================================
// Registries
// ============================================================================

#[test]
fn test_registry_resolves_in_insertion_order() {
    let registry = LocatorRegistry::from_entries(
        "demo",
        [
            Locator::css("first", ".a"),
            Locator::css("second", ".b"),
        ],
    )
    .unwrap();

    assert_eq!(registry.scope(), "demo");
    assert_eq!(registry.len(), 2);
    assert_eq!(registry.resolve("second").unwrap().expression, ".b");
    assert!(registry.resolve("third").is_none());
    let names: Vec<&str> = registry.iter().map(|l| l.name.as_ref()).collect();
    assert_eq!(names, vec!["first", "second"]);
}

#[test]
fn test_registry_rejects_duplicate_names() {
    let mut registry = LocatorRegistry::new("demo");
    assert!(registry.is_empty());
    registry.insert(Locator::css("button", ".a")).unwrap();

    let err = registry.insert(Locator::xpath("button", "//button")).unwrap_err();
    assert_eq!(
        err,
        LocatorError::Duplicate {
            scope: "demo".into(),
            name: "button".into(),
        }
    );
    assert_eq!(registry.len(), 1);
    assert_eq!(registry.resolve("button").unwrap().strategy, Strategy::Css);
}

#[test]
fn test_bundled_registries_build() {
    let elite = elite_shoppy::registry().unwrap();
    assert_eq!(elite.scope(), "elite_shoppy");
    assert!(elite.resolve("sign_in_button").is_some());
    assert!(elite.resolve("touch_targets").is_some());

    let home = google::home_registry().unwrap();
    assert_eq!(home.resolve("search_box").unwrap().expression, "q");

    let results = google::results_registry().unwrap();
    assert!(results.resolve("next_page").is_some());
    assert!(results.resolve("feeling_lucky_button").is_none());
}

#[test]
fn test_candidate_lists_keep_fallback_order() {
    assert_eq!(google::LOGO_CANDIDATES[0], google::LOGO);
    assert_eq!(google::DID_YOU_MEAN_CANDIDATES[0], google::DID_YOU_MEAN);
    assert_eq!(
        google::DID_YOU_MEAN_CANDIDATES[4],
        google::SEARCH_INSTEAD_FOR
    );
}
