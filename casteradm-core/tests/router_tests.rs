// Tests for the hash router and page model

use casteradm_core::{Location, Page, Router};
use std::cell::RefCell;
use std::rc::Rc;

fn record(router: &Router) -> Rc<RefCell<Vec<Page>>> {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let seen_clone = seen.clone();
    let _ = router.subscribe(move |page| seen_clone.borrow_mut().push(*page));
    seen
}

// ============================================================================
// Page Tests
// ============================================================================

#[test]
fn test_page_names_round_trip() {
    for page in Page::ALL {
        assert_eq!(Page::parse(page.as_str()), Some(page));
        assert_eq!(page.as_str().parse::<Page>(), Ok(page));
    }
}

#[test]
fn test_page_parse_is_exact() {
    assert_eq!(Page::parse("Dashboard"), None);
    assert_eq!(Page::parse(" sources"), None);
    assert_eq!(Page::parse("sources/1"), None);
    assert_eq!(Page::parse(""), None);
}

#[test]
fn test_page_from_str_error_names_value() {
    let err = "nope".parse::<Page>().unwrap_err();
    assert_eq!(err.to_string(), "Unknown page: nope");
}

#[test]
fn test_from_fragment_defaults_to_dashboard() {
    for fragment in ["", "nope", "SETTINGS", "auth?x=1", "#auth", "connections/2"] {
        assert_eq!(Page::from_fragment(fragment), Page::Dashboard, "{}", fragment);
    }
}

#[test]
fn test_from_fragment_accepts_every_page() {
    for page in Page::ALL {
        assert_eq!(Page::from_fragment(page.as_str()), page);
    }
}

#[test]
fn test_page_cycling_wraps() {
    assert_eq!(Page::Settings.next(), Page::Dashboard);
    assert_eq!(Page::Dashboard.previous(), Page::Settings);
    assert_eq!(Page::Connections.next(), Page::Sources);
}

// ============================================================================
// Initial State Tests
// ============================================================================

#[test]
fn test_initial_page_from_empty_fragment() {
    let router = Router::new(Location::new());
    assert_eq!(router.current(), Page::Dashboard);
}

#[test]
fn test_initial_page_from_valid_fragment() {
    let router = Router::new(Location::with_hash("#connections"));
    assert_eq!(router.current(), Page::Connections);
}

#[test]
fn test_initial_page_from_invalid_fragment() {
    let location = Location::with_hash("#whatever");
    let router = Router::new(location.clone());

    assert_eq!(router.current(), Page::Dashboard);
    // Fragment is not rewritten
    assert_eq!(location.hash(), "#whatever");
}

#[test]
fn test_subscribe_is_notified_immediately() {
    let router = Router::new(Location::with_hash("auth"));
    let seen = record(&router);

    assert_eq!(*seen.borrow(), vec![Page::Auth]);
}

// ============================================================================
// Navigation Tests
// ============================================================================

#[test]
fn test_go_applies_after_event_fires() {
    let location = Location::new();
    let router = Router::new(location.clone());
    let seen = record(&router);

    router.go("sources");
    assert_eq!(router.current(), Page::Dashboard);
    assert_eq!(location.hash(), "#sources");

    location.dispatch_pending();
    assert_eq!(router.current(), Page::Sources);
    assert_eq!(*seen.borrow(), vec![Page::Dashboard, Page::Sources]);
}

#[test]
fn test_go_invalid_page_resolves_to_dashboard() {
    let location = Location::with_hash("settings");
    let router = Router::new(location.clone());

    router.go("bogus");
    // The invalid value is written as given
    assert_eq!(location.hash(), "#bogus");

    location.dispatch_pending();
    assert_eq!(router.current(), Page::Dashboard);
}

#[test]
fn test_external_navigation_is_published() {
    let location = Location::new();
    let router = Router::new(location.clone());
    let seen = record(&router);

    location.set_hash("#auth");
    location.dispatch_pending();
    location.set_hash("#settings");
    location.dispatch_pending();

    assert_eq!(*seen.borrow(), vec![Page::Dashboard, Page::Auth, Page::Settings]);
}

#[test]
fn test_queued_navigations_publish_only_the_final_page() {
    let location = Location::new();
    let router = Router::new(location.clone());
    let seen = record(&router);

    router.go("sources");
    router.go("auth");
    assert_eq!(location.dispatch_pending(), 2);

    assert_eq!(router.current(), Page::Auth);
    assert_eq!(*seen.borrow(), vec![Page::Dashboard, Page::Auth]);
}

#[test]
fn test_queued_navigations_back_to_start_publish_nothing() {
    let location = Location::with_hash("connections");
    let router = Router::new(location.clone());
    let seen = record(&router);

    router.go("settings");
    location.set_hash("#bogus");
    router.go("connections");
    location.dispatch_pending();

    assert_eq!(router.current(), Page::Connections);
    assert_eq!(*seen.borrow(), vec![Page::Connections]);
}

#[test]
fn test_invalid_fragment_from_dashboard_publishes_nothing_new() {
    let location = Location::new();
    let router = Router::new(location.clone());
    let seen = record(&router);

    router.go("nope");
    location.dispatch_pending();

    assert_eq!(*seen.borrow(), vec![Page::Dashboard]);
}

#[test]
fn test_every_page_is_reachable() {
    let location = Location::new();
    let router = Router::new(location.clone());

    for page in Page::ALL.iter().rev() {
        router.go(page.as_str());
        location.dispatch_pending();
        assert_eq!(router.current(), *page);
    }
}

#[test]
fn test_late_subscriber_gets_current_page() {
    let location = Location::new();
    let router = Router::new(location.clone());

    router.go("connections");
    location.dispatch_pending();

    let seen = record(&router);
    assert_eq!(*seen.borrow(), vec![Page::Connections]);
}

#[test]
fn test_unsubscribe_stops_updates() {
    let location = Location::new();
    let router = Router::new(location.clone());
    let seen = Rc::new(RefCell::new(Vec::new()));
    let seen_clone = seen.clone();

    let subscription = router.subscribe(move |page| seen_clone.borrow_mut().push(*page));
    subscription.unsubscribe();

    router.go("auth");
    location.dispatch_pending();

    assert_eq!(*seen.borrow(), vec![Page::Dashboard]);
}

#[test]
fn test_dropped_router_stops_listening() {
    let location = Location::new();
    let router = Router::new(location.clone());
    let seen = record(&router);
    drop(router);

    location.set_hash("auth");
    location.dispatch_pending();

    assert_eq!(*seen.borrow(), vec![Page::Dashboard]);
}
