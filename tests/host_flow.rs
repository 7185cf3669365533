//! End-to-end navigation and polling through the public host API
//!
//! Requests are recorded instead of sent, and completions are fed back by
//! hand, which makes the ordering of ticks and callbacks explicit.

use serde_json::json;
use sqlops_dashboard::api::FetchError;
use sqlops_dashboard::config::Config;
use sqlops_dashboard::dashboard::pages::{PageSpec, TablePage, catalog};
use sqlops_dashboard::dashboard::{
    AppPath, Application, Completion, Control, Host, HostError, HostState, RecordingDispatcher,
    Registry,
};

fn workers() -> AppPath {
    AppPath::new("Status", "Workers")
}

fn sql() -> AppPath {
    AppPath::new("Tools", "SQL")
}

fn page(title: &str, endpoint: &str) -> Box<dyn Application> {
    Box::new(TablePage::new(
        PageSpec::get(title, endpoint)
            .column("id", "Id")
            .min_interval(2),
    ))
}

fn two_page_host() -> Host<RecordingDispatcher> {
    let registry = Registry::builder()
        .category("Status", vec![("Workers", page("Workers", "/v1/workers"))])
        .category("Tools", vec![("SQL", page("SQL", "/v1/sql"))])
        .build()
        .unwrap();
    Host::new(registry, RecordingDispatcher::new())
}

/// Completes the most recent request with `outcome`
fn complete_last(
    host: &mut Host<RecordingDispatcher>,
    outcome: Result<serde_json::Value, FetchError>,
) {
    let (origin, request) = host.dispatcher().last().cloned().expect("a request was issued");
    host.complete(Completion {
        origin,
        request_id: request.id,
        outcome,
    });
}

#[test]
fn test_boot_tick_switch_scenario() {
    let mut host = two_page_host();

    host.boot(None).unwrap();
    assert!(host.registry().lookup(&workers()).unwrap().is_visible());

    host.tick(100);
    assert_eq!(host.dispatcher().issued_by(&workers()).len(), 1);

    host.show(&sql()).unwrap();
    assert!(!host.registry().lookup(&workers()).unwrap().is_visible());
    assert!(host.registry().lookup(&sql()).unwrap().is_visible());

    // the worker request resolves after the switch
    let (origin, request) = host.dispatcher().issued()[0].clone();
    host.complete(Completion {
        origin,
        request_id: request.id,
        outcome: Ok(json!([{"id": "w1"}])),
    });

    for now in [101, 104, 107] {
        host.tick(now);
        complete_last(&mut host, Ok(json!([])));
    }

    assert_eq!(host.dispatcher().issued_by(&workers()).len(), 1);
    assert_eq!(host.dispatcher().issued_by(&sql()).len(), 3);
    assert!(
        host.dispatcher().issued_by(&sql()).iter().all(|r| r.path == "/v1/sql")
    );
}

#[test]
fn test_unknown_navigation_is_rejected() {
    let mut host = two_page_host();
    host.boot(None).unwrap();

    let missing = AppPath::new("Nope", "Nothing");
    assert_eq!(host.show(&missing), Err(HostError::NotFound(missing)));
    assert_eq!(host.state(), &HostState::Active(workers()));
}

#[test]
fn test_slow_response_blocks_overlapping_refreshes() {
    let mut host = two_page_host();
    host.boot(None).unwrap();

    host.tick(100);
    host.tick(103);
    host.tick(110);
    assert_eq!(host.dispatcher().issued().len(), 1);

    complete_last(&mut host, Err(FetchError::Timeout));
    let surface = host.active().unwrap().surface().unwrap();
    assert_eq!(surface.body().failure().map(String::as_str), Some("request timed out"));

    host.tick(111);
    assert_eq!(host.dispatcher().issued().len(), 2);
}

#[test]
fn test_reset_control_refreshes_immediately() {
    let mut host = two_page_host();
    host.boot(None).unwrap();
    host.tick(100);
    complete_last(&mut host, Ok(json!([{"id": "w1"}])));

    host.control(Control::Reset, 101);
    assert_eq!(host.dispatcher().issued().len(), 2);

    // outstanding: a second reset is coalesced
    host.control(Control::Reset, 101);
    assert_eq!(host.dispatcher().issued().len(), 2);
}

#[test]
fn test_catalog_applies_interval_overrides() {
    let mut config = Config::default();
    config.intervals.insert("Status:Workers".to_string(), 30);

    let mut host = Host::new(catalog(&config).unwrap(), RecordingDispatcher::new());
    host.boot(None).unwrap();

    host.tick(1_000);
    complete_last(&mut host, Ok(json!({"workers": []})));
    host.tick(1_020);
    assert_eq!(host.dispatcher().issued().len(), 1);
    host.tick(1_031);
    assert_eq!(host.dispatcher().issued().len(), 2);
}

#[test]
fn test_catalog_floors_zero_interval_override() {
    let mut config = Config::default();
    config.intervals.insert("Status:Workers".to_string(), 0);

    let mut host = Host::new(catalog(&config).unwrap(), RecordingDispatcher::new());
    host.boot(None).unwrap();

    host.tick(1_000);
    complete_last(&mut host, Ok(json!({"workers": []})));
    host.tick(1_001);
    assert_eq!(host.dispatcher().issued().len(), 1);
    host.tick(1_002);
    assert_eq!(host.dispatcher().issued().len(), 2);
}

#[test]
fn test_catalog_boots_on_deep_link() {
    let mut host = Host::new(catalog(&Config::default()).unwrap(), RecordingDispatcher::new());
    let target: AppPath = "page=Ingest:Transactions".parse().unwrap();
    assert_eq!(host.boot(Some(&target)), Ok(target.clone()));

    host.tick(50);
    let (origin, request) = host.dispatcher().last().unwrap();
    assert_eq!(origin, &target);
    assert_eq!(request.path, "/v1/ingest/transactions");
}
