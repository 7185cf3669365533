//! The network dispatcher feeding completions back into the host loop

use async_trait::async_trait;
use serde_json::{Value, json};
use sqlops_dashboard::api::{FetchError, NetworkDispatcher, Transport};
use sqlops_dashboard::dashboard::pages::{PageSpec, TablePage};
use sqlops_dashboard::dashboard::{Application, Host, Params, Registry};
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// Answers every call with a canned outcome and records what was asked
struct FakeTransport {
    outcome: Result<Value, FetchError>,
    calls: Mutex<Vec<(String, String, Params)>>,
}

impl FakeTransport {
    fn new(outcome: Result<Value, FetchError>) -> Arc<Self> {
        Arc::new(Self {
            outcome,
            calls: Mutex::new(Vec::new()),
        })
    }

    fn calls(&self) -> Vec<(String, String, Params)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Transport for FakeTransport {
    async fn get(&self, path: &str, params: &Params) -> Result<Value, FetchError> {
        self.calls
            .lock()
            .unwrap()
            .push(("GET".to_string(), path.to_string(), params.clone()));
        self.outcome.clone()
    }

    async fn post(&self, path: &str, body: &Params) -> Result<Value, FetchError> {
        self.calls
            .lock()
            .unwrap()
            .push(("POST".to_string(), path.to_string(), body.clone()));
        self.outcome.clone()
    }
}

/// Panics inside every call, counting how often it was reached
#[derive(Default)]
struct PanickingTransport {
    calls: AtomicUsize,
}

#[async_trait]
impl Transport for PanickingTransport {
    async fn get(&self, _path: &str, _params: &Params) -> Result<Value, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        panic!("transport blew up");
    }

    async fn post(&self, _path: &str, _body: &Params) -> Result<Value, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        panic!("transport blew up");
    }
}

fn registry(spec: PageSpec) -> Registry {
    let page: Box<dyn Application> = Box::new(TablePage::new(spec));
    Registry::builder()
        .category("Status", vec![("Workers", page)])
        .build()
        .unwrap()
}

fn workers_spec() -> PageSpec {
    PageSpec::get("Workers", "/v1/workers")
        .rows_key("workers")
        .column("id", "Worker")
        .param("state", "any")
        .min_interval(5)
}

#[tokio::test]
async fn test_success_completion_renders_rows() {
    let transport = FakeTransport::new(Ok(json!({"workers": [{"id": "w1"}, {"id": "w2"}]})));
    let (dispatcher, mut completions) = NetworkDispatcher::new(transport.clone());
    let mut host = Host::new(registry(workers_spec()), dispatcher);
    host.boot(None).unwrap();

    host.tick(100);
    let completion = completions.recv().await.expect("one completion");
    host.complete(completion);

    let rows = host.active().unwrap().surface().unwrap().body().success().cloned().unwrap();
    assert_eq!(rows, vec![vec!["w1".to_string()], vec!["w2".to_string()]]);

    let calls = transport.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].0, "GET");
    assert_eq!(calls[0].1, "/v1/workers");
    assert_eq!(calls[0].2.get("state").map(String::as_str), Some("any"));
}

#[tokio::test]
async fn test_failure_completion_keeps_page_live() {
    let transport = FakeTransport::new(Err(FetchError::Connect("refused".to_string())));
    let (dispatcher, mut completions) = NetworkDispatcher::new(transport.clone());
    let mut host = Host::new(registry(workers_spec()), dispatcher);
    host.boot(None).unwrap();

    host.tick(100);
    host.tick(103);
    let completion = completions.recv().await.expect("one completion");
    assert!(completion.outcome.is_err());
    host.complete(completion);
    assert!(completions.try_recv().is_err());

    let body = host.active().unwrap().surface().unwrap().body().clone();
    assert_eq!(body.failure().map(String::as_str), Some("connection failed: refused"));

    host.tick(104);
    host.tick(106);
    let retry = completions.recv().await.expect("retry completion");
    host.complete(retry);

    assert_eq!(transport.calls().len(), 2);
}

#[tokio::test]
async fn test_post_pages_send_their_body() {
    let transport = FakeTransport::new(Ok(json!({"statements": []})));
    let (dispatcher, mut completions) = NetworkDispatcher::new(transport.clone());
    let spec = PageSpec::post("SQL", "/v1/sql/history")
        .param("limit", "50")
        .rows_key("statements")
        .column("sql", "SQL");
    let mut host = Host::new(registry(spec), dispatcher);
    host.boot(None).unwrap();

    host.tick(100);
    host.complete(completions.recv().await.unwrap());

    let calls = transport.calls();
    assert_eq!(calls[0].0, "POST");
    assert_eq!(calls[0].2.get("limit").map(String::as_str), Some("50"));
    assert!(host.active().unwrap().surface().unwrap().body().is_success());
}

#[tokio::test]
async fn test_panicking_transport_still_completes() {
    let transport = Arc::new(PanickingTransport::default());
    let (dispatcher, mut completions) = NetworkDispatcher::new(transport.clone());
    let mut host = Host::new(registry(workers_spec()), dispatcher);
    host.boot(None).unwrap();

    host.tick(100);
    let completion = tokio::time::timeout(Duration::from_secs(5), completions.recv())
        .await
        .expect("completion despite the panic")
        .expect("channel open");
    assert!(matches!(completion.outcome, Err(FetchError::Other(_))));
    host.complete(completion);

    let body = host.active().unwrap().surface().unwrap().body().clone();
    assert!(body.failure().is_some_and(|m| m.contains("aborted")));

    // the page is not stuck: the next refresh goes out once the interval elapses
    host.tick(106);
    let retry = tokio::time::timeout(Duration::from_secs(5), completions.recv())
        .await
        .expect("retry completion")
        .expect("channel open");
    host.complete(retry);
    assert_eq!(transport.calls.load(Ordering::SeqCst), 2);
}
