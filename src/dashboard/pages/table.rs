use log::{debug, info, warn};
use serde_json::Value;

use crate::dashboard::gate::{Decision, Pass, PollingGate, Skip};
use crate::dashboard::{
    Application, Command, Control, FetchRequest, Method, Params, Response, Row, Surface, Tick,
};

/// One table column: the JSON key read from each row and its header label
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    pub key: String,
    pub label: String,
}

impl Column {
    pub fn new(key: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
        }
    }
}

/// Everything that distinguishes one polled table page from another
#[derive(Debug, Clone)]
pub struct PageSpec {
    pub title: String,
    pub method: Method,
    pub endpoint: String,
    pub params: Params,
    pub columns: Vec<Column>,
    /// Member holding the row array when the payload is an object
    pub rows_key: Option<String>,
    /// Minimum seconds between refreshes
    pub min_interval: u64,
}

impl PageSpec {
    pub fn get(title: impl Into<String>, endpoint: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            method: Method::Get,
            endpoint: endpoint.into(),
            params: Params::new(),
            columns: Vec::new(),
            rows_key: None,
            min_interval: 5,
        }
    }

    pub fn post(title: impl Into<String>, endpoint: impl Into<String>) -> Self {
        Self {
            method: Method::Post,
            ..Self::get(title, endpoint)
        }
    }

    pub fn column(mut self, key: &str, label: &str) -> Self {
        self.columns.push(Column::new(key, label));
        self
    }

    pub fn param(mut self, key: &str, value: &str) -> Self {
        self.params.insert(key.to_string(), value.to_string());
        self
    }

    pub fn rows_key(mut self, key: &str) -> Self {
        self.rows_key = Some(key.to_string());
        self
    }

    pub fn min_interval(mut self, seconds: u64) -> Self {
        self.min_interval = seconds;
        self
    }
}

/// A status table refreshed through a [`PollingGate`]
pub struct TablePage {
    spec: PageSpec,
    gate: PollingGate,
    surface: Option<Surface>,
}

impl TablePage {
    pub fn new(spec: PageSpec) -> Self {
        let gate = PollingGate::new(spec.min_interval);
        Self {
            spec,
            gate,
            surface: None,
        }
    }

    fn issue(&mut self, pass: Pass) -> Command {
        if let Some(surface) = self.surface.as_mut() {
            if pass.build_layout {
                debug!("{}: building table layout", self.spec.title);
                surface.set_columns(self.spec.columns.iter().map(|c| c.label.clone()).collect());
            }
            surface.begin_refresh();
        }

        Command::fetch(FetchRequest::new(
            pass.request_id,
            self.spec.method,
            self.spec.endpoint.clone(),
            self.spec.params.clone(),
        ))
    }

    fn render(&mut self, outcome: Result<Value, String>) {
        let Some(surface) = self.surface.as_mut() else {
            warn!("{}: no surface attached, response discarded", self.spec.title);
            return;
        };

        let rows_key = self.spec.rows_key.as_deref();
        let rows = outcome.and_then(|payload| render_rows(&payload, rows_key, &self.spec.columns));
        match rows {
            Ok(rows) => surface.set_rows(rows),
            Err(message) => surface.set_failure(message),
        }
    }
}

impl Application for TablePage {
    fn title(&self) -> &str {
        &self.spec.title
    }

    fn attach(&mut self, surface: Surface) {
        if self.surface.is_some() {
            warn!("{}: surface already attached, ignoring {:?}", self.spec.title, surface.id());
            return;
        }
        self.surface = Some(surface);
    }

    fn surface(&self) -> Option<&Surface> {
        self.surface.as_ref()
    }

    fn on_show(&mut self) -> Command {
        debug!("{}: shown", self.spec.title);
        Command::None
    }

    fn on_hide(&mut self) -> Command {
        debug!("{}: hidden", self.spec.title);
        Command::None
    }

    fn on_update(&mut self, tick: Tick) -> Command {
        match self.gate.maybe_refresh(tick.visible, tick.now) {
            Decision::Refresh(pass) => self.issue(pass),
            Decision::Skip(_) => Command::None,
        }
    }

    fn on_response(&mut self, response: Response) -> Command {
        if !self.gate.finish(response.request_id) {
            debug!("{}: ignoring stale response {}", self.spec.title, response.request_id);
            return Command::None;
        }
        if !response.visible {
            debug!("{}: response arrived while hidden", self.spec.title);
        }

        self.render(response.outcome.map_err(|e| e.to_string()));
        Command::None
    }

    fn on_control(&mut self, control: Control, tick: Tick) -> Command {
        match control {
            Control::Reset => match self.gate.force(tick.visible, tick.now) {
                Decision::Refresh(pass) => {
                    info!("{}: reset", self.spec.title);
                    if let Some(surface) = self.surface.as_mut() {
                        surface.clear();
                    }
                    self.issue(pass)
                }
                Decision::Skip(Skip::InFlight) => {
                    debug!("{}: reset coalesced into outstanding refresh", self.spec.title);
                    Command::None
                }
                Decision::Skip(reason) => {
                    debug!("{}: reset skipped ({:?})", self.spec.title, reason);
                    Command::None
                }
            },
            Control::SetInterval(seconds) => {
                self.gate.set_min_interval(seconds);
                Command::None
            }
            Control::Select(_) => {
                warn!("{}: control {:?} is not supported", self.spec.title, control);
                Command::None
            }
        }
    }
}

/// Turns a payload into table rows: a top-level array, or the array under
/// `rows_key` of an object. Cells are looked up by column key.
pub fn render_rows(
    payload: &Value,
    rows_key: Option<&str>,
    columns: &[Column],
) -> Result<Vec<Row>, String> {
    let items = match (payload, rows_key) {
        (Value::Array(items), _) => items,
        (Value::Object(map), Some(key)) => match map.get(key) {
            Some(Value::Array(items)) => items,
            Some(_) => return Err(format!("'{}' is not a list of rows", key)),
            None => return Err(format!("response has no '{}' member", key)),
        },
        (Value::Null, _) => return Ok(Vec::new()),
        _ => return Err("expected a list of rows".to_string()),
    };

    Ok(items
        .iter()
        .map(|item| columns.iter().map(|column| cell(item.get(&column.key))).collect())
        .collect())
}

fn cell(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::FetchError;
    use crate::dashboard::{RequestId, SurfaceId};
    use serde_json::json;

    fn workers_page() -> TablePage {
        let mut page = TablePage::new(
            PageSpec::get("Workers", "/v1/workers")
                .column("id", "Worker")
                .column("state", "State")
                .column("tasks", "Tasks")
                .min_interval(10),
        );
        page.attach(Surface::new(SurfaceId(0), "Workers"));
        page
    }

    fn visible(now: i64) -> Tick {
        Tick { now, visible: true }
    }

    fn issued(command: &Command) -> RequestId {
        let fetches = command.fetches();
        assert_eq!(fetches.len(), 1, "expected exactly one fetch");
        fetches[0].id
    }

    #[test]
    fn test_render_rows_from_array_and_object() {
        let columns = vec![Column::new("id", "Id"), Column::new("load", "Load")];

        let payload = json!([{"id": "w1", "load": 0.5}, {"id": "w2"}]);
        let rows = render_rows(&payload, None, &columns).unwrap();
        assert_eq!(
            rows,
            vec![
                vec!["w1".to_string(), "0.5".to_string()],
                vec!["w2".to_string(), String::new()],
            ]
        );

        let wrapped = json!({"rows": [{"id": 7, "load": null}]});
        let rows = render_rows(&wrapped, Some("rows"), &columns).unwrap();
        assert_eq!(rows, vec![vec!["7".to_string(), String::new()]]);
    }

    #[test]
    fn test_render_rows_rejects_unexpected_shapes() {
        let columns = vec![Column::new("id", "Id")];
        assert!(render_rows(&json!({"id": 1}), None, &columns).is_err());
        assert!(render_rows(&json!({"rows": 3}), Some("rows"), &columns).is_err());
        assert!(render_rows(&json!({"other": []}), Some("rows"), &columns).is_err());
        assert_eq!(render_rows(&Value::Null, None, &columns), Ok(Vec::new()));
    }

    #[test]
    fn test_first_refresh_builds_layout_and_fetches() {
        let mut page = workers_page();
        let command = page.on_update(visible(100));
        let id = issued(&command);

        let surface = page.surface().unwrap();
        assert_eq!(surface.columns(), ["Worker", "State", "Tasks"]);
        assert!(surface.body().is_loading());
        assert_eq!(page.gate.in_flight(), Some(id));
        assert_eq!(page.gate.last_refresh(), 100);
    }

    #[test]
    fn test_hidden_tick_is_silent() {
        let mut page = workers_page();
        let revision = page.surface().unwrap().revision();

        let command = page.on_update(Tick { now: 100, visible: false });
        assert!(command.is_none());
        assert_eq!(page.surface().unwrap().revision(), revision);
    }

    #[test]
    fn test_success_renders_rows() {
        let mut page = workers_page();
        let id = issued(&page.on_update(visible(100)));

        page.on_response(Response {
            request_id: id,
            outcome: Ok(json!([{"id": "w1", "state": "ACTIVE", "tasks": 3}])),
            visible: true,
        });

        let surface = page.surface().unwrap();
        assert_eq!(
            surface.body().success(),
            Some(&vec![vec!["w1".to_string(), "ACTIVE".to_string(), "3".to_string()]])
        );
        assert!(surface.updated_at().is_some());
        assert!(!page.gate.is_in_flight());
    }

    #[test]
    fn test_failure_shows_message_and_retries_after_interval() {
        let mut page = workers_page();
        let id = issued(&page.on_update(visible(100)));

        page.on_response(Response {
            request_id: id,
            outcome: Err(FetchError::Timeout),
            visible: true,
        });
        assert_eq!(
            page.surface().unwrap().body().failure().map(String::as_str),
            Some("request timed out")
        );
        assert!(!page.gate.is_in_flight());

        assert!(page.on_update(visible(105)).is_none());
        issued(&page.on_update(visible(111)));
    }

    #[test]
    fn test_overlapping_ticks_issue_no_second_fetch() {
        let mut page = workers_page();
        issued(&page.on_update(visible(100)));
        assert!(page.on_update(visible(200)).is_none());
        assert!(page.on_update(visible(300)).is_none());
    }

    #[test]
    fn test_stale_response_is_ignored() {
        let mut page = workers_page();
        issued(&page.on_update(visible(100)));
        let revision = page.surface().unwrap().revision();

        page.on_response(Response {
            request_id: RequestId::new(),
            outcome: Ok(json!([])),
            visible: true,
        });

        assert!(page.gate.is_in_flight());
        assert_eq!(page.surface().unwrap().revision(), revision);
    }

    #[test]
    fn test_reset_while_in_flight_is_coalesced() {
        let mut page = workers_page();
        let id = issued(&page.on_update(visible(100)));

        assert!(page.on_control(Control::Reset, visible(101)).is_none());
        assert_eq!(page.gate.in_flight(), Some(id));
    }

    #[test]
    fn test_reset_clears_data_and_bypasses_interval() {
        let mut page = workers_page();
        let id = issued(&page.on_update(visible(100)));
        page.on_response(Response {
            request_id: id,
            outcome: Ok(json!([{"id": "w1"}])),
            visible: true,
        });

        let command = page.on_control(Control::Reset, visible(102));
        issued(&command);
        assert!(page.surface().unwrap().body().is_loading());
        assert_eq!(page.gate.last_refresh(), 102);
    }

    #[test]
    fn test_interval_control_applies_on_next_tick() {
        let mut page = workers_page();
        let id = issued(&page.on_update(visible(100)));
        page.on_response(Response {
            request_id: id,
            outcome: Ok(json!([])),
            visible: true,
        });

        assert!(page.on_control(Control::SetInterval(2), visible(103)).is_none());
        assert_eq!(page.gate.min_interval(), 2);
        issued(&page.on_update(visible(103)));
    }

    #[test]
    fn test_second_attach_is_ignored() {
        let mut page = workers_page();
        page.attach(Surface::new(SurfaceId(9), "Other"));
        assert_eq!(page.surface().unwrap().id(), SurfaceId(0));
    }
}
