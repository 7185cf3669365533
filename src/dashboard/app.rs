use log::{debug, warn};
use serde_json::Value;

use crate::api::FetchError;
use crate::dashboard::{AppPath, Command, RequestId, Surface};

/// User-facing controls, routed by the host to the active application only
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    /// Drop displayed data and refresh now, unless a request is outstanding
    Reset,
    /// Change the minimum refresh interval in seconds
    SetInterval(u64),
    /// Pick the n-th entry of a list page
    Select(usize),
}

/// What an application sees on every tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tick {
    /// Wall-clock seconds
    pub now: i64,
    pub visible: bool,
}

/// Outcome of one request this application issued
#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    pub request_id: RequestId,
    pub outcome: Result<Value, FetchError>,
    pub visible: bool,
}

/// The contract every dashboard page implements.
///
/// Lifecycle hooks return a [`Command`] instead of performing side effects.
/// The provided defaults only log: a page that forgets to override a hook
/// stays inert instead of taking down navigation of the other pages.
pub trait Application: Send {
    fn title(&self) -> &str;

    /// Receives the page's rendering target; called once by the host
    fn attach(&mut self, surface: Surface);

    fn surface(&self) -> Option<&Surface>;

    fn on_show(&mut self) -> Command {
        warn!("{}: on_show is not implemented", self.title());
        Command::None
    }

    fn on_hide(&mut self) -> Command {
        warn!("{}: on_hide is not implemented", self.title());
        Command::None
    }

    fn on_update(&mut self, _tick: Tick) -> Command {
        warn!("{}: on_update is not implemented", self.title());
        Command::None
    }

    fn on_response(&mut self, response: Response) -> Command {
        warn!(
            "{}: on_response is not implemented, dropping response {}",
            self.title(),
            response.request_id
        );
        Command::None
    }

    fn on_control(&mut self, control: Control, _tick: Tick) -> Command {
        warn!("{}: control {:?} is not supported", self.title(), control);
        Command::None
    }
}

/// A registered application together with the visibility the host owns.
///
/// `visible` is private to this module so only the host's transitions
/// (`show`/`hide`) can write it.
pub struct ApplicationDescriptor {
    path: AppPath,
    visible: bool,
    instance: Box<dyn Application>,
}

impl ApplicationDescriptor {
    pub(crate) fn new(path: AppPath, instance: Box<dyn Application>) -> Self {
        Self {
            path,
            visible: false,
            instance,
        }
    }

    pub fn path(&self) -> &AppPath {
        &self.path
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn title(&self) -> &str {
        self.instance.title()
    }

    pub fn surface(&self) -> Option<&Surface> {
        self.instance.surface()
    }

    pub(crate) fn attach(&mut self, surface: Surface) {
        self.instance.attach(surface);
    }

    /// No-op when already visible, so `on_show` fires once per transition
    pub(crate) fn show(&mut self) -> Command {
        if self.visible {
            debug!("{} already visible", self.path);
            return Command::None;
        }
        self.visible = true;
        self.instance.on_show()
    }

    pub(crate) fn hide(&mut self) -> Command {
        if !self.visible {
            return Command::None;
        }
        self.visible = false;
        self.instance.on_hide()
    }

    pub(crate) fn update(&mut self, now: i64) -> Command {
        self.instance.on_update(self.tick(now))
    }

    pub(crate) fn respond(
        &mut self,
        request_id: RequestId,
        outcome: Result<Value, FetchError>,
    ) -> Command {
        self.instance.on_response(Response {
            request_id,
            outcome,
            visible: self.visible,
        })
    }

    pub(crate) fn control(&mut self, control: Control, now: i64) -> Command {
        self.instance.on_control(control, self.tick(now))
    }

    fn tick(&self, now: i64) -> Tick {
        Tick {
            now,
            visible: self.visible,
        }
    }
}
