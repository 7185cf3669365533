//! Single-page application host for the dashboard.
//!
//! A [`Registry`] holds every page under `(category, name)`, the [`Host`]
//! keeps exactly one of them visible and relays ticks to it, and each polled
//! page throttles itself through a [`gate::PollingGate`].

pub mod app;
pub mod command;
pub mod error;
pub mod gate;
pub mod host;
pub mod pages;
pub mod registry;
pub mod resource;
pub mod surface;

pub use app::{Application, ApplicationDescriptor, Control, Response, Tick};
pub use command::{Command, Completion, FetchRequest, Method, Params, RequestId};
pub use error::{HostError, PathParseError};
pub use gate::PollingGate;
pub use host::{Dispatcher, Host, HostState, RecordingDispatcher};
pub use registry::{AppPath, Registry, RegistryBuilder};
pub use resource::Resource;
pub use surface::{Row, Surface, SurfaceId};

/// Current wall-clock time in whole seconds, the unit every gate works in
pub fn wall_clock_secs() -> i64 {
    chrono::Utc::now().timestamp()
}
