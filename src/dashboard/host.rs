use log::{debug, error, info, warn};

use crate::dashboard::{
    AppPath, ApplicationDescriptor, Command, Completion, Control, FetchRequest, HostError, Registry,
    Surface, SurfaceId,
};

/// Upper bound on navigations chained through `Command::NavigateTo`
const MAX_NAVIGATION_HOPS: usize = 8;

/// Receives every request issued by an application, tagged with its origin.
///
/// The dispatcher owns the asynchronous part: it must eventually feed exactly
/// one [`Completion`] per dispatched request back into [`Host::complete`].
pub trait Dispatcher {
    fn dispatch(&mut self, origin: AppPath, request: FetchRequest);
}

/// Dispatcher that only records what was issued
#[derive(Debug, Default)]
pub struct RecordingDispatcher {
    issued: Vec<(AppPath, FetchRequest)>,
}

impl RecordingDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn issued(&self) -> &[(AppPath, FetchRequest)] {
        &self.issued
    }

    pub fn issued_by(&self, origin: &AppPath) -> Vec<&FetchRequest> {
        self.issued
            .iter()
            .filter(|(path, _)| path == origin)
            .map(|(_, request)| request)
            .collect()
    }

    pub fn last(&self) -> Option<&(AppPath, FetchRequest)> {
        self.issued.last()
    }
}

impl Dispatcher for RecordingDispatcher {
    fn dispatch(&mut self, origin: AppPath, request: FetchRequest) {
        self.issued.push((origin, request));
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostState {
    /// Only before the first navigation
    NoneActive,
    Active(AppPath),
}

/// Owns the registry and switches which single application is visible.
///
/// Ticks reach the active application only, so hidden pages do no work.
pub struct Host<D: Dispatcher> {
    registry: Registry,
    state: HostState,
    dispatcher: D,

    /// Navigation requested by a command, followed once the current event is done
    pending_navigation: Option<AppPath>,
}

impl<D: Dispatcher> Host<D> {
    /// Wires the registry to a dispatcher and attaches one surface per application
    pub fn new(mut registry: Registry, dispatcher: D) -> Self {
        for (index, descriptor) in registry.descriptors_mut().enumerate() {
            let surface = Surface::new(SurfaceId(index), descriptor.title().to_string());
            descriptor.attach(surface);
        }

        Self {
            registry,
            state: HostState::NoneActive,
            dispatcher,
            pending_navigation: None,
        }
    }

    /// Initial navigation: the deep link when given, otherwise the first
    /// registered application. Runs once; later calls are ignored.
    pub fn boot(&mut self, deep_link: Option<&AppPath>) -> Result<AppPath, HostError> {
        if let HostState::Active(current) = &self.state {
            warn!("Host already booted on {}", current);
            return Ok(current.clone());
        }

        let target = match deep_link {
            Some(path) => path.clone(),
            None => self.registry.first_path().ok_or(HostError::EmptyRegistry)?,
        };

        info!("Booting dashboard on {}", target);
        self.show(&target)?;
        Ok(target)
    }

    /// Makes `path` the single visible application.
    ///
    /// Fails with `NotFound` before touching any state. Showing the active
    /// path again emits no hide/show pair.
    pub fn show(&mut self, path: &AppPath) -> Result<(), HostError> {
        self.transition(path)?;
        self.follow_navigation();
        Ok(())
    }

    /// Relays a timer tick to the active application
    pub fn tick(&mut self, now: i64) {
        let HostState::Active(path) = &self.state else {
            return;
        };
        let path = path.clone();

        let command = match self.registry.lookup_mut(&path) {
            Ok(descriptor) => descriptor.update(now),
            Err(e) => {
                error!("Active application vanished: {}", e);
                return;
            }
        };

        self.execute(&path, command);
        self.follow_navigation();
    }

    /// Routes a request outcome back to the application that issued it
    pub fn complete(&mut self, completion: Completion) {
        let Completion {
            origin,
            request_id,
            outcome,
        } = completion;

        if let Err(e) = &outcome {
            warn!("Request {} for {} failed: {}", request_id, origin, e);
        }

        let command = match self.registry.lookup_mut(&origin) {
            Ok(descriptor) => descriptor.respond(request_id, outcome),
            Err(e) => {
                warn!("Dropping completion {}: {}", request_id, e);
                return;
            }
        };

        self.execute(&origin, command);
        self.follow_navigation();
    }

    /// Delivers a user control to the active application
    pub fn control(&mut self, control: Control, now: i64) {
        let HostState::Active(path) = &self.state else {
            warn!("Ignoring {:?}: no application is active", control);
            return;
        };
        let path = path.clone();

        let command = match self.registry.lookup_mut(&path) {
            Ok(descriptor) => descriptor.control(control, now),
            Err(e) => {
                error!("Active application vanished: {}", e);
                return;
            }
        };

        self.execute(&path, command);
        self.follow_navigation();
    }

    pub fn state(&self) -> &HostState {
        &self.state
    }

    pub fn current(&self) -> Option<&AppPath> {
        match &self.state {
            HostState::Active(path) => Some(path),
            HostState::NoneActive => None,
        }
    }

    pub fn active(&self) -> Option<&ApplicationDescriptor> {
        self.current().and_then(|path| self.registry.lookup(path).ok())
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn dispatcher(&self) -> &D {
        &self.dispatcher
    }

    fn transition(&mut self, path: &AppPath) -> Result<(), HostError> {
        if !self.registry.contains(path) {
            return Err(HostError::NotFound(path.clone()));
        }

        if let HostState::Active(current) = &self.state {
            if current != path {
                let current = current.clone();
                debug!("Hiding {}", current);
                let command = self.registry.lookup_mut(&current)?.hide();
                self.execute(&current, command);
            }
        }

        let command = self.registry.lookup_mut(path)?.show();
        if self.current() != Some(path) {
            info!("Switched to {}", path);
        }
        self.state = HostState::Active(path.clone());
        self.execute(path, command);
        Ok(())
    }

    fn execute(&mut self, origin: &AppPath, command: Command) {
        match command {
            Command::None => {}
            Command::Batch(commands) => {
                for command in commands {
                    self.execute(origin, command);
                }
            }
            Command::Fetch(request) => {
                debug!("{} issues {} {} ({})", origin, request.method, request.path, request.id);
                self.dispatcher.dispatch(origin.clone(), request);
            }
            Command::NavigateTo(target) => {
                debug!("{} requests navigation to {}", origin, target);
                self.pending_navigation = Some(target);
            }
        }
    }

    fn follow_navigation(&mut self) {
        let mut hops = 0;
        while let Some(target) = self.pending_navigation.take() {
            hops += 1;
            if hops > MAX_NAVIGATION_HOPS {
                warn!(
                    "Navigation chain exceeded {} hops, stopping at {:?}",
                    MAX_NAVIGATION_HOPS, self.state
                );
                break;
            }
            if let Err(e) = self.transition(&target) {
                error!("Navigation aborted: {}", e);
            }
        }
    }
}
