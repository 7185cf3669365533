use log::{debug, warn};

use crate::dashboard::{AppPath, Application, Command, Control, Surface, Tick};

/// Self-test page: lists every registered path and jumps to any of them
pub struct PageIndex {
    paths: Vec<AppPath>,
    surface: Option<Surface>,
}

impl PageIndex {
    pub fn new(paths: Vec<AppPath>) -> Self {
        Self { paths, surface: None }
    }
}

impl Application for PageIndex {
    fn title(&self) -> &str {
        "Pages"
    }

    fn attach(&mut self, mut surface: Surface) {
        if self.surface.is_some() {
            warn!("Pages: surface already attached, ignoring {:?}", surface.id());
            return;
        }
        surface.set_columns(vec!["#".to_string(), "Category".to_string(), "Page".to_string()]);
        surface.set_rows(
            self.paths
                .iter()
                .enumerate()
                .map(|(index, path)| {
                    vec![
                        index.to_string(),
                        path.category().to_string(),
                        path.name().to_string(),
                    ]
                })
                .collect(),
        );
        self.surface = Some(surface);
    }

    fn surface(&self) -> Option<&Surface> {
        self.surface.as_ref()
    }

    fn on_show(&mut self) -> Command {
        Command::None
    }

    fn on_hide(&mut self) -> Command {
        Command::None
    }

    // static content, nothing to poll
    fn on_update(&mut self, _tick: Tick) -> Command {
        Command::None
    }

    fn on_control(&mut self, control: Control, _tick: Tick) -> Command {
        match control {
            Control::Select(index) => match self.paths.get(index) {
                Some(path) => {
                    debug!("Pages: jumping to {}", path);
                    Command::navigate_to(path.clone())
                }
                None => {
                    warn!("Pages: no entry #{} ({} registered)", index, self.paths.len());
                    Command::None
                }
            },
            other => {
                debug!("Pages: {:?} has no effect", other);
                Command::None
            }
        }
    }
}
