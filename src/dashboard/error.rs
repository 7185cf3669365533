use thiserror::Error;

use crate::dashboard::AppPath;

/// Configuration-class failures of the host. Network failures never show up
/// here; they are contained inside the page that issued the request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HostError {
    #[error("no application registered at '{0}'")]
    NotFound(AppPath),

    #[error("application '{0}' is registered more than once")]
    DuplicatePath(AppPath),

    #[error("the application registry is empty")]
    EmptyRegistry,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid page path '{input}', expected <category>:<name>")]
pub struct PathParseError {
    pub input: String,
}
