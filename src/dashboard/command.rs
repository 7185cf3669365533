use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

use crate::api::FetchError;
use crate::dashboard::AppPath;

/// Flat key/value map used both for GET query parameters and POST bodies.
pub type Params = BTreeMap<String, String>;

/// Commands represent side effects that applications want to perform.
/// They are returned from lifecycle hooks and executed by the host.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Command {
    /// Do nothing
    #[default]
    None,

    /// Execute multiple commands in sequence
    Batch(Vec<Command>),

    /// Hand a request to the network collaborator
    Fetch(FetchRequest),

    /// Navigate to a different application
    NavigateTo(AppPath),
}

impl Command {
    pub fn fetch(request: FetchRequest) -> Self {
        Command::Fetch(request)
    }

    pub fn navigate_to(path: AppPath) -> Self {
        Command::NavigateTo(path)
    }

    pub fn is_none(&self) -> bool {
        match self {
            Command::None => true,
            Command::Batch(commands) => commands.iter().all(Command::is_none),
            _ => false,
        }
    }

    /// All fetches contained in this command, in execution order
    pub fn fetches(&self) -> Vec<&FetchRequest> {
        match self {
            Command::Fetch(request) => vec![request],
            Command::Batch(commands) => commands.iter().flat_map(Command::fetches).collect(),
            _ => Vec::new(),
        }
    }
}

/// Identifies one issued request so its completion can be matched to it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RequestId(pub uuid::Uuid);

impl RequestId {
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4())
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Method {
    Get,
    Post,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Method::Get => write!(f, "GET"),
            Method::Post => write!(f, "POST"),
        }
    }
}

/// A request for the network collaborator
#[derive(Debug, Clone, PartialEq)]
pub struct FetchRequest {
    pub id: RequestId,
    pub method: Method,
    pub path: String,
    pub params: Params,
}

impl FetchRequest {
    pub fn new(id: RequestId, method: Method, path: impl Into<String>, params: Params) -> Self {
        Self {
            id,
            method,
            path: path.into(),
            params,
        }
    }
}

/// The single callback outcome of one issued request
#[derive(Debug, Clone, PartialEq)]
pub struct Completion {
    pub origin: AppPath,
    pub request_id: RequestId,
    pub outcome: Result<Value, FetchError>,
}
