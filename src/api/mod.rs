//! Network collaborator for the dashboard: a reqwest-backed REST client
//! behind the [`Transport`] trait and the dispatcher that feeds request
//! outcomes back into the host's event loop.

pub mod client;
pub mod dispatcher;
pub mod error;

pub use client::{ApiClient, Transport};
pub use dispatcher::NetworkDispatcher;
pub use error::FetchError;
