pub mod app;
pub mod commands;
pub mod input;
pub mod painter;

pub use app::{Cli, Commands};
