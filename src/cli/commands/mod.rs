pub mod pages;
pub mod watch;

pub use pages::{PagesCommands, pages_command};
pub use watch::{WatchCommands, watch_command};
