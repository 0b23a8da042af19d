//! CLI command handlers for evalview.
//!
//! Each subcommand has its own module with one handler function. Handlers
//! load the repository, set up the session state, and hand off to the
//! relevant surface (TUI, stdout printers, report or export writers).

mod export;
mod list;
mod report;
mod stats;
mod view;

pub use export::export_command;
pub use list::list_command;
pub use report::report_command;
pub use stats::stats_command;
pub use view::view_command;
