//! Interactive terminal viewer.
//!
//! A two-pane ratatui application: the run list on the left, the detail of
//! the selected run on the right. All content comes from the projections in
//! [`crate::views`]; the app itself only owns navigation state and the
//! terminal lifecycle.

pub mod app;

pub use app::run_viewer;
