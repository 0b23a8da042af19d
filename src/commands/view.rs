//! `view` command: the interactive TUI.

use crate::error::Result;
use crate::ingest::load_runs_dir;
use crate::viewer::run_viewer;
use std::path::Path;

/// Load the runs directory and hand the repository to the viewer.
pub fn view_command(runs_dir: &Path) -> Result<()> {
    let repo = load_runs_dir(runs_dir)?;
    run_viewer(repo)
}
