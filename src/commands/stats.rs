//! `stats` command: aggregate statistics for a runs directory.

use crate::error::Result;
use crate::ingest::load_runs_dir;
use crate::output;
use std::path::Path;

pub fn stats_command(runs_dir: &Path) -> Result<()> {
    let repo = load_runs_dir(runs_dir)?;
    output::print_section_banner("EVAL RESULTS");
    output::print_stats(&repo.aggregate_stats(), &repo.distinct_scenarios());
    Ok(())
}
