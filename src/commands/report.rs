//! `report` command: generate the markdown report.

use crate::error::Result;
use crate::ingest::load_runs_dir;
use crate::output;
use crate::report::write_report;
use std::path::Path;

pub fn report_command(runs_dir: &Path, output_path: &Path) -> Result<()> {
    let repo = load_runs_dir(runs_dir)?;
    write_report(&repo, output_path)?;
    output::print_info(&format!(
        "Report for {} runs written to {}",
        repo.len(),
        output_path.display()
    ));
    Ok(())
}
