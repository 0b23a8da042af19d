//! `list` command: print the filtered run list to stdout.

use crate::error::Result;
use crate::ingest::load_runs_dir;
use crate::output;
use crate::state::{ResultFilter, ScenarioFilter, ViewerState};
use crate::views::run_list;
use std::path::Path;

pub fn list_command(runs_dir: &Path, scenario: Option<&str>, result: &str) -> Result<()> {
    let repo = load_runs_dir(runs_dir)?;
    let mut state = ViewerState::new();

    if let Some(name) = scenario {
        if !repo.has_scenario(name) {
            output::print_warning(&format!(
                "No runs for scenario '{}', listing all scenarios",
                name
            ));
        }
        state.set_scenario_filter(&repo, ScenarioFilter::Scenario(name.to_string()));
    }
    state.set_result_filter(ResultFilter::from_name(result)?);

    output::print_run_list(&run_list(&repo, &state));
    Ok(())
}
