//! Viewer session state.
//!
//! One [`ViewerState`] holds everything a viewing session can change: the
//! active filters and the selected run. It carries no records itself; the
//! projections in [`crate::views`] combine it with a repository to produce
//! what gets drawn. Mutating the state never touches the repository.

use crate::error::{EvalviewError, Result};
use crate::record::{RunId, RunRecord};
use crate::repo::RunRepository;

/// Scenario dimension of the filter.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ScenarioFilter {
    #[default]
    All,
    Scenario(String),
}

impl ScenarioFilter {
    /// Display label: the scenario name, or `all`.
    pub fn label(&self) -> &str {
        match self {
            ScenarioFilter::All => "all",
            ScenarioFilter::Scenario(name) => name,
        }
    }

    fn matches(&self, record: &RunRecord) -> bool {
        match self {
            ScenarioFilter::All => true,
            ScenarioFilter::Scenario(name) => record.scenario.as_deref() == Some(name),
        }
    }
}

/// Result dimension of the filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResultFilter {
    #[default]
    All,
    Pass,
    Fail,
}

impl ResultFilter {
    /// Parse a filter name as given on the command line.
    pub fn from_name(name: &str) -> Result<Self> {
        match name {
            "all" => Ok(ResultFilter::All),
            "pass" => Ok(ResultFilter::Pass),
            "fail" => Ok(ResultFilter::Fail),
            other => Err(EvalviewError::ResultFilter(other.to_string())),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ResultFilter::All => "all",
            ResultFilter::Pass => "pass",
            ResultFilter::Fail => "fail",
        }
    }

    /// The next filter in cycling order (all -> pass -> fail -> all).
    pub fn next(&self) -> ResultFilter {
        match self {
            ResultFilter::All => ResultFilter::Pass,
            ResultFilter::Pass => ResultFilter::Fail,
            ResultFilter::Fail => ResultFilter::All,
        }
    }

    fn matches(&self, record: &RunRecord) -> bool {
        match self {
            ResultFilter::All => true,
            ResultFilter::Pass => record.is_pass,
            ResultFilter::Fail => !record.is_pass,
        }
    }
}

impl std::fmt::Display for ResultFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Both filter dimensions together. A record is visible only when it
/// satisfies both.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FilterState {
    pub scenario: ScenarioFilter,
    pub result: ResultFilter,
}

impl FilterState {
    pub fn matches(&self, record: &RunRecord) -> bool {
        self.scenario.matches(record) && self.result.matches(record)
    }
}

/// Filters plus selection for one viewing session.
#[derive(Debug, Clone, Default)]
pub struct ViewerState {
    pub filter: FilterState,
    selected: Option<RunId>,
}

impl ViewerState {
    pub fn new() -> Self {
        ViewerState::default()
    }

    /// The selected run, if any. At most one run is ever selected.
    pub fn selected(&self) -> Option<RunId> {
        self.selected
    }

    /// Set the scenario filter. A scenario name not present in `repo`
    /// falls back to [`ScenarioFilter::All`] rather than filtering
    /// everything out.
    pub fn set_scenario_filter(&mut self, repo: &RunRepository, filter: ScenarioFilter) {
        self.filter.scenario = match filter {
            ScenarioFilter::Scenario(name) if !repo.has_scenario(&name) => ScenarioFilter::All,
            other => other,
        };
    }

    pub fn set_result_filter(&mut self, filter: ResultFilter) {
        self.filter.result = filter;
    }

    /// Select a run by id. The id must come from `repo`; a foreign id is
    /// ignored in release builds and trips an assertion in debug builds.
    pub fn select_run(&mut self, repo: &RunRepository, id: RunId) {
        debug_assert!(
            repo.contains(id),
            "selected id {} is not in the repository",
            id.index()
        );
        if repo.contains(id) {
            self.selected = Some(id);
        }
    }

    /// Drop the selection. Not reachable from the TUI key map; callers that
    /// rebuild a repository use it to avoid carrying a stale id forward.
    pub fn clear_selection(&mut self) {
        self.selected = None;
    }
}
