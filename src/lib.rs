pub mod commands;
pub mod completion;
pub mod config;
pub mod error;
pub mod export;
pub mod format;
pub mod ingest;
pub mod output;
pub mod record;
pub mod repo;
pub mod report;
pub mod state;
pub mod viewer;
pub mod views;

#[cfg(test)]
pub mod test_utils;

pub use error::{EvalviewError, Result};
pub use ingest::load_runs_dir;
pub use record::{Grade, RunId, RunRecord, SpeakerRole, TranscriptLine};
pub use repo::{AggregateStats, RunRepository};
pub use state::{FilterState, ResultFilter, ScenarioFilter, ViewerState};
pub use views::{run_detail, run_list, selected_detail, RunDetail, RunSummary};
