//! Pure view projections.
//!
//! The two projections turn a repository plus a [`ViewerState`] into plain
//! data that any surface can draw: the run list (one summary per visible
//! record) and the detail of the selected run. Projections never mutate
//! anything and are recomputed from scratch after every state change, so
//! every surface shows the same session the same way.

use crate::format::{escape_html, format_score, format_timestamp};
use crate::record::{RunId, RunRecord, SpeakerRole};
use crate::repo::RunRepository;
use crate::state::ViewerState;

/// One visible run, ready for display in the list pane.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub id: RunId,
    pub scenario_label: String,
    /// Total score, or `-` for unscored runs.
    pub display_score: String,
    /// Trial id, or `?` when the record had none.
    pub display_run_id: String,
    /// Timestamp in the compact `MM/DD HH:MM` form where possible.
    pub formatted_timestamp: String,
    pub status_label: &'static str,
    pub is_pass: bool,
    pub is_selected: bool,
}

/// Header block of the detail pane.
#[derive(Debug, Clone, PartialEq)]
pub struct DetailHeader {
    pub scenario_label: String,
    /// Trial id, or `-` when the record had none.
    pub run_id: String,
    /// The raw harness timestamp, unformatted.
    pub timestamp: String,
    pub status_label: &'static str,
    pub is_pass: bool,
    pub display_score: String,
}

/// One row of the rubric table.
#[derive(Debug, Clone, PartialEq)]
pub struct RubricRow {
    pub dimension: String,
    pub score: f64,
    /// Grader reasoning, or `-` when none was recorded for this dimension.
    pub reasoning: String,
}

/// One transcript line, ready for display.
#[derive(Debug, Clone, PartialEq)]
pub struct TranscriptBubble {
    /// Speaker label exactly as recorded.
    pub speaker: String,
    pub role: SpeakerRole,
    /// Line content with HTML-significant characters escaped.
    pub content: String,
}

/// Everything the detail pane shows for one run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunDetail {
    pub header: DetailHeader,
    /// `None` means the rubric section is omitted entirely (the run has no
    /// rubric grade, or its rubric has no dimensions).
    pub rubric: Option<Vec<RubricRow>>,
    /// Empty means the transcript section is omitted entirely.
    pub transcript: Vec<TranscriptBubble>,
}

fn status_label(is_pass: bool) -> &'static str {
    if is_pass {
        "PASS"
    } else {
        "FAIL"
    }
}

/// Project the run list: every record that satisfies the active filters,
/// in repository order, as display-ready summaries.
pub fn run_list(repo: &RunRepository, state: &ViewerState) -> Vec<RunSummary> {
    repo.records()
        .iter()
        .filter(|record| state.filter.matches(record))
        .map(|record| RunSummary {
            id: record.id,
            scenario_label: record.scenario_label().to_string(),
            display_score: format_score(record.total_score),
            display_run_id: record
                .run_id
                .clone()
                .unwrap_or_else(|| "?".to_string()),
            formatted_timestamp: format_timestamp(&record.timestamp),
            status_label: status_label(record.is_pass),
            is_pass: record.is_pass,
            is_selected: state.selected() == Some(record.id),
        })
        .collect()
}

/// Project one record into its detail view.
pub fn run_detail(record: &RunRecord) -> RunDetail {
    let rubric = record
        .rubric_grade()
        .filter(|grade| !grade.scores.is_empty())
        .map(|grade| {
            grade
                .scores
                .iter()
                .map(|(dimension, score)| RubricRow {
                    dimension: dimension.clone(),
                    score: *score,
                    reasoning: grade
                        .reasoning
                        .get(dimension)
                        .filter(|text| !text.is_empty())
                        .cloned()
                        .unwrap_or_else(|| "-".to_string()),
                })
                .collect()
        });

    let transcript = record
        .transcript
        .iter()
        .map(|line| TranscriptBubble {
            speaker: line.speaker.clone(),
            role: line.role(),
            content: escape_html(&line.content),
        })
        .collect();

    RunDetail {
        header: DetailHeader {
            scenario_label: record.scenario_label().to_string(),
            run_id: record.run_id.clone().unwrap_or_else(|| "-".to_string()),
            timestamp: record.timestamp.clone(),
            status_label: status_label(record.is_pass),
            is_pass: record.is_pass,
            display_score: format_score(record.total_score),
        },
        rubric,
        transcript,
    }
}

/// Project the detail of the selected run, or `None` when nothing is
/// selected (the detail pane then shows its placeholder).
pub fn selected_detail(repo: &RunRepository, state: &ViewerState) -> Option<RunDetail> {
    let record = repo.get(state.selected()?)?;
    Some(run_detail(record))
}
