//! Run record data model.
//!
//! Raw types mirror the JSON files the evaluation harness writes, with every
//! field optional so one sloppy record never aborts a load. Normalization
//! happens once, at ingest: fallbacks are applied, the pass flag and total
//! score are derived from the grades, and each record receives its [`RunId`].
//! Everything downstream works with the normalized [`RunRecord`] only.

use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::Value;

/// Metric name of the grade that carries the rubric breakdown.
pub const RUBRIC_METRIC: &str = "rubric_eval";

/// Stable identity of a run within a repository.
///
/// Ids are positional: a record's id is its index into the repository's
/// record arena, so they stay valid for the lifetime of the repository and
/// survive any amount of filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RunId(pub(crate) usize);

impl RunId {
    pub fn index(self) -> usize {
        self.0
    }
}

// ============================================================================
// Raw (on-disk) types
// ============================================================================

/// A run record as found on disk. Every field tolerates absence.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawRunRecord {
    #[serde(default)]
    pub scenario: Option<String>,
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub run_config: Option<RawRunConfig>,
    #[serde(default)]
    pub grades: Vec<RawGrade>,
    #[serde(default)]
    pub transcript: Vec<RawTranscriptLine>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawRunConfig {
    #[serde(default)]
    pub run_id: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawGrade {
    #[serde(default)]
    pub metric: Option<String>,
    #[serde(default)]
    pub result: Option<String>,
    #[serde(default)]
    pub total_score: Option<Value>,
    #[serde(default)]
    pub scores: IndexMap<String, Value>,
    #[serde(default)]
    pub reasoning: IndexMap<String, String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawTranscriptLine {
    #[serde(default)]
    pub speaker: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
}

// ============================================================================
// Normalized types
// ============================================================================

/// A fully normalized run record.
#[derive(Debug, Clone, PartialEq)]
pub struct RunRecord {
    pub id: RunId,
    /// Scenario name; `None` when the record had none (or an empty one).
    pub scenario: Option<String>,
    /// Raw harness timestamp string, e.g. `20260122_181745`. Empty if absent.
    pub timestamp: String,
    /// Trial identifier from the run config, when present and non-empty.
    pub run_id: Option<String>,
    /// A run passes unless any grade reports a FAIL.
    pub is_pass: bool,
    /// Total rubric score; zero when the run was never rubric-graded.
    pub total_score: f64,
    pub grades: Vec<Grade>,
    pub transcript: Vec<TranscriptLine>,
}

/// One grader's output for a run.
#[derive(Debug, Clone, PartialEq)]
pub struct Grade {
    pub metric: String,
    /// Per-dimension scores, preserving the order the grader emitted them in.
    pub scores: IndexMap<String, f64>,
    /// Per-dimension reasoning text, keyed like `scores`.
    pub reasoning: IndexMap<String, String>,
}

/// One line of dialogue from a run's transcript.
#[derive(Debug, Clone, PartialEq)]
pub struct TranscriptLine {
    pub speaker: String,
    pub content: String,
}

/// Which side of the conversation a transcript line belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpeakerRole {
    Player,
    Counterpart,
}

impl TranscriptLine {
    /// Classify the speaker: `player`/`user` (case-insensitive) are the
    /// player side, every other label is the scripted counterpart.
    pub fn role(&self) -> SpeakerRole {
        match self.speaker.to_lowercase().as_str() {
            "player" | "user" => SpeakerRole::Player,
            _ => SpeakerRole::Counterpart,
        }
    }
}

impl RunRecord {
    /// Normalize a raw record into its canonical in-memory form.
    pub fn from_raw(id: RunId, raw: RawRunRecord) -> Self {
        let mut is_pass = true;
        let mut total_score = 0.0;
        for grade in &raw.grades {
            if grade.result.as_deref() == Some("FAIL") {
                is_pass = false;
            }
            if grade.metric.as_deref() == Some(RUBRIC_METRIC) {
                total_score = grade
                    .total_score
                    .as_ref()
                    .map(coerce_score)
                    .unwrap_or(0.0);
            }
        }

        RunRecord {
            id,
            scenario: raw.scenario.filter(|s| !s.is_empty()),
            timestamp: raw.timestamp.unwrap_or_default(),
            run_id: raw
                .run_config
                .and_then(|c| c.run_id)
                .filter(|s| !s.is_empty()),
            is_pass,
            total_score,
            grades: raw.grades.into_iter().map(Grade::from_raw).collect(),
            transcript: raw
                .transcript
                .into_iter()
                .map(TranscriptLine::from_raw)
                .collect(),
        }
    }

    /// Scenario name with the shared fallback for unnamed records.
    pub fn scenario_label(&self) -> &str {
        self.scenario.as_deref().unwrap_or("Unknown")
    }

    /// The rubric grade, if this run carries one.
    pub fn rubric_grade(&self) -> Option<&Grade> {
        self.grades.iter().find(|g| g.metric == RUBRIC_METRIC)
    }
}

impl Grade {
    fn from_raw(raw: RawGrade) -> Self {
        Grade {
            metric: raw.metric.unwrap_or_default(),
            scores: raw
                .scores
                .iter()
                .map(|(dim, value)| (dim.clone(), coerce_score(value)))
                .collect(),
            reasoning: raw.reasoning,
        }
    }
}

impl TranscriptLine {
    fn from_raw(raw: RawTranscriptLine) -> Self {
        TranscriptLine {
            speaker: raw.speaker.unwrap_or_default(),
            content: raw.content.unwrap_or_default(),
        }
    }
}

/// Coerce a grader-emitted score to a number. Graders occasionally emit
/// strings (including a literal `-` for "not scored"); anything that does
/// not parse as a number counts as zero.
fn coerce_score(value: &Value) -> f64 {
    match value {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => s.trim().parse().unwrap_or(0.0),
        _ => 0.0,
    }
}
