//! Test utilities shared across modules.
//!
//! Builders for raw run records so individual test modules don't each
//! hand-roll JSON fixtures.

use crate::record::{RawGrade, RawRunConfig, RawRunRecord, RawTranscriptLine, RUBRIC_METRIC};
use indexmap::IndexMap;
use serde_json::Value;

/// Build a raw record with a single rubric grade.
///
/// `is_pass` controls the grade's result field (`PASS`/`FAIL`); the derived
/// pass flag on the normalized record follows it. `total_score` lands on the
/// rubric grade.
pub fn raw_record(
    scenario: &str,
    timestamp: &str,
    run_id: &str,
    is_pass: bool,
    total_score: f64,
) -> RawRunRecord {
    RawRunRecord {
        scenario: Some(scenario.to_string()),
        timestamp: Some(timestamp.to_string()),
        run_config: Some(RawRunConfig {
            run_id: Some(run_id.to_string()),
        }),
        grades: vec![RawGrade {
            metric: Some(RUBRIC_METRIC.to_string()),
            result: Some(if is_pass { "PASS" } else { "FAIL" }.to_string()),
            total_score: Some(Value::from(total_score)),
            scores: IndexMap::new(),
            reasoning: IndexMap::new(),
        }],
        transcript: Vec::new(),
    }
}

/// Attach an ordered rubric breakdown to a record's rubric grade.
/// Dimensions keep the order given; reasoning entries may cover a subset.
pub fn with_rubric(
    mut raw: RawRunRecord,
    dimensions: &[(&str, f64)],
    reasoning: &[(&str, &str)],
) -> RawRunRecord {
    if let Some(grade) = raw
        .grades
        .iter_mut()
        .find(|g| g.metric.as_deref() == Some(RUBRIC_METRIC))
    {
        grade.scores = dimensions
            .iter()
            .map(|(dim, score)| (dim.to_string(), Value::from(*score)))
            .collect();
        grade.reasoning = reasoning
            .iter()
            .map(|(dim, text)| (dim.to_string(), text.to_string()))
            .collect();
    }
    raw
}

/// Attach transcript lines as `(speaker, content)` pairs.
pub fn with_transcript(mut raw: RawRunRecord, lines: &[(&str, &str)]) -> RawRunRecord {
    raw.transcript = lines
        .iter()
        .map(|(speaker, content)| RawTranscriptLine {
            speaker: Some(speaker.to_string()),
            content: Some(content.to_string()),
        })
        .collect();
    raw
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{RunId, RunRecord};

    #[test]
    fn test_raw_record_builder_round_trips_through_normalization() {
        let raw = raw_record("quest", "20260122_181745", "3", false, 4.5);
        let record = RunRecord::from_raw(RunId(0), raw);
        assert_eq!(record.scenario.as_deref(), Some("quest"));
        assert_eq!(record.run_id.as_deref(), Some("3"));
        assert!(!record.is_pass);
        assert_eq!(record.total_score, 4.5);
    }

    #[test]
    fn test_with_rubric_and_transcript() {
        let raw = with_transcript(
            with_rubric(
                raw_record("quest", "20260122_181745", "1", true, 9.0),
                &[("persuasion", 5.0), ("tone", 4.0)],
                &[("persuasion", "Led with leverage.")],
            ),
            &[("Player", "Open the gate."), ("Guard", "State your business.")],
        );
        let record = RunRecord::from_raw(RunId(0), raw);
        let grade = record.rubric_grade().unwrap();
        assert_eq!(grade.scores.len(), 2);
        assert_eq!(grade.reasoning.len(), 1);
        assert_eq!(record.transcript.len(), 2);
    }
}
