//! In-memory run repository.
//!
//! Holds the normalized records for one viewing session. The repository is
//! write-once: it is built by ingest and never mutated afterwards, so run ids
//! (arena indices) stay stable for its whole lifetime.

use crate::record::{RawRunRecord, RunId, RunRecord};
use std::collections::BTreeSet;

#[derive(Debug, Clone, Default)]
pub struct RunRepository {
    records: Vec<RunRecord>,
}

/// Aggregate statistics over every record in a repository, filters ignored.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregateStats {
    pub total_runs: usize,
    /// Passing share as a whole percentage, 0 for an empty repository.
    pub pass_rate: u8,
    /// Mean total score over positively-scored runs; `None` when no run
    /// has a positive score.
    pub avg_score: Option<f64>,
}

impl AggregateStats {
    /// Average score formatted to one decimal, or the no-data placeholder.
    pub fn avg_score_label(&self) -> String {
        match self.avg_score {
            Some(avg) => format!("{:.1}", avg),
            None => "no data".to_string(),
        }
    }
}

impl RunRepository {
    /// Build a repository from raw records, normalizing each and assigning
    /// ids by position. The input order is preserved verbatim.
    pub fn from_raw(raws: Vec<RawRunRecord>) -> Self {
        let records = raws
            .into_iter()
            .enumerate()
            .map(|(index, raw)| RunRecord::from_raw(RunId(index), raw))
            .collect();
        RunRepository { records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// All records in repository order (newest first after a normal load).
    pub fn records(&self) -> &[RunRecord] {
        &self.records
    }

    pub fn get(&self, id: RunId) -> Option<&RunRecord> {
        self.records.get(id.index())
    }

    pub fn contains(&self, id: RunId) -> bool {
        id.index() < self.records.len()
    }

    /// Whether any record names this scenario.
    pub fn has_scenario(&self, scenario: &str) -> bool {
        self.records
            .iter()
            .any(|r| r.scenario.as_deref() == Some(scenario))
    }

    /// The distinct scenario names present, sorted lexicographically.
    /// Records without a scenario are not represented.
    pub fn distinct_scenarios(&self) -> Vec<String> {
        let set: BTreeSet<&str> = self
            .records
            .iter()
            .filter_map(|r| r.scenario.as_deref())
            .collect();
        set.into_iter().map(String::from).collect()
    }

    /// Compute whole-repository statistics.
    pub fn aggregate_stats(&self) -> AggregateStats {
        let total_runs = self.records.len();
        let pass_count = self.records.iter().filter(|r| r.is_pass).count();
        let pass_rate = if total_runs == 0 {
            0
        } else {
            ((pass_count as f64 / total_runs as f64) * 100.0).round() as u8
        };

        let scored: Vec<f64> = self
            .records
            .iter()
            .map(|r| r.total_score)
            .filter(|score| *score > 0.0)
            .collect();
        let avg_score = if scored.is_empty() {
            None
        } else {
            Some(scored.iter().sum::<f64>() / scored.len() as f64)
        };

        AggregateStats {
            total_runs,
            pass_rate,
            avg_score,
        }
    }
}
