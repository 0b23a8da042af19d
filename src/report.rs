//! Markdown report generation.
//!
//! Produces the offline counterpart of the viewer: per-scenario reliability
//! (pass@k / pass^k over each scenario's recorded trials), a run summary
//! table, and a detail section per run with the rubric breakdown and the
//! full transcript.

use crate::error::Result;
use crate::format::format_score;
use crate::record::RunRecord;
use crate::repo::RunRepository;
use crate::views::run_detail;
use chrono::Utc;
use indexmap::IndexMap;
use std::fs;
use std::path::Path;

/// Reliability of one scenario across its recorded trials.
#[derive(Debug, Clone, PartialEq)]
pub struct ScenarioReliability {
    pub scenario: String,
    pub trials: usize,
    pub passes: usize,
    /// Mean total score across all trials, ungraded runs counted as zero.
    pub avg_score: f64,
}

impl ScenarioReliability {
    /// At least one of the k trials passed.
    pub fn pass_at_k(&self) -> bool {
        self.passes >= 1
    }

    /// Every one of the k trials passed.
    pub fn pass_all_k(&self) -> bool {
        self.trials > 0 && self.passes == self.trials
    }
}

/// Group records by scenario label, in order of first appearance, and
/// compute each group's reliability numbers.
pub fn reliability_by_scenario(repo: &RunRepository) -> Vec<ScenarioReliability> {
    let mut groups: IndexMap<&str, Vec<&RunRecord>> = IndexMap::new();
    for record in repo.records() {
        groups.entry(record.scenario_label()).or_default().push(record);
    }

    groups
        .into_iter()
        .map(|(scenario, runs)| {
            let trials = runs.len();
            let passes = runs.iter().filter(|r| r.is_pass).count();
            let total: f64 = runs.iter().map(|r| r.total_score).sum();
            ScenarioReliability {
                scenario: scenario.to_string(),
                trials,
                passes,
                avg_score: total / trials as f64,
            }
        })
        .collect()
}

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "YES"
    } else {
        "NO"
    }
}

/// Make a string safe for a markdown table cell.
fn table_cell(text: &str) -> String {
    text.replace('\n', " ").replace('|', "\\|")
}

/// Render the full report as a markdown string.
pub fn render_markdown(repo: &RunRepository) -> String {
    let mut out = String::new();
    let stats = repo.aggregate_stats();

    out.push_str("# Evaluation Report\n\n");
    out.push_str(&format!(
        "**Generated**: {}\n",
        Utc::now().format("%Y-%m-%d %H:%M UTC")
    ));
    out.push_str(&format!("**Total runs**: {}\n", stats.total_runs));
    out.push_str(&format!("**Pass rate**: {}%\n\n", stats.pass_rate));

    // ------------------------------------------------------------------
    // Reliability
    // ------------------------------------------------------------------
    out.push_str("## Reliability\n\n");
    out.push_str("Each scenario is judged across its k recorded trials:\n\n");
    out.push_str("- **pass@k**: the scenario passed at least once in k trials.\n");
    out.push_str("- **pass^k**: the scenario passed every one of its k trials.\n\n");
    out.push_str("| Scenario | Trials (k) | Passes | pass@k | pass^k | Avg Score |\n");
    out.push_str("|----------|------------|--------|--------|--------|-----------|\n");
    for entry in reliability_by_scenario(repo) {
        out.push_str(&format!(
            "| {} | {} | {} | {} | {} | {:.2} |\n",
            table_cell(&entry.scenario),
            entry.trials,
            entry.passes,
            yes_no(entry.pass_at_k()),
            yes_no(entry.pass_all_k()),
            entry.avg_score
        ));
    }
    out.push('\n');

    // ------------------------------------------------------------------
    // Run summary
    // ------------------------------------------------------------------
    out.push_str("## Run Summary\n\n");
    out.push_str("| Timestamp | Scenario | Run | Result | Score |\n");
    out.push_str("|-----------|----------|-----|--------|-------|\n");
    for record in repo.records() {
        out.push_str(&format!(
            "| {} | {} | {} | {} | {} |\n",
            record.timestamp,
            table_cell(record.scenario_label()),
            record.run_id.as_deref().unwrap_or("-"),
            if record.is_pass { "PASS" } else { "FAIL" },
            format_score(record.total_score)
        ));
    }
    out.push('\n');

    // ------------------------------------------------------------------
    // Per-run details
    // ------------------------------------------------------------------
    out.push_str("## Run Details\n");
    for record in repo.records() {
        out.push_str(&render_run_section(record));
    }

    out
}

fn render_run_section(record: &RunRecord) -> String {
    let detail = run_detail(record);
    let mut out = String::new();

    out.push_str(&format!(
        "\n### {} - run {} ({})\n\n",
        detail.header.scenario_label, detail.header.run_id, record.timestamp
    ));
    out.push_str(&format!("**Result**: {}\n", detail.header.status_label));
    out.push_str(&format!(
        "**Total score**: {}\n\n",
        detail.header.display_score
    ));

    if let Some(rows) = &detail.rubric {
        out.push_str("| Dimension | Score | Reasoning |\n");
        out.push_str("|-----------|-------|-----------|\n");
        for row in rows {
            out.push_str(&format!(
                "| {} | {} | {} |\n",
                table_cell(&row.dimension),
                row.score,
                table_cell(&row.reasoning)
            ));
        }
        out.push('\n');
    }

    if !record.transcript.is_empty() {
        out.push_str("**Transcript**\n\n```text\n");
        for line in &record.transcript {
            // raw content: the fence is the escape here
            out.push_str(&format!("{}: {}\n", line.speaker, line.content));
        }
        out.push_str("```\n");
    }

    out
}

/// Render the report and write it to `path`, creating parent directories
/// as needed.
pub fn write_report(repo: &RunRepository, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    fs::write(path, render_markdown(repo))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{raw_record, with_rubric, with_transcript};
    use tempfile::TempDir;

    fn sample_repo() -> RunRepository {
        RunRepository::from_raw(vec![
            raw_record("quest", "20260122_181745", "1", true, 8.0),
            raw_record("quest", "20260122_171745", "2", false, 0.0),
            raw_record("tavern", "20260122_161745", "1", true, 6.0),
        ])
    }

    #[test]
    fn test_reliability_grouping_and_counts() {
        let entries = reliability_by_scenario(&sample_repo());
        assert_eq!(entries.len(), 2);

        // first appearance order: quest (newest record) before tavern
        assert_eq!(entries[0].scenario, "quest");
        assert_eq!(entries[0].trials, 2);
        assert_eq!(entries[0].passes, 1);
        // ungraded runs count as zero in the scenario average
        assert_eq!(entries[0].avg_score, 4.0);

        assert_eq!(entries[1].scenario, "tavern");
        assert_eq!(entries[1].trials, 1);
        assert_eq!(entries[1].passes, 1);
    }

    #[test]
    fn test_pass_at_k_and_pass_all_k() {
        let entry = |trials, passes| ScenarioReliability {
            scenario: "s".to_string(),
            trials,
            passes,
            avg_score: 0.0,
        };
        assert!(entry(3, 1).pass_at_k());
        assert!(!entry(3, 1).pass_all_k());
        assert!(entry(3, 3).pass_at_k());
        assert!(entry(3, 3).pass_all_k());
        assert!(!entry(3, 0).pass_at_k());
        assert!(!entry(3, 0).pass_all_k());
        assert!(entry(5, 3).pass_at_k());
        assert!(!entry(5, 3).pass_all_k());
    }

    #[test]
    fn test_render_contains_reliability_rows() {
        let report = render_markdown(&sample_repo());
        assert!(report.contains("| quest | 2 | 1 | YES | NO | 4.00 |"));
        assert!(report.contains("| tavern | 1 | 1 | YES | YES | 6.00 |"));
    }

    #[test]
    fn test_render_summary_table() {
        let report = render_markdown(&sample_repo());
        assert!(report.contains("| 20260122_181745 | quest | 1 | PASS | 8 |"));
        assert!(report.contains("| 20260122_171745 | quest | 2 | FAIL | - |"));
    }

    #[test]
    fn test_render_run_section_with_rubric_and_transcript() {
        let raw = with_transcript(
            with_rubric(
                raw_record("quest", "20260122_181745", "1", true, 9.0),
                &[("persuasion", 5.0)],
                &[("persuasion", "Strong open.")],
            ),
            &[("Player", "Lower the toll & let us pass.")],
        );
        let repo = RunRepository::from_raw(vec![raw]);
        let report = render_markdown(&repo);

        assert!(report.contains("### quest - run 1 (20260122_181745)"));
        assert!(report.contains("| persuasion | 5 | Strong open. |"));
        // transcript goes into the fence raw, not HTML-escaped
        assert!(report.contains("Player: Lower the toll & let us pass."));
    }

    #[test]
    fn test_table_cells_are_sanitized() {
        let raw = with_rubric(
            raw_record("quest", "20260122_181745", "1", true, 9.0),
            &[("tone|style", 3.0)],
            &[("tone|style", "line one\nline two")],
        );
        let repo = RunRepository::from_raw(vec![raw]);
        let report = render_markdown(&repo);
        assert!(report.contains("| tone\\|style | 3 | line one line two |"));
    }

    #[test]
    fn test_unnamed_scenario_reports_as_unknown() {
        let mut raw = raw_record("x", "20260122_181745", "1", true, 5.0);
        raw.scenario = None;
        let repo = RunRepository::from_raw(vec![raw]);
        let entries = reliability_by_scenario(&repo);
        assert_eq!(entries[0].scenario, "Unknown");
    }

    #[test]
    fn test_write_report_creates_parent_dirs() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("reports").join("latest.md");
        write_report(&sample_repo(), &path).unwrap();
        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.starts_with("# Evaluation Report"));
    }
}
