//! Standalone HTML export.
//!
//! Writes one self-contained page built from the same projections the TUI
//! draws: the stats strip, the run list, and a detail section per run.
//! Transcript content arrives from the detail projection already escaped
//! and is inserted verbatim; everything else is escaped here, at the point
//! where it meets markup.

use crate::error::Result;
use crate::format::escape_html;
use crate::record::SpeakerRole;
use crate::repo::RunRepository;
use crate::state::ViewerState;
use crate::views::{run_detail, run_list, RunDetail, RunSummary};
use chrono::Utc;
use std::fs;
use std::path::Path;

const STYLE: &str = "\
body { font-family: sans-serif; margin: 2em auto; max-width: 60em; color: #222; }
h1 { border-bottom: 2px solid #444; padding-bottom: 0.2em; }
.stats { color: #555; margin-bottom: 2em; }
table.run-list, table.rubric { border-collapse: collapse; width: 100%; margin: 1em 0; }
table.run-list td, table.run-list th, table.rubric td, table.rubric th {
  border: 1px solid #ccc; padding: 0.3em 0.6em; text-align: left; }
.status-pass { color: #1a7f37; font-weight: bold; }
.status-fail { color: #b42318; font-weight: bold; }
.detail { border-top: 1px solid #ddd; margin-top: 2em; padding-top: 1em; }
.meta { color: #666; font-size: 0.9em; }
.bubble { margin: 0.5em 0; padding: 0.5em 0.8em; border-radius: 6px; white-space: pre-wrap; }
.role-player { background: #e7f0fe; }
.role-counterpart { background: #f0f0f0; }
.speaker { font-weight: bold; display: block; margin-bottom: 0.2em; }
footer { margin-top: 3em; color: #888; font-size: 0.8em; }
";

fn status_class(is_pass: bool) -> &'static str {
    if is_pass {
        "status-pass"
    } else {
        "status-fail"
    }
}

fn role_class(role: SpeakerRole) -> &'static str {
    match role {
        SpeakerRole::Player => "role-player",
        SpeakerRole::Counterpart => "role-counterpart",
    }
}

fn render_summary_row(summary: &RunSummary) -> String {
    format!(
        "<tr><td class=\"{}\">{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>\n",
        status_class(summary.is_pass),
        summary.status_label,
        escape_html(&summary.scenario_label),
        escape_html(&summary.display_score),
        escape_html(&summary.display_run_id),
        escape_html(&summary.formatted_timestamp)
    )
}

fn render_detail_section(detail: &RunDetail) -> String {
    let mut out = String::new();
    out.push_str("<section class=\"detail\">\n");
    out.push_str(&format!(
        "<h2>{}</h2>\n<p class=\"meta\">Run {} · {} · <span class=\"{}\">{}</span> · score {}</p>\n",
        escape_html(&detail.header.scenario_label),
        escape_html(&detail.header.run_id),
        escape_html(&detail.header.timestamp),
        status_class(detail.header.is_pass),
        detail.header.status_label,
        escape_html(&detail.header.display_score)
    ));

    if let Some(rows) = &detail.rubric {
        out.push_str("<h3>Rubric</h3>\n<table class=\"rubric\">\n");
        out.push_str("<tr><th>Dimension</th><th>Score</th><th>Reasoning</th></tr>\n");
        for row in rows {
            out.push_str(&format!(
                "<tr><td>{}</td><td>{}</td><td>{}</td></tr>\n",
                escape_html(&row.dimension),
                row.score,
                escape_html(&row.reasoning)
            ));
        }
        out.push_str("</table>\n");
    }

    if !detail.transcript.is_empty() {
        out.push_str("<h3>Transcript</h3>\n");
        for bubble in &detail.transcript {
            // bubble.content is already escaped by the projection
            out.push_str(&format!(
                "<div class=\"bubble {}\"><span class=\"speaker\">{}</span>{}</div>\n",
                role_class(bubble.role),
                escape_html(&bubble.speaker),
                bubble.content
            ));
        }
    }

    out.push_str("</section>\n");
    out
}

/// Render the whole repository as one self-contained HTML page.
pub fn render_html(repo: &RunRepository) -> String {
    let stats = repo.aggregate_stats();
    let summaries = run_list(repo, &ViewerState::new());
    let mut out = String::new();

    out.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n");
    out.push_str("<title>Evaluation Runs</title>\n");
    out.push_str(&format!("<style>\n{}</style>\n</head>\n<body>\n", STYLE));
    out.push_str("<h1>Evaluation Runs</h1>\n");
    out.push_str(&format!(
        "<p class=\"stats\">{} runs · {}% pass rate · avg score {}</p>\n",
        stats.total_runs,
        stats.pass_rate,
        escape_html(&stats.avg_score_label())
    ));

    out.push_str("<table class=\"run-list\">\n");
    out.push_str(
        "<tr><th>Result</th><th>Scenario</th><th>Score</th><th>Run</th><th>Timestamp</th></tr>\n",
    );
    for summary in &summaries {
        out.push_str(&render_summary_row(summary));
    }
    out.push_str("</table>\n");

    for record in repo.records() {
        out.push_str(&render_detail_section(&run_detail(record)));
    }

    out.push_str(&format!(
        "<footer>Generated {}</footer>\n</body>\n</html>\n",
        Utc::now().format("%Y-%m-%d %H:%M UTC")
    ));
    out
}

/// Render and write the page to `path`, creating parent directories as
/// needed.
pub fn write_html(repo: &RunRepository, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    fs::write(path, render_html(repo))?;
    Ok(())
}
