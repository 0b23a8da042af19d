use crate::format::truncate;
use crate::repo::AggregateStats;
use crate::views::RunSummary;
use terminal_size::{terminal_size, Width};

// ANSI color codes
pub const RESET: &str = "\x1b[0m";
pub const BOLD: &str = "\x1b[1m";
pub const DIM: &str = "\x1b[2m";
pub const GREEN: &str = "\x1b[32m";
pub const YELLOW: &str = "\x1b[33m";
pub const BLUE: &str = "\x1b[34m";
pub const CYAN: &str = "\x1b[36m";
pub const RED: &str = "\x1b[31m";
pub const GRAY: &str = "\x1b[90m";

const DEFAULT_TERMINAL_WIDTH: usize = 80;
const MIN_BANNER_WIDTH: usize = 20;
const MAX_BANNER_WIDTH: usize = 80;

const SCENARIO_COL_WIDTH: usize = 26;

// ============================================================================
// Messages
// ============================================================================

/// Print an error message.
pub fn print_error(msg: &str) {
    println!("{RED}{BOLD}Error:{RESET} {}", msg);
}

/// Print a warning message.
pub fn print_warning(msg: &str) {
    println!("{YELLOW}Warning:{RESET} {}", msg);
}

/// Print an info message.
pub fn print_info(msg: &str) {
    println!("{CYAN}Info:{RESET} {}", msg);
}

// ============================================================================
// Section banner
// ============================================================================

fn terminal_width() -> usize {
    terminal_size()
        .map(|(Width(w), _)| w as usize)
        .unwrap_or(DEFAULT_TERMINAL_WIDTH)
}

/// Print a cyan section banner: `━━━ TITLE ━━━` padded to the terminal
/// width, clamped between MIN and MAX.
pub fn print_section_banner(title: &str) {
    let banner_width = terminal_width().clamp(MIN_BANNER_WIDTH, MAX_BANNER_WIDTH);
    let label_len = title.chars().count() + 2;
    let dashes = banner_width.saturating_sub(label_len);
    let left = dashes / 2;
    let right = dashes - left;
    println!(
        "{CYAN}{} {BOLD}{}{RESET}{CYAN} {}{RESET}",
        "━".repeat(left),
        title,
        "━".repeat(right)
    );
}

// ============================================================================
// Run list
// ============================================================================

fn summary_row(summary: &RunSummary) -> String {
    let (mark, color) = if summary.is_pass {
        ("✓", GREEN)
    } else {
        ("✗", RED)
    };
    let status = format!("{} {}", mark, summary.status_label);
    format!(
        "{color}{:<7}{RESET} {:<width$} {:>6}  {:<4} {GRAY}{}{RESET}",
        status,
        truncate(&summary.scenario_label, SCENARIO_COL_WIDTH),
        summary.display_score,
        summary.display_run_id,
        summary.formatted_timestamp,
        width = SCENARIO_COL_WIDTH
    )
}

/// Print the run list as an aligned table, one row per summary.
pub fn print_run_list(summaries: &[RunSummary]) {
    if summaries.is_empty() {
        println!("{DIM}No runs match the current filters.{RESET}");
        return;
    }
    println!(
        "{BOLD}{:<7} {:<width$} {:>6}  {:<4} {}{RESET}",
        "RESULT",
        "SCENARIO",
        "SCORE",
        "RUN",
        "TIMESTAMP",
        width = SCENARIO_COL_WIDTH
    );
    for summary in summaries {
        println!("{}", summary_row(summary));
    }
}

// ============================================================================
// Stats
// ============================================================================

/// Print whole-repository statistics.
pub fn print_stats(stats: &AggregateStats, scenarios: &[String]) {
    println!("{BOLD}Total runs:{RESET}    {}", stats.total_runs);
    println!("{BOLD}Pass rate:{RESET}     {}%", stats.pass_rate);
    println!("{BOLD}Average score:{RESET} {}", stats.avg_score_label());
    if !scenarios.is_empty() {
        println!("{BOLD}Scenarios:{RESET}     {}", scenarios.join(", "));
    }
}
