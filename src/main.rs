//! evalview CLI entry point.
//!
//! Parses command-line arguments and dispatches to the appropriate command handler.

use clap::{Parser, Subcommand};
use evalview::commands::{
    export_command, list_command, report_command, stats_command, view_command,
};
use evalview::completion::{
    detect_shell, install_completion_script, print_completion_script, ShellType,
};
use evalview::config::load_config;
use evalview::error::Result;
use evalview::output::{print_error, print_info};
use std::path::PathBuf;

/// Default destination for `evalview export` when no path is given.
const DEFAULT_EXPORT_FILE: &str = "evalview.html";

#[derive(Parser)]
#[command(name = "evalview")]
#[command(
    version,
    about = "Terminal viewer and report generator for AI evaluation run records",
    after_help = "EXAMPLES:
    # Browse the default runs directory interactively
    evalview

    # Browse a specific directory
    evalview evals/outputs/runs
    evalview view evals/outputs/runs

    # Print failing runs for one scenario
    evalview list --scenario quest_negotiation --result fail

    # Aggregate statistics
    evalview stats

    # Generate the markdown report
    evalview report -o evals/reports/latest_report.md

    # Export a standalone HTML page
    evalview export -o runs.html"
)]
struct Cli {
    /// Runs directory to view (shorthand for `view <dir>`)
    dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Browse runs interactively in the terminal
    View {
        /// Directory containing run JSON files
        runs_dir: Option<PathBuf>,
    },

    /// Print the run list
    List {
        /// Directory containing run JSON files
        runs_dir: Option<PathBuf>,

        /// Only show runs for this scenario
        #[arg(short, long)]
        scenario: Option<String>,

        /// Only show runs with this result (all, pass, fail)
        #[arg(short, long, default_value = "all")]
        result: String,
    },

    /// Print aggregate statistics
    Stats {
        /// Directory containing run JSON files
        runs_dir: Option<PathBuf>,
    },

    /// Generate the markdown report (reliability analysis + per-run details)
    Report {
        /// Directory containing run JSON files
        runs_dir: Option<PathBuf>,

        /// Report destination path
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Export all runs as a standalone HTML page
    Export {
        /// Directory containing run JSON files
        runs_dir: Option<PathBuf>,

        /// HTML destination path
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Output shell completion script to stdout (hidden utility command)
    #[command(hide = true)]
    Completions {
        /// Shell type (bash, zsh, or fish); detected from $SHELL when omitted
        shell: Option<String>,

        /// Install the script into the shell's completion directory
        #[arg(long)]
        install: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        print_error(&e.to_string());
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    // Completions need neither a config file nor a runs directory
    if let Some(Commands::Completions { shell, install }) = &cli.command {
        let shell_type = match shell.as_deref() {
            Some(name) => ShellType::from_name(name)?,
            None => detect_shell()?,
        };
        if *install {
            let path = install_completion_script(shell_type)?;
            print_info(&format!(
                "Installed {} completions to {}",
                shell_type,
                path.display()
            ));
        } else {
            print_completion_script(shell_type);
        }
        return Ok(());
    }

    let config = load_config()?;

    match cli.command {
        Some(Commands::View { runs_dir }) => view_command(&config.resolve_runs_dir(runs_dir)),
        Some(Commands::List {
            runs_dir,
            scenario,
            result,
        }) => list_command(
            &config.resolve_runs_dir(runs_dir),
            scenario.as_deref(),
            &result,
        ),
        Some(Commands::Stats { runs_dir }) => stats_command(&config.resolve_runs_dir(runs_dir)),
        Some(Commands::Report { runs_dir, output }) => report_command(
            &config.resolve_runs_dir(runs_dir),
            &config.resolve_report_file(output),
        ),
        Some(Commands::Export { runs_dir, output }) => export_command(
            &config.resolve_runs_dir(runs_dir),
            &output.unwrap_or_else(|| PathBuf::from(DEFAULT_EXPORT_FILE)),
        ),
        // Handled above
        Some(Commands::Completions { .. }) => unreachable!(),
        // No subcommand: open the viewer on the given or configured directory
        None => view_command(&config.resolve_runs_dir(cli.dir)),
    }
}
