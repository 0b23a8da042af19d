//! Shell completion infrastructure for evalview.
//!
//! Provides shell detection from `$SHELL`, completion script generation for
//! bash, zsh and fish, and installation path resolution for each shell.

use crate::error::{EvalviewError, Result};
use clap::Command;
use clap_complete::{generate, Shell};
use std::path::PathBuf;

/// Shell names accepted by `evalview completions`.
pub const SUPPORTED_SHELLS: [&str; 3] = ["bash", "zsh", "fish"];

/// Supported shell types for completion scripts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShellType {
    Bash,
    Zsh,
    Fish,
}

impl ShellType {
    /// Parse a shell name as given on the command line.
    pub fn from_name(name: &str) -> Result<Self> {
        match name {
            "bash" => Ok(ShellType::Bash),
            "zsh" => Ok(ShellType::Zsh),
            "fish" => Ok(ShellType::Fish),
            other => Err(EvalviewError::ShellCompletion(format!(
                "Unsupported shell: '{}'. Supported shells are: {}.",
                other,
                SUPPORTED_SHELLS.join(", ")
            ))),
        }
    }

    /// Convert to the `clap_complete::Shell` type.
    pub fn to_clap_shell(self) -> Shell {
        match self {
            ShellType::Bash => Shell::Bash,
            ShellType::Zsh => Shell::Zsh,
            ShellType::Fish => Shell::Fish,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ShellType::Bash => "bash",
            ShellType::Zsh => "zsh",
            ShellType::Fish => "fish",
        }
    }
}

impl std::fmt::Display for ShellType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Detect the user's shell from the `$SHELL` environment variable.
pub fn detect_shell() -> Result<ShellType> {
    let shell_path = std::env::var("SHELL").map_err(|_| {
        EvalviewError::ShellCompletion(
            "$SHELL environment variable is not set. Please specify your shell manually."
                .to_string(),
        )
    })?;
    parse_shell_from_path(&shell_path)
}

/// Parse a shell type from a shell path such as `/bin/zsh`.
pub fn parse_shell_from_path(shell_path: &str) -> Result<ShellType> {
    let shell_name = std::path::Path::new(shell_path)
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or(shell_path);
    ShellType::from_name(shell_name)
}

/// Get the installation path for completion scripts.
///
/// - **Bash**: `~/.local/share/bash-completion/completions/evalview`,
///   falling back to `~/.bash_completion.d/evalview`
/// - **Zsh**: `~/.zfunc/_evalview`
/// - **Fish**: `~/.config/fish/completions/evalview.fish`
pub fn get_completion_path(shell: ShellType) -> Result<PathBuf> {
    let home = dirs::home_dir().ok_or_else(|| {
        EvalviewError::ShellCompletion("Could not determine home directory".to_string())
    })?;

    let path = match shell {
        ShellType::Bash => {
            let xdg_path = home.join(".local/share/bash-completion/completions");
            if xdg_path.exists() {
                xdg_path.join("evalview")
            } else {
                home.join(".bash_completion.d/evalview")
            }
        }
        ShellType::Zsh => home.join(".zfunc/_evalview"),
        ShellType::Fish => home.join(".config/fish/completions/evalview.fish"),
    };

    Ok(path)
}

/// Build the clap Command structure for completion generation.
///
/// Mirrors the CLI defined in `main.rs` so clap_complete can generate
/// accurate completion scripts.
fn build_cli() -> Command {
    Command::new("evalview")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Terminal viewer and report generator for AI evaluation run records")
        .arg(
            clap::Arg::new("dir")
                .help("Runs directory to view (shorthand for `view <dir>`)")
                .value_hint(clap::ValueHint::DirPath),
        )
        .subcommand(
            Command::new("view")
                .about("Browse runs interactively in the terminal")
                .arg(
                    clap::Arg::new("runs_dir")
                        .help("Directory containing run JSON files")
                        .value_hint(clap::ValueHint::DirPath),
                ),
        )
        .subcommand(
            Command::new("list")
                .about("Print the run list")
                .arg(
                    clap::Arg::new("runs_dir")
                        .help("Directory containing run JSON files")
                        .value_hint(clap::ValueHint::DirPath),
                )
                .arg(
                    clap::Arg::new("scenario")
                        .short('s')
                        .long("scenario")
                        .help("Only show runs for this scenario"),
                )
                .arg(
                    clap::Arg::new("result")
                        .short('r')
                        .long("result")
                        .help("Only show runs with this result (all, pass, fail)")
                        .default_value("all"),
                ),
        )
        .subcommand(
            Command::new("stats")
                .about("Print aggregate statistics")
                .arg(
                    clap::Arg::new("runs_dir")
                        .help("Directory containing run JSON files")
                        .value_hint(clap::ValueHint::DirPath),
                ),
        )
        .subcommand(
            Command::new("report")
                .about("Generate the markdown report")
                .arg(
                    clap::Arg::new("runs_dir")
                        .help("Directory containing run JSON files")
                        .value_hint(clap::ValueHint::DirPath),
                )
                .arg(
                    clap::Arg::new("output")
                        .short('o')
                        .long("output")
                        .help("Report destination path")
                        .value_hint(clap::ValueHint::FilePath),
                ),
        )
        .subcommand(
            Command::new("export")
                .about("Export all runs as a standalone HTML page")
                .arg(
                    clap::Arg::new("runs_dir")
                        .help("Directory containing run JSON files")
                        .value_hint(clap::ValueHint::DirPath),
                )
                .arg(
                    clap::Arg::new("output")
                        .short('o')
                        .long("output")
                        .help("HTML destination path")
                        .value_hint(clap::ValueHint::FilePath),
                ),
        )
        .subcommand(
            Command::new("completions")
                .about("Output shell completion script to stdout")
                .arg(clap::Arg::new("shell").help("Shell type (bash, zsh, or fish)"))
                .arg(
                    clap::Arg::new("install")
                        .long("install")
                        .help("Install the script to the shell's completion directory")
                        .action(clap::ArgAction::SetTrue),
                ),
        )
}

/// Generate a completion script for the specified shell.
pub fn generate_completion_script(shell: ShellType) -> String {
    let mut cmd = build_cli();
    let mut buf = Vec::new();
    generate(shell.to_clap_shell(), &mut cmd, "evalview", &mut buf);
    String::from_utf8(buf).unwrap_or_default()
}

/// Print a completion script to stdout.
pub fn print_completion_script(shell: ShellType) {
    print!("{}", generate_completion_script(shell));
}

/// Write a completion script to the shell's completion directory, creating
/// parent directories as needed. Returns the path written to.
pub fn install_completion_script(shell: ShellType) -> Result<PathBuf> {
    let path = get_completion_path(shell)?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| {
            EvalviewError::ShellCompletion(format!(
                "Failed to create completion directory '{}': {}",
                parent.display(),
                e
            ))
        })?;
    }
    std::fs::write(&path, generate_completion_script(shell)).map_err(|e| {
        EvalviewError::ShellCompletion(format!(
            "Failed to write completion script to '{}': {}",
            path.display(),
            e
        ))
    })?;
    Ok(path)
}
