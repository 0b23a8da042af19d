use crate::error::{EvalviewError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// The base config directory name under ~/.config/
const CONFIG_DIR_NAME: &str = "evalview";
const CONFIG_FILENAME: &str = "config.toml";

/// Where the harness writes run records, relative to the project root.
pub const DEFAULT_RUNS_DIR: &str = "evals/outputs/runs";
/// Default destination for generated markdown reports.
pub const DEFAULT_REPORT_FILE: &str = "evals/reports/latest_report.md";

/// User configuration for evalview.
///
/// Both fields are optional; missing fields fall back to the harness's
/// standard layout. A command-line path always wins over the config file.
///
/// # Example
///
/// ```toml
/// # Directory scanned for run JSON files
/// runs_dir = "/home/me/game/evals/outputs/runs"
///
/// # Default destination for `evalview report`
/// report_file = "/home/me/game/evals/reports/latest_report.md"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Config {
    /// Directory scanned for run JSON files when no path is given.
    #[serde(default)]
    pub runs_dir: Option<PathBuf>,

    /// Default output path for generated reports.
    #[serde(default)]
    pub report_file: Option<PathBuf>,
}

impl Config {
    /// Resolve the runs directory: command line, then config file, then
    /// the harness default.
    pub fn resolve_runs_dir(&self, cli: Option<PathBuf>) -> PathBuf {
        cli.or_else(|| self.runs_dir.clone())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_RUNS_DIR))
    }

    /// Resolve the report output path with the same precedence.
    pub fn resolve_report_file(&self, cli: Option<PathBuf>) -> PathBuf {
        cli.or_else(|| self.report_file.clone())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_REPORT_FILE))
    }
}

/// Default config file content, written on first load so the options are
/// discoverable without documentation.
const DEFAULT_CONFIG_WITH_COMMENTS: &str = r#"# evalview configuration
# Both settings are optional. Command-line paths always take precedence.

# Directory scanned for run JSON files.
# Uncomment and adjust to avoid passing a path on every invocation:
# runs_dir = "evals/outputs/runs"

# Default destination for `evalview report`:
# report_file = "evals/reports/latest_report.md"
"#;

/// Get the evalview config directory path (~/.config/evalview/).
///
/// Returns the path to the config directory. Does not create the directory.
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| EvalviewError::Config("Could not determine home directory".to_string()))?;
    Ok(home.join(".config").join(CONFIG_DIR_NAME))
}

/// Get the path to the config file (~/.config/evalview/config.toml).
pub fn config_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILENAME))
}

/// Load the configuration from `~/.config/evalview/config.toml`.
///
/// If the file doesn't exist yet, it is created with commented-out defaults
/// and the built-in defaults are returned.
pub fn load_config() -> Result<Config> {
    let path = config_path()?;

    if !path.exists() {
        fs::create_dir_all(config_dir()?)?;
        fs::write(&path, DEFAULT_CONFIG_WITH_COMMENTS)?;
        return Ok(Config::default());
    }

    let content = fs::read_to_string(&path)?;
    toml::from_str(&content).map_err(|e| {
        EvalviewError::Config(format!("Failed to parse config file at {:?}: {}", path, e))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_has_no_overrides() {
        let config = Config::default();
        assert_eq!(config.runs_dir, None);
        assert_eq!(config.report_file, None);
    }

    #[test]
    fn test_resolve_precedence_cli_wins() {
        let config = Config {
            runs_dir: Some(PathBuf::from("/from/config")),
            report_file: None,
        };
        assert_eq!(
            config.resolve_runs_dir(Some(PathBuf::from("/from/cli"))),
            PathBuf::from("/from/cli")
        );
    }

    #[test]
    fn test_resolve_falls_back_to_config_then_default() {
        let config = Config {
            runs_dir: Some(PathBuf::from("/from/config")),
            report_file: None,
        };
        assert_eq!(config.resolve_runs_dir(None), PathBuf::from("/from/config"));

        let empty = Config::default();
        assert_eq!(empty.resolve_runs_dir(None), PathBuf::from(DEFAULT_RUNS_DIR));
        assert_eq!(
            empty.resolve_report_file(None),
            PathBuf::from(DEFAULT_REPORT_FILE)
        );
    }

    #[test]
    fn test_parse_partial_config() {
        let config: Config = toml::from_str(r#"runs_dir = "/tmp/runs""#).unwrap();
        assert_eq!(config.runs_dir, Some(PathBuf::from("/tmp/runs")));
        assert_eq!(config.report_file, None);
    }

    #[test]
    fn test_parse_empty_config() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_default_config_template_is_valid_toml() {
        let config: Config = toml::from_str(DEFAULT_CONFIG_WITH_COMMENTS).unwrap();
        // Every option in the template is commented out
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_config_path_shape() {
        let path = config_path().unwrap();
        let s = path.to_string_lossy();
        assert!(s.ends_with(".config/evalview/config.toml"), "{}", s);
    }

    #[test]
    fn test_invalid_toml_is_a_config_error() {
        let result: std::result::Result<Config, _> = toml::from_str("runs_dir = 42");
        assert!(result.is_err());
    }
}
