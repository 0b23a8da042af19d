use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EvalviewError {
    #[error("Runs directory not found: {0}")]
    RunsDirNotFound(PathBuf),

    #[error("Invalid result filter: '{0}'. Valid filters are: all, pass, fail.")]
    ResultFilter(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Report error: {0}")]
    Report(String),

    #[error("Export error: {0}")]
    Export(String),

    #[error("Shell completion error: {0}")]
    ShellCompletion(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, EvalviewError>;
