//! Loading run records from a harness output directory.

use crate::error::{EvalviewError, Result};
use crate::output;
use crate::record::RawRunRecord;
use crate::repo::RunRepository;
use std::fs;
use std::path::Path;

/// Load every `*.json` file under `dir` into a repository.
///
/// A file that cannot be read or parsed is skipped with a warning, so one
/// corrupt record never hides the rest of a batch. Records are ordered
/// newest first by their raw timestamp string (the `YYYYMMDD_HHMMSS` form
/// sorts chronologically as text).
pub fn load_runs_dir(dir: &Path) -> Result<RunRepository> {
    if !dir.exists() {
        return Err(EvalviewError::RunsDirNotFound(dir.to_path_buf()));
    }

    let mut raws: Vec<RawRunRecord> = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.extension().is_none_or(|ext| ext != "json") {
            continue;
        }
        match read_record(&path) {
            Ok(raw) => raws.push(raw),
            Err(e) => output::print_warning(&format!("Skipping {}: {}", path.display(), e)),
        }
    }

    raws.sort_by(|a, b| {
        let ta = a.timestamp.as_deref().unwrap_or("");
        let tb = b.timestamp.as_deref().unwrap_or("");
        tb.cmp(ta)
    });

    Ok(RunRepository::from_raw(raws))
}

fn read_record(path: &Path) -> Result<RawRunRecord> {
    let content = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_run(dir: &Path, name: &str, scenario: &str, timestamp: &str) {
        let json = format!(
            r#"{{"scenario": "{}", "timestamp": "{}", "grades": [], "transcript": []}}"#,
            scenario, timestamp
        );
        fs::write(dir.join(name), json).unwrap();
    }

    #[test]
    fn test_load_sorts_newest_first() {
        let temp = TempDir::new().unwrap();
        write_run(temp.path(), "a.json", "quest", "20260120_090000");
        write_run(temp.path(), "b.json", "quest", "20260122_181745");
        write_run(temp.path(), "c.json", "quest", "20260121_120000");

        let repo = load_runs_dir(temp.path()).unwrap();
        let timestamps: Vec<&str> = repo
            .records()
            .iter()
            .map(|r| r.timestamp.as_str())
            .collect();
        assert_eq!(
            timestamps,
            vec!["20260122_181745", "20260121_120000", "20260120_090000"]
        );
    }

    #[test]
    fn test_load_skips_unparseable_files() {
        let temp = TempDir::new().unwrap();
        write_run(temp.path(), "good.json", "quest", "20260122_181745");
        fs::write(temp.path().join("bad.json"), "{ not json").unwrap();

        let repo = load_runs_dir(temp.path()).unwrap();
        assert_eq!(repo.len(), 1);
        assert_eq!(repo.records()[0].scenario.as_deref(), Some("quest"));
    }

    #[test]
    fn test_load_ignores_non_json_files() {
        let temp = TempDir::new().unwrap();
        write_run(temp.path(), "run.json", "quest", "20260122_181745");
        fs::write(temp.path().join("notes.txt"), "not a record").unwrap();
        fs::write(temp.path().join("README"), "also not").unwrap();

        let repo = load_runs_dir(temp.path()).unwrap();
        assert_eq!(repo.len(), 1);
    }

    #[test]
    fn test_load_missing_dir_is_an_error() {
        let temp = TempDir::new().unwrap();
        let missing = temp.path().join("does-not-exist");
        let err = load_runs_dir(&missing).unwrap_err();
        assert!(matches!(err, EvalviewError::RunsDirNotFound(_)));
    }

    #[test]
    fn test_load_empty_dir_gives_empty_repo() {
        let temp = TempDir::new().unwrap();
        let repo = load_runs_dir(temp.path()).unwrap();
        assert!(repo.is_empty());
    }

    #[test]
    fn test_records_missing_timestamps_sort_last() {
        let temp = TempDir::new().unwrap();
        write_run(temp.path(), "a.json", "quest", "20260122_181745");
        fs::write(
            temp.path().join("b.json"),
            r#"{"scenario": "quest", "grades": [], "transcript": []}"#,
        )
        .unwrap();

        let repo = load_runs_dir(temp.path()).unwrap();
        assert_eq!(repo.len(), 2);
        assert_eq!(repo.records()[0].timestamp, "20260122_181745");
        assert_eq!(repo.records()[1].timestamp, "");
    }
}
