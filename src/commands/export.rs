//! `export` command: write the standalone HTML page.

use crate::error::Result;
use crate::export::write_html;
use crate::ingest::load_runs_dir;
use crate::output;
use std::path::Path;

pub fn export_command(runs_dir: &Path, output_path: &Path) -> Result<()> {
    let repo = load_runs_dir(runs_dir)?;
    write_html(&repo, output_path)?;
    output::print_info(&format!(
        "Exported {} runs to {}",
        repo.len(),
        output_path.display()
    ));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_export_command_writes_page() {
        let temp = TempDir::new().unwrap();
        let runs = temp.path().join("runs");
        fs::create_dir(&runs).unwrap();
        fs::write(
            runs.join("run.json"),
            r#"{"scenario": "quest", "timestamp": "20260122_181745", "grades": [], "transcript": []}"#,
        )
        .unwrap();

        let out = temp.path().join("index.html");
        export_command(&runs, &out).unwrap();
        let content = fs::read_to_string(&out).unwrap();
        assert!(content.starts_with("<!DOCTYPE html>"));
        assert!(content.contains("quest"));
    }
}
