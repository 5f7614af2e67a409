use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Lists the files directly inside `folder` whose extension matches
/// `extension` (case-insensitive), skipping `exclude` by file name.
///
/// Results are sorted by file name so leaderboard ties resolve the same way
/// on every run.
pub fn scan_folder(folder: &Path, extension: &str, exclude: &str) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for entry in fs::read_dir(folder)
        .with_context(|| format!("cannot list folder {}", folder.display()))?
    {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }

        let path = entry.path();
        let matches = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case(extension));
        if !matches || entry.file_name().to_str() == Some(exclude) {
            continue;
        }

        files.push(path);
    }

    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_scan_filters_by_extension() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("b.csv"), "").unwrap();
        fs::write(tmp.path().join("a.CSV"), "").unwrap();
        fs::write(tmp.path().join("notes.txt"), "").unwrap();
        fs::create_dir(tmp.path().join("nested.csv")).unwrap();

        let files = scan_folder(tmp.path(), "csv", "summary.txt").unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap().to_string())
            .collect();
        assert_eq!(names, vec!["a.CSV", "b.csv"]);
    }

    #[test]
    fn test_scan_skips_excluded_name() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("summary.csv"), "").unwrap();
        fs::write(tmp.path().join("m1.csv"), "").unwrap();

        let files = scan_folder(tmp.path(), "csv", "summary.csv").unwrap();
        assert_eq!(files.len(), 1);
    }

    #[test]
    fn test_scan_does_not_recurse() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir(tmp.path().join("sub")).unwrap();
        fs::write(tmp.path().join("sub").join("deep.csv"), "").unwrap();

        assert!(scan_folder(tmp.path(), "csv", "x").unwrap().is_empty());
    }

    #[test]
    fn test_scan_missing_folder_errors() {
        let tmp = TempDir::new().unwrap();
        assert!(scan_folder(&tmp.path().join("gone"), "csv", "x").is_err());
    }
}
