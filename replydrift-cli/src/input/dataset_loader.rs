//! Dataset loading with progress

use crate::progress::ProgressReporter;
use anyhow::{Context, Result};
use replydrift_engine::{load_file, InMemoryStore, LoadStats};
use std::path::PathBuf;

/// Load every dataset file into one store
///
/// Files are read in the given order; a post id seen in an earlier file wins.
pub fn load_datasets(
    files: &[PathBuf],
    reporter: &ProgressReporter,
) -> Result<(InMemoryStore, LoadStats)> {
    let mut store = InMemoryStore::new();
    let mut total = LoadStats::default();
    reporter.init_files(files.len() as u64);

    for path in files {
        let stats = load_file(path, &mut store)
            .with_context(|| format!("Failed to load dataset {}", path.display()))?;
        reporter.file_completed(&path.display().to_string(), stats.loaded);
        total.merge(stats);
    }

    log::info!(
        "Loaded {} posts from {} files ({} skipped, {} duplicates)",
        total.loaded,
        files.len(),
        total.skipped,
        total.duplicates
    );
    Ok((store, total))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const TWEET: &str = r#"{"id": 1, "text": "hello", "timestamp_ms": "1614600000000", "user": {"id": 7}}"#;

    #[test]
    fn test_loads_all_files() {
        let dir = TempDir::new().unwrap();
        let first = dir.path().join("a.jsonl");
        let second = dir.path().join("b.jsonl");
        fs::write(&first, format!("{TWEET}\n\n")).unwrap();
        fs::write(&second, format!("{TWEET}\n{{\"delete\": {{}}}}\n")).unwrap();

        let (store, stats) =
            load_datasets(&[first, second], &ProgressReporter::new(true)).unwrap();
        assert_eq!(store.len(), 1);
        assert_eq!(stats.loaded, 1);
        assert_eq!(stats.duplicates, 1);
        assert_eq!(stats.skipped, 2);
    }

    #[test]
    fn test_malformed_line_names_the_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("broken.jsonl");
        fs::write(&path, "{not json\n").unwrap();

        let err = load_datasets(&[path], &ProgressReporter::new(true)).unwrap_err();
        let chain = format!("{err:#}");
        assert!(chain.contains("broken.jsonl"));
        assert!(chain.contains(":1:"));
    }
}
