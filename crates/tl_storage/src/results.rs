use std::path::{Path, PathBuf};
use tl_core::{Result, Timeline};

/// File name for a query's timeline: spaces become underscores. The
/// unfiltered (empty) query is stored as `timeline.json`.
pub fn timeline_file_name(query: &str) -> String {
    match query.trim() {
        "" => "timeline.json".to_string(),
        query => format!("{}.json", query.replace(' ', "_")),
    }
}

/// Writes `timeline` as pretty JSON into `dir`, creating it if needed.
pub async fn write_timeline(
    dir: impl AsRef<Path>,
    query: &str,
    timeline: &Timeline,
) -> Result<PathBuf> {
    let dir = dir.as_ref();
    tokio::fs::create_dir_all(dir).await?;
    let path = dir.join(timeline_file_name(query));
    let json = serde_json::to_string_pretty(timeline)?;
    tokio::fs::write(&path, json).await?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeline_file_name() {
        assert_eq!(timeline_file_name("china lockdown"), "china_lockdown.json");
        assert_eq!(timeline_file_name(" storm "), "storm.json");
        assert_eq!(timeline_file_name("  "), "timeline.json");
    }

    #[tokio::test]
    async fn test_write_timeline() {
        let dir = tempfile::tempdir().unwrap();
        let results = dir.path().join("results");
        let path = write_timeline(&results, "china lockdown", &Timeline::default())
            .await
            .unwrap();

        assert_eq!(path, results.join("china_lockdown.json"));
        let written: Timeline =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert!(written.is_empty());
    }
}
