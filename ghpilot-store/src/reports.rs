//! Timestamped report artifacts.
//!
//! Every report run writes one pretty-printed JSON file named
//! `<prefix>-<organization>-<timestamp>.json`, where the timestamp is
//! RFC 3339 UTC with millisecond precision and `:`/`.` replaced by `-`.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::error::StoreError;
use crate::persistence::{ensure_dir, save_json};

/// Default output directory, relative to the working directory.
pub const DEFAULT_REPORT_DIR: &str = "reports";

/// Prefix of metrics report files.
pub const METRICS_PREFIX: &str = "copilot-metrics";

/// Prefix of seat report files.
pub const SEATS_PREFIX: &str = "copilot-seats";

/// Prefix of policy overview files.
pub const POLICY_PREFIX: &str = "policy-overview";

/// Builds the file name for a report written at `at`.
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use ghpilot_store::report_file_name;
///
/// let at = Utc.with_ymd_and_hms(2024, 6, 1, 12, 30, 45).unwrap();
/// assert_eq!(
///     report_file_name("copilot-metrics", "Acme", at),
///     "copilot-metrics-Acme-2024-06-01T12-30-45-000Z.json"
/// );
/// ```
pub fn report_file_name(prefix: &str, organization: &str, at: DateTime<Utc>) -> String {
    let timestamp = at
        .to_rfc3339_opts(SecondsFormat::Millis, true)
        .replace([':', '.'], "-");
    format!("{prefix}-{organization}-{timestamp}.json")
}

/// Writes report artifacts into one directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportWriter {
    dir: PathBuf,
}

impl ReportWriter {
    /// Creates a writer for `dir`. Nothing is created until the first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Output directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Persists `report` and returns the written path.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Io` if the directory or file cannot be written.
    pub async fn persist<T: Serialize>(
        &self,
        prefix: &str,
        organization: &str,
        report: &T,
        at: DateTime<Utc>,
    ) -> Result<PathBuf, StoreError> {
        ensure_dir(&self.dir).await?;
        let path = self.dir.join(report_file_name(prefix, organization, at));
        save_json(&path, report).await?;
        info!(path = %path.display(), "Report saved");
        Ok(path)
    }
}

impl Default for ReportWriter {
    fn default() -> Self {
        Self::new(DEFAULT_REPORT_DIR)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use tempfile::TempDir;

    #[test]
    fn test_file_name_has_no_colons_or_dots_in_timestamp() {
        let at = Utc.with_ymd_and_hms(2024, 6, 1, 12, 30, 45).unwrap()
            + chrono::Duration::milliseconds(123);
        let name = report_file_name(METRICS_PREFIX, "Acme", at);

        assert_eq!(name, "copilot-metrics-Acme-2024-06-01T12-30-45-123Z.json");
        let stem = name.strip_suffix(".json").unwrap();
        assert!(!stem.contains(':'));
        assert!(!stem.contains('.'));
    }

    #[tokio::test]
    async fn test_persist_creates_directory_and_writes_pretty_json() {
        let temp_dir = TempDir::new().unwrap();
        let writer = ReportWriter::new(temp_dir.path().join("reports"));
        let at = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();

        let first = writer
            .persist(POLICY_PREFIX, "acme", &serde_json::json!({"a": 1}), at)
            .await
            .unwrap();
        let second = writer
            .persist(SEATS_PREFIX, "acme", &serde_json::json!({"b": 2}), at)
            .await
            .unwrap();

        assert!(first.starts_with(writer.dir()));
        assert!(second.exists());
        let content = std::fs::read_to_string(&first).unwrap();
        assert!(content.contains("\n  \"a\": 1"));
    }

    #[test]
    fn test_default_dir() {
        assert_eq!(ReportWriter::default().dir(), Path::new("reports"));
    }
}
