//! File persistence helpers.

use serde::Serialize;
use std::path::Path;
use tracing::debug;

use crate::error::StoreError;

/// Saves data as pretty JSON.
///
/// Creates parent directories if they don't exist and writes atomically
/// (temp file, then rename).
///
/// # Errors
///
/// Returns `StoreError::Io` if a directory or the file cannot be written.
pub async fn save_json<T: Serialize>(path: &Path, data: &T) -> Result<(), StoreError> {
    debug!(path = %path.display(), "Saving JSON file");

    if let Some(parent) = path.parent() {
        ensure_dir(parent).await?;
    }

    let json = serde_json::to_string_pretty(data)?;

    let temp_path = path.with_extension("json.tmp");
    tokio::fs::write(&temp_path, &json).await?;
    tokio::fs::rename(&temp_path, path).await?;

    debug!(path = %path.display(), bytes = json.len(), "JSON file saved");
    Ok(())
}

/// Ensures a directory exists. Succeeds if it already does.
///
/// # Errors
///
/// Returns `StoreError::Io` if the directory cannot be created.
pub async fn ensure_dir(path: &Path) -> Result<(), StoreError> {
    if path.as_os_str().is_empty() || tokio::fs::try_exists(path).await? {
        return Ok(());
    }
    debug!(path = %path.display(), "Creating directory");
    tokio::fs::create_dir_all(path).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_save_creates_parent_directories() {
        let temp_dir = TempDir::new().unwrap();
        let nested = temp_dir.path().join("deeply").join("nested").join("out.json");

        save_json(&nested, &serde_json::json!({"key": "value"})).await.unwrap();

        assert!(nested.exists());
        assert!(!nested.with_extension("json.tmp").exists());
        let content = tokio::fs::read_to_string(&nested).await.unwrap();
        let loaded: serde_json::Value = serde_json::from_str(&content).unwrap();
        assert_eq!(loaded["key"], "value");
    }

    #[tokio::test]
    async fn test_ensure_dir_idempotent() {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path().join("reports");

        ensure_dir(&dir).await.unwrap();
        ensure_dir(&dir).await.unwrap();

        assert!(dir.is_dir());
    }

    #[tokio::test]
    async fn test_write_into_file_path_fails_with_io() {
        let temp_dir = TempDir::new().unwrap();
        let blocker = temp_dir.path().join("blocker");
        tokio::fs::write(&blocker, "x").await.unwrap();

        let err = save_json(&blocker.join("out.json"), &1).await.unwrap_err();
        assert!(matches!(err, StoreError::Io(_)));
    }
}
