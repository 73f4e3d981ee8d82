//! Ingestion result persistence
//!
//! The ingestion result is stored as one pretty-printed JSON array. Writes go
//! to a sibling temporary file first and are renamed into place, so a crash
//! never leaves a truncated snapshot behind.

use crate::domain::context::ResultExt;
use crate::domain::{FilesystemError, HarvestError, Record, Result};
use crate::log_error_with_context;
use std::path::{Path, PathBuf};

/// Persist `records` to `path` as a JSON array
///
/// Parent directories are created. An empty slice writes `[]`.
pub async fn write_snapshot(path: &Path, records: &[Record]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| FilesystemError::CreateDir {
                path: parent.to_path_buf(),
                message: e.to_string(),
            })?;
    }

    let json = serde_json::to_string_pretty(records)
        .with_context(|| format!("Failed to serialize {} records", records.len()))?;
    let tmp = temp_path(path);

    tokio::fs::write(&tmp, json)
        .await
        .map_err(|e| FilesystemError::WriteFile {
            path: tmp.clone(),
            message: e.to_string(),
        })?;

    if let Err(e) = tokio::fs::rename(&tmp, path).await {
        let _ = tokio::fs::remove_file(&tmp).await;
        return Err(FilesystemError::WriteFile {
            path: path.to_path_buf(),
            message: e.to_string(),
        }
        .into());
    }

    tracing::info!(path = %path.display(), records = records.len(), "Snapshot written");
    Ok(())
}

/// Load a snapshot written by [`write_snapshot`] (or any JSON array of objects)
pub async fn read_snapshot(path: &Path) -> Result<Vec<Record>> {
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| FilesystemError::ReadFile {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

    let records: Vec<Record> = serde_json::from_str(&content).map_err(|e| {
        let error = HarvestError::Parse(format!("{}: {e}", path.display()));
        log_error_with_context!(&error, "Failed to parse snapshot");
        error
    })?;

    tracing::info!(path = %path.display(), records = records.len(), "Snapshot loaded");
    Ok(records)
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| "snapshot".into());
    name.push(".tmp");
    path.with_file_name(name)
}
