//! File sink trait and implementations
//!
//! The export engine never touches `std::fs` directly. It goes through a
//! [`FileSink`], which keeps directory creation idempotent and lets dry runs
//! and tests observe writes without a real tree.

use crate::domain::FilesystemError;
use async_trait::async_trait;
use std::path::Path;

/// The "write file" capability used by the export engine
#[async_trait]
pub trait FileSink: Send + Sync {
    /// Create `path` and all missing ancestors
    ///
    /// Must succeed when the directory already exists, including when another
    /// task creates it concurrently.
    async fn create_dir_all(&self, path: &Path) -> Result<(), FilesystemError>;

    /// Create or truncate `path` and write `contents` (UTF-8)
    async fn write_file(&self, path: &Path, contents: &str) -> Result<(), FilesystemError>;
}

/// Writes to the local filesystem through `tokio::fs`
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFileSink;

#[async_trait]
impl FileSink for LocalFileSink {
    async fn create_dir_all(&self, path: &Path) -> Result<(), FilesystemError> {
        tokio::fs::create_dir_all(path)
            .await
            .map_err(|e| FilesystemError::CreateDir {
                path: path.to_path_buf(),
                message: e.to_string(),
            })
    }

    async fn write_file(&self, path: &Path, contents: &str) -> Result<(), FilesystemError> {
        tokio::fs::write(path, contents)
            .await
            .map_err(|e| FilesystemError::WriteFile {
                path: path.to_path_buf(),
                message: e.to_string(),
            })
    }
}

/// Logs intended operations and writes nothing
#[derive(Debug, Clone, Copy, Default)]
pub struct DryRunSink;

#[async_trait]
impl FileSink for DryRunSink {
    async fn create_dir_all(&self, path: &Path) -> Result<(), FilesystemError> {
        tracing::debug!(path = %path.display(), "[dry-run] would create directory");
        Ok(())
    }

    async fn write_file(&self, path: &Path, contents: &str) -> Result<(), FilesystemError> {
        tracing::debug!(
            path = %path.display(),
            bytes = contents.len(),
            "[dry-run] would write file"
        );
        Ok(())
    }
}
