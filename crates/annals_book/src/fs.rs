//! Filesystem helpers shared by the chapter writer and the index updater.

use annals_error::{AnnalsResult, StorageError, StorageErrorKind};
use std::path::Path;

/// Creates `dir` and its parents.
pub(crate) async fn ensure_dir(dir: &Path) -> AnnalsResult<()> {
    tokio::fs::create_dir_all(dir).await.map_err(|e| {
        StorageError::new(StorageErrorKind::DirectoryCreation(format!(
            "{}: {}",
            dir.display(),
            e
        )))
    })?;
    Ok(())
}

/// Writes `data` to `path`, replacing any existing file.
///
/// Data goes to a sibling temp file first and is renamed into place, so a
/// reader never sees a half-written file.
pub(crate) async fn write_atomic(path: &Path, data: &[u8]) -> AnnalsResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        ensure_dir(parent).await?;
    }

    let mut temp_name = path.file_name().unwrap_or_default().to_os_string();
    temp_name.push(".tmp");
    let temp_path = path.with_file_name(temp_name);

    tokio::fs::write(&temp_path, data).await.map_err(|e| {
        StorageError::new(StorageErrorKind::FileWrite(format!(
            "{}: {}",
            temp_path.display(),
            e
        )))
    })?;

    tokio::fs::rename(&temp_path, path).await.map_err(|e| {
        StorageError::new(StorageErrorKind::FileWrite(format!(
            "rename {} to {}: {}",
            temp_path.display(),
            path.display(),
            e
        )))
    })?;
    Ok(())
}
