use std::io::{self, Write};
use std::path::{Path, PathBuf};

use log::debug;

use super::errors::{CacheError, CacheResult};

/// Per-merchant, per-filename store of raw log bodies
///
/// `write` creates the entry atomically: the body is written to a temporary
/// file inside the merchant directory and then linked into place without
/// clobbering. Concurrent writers for the same key therefore see exactly one
/// success and `CacheError::AlreadyExists` for everyone else, and readers
/// never observe a partially written body. This holds across sessions and
/// processes sharing the same cache root.
#[derive(Debug, Clone)]
pub struct LogCache {
    root: PathBuf,
}

impl LogCache {
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory holding one merchant's entries
    pub fn merchant_dir(&self, merchant_id: &str) -> CacheResult<PathBuf> {
        validate_component(merchant_id)?;
        Ok(self.root.join(merchant_id))
    }

    /// Path of a single entry; the file may or may not exist
    pub fn entry_path(&self, merchant_id: &str, filename: &str) -> CacheResult<PathBuf> {
        validate_component(filename)?;
        Ok(self.merchant_dir(merchant_id)?.join(filename))
    }

    /// Create the merchant's namespace if it does not exist yet
    pub async fn ensure_namespace(&self, merchant_id: &str) -> CacheResult<PathBuf> {
        let dir = self.merchant_dir(merchant_id)?;
        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(|source| CacheError::Io {
                path: dir.clone(),
                source,
            })?;
        Ok(dir)
    }

    /// Read a cached body; `None` when the entry does not exist
    pub async fn read(&self, merchant_id: &str, filename: &str) -> CacheResult<Option<String>> {
        let path = self.entry_path(merchant_id, filename)?;
        match tokio::fs::read_to_string(&path).await {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(CacheError::Io { path, source }),
        }
    }

    /// Persist a body for a key that must not exist yet
    ///
    /// # Errors
    ///
    /// `CacheError::AlreadyExists` if the entry is already present (the
    /// existing body is left untouched), `CacheError::Io` on any other
    /// filesystem failure.
    pub async fn write(
        &self,
        merchant_id: &str,
        filename: &str,
        content: String,
    ) -> CacheResult<PathBuf> {
        let path = self.entry_path(merchant_id, filename)?;
        let dir = self.ensure_namespace(merchant_id).await?;

        let target = path.clone();
        let outcome = tokio::task::spawn_blocking(move || write_new_entry(&dir, &target, &content))
            .await
            .map_err(|e| CacheError::Io {
                path: path.clone(),
                source: io::Error::other(format!("cache write task failed: {e}")),
            })?;

        match outcome {
            Ok(()) => {
                debug!(target: "logsearch::cache", "Cached {}", path.display());
                Ok(path)
            }
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => Err(CacheError::AlreadyExists {
                merchant_id: merchant_id.to_string(),
                filename: filename.to_string(),
            }),
            Err(source) => Err(CacheError::Io { path, source }),
        }
    }
}

fn write_new_entry(dir: &Path, target: &Path, content: &str) -> io::Result<()> {
    let mut staged = tempfile::Builder::new()
        .prefix(".partial-")
        .tempfile_in(dir)?;
    staged.write_all(content.as_bytes())?;
    staged.flush()?;
    staged.persist_noclobber(target).map_err(|e| e.error)?;
    Ok(())
}

fn validate_component(component: &str) -> CacheResult<()> {
    let invalid = component.is_empty()
        || component == "."
        || component == ".."
        || component.contains(['/', '\\']);
    if invalid {
        return Err(CacheError::InvalidKey(component.to_string()));
    }
    Ok(())
}
