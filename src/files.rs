//! Public directory backing the upload and download endpoints.

use crate::error::ApiError;
use axum::body::Body;
use futures_util::TryStreamExt;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tracing::warn;

static STAGING_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Longest accepted filename.
pub const MAX_FILENAME_LEN: usize = 255;

/// Returns true if `name` is a plain filename made of `[A-Za-z0-9._-]` that
/// does not start with a dot.
#[must_use]
pub fn is_safe_filename(name: &str) -> bool {
    !name.is_empty()
        && name.len() <= MAX_FILENAME_LEN
        && !name.starts_with('.')
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
}

/// Directory uploads are written to and downloads are served from.
#[derive(Debug, Clone)]
pub struct PublicDir {
    root: PathBuf,
}

impl PublicDir {
    /// Wraps a directory path. The directory is created by [`PublicDir::ensure`].
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Directory path.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Creates the directory if missing.
    ///
    /// # Errors
    /// Returns an error if the directory cannot be created.
    pub async fn ensure(&self) -> std::io::Result<()> {
        tokio::fs::create_dir_all(&self.root).await
    }

    /// Maps a client-supplied filename to a path inside the directory.
    ///
    /// # Errors
    /// Returns [`ApiError::InvalidFilename`] for names outside the safe set.
    pub fn resolve(&self, filename: &str) -> Result<PathBuf, ApiError> {
        if !is_safe_filename(filename) {
            return Err(ApiError::InvalidFilename(filename.to_string()));
        }
        Ok(self.root.join(filename))
    }

    /// Streams a request body into `filename`, replacing any existing file.
    ///
    /// The body is staged in a fresh dot-prefixed file and renamed over the
    /// target only once fully written. A failed upload leaves the previous
    /// file untouched, and a symlink at the target is replaced rather than
    /// followed.
    ///
    /// Returns the number of bytes written.
    ///
    /// # Errors
    /// Returns an error for unsafe names, body read failures or IO failures.
    pub async fn write(&self, filename: &str, body: Body) -> Result<u64, ApiError> {
        let path = self.resolve(filename)?;
        self.ensure().await?;

        let staging = self.staging_path();
        let written = match stream_to_new_file(&staging, body).await {
            Ok(written) => written,
            Err(err) => {
                discard(&staging).await;
                return Err(err);
            }
        };
        if let Err(err) = tokio::fs::rename(&staging, &path).await {
            discard(&staging).await;
            return Err(err.into());
        }
        Ok(written)
    }

    /// Unique staging path inside the directory. Client names never start
    /// with a dot, so it cannot collide with an upload.
    fn staging_path(&self) -> PathBuf {
        let n = STAGING_COUNTER.fetch_add(1, Ordering::Relaxed);
        self.root
            .join(format!(".upload-{}-{}", std::process::id(), n))
    }

    /// Finds an existing regular file named `filename`.
    ///
    /// The file's canonical path must stay inside the directory, so symlinks
    /// pointing elsewhere are treated as missing.
    ///
    /// # Errors
    /// Returns [`ApiError::InvalidFilename`] for unsafe names and
    /// [`ApiError::FileNotFound`] when nothing servable exists.
    pub async fn locate(&self, filename: &str) -> Result<PathBuf, ApiError> {
        let path = self.resolve(filename)?;
        let not_found = || ApiError::FileNotFound(filename.to_string());

        let (canonical, root) = match (
            tokio::fs::canonicalize(&path).await,
            tokio::fs::canonicalize(&self.root).await,
        ) {
            (Ok(canonical), Ok(root)) => (canonical, root),
            _ => return Err(not_found()),
        };
        if !canonical.starts_with(&root) {
            return Err(not_found());
        }

        match tokio::fs::metadata(&canonical).await {
            Ok(meta) if meta.is_file() => Ok(canonical),
            _ => Err(not_found()),
        }
    }
}

/// Writes the body into a file that must not exist yet. `create_new`
/// refuses to open through an existing symlink.
async fn stream_to_new_file(path: &Path, body: Body) -> Result<u64, ApiError> {
    let mut file = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
        .await?;
    let mut stream = body.into_data_stream();
    let mut written = 0u64;
    while let Some(chunk) = stream
        .try_next()
        .await
        .map_err(|e| ApiError::InvalidRequest(format!("failed to read body: {}", e)))?
    {
        file.write_all(&chunk).await?;
        written += chunk.len() as u64;
    }
    file.flush().await?;
    Ok(written)
}

async fn discard(path: &Path) {
    if let Err(err) = tokio::fs::remove_file(path).await {
        warn!(path = %path.display(), error = %err, "Failed to remove staged upload");
    }
}
