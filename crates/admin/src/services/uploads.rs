//! Product image uploads on local disk.
//!
//! Files are stored flat in the uploads directory as
//! `{unix_millis}-{original_name}` (whitespace runs replaced by `_`) and
//! referenced from product records as `/uploads/{file}`.

use std::path::{Path, PathBuf};

use chrono::Utc;
use thiserror::Error;
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};

/// URL prefix under which the uploads directory is served.
pub const UPLOADS_URL_PREFIX: &str = "/uploads";

/// Errors that can occur while storing or removing uploads.
#[derive(Debug, Error)]
pub enum UploadError {
    #[error("io error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// The uploads directory.
#[derive(Debug, Clone)]
pub struct UploadStore {
    dir: PathBuf,
}

impl UploadStore {
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn io_error(path: &Path, source: std::io::Error) -> UploadError {
        UploadError::Io {
            path: path.display().to_string(),
            source,
        }
    }

    /// Create the uploads directory if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    pub async fn ensure_dir(&self) -> Result<(), UploadError> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| Self::io_error(&self.dir, e))
    }

    /// Store `bytes` under a timestamped name and return its public path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub async fn save(&self, original_name: &str, bytes: &[u8]) -> Result<String, UploadError> {
        self.ensure_dir().await?;
        let name = sanitize_file_name(original_name);
        let mut millis = Utc::now().timestamp_millis();

        loop {
            let file_name = format!("{millis}-{name}");
            let path = self.dir.join(&file_name);
            match tokio::fs::OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&path)
                .await
            {
                Ok(mut file) => {
                    file.write_all(bytes)
                        .await
                        .map_err(|e| Self::io_error(&path, e))?;
                    file.flush().await.map_err(|e| Self::io_error(&path, e))?;
                    debug!(file = %file_name, bytes = bytes.len(), "Upload stored");
                    return Ok(format!("{UPLOADS_URL_PREFIX}/{file_name}"));
                }
                // Same name uploaded twice within one millisecond.
                Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => millis += 1,
                Err(e) => return Err(Self::io_error(&path, e)),
            }
        }
    }

    /// Delete the file behind a public image path.
    ///
    /// Only the last path segment is used, so absolute URLs such as
    /// `http://host/uploads/x.jpg` work too. Returns `false` when the file
    /// did not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be removed.
    pub async fn remove(&self, public_path: &str) -> Result<bool, UploadError> {
        let Some(file_name) = public_path
            .rsplit('/')
            .next()
            .filter(|f| !f.is_empty() && *f != "." && *f != "..")
        else {
            return Ok(false);
        };
        let path = self.dir.join(file_name);
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(Self::io_error(&path, e)),
        }
    }

    /// Remove every image in `paths`, logging failures instead of returning them.
    pub async fn remove_all<'a>(&self, paths: impl IntoIterator<Item = &'a str>) {
        for path in paths {
            if let Err(e) = self.remove(path).await {
                warn!(error = %e, image = %path, "Failed to delete image");
            }
        }
    }
}

/// Keep only the final path component and replace whitespace runs with `_`.
fn sanitize_file_name(original: &str) -> String {
    let base = original
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default();

    let mut out = String::with_capacity(base.len());
    let mut in_space = false;
    for c in base.chars() {
        if c.is_whitespace() {
            if !in_space {
                out.push('_');
            }
            in_space = true;
        } else {
            out.push(c);
            in_space = false;
        }
    }

    if out.is_empty() || out == "." || out == ".." {
        "upload".to_string()
    } else {
        out
    }
}
