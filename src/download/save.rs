//! Host "save as local file" mechanism.

use crate::core::error::AppError;
use crate::core::validation::sanitize_filename;
use async_trait::async_trait;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Where finished downloads are handed over.
#[async_trait]
pub trait FileSaver: Send + Sync {
    /// Persist `bytes` under `filename`, returning where it ended up.
    async fn save(&self, filename: &str, bytes: &[u8]) -> Result<PathBuf, AppError>;
}

/// Writes files into a directory, never outside it.
#[derive(Debug, Clone)]
pub struct DiskSaver {
    dir: PathBuf,
}

impl DiskSaver {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Sanitized target path; an empty result becomes `download`.
    fn target_path(&self, filename: &str) -> PathBuf {
        let mut name = sanitize_filename(filename);
        let trimmed = name.trim_matches(|c: char| c.is_whitespace() || c == '.');
        if trimmed.is_empty() {
            name = "download".to_string();
        } else if trimmed.len() != name.len() {
            name = trimmed.to_string();
        }
        self.dir.join(name)
    }
}

#[async_trait]
impl FileSaver for DiskSaver {
    async fn save(&self, filename: &str, bytes: &[u8]) -> Result<PathBuf, AppError> {
        tokio::fs::create_dir_all(&self.dir).await?;
        let path = self.target_path(filename);
        let dir = self.dir.clone();
        let bytes = bytes.to_vec();
        let len = bytes.len();

        let path = tokio::task::spawn_blocking(move || write_atomically(&dir, path, &bytes)).await??;

        log::info!("💾 File saved: {} ({} bytes)", path.display(), len);
        Ok(path)
    }
}

/// Write into a uniquely named temp file in `dir`, then rename it onto `path`.
///
/// The temp file is removed on every error path when it is dropped, so neither a
/// truncated target nor a stray temp file is left behind.
fn write_atomically(dir: &Path, path: PathBuf, bytes: &[u8]) -> Result<PathBuf, AppError> {
    let mut tmp = tempfile::Builder::new()
        .prefix(".tubefetch-")
        .suffix(".part")
        .tempfile_in(dir)?;
    tmp.write_all(bytes)?;
    tmp.as_file().sync_all()?;
    tmp.persist(&path).map_err(|e| AppError::Io(e.error))?;
    Ok(path)
}
