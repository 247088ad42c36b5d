use std::path::{Path, PathBuf};

use chrono::Utc;
use tracing::warn;

use crate::errors::ServiceError;

/// Uploaded image payload: file extension plus raw bytes.
#[derive(Clone, Debug)]
pub struct PhotoUpload {
    pub ext: String,
    pub bytes: Vec<u8>,
}

/// Flat-file photo storage under a dedicated directory.
///
/// Writes are whole-file; a crash mid-write can leave a truncated file.
/// Removal is best-effort and never fails the caller.
#[derive(Clone)]
pub struct PhotoStore {
    dir: PathBuf,
}

impl PhotoStore {
    pub fn new<P: Into<PathBuf>>(dir: P) -> Self {
        Self { dir: dir.into() }
    }

    /// Open the configured directory, falling back to a temp-dir location
    /// when it cannot be created (read-only hosted deployments).
    pub async fn prepare(dir: &str) -> Self {
        if common::env::ensure_dir_soft(dir).await {
            Self::new(dir)
        } else {
            let fallback = std::env::temp_dir().join("detail_log_photos");
            let _ = tokio::fs::create_dir_all(&fallback).await;
            Self::new(fallback)
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// `entry_{id}_{timestamp}_{index}.{ext}`
    fn file_name(entry_id: i64, index: usize, ext: &str) -> String {
        let stamp = Utc::now().format("%Y%m%d%H%M%S");
        let ext = ext.trim_start_matches('.');
        format!("entry_{entry_id}_{stamp}_{index}.{ext}")
    }

    /// Refuse anything that is not a bare file name.
    fn guarded_path(&self, name: &str) -> Option<PathBuf> {
        if name.is_empty() || name.contains('/') || name.contains('\\') || name.contains("..") {
            return None;
        }
        Some(self.dir.join(name))
    }

    /// Persist one upload and return the stored file name.
    pub async fn save(
        &self,
        entry_id: i64,
        index: usize,
        upload: &PhotoUpload,
    ) -> Result<String, ServiceError> {
        let name = Self::file_name(entry_id, index, &upload.ext);
        let path = self
            .guarded_path(&name)
            .ok_or_else(|| ServiceError::Backend(format!("invalid photo name: {name}")))?;
        tokio::fs::write(&path, &upload.bytes)
            .await
            .map_err(|e| ServiceError::Backend(e.to_string()))?;
        Ok(name)
    }

    /// Remove the named files; failures are logged and swallowed so record
    /// deletion can still succeed.
    pub async fn remove_all(&self, names: &[String]) {
        for name in names {
            let Some(path) = self.guarded_path(name) else {
                warn!(%name, "skipping photo with unsafe name");
                continue;
            };
            if let Err(e) = tokio::fs::remove_file(&path).await {
                if e.kind() != std::io::ErrorKind::NotFound {
                    warn!(%name, error = %e, "failed to delete photo");
                }
            }
        }
    }
}
