//! Environment/runtime helpers
//!
//! Sanity checks to ensure expected directories exist at startup.

use tracing::warn;

/// Ensure the data directory exists; fail when it cannot be created.
pub async fn ensure_env(data_dir: &str) -> anyhow::Result<()> {
    tokio::fs::create_dir_all(data_dir)
        .await
        .map_err(|e| anyhow::anyhow!("cannot create {data_dir}: {e}"))?;
    Ok(())
}

/// Ensure an optional directory exists; warn and report instead of failing.
pub async fn ensure_dir_soft(dir: &str) -> bool {
    match tokio::fs::create_dir_all(dir).await {
        Ok(()) => true,
        Err(e) => {
            warn!(%dir, error = %e, "directory not available");
            false
        }
    }
}
