//! Process-startup wiring: resolve the configured storage backend once,
//! prepare the photo directory, and run the retention sweep when enabled.
//! Callers receive an owned service instance; there is no ambient global
//! connection state.

use std::sync::Arc;

use configs::{AppConfig, BackendKind};
use tracing::info;

use crate::entries::repo::rest::RestEntryRepository;
use crate::entries::repo::seaorm::SeaOrmEntryRepository;
use crate::entries::repository::EntryRepository;
use crate::entries::EntryService;
use crate::errors::ServiceError;
use crate::photos::PhotoStore;

/// Build the repository the configuration selects. Relational and embedded
/// stores are migrated so a fresh database is usable immediately.
pub async fn build_repository(cfg: &AppConfig) -> Result<Arc<dyn EntryRepository>, ServiceError> {
    match cfg.backend() {
        BackendKind::Rest => {
            info!("using HTTP table-store backend");
            Ok(Arc::new(RestEntryRepository::new(&cfg.rest.url, &cfg.rest.key)?))
        }
        BackendKind::Relational => {
            info!("using networked relational backend");
            connect_relational(cfg).await
        }
        BackendKind::Embedded => {
            info!(path = %cfg.database.embedded_path, "using embedded file backend");
            // SQLite creates the file, not the directories above it
            if let Some(parent) = std::path::Path::new(&cfg.database.embedded_path).parent() {
                if !parent.as_os_str().is_empty() {
                    common::env::ensure_env(&parent.to_string_lossy())
                        .await
                        .map_err(|e| ServiceError::Backend(e.to_string()))?;
                }
            }
            connect_relational(cfg).await
        }
    }
}

async fn connect_relational(cfg: &AppConfig) -> Result<Arc<dyn EntryRepository>, ServiceError> {
    let db = models::db::connect_and_migrate(&cfg.database_url())
        .await
        .map_err(|e| ServiceError::Backend(e.to_string()))?;
    Ok(Arc::new(SeaOrmEntryRepository { db }))
}

/// Build the full service: repository, photo store, retention sweep.
pub async fn build_service(cfg: &AppConfig) -> Result<EntryService<dyn EntryRepository>, ServiceError> {
    let repo = build_repository(cfg).await?;
    let photos = PhotoStore::prepare(&cfg.photos.dir).await;
    let service = EntryService::new(repo, photos);
    service.apply_retention(&cfg.retention).await?;
    Ok(service)
}
