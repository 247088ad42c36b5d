use async_trait::async_trait;
use chrono::NaiveDate;
use sea_orm::DatabaseConnection;

use crate::db::entry_service;
use crate::entries::domain::{EntryUpdate, NewEntry, SummaryStats};
use crate::entries::repository::EntryRepository;
use crate::errors::ServiceError;

/// SeaORM-backed repository implementation.
///
/// Covers both the embedded SQLite file (single-process use only) and a
/// networked Postgres server; the connection URL decides which. Concurrent
/// clients are safe only on the networked engine, which brings its own
/// transaction isolation.
pub struct SeaOrmEntryRepository {
    pub db: DatabaseConnection,
}

#[async_trait]
impl EntryRepository for SeaOrmEntryRepository {
    async fn create(&self, entry: NewEntry) -> Result<i64, ServiceError> {
        entry_service::insert_entry(&self.db, entry).await
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<models::entry::Model>, ServiceError> {
        entry_service::get_entry(&self.db, id).await
    }

    async fn list_recent(&self, limit: u64) -> Result<Vec<models::entry::Model>, ServiceError> {
        entry_service::list_recent(&self.db, limit).await
    }

    async fn list_by_date_range(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<models::entry::Model>, ServiceError> {
        entry_service::list_by_date_range(&self.db, start, end).await
    }

    async fn list_by_plate(&self, plate: &str) -> Result<Vec<models::entry::Model>, ServiceError> {
        entry_service::list_by_plate(&self.db, plate).await
    }

    async fn update(&self, id: i64, update: EntryUpdate) -> Result<bool, ServiceError> {
        entry_service::update_entry(&self.db, id, update).await
    }

    async fn set_photo_refs(&self, id: i64, refs: &[String]) -> Result<bool, ServiceError> {
        entry_service::set_photo_refs(&self.db, id, refs).await
    }

    async fn delete(&self, id: i64) -> Result<bool, ServiceError> {
        entry_service::delete_entry(&self.db, id).await
    }

    async fn summary_stats(&self) -> Result<SummaryStats, ServiceError> {
        entry_service::summary_stats(&self.db).await
    }

    async fn purge_older_than(&self, days: u32) -> Result<u64, ServiceError> {
        entry_service::purge_older_than(&self.db, days).await
    }
}
