use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{info, instrument};

use models::validation;

use super::domain::{EntryUpdate, NewEntry, SummaryStats};
use super::repository::EntryRepository;
use crate::errors::ServiceError;
use crate::photos::{PhotoStore, PhotoUpload};

pub const DEFAULT_RECENT_LIMIT: u64 = 50;
/// Most rows a single "recent" listing will return.
const MAX_RECENT_LIMIT: u64 = 1000;

/// Caller-facing record-keeping service: validates and normalizes input,
/// delegates persistence to the configured backend, and keeps photo files
/// in step with their records.
pub struct EntryService<R: EntryRepository + ?Sized> {
    repo: Arc<R>,
    photos: PhotoStore,
}

impl<R: EntryRepository + ?Sized> EntryService<R> {
    pub fn new(repo: Arc<R>, photos: PhotoStore) -> Self {
        Self { repo, photos }
    }

    pub fn photo_store(&self) -> &PhotoStore {
        &self.photos
    }

    /// Validate, normalize, persist. Every field problem is reported in one
    /// `Validation` error and nothing is written unless all checks pass.
    #[instrument(skip(self, input), fields(plate = %input.license_plate))]
    pub async fn create(&self, input: NewEntry) -> Result<i64, ServiceError> {
        let errors = validation::validate_entry(
            &input.license_plate,
            &input.service_type,
            &input.technician,
            input.location.as_deref(),
            input.hours,
        );
        if !errors.is_empty() {
            return Err(ServiceError::Validation(errors));
        }
        let id = self.repo.create(input.normalized()).await?;
        info!(id, "entry_created");
        Ok(id)
    }

    pub async fn get(&self, id: i64) -> Result<Option<models::entry::Model>, ServiceError> {
        self.repo.get_by_id(id).await
    }

    pub async fn list_recent(&self, limit: u64) -> Result<Vec<models::entry::Model>, ServiceError> {
        self.repo.list_recent(limit.clamp(1, MAX_RECENT_LIMIT)).await
    }

    pub async fn list_by_date_range(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<models::entry::Model>, ServiceError> {
        self.repo.list_by_date_range(start, end).await
    }

    pub async fn list_by_plate(&self, plate: &str) -> Result<Vec<models::entry::Model>, ServiceError> {
        self.repo.list_by_plate(plate).await
    }

    /// Replace all mutable fields of an existing record. Returns false when
    /// the id does not exist; validation failures report before any write.
    #[instrument(skip(self, update))]
    pub async fn update(&self, id: i64, update: EntryUpdate) -> Result<bool, ServiceError> {
        let errors = validation::validate_entry(
            &update.license_plate,
            &update.service_type,
            &update.technician,
            update.location.as_deref(),
            update.hours,
        );
        if !errors.is_empty() {
            return Err(ServiceError::Validation(errors));
        }
        self.repo.update(id, update.normalized()).await
    }

    /// Remove the record, then its photo files best-effort. Photo failures
    /// are logged and swallowed; the record deletion still counts.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: i64) -> Result<bool, ServiceError> {
        let Some(existing) = self.repo.get_by_id(id).await? else {
            return Ok(false);
        };
        let deleted = self.repo.delete(id).await?;
        if deleted {
            self.photos.remove_all(&existing.photo_refs()).await;
            info!(id, "entry_deleted");
        }
        Ok(deleted)
    }

    /// Save uploads under the record and return their stored file names.
    pub async fn attach_photos(
        &self,
        id: i64,
        uploads: &[PhotoUpload],
    ) -> Result<Vec<String>, ServiceError> {
        let Some(existing) = self.repo.get_by_id(id).await? else {
            return Err(ServiceError::not_found("entry"));
        };
        let mut refs = existing.photo_refs();
        let mut saved = Vec::with_capacity(uploads.len());
        for upload in uploads {
            let name = self.photos.save(id, refs.len(), upload).await?;
            refs.push(name.clone());
            saved.push(name);
        }
        self.repo.set_photo_refs(id, &refs).await?;
        Ok(saved)
    }

    pub async fn summary_stats(&self) -> Result<SummaryStats, ServiceError> {
        self.repo.summary_stats().await
    }

    /// Run the configured retention sweep; `Ok(None)` when the policy is off.
    pub async fn apply_retention(
        &self,
        policy: &configs::RetentionConfig,
    ) -> Result<Option<u64>, ServiceError> {
        let Some(days) = policy.purge_after_days else {
            return Ok(None);
        };
        let removed = self.repo.purge_older_than(days).await?;
        if removed > 0 {
            info!(removed, days, "retention_purge");
        }
        Ok(Some(removed))
    }
}
