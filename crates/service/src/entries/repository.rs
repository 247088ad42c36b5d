use async_trait::async_trait;
use chrono::NaiveDate;

use super::domain::{EntryUpdate, NewEntry, SummaryStats};
use crate::errors::ServiceError;

/// Repository abstraction over whichever storage backend is configured.
///
/// Implementations receive already-normalized field values. Every listing
/// is ordered by `entry_date` descending, then `created_at` descending.
/// Missing ids are reported as `Ok(false)` / `Ok(None)`, not errors.
#[async_trait]
pub trait EntryRepository: Send + Sync {
    /// Insert a record and return its new id. Never partially writes.
    async fn create(&self, entry: NewEntry) -> Result<i64, ServiceError>;
    async fn get_by_id(&self, id: i64) -> Result<Option<models::entry::Model>, ServiceError>;
    async fn list_recent(&self, limit: u64) -> Result<Vec<models::entry::Model>, ServiceError>;
    /// Records with `start <= entry_date <= end`, bounds inclusive.
    async fn list_by_date_range(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<models::entry::Model>, ServiceError>;
    /// Exact match on the normalized plate.
    async fn list_by_plate(&self, plate: &str) -> Result<Vec<models::entry::Model>, ServiceError>;
    /// Replace all mutable fields; `false` when the id does not exist.
    async fn update(&self, id: i64, update: EntryUpdate) -> Result<bool, ServiceError>;
    /// Rewrite the photo-ref list; `false` when the id does not exist.
    async fn set_photo_refs(&self, id: i64, refs: &[String]) -> Result<bool, ServiceError>;
    /// Remove the row; `false` when the id does not exist.
    async fn delete(&self, id: i64) -> Result<bool, ServiceError>;
    async fn summary_stats(&self) -> Result<SummaryStats, ServiceError>;
    /// Retention sweep: drop rows whose `created_at` is older than `days`.
    /// Returns how many rows were removed.
    async fn purge_older_than(&self, days: u32) -> Result<u64, ServiceError>;
}

/// Simple in-memory repository for tests and doc examples.
pub mod mock {
    use super::*;
    use chrono::{DateTime, Duration, Local, Utc};
    use models::entry;
    use std::collections::HashMap;
    use std::sync::Mutex;

    #[derive(Default)]
    pub struct MockEntryRepository {
        rows: Mutex<HashMap<i64, entry::Model>>,
        next_id: Mutex<i64>,
        last_created: Mutex<Option<DateTime<Utc>>>,
    }

    impl MockEntryRepository {
        /// `created_at` must record insertion order even when two inserts
        /// land on the same clock tick.
        fn next_created_at(&self) -> DateTime<Utc> {
            let mut last = self.last_created.lock().unwrap();
            let mut now = Utc::now();
            if let Some(prev) = *last {
                if now <= prev {
                    now = prev + Duration::microseconds(1);
                }
            }
            *last = Some(now);
            now
        }

        fn sorted(mut rows: Vec<entry::Model>) -> Vec<entry::Model> {
            rows.sort_by(|a, b| {
                b.entry_date
                    .cmp(&a.entry_date)
                    .then(b.created_at.cmp(&a.created_at))
            });
            rows
        }
    }

    #[async_trait]
    impl EntryRepository for MockEntryRepository {
        async fn create(&self, entry: NewEntry) -> Result<i64, ServiceError> {
            let mut next_id = self.next_id.lock().unwrap();
            *next_id += 1;
            let id = *next_id;
            let model = entry::Model {
                id,
                license_plate: entry.license_plate,
                service_type: entry.service_type,
                technician: entry.technician,
                location: entry.location,
                hours: entry.hours,
                entry_date: entry.entry_date,
                notes: entry.notes,
                photos: entry.photos,
                created_at: self.next_created_at(),
            };
            self.rows.lock().unwrap().insert(id, model);
            Ok(id)
        }

        async fn get_by_id(&self, id: i64) -> Result<Option<entry::Model>, ServiceError> {
            Ok(self.rows.lock().unwrap().get(&id).cloned())
        }

        async fn list_recent(&self, limit: u64) -> Result<Vec<entry::Model>, ServiceError> {
            let rows = self.rows.lock().unwrap().values().cloned().collect();
            let mut rows = Self::sorted(rows);
            rows.truncate(limit as usize);
            Ok(rows)
        }

        async fn list_by_date_range(
            &self,
            start: NaiveDate,
            end: NaiveDate,
        ) -> Result<Vec<entry::Model>, ServiceError> {
            let rows = self
                .rows
                .lock()
                .unwrap()
                .values()
                .filter(|r| r.entry_date >= start && r.entry_date <= end)
                .cloned()
                .collect();
            Ok(Self::sorted(rows))
        }

        async fn list_by_plate(&self, plate: &str) -> Result<Vec<entry::Model>, ServiceError> {
            let plate = models::validation::format_license_plate(plate);
            let rows = self
                .rows
                .lock()
                .unwrap()
                .values()
                .filter(|r| r.license_plate == plate)
                .cloned()
                .collect();
            Ok(Self::sorted(rows))
        }

        async fn update(&self, id: i64, update: EntryUpdate) -> Result<bool, ServiceError> {
            let mut rows = self.rows.lock().unwrap();
            match rows.get_mut(&id) {
                Some(row) => {
                    row.license_plate = update.license_plate;
                    row.service_type = update.service_type;
                    row.technician = update.technician;
                    row.location = update.location;
                    row.hours = update.hours;
                    row.entry_date = update.entry_date;
                    row.notes = update.notes;
                    Ok(true)
                }
                None => Ok(false),
            }
        }

        async fn set_photo_refs(&self, id: i64, refs: &[String]) -> Result<bool, ServiceError> {
            let mut rows = self.rows.lock().unwrap();
            match rows.get_mut(&id) {
                Some(row) => {
                    row.photos = entry::join_photo_refs(refs);
                    Ok(true)
                }
                None => Ok(false),
            }
        }

        async fn delete(&self, id: i64) -> Result<bool, ServiceError> {
            Ok(self.rows.lock().unwrap().remove(&id).is_some())
        }

        async fn summary_stats(&self) -> Result<SummaryStats, ServiceError> {
            let rows = self.rows.lock().unwrap();
            let today = Local::now().date_naive();
            let mut counts: HashMap<&str, u64> = HashMap::new();
            let mut stats = SummaryStats {
                total_entries: rows.len() as u64,
                total_hours: 0.0,
                today_entries: 0,
                today_hours: 0.0,
                most_common_service_type: None,
            };
            for row in rows.values() {
                stats.total_hours += row.hours;
                if row.entry_date == today {
                    stats.today_entries += 1;
                    stats.today_hours += row.hours;
                }
                *counts.entry(row.service_type.as_str()).or_default() += 1;
            }
            stats.most_common_service_type = counts
                .into_iter()
                .max_by_key(|(_, n)| *n)
                .map(|(t, _)| t.to_string());
            Ok(stats)
        }

        async fn purge_older_than(&self, days: u32) -> Result<u64, ServiceError> {
            let cutoff = Utc::now() - Duration::days(days as i64);
            let mut rows = self.rows.lock().unwrap();
            let before = rows.len();
            rows.retain(|_, r| r.created_at >= cutoff);
            Ok((before - rows.len()) as u64)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::mock::MockEntryRepository;
    use super::*;

    fn entry_on(date: &str, plate: &str) -> NewEntry {
        NewEntry {
            license_plate: plate.into(),
            service_type: "Basic Wash".into(),
            technician: "Jane Doe".into(),
            location: None,
            hours: 1.0,
            entry_date: date.parse().unwrap(),
            notes: None,
            photos: None,
        }
    }

    #[tokio::test]
    async fn recent_ordering_breaks_date_ties_by_insertion() -> Result<(), anyhow::Error> {
        let repo = MockEntryRepository::default();
        let first = repo.create(entry_on("2024-06-01", "AAA-111")).await?;
        let second = repo.create(entry_on("2024-06-01", "BBB-222")).await?;
        let newest_date = repo.create(entry_on("2024-06-02", "CCC-333")).await?;

        let rows = repo.list_recent(10).await?;
        let ids: Vec<i64> = rows.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![newest_date, second, first]);

        let capped = repo.list_recent(2).await?;
        assert_eq!(capped.len(), 2);
        Ok(())
    }

    #[tokio::test]
    async fn date_range_bounds_are_inclusive() -> Result<(), anyhow::Error> {
        let repo = MockEntryRepository::default();
        repo.create(entry_on("2024-06-01", "AAA-111")).await?;
        repo.create(entry_on("2024-06-05", "BBB-222")).await?;
        repo.create(entry_on("2024-06-10", "CCC-333")).await?;

        let rows = repo
            .list_by_date_range("2024-06-01".parse().unwrap(), "2024-06-05".parse().unwrap())
            .await?;
        assert_eq!(rows.len(), 2);
        Ok(())
    }
}
