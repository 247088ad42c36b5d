use chrono::{Duration, Local, NaiveDate, Utc};
use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ColumnTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set,
};

use models::{entry, validation};

use crate::entries::domain::{EntryUpdate, NewEntry, SummaryStats};
use crate::errors::ServiceError;

/// Insert a record. The database assigns `id`; `created_at` is stamped here
/// and never touched again.
pub async fn insert_entry(db: &DatabaseConnection, new: NewEntry) -> Result<i64, ServiceError> {
    let am = entry::ActiveModel {
        id: NotSet,
        license_plate: Set(new.license_plate),
        service_type: Set(new.service_type),
        technician: Set(new.technician),
        location: Set(new.location),
        hours: Set(new.hours),
        entry_date: Set(new.entry_date),
        notes: Set(new.notes),
        photos: Set(new.photos),
        created_at: Set(Utc::now()),
    };
    let inserted = am.insert(db).await.map_err(|e| ServiceError::Backend(e.to_string()))?;
    Ok(inserted.id)
}

/// Get entry by id.
pub async fn get_entry(db: &DatabaseConnection, id: i64) -> Result<Option<entry::Model>, ServiceError> {
    entry::Entity::find_by_id(id)
        .one(db)
        .await
        .map_err(|e| ServiceError::Backend(e.to_string()))
}

/// Most recent entries first: `entry_date` desc, then `created_at` desc.
pub async fn list_recent(db: &DatabaseConnection, limit: u64) -> Result<Vec<entry::Model>, ServiceError> {
    entry::Entity::find()
        .order_by_desc(entry::Column::EntryDate)
        .order_by_desc(entry::Column::CreatedAt)
        .limit(limit)
        .all(db)
        .await
        .map_err(|e| ServiceError::Backend(e.to_string()))
}

/// Entries with `start <= entry_date <= end`, bounds inclusive.
pub async fn list_by_date_range(
    db: &DatabaseConnection,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<Vec<entry::Model>, ServiceError> {
    entry::Entity::find()
        .filter(entry::Column::EntryDate.between(start, end))
        .order_by_desc(entry::Column::EntryDate)
        .order_by_desc(entry::Column::CreatedAt)
        .all(db)
        .await
        .map_err(|e| ServiceError::Backend(e.to_string()))
}

/// All entries for one plate, matched on the normalized form.
pub async fn list_by_plate(db: &DatabaseConnection, plate: &str) -> Result<Vec<entry::Model>, ServiceError> {
    let plate = validation::format_license_plate(plate);
    entry::Entity::find()
        .filter(entry::Column::LicensePlate.eq(plate))
        .order_by_desc(entry::Column::EntryDate)
        .order_by_desc(entry::Column::CreatedAt)
        .all(db)
        .await
        .map_err(|e| ServiceError::Backend(e.to_string()))
}

/// Replace all mutable fields. Returns false when the id does not exist.
pub async fn update_entry(db: &DatabaseConnection, id: i64, update: EntryUpdate) -> Result<bool, ServiceError> {
    let existing = entry::Entity::find_by_id(id)
        .one(db)
        .await
        .map_err(|e| ServiceError::Backend(e.to_string()))?;
    let Some(existing) = existing else { return Ok(false) };

    let mut am: entry::ActiveModel = existing.into();
    am.license_plate = Set(update.license_plate);
    am.service_type = Set(update.service_type);
    am.technician = Set(update.technician);
    am.location = Set(update.location);
    am.hours = Set(update.hours);
    am.entry_date = Set(update.entry_date);
    am.notes = Set(update.notes);
    am.update(db).await.map_err(|e| ServiceError::Backend(e.to_string()))?;
    Ok(true)
}

/// Rewrite the photo-ref list. Returns false when the id does not exist.
pub async fn set_photo_refs(db: &DatabaseConnection, id: i64, refs: &[String]) -> Result<bool, ServiceError> {
    let existing = entry::Entity::find_by_id(id)
        .one(db)
        .await
        .map_err(|e| ServiceError::Backend(e.to_string()))?;
    let Some(existing) = existing else { return Ok(false) };

    let mut am: entry::ActiveModel = existing.into();
    am.photos = Set(entry::join_photo_refs(refs));
    am.update(db).await.map_err(|e| ServiceError::Backend(e.to_string()))?;
    Ok(true)
}

/// Hard delete. Returns false when the id does not exist.
pub async fn delete_entry(db: &DatabaseConnection, id: i64) -> Result<bool, ServiceError> {
    let res = entry::Entity::delete_by_id(id)
        .exec(db)
        .await
        .map_err(|e| ServiceError::Backend(e.to_string()))?;
    Ok(res.rows_affected > 0)
}

/// Whole-table aggregates; "today" is the host's local calendar date.
pub async fn summary_stats(db: &DatabaseConnection) -> Result<SummaryStats, ServiceError> {
    let total_entries = entry::Entity::find()
        .count(db)
        .await
        .map_err(|e| ServiceError::Backend(e.to_string()))?;

    let total_hours: Option<Option<f64>> = entry::Entity::find()
        .select_only()
        .column_as(entry::Column::Hours.sum(), "total_hours")
        .into_tuple()
        .one(db)
        .await
        .map_err(|e| ServiceError::Backend(e.to_string()))?;

    let today = Local::now().date_naive();
    let today_entries = entry::Entity::find()
        .filter(entry::Column::EntryDate.eq(today))
        .count(db)
        .await
        .map_err(|e| ServiceError::Backend(e.to_string()))?;

    let today_hours: Option<Option<f64>> = entry::Entity::find()
        .select_only()
        .column_as(entry::Column::Hours.sum(), "total_hours")
        .filter(entry::Column::EntryDate.eq(today))
        .into_tuple()
        .one(db)
        .await
        .map_err(|e| ServiceError::Backend(e.to_string()))?;

    let most_common: Option<(String, i64)> = entry::Entity::find()
        .select_only()
        .column(entry::Column::ServiceType)
        .column_as(entry::Column::Id.count(), "cnt")
        .group_by(entry::Column::ServiceType)
        .order_by_desc(entry::Column::Id.count())
        .into_tuple()
        .one(db)
        .await
        .map_err(|e| ServiceError::Backend(e.to_string()))?;

    Ok(SummaryStats {
        total_entries,
        total_hours: total_hours.flatten().unwrap_or(0.0),
        today_entries,
        today_hours: today_hours.flatten().unwrap_or(0.0),
        most_common_service_type: most_common.map(|(t, _)| t),
    })
}

/// Retention sweep on `created_at`. Returns how many rows were removed.
pub async fn purge_older_than(db: &DatabaseConnection, days: u32) -> Result<u64, ServiceError> {
    let cutoff = Utc::now() - Duration::days(days as i64);
    let res = entry::Entity::delete_many()
        .filter(entry::Column::CreatedAt.lt(cutoff))
        .exec(db)
        .await
        .map_err(|e| ServiceError::Backend(e.to_string()))?;
    Ok(res.rows_affected)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::get_db;

    fn new_entry(plate: &str, date: &str, hours: f64) -> NewEntry {
        NewEntry {
            license_plate: plate.into(),
            service_type: "Full Detail".into(),
            technician: "Jane Doe".into(),
            location: Some("Bay 1".into()),
            hours,
            entry_date: date.parse().unwrap(),
            notes: None,
            photos: None,
        }
    }

    async fn insert_with_created_at(
        db: &DatabaseConnection,
        new: NewEntry,
        created_at: chrono::DateTime<Utc>,
    ) -> Result<i64, anyhow::Error> {
        let am = entry::ActiveModel {
            id: NotSet,
            license_plate: Set(new.license_plate),
            service_type: Set(new.service_type),
            technician: Set(new.technician),
            location: Set(new.location),
            hours: Set(new.hours),
            entry_date: Set(new.entry_date),
            notes: Set(new.notes),
            photos: Set(new.photos),
            created_at: Set(created_at),
        };
        Ok(am.insert(db).await?.id)
    }

    #[tokio::test]
    async fn crud_round_trip() -> Result<(), anyhow::Error> {
        let db = get_db().await?;

        let id = insert_entry(&db, new_entry("ABC-123", "2024-06-01", 2.5)).await?;
        let got = get_entry(&db, id).await?.unwrap();
        assert_eq!(got.license_plate, "ABC-123");
        assert_eq!(got.hours, 2.5);
        assert_eq!(got.entry_date, "2024-06-01".parse::<NaiveDate>().unwrap());

        let updated = update_entry(
            &db,
            id,
            EntryUpdate {
                license_plate: "ABC-123".into(),
                service_type: "Quick Detail".into(),
                technician: "Bob Lee".into(),
                location: None,
                hours: 1.0,
                entry_date: "2024-06-02".parse().unwrap(),
                notes: Some("follow-up".into()),
            },
        )
        .await?;
        assert!(updated);
        let got = get_entry(&db, id).await?.unwrap();
        assert_eq!(got.service_type, "Quick Detail");
        assert_eq!(got.location, None);
        assert_eq!(got.hours, 1.0);

        assert!(delete_entry(&db, id).await?);
        assert!(!delete_entry(&db, id).await?);
        assert!(get_entry(&db, id).await?.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn update_missing_id_returns_false_and_changes_nothing() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let id = insert_entry(&db, new_entry("ABC-123", "2024-06-01", 2.0)).await?;

        let touched = update_entry(
            &db,
            id + 100,
            EntryUpdate {
                license_plate: "ZZZ-999".into(),
                service_type: "Basic Wash".into(),
                technician: "Nobody".into(),
                location: None,
                hours: 1.0,
                entry_date: "2024-06-02".parse().unwrap(),
                notes: None,
            },
        )
        .await?;
        assert!(!touched);

        let rows = list_recent(&db, 10).await?;
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].license_plate, "ABC-123");
        Ok(())
    }

    #[tokio::test]
    async fn recent_ordering_uses_created_at_tie_break() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let base = Utc::now();

        let older = insert_with_created_at(&db, new_entry("AAA-111", "2024-06-01", 1.0), base).await?;
        let newer = insert_with_created_at(
            &db,
            new_entry("BBB-222", "2024-06-01", 1.0),
            base + Duration::seconds(5),
        )
        .await?;
        let newest_date =
            insert_with_created_at(&db, new_entry("CCC-333", "2024-06-02", 1.0), base).await?;

        let rows = list_recent(&db, 10).await?;
        let ids: Vec<i64> = rows.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![newest_date, newer, older]);

        let capped = list_recent(&db, 2).await?;
        assert_eq!(capped.len(), 2);
        Ok(())
    }

    #[tokio::test]
    async fn date_range_and_plate_filters() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        insert_entry(&db, new_entry("AAA-111", "2024-06-01", 1.0)).await?;
        insert_entry(&db, new_entry("BBB-222", "2024-06-05", 1.0)).await?;
        insert_entry(&db, new_entry("AAA-111", "2024-06-10", 1.0)).await?;

        let ranged =
            list_by_date_range(&db, "2024-06-01".parse().unwrap(), "2024-06-05".parse().unwrap())
                .await?;
        assert_eq!(ranged.len(), 2);

        // lookup input is normalized before matching
        let by_plate = list_by_plate(&db, " aaa-111 ").await?;
        assert_eq!(by_plate.len(), 2);
        assert!(by_plate.iter().all(|r| r.license_plate == "AAA-111"));
        Ok(())
    }

    #[tokio::test]
    async fn photo_refs_round_trip() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let id = insert_entry(&db, new_entry("ABC-123", "2024-06-01", 2.0)).await?;

        let refs = vec!["entry_1_20240601_0.jpg".to_string()];
        assert!(set_photo_refs(&db, id, &refs).await?);
        assert_eq!(get_entry(&db, id).await?.unwrap().photo_refs(), refs);

        assert!(set_photo_refs(&db, id, &[]).await?);
        assert_eq!(get_entry(&db, id).await?.unwrap().photos, None);

        assert!(!set_photo_refs(&db, id + 1, &refs).await?);
        Ok(())
    }

    #[tokio::test]
    async fn summary_stats_aggregates() -> Result<(), anyhow::Error> {
        let db = get_db().await?;

        let empty = summary_stats(&db).await?;
        assert_eq!(empty.total_entries, 0);
        assert_eq!(empty.total_hours, 0.0);
        assert_eq!(empty.most_common_service_type, None);

        let today = Local::now().date_naive();
        let today_str = today.format("%Y-%m-%d").to_string();
        insert_entry(&db, new_entry("AAA-111", &today_str, 2.5)).await?;
        insert_entry(&db, new_entry("BBB-222", "2020-01-01", 1.5)).await?;
        let mut third = new_entry("CCC-333", "2020-01-02", 3.0);
        third.service_type = "Basic Wash".into();
        insert_entry(&db, third).await?;
        insert_entry(&db, new_entry("DDD-444", "2020-01-03", 1.0)).await?;

        let stats = summary_stats(&db).await?;
        assert_eq!(stats.total_entries, 4);
        assert!((stats.total_hours - 8.0).abs() < 1e-9);
        assert_eq!(stats.today_entries, 1);
        assert!((stats.today_hours - 2.5).abs() < 1e-9);
        assert_eq!(stats.most_common_service_type.as_deref(), Some("Full Detail"));
        Ok(())
    }

    #[tokio::test]
    async fn purge_removes_only_stale_rows() -> Result<(), anyhow::Error> {
        let db = get_db().await?;

        let stale = insert_with_created_at(
            &db,
            new_entry("OLD-111", "2024-01-01", 1.0),
            Utc::now() - Duration::days(120),
        )
        .await?;
        let fresh = insert_entry(&db, new_entry("NEW-222", "2024-06-01", 1.0)).await?;

        let removed = purge_older_than(&db, 60).await?;
        assert_eq!(removed, 1);
        assert!(get_entry(&db, stale).await?.is_none());
        assert!(get_entry(&db, fresh).await?.is_some());
        Ok(())
    }
}
