use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{Local, NaiveDate, Utc};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde_json::json;

use models::{entry, validation};

use crate::entries::domain::{EntryUpdate, NewEntry, SummaryStats};
use crate::entries::repository::EntryRepository;
use crate::errors::ServiceError;

/// Fixed request timeout; there is no retry and no failover.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
const RECENT_ORDER: &str = "entry_date.desc,created_at.desc";
/// Client-side aggregates need the whole table; cap the fetch defensively.
const STATS_FETCH_LIMIT: &str = "10000";

/// PostgREST-style table API client (Supabase-compatible).
///
/// Insert is a POST, listings are GETs with server-side filter/order/limit
/// parameters, update is a PATCH and delete a DELETE on an `id=eq.` filter.
/// Mutations ask for `return=representation` so the affected rows are
/// observable, which is how missing ids map to `false`.
pub struct RestEntryRepository {
    client: reqwest::Client,
    base_url: String,
}

impl RestEntryRepository {
    pub fn new(base_url: &str, api_key: &str) -> Result<Self, ServiceError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            "apikey",
            HeaderValue::from_str(api_key).map_err(|e| ServiceError::Backend(e.to_string()))?,
        );
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {api_key}"))
                .map_err(|e| ServiceError::Backend(e.to_string()))?,
        );
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .default_headers(headers)
            .build()
            .map_err(|e| ServiceError::Backend(e.to_string()))?;

        Ok(Self { client, base_url: base_url.trim_end_matches('/').to_string() })
    }

    fn table_url(&self) -> String {
        format!("{}/rest/v1/entries", self.base_url)
    }

    fn id_filter(id: i64) -> (&'static str, String) {
        ("id", format!("eq.{id}"))
    }

    async fn fetch_rows(&self, query: &[(&str, String)]) -> Result<Vec<entry::Model>, ServiceError> {
        let resp = self
            .client
            .get(self.table_url())
            .query(query)
            .send()
            .await
            .map_err(|e| ServiceError::Backend(e.to_string()))?
            .error_for_status()
            .map_err(|e| ServiceError::Backend(e.to_string()))?;
        resp.json::<Vec<entry::Model>>()
            .await
            .map_err(|e| ServiceError::Backend(e.to_string()))
    }

    /// Rows a mutation touched; PostgREST answers them when asked for
    /// `return=representation`.
    async fn mutated_rows(&self, req: reqwest::RequestBuilder) -> Result<Vec<entry::Model>, ServiceError> {
        let resp = req
            .header("Prefer", "return=representation")
            .send()
            .await
            .map_err(|e| ServiceError::Backend(e.to_string()))?
            .error_for_status()
            .map_err(|e| ServiceError::Backend(e.to_string()))?;
        resp.json::<Vec<entry::Model>>()
            .await
            .map_err(|e| ServiceError::Backend(e.to_string()))
    }
}

#[async_trait]
impl EntryRepository for RestEntryRepository {
    async fn create(&self, entry: NewEntry) -> Result<i64, ServiceError> {
        let rows = self
            .mutated_rows(self.client.post(self.table_url()).json(&entry))
            .await?;
        rows.into_iter()
            .next()
            .map(|r| r.id)
            .ok_or_else(|| ServiceError::Backend("insert returned no row".to_string()))
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<entry::Model>, ServiceError> {
        let rows = self
            .fetch_rows(&[Self::id_filter(id), ("limit", "1".to_string())])
            .await?;
        Ok(rows.into_iter().next())
    }

    async fn list_recent(&self, limit: u64) -> Result<Vec<entry::Model>, ServiceError> {
        self.fetch_rows(&[
            ("order", RECENT_ORDER.to_string()),
            ("limit", limit.to_string()),
        ])
        .await
    }

    async fn list_by_date_range(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<entry::Model>, ServiceError> {
        self.fetch_rows(&[
            ("entry_date", format!("gte.{start}")),
            ("entry_date", format!("lte.{end}")),
            ("order", RECENT_ORDER.to_string()),
        ])
        .await
    }

    async fn list_by_plate(&self, plate: &str) -> Result<Vec<entry::Model>, ServiceError> {
        let plate = validation::format_license_plate(plate);
        self.fetch_rows(&[
            ("license_plate", format!("eq.{plate}")),
            ("order", RECENT_ORDER.to_string()),
        ])
        .await
    }

    async fn update(&self, id: i64, update: EntryUpdate) -> Result<bool, ServiceError> {
        let rows = self
            .mutated_rows(
                self.client
                    .patch(self.table_url())
                    .query(&[Self::id_filter(id)])
                    .json(&update),
            )
            .await?;
        Ok(!rows.is_empty())
    }

    async fn set_photo_refs(&self, id: i64, refs: &[String]) -> Result<bool, ServiceError> {
        let body = json!({ "photos": entry::join_photo_refs(refs) });
        let rows = self
            .mutated_rows(
                self.client
                    .patch(self.table_url())
                    .query(&[Self::id_filter(id)])
                    .json(&body),
            )
            .await?;
        Ok(!rows.is_empty())
    }

    async fn delete(&self, id: i64) -> Result<bool, ServiceError> {
        let rows = self
            .mutated_rows(self.client.delete(self.table_url()).query(&[Self::id_filter(id)]))
            .await?;
        Ok(!rows.is_empty())
    }

    /// The table API exposes no aggregate endpoint; fetch and reduce here.
    async fn summary_stats(&self) -> Result<SummaryStats, ServiceError> {
        let rows = self
            .fetch_rows(&[
                ("select", "*".to_string()),
                ("limit", STATS_FETCH_LIMIT.to_string()),
            ])
            .await?;

        let today = Local::now().date_naive();
        let mut counts: HashMap<&str, u64> = HashMap::new();
        let mut stats = SummaryStats {
            total_entries: rows.len() as u64,
            total_hours: 0.0,
            today_entries: 0,
            today_hours: 0.0,
            most_common_service_type: None,
        };
        for row in &rows {
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
        let cutoff = Utc::now() - chrono::Duration::days(days as i64);
        let rows = self
            .mutated_rows(
                self.client
                    .delete(self.table_url())
                    .query(&[("created_at", format!("lt.{}", cutoff.to_rfc3339()))]),
            )
            .await?;
        Ok(rows.len() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_url_trims_trailing_slash() {
        let repo = RestEntryRepository::new("https://project.supabase.co/", "anon").unwrap();
        assert_eq!(repo.table_url(), "https://project.supabase.co/rest/v1/entries");
    }

    #[test]
    fn id_filter_uses_postgrest_syntax() {
        assert_eq!(RestEntryRepository::id_filter(42), ("id", "eq.42".to_string()));
    }
}
