use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use models::validation;

/// Fields supplied when recording a new job. `id` and `created_at` are
/// assigned by the storage backend at insert time.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NewEntry {
    pub license_plate: String,
    pub service_type: String,
    pub technician: String,
    pub location: Option<String>,
    pub hours: f64,
    pub entry_date: NaiveDate,
    pub notes: Option<String>,
    pub photos: Option<String>,
}

impl NewEntry {
    /// Canonical stored form: plate uppercased and trimmed, free text
    /// trimmed, blank optionals collapsed to NULL.
    pub fn normalized(mut self) -> Self {
        self.license_plate = validation::format_license_plate(&self.license_plate);
        self.technician = self.technician.trim().to_string();
        self.location = self
            .location
            .map(|l| l.trim().to_string())
            .filter(|l| !l.is_empty());
        self.notes = self
            .notes
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty());
        self
    }
}

/// Replacement values for every mutable field of an existing record.
/// Photo refs are maintained separately through the attachment flow.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EntryUpdate {
    pub license_plate: String,
    pub service_type: String,
    pub technician: String,
    pub location: Option<String>,
    pub hours: f64,
    pub entry_date: NaiveDate,
    pub notes: Option<String>,
}

impl EntryUpdate {
    pub fn normalized(mut self) -> Self {
        self.license_plate = validation::format_license_plate(&self.license_plate);
        self.technician = self.technician.trim().to_string();
        self.location = self
            .location
            .map(|l| l.trim().to_string())
            .filter(|l| !l.is_empty());
        self.notes = self
            .notes
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty());
        self
    }
}

/// Whole-table aggregates for the dashboard header.
/// "Today" means the backend host's local calendar date.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SummaryStats {
    pub total_entries: u64,
    pub total_hours: f64,
    pub today_entries: u64,
    pub today_hours: f64,
    pub most_common_service_type: Option<String>,
}

/// Predefined reporting windows, resolved against a reference date.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DatePreset {
    Today,
    Yesterday,
    Last7Days,
    Last30Days,
    ThisMonth,
}

impl DatePreset {
    /// Inclusive `(start, end)` bounds for `list_by_date_range`.
    pub fn bounds(self, today: NaiveDate) -> (NaiveDate, NaiveDate) {
        match self {
            DatePreset::Today => (today, today),
            DatePreset::Yesterday => {
                let d = today - Duration::days(1);
                (d, d)
            }
            DatePreset::Last7Days => (today - Duration::days(6), today),
            DatePreset::Last30Days => (today - Duration::days(29), today),
            DatePreset::ThisMonth => (today.with_day(1).unwrap_or(today), today),
        }
    }
}
