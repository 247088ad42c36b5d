//! On-demand CSV/JSON export, returned as in-memory bytes.
//! Nothing is retained server-side; the caller streams the result out.

use csv::WriterBuilder;

use models::entry;

use crate::errors::ServiceError;

/// Human-readable header row, one column per exported field.
pub const CSV_HEADERS: [&str; 10] = [
    "ID",
    "License Plate",
    "Service Type",
    "Technician",
    "Location",
    "Hours",
    "Date",
    "Notes",
    "Photos",
    "Created At",
];

/// One CSV row per record. Values round-trip: dates are ISO, `created_at`
/// is RFC 3339, empty optionals export as empty cells.
pub fn to_csv(rows: &[entry::Model]) -> Result<Vec<u8>, ServiceError> {
    let mut wtr = WriterBuilder::new().from_writer(Vec::new());
    wtr.write_record(CSV_HEADERS)
        .map_err(|e| ServiceError::Backend(e.to_string()))?;
    for row in rows {
        wtr.write_record([
            row.id.to_string(),
            row.license_plate.clone(),
            row.service_type.clone(),
            row.technician.clone(),
            row.location.clone().unwrap_or_default(),
            row.hours.to_string(),
            row.entry_date.to_string(),
            row.notes.clone().unwrap_or_default(),
            row.photos.clone().unwrap_or_default(),
            row.created_at.to_rfc3339(),
        ])
        .map_err(|e| ServiceError::Backend(e.to_string()))?;
    }
    wtr.into_inner().map_err(|e| ServiceError::Backend(e.to_string()))
}

/// Pretty-printed JSON array mirroring the CSV field set.
pub fn to_json(rows: &[entry::Model]) -> Result<Vec<u8>, ServiceError> {
    serde_json::to_vec_pretty(rows).map_err(|e| ServiceError::Backend(e.to_string()))
}
