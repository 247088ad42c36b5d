use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// One detailing service record. `location` and `photos` are nullable;
/// `photos` holds a comma-delimited list of file names in the photo store.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "entries")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub license_plate: String,
    pub service_type: String,
    pub technician: String,
    pub location: Option<String>,
    pub hours: f64,
    pub entry_date: Date,
    pub notes: Option<String>,
    pub photos: Option<String>,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef { panic!("no relations defined here") }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// File names referenced by this record, in attachment order.
    pub fn photo_refs(&self) -> Vec<String> {
        match &self.photos {
            Some(raw) => raw
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect(),
            None => Vec::new(),
        }
    }
}

/// Serialize a photo-ref list back to the delimited column value.
/// Empty input maps to NULL rather than an empty string.
pub fn join_photo_refs(refs: &[String]) -> Option<String> {
    if refs.is_empty() {
        None
    } else {
        Some(refs.join(","))
    }
}
