//! Service layer providing the storage-agnostic record-keeping contract.
//! - One repository trait, one adapter per storage backend.
//! - Validation is collected in full before any persistence call.
//! - Export and aggregate helpers consumed by the presentation layer.

pub mod bootstrap;
pub mod db;
pub mod entries;
pub mod errors;
pub mod export;
pub mod photos;
pub mod reports;
#[cfg(test)]
pub mod test_support;
