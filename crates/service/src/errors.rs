use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    /// Bad user input; carries every collected message so callers can show
    /// all problems at once. No state change has occurred.
    #[error("validation failed: {}", .0.join("; "))]
    Validation(Vec<String>),
    #[error("not found: {0}")]
    NotFound(String),
    /// The storage backend was unreachable or rejected the operation.
    #[error("backend error: {0}")]
    Backend(String),
    #[error("model error: {0}")]
    Model(#[from] models::errors::ModelError),
}

impl ServiceError {
    pub fn not_found(entity: &str) -> Self { Self::NotFound(format!("{} not found", entity)) }
}
