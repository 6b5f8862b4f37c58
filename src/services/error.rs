//! Errors shared by the content services

/// Error types for blog, event, publication and section operations
#[derive(Debug, thiserror::Error)]
pub enum ContentServiceError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Title, identifier or position id already taken
    #[error("Already exists: {0}")]
    Conflict(String),

    #[error("Internal error: {0}")]
    InternalError(#[from] anyhow::Error),
}

/// Reject empty or whitespace-only required fields
pub(crate) fn require_non_empty(field: &str, value: &str) -> Result<(), ContentServiceError> {
    if value.trim().is_empty() {
        return Err(ContentServiceError::ValidationError(format!(
            "{} cannot be empty",
            field
        )));
    }
    Ok(())
}
