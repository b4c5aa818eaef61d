use thiserror::Error;

/// A common error representing that a requested entity was not found.
///
/// Stores return it when a cache key has no record, and the request path
/// treats it the same as any other "thumbnail not available" outcome.
///
/// # Example
/// ```
/// use thumbcache::error::entity::NotFoundError;
///
/// let err = NotFoundError::new("Thumbnail");
/// assert_eq!(err.to_string(), "Thumbnail not found");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{entity} not found")]
pub struct NotFoundError {
    /// Name of the entity that was not found (e.g. `"Thumbnail"`)
    pub entity: &'static str,
}

impl NotFoundError {
    /// Create a new `NotFoundError` for the specified entity.
    pub fn new(entity: &'static str) -> Self {
        Self { entity }
    }
}
