//! Error types for the food lookup engine.
//!
//! Two error families live here. [`FoodLookupError`] covers everything that
//! can fail while setting the engine up or driving it from the outside
//! (configuration, catalog files, replay scripts). [`LookupError`] is the
//! failure contract of a [`LookupService`](crate::lookup::LookupService)
//! call; it never escapes the lookup boundary and is folded into an empty
//! result set plus a notice.

use thiserror::Error;

/// The main error type for setup and embedding operations.
///
/// # Examples
///
/// ```
/// use food_lookup::domain::FoodLookupError;
///
/// fn validate_window(ms: i64) -> Result<(), FoodLookupError> {
///     if ms < 0 {
///         return Err(FoodLookupError::Config("negative window".to_string()));
///     }
///     Ok(())
/// }
/// assert!(validate_window(-1).is_err());
/// ```
#[derive(Debug, Error)]
pub enum FoodLookupError {
    /// Filesystem or I/O operation failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON payload could not be parsed or produced.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration is invalid or malformed.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The food catalog file is inconsistent (duplicate ids, missing names).
    #[error("Catalog error: {0}")]
    Catalog(String),

    /// A replay script step is invalid in its context.
    #[error("Script error: {0}")]
    Script(String),
}

/// Failure of a single lookup call against the food backend.
///
/// An empty match list is a successful lookup, not a `LookupError`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
    /// The backend could not be reached.
    #[error("network failure: {0}")]
    Network(String),

    /// The backend answered with a failure.
    #[error("service failure: {0}")]
    Service(String),

    /// The backend is deliberately offline.
    #[error("lookup service unavailable")]
    Unavailable,
}

/// A specialized `Result` type for food lookup operations.
pub type Result<T> = std::result::Result<T, FoodLookupError>;
