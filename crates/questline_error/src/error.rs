//! Top-level error wrapper types.

use crate::{CacheError, CatalogError, ConfigError, SyncError, TransportError};

/// Every error the Questline crates can produce.
///
/// # Examples
///
/// ```
/// use questline_error::{ConfigError, QuestlineError};
///
/// let err: QuestlineError = ConfigError::new("bad base_url").into();
/// assert!(format!("{}", err).contains("Configuration Error"));
/// ```
#[derive(Debug, derive_more::From, derive_more::Display, derive_more::Error)]
pub enum QuestlineErrorKind {
    /// Player status lookup failed
    #[from(SyncError)]
    Sync(SyncError),
    /// Raw remote failure
    #[from(TransportError)]
    Transport(TransportError),
    /// Cache store failure
    #[from(CacheError)]
    Cache(CacheError),
    /// Configuration error
    #[from(ConfigError)]
    Config(ConfigError),
    /// Quest catalog error
    #[from(CatalogError)]
    Catalog(CatalogError),
}

/// Questline error with kind discrimination.
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("Questline Error: {}", _0)]
pub struct QuestlineError(Box<QuestlineErrorKind>);

impl QuestlineError {
    /// Create a new error from a kind.
    pub fn new(kind: QuestlineErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &QuestlineErrorKind {
        &self.0
    }
}

impl<T> From<T> for QuestlineError
where
    T: Into<QuestlineErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

/// Result type for Questline operations.
pub type QuestlineResult<T> = std::result::Result<T, QuestlineError>;
