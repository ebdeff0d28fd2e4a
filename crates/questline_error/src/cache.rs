//! Cache store error types.

/// Kinds of cache store errors.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum CacheErrorKind {
    /// Failed to create the cache directory
    #[display("Failed to create cache directory: {}", _0)]
    DirectoryCreation(String),
    /// Failed to write a cache slot
    #[display("Failed to write cache entry: {}", _0)]
    Write(String),
    /// Failed to read a cache slot
    #[display("Failed to read cache entry: {}", _0)]
    Read(String),
    /// A cache slot holds bytes that are not text
    #[display("Corrupt cache entry: {}", _0)]
    Corrupt(String),
    /// Failed to remove a cache slot
    #[display("Failed to remove cache entry: {}", _0)]
    Remove(String),
    /// Payload could not be serialized into an envelope
    #[display("Failed to serialize cache entry: {}", _0)]
    Serialization(String),
}

/// Cache error with location tracking.
///
/// # Examples
///
/// ```
/// use questline_error::{CacheError, CacheErrorKind};
///
/// let err = CacheError::new(CacheErrorKind::Read("player-cache/zezima".to_string()));
/// assert!(format!("{}", err).contains("player-cache/zezima"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Cache Error: {} at line {} in {}", kind, line, file)]
pub struct CacheError {
    /// The kind of error that occurred
    pub kind: CacheErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl CacheError {
    /// Create a new cache error with automatic location tracking.
    #[track_caller]
    pub fn new(kind: CacheErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Get the error kind.
    pub fn kind(&self) -> &CacheErrorKind {
        &self.kind
    }
}
