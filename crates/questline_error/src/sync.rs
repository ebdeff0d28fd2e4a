//! Failures surfaced to callers of the sync layer.

/// Broad handling class of a sync failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display)]
pub enum ErrorClass {
    /// Bad input; never retried
    #[display("input-validation")]
    InputValidation,
    /// The remote refused the request; never retried
    #[display("permanent-remote")]
    PermanentRemote,
    /// Retries (and cache fallback) were exhausted
    #[display("transient-remote")]
    TransientRemote,
}

/// Why a player status lookup failed.
///
/// The `Display` output is meant for end users and carries remediation steps.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum SyncErrorKind {
    /// The username was empty or malformed
    #[display("{}", _0)]
    InvalidUsername(String),
    /// The sync service has never received data for this player
    #[display(
        "No data found for \"{}\". Please make sure:\n1. You have logged into RuneLite recently\n2. The Wiki plugin is enabled in RuneLite\n3. You have waited a few minutes for your data to sync",
        _0
    )]
    NoUserData(String),
    /// Any other 400 response
    #[display("Invalid request. Please check the username and try again.")]
    BadRequest,
    /// The sync service does not know the player
    #[display(
        "Player \"{}\" not found. Please note:\n1. The username is case-sensitive\n2. Make sure you've synced your data using RuneLite\n3. The Wiki plugin must be enabled in RuneLite\n4. You must have logged in recently while using RuneLite",
        _0
    )]
    PlayerNotFound(String),
    /// Server errors persisted through every retry
    #[display("Server error: {}. Please try again later.", _0)]
    Server(String),
    /// Timeouts persisted through every retry and nothing was cached
    #[display("Request timed out. The server might be experiencing high load. Please try again.")]
    Timeout,
    /// The network was unreachable and nothing was cached
    #[display("Network error. Please check your internet connection and try again.")]
    Network,
    /// The sync service is throttling requests
    #[display("Too many requests. Please wait a minute before trying again.")]
    RateLimited,
    /// The player was synced from a world type the service refuses to serve
    #[display(
        "Please make sure you are using RuneLite on a regular OSRS world (not beta/private server)."
    )]
    UnsupportedWorld,
    /// Some other failure persisted through every retry and nothing was cached
    #[display(
        "Unable to fetch quest data after multiple attempts ({}). Please try again later.",
        _0
    )]
    RetriesExhausted(String),
}

impl SyncErrorKind {
    /// Handling class of this failure.
    pub fn class(&self) -> ErrorClass {
        match self {
            SyncErrorKind::InvalidUsername(_) => ErrorClass::InputValidation,
            SyncErrorKind::NoUserData(_)
            | SyncErrorKind::BadRequest
            | SyncErrorKind::PlayerNotFound(_)
            | SyncErrorKind::RateLimited
            | SyncErrorKind::UnsupportedWorld => ErrorClass::PermanentRemote,
            SyncErrorKind::Server(_)
            | SyncErrorKind::Timeout
            | SyncErrorKind::Network
            | SyncErrorKind::RetriesExhausted(_) => ErrorClass::TransientRemote,
        }
    }
}

/// Sync error with location tracking.
///
/// # Examples
///
/// ```
/// use questline_error::{ErrorClass, SyncError, SyncErrorKind};
///
/// let err = SyncError::new(SyncErrorKind::RateLimited);
/// assert_eq!(err.kind().class(), ErrorClass::PermanentRemote);
/// assert!(err.kind().to_string().starts_with("Too many requests"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Sync Error: {} at line {} in {}", kind, line, file)]
pub struct SyncError {
    /// The kind of error that occurred
    pub kind: SyncErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl SyncError {
    /// Create a new sync error with automatic location tracking.
    #[track_caller]
    pub fn new(kind: SyncErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Get the error kind.
    pub fn kind(&self) -> &SyncErrorKind {
        &self.kind
    }
}

/// Result type for sync operations.
pub type SyncResult<T> = Result<T, SyncError>;
