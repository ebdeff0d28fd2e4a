//! Validated player names.

use questline_error::{SyncError, SyncErrorKind, SyncResult};

/// Longest name the game allows.
pub const MAX_USERNAME_LEN: usize = 12;

const STRIPPED_CHARS: &[char] = &['<', '>', '\'', '"', '&', '`'];

/// A cleaned player name, ready for lookups.
///
/// # Examples
///
/// ```
/// use questline_core::Username;
///
/// let name = Username::parse("  Iron   Man ").unwrap();
/// assert_eq!(name.as_str(), "Iron Man");
/// assert_eq!(name.cache_key(), "iron man");
/// assert!(Username::parse("   ").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
#[display("{}", _0)]
pub struct Username(String);

impl Username {
    /// Drop markup characters, trim, and collapse whitespace, then validate.
    ///
    /// # Errors
    ///
    /// Fails with an input-validation error when nothing is left after cleaning or the
    /// name is longer than [`MAX_USERNAME_LEN`].
    pub fn parse(raw: &str) -> SyncResult<Self> {
        let cleaned = raw
            .replace(STRIPPED_CHARS, "")
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ");

        if cleaned.is_empty() {
            return Err(SyncError::new(SyncErrorKind::InvalidUsername(
                "Username cannot be empty".to_string(),
            )));
        }
        if cleaned.chars().count() > MAX_USERNAME_LEN {
            return Err(SyncError::new(SyncErrorKind::InvalidUsername(format!(
                "Usernames are at most {} characters",
                MAX_USERNAME_LEN
            ))));
        }
        Ok(Self(cleaned))
    }

    /// The cleaned name.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Lower-cased form used to key cached snapshots.
    pub fn cache_key(&self) -> String {
        self.0.to_lowercase()
    }

    /// Case-insensitive comparison against another name.
    pub fn matches(&self, other: &str) -> bool {
        self.0.to_lowercase() == other.trim().to_lowercase()
    }
}
