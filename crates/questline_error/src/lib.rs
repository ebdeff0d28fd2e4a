//! Error types for the Questline workspace.
//!
//! # Error Hierarchy
//!
//! Errors follow the `ErrorKind` + wrapper struct pattern:
//! - `*ErrorKind` enum defines specific error conditions
//! - `*Error` struct wraps the kind with source location tracking
//! - All constructors use `#[track_caller]` for automatic location capture
//!
//! The taxonomy mirrors how failures are handled by the sync layer:
//!
//! - [`TransportError`] is a raw remote failure (status code, timeout, unreachable host).
//!   Sources classify it and decide whether to retry or fall back to cache.
//! - [`SyncError`] is the outcome a caller sees once recovery has been exhausted.
//!   Its kind renders a user-facing message with remediation steps.
//! - [`CacheError`] never escapes the cache wrapper; corrupt entries are discarded.
//!
//! # Examples
//!
//! ```
//! use questline_error::{QuestlineResult, SyncError, SyncErrorKind};
//!
//! fn lookup(name: &str) -> QuestlineResult<()> {
//!     Err(SyncError::new(SyncErrorKind::PlayerNotFound(name.to_string())))?
//! }
//!
//! let err = lookup("zezima").unwrap_err();
//! assert!(format!("{}", err).contains("not found"));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod cache;
mod catalog;
mod config;
mod error;
mod sync;
mod transport;

pub use cache::{CacheError, CacheErrorKind};
pub use catalog::{CatalogError, CatalogErrorKind};
pub use config::ConfigError;
pub use error::{QuestlineError, QuestlineErrorKind, QuestlineResult};
pub use sync::{ErrorClass, SyncError, SyncErrorKind, SyncResult};
pub use transport::{TransportError, TransportErrorKind, TransportResult};
