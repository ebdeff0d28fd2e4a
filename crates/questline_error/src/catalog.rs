//! Quest catalog errors.

/// Problems found while loading a quest catalog.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum CatalogErrorKind {
    /// Catalog file could not be read
    #[display("Failed to read quest catalog: {}", _0)]
    Read(String),
    /// Catalog contents are not valid TOML for the catalog schema
    #[display("Failed to parse quest catalog: {}", _0)]
    Parse(String),
    /// A canonical entry has an empty name
    #[display("Quest at position {} has an empty name", _0)]
    EmptyName(usize),
    /// The same quest appears twice in the canonical order
    #[display("Quest '{}' appears more than once in the canonical order", _0)]
    DuplicateQuest(String),
}

/// Catalog error with location tracking.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Catalog Error: {} at line {} in {}", kind, line, file)]
pub struct CatalogError {
    kind: CatalogErrorKind,
    line: u32,
    file: &'static str,
}

impl CatalogError {
    /// Create a new catalog error with caller location tracking.
    #[track_caller]
    pub fn new(kind: CatalogErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Get the error kind.
    pub fn kind(&self) -> &CatalogErrorKind {
        &self.kind
    }
}
