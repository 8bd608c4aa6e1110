// File: src/error.rs

/// Result type alias using [`LabError`].
pub type Result<T> = std::result::Result<T, LabError>;

/// Errors surfaced by the lab core. None of them are fatal: the worst case
/// on the render path is a render with zero familiarity.
#[derive(Debug, thiserror::Error)]
pub enum LabError {
    /// A surah, word or root that does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Missing or wrong-shaped request payload.
    #[error("Malformed input: {0}")]
    MalformedInput(String),

    /// The familiarity file could not be read or written.
    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),

    #[error("Invalid dictionary: {0}")]
    InvalidDictionary(String),

    #[error("Invalid corpus: {0}")]
    InvalidCorpus(String),

    #[error("Export error: {0}")]
    Export(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl LabError {
    pub fn not_found(msg: impl Into<String>) -> Self {
        LabError::NotFound(msg.into())
    }

    pub fn malformed(msg: impl Into<String>) -> Self {
        LabError::MalformedInput(msg.into())
    }

    pub fn storage(msg: impl Into<String>) -> Self {
        LabError::StorageUnavailable(msg.into())
    }

    /// True for errors the caller caused (bad payload, unknown key).
    pub fn is_client_error(&self) -> bool {
        matches!(self, LabError::NotFound(_) | LabError::MalformedInput(_))
    }
}

impl From<csv::Error> for LabError {
    fn from(e: csv::Error) -> Self {
        LabError::Export(e.to_string())
    }
}
