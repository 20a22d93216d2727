//! Error types for DOCX assembly and rewriting

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while building or rewriting a package
#[derive(Error, Debug)]
pub enum DocxError {
    /// Error reading or writing the ZIP archive
    #[error("Archive error: {0}")]
    Archive(#[from] zip::result::ZipError),

    /// Error reading, writing or renaming files
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Caller supplied an unusable path or argument
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Source package or directory does not exist
    #[error("Not found: {}", .0.display())]
    NotFound(PathBuf),

    /// A part the engine relies on is missing from the package
    #[error("Required part not found: {0}")]
    MissingPart(String),

    /// A part transformer refused to process a part
    #[error("Failed to transform '{part}': {message}")]
    Transform {
        /// Path of the part being transformed
        part: String,
        /// Reason reported by the transformer
        message: String,
    },
}

/// Coarse classification of [`DocxError`] for callers that only branch on kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Empty or malformed path, not a directory, bad image path
    InvalidInput,
    /// Source package or directory absent
    NotFound,
    /// Create/read/write/rename failure on the filesystem or archive layer
    IoFailure,
    /// Package is missing an expected part, or a part could not be processed
    SchemaAssumptionViolated,
}

impl DocxError {
    /// Classify this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidInput(_) => ErrorKind::InvalidInput,
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::Io(_) | Self::Archive(_) => ErrorKind::IoFailure,
            Self::MissingPart(_) | Self::Transform { .. } => ErrorKind::SchemaAssumptionViolated,
        }
    }
}

impl From<tempfile::PersistError> for DocxError {
    fn from(err: tempfile::PersistError) -> Self {
        Self::Io(err.error)
    }
}

/// Result type for DOCX operations
pub type Result<T> = std::result::Result<T, DocxError>;
