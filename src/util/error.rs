//! Error types for the visfile library.

use std::path::PathBuf;
use thiserror::Error;

use super::DataType;

/// Main error type for database operations.
///
/// Every validation error is produced before the native library is called,
/// so a failed put never leaves a half-written object behind.
#[derive(Error, Debug)]
pub enum Error {
    /// Native open returned a null handle
    #[error("DBOpen failed for {path}: native error {code}")]
    OpenFailed { path: PathBuf, code: i32 },

    /// Native create returned a null handle
    #[error("DBCreate failed for {path}: native error {code}")]
    CreateFailed { path: PathBuf, code: i32 },

    /// `close()` called on a database that is already closed
    #[error("database is already closed")]
    AlreadyClosed,

    /// Operation attempted on a closed database
    #[error("database is closed")]
    DatabaseClosed,

    /// A native entry point reported failure
    #[error("{entry} failed: native error {code}")]
    NativeCallFailed { entry: &'static str, code: i32 },

    /// Components of one field disagree in element type
    #[error("components of '{field}' have non-matching types: expected {expected}, got {actual}")]
    TypeMismatch {
        field: String,
        expected: DataType,
        actual: DataType,
    },

    /// Components of one field disagree in element count
    #[error("field components of '{field}' need to have matching lengths: expected {expected}, got {actual}")]
    LengthMismatch {
        field: String,
        expected: usize,
        actual: usize,
    },

    /// Element type outside the set accepted at a dispatch point
    #[error("unsupported variable type: {0}")]
    UnsupportedType(String),

    /// Option value does not fit into the remaining arena capacity
    #[error("option list storage exhausted ({requested} bytes requested, {occupied}/{capacity} used) -- specify bigger storage size")]
    ArenaExhausted {
        requested: usize,
        occupied: usize,
        capacity: usize,
    },

    /// Array shape or dims sequence does not fit the operation
    #[error("invalid shape: {0}")]
    InvalidShape(String),

    /// Native getter returned null
    #[error("DBGet{kind} failed: '{name}' not found")]
    NotFound { kind: &'static str, name: String },

    /// Entry point not present in the linked native library version
    #[error("{entry} is not available in native library {version}")]
    Unavailable { entry: &'static str, version: String },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error with message
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create an "other" error from a string.
    pub fn other(msg: impl Into<String>) -> Self {
        Self::Other(msg.into())
    }

    /// Create an invalid shape error.
    pub fn shape(msg: impl Into<String>) -> Self {
        Self::InvalidShape(msg.into())
    }

    /// Create a length mismatch error for a named field.
    pub fn length(field: impl Into<String>, expected: usize, actual: usize) -> Self {
        Self::LengthMismatch {
            field: field.into(),
            expected,
            actual,
        }
    }

    /// Wrap a native failure code with the entry point name.
    pub fn native(entry: &'static str, code: i32) -> Self {
        Self::NativeCallFailed { entry, code }
    }
}

/// Result type alias for database operations.
pub type Result<T> = std::result::Result<T, Error>;
