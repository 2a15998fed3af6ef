//! Error types for buffer writes, interpolation input and configuration.

use thiserror::Error;

use crate::data::sample::ColumnKind;

/// Result type used throughout the crate.
pub type Result<T> = std::result::Result<T, BufferError>;

/// Caller-contract violations and configuration failures.
///
/// A write that fails with one of these leaves the buffer exactly as it was
/// before the call.
#[derive(Error, Debug)]
pub enum BufferError {
    /// Number of secondary values does not match the buffer's column layout.
    #[error("expected {expected} secondary values per row, got {actual}")]
    Arity { expected: usize, actual: usize },

    /// Primary and secondary batch arrays differ in length.
    #[error("batch column length mismatch: primary has {expected} entries, secondary has {actual}")]
    LengthMismatch { expected: usize, actual: usize },

    /// A secondary value does not have the type of its column.
    #[error("secondary column {column} expects {expected:?} values")]
    ColumnType { column: usize, expected: ColumnKind },

    /// A point record passed to interpolation lacks a coordinate.
    #[error("malformed point record: {0}")]
    MalformedPoint(String),

    /// Configuration could not be used.
    #[error("configuration error: {0}")]
    Config(String),

    /// Configuration JSON could not be (de)serialized.
    #[error("configuration JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
