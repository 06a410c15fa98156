use std::path::PathBuf;
use thiserror::Error;

/// All errors produced by the NOx pipeline.
///
/// Every variant is fatal: the pipeline stops before any aggregate is
/// handed to the presenter. A missing measurement is not an error and
/// never appears here.
#[derive(Error, Debug)]
pub enum NoxError {
    /// A matched source file could not be opened or read from disk.
    #[error("Failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A matched source file does not have the expected layout.
    #[error("Malformed source file {path}: {reason}")]
    FileFormat { path: PathBuf, reason: String },

    /// Two source tables disagree on their column set.
    #[error("Schema mismatch in {path}: expected columns [{expected}], found [{found}]")]
    SchemaMismatch {
        path: PathBuf,
        expected: String,
        found: String,
    },

    /// A column the normalizer depends on is absent from the merged table.
    #[error("Required column missing: {0}")]
    MissingColumn(String),

    /// A calendar component could not be converted to an integer.
    #[error("Row {row}: cannot coerce {field} value {value:?} to an integer")]
    StrictCoercion {
        row: usize,
        field: String,
        value: String,
    },

    /// The file-name pattern could not be compiled.
    #[error("Invalid file pattern: {0}")]
    InvalidPattern(String),

    /// The data directory does not exist.
    #[error("Data path not found: {0}")]
    DataPathNotFound(PathBuf),

    /// No file in the data directory matched the pattern.
    #[error("No files matching {pattern:?} found in {dir}")]
    NoDataFiles { dir: PathBuf, pattern: String },

    /// The presenter hand-off could not be serialised.
    #[error("Failed to serialise series: {0}")]
    Json(#[from] serde_json::Error),

    /// Pass-through for any raw I/O error that does not carry a path.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Convenience alias used throughout the pipeline crates.
pub type Result<T> = std::result::Result<T, NoxError>;
