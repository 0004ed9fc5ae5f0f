use std::path::PathBuf;
use thiserror::Error;

/// All errors produced by actlog.
#[derive(Error, Debug)]
pub enum ActlogError {
    /// A file could not be opened or read from disk.
    #[error("Failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The header row names no recognised timestamp column.
    #[error("No timestamp column found in {0}")]
    MissingTimestampColumn(PathBuf),

    /// A data row could not be split into the expected fields.
    #[error("Malformed row at line {line}: {content}")]
    MalformedRow { line: usize, content: String },

    /// A timestamp value did not match any recognised format.
    #[error("Invalid timestamp at line {line}: {value}")]
    TimestampParse { line: usize, value: String },

    /// An `--size` argument that is not `WIDTHxHEIGHT`.
    #[error("Invalid size format: {0}. Expected format: WIDTHxHEIGHT")]
    InvalidSizeFormat(String),

    /// A chart was requested over an empty table.
    #[error("No data to chart: {0}")]
    NoData(String),

    /// Too few samples (or no spread) for a density estimate.
    #[error("Not enough data for a density estimate: {0}")]
    InsufficientData(String),

    /// An error raised by the drawing backend while rendering.
    #[error("Chart rendering error: {0}")]
    ChartRender(String),

    /// Pass-through for any raw I/O error that does not carry a path.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Catch-all for errors from third-party crates via `anyhow`.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Convenience alias used throughout the actlog crates.
pub type Result<T> = std::result::Result<T, ActlogError>;
