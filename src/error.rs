use thiserror::Error;

/// Convenience result type for spreadsheet import operations.
pub type ImportResult<T> = Result<T, ImportError>;

/// Error type returned by the import pipeline.
///
/// Every variant is recoverable: the caller re-selects a file or adjusts the column mapping.
/// Table state is never touched by a failed import.
#[derive(Debug, Error)]
pub enum ImportError {
    /// Underlying I/O error (e.g. file not found, permission denied).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[cfg(feature = "excel")]
    /// Workbook parse error (feature-gated behind `excel`).
    #[error("excel error: {0}")]
    Excel(#[from] calamine::Error),

    /// CSV parse error.
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    /// The file parsed but contains no header and no data rows.
    #[error("file is empty: no rows found")]
    EmptyFile,

    /// The file format could not be determined or is not enabled in this build.
    #[error("unsupported format: {message}")]
    UnsupportedFormat { message: String },

    /// Every column was mapped to `Skip`, so there is nothing to write.
    #[error("nothing to import: every column is skipped")]
    NothingToImport,
}
