//! Import error types

use thiserror::Error;

/// Import errors
///
/// `Row` is local to a single sheet row: it is logged and the row skipped,
/// the rest of the batch continues. The others abort the run.
#[derive(Debug, Error)]
pub enum ImportError {
    /// Spreadsheet could not be opened or read
    #[error("Source error: {0}")]
    Source(String),

    /// Configured sheet missing from the workbook
    #[error("Sheet '{0}' not found in workbook")]
    SheetNotFound(String),

    /// Malformed or unmappable row (1-based sheet row number)
    #[error("Row {row}: {reason}")]
    Row { row: usize, reason: String },

    /// Repository failure outside per-cell creates (e.g. the purge)
    #[error(transparent)]
    Repository(#[from] whinv_common::Error),
}
