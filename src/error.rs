//! Error types for the puestos processing pipeline.
//!
//! This module defines a hierarchy of error types:
//!
//! - [`SheetError`] - Workbook reading and header location errors
//! - [`ProcessError`] - Top-level pipeline errors
//! - [`ExportError`] - Excel export errors
//! - [`ServerError`] - HTTP server errors
//!
//! Error conversion is automatic via `From` implementations,
//! allowing `?` to work across error boundaries.

use thiserror::Error;

// =============================================================================
// Sheet Reading Errors
// =============================================================================

/// Errors while reading a spreadsheet and locating its header row.
#[derive(Debug, Error)]
pub enum SheetError {
    /// File extension is not one of the supported spreadsheet formats.
    #[error("Unsupported file format '{0}'. Use .xls or .xlsx")]
    UnsupportedFormat(String),

    /// The underlying workbook reader failed.
    #[error("Failed to read workbook: {0}")]
    Workbook(#[from] calamine::Error),

    /// The workbook contains no sheets at all.
    #[error("Workbook has no sheets")]
    NoSheets,

    /// No row contains the three required column headers.
    #[error("No row containing the columns 'CENTRO DE TRABAJO', 'DEPARTAMENTO' and 'PUESTO DE TRABAJO' was found")]
    HeaderNotFound,

    /// Failed to read the input file.
    #[error("Failed to read file: {0}")]
    Io(#[from] std::io::Error),
}

// =============================================================================
// Pipeline Errors (top-level)
// =============================================================================

/// Top-level pipeline errors.
///
/// This is the main error type returned by [`crate::transform::pipeline::process_bytes`].
#[derive(Debug, Error)]
pub enum ProcessError {
    /// Sheet reading error.
    #[error("Sheet error: {0}")]
    Sheet(#[from] SheetError),

    /// A required label could not be matched against any column name.
    #[error("Could not locate a column matching '{0}' in the header row")]
    ColumnNotFound(String),
}

// =============================================================================
// Export Errors
// =============================================================================

/// Errors while writing a table out as an Excel workbook.
#[derive(Debug, Error)]
pub enum ExportError {
    /// The workbook writer failed.
    #[error("Failed to write workbook: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    /// Failed to write the output file.
    #[error("Failed to write file: {0}")]
    Io(#[from] std::io::Error),
}

// =============================================================================
// Server Errors
// =============================================================================

/// HTTP server errors.
#[derive(Debug, Error)]
pub enum ServerError {
    /// Pipeline error.
    #[error("{0}")]
    Process(#[from] ProcessError),

    /// Export error.
    #[error("{0}")]
    Export(#[from] ExportError),

    /// Invalid request.
    #[error("Invalid request: {0}")]
    BadRequest(String),

    /// Server internal error.
    #[error("Internal server error: {0}")]
    Internal(String),
}

impl ServerError {
    /// HTTP status the error should be reported with.
    ///
    /// Malformed uploads are the client's fault; a sheet that parses but
    /// lacks the required headers is unprocessable; everything else is ours.
    pub fn status(&self) -> axum::http::StatusCode {
        use axum::http::StatusCode;

        match self {
            ServerError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ServerError::Process(ProcessError::Sheet(SheetError::HeaderNotFound))
            | ServerError::Process(ProcessError::ColumnNotFound(_)) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            ServerError::Process(_) => StatusCode::BAD_REQUEST,
            ServerError::Export(_) | ServerError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for sheet reading operations.
pub type SheetResult<T> = Result<T, SheetError>;

/// Result type for pipeline operations.
pub type ProcessResult<T> = Result<T, ProcessError>;

/// Result type for export operations.
pub type ExportResult<T> = Result<T, ExportError>;

/// Result type for server operations.
pub type ServerResult<T> = Result<T, ServerError>;
