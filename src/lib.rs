//! # Puestos - workforce roster grouping and merge suggestions
//!
//! Puestos reads an Excel roster (`.xls` or `.xlsx`) listing employees by
//! work center, department and job title, and produces a summary of
//! headcount per job title with merge suggestions for sparse groups.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌──────────────┐     ┌─────────────┐     ┌─────────────┐
//! │ xls / xlsx  │────▶│    Parser    │────▶│  Grouping   │────▶│  Original + │
//! │   (bytes)   │     │ (auto header)│     │ & suggestion│     │   Summary   │
//! └─────────────┘     └──────────────┘     └─────────────┘     └─────────────┘
//! ```
//!
//! The pipeline is a pure batch transformation: no state survives an
//! invocation, and a failure (missing header row, unresolvable key column,
//! unsupported format) aborts the whole run with no partial output.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use puestos::{process_bytes, Engine};
//!
//! let bytes = std::fs::read("plantilla.xlsx")?;
//! let processed = process_bytes(&bytes, Engine::Xlsx)?;
//! for group in &processed.summary.groups {
//!     println!("{}: {}", group.key.job_title, group.headcount);
//! }
//! ```
//!
//! ## Modules
//!
//! - [`error`] - Hierarchical error types
//! - [`models`] - Domain models and the fixed labels/thresholds
//! - [`parser`] - Workbook reading and header row location
//! - [`transform`] - Column resolution, grouping and the pipeline
//! - [`export`] - Excel export of result tables
//! - [`api`] - HTTP API server

// Core modules
pub mod error;
pub mod models;

// Parsing
pub mod parser;

// Transformation
pub mod transform;

// Export
pub mod export;

// HTTP API
pub mod api;

// =============================================================================
// Re-exports - Error types
// =============================================================================

pub use error::{ExportError, ProcessError, ServerError, SheetError};

// =============================================================================
// Re-exports - Models
// =============================================================================

pub use models::{
    GroupKey, GroupRecord, ResolvedColumns, SummaryTable, TableData,
};

// =============================================================================
// Re-exports - Parser
// =============================================================================

pub use parser::{find_header_row, parse_bytes, read_raw, Engine, ParseResult};

// =============================================================================
// Re-exports - Transform
// =============================================================================

pub use transform::{build_summary, count_groups, resolve_columns};

pub use transform::pipeline::{process_bytes, Processed, SheetInfo};

// =============================================================================
// Re-exports - Export
// =============================================================================

pub use export::{table_to_xlsx, write_table_file};

// =============================================================================
// Re-exports - API
// =============================================================================

pub use api::types::{error_response, ExportRequest, TablePayload, UploadResponse};

// Server
pub mod server {
    pub use crate::api::server::start_server;
}
