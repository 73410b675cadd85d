//! REST API types for frontend integration.
//!
//! The front end receives both tables ready to render: ordered column names
//! plus one object per row. Edited tables come back in the same shape for
//! export.

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use uuid::Uuid;

use crate::models::{SummaryTable, TableData};
use crate::transform::pipeline::Processed;

/// A table rendered for the frontend: ordered columns plus row objects.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TablePayload {
    pub columns: Vec<String>,
    pub rows: Vec<Map<String, Value>>,
}

impl From<&TableData> for TablePayload {
    fn from(table: &TableData) -> Self {
        Self {
            columns: table.headers.clone(),
            rows: table.records.clone(),
        }
    }
}

impl From<&SummaryTable> for TablePayload {
    fn from(summary: &SummaryTable) -> Self {
        Self {
            columns: summary.columns(),
            rows: summary.to_rows(),
        }
    }
}

/// Response sent to the frontend after upload and processing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    /// Unique job identifier.
    pub job_id: String,

    /// Status: "ready" when no group was flagged, "warning" otherwise.
    pub status: String,

    /// The passthrough original table.
    pub original: TablePayload,

    /// The grouped summary, TOTAL row last.
    pub summary: TablePayload,

    /// Metadata about the processing run.
    pub metadata: ResponseMetadata,
}

/// Metadata about the processing run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseMetadata {
    /// Sheet info.
    pub sheet: SheetMetadata,

    /// Number of distinct groups (TOTAL row excluded).
    pub group_count: usize,

    /// Sum of all group headcounts.
    pub total_headcount: usize,

    /// Number of groups flagged as low-headcount.
    pub flagged_count: usize,
}

/// Source sheet metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SheetMetadata {
    pub engine: String,
    pub header_row: usize,
    pub row_count: usize,
    pub column_count: usize,
}

impl From<Processed> for UploadResponse {
    fn from(processed: Processed) -> Self {
        let flagged_count = processed.summary.flagged_count();

        UploadResponse {
            job_id: Uuid::new_v4().to_string(),
            status: if flagged_count == 0 { "ready" } else { "warning" }.to_string(),
            original: TablePayload::from(&processed.original),
            summary: TablePayload::from(&processed.summary),
            metadata: ResponseMetadata {
                sheet: SheetMetadata {
                    engine: processed.sheet_info.engine.to_string(),
                    header_row: processed.sheet_info.header_row,
                    row_count: processed.sheet_info.row_count,
                    column_count: processed.sheet_info.column_count,
                },
                group_count: processed.summary.groups.len(),
                total_headcount: processed.summary.total,
                flagged_count,
            },
        }
    }
}

/// Request body for the export endpoint: a table as shown on screen,
/// possibly edited by the user. Written out as-is.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportRequest {
    pub columns: Vec<String>,
    pub rows: Vec<Map<String, Value>>,
}

/// Create an error response body.
pub fn error_response(error: &str) -> Value {
    json!({
        "jobId": Uuid::new_v4().to_string(),
        "status": "error",
        "error": error,
    })
}
