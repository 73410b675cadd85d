//! Key column resolution by label matching.

use crate::error::{ProcessError, ProcessResult};
use crate::models::{
    ResolvedColumns, HEADER_DEPARTMENT, HEADER_JOB_TITLE, HEADER_WORK_CENTER,
};

/// Resolve the three key columns among the table's column names.
///
/// A label matches the first column whose trimmed, upper-cased name
/// *contains* it. Substring matching is intentional: real-world headers
/// carry annotation text around the canonical labels (trailing codes,
/// parenthesised notes), so an exact match would be too brittle.
pub fn resolve_columns(headers: &[String]) -> ProcessResult<ResolvedColumns> {
    Ok(ResolvedColumns {
        work_center: match_column(HEADER_WORK_CENTER, headers)?,
        department: match_column(HEADER_DEPARTMENT, headers)?,
        job_title: match_column(HEADER_JOB_TITLE, headers)?,
    })
}

fn match_column(label: &str, headers: &[String]) -> ProcessResult<String> {
    headers
        .iter()
        .find(|header| header.trim().to_uppercase().contains(label))
        .cloned()
        .ok_or_else(|| ProcessError::ColumnNotFound(label.to_string()))
}
