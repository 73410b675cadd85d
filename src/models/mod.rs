//! Domain models for the puestos pipeline.
//!
//! This module contains the core data structures handed between the parser,
//! the grouping engine and the collaborators (CLI, HTTP API, exporter):
//!
//! - [`TableData`] - A dynamic table: ordered headers + one JSON object per row
//! - [`ResolvedColumns`] - The three source column names after label matching
//! - [`GroupKey`] - The (work center, department, job title) triple
//! - [`GroupRecord`] - One aggregated summary row
//! - [`SummaryTable`] - All group records plus the trailing TOTAL row
//!
//! The summary has a fixed schema; the original table is passed through with
//! whatever columns the source workbook had.

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

// =============================================================================
// Fixed Labels & Thresholds
// =============================================================================

/// Header label identifying the work center column.
pub const HEADER_WORK_CENTER: &str = "CENTRO DE TRABAJO";

/// Header label identifying the department column.
pub const HEADER_DEPARTMENT: &str = "DEPARTAMENTO";

/// Header label identifying the job title column.
pub const HEADER_JOB_TITLE: &str = "PUESTO DE TRABAJO";

/// The three labels a row must contain to qualify as the header row.
pub const REQUIRED_HEADERS: [&str; 3] =
    [HEADER_WORK_CENTER, HEADER_DEPARTMENT, HEADER_JOB_TITLE];

/// Summary column holding the headcount per group.
pub const COL_HEADCOUNT: &str = "NÚMERO DE PERSONAS";

/// Summary column holding the low-headcount warning flag.
pub const COL_WARNING: &str = "ADVERTENCIA";

/// Summary column holding the merge suggestion.
pub const COL_SUGGESTION: &str = "PROPUESTA DE UNIFICACIÓN";

/// Warning flag attached to groups at or below [`LOW_HEADCOUNT_MAX`].
pub const LOW_HEADCOUNT_WARNING: &str = "⚠️ Bajo número de personas";

/// Prefix of a concrete merge suggestion, followed by the candidate job title.
pub const SUGGESTION_PREFIX: &str = "Unificar con: ";

/// Suggestion used when no group qualifies as a merge target.
pub const SUGGESTION_FALLBACK: &str = "Unificar con otro puesto del centro";

/// Work center label of the synthetic trailing total row.
pub const TOTAL_LABEL: &str = "TOTAL";

/// Sheet name used when exporting a table to Excel.
pub const EXPORT_SHEET_NAME: &str = "Resumen Puestos";

/// Default filename for the exported workbook.
pub const EXPORT_FILE_NAME: &str = "puestos_procesados.xlsx";

/// Largest headcount that still triggers the low-headcount warning.
pub const LOW_HEADCOUNT_MAX: usize = 2;

/// A merge target must have a headcount strictly above this.
///
/// Note the gap against [`LOW_HEADCOUNT_MAX`]: groups of exactly 3 are
/// neither flagged nor eligible as targets.
pub const MERGE_TARGET_MIN: usize = 3;

// =============================================================================
// Dynamic Table
// =============================================================================

/// A table with an open schema: ordered column names plus one JSON object
/// per row, keyed by column name.
///
/// Used for the passthrough original table, whose columns are unknown ahead
/// of time and not interpreted beyond the three resolved key columns.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableData {
    /// Column names in source order.
    pub headers: Vec<String>,
    /// One object per row.
    pub records: Vec<Map<String, Value>>,
}

// =============================================================================
// Resolved Key Columns
// =============================================================================

/// The actual column names of the three key columns in the source workbook.
///
/// Real-world headers carry annotation text around the canonical labels, so
/// these usually differ from the labels themselves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedColumns {
    pub work_center: String,
    pub department: String,
    pub job_title: String,
}

// =============================================================================
// Group Key & Group Record
// =============================================================================

/// The (work center, department, job title) grouping triple.
///
/// Field order matters: the derived `Ord` gives the ascending
/// (center, department, title) sort the summary relies on.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GroupKey {
    pub work_center: String,
    pub department: String,
    pub job_title: String,
}

impl GroupKey {
    pub fn new(
        work_center: impl Into<String>,
        department: impl Into<String>,
        job_title: impl Into<String>,
    ) -> Self {
        Self {
            work_center: work_center.into(),
            department: department.into(),
            job_title: job_title.into(),
        }
    }
}

/// One aggregated row of the summary table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupRecord {
    pub key: GroupKey,
    pub headcount: usize,
    /// Empty, or [`LOW_HEADCOUNT_WARNING`].
    pub warning: String,
    /// Empty, a `Unificar con: <puesto>` proposal, or [`SUGGESTION_FALLBACK`].
    pub suggestion: String,
}

impl GroupRecord {
    /// A group above the warning threshold: no warning, no suggestion.
    pub fn clean(key: GroupKey, headcount: usize) -> Self {
        Self {
            key,
            headcount,
            warning: String::new(),
            suggestion: String::new(),
        }
    }

    /// A low-headcount group carrying the fixed warning and a suggestion.
    pub fn flagged(key: GroupKey, headcount: usize, suggestion: String) -> Self {
        Self {
            key,
            headcount,
            warning: LOW_HEADCOUNT_WARNING.to_string(),
            suggestion,
        }
    }

    /// Whether this group was flagged as low-headcount.
    pub fn is_flagged(&self) -> bool {
        !self.warning.is_empty()
    }
}

// =============================================================================
// Summary Table
// =============================================================================

/// The aggregated output table: sorted group records plus the TOTAL row.
///
/// Key columns are named after the resolved source columns so the summary
/// lines up with the original table on screen and in the export.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryTable {
    /// Source names of the three key columns.
    pub key_columns: ResolvedColumns,
    /// Group records sorted ascending by (center, department, title).
    pub groups: Vec<GroupRecord>,
    /// Sum of all group headcounts.
    pub total: usize,
}

impl SummaryTable {
    /// Column names of the summary, in output order.
    pub fn columns(&self) -> Vec<String> {
        vec![
            self.key_columns.work_center.clone(),
            self.key_columns.department.clone(),
            self.key_columns.job_title.clone(),
            COL_HEADCOUNT.to_string(),
            COL_WARNING.to_string(),
            COL_SUGGESTION.to_string(),
        ]
    }

    /// Render the summary as row objects, TOTAL row last.
    pub fn to_rows(&self) -> Vec<Map<String, Value>> {
        let mut rows = Vec::with_capacity(self.groups.len() + 1);

        for group in &self.groups {
            rows.push(self.row(
                &group.key.work_center,
                &group.key.department,
                &group.key.job_title,
                group.headcount,
                &group.warning,
                &group.suggestion,
            ));
        }

        rows.push(self.row(TOTAL_LABEL, "", "", self.total, "", ""));
        rows
    }

    fn row(
        &self,
        center: &str,
        department: &str,
        job_title: &str,
        headcount: usize,
        warning: &str,
        suggestion: &str,
    ) -> Map<String, Value> {
        let mut row = Map::new();
        row.insert(self.key_columns.work_center.clone(), json!(center));
        row.insert(self.key_columns.department.clone(), json!(department));
        row.insert(self.key_columns.job_title.clone(), json!(job_title));
        row.insert(COL_HEADCOUNT.to_string(), json!(headcount));
        row.insert(COL_WARNING.to_string(), json!(warning));
        row.insert(COL_SUGGESTION.to_string(), json!(suggestion));
        row
    }

    /// Number of groups flagged as low-headcount.
    pub fn flagged_count(&self) -> usize {
        self.groups.iter().filter(|g| g.is_flagged()).count()
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_columns() -> ResolvedColumns {
        ResolvedColumns {
            work_center: "CENTRO DE TRABAJO".into(),
            department: "DEPARTAMENTO".into(),
            job_title: "PUESTO DE TRABAJO".into(),
        }
    }

    #[test]
    fn test_group_key_ordering() {
        let a = GroupKey::new("A", "X", "Clerk");
        let b = GroupKey::new("A", "X", "Manager");
        let c = GroupKey::new("A", "Y", "Clerk");
        let d = GroupKey::new("B", "A", "Aide");
        assert!(a < b);
        assert!(b < c);
        assert!(c < d);
    }

    #[test]
    fn test_summary_rows_end_with_total() {
        let summary = SummaryTable {
            key_columns: sample_columns(),
            groups: vec![
                GroupRecord::clean(GroupKey::new("A", "X", "Manager"), 4),
                GroupRecord::flagged(
                    GroupKey::new("A", "X", "Clerk"),
                    2,
                    format!("{}Manager", SUGGESTION_PREFIX),
                ),
            ],
            total: 6,
        };

        let rows = summary.to_rows();
        assert_eq!(rows.len(), 3);

        let total = rows.last().unwrap();
        assert_eq!(total["CENTRO DE TRABAJO"], json!(TOTAL_LABEL));
        assert_eq!(total["DEPARTAMENTO"], json!(""));
        assert_eq!(total[COL_HEADCOUNT], json!(6));
        assert_eq!(total[COL_WARNING], json!(""));
    }

    #[test]
    fn test_summary_column_order() {
        let summary = SummaryTable {
            key_columns: ResolvedColumns {
                work_center: "CENTRO DE TRABAJO (COD)".into(),
                department: "DEPARTAMENTO".into(),
                job_title: "PUESTO DE TRABAJO".into(),
            },
            groups: vec![],
            total: 0,
        };

        assert_eq!(
            summary.columns(),
            vec![
                "CENTRO DE TRABAJO (COD)",
                "DEPARTAMENTO",
                "PUESTO DE TRABAJO",
                COL_HEADCOUNT,
                COL_WARNING,
                COL_SUGGESTION,
            ]
        );
    }

    #[test]
    fn test_flagged_count() {
        let summary = SummaryTable {
            key_columns: sample_columns(),
            groups: vec![
                GroupRecord::clean(GroupKey::new("A", "X", "Manager"), 4),
                GroupRecord::flagged(GroupKey::new("A", "X", "Clerk"), 1, SUGGESTION_FALLBACK.into()),
            ],
            total: 5,
        };
        assert_eq!(summary.flagged_count(), 1);
        assert!(summary.groups[1].is_flagged());
        assert!(!summary.groups[0].is_flagged());
    }
}
