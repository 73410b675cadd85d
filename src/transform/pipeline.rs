//! High-level pipeline API: workbook bytes in, two tables out.
//!
//! Combines all steps — parsing with header auto-location, key column
//! resolution, grouping and classification — into a single synchronous
//! call. Each invocation is self-contained; nothing is cached between
//! calls.
//!
//! # Example
//!
//! ```rust,ignore
//! use puestos::{process_bytes, Engine};
//!
//! let bytes = std::fs::read("plantilla.xlsx")?;
//! let processed = process_bytes(&bytes, Engine::Xlsx)?;
//! println!("{} groups", processed.summary.groups.len());
//! ```

use serde::Serialize;

use super::columns::resolve_columns;
use super::grouper::{build_summary, count_groups};
use crate::api::logs::{log_info, log_success};
use crate::error::ProcessResult;
use crate::models::{SummaryTable, TableData};
use crate::parser::{parse_bytes, Engine};

/// Metadata about the parsed sheet, for display by the CLI and API.
#[derive(Debug, Clone, Serialize)]
pub struct SheetInfo {
    pub engine: Engine,
    pub header_row: usize,
    pub row_count: usize,
    pub column_count: usize,
}

/// Result of a complete pipeline run.
#[derive(Debug, Clone, Serialize)]
pub struct Processed {
    /// The unfiltered, unmodified passthrough table.
    pub original: TableData,
    /// The grouped summary, TOTAL row included on render.
    pub summary: SummaryTable,
    /// Sheet metadata.
    pub sheet_info: SheetInfo,
}

/// Process workbook bytes into the original table and the summary table.
///
/// Fails as a whole on an unreadable workbook, a missing header row or an
/// unresolvable key column; no partial output is produced.
pub fn process_bytes(bytes: &[u8], engine: Engine) -> ProcessResult<Processed> {
    log_info(format!(
        "📖 Reading {} workbook ({} bytes)...",
        engine,
        bytes.len()
    ));
    let parsed = parse_bytes(bytes, engine)?;
    log_success(format!("Header row located at index {}", parsed.header_row));
    log_success(format!(
        "Read {} data rows, {} columns",
        parsed.records.len(),
        parsed.headers.len()
    ));

    let columns = resolve_columns(&parsed.headers)?;
    log_success(format!(
        "Key columns: '{}' / '{}' / '{}'",
        columns.work_center, columns.department, columns.job_title
    ));

    let groups = count_groups(&parsed.records, &columns);
    log_info(format!("📦 Grouped into {} job titles:", groups.len()));
    for (key, count) in &groups {
        log_info(format!(
            "{} | {} | {} → {}",
            key.work_center, key.department, key.job_title, count
        ));
    }

    let summary = build_summary(groups, columns);
    log_success(format!(
        "{} groups, total headcount {}, {} flagged",
        summary.groups.len(),
        summary.total,
        summary.flagged_count()
    ));

    let sheet_info = SheetInfo {
        engine,
        header_row: parsed.header_row,
        row_count: parsed.records.len(),
        column_count: parsed.headers.len(),
    };

    Ok(Processed {
        original: TableData {
            headers: parsed.headers,
            records: parsed.records,
        },
        summary,
        sheet_info,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ProcessError, SheetError};
    use crate::models::{COL_HEADCOUNT, SUGGESTION_FALLBACK, TOTAL_LABEL};
    use rust_xlsxwriter::Workbook;
    use serde_json::json;

    fn roster_bytes(header_prefix_rows: &[&str], rows: &[(&str, &str, &str)]) -> Vec<u8> {
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();

        let mut r = 0u32;
        for title in header_prefix_rows {
            if !title.is_empty() {
                worksheet.write_string(r, 0, *title).unwrap();
            }
            r += 1;
        }

        worksheet.write_string(r, 0, "NOMBRE").unwrap();
        worksheet.write_string(r, 1, "CENTRO DE TRABAJO").unwrap();
        worksheet.write_string(r, 2, "DEPARTAMENTO").unwrap();
        worksheet.write_string(r, 3, "PUESTO DE TRABAJO").unwrap();
        r += 1;

        for (i, (center, department, job_title)) in rows.iter().enumerate() {
            worksheet.write_string(r, 0, format!("Empleado {i}")).unwrap();
            worksheet.write_string(r, 1, *center).unwrap();
            worksheet.write_string(r, 2, *department).unwrap();
            worksheet.write_string(r, 3, *job_title).unwrap();
            r += 1;
        }

        workbook.save_to_buffer().unwrap()
    }

    #[test]
    fn test_end_to_end_summary() {
        let rows: Vec<(&str, &str, &str)> = std::iter::repeat(("A", "X", "Clerk"))
            .take(2)
            .chain(std::iter::repeat(("A", "X", "Manager")).take(4))
            .collect();
        let bytes = roster_bytes(&["Plantilla 2024", ""], &rows);

        let processed = process_bytes(&bytes, Engine::Xlsx).unwrap();

        assert_eq!(processed.sheet_info.header_row, 2);
        assert_eq!(processed.sheet_info.row_count, 6);
        assert_eq!(processed.original.records.len(), 6);
        assert_eq!(processed.original.headers.len(), 4);

        let summary = &processed.summary;
        assert_eq!(summary.key_columns.work_center, "CENTRO DE TRABAJO");
        assert_eq!(summary.groups.len(), 2);
        assert_eq!(summary.total, 6);
        assert_eq!(summary.groups[0].suggestion, "Unificar con: Manager");

        let rendered = summary.to_rows();
        assert_eq!(rendered.len(), 3);
        assert_eq!(rendered[2]["CENTRO DE TRABAJO"], json!(TOTAL_LABEL));
        assert_eq!(rendered[2][COL_HEADCOUNT], json!(6));
    }

    #[test]
    fn test_padded_header_cells_still_resolve() {
        // The locator trims cells before comparing, so a padded header row
        // is found; the resolver then has to match the raw, padded column
        // name by normalized substring.
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        worksheet.write_string(0, 0, "  CENTRO DE TRABAJO  ").unwrap();
        worksheet.write_string(0, 1, "DEPARTAMENTO").unwrap();
        worksheet.write_string(0, 2, "puesto de trabajo").unwrap();
        worksheet.write_string(1, 0, "A").unwrap();
        worksheet.write_string(1, 1, "X").unwrap();
        worksheet.write_string(1, 2, "Clerk").unwrap();
        let bytes = workbook.save_to_buffer().unwrap();

        let processed = process_bytes(&bytes, Engine::Xlsx).unwrap();
        assert_eq!(processed.summary.key_columns.work_center, "  CENTRO DE TRABAJO  ");
        assert_eq!(processed.summary.key_columns.job_title, "puesto de trabajo");
        assert_eq!(processed.summary.groups.len(), 1);
    }

    #[test]
    fn test_lone_small_group_gets_fallback() {
        let bytes = roster_bytes(&[], &[("A", "X", "Clerk")]);

        let processed = process_bytes(&bytes, Engine::Xlsx).unwrap();
        assert_eq!(processed.summary.groups[0].suggestion, SUGGESTION_FALLBACK);
    }

    #[test]
    fn test_idempotent_on_same_bytes() {
        let bytes = roster_bytes(
            &["Plantilla"],
            &[("A", "X", "Clerk"), ("A", "X", "Clerk"), ("B", "Y", "Aide")],
        );

        let first = process_bytes(&bytes, Engine::Xlsx).unwrap();
        let second = process_bytes(&bytes, Engine::Xlsx).unwrap();
        assert_eq!(first.summary.groups, second.summary.groups);
        assert_eq!(first.summary.total, second.summary.total);
    }

    #[test]
    fn test_missing_header_row_fails_whole_invocation() {
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        worksheet.write_string(0, 0, "NOMBRE").unwrap();
        worksheet.write_string(1, 0, "Ana").unwrap();
        let bytes = workbook.save_to_buffer().unwrap();

        let err = process_bytes(&bytes, Engine::Xlsx).unwrap_err();
        assert!(matches!(
            err,
            ProcessError::Sheet(SheetError::HeaderNotFound)
        ));
    }
}
