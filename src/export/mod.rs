//! Excel export of result tables.
//!
//! Writes a table — usually the summary, possibly edited by the user in the
//! front end — as a single-sheet workbook: header row, one row per record,
//! no index column. Tables re-entering after edits are written as-is, not
//! re-validated.

use std::path::Path;

use rust_xlsxwriter::{Workbook, Worksheet};
use serde_json::{Map, Value};

use crate::error::ExportResult;
use crate::models::EXPORT_SHEET_NAME;

/// Render a table as xlsx workbook bytes.
///
/// Cells are written by JSON type: strings as text, numbers as numbers,
/// booleans as their text form, nulls left empty.
pub fn table_to_xlsx(
    headers: &[String],
    rows: &[Map<String, Value>],
) -> ExportResult<Vec<u8>> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(EXPORT_SHEET_NAME)?;

    for (col, name) in headers.iter().enumerate() {
        worksheet.write_string(0, col as u16, name)?;
    }

    for (row_idx, record) in rows.iter().enumerate() {
        let row = (row_idx + 1) as u32;
        for (col_idx, header) in headers.iter().enumerate() {
            if let Some(value) = record.get(header) {
                write_value(worksheet, row, col_idx as u16, value)?;
            }
        }
    }

    Ok(workbook.save_to_buffer()?)
}

/// Render a table and write it to disk.
pub fn write_table_file(
    path: &Path,
    headers: &[String],
    rows: &[Map<String, Value>],
) -> ExportResult<()> {
    let bytes = table_to_xlsx(headers, rows)?;
    std::fs::write(path, bytes)?;
    Ok(())
}

fn write_value(ws: &mut Worksheet, row: u32, col: u16, value: &Value) -> ExportResult<()> {
    match value {
        Value::Null => { /* leave cell empty */ }
        Value::String(s) => {
            ws.write_string(row, col, s)?;
        }
        Value::Number(n) => {
            ws.write_number(row, col, n.as_f64().unwrap_or(0.0))?;
        }
        Value::Bool(b) => {
            ws.write_string(row, col, b.to_string())?;
        }
        other => {
            ws.write_string(row, col, other.to_string())?;
        }
    }
    Ok(())
}
