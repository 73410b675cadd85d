//! Excel workbook parsing into dynamic JSON records.
//!
//! Reads the first sheet of an `.xls` or `.xlsx` byte stream, locates the
//! header row (see [`locator`]) and converts every following row into a JSON
//! object keyed by column name. No roster-specific logic here beyond the
//! header location; columns are passed through untouched.

use std::io::Cursor;
use std::path::Path;

use calamine::{Data, Range, Reader, Xls, Xlsx};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

use crate::error::{SheetError, SheetResult};

pub mod locator;

pub use locator::find_header_row;

// =============================================================================
// Reader Engine
// =============================================================================

/// Workbook reader engine, selected from the file extension by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Engine {
    /// Legacy binary format (`.xls`).
    Xls,
    /// Office Open XML format (`.xlsx`).
    Xlsx,
}

impl Engine {
    /// Select the engine for a file extension, with or without leading dot.
    pub fn from_extension(ext: &str) -> SheetResult<Self> {
        match ext.trim_start_matches('.').to_lowercase().as_str() {
            "xls" => Ok(Engine::Xls),
            "xlsx" => Ok(Engine::Xlsx),
            _ => Err(SheetError::UnsupportedFormat(ext.to_string())),
        }
    }

    /// Select the engine from a file path's extension.
    pub fn from_path(path: &Path) -> SheetResult<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .ok_or_else(|| SheetError::UnsupportedFormat(path.display().to_string()))?;
        Self::from_extension(ext)
    }
}

impl std::fmt::Display for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Engine::Xls => write!(f, "xls"),
            Engine::Xlsx => write!(f, "xlsx"),
        }
    }
}

// =============================================================================
// Raw Grid Reading
// =============================================================================

/// Read the first sheet of the workbook as a raw, headerless grid.
pub fn read_raw(bytes: &[u8], engine: Engine) -> SheetResult<Range<Data>> {
    let cursor = Cursor::new(bytes);
    match engine {
        Engine::Xls => {
            let mut workbook: Xls<_> = Xls::new(cursor).map_err(calamine::Error::from)?;
            first_sheet_range(&mut workbook)
        }
        Engine::Xlsx => {
            let mut workbook: Xlsx<_> = Xlsx::new(cursor).map_err(calamine::Error::from)?;
            first_sheet_range(&mut workbook)
        }
    }
}

fn first_sheet_range<RS, R>(workbook: &mut R) -> SheetResult<Range<Data>>
where
    RS: std::io::Read + std::io::Seek,
    R: Reader<RS>,
    calamine::Error: From<R::Error>,
{
    let sheet_name = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or(SheetError::NoSheets)?;

    let range = workbook
        .worksheet_range(&sheet_name)
        .map_err(calamine::Error::from)?;

    Ok(range)
}

// =============================================================================
// Headered Parsing
// =============================================================================

/// Result of parsing a workbook with the located header row.
#[derive(Debug, Clone, Serialize)]
pub struct ParseResult {
    /// Parsed records as JSON objects, one per data row.
    pub records: Vec<Map<String, Value>>,
    /// Column names taken from the header row, in sheet order.
    pub headers: Vec<String>,
    /// Zero-based index of the located header row.
    pub header_row: usize,
    /// Engine the workbook was read with.
    pub engine: Engine,
}

/// Parse workbook bytes into headered records.
///
/// Locates the header row in the raw grid, takes its cells as column names
/// and converts every subsequent row into a JSON object. Fails with
/// [`SheetError::HeaderNotFound`] when no row carries the required labels.
pub fn parse_bytes(bytes: &[u8], engine: Engine) -> SheetResult<ParseResult> {
    let range = read_raw(bytes, engine)?;

    let header_row = find_header_row(&range).ok_or(SheetError::HeaderNotFound)?;

    let rows: Vec<&[Data]> = range.rows().collect();
    let headers: Vec<String> = rows[header_row].iter().map(cell_to_string).collect();

    let mut records = Vec::with_capacity(rows.len() - header_row - 1);
    for row in rows.iter().skip(header_row + 1) {
        let mut obj = Map::new();
        for (i, header) in headers.iter().enumerate() {
            let value = row.get(i).map(cell_to_json).unwrap_or(Value::Null);
            obj.insert(header.clone(), value);
        }
        records.push(obj);
    }

    Ok(ParseResult {
        records,
        headers,
        header_row,
        engine,
    })
}

// =============================================================================
// Cell Conversion
// =============================================================================

/// Stringify a cell the way it displays: integral floats without the
/// fractional part, blanks as the empty string.
pub(crate) fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) if f.fract() == 0.0 => (*f as i64).to_string(),
        Data::Float(f) => f.to_string(),
        Data::Bool(b) => b.to_string(),
        Data::DateTime(dt) => dt.as_f64().to_string(),
        Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
        Data::Error(e) => e.to_string(),
    }
}

/// Convert a cell into its JSON representation for the record table.
fn cell_to_json(cell: &Data) -> Value {
    match cell {
        Data::Empty => Value::Null,
        Data::String(s) => Value::String(s.clone()),
        Data::Int(i) => Value::Number((*i).into()),
        Data::Float(f) if f.fract() == 0.0 => Value::Number((*f as i64).into()),
        Data::Float(f) => Number::from_f64(*f)
            .map(Value::Number)
            .unwrap_or(Value::Null),
        Data::Bool(b) => Value::Bool(*b),
        Data::DateTime(dt) => Number::from_f64(dt.as_f64())
            .map(Value::Number)
            .unwrap_or(Value::Null),
        Data::DateTimeIso(s) | Data::DurationIso(s) => Value::String(s.clone()),
        Data::Error(e) => Value::String(e.to_string()),
    }
}
