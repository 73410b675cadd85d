//! Header row location.
//!
//! Rosters exported from payroll systems carry a variable number of title,
//! logo and date rows before the real header. The locator scans the raw,
//! headerless grid for the first row that contains all three required
//! labels and returns its zero-based index.

use calamine::{Data, Range};

use super::cell_to_string;
use crate::models::REQUIRED_HEADERS;

/// Find the first row whose cells contain all three required header labels.
///
/// Cells are stringified, trimmed and upper-cased before comparison, so
/// numeric or blank cells in the same row are tolerated. The labels must
/// appear as exact members of the row; their column order is irrelevant.
/// Returns `None` when no row qualifies.
pub fn find_header_row(range: &Range<Data>) -> Option<usize> {
    range.rows().position(is_header_row)
}

fn is_header_row(row: &[Data]) -> bool {
    let cells: Vec<String> = row
        .iter()
        .map(|cell| cell_to_string(cell).trim().to_uppercase())
        .collect();

    REQUIRED_HEADERS
        .iter()
        .all(|label| cells.iter().any(|cell| cell == label))
}
