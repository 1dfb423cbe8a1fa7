#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use std::path::Path;

use calamine::{Data, Reader, open_workbook_auto};

use super::TableError;

/// Renders one spreadsheet cell the way a delimited file would have spelled
/// it, so both sources share the same row handling.
fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Float(f) => f.to_string(),
        Data::Int(i) => i.to_string(),
        other => other.to_string(),
    }
}

/// Reads every row of the first worksheet in `path` as text cells.
pub(super) fn read_rows(path: &Path) -> Result<Vec<Vec<String>>, TableError> {
    let table = path.display().to_string();
    let spreadsheet_err = |reason: String| TableError::Spreadsheet {
        table: table.clone(),
        reason,
    };

    let mut workbook = open_workbook_auto(path).map_err(|e| spreadsheet_err(e.to_string()))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| spreadsheet_err("workbook has no worksheets".into()))?
        .map_err(|e| spreadsheet_err(e.to_string()))?;

    Ok(range
        .rows()
        .map(|row| row.iter().map(cell_text).collect::<Vec<_>>())
        .filter(|row| row.iter().any(|cell| !cell.trim().is_empty()))
        .collect())
}
