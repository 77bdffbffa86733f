//! Single-sheet `.xlsx` workbooks

use crate::error::{CliError, CliResult};
use calamine::{open_workbook, Reader, Xlsx};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Read every row of the only sheet of a workbook as text cells
///
/// Rows and columns before the first used cell are kept as blanks so that
/// header counting and column positions match the sheet as displayed.
pub(crate) fn read_sheet(path: &Path) -> CliResult<Vec<Vec<String>>> {
    if !path.exists() {
        return Err(CliError::Io(format!("No such file: {}", path.display())));
    }
    let mut workbook: Xlsx<BufReader<File>> = open_workbook(path)
        .map_err(|e| CliError::Table(format!("Failed to read {}: {e}", path.display())))?;

    let sheets = workbook.sheet_names();
    let [sheet] = sheets.as_slice() else {
        return Err(CliError::Table(format!(
            "{} must contain exactly one sheet, found {}",
            path.display(),
            sheets.len()
        )));
    };
    let range = workbook
        .worksheet_range(sheet)
        .map_err(|e| CliError::Table(format!("Failed to read sheet '{sheet}': {e}")))?;

    let (first_row, first_col) = range.start().unwrap_or((0, 0));
    let mut rows = vec![Vec::new(); first_row as usize];
    for cells in range.rows() {
        let mut row = vec![String::new(); first_col as usize];
        row.extend(cells.iter().map(|cell| cell.to_string()));
        rows.push(row);
    }
    Ok(rows)
}
