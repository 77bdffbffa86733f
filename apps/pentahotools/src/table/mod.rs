//! Tabular user files for import and export
//!
//! Import files have three columns: user, roles, password. Roles are joined
//! with ':' inside their cell. `.csv` files default to ',' as separator,
//! `.tsv` and `.txt` files to a tab. `.xlsx` workbooks with a single sheet
//! are read as well.

mod reader;
mod spreadsheet;
mod writer;

pub use reader::{UserRow, UserRows, UserTable};
pub use writer::UserTableWriter;

use crate::error::{CliError, CliResult};
use std::path::Path;

/// Separator between roles inside the roles cell
pub const ROLE_SEPARATOR: char = ':';

/// Options controlling how a user file is read
#[derive(Debug, Clone)]
pub struct TableOptions {
    /// Column separator; derived from the file extension when unset
    pub separator: Option<u8>,
    /// Number of leading records skipped as headers
    pub header_size: usize,
}

impl Default for TableOptions {
    fn default() -> Self {
        Self {
            separator: None,
            header_size: 1,
        }
    }
}

/// Parse a `--separator` value: a single ASCII character, or `\t` / `tab`
pub fn parse_separator(value: &str) -> CliResult<u8> {
    match value {
        "\\t" | "tab" | "\t" => Ok(b'\t'),
        _ if value.len() == 1 && value.is_ascii() => Ok(value.as_bytes()[0]),
        _ => Err(CliError::Validation(format!(
            "Separator must be a single ASCII character, got '{value}'"
        ))),
    }
}

/// How the rows of a user file are stored
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TableFormat {
    Delimited(u8),
    Spreadsheet,
}

/// Resolve the format of a file to read
pub(crate) fn format_for(path: &Path, explicit: Option<u8>) -> CliResult<TableFormat> {
    if explicit.is_none() && has_extension(path, "xlsx") {
        return Ok(TableFormat::Spreadsheet);
    }
    separator_for(path, explicit).map(TableFormat::Delimited)
}

fn has_extension(path: &Path, expected: &str) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case(expected))
}

/// Resolve the column separator for a delimited file
pub(crate) fn separator_for(path: &Path, explicit: Option<u8>) -> CliResult<u8> {
    if let Some(separator) = explicit {
        return Ok(separator);
    }
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();
    match extension.as_str() {
        "csv" => Ok(b','),
        "tsv" | "txt" => Ok(b'\t'),
        _ => Err(CliError::Table(format!(
            "Unsupported file: {} (use .csv, .tsv or .txt, or pass --separator)",
            path.display()
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_separator() {
        assert_eq!(parse_separator(",").unwrap(), b',');
        assert_eq!(parse_separator("\\t").unwrap(), b'\t');
        assert_eq!(parse_separator("tab").unwrap(), b'\t');
        assert!(parse_separator(";;").is_err());
    }

    #[test]
    fn test_separator_from_extension() {
        assert_eq!(separator_for(Path::new("users.CSV"), None).unwrap(), b',');
        assert_eq!(separator_for(Path::new("users.tsv"), None).unwrap(), b'\t');
        assert_eq!(separator_for(Path::new("users.txt"), None).unwrap(), b'\t');
    }

    #[test]
    fn test_xlsx_is_read_as_spreadsheet() {
        assert_eq!(
            format_for(Path::new("users.XLSX"), None).unwrap(),
            TableFormat::Spreadsheet
        );
        assert_eq!(
            format_for(Path::new("users.xlsx"), Some(b',')).unwrap(),
            TableFormat::Delimited(b',')
        );
        assert_eq!(
            format_for(Path::new("users.csv"), None).unwrap(),
            TableFormat::Delimited(b',')
        );
    }

    #[test]
    fn test_unknown_extension_needs_separator() {
        let err = separator_for(Path::new("users.xlsx"), None).unwrap_err();
        assert!(matches!(err, CliError::Table(_)));
        assert_eq!(
            separator_for(Path::new("users.dat"), Some(b';')).unwrap(),
            b';'
        );
    }
}
