//! Restartable reader over a user import file

use super::spreadsheet;
use super::{format_for, TableFormat, TableOptions, ROLE_SEPARATOR};
use crate::error::CliResult;
use csv::{ReaderBuilder, StringRecordsIntoIter, Trim};
use std::fs::File;
use std::path::{Path, PathBuf};

/// One desired-state row of an import file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRow {
    pub name: String,
    /// Raw role cell split on ':'; may contain blanks and duplicates
    pub roles: Vec<String>,
    pub password: String,
}

impl UserRow {
    fn from_cells(cells: &[String]) -> Option<Self> {
        let cell = |i: usize| cells.get(i).map(|c| c.trim()).unwrap_or("");

        let name = cell(0);
        if name.is_empty() {
            return None;
        }
        Some(Self {
            name: name.to_string(),
            roles: cell(1)
                .split(ROLE_SEPARATOR)
                .map(|r| r.trim().to_string())
                .collect(),
            password: cell(2).to_string(),
        })
    }
}

/// A user file that can be traversed any number of times
///
/// The number of rows is counted when the table is opened so progress can
/// be reported before the first row is processed.
#[derive(Debug, Clone)]
pub struct UserTable {
    path: PathBuf,
    format: TableFormat,
    header_size: usize,
    count: usize,
}

impl UserTable {
    pub fn open(path: impl AsRef<Path>, options: TableOptions) -> CliResult<Self> {
        let path = path.as_ref().to_path_buf();
        let format = format_for(&path, options.separator)?;
        let mut table = Self {
            path,
            format,
            header_size: options.header_size,
            count: 0,
        };

        let mut count = 0;
        for row in table.rows()? {
            row?;
            count += 1;
        }
        table.count = count;
        Ok(table)
    }

    /// Number of rows with a non-empty user name
    pub fn count(&self) -> usize {
        self.count
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Start a new pass over the file
    pub fn rows(&self) -> CliResult<UserRows> {
        let records = match self.format {
            TableFormat::Delimited(separator) => {
                let file = File::open(&self.path)?;
                let reader = ReaderBuilder::new()
                    .has_headers(false)
                    .flexible(true)
                    .delimiter(separator)
                    .trim(Trim::All)
                    .from_reader(file);
                Records::Delimited(reader.into_records())
            }
            TableFormat::Spreadsheet => {
                Records::Spreadsheet(spreadsheet::read_sheet(&self.path)?.into_iter())
            }
        };

        Ok(UserRows {
            records,
            skip: self.header_size,
        })
    }
}

enum Records {
    Delimited(StringRecordsIntoIter<File>),
    Spreadsheet(std::vec::IntoIter<Vec<String>>),
}

impl Iterator for Records {
    type Item = CliResult<Vec<String>>;

    fn next(&mut self) -> Option<Self::Item> {
        match self {
            Records::Delimited(records) => Some(
                records
                    .next()?
                    .map(|record| record.iter().map(str::to_string).collect())
                    .map_err(Into::into),
            ),
            Records::Spreadsheet(rows) => rows.next().map(Ok),
        }
    }
}

/// Iterator over the rows of one pass
pub struct UserRows {
    records: Records,
    skip: usize,
}

impl Iterator for UserRows {
    type Item = CliResult<UserRow>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let cells = match self.records.next()? {
                Ok(cells) => cells,
                Err(e) => return Some(Err(e)),
            };
            if self.skip > 0 {
                self.skip -= 1;
                continue;
            }
            if let Some(row) = UserRow::from_cells(&cells) {
                return Some(Ok(row));
            }
        }
    }
}
