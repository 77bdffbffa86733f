//! Writer for user export files

use super::{separator_for, ROLE_SEPARATOR};
use crate::error::CliResult;
use csv::WriterBuilder;
use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

/// Writes `User, Roles` rows to a file or to stdout
pub struct UserTableWriter {
    writer: csv::Writer<Box<dyn Write>>,
}

impl UserTableWriter {
    /// Write to a file; the separator defaults from the file extension
    pub fn create(path: &Path, separator: Option<u8>) -> CliResult<Self> {
        let separator = separator_for(path, separator)?;
        let file = File::create(path)?;
        Ok(Self::from_writer(Box::new(file), separator))
    }

    /// Write to stdout, tab separated unless overridden
    pub fn stdout(separator: Option<u8>) -> Self {
        Self::from_writer(Box::new(io::stdout()), separator.unwrap_or(b'\t'))
    }

    pub fn from_writer(writer: Box<dyn Write>, separator: u8) -> Self {
        let writer = WriterBuilder::new()
            .delimiter(separator)
            .flexible(true)
            .from_writer(writer);
        Self { writer }
    }

    pub fn write_header(&mut self) -> CliResult<()> {
        self.writer.write_record(["User", "Roles"])?;
        Ok(())
    }

    pub fn write_row(&mut self, user: &str, roles: &[String]) -> CliResult<()> {
        let joined = roles.join(&ROLE_SEPARATOR.to_string());
        self.writer.write_record([user, joined.as_str()])?;
        Ok(())
    }

    pub fn finish(mut self) -> CliResult<()> {
        self.writer.flush()?;
        Ok(())
    }
}
