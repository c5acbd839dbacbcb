//! CSV input for both pipelines
//!
//! Reads the employee table fully into memory and yields one
//! [`RelationshipRecord`] per row, reduced to the two categorical columns
//! named by a [`FieldPair`]. Columns are located by header name; a column
//! that is not present is an absence marker, never a panic.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use csv::{ReaderBuilder, StringRecord, StringRecordsIntoIter};
use thiserror::Error;

/// Default input file name
pub const DEFAULT_INPUT_FILE: &str = "Employee_cleaned.csv";

/// Default source column (pay tier)
pub const DEFAULT_SOURCE_FIELD: &str = "PaymentTier";

/// Default destination column (years of experience in the current domain)
pub const DEFAULT_DESTINATION_FIELD: &str = "ExperienceInCurrentDomain";

/// Errors that can occur when reading the input table
#[derive(Error, Debug)]
pub enum DatasetError {
    #[error("input file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("column '{0}' not found in input")]
    MissingColumn(String),
}

impl DatasetError {
    /// Whether the input file itself could not be found
    pub fn is_not_found(&self) -> bool {
        matches!(self, DatasetError::NotFound(_))
    }
}

/// Names of the two categorical columns that form a relationship
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldPair {
    pub source: String,
    pub destination: String,
}

impl FieldPair {
    pub fn new(source: impl Into<String>, destination: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            destination: destination.into(),
        }
    }
}

impl Default for FieldPair {
    fn default() -> Self {
        Self::new(DEFAULT_SOURCE_FIELD, DEFAULT_DESTINATION_FIELD)
    }
}

/// One row of the source table, reduced to its two categorical values
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelationshipRecord {
    pub source: String,
    pub destination: String,
}

/// A fully buffered CSV table
#[derive(Debug, Clone)]
pub struct Dataset {
    path: PathBuf,
    contents: Vec<u8>,
}

impl Dataset {
    /// Read the whole file into memory
    pub fn open(path: &Path) -> Result<Self, DatasetError> {
        let contents = fs::read(path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => DatasetError::NotFound(path.to_path_buf()),
            _ => DatasetError::Io {
                path: path.to_path_buf(),
                source: e,
            },
        })?;

        Ok(Self {
            path: path.to_path_buf(),
            contents,
        })
    }

    /// Wrap in-memory CSV text (no backing file)
    pub fn from_bytes(contents: impl Into<Vec<u8>>) -> Self {
        Self {
            path: PathBuf::from("<memory>"),
            contents: contents.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Iterate over the relationship values of every data row.
    ///
    /// Fails only when the header row cannot be parsed. Per-row problems are
    /// reported through the iterator items.
    pub fn relationships(&self, fields: &FieldPair) -> Result<Relationships<'_>, DatasetError> {
        let mut reader = ReaderBuilder::new()
            .flexible(true)
            .from_reader(self.contents.as_slice());

        let headers = reader.headers()?.clone();
        let source_column = column_index(&headers, &fields.source);
        let destination_column = column_index(&headers, &fields.destination);

        let missing_column = if source_column.is_none() {
            Some(fields.source.clone())
        } else if destination_column.is_none() {
            Some(fields.destination.clone())
        } else {
            None
        };

        Ok(Relationships {
            records: reader.into_records(),
            source_column,
            destination_column,
            missing_column,
        })
    }
}

/// Iterator over the rows of a [`Dataset`].
///
/// Yields `Ok(None)` for rows where either value is absent or blank.
pub struct Relationships<'a> {
    records: StringRecordsIntoIter<&'a [u8]>,
    source_column: Option<usize>,
    destination_column: Option<usize>,
    missing_column: Option<String>,
}

impl Relationships<'_> {
    /// First requested column that the header does not contain
    pub fn missing_column(&self) -> Option<&str> {
        self.missing_column.as_deref()
    }
}

impl Iterator for Relationships<'_> {
    type Item = Result<Option<RelationshipRecord>, DatasetError>;

    fn next(&mut self) -> Option<Self::Item> {
        let record = match self.records.next()? {
            Ok(record) => record,
            Err(e) => return Some(Err(e.into())),
        };

        let source = field_value(&record, self.source_column);
        let destination = field_value(&record, self.destination_column);

        Some(Ok(match (source, destination) {
            (Some(source), Some(destination)) => Some(RelationshipRecord {
                source: source.to_string(),
                destination: destination.to_string(),
            }),
            _ => None,
        }))
    }
}

fn column_index(headers: &StringRecord, name: &str) -> Option<usize> {
    headers.iter().position(|h| h == name)
}

/// Cell lookup: `None` when the column is missing, the row is short, or the
/// value is blank
fn field_value(record: &StringRecord, column: Option<usize>) -> Option<&str> {
    column
        .and_then(|idx| record.get(idx))
        .filter(|value| !value.trim().is_empty())
}
