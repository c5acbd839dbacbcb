//! Row-normalized cross-tabulation of pay tier against experience
//!
//! Each row holds the percentage of that tier's records falling into each
//! experience value, so every non-empty row sums to 100.

use std::collections::HashMap;

use thiserror::Error;

use crate::dataset::{Dataset, DatasetError, FieldPair};

/// Errors that can occur while tabulating
#[derive(Error, Debug)]
pub enum CrossTabError {
    #[error(transparent)]
    Dataset(#[from] DatasetError),

    #[error("no rows with both '{source_field}' and '{destination_field}' values")]
    Empty {
        source_field: String,
        destination_field: String,
    },
}

/// Percentage matrix: rows are tier values, columns are experience values
#[derive(Debug, Clone, PartialEq)]
pub struct CrossTab {
    rows: Vec<String>,
    columns: Vec<String>,
    percentages: Vec<Vec<f64>>,
    record_count: usize,
}

impl CrossTab {
    /// Tabulate every row of `dataset`.
    ///
    /// Rows with a blank or missing value are dropped. A missing column or an
    /// unreadable row aborts the whole computation.
    pub fn from_dataset(dataset: &Dataset, fields: &FieldPair) -> Result<Self, CrossTabError> {
        let relationships = dataset.relationships(fields)?;
        if let Some(column) = relationships.missing_column() {
            return Err(DatasetError::MissingColumn(column.to_string()).into());
        }

        let mut pairs = Vec::new();
        for item in relationships {
            if let Some(record) = item? {
                pairs.push((record.source, record.destination));
            }
        }

        if pairs.is_empty() {
            return Err(CrossTabError::Empty {
                source_field: fields.source.clone(),
                destination_field: fields.destination.clone(),
            });
        }

        Ok(Self::from_pairs(pairs))
    }

    /// Tabulate raw `(tier, experience)` pairs
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut counts: HashMap<(String, String), usize> = HashMap::new();
        let mut record_count = 0;
        for pair in pairs {
            *counts.entry(pair).or_insert(0) += 1;
            record_count += 1;
        }

        let rows = sorted_categories(counts.keys().map(|(r, _)| r.as_str()));
        let columns = sorted_categories(counts.keys().map(|(_, c)| c.as_str()));

        let percentages = rows
            .iter()
            .map(|row| {
                let cells: Vec<usize> = columns
                    .iter()
                    .map(|col| {
                        counts
                            .get(&(row.clone(), col.clone()))
                            .copied()
                            .unwrap_or(0)
                    })
                    .collect();
                let total: usize = cells.iter().sum();
                cells
                    .into_iter()
                    .map(|n| {
                        if total == 0 {
                            0.0
                        } else {
                            n as f64 / total as f64 * 100.0
                        }
                    })
                    .collect()
            })
            .collect();

        Self {
            rows,
            columns,
            percentages,
            record_count,
        }
    }

    /// Tier values, ascending
    pub fn rows(&self) -> &[String] {
        &self.rows
    }

    /// Experience values, ascending
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn row_percentages(&self, index: usize) -> Option<&[f64]> {
        self.percentages.get(index).map(Vec::as_slice)
    }

    pub fn percentage(&self, row: &str, column: &str) -> Option<f64> {
        let r = self.rows.iter().position(|v| v == row)?;
        let c = self.columns.iter().position(|v| v == column)?;
        Some(self.percentages[r][c])
    }

    /// Number of records that were tabulated
    pub fn record_count(&self) -> usize {
        self.record_count
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Distinct values in ascending order.
///
/// Numeric when every value parses as a number, lexical otherwise.
fn sorted_categories<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut distinct: Vec<String> = values.map(str::to_string).collect();
    distinct.sort();
    distinct.dedup();

    let numeric: Option<Vec<f64>> = distinct.iter().map(|v| v.trim().parse().ok()).collect();
    if let Some(numbers) = numeric {
        let mut keyed: Vec<(f64, String)> = numbers.into_iter().zip(distinct).collect();
        keyed.sort_by(|a, b| a.0.total_cmp(&b.0).then_with(|| a.1.cmp(&b.1)));
        return keyed.into_iter().map(|(_, v)| v).collect();
    }

    distinct
}
