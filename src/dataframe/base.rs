use std::collections::HashMap;

use crate::column::{Column, ColumnType};
use crate::error::{Error, Result};
use crate::na::NA;
use crate::series::Series;

/// Column-oriented table with missing-value aware columns
///
/// Every row keeps the label it had when the table was first built, so a
/// filtered table can always be traced back to the rows of its source.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DataFrame {
    /// Columns in insertion order
    columns: Vec<Column>,

    /// Column name to position in `columns`
    positions: HashMap<String, usize>,

    /// Row labels
    index: Vec<usize>,
}

impl DataFrame {
    /// Create an empty DataFrame
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of rows
    pub fn row_count(&self) -> usize {
        self.index.len()
    }

    /// Number of columns
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Row labels in row order
    pub fn index(&self) -> &[usize] {
        &self.index
    }

    /// Column names in insertion order
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name()).collect()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.positions.contains_key(name)
    }

    /// Add a column, or replace the column of the same name in place
    ///
    /// The first column added to an empty DataFrame fixes the row count and
    /// the row labels `0..n`.
    pub fn add_column(&mut self, column: impl Into<Column>) -> Result<()> {
        let column = column.into();

        if self.columns.is_empty() && self.index.is_empty() {
            self.index = (0..column.len()).collect();
        } else if column.len() != self.row_count() {
            return Err(Error::InconsistentRowCount {
                expected: self.row_count(),
                found: column.len(),
            });
        }

        match self.positions.get(column.name()) {
            Some(&pos) => self.columns[pos] = column,
            None => {
                self.positions
                    .insert(column.name().to_string(), self.columns.len());
                self.columns.push(column);
            }
        }
        Ok(())
    }

    /// Add or replace a float column from NA-wrapped values
    pub fn add_float_column(&mut self, name: &str, values: Vec<NA<f64>>) -> Result<()> {
        self.add_column(Series::new(values, name))
    }

    /// Look up a column by name
    pub fn column(&self, name: &str) -> Result<&Column> {
        self.positions
            .get(name)
            .map(|&pos| &self.columns[pos])
            .ok_or_else(|| Error::ColumnNotFound(name.to_string()))
    }

    /// Look up a float column by name
    pub fn float_column(&self, name: &str) -> Result<&Series<f64>> {
        match self.column(name)? {
            Column::Float64(s) => Ok(s),
            other => Err(Error::ColumnTypeMismatch {
                name: name.to_string(),
                expected: ColumnType::Float64.as_str(),
                found: other.column_type().as_str(),
            }),
        }
    }

    /// Iterate over columns in insertion order
    pub fn columns(&self) -> impl Iterator<Item = &Column> {
        self.columns.iter()
    }

    /// Keep the rows whose mask entry is `true`
    pub fn filter_by_mask(&self, mask: &[bool]) -> Result<DataFrame> {
        if mask.len() != self.row_count() {
            return Err(Error::InconsistentRowCount {
                expected: self.row_count(),
                found: mask.len(),
            });
        }

        let positions: Vec<usize> = mask
            .iter()
            .enumerate()
            .filter_map(|(i, &keep)| if keep { Some(i) } else { None })
            .collect();

        Ok(self.take_rows(&positions))
    }

    /// Keep the rows where the float column has a present value matching the predicate
    pub fn filter_float<F>(&self, name: &str, predicate: F) -> Result<DataFrame>
    where
        F: Fn(f64) -> bool,
    {
        let mask = self.float_column(name)?.mask(|v| predicate(*v));
        self.filter_by_mask(&mask)
    }

    /// Rows where `|column| < limit`
    pub fn within(&self, name: &str, limit: f64) -> Result<DataFrame> {
        self.filter_float(name, |v| v.abs() < limit)
    }

    fn take_rows(&self, positions: &[usize]) -> DataFrame {
        DataFrame {
            columns: self.columns.iter().map(|c| c.take(positions)).collect(),
            positions: self.positions.clone(),
            index: positions.iter().map(|&i| self.index[i]).collect(),
        }
    }
}
