//! The choice dataset: named columns of per-respondent observations.

use thiserror::Error;

/// Errors raised while loading or validating choice data.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("column {column} has {got} rows, expected {expected}")]
    LengthMismatch {
        column: String,
        expected: usize,
        got: usize,
    },
    #[error("column {column} has a non-finite value at row {row}")]
    NonFiniteValue { column: String, row: usize },
    #[error("duplicate column name: {0}")]
    DuplicateColumn(String),
    #[error("unknown column: {0}")]
    UnknownColumn(String),
    #[error("dataset has no rows")]
    EmptyDataset,
    #[error("choice column {column} is not integral at row {row}: {value}")]
    NonIntegralChoice {
        column: String,
        row: usize,
        value: f64,
    },
    #[error("row {row}: chosen alternative {alternative} is not declared in the specification")]
    UnknownAlternative { row: usize, alternative: i64 },
    #[error("row {row}: chosen alternative {alternative} is not available")]
    ChosenUnavailable { row: usize, alternative: i64 },
}

/// A flat, immutable table of choice observations.
///
/// One row is one respondent/choice task. Columns hold per-alternative
/// attributes (cost, time), 0/1 availability flags, and the chosen
/// alternative id in the designated choice column. The table is loaded once
/// and only read during estimation.
#[derive(Debug, Clone)]
pub struct ChoiceDataset {
    columns: Vec<(String, Vec<f64>)>,
    choice_column: String,
    n_rows: usize,
}

impl ChoiceDataset {
    /// Create an empty dataset whose chosen-alternative ids live in
    /// `choice_column`. The column itself is added with [`add_column`].
    ///
    /// [`add_column`]: ChoiceDataset::add_column
    pub fn new(choice_column: &str) -> Self {
        Self {
            columns: Vec::new(),
            choice_column: choice_column.to_string(),
            n_rows: 0,
        }
    }

    /// Add a named column.
    ///
    /// The first column fixes the row count; later columns must match it.
    /// Non-finite values are rejected with the offending row index.
    pub fn add_column(&mut self, name: &str, values: Vec<f64>) -> Result<(), DataError> {
        if self.column_index(name).is_some() {
            return Err(DataError::DuplicateColumn(name.to_string()));
        }
        if !self.columns.is_empty() && values.len() != self.n_rows {
            return Err(DataError::LengthMismatch {
                column: name.to_string(),
                expected: self.n_rows,
                got: values.len(),
            });
        }
        if let Some(row) = values.iter().position(|v| !v.is_finite()) {
            return Err(DataError::NonFiniteValue {
                column: name.to_string(),
                row,
            });
        }
        if self.columns.is_empty() {
            self.n_rows = values.len();
        }
        self.columns.push((name.to_string(), values));
        Ok(())
    }

    /// Number of observations.
    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    /// Number of columns.
    pub fn n_columns(&self) -> usize {
        self.columns.len()
    }

    /// Name of the choice column.
    pub fn choice_column(&self) -> &str {
        &self.choice_column
    }

    /// Position of a column, if present.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|(n, _)| n == name)
    }

    /// A column's values, if present.
    pub fn column(&self, name: &str) -> Option<&[f64]> {
        self.columns
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_slice())
    }

    /// Value at (column position, row). Panics on out-of-range indices,
    /// which binding rules out beforehand.
    pub fn value(&self, column: usize, row: usize) -> f64 {
        self.columns[column].1[row]
    }

    /// The chosen alternative id for a row.
    ///
    /// Fails if the choice column is missing or the stored value is not an
    /// integer code.
    pub fn chosen(&self, row: usize) -> Result<i64, DataError> {
        let col = self
            .column(&self.choice_column)
            .ok_or_else(|| DataError::UnknownColumn(self.choice_column.clone()))?;
        let value = col[row];
        if value.fract() != 0.0 {
            return Err(DataError::NonIntegralChoice {
                column: self.choice_column.clone(),
                row,
                value,
            });
        }
        Ok(value as i64)
    }

    /// Basic structural validation: at least one row and a present choice
    /// column. Per-row checks against a specification happen at binding.
    pub fn validate(&self) -> Result<(), DataError> {
        if self.n_rows == 0 {
            return Err(DataError::EmptyDataset);
        }
        if self.column_index(&self.choice_column).is_none() {
            return Err(DataError::UnknownColumn(self.choice_column.clone()));
        }
        Ok(())
    }
}
