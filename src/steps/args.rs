use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::steps::StepFailure;
use crate::steps::pattern::Capture;

/// A step's data table. The first row is the header.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl DataTable {
    /// Split raw rows into a header row and data rows. Cells are trimmed.
    pub fn from_rows(rows: Vec<Vec<String>>) -> Self {
        let mut rows = rows
            .into_iter()
            .map(|row| row.into_iter().map(|c| c.trim().to_string()).collect::<Vec<_>>());
        let headers = rows.next().unwrap_or_default();
        Self {
            headers,
            rows: rows.collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Cell of data row `row` under the column named `column`.
    pub fn get(&self, row: usize, column: &str) -> Option<&str> {
        let col = self.headers.iter().position(|h| h == column)?;
        self.rows.get(row)?.get(col).map(String::as_str)
    }

    /// Every data row keyed by header.
    pub fn hashes(&self) -> Vec<HashMap<&str, &str>> {
        self.rows
            .iter()
            .map(|row| {
                self.headers
                    .iter()
                    .map(String::as_str)
                    .zip(row.iter().map(String::as_str))
                    .collect()
            })
            .collect()
    }

    /// First data row keyed by header; the shape data-driven form steps use.
    pub fn first_row(&self) -> Result<HashMap<&str, &str>, StepFailure> {
        self.hashes()
            .into_iter()
            .next()
            .ok_or_else(|| StepFailure::BadArgument("data table has no data rows".to_string()))
    }
}

/// Arguments handed to a step handler: positional captures plus the step's
/// optional data table and doc string.
#[derive(Debug, Clone, Default)]
pub struct StepArgs {
    pub captures: Vec<Capture>,
    pub table: Option<DataTable>,
    pub docstring: Option<String>,
}

impl StepArgs {
    pub fn new(captures: Vec<Capture>) -> Self {
        Self {
            captures,
            ..Self::default()
        }
    }

    pub fn with_table(mut self, table: Option<DataTable>) -> Self {
        self.table = table;
        self
    }

    pub fn with_docstring(mut self, docstring: Option<String>) -> Self {
        self.docstring = docstring;
        self
    }

    /// Text of capture `index`, for `{string}` and `{word}` placeholders.
    pub fn string(&self, index: usize) -> Result<&str, StepFailure> {
        match self.captures.get(index) {
            Some(Capture::Str(s) | Capture::Word(s)) => Ok(s),
            Some(Capture::Int(_)) => Err(StepFailure::BadArgument(format!(
                "argument {} is an integer, expected text",
                index
            ))),
            None => Err(missing(index)),
        }
    }

    pub fn int(&self, index: usize) -> Result<i64, StepFailure> {
        match self.captures.get(index) {
            Some(Capture::Int(n)) => Ok(*n),
            Some(other) => Err(StepFailure::BadArgument(format!(
                "argument {} is {}, expected an integer",
                index, other
            ))),
            None => Err(missing(index)),
        }
    }

    /// `{int}` capture as a count. Negative values are rejected.
    pub fn count(&self, index: usize) -> Result<usize, StepFailure> {
        let n = self.int(index)?;
        usize::try_from(n)
            .map_err(|_| StepFailure::BadArgument(format!("argument {} must not be negative", index)))
    }

    pub fn table(&self) -> Result<&DataTable, StepFailure> {
        self.table
            .as_ref()
            .ok_or_else(|| StepFailure::BadArgument("step requires a data table".to_string()))
    }
}

fn missing(index: usize) -> StepFailure {
    StepFailure::BadArgument(format!("step has no argument {}", index))
}
