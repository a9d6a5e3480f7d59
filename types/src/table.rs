//! Ordered tables of rows.

use serde::{Deserialize, Serialize};

use crate::Value;

/// One data row: cell values in column order.
///
/// A row does not know its column names; those live on the owning [`Table`].
/// Row identity is its ordinal position in the table, which is semantically
/// meaningful (fallback logic walks backward through table order).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Row {
    values: Vec<Value>,
}

impl Row {
    #[must_use]
    pub fn new(values: Vec<Value>) -> Self {
        Self { values }
    }

    #[must_use]
    pub fn get(&self, column: usize) -> Option<&Value> {
        self.values.get(column)
    }

    #[must_use]
    pub fn values(&self) -> &[Value] {
        &self.values
    }

    /// True when every cell in the row is blank.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.values.iter().all(Value::is_blank)
    }
}

/// An ordered sequence of rows under a shared header.
///
/// Insertion order is original document order and is preserved; nothing in
/// this crate sorts rows. Rows shorter than the header are padded with
/// [`Value::Empty`] so every cell lookup inside the header width succeeds.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Row>,
}

impl Table {
    #[must_use]
    pub fn new(columns: Vec<String>, mut rows: Vec<Row>) -> Self {
        let width = columns.len();
        for row in &mut rows {
            if row.values.len() < width {
                row.values.resize(width, Value::Empty);
            }
        }
        Self { columns, rows }
    }

    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Position of a column by exact header name.
    #[must_use]
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    #[must_use]
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    #[must_use]
    pub fn row(&self, index: usize) -> Option<&Row> {
        self.rows.get(index)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
