//! Financial text cleaning entry point
//!
//! Composes sanitizing, currency rewriting and a final whitespace pass into
//! a single `clean` operation, plus a batch variant over table columns.
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::rewriter::{CurrencyRewriter, RewriterOptions};
use super::sanitizer::{collapse_whitespace, sanitize};

/// A named column of cell values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    #[serde(default)]
    pub values: Vec<Value>,
}

/// Ordered collection of named columns
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Table {
    #[serde(default)]
    pub columns: Vec<Column>,
}

impl Table {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a column, builder style
    pub fn with_column(mut self, name: impl Into<String>, values: Vec<Value>) -> Self {
        self.columns.push(Column {
            name: name.into(),
            values,
        });
        self
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column(name).is_some()
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn column_mut(&mut self, name: &str) -> Option<&mut Column> {
        self.columns.iter_mut().find(|c| c.name == name)
    }

    /// Total number of cells across all columns
    pub fn cell_count(&self) -> usize {
        self.columns.iter().map(|c| c.values.len()).sum()
    }
}

/// Sanitizer → currency rewriter → whitespace collapse
#[derive(Debug, Clone, Copy, Default)]
pub struct FinancialTextCleaner {
    rewriter: CurrencyRewriter,
}

impl FinancialTextCleaner {
    pub fn new(options: RewriterOptions) -> Self {
        Self {
            rewriter: CurrencyRewriter::new(options),
        }
    }

    /// Clean one piece of text. Total over every input, including `""`.
    pub fn clean(&self, text: &str) -> String {
        let sanitized = sanitize(text);
        let rewritten = self.rewriter.rewrite(&sanitized);
        collapse_whitespace(&rewritten)
    }

    /// Clean a string value; any other value is returned unchanged
    pub fn clean_value(&self, value: &Value) -> Value {
        match value {
            Value::String(text) => Value::String(self.clean(text)),
            other => other.clone(),
        }
    }

    /// Clean every cell of the named columns
    ///
    /// Cells are read as text first: strings are trimmed and their whitespace
    /// collapsed, numbers and booleans are rendered as strings. Nulls, arrays
    /// and objects are left alone. Column names missing from the table are
    /// skipped.
    pub fn clean_columns<S: AsRef<str>>(&self, mut table: Table, columns: &[S]) -> Table {
        for name in columns {
            let name = name.as_ref();
            let Some(column) = table.column_mut(name) else {
                tracing::debug!(column = name, "Column not present, skipping");
                continue;
            };

            for cell in column.values.iter_mut() {
                if let Some(text) = cell_as_text(cell) {
                    *cell = Value::String(self.clean(&text));
                }
            }

            tracing::debug!(column = name, rows = column.values.len(), "Column cleaned");
        }

        table
    }
}

/// Basic text view of a cell, before financial cleaning
fn cell_as_text(cell: &Value) -> Option<String> {
    match cell {
        Value::String(s) => Some(collapse_whitespace(s.trim())),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

/// Clean text with the default pipeline
pub fn clean(text: &str) -> String {
    FinancialTextCleaner::default().clean(text)
}
