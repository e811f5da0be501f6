//! In-memory record table passed between the pipeline stages
//!
//! A [`Table`] is a rectangular, row-major collection of [`Value`]s sharing
//! one ordered schema of named, typed [`Field`]s.

mod value;

pub use value::{DATE_FORMAT, DataType, Value};

use crate::error::{EtlError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// A named, typed column
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    pub name: String,
    pub dtype: DataType,
}

impl Field {
    pub fn new(name: impl Into<String>, dtype: DataType) -> Self {
        Self {
            name: name.into(),
            dtype,
        }
    }
}

/// Rectangular table of rows sharing one schema
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    fields: Vec<Field>,
    rows: Vec<Vec<Value>>,
}

impl Table {
    /// Create an empty table with the given schema
    pub fn new(fields: Vec<Field>) -> Self {
        Self {
            fields,
            rows: Vec::new(),
        }
    }

    /// Create a table from rows, checking every row against the schema width
    pub fn from_rows(fields: Vec<Field>, rows: Vec<Vec<Value>>) -> Result<Self> {
        let expected = fields.len();
        if let Some((row, found)) = rows
            .iter()
            .enumerate()
            .find(|(_, r)| r.len() != expected)
            .map(|(i, r)| (i, r.len()))
        {
            return Err(EtlError::Shape {
                row,
                expected,
                found,
            });
        }
        Ok(Self { fields, rows })
    }

    /// Create a table from rows, inferring each column's type from its values
    ///
    /// A column whose non-null values share one type gets that type; a column
    /// with mixed types is rendered as text; an all-null column is text.
    pub fn from_rows_inferred(names: Vec<String>, mut rows: Vec<Vec<Value>>) -> Result<Self> {
        let mut fields = Vec::with_capacity(names.len());
        for (idx, name) in names.into_iter().enumerate() {
            let mut dtype = None;
            let mut mixed = false;
            for value in rows.iter().filter_map(|r| r.get(idx)) {
                match (dtype, value.dtype()) {
                    (_, None) => {}
                    (None, Some(t)) => dtype = Some(t),
                    (Some(a), Some(b)) if a != b => mixed = true,
                    _ => {}
                }
            }
            let dtype = match (dtype, mixed) {
                (Some(t), false) => t,
                _ => DataType::Utf8,
            };
            if mixed {
                for row in rows.iter_mut() {
                    if let Some(value) = row.get_mut(idx)
                        && !value.is_null()
                    {
                        *value = Value::Text(value.to_field_string());
                    }
                }
            }
            fields.push(Field::new(name, dtype));
        }
        Self::from_rows(fields, rows)
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    pub fn column_names(&self) -> Vec<String> {
        self.fields.iter().map(|f| f.name.clone()).collect()
    }

    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn num_columns(&self) -> usize {
        self.fields.len()
    }

    /// `(rows, columns)`
    pub fn shape(&self) -> (usize, usize) {
        (self.num_rows(), self.num_columns())
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of the named column
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.name == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    pub fn field(&self, idx: usize) -> Option<&Field> {
        self.fields.get(idx)
    }

    /// Iterate over the values of one column
    pub fn column_values(&self, idx: usize) -> impl Iterator<Item = &Value> + '_ {
        self.rows.iter().filter_map(move |row| row.get(idx))
    }

    /// Iterate over the values of the named column
    pub fn column(&self, name: &str) -> Option<impl Iterator<Item = &Value> + '_> {
        self.column_index(name).map(|idx| self.column_values(idx))
    }

    /// Rename every column through `rename`
    pub fn rename_columns(&mut self, mut rename: impl FnMut(&str) -> String) {
        for field in self.fields.iter_mut() {
            field.name = rename(&field.name);
        }
    }

    /// Change the declared type of a column without touching its values
    pub fn set_dtype(&mut self, idx: usize, dtype: DataType) {
        if let Some(field) = self.fields.get_mut(idx) {
            field.dtype = dtype;
        }
    }

    /// Apply `f` to every value of one column
    pub fn map_column(&mut self, idx: usize, mut f: impl FnMut(&mut Value)) {
        for row in self.rows.iter_mut() {
            if let Some(value) = row.get_mut(idx) {
                f(value);
            }
        }
    }

    /// Replace the values of an existing column, or append a new one
    pub fn upsert_column(&mut self, field: Field, values: Vec<Value>) -> Result<()> {
        if values.len() != self.rows.len() {
            return Err(EtlError::Shape {
                row: values.len(),
                expected: self.rows.len(),
                found: values.len(),
            });
        }

        match self.column_index(&field.name) {
            Some(idx) => {
                self.fields[idx] = field;
                for (row, value) in self.rows.iter_mut().zip(values) {
                    row[idx] = value;
                }
            }
            None => {
                self.fields.push(field);
                for (row, value) in self.rows.iter_mut().zip(values) {
                    row.push(value);
                }
            }
        }
        Ok(())
    }

    /// Keep only rows matching `keep`; returns the number of rows removed
    pub fn retain_rows(&mut self, mut keep: impl FnMut(&[Value]) -> bool) -> usize {
        let before = self.rows.len();
        self.rows.retain(|row| keep(row));
        before - self.rows.len()
    }

    /// Remove rows identical to an earlier row; returns the number removed
    pub fn dedup_rows(&mut self) -> usize {
        let before = self.rows.len();
        let mut seen = HashSet::with_capacity(before);
        let rows = std::mem::take(&mut self.rows);
        self.rows = rows
            .into_iter()
            .filter(|row| seen.insert(row.clone()))
            .collect();
        before - self.rows.len()
    }

    /// Stable ascending sort on one column (nulls first)
    pub fn sort_by_column(&mut self, idx: usize) {
        self.rows.sort_by(|a, b| a.get(idx).cmp(&b.get(idx)));
    }

    /// Null count per column, in schema order
    pub fn null_counts(&self) -> Vec<(String, usize)> {
        self.fields
            .iter()
            .enumerate()
            .map(|(idx, f)| {
                let nulls = self.column_values(idx).filter(|v| v.is_null()).count();
                (f.name.clone(), nulls)
            })
            .collect()
    }

    pub fn total_nulls(&self) -> usize {
        self.rows
            .iter()
            .flat_map(|row| row.iter())
            .filter(|v| v.is_null())
            .count()
    }

    /// Approximate in-memory size in bytes
    pub fn memory_usage(&self) -> usize {
        let schema: usize = self
            .fields
            .iter()
            .map(|f| std::mem::size_of::<Field>() + f.name.capacity())
            .sum();
        let cells: usize = self
            .rows
            .iter()
            .map(|row| {
                std::mem::size_of::<Vec<Value>>() + row.iter().map(Value::footprint).sum::<usize>()
            })
            .sum();
        schema + cells
    }

    /// Column name and type, in schema order
    pub fn dtypes(&self) -> Vec<(String, DataType)> {
        self.fields
            .iter()
            .map(|f| (f.name.clone(), f.dtype))
            .collect()
    }

    /// Copy of the first `n` rows
    pub fn head(&self, n: usize) -> Self {
        Self {
            fields: self.fields.clone(),
            rows: self.rows.iter().take(n).cloned().collect(),
        }
    }
}

const MAX_CELL_WIDTH: usize = 32;

fn clip(text: &str) -> String {
    if text.chars().count() <= MAX_CELL_WIDTH {
        return text.to_string();
    }
    let mut clipped: String = text.chars().take(MAX_CELL_WIDTH - 3).collect();
    clipped.push_str("...");
    clipped
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let header: Vec<String> = self.fields.iter().map(|fd| clip(&fd.name)).collect();
        let body: Vec<Vec<String>> = self
            .rows
            .iter()
            .map(|row| row.iter().map(|v| clip(&v.to_string())).collect())
            .collect();

        let widths: Vec<usize> = header
            .iter()
            .enumerate()
            .map(|(idx, name)| {
                body.iter()
                    .filter_map(|row| row.get(idx))
                    .map(|cell| cell.chars().count())
                    .chain(std::iter::once(name.chars().count()))
                    .max()
                    .unwrap_or(0)
            })
            .collect();

        let write_line = |f: &mut fmt::Formatter<'_>, cells: &[String]| -> fmt::Result {
            let line = cells
                .iter()
                .zip(&widths)
                .map(|(cell, width)| format!("{:<width$}", cell, width = width))
                .collect::<Vec<_>>()
                .join("  ");
            writeln!(f, "{}", line.trim_end())
        };

        write_line(f, &header)?;
        for row in &body {
            write_line(f, row)?;
        }
        write!(f, "[{} rows x {} columns]", self.num_rows(), self.num_columns())
    }
}
