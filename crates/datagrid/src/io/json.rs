use std::path::Path;

use serde_json::{Number, Value};

use datagrid_query::{Axis, Cell};

use crate::error::{GridError, Result};
use crate::grid::{normalize_label, DataGrid};

/// Options for reading JSON.
#[derive(Debug, Clone, Default)]
pub struct JsonReadOptions {
    row_keys_as_labels: bool,
    first_row_keys_as_column_labels: bool,
}

impl JsonReadOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use the keys of a top-level object as row labels.
    pub fn row_labels(mut self, yes: bool) -> Self {
        self.row_keys_as_labels = yes;
        self
    }

    /// Use the keys of the first row object as column labels, and align
    /// later object rows by key.
    pub fn column_labels(mut self, yes: bool) -> Self {
        self.first_row_keys_as_column_labels = yes;
        self
    }
}

/// Options for writing JSON.
#[derive(Debug, Clone, Default)]
pub struct JsonWriteOptions {
    key_rows_by_labels: bool,
    key_fields_by_labels: bool,
    pretty: bool,
}

impl JsonWriteOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Key each row by its label, falling back to its key.
    pub fn row_labels(mut self, yes: bool) -> Self {
        self.key_rows_by_labels = yes;
        self
    }

    /// Key each field by its column label, falling back to its key.
    pub fn column_labels(mut self, yes: bool) -> Self {
        self.key_fields_by_labels = yes;
        self
    }

    pub fn pretty(mut self, yes: bool) -> Self {
        self.pretty = yes;
        self
    }
}

fn value_to_cell(value: Value) -> Cell {
    match value {
        Value::Null => Cell::Null,
        Value::Bool(b) => Cell::Bool(b),
        Value::Number(n) => match n.as_i64() {
            Some(i) => Cell::Integer(i),
            None => n.as_f64().map_or(Cell::Null, Cell::Float),
        },
        Value::String(s) => Cell::Text(s),
        nested @ (Value::Array(_) | Value::Object(_)) => Cell::Text(nested.to_string()),
    }
}

fn cell_to_value(cell: &Cell) -> Value {
    match cell {
        Cell::Null => Value::Null,
        Cell::Bool(b) => Value::Bool(*b),
        Cell::Integer(i) => Value::from(*i),
        Cell::Float(f) => Number::from_f64(*f).map_or(Value::Null, Value::Number),
        Cell::Text(s) => Value::String(s.clone()),
    }
}

/// An array when the keys are exactly `0..n`, otherwise an object.
fn level(entries: Vec<(String, Value)>) -> Value {
    let sequential = entries
        .iter()
        .enumerate()
        .all(|(i, (key, _))| *key == i.to_string());
    if sequential {
        Value::Array(entries.into_iter().map(|(_, value)| value).collect())
    } else {
        Value::Object(entries.into_iter().collect())
    }
}

/// Collects the rows of a document with their keys.
fn top_level(value: Value) -> Vec<(Option<String>, Value)> {
    match value {
        Value::Null => Vec::new(),
        Value::Array(rows) => rows.into_iter().map(|row| (None, row)).collect(),
        Value::Object(rows) => rows.into_iter().map(|(k, row)| (Some(k), row)).collect(),
        scalar => vec![(None, scalar)],
    }
}

impl DataGrid {
    /// Parses a JSON document into a new grid.
    ///
    /// The document is an array or object of rows; each row is an array,
    /// an object or a single scalar. Nested containers are stored as their
    /// JSON text.
    ///
    /// # Errors
    ///
    /// [`GridError::NoData`] for a document with no rows.
    pub fn read_json(input: &str, options: &JsonReadOptions) -> Result<DataGrid> {
        let value: Value = serde_json::from_str(input)?;
        DataGrid::from_json_value(value, options)
    }

    /// Builds a grid from an already parsed JSON value.
    pub fn from_json_value(value: Value, options: &JsonReadOptions) -> Result<DataGrid> {
        let rows = top_level(value);
        if rows.is_empty() {
            return Err(GridError::NoData);
        }

        let mut column_labels: Vec<String> = Vec::new();
        let mut row_labels: Vec<Option<String>> = Vec::with_capacity(rows.len());
        let mut data: Vec<Vec<Cell>> = Vec::with_capacity(rows.len());

        for (index, (key, row)) in rows.into_iter().enumerate() {
            row_labels.push(key.and_then(|k| normalize_label(Some(&k))));
            let cells = match row {
                Value::Object(fields) if options.first_row_keys_as_column_labels => {
                    if index == 0 {
                        column_labels.extend(fields.keys().cloned());
                    }
                    let mut cells = vec![Cell::Null; column_labels.len()];
                    for (field, value) in fields {
                        let column = match column_labels.iter().position(|l| *l == field) {
                            Some(column) => column,
                            None => {
                                column_labels.push(field);
                                cells.push(Cell::Null);
                                column_labels.len() - 1
                            }
                        };
                        cells[column] = value_to_cell(value);
                    }
                    cells
                }
                Value::Object(fields) => fields.into_iter().map(|(_, v)| value_to_cell(v)).collect(),
                Value::Array(values) => values.into_iter().map(value_to_cell).collect(),
                scalar => vec![value_to_cell(scalar)],
            };
            data.push(cells);
        }

        let mut grid = DataGrid::from_rows(data);
        if !column_labels.is_empty() {
            grid.grow(Axis::Column, column_labels.len());
            grid.set_labels(Axis::Column, column_labels.iter().map(Some))?;
        }
        if options.row_keys_as_labels {
            grid.set_labels(Axis::Row, row_labels)?;
        }
        tracing::debug!(
            rows = grid.row_count(),
            columns = grid.column_count(),
            "imported JSON"
        );
        Ok(grid)
    }

    /// Reads a JSON file into a new grid.
    pub fn load_json(path: impl AsRef<Path>, options: &JsonReadOptions) -> Result<DataGrid> {
        let input = std::fs::read_to_string(path.as_ref())?;
        DataGrid::read_json(&input, options)
    }

    /// Renders the grid as JSON: rows of fields, each level an array unless
    /// labels key it.
    pub fn to_json_value(&self, options: &JsonWriteOptions) -> Value {
        let field_keys: Vec<String> = self
            .column_labels()
            .iter()
            .enumerate()
            .map(|(key, label)| match label {
                Some(label) if options.key_fields_by_labels => label.clone(),
                _ => key.to_string(),
            })
            .collect();

        let rows = self
            .rows()
            .iter()
            .zip(self.row_labels())
            .enumerate()
            .map(|(key, (row, label))| {
                let row_key = match label {
                    Some(label) if options.key_rows_by_labels => label.clone(),
                    _ => key.to_string(),
                };
                let fields = field_keys
                    .iter()
                    .cloned()
                    .zip(row.iter().map(cell_to_value))
                    .collect();
                (row_key, level(fields))
            })
            .collect();
        level(rows)
    }

    pub fn to_json_string(&self, options: &JsonWriteOptions) -> Result<String> {
        let value = self.to_json_value(options);
        let json = if options.pretty {
            serde_json::to_string_pretty(&value)?
        } else {
            serde_json::to_string(&value)?
        };
        Ok(json)
    }

    /// Writes the grid to a JSON file, replacing it if it exists.
    pub fn save_json(&self, path: impl AsRef<Path>, options: &JsonWriteOptions) -> Result<()> {
        std::fs::write(path.as_ref(), self.to_json_string(options)?)?;
        tracing::debug!(path = %path.as_ref().display(), "saved JSON");
        Ok(())
    }
}
