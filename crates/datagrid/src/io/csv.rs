use std::fs::File;
use std::io::{self, Read, Write};
use std::path::Path;

use datagrid_query::Cell;

use crate::error::{GridError, Result};
use crate::grid::DataGrid;

/// Options for reading CSV.
#[derive(Debug, Clone)]
pub struct CsvReadOptions {
    delimiter: u8,
    quote: u8,
    escape: Option<u8>,
    first_column_as_row_labels: bool,
    first_row_as_column_labels: bool,
    infer_types: bool,
}

impl Default for CsvReadOptions {
    fn default() -> Self {
        CsvReadOptions {
            delimiter: b',',
            quote: b'"',
            escape: None,
            first_column_as_row_labels: false,
            first_row_as_column_labels: false,
            infer_types: false,
        }
    }
}

impl CsvReadOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    pub fn quote(mut self, quote: u8) -> Self {
        self.quote = quote;
        self
    }

    /// Escape character inside quoted fields. By default quotes are escaped
    /// by doubling them.
    pub fn escape(mut self, escape: Option<u8>) -> Self {
        self.escape = escape;
        self
    }

    /// Take row labels from the first field of every record.
    pub fn row_labels(mut self, yes: bool) -> Self {
        self.first_column_as_row_labels = yes;
        self
    }

    /// Take column labels from the first record.
    pub fn column_labels(mut self, yes: bool) -> Self {
        self.first_row_as_column_labels = yes;
        self
    }

    /// Store numeric fields as numbers instead of text.
    pub fn infer_types(mut self, yes: bool) -> Self {
        self.infer_types = yes;
        self
    }

    fn builder(&self) -> csv::ReaderBuilder {
        let mut builder = csv::ReaderBuilder::new();
        builder
            .has_headers(false)
            .flexible(true)
            .delimiter(self.delimiter)
            .quote(self.quote)
            .escape(self.escape)
            .double_quote(self.escape.is_none());
        builder
    }
}

/// Options for writing CSV.
#[derive(Debug, Clone)]
pub struct CsvWriteOptions {
    delimiter: u8,
    quote: u8,
    include_row_labels: bool,
    include_column_labels: bool,
    terminator: csv::Terminator,
}

impl Default for CsvWriteOptions {
    fn default() -> Self {
        CsvWriteOptions {
            delimiter: b',',
            quote: b'"',
            include_row_labels: false,
            include_column_labels: false,
            terminator: csv::Terminator::Any(b'\n'),
        }
    }
}

impl CsvWriteOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    pub fn quote(mut self, quote: u8) -> Self {
        self.quote = quote;
        self
    }

    /// Write row labels as the first field of every record.
    pub fn row_labels(mut self, yes: bool) -> Self {
        self.include_row_labels = yes;
        self
    }

    /// Write column labels as the first record.
    pub fn column_labels(mut self, yes: bool) -> Self {
        self.include_column_labels = yes;
        self
    }

    pub fn terminator(mut self, terminator: csv::Terminator) -> Self {
        self.terminator = terminator;
        self
    }

    fn builder(&self) -> csv::WriterBuilder {
        let mut builder = csv::WriterBuilder::new();
        builder
            .has_headers(false)
            .flexible(true)
            .delimiter(self.delimiter)
            .quote(self.quote)
            .terminator(self.terminator);
        builder
    }
}

impl DataGrid {
    /// Parses CSV text into a new grid.
    ///
    /// Fields are text unless [`CsvReadOptions::infer_types`] is set. Rows
    /// of different lengths are padded with nulls.
    pub fn read_csv(input: &str, options: &CsvReadOptions) -> Result<DataGrid> {
        DataGrid::read_csv_from(input.as_bytes(), options)
    }

    /// Parses CSV from any reader.
    pub fn read_csv_from<R: Read>(reader: R, options: &CsvReadOptions) -> Result<DataGrid> {
        let mut reader = options.builder().from_reader(reader);
        let mut rows: Vec<Vec<Cell>> = Vec::new();
        for record in reader.records() {
            let record = record?;
            let row = record
                .iter()
                .map(|field| {
                    if options.infer_types {
                        Cell::infer(field)
                    } else {
                        Cell::from(field)
                    }
                })
                .collect();
            rows.push(row);
        }

        let grid = DataGrid::from_rows_with_labels(
            rows,
            options.first_column_as_row_labels,
            options.first_row_as_column_labels,
        )?;
        tracing::debug!(
            rows = grid.row_count(),
            columns = grid.column_count(),
            "imported CSV"
        );
        Ok(grid)
    }

    /// Reads a CSV file into a new grid.
    pub fn load_csv(path: impl AsRef<Path>, options: &CsvReadOptions) -> Result<DataGrid> {
        let file = File::open(path.as_ref())?;
        DataGrid::read_csv_from(io::BufReader::new(file), options)
    }

    /// Writes the grid as CSV. Nulls are written as empty fields and records
    /// with no fields are skipped.
    pub fn write_csv<W: Write>(&self, writer: W, options: &CsvWriteOptions) -> Result<()> {
        let mut writer = options.builder().from_writer(writer);

        if options.include_column_labels {
            let mut header: Vec<&str> = Vec::with_capacity(self.column_count() + 1);
            if options.include_row_labels {
                header.push("");
            }
            header.extend(self.column_labels().iter().map(|l| l.as_deref().unwrap_or("")));
            if !header.is_empty() {
                writer.write_record(&header)?;
            }
        }

        for (row, label) in self.rows().iter().zip(self.row_labels()) {
            let mut record: Vec<String> = Vec::with_capacity(row.len() + 1);
            if options.include_row_labels {
                record.push(label.clone().unwrap_or_default());
            }
            record.extend(row.iter().map(|cell| cell.as_text().into_owned()));
            if !record.is_empty() {
                writer.write_record(&record)?;
            }
        }

        writer.flush()?;
        Ok(())
    }

    /// Renders the grid as a CSV string.
    pub fn to_csv_string(&self, options: &CsvWriteOptions) -> Result<String> {
        let mut buffer = Vec::new();
        self.write_csv(&mut buffer, options)?;
        String::from_utf8(buffer)
            .map_err(|e| GridError::Io(io::Error::new(io::ErrorKind::InvalidData, e)))
    }

    /// Writes the grid to a CSV file, replacing it if it exists.
    pub fn save_csv(&self, path: impl AsRef<Path>, options: &CsvWriteOptions) -> Result<()> {
        let file = File::create(path.as_ref())?;
        self.write_csv(io::BufWriter::new(file), options)?;
        tracing::debug!(path = %path.as_ref().display(), "saved CSV");
        Ok(())
    }
}
