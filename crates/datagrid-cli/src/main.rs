//! `gridq`: search CSV and JSON files with the datagrid query language.
//!
//! Usage:
//!   gridq search data.csv --rows 'term*=job + visits>"10,000"' --column-labels
//!   gridq search data.json --columns '//=total' --row-labels --format json
//!   gridq info data.csv --column-labels
//!
//! Logging goes to stderr and is controlled by `GRIDQ_LOG` (default `warn`).

use std::io::Write;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use datagrid::{
    Axis, CsvReadOptions, CsvWriteOptions, DataGrid, JsonReadOptions, JsonWriteOptions,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "gridq")]
#[command(about = "Search CSV and JSON grids with set expressions", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Keep the rows or columns that match a query
    Search {
        #[command(flatten)]
        input: InputArgs,

        #[command(flatten)]
        target: Target,

        /// Output format
        #[arg(long, value_enum, env = "GRIDQ_FORMAT", default_value_t = Format::Csv)]
        format: Format,

        /// Indent JSON output
        #[arg(long)]
        pretty: bool,
    },

    /// Print the dimensions and labels of a grid
    Info {
        #[command(flatten)]
        input: InputArgs,
    },
}

#[derive(Args, Debug)]
struct InputArgs {
    /// CSV or JSON file; `.json` files are read as JSON
    file: PathBuf,

    /// Read row labels from the first column (CSV) or the top-level keys (JSON)
    #[arg(long)]
    row_labels: bool,

    /// Read column labels from the first row (CSV) or the first record's keys (JSON)
    #[arg(long)]
    column_labels: bool,

    /// CSV field delimiter
    #[arg(long, default_value_t = ',')]
    delimiter: char,
}

#[derive(Args, Debug)]
#[group(required = true, multiple = false)]
struct Target {
    /// Query run against every row
    #[arg(long, value_name = "QUERY")]
    rows: Option<String>,

    /// Query run against every column
    #[arg(long, value_name = "QUERY")]
    columns: Option<String>,
}

impl Target {
    fn query(&self) -> (Axis, &str) {
        match (&self.rows, &self.columns) {
            (Some(query), _) => (Axis::Row, query.as_str()),
            (None, Some(query)) => (Axis::Column, query.as_str()),
            (None, None) => (Axis::Row, ""),
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Csv,
    Json,
}

impl InputArgs {
    fn is_json(&self) -> bool {
        self.file
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
    }

    fn delimiter(&self) -> Result<u8> {
        match u8::try_from(self.delimiter) {
            Ok(byte) if byte.is_ascii() => Ok(byte),
            _ => bail!("delimiter must be a single ASCII character, got '{}'", self.delimiter),
        }
    }

    fn load(&self) -> Result<DataGrid> {
        let grid = if self.is_json() {
            let options = JsonReadOptions::new()
                .row_labels(self.row_labels)
                .column_labels(self.column_labels);
            DataGrid::load_json(&self.file, &options)
        } else {
            let options = CsvReadOptions::new()
                .delimiter(self.delimiter()?)
                .row_labels(self.row_labels)
                .column_labels(self.column_labels);
            DataGrid::load_csv(&self.file, &options)
        };
        grid.with_context(|| format!("failed to load {}", self.file.display()))
    }
}

fn render(grid: &DataGrid, input: &InputArgs, format: Format, pretty: bool) -> Result<String> {
    let text = match format {
        Format::Csv => {
            let options = CsvWriteOptions::new()
                .delimiter(input.delimiter()?)
                .row_labels(input.row_labels)
                .column_labels(input.column_labels);
            grid.to_csv_string(&options)?
        }
        Format::Json => {
            let options = JsonWriteOptions::new()
                .row_labels(input.row_labels)
                .column_labels(input.column_labels)
                .pretty(pretty);
            let mut json = grid.to_json_string(&options)?;
            json.push('\n');
            json
        }
    };
    Ok(text)
}

fn describe(labels: &[Option<String>]) -> String {
    labels
        .iter()
        .enumerate()
        .map(|(key, label)| match label {
            Some(label) => label.clone(),
            None => format!("/{key}"),
        })
        .collect::<Vec<_>>()
        .join(", ")
}

fn run(cli: Cli, out: &mut impl Write) -> Result<()> {
    match cli.command {
        Command::Search {
            input,
            target,
            format,
            pretty,
        } => {
            let grid = input.load()?;
            let (axis, query) = target.query();
            let found = grid
                .search(query, axis)
                .with_context(|| format!("{axis} search failed"))?;
            tracing::info!(%axis, kept = found.count(axis), "search finished");
            out.write_all(render(&found, &input, format, pretty)?.as_bytes())?;
        }
        Command::Info { input } => {
            let info = input.load()?.info();
            writeln!(out, "rows: {}", info.row_count)?;
            writeln!(out, "columns: {}", info.column_count)?;
            writeln!(out, "row labels: {}", describe(&info.row_labels))?;
            writeln!(out, "column labels: {}", describe(&info.column_labels))?;
        }
    }
    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("GRIDQ_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let stdout = std::io::stdout();
    run(cli, &mut stdout.lock())
}
