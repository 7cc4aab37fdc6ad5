//! A labeled two-dimensional data grid.
//!
//! [`DataGrid`] stores rows and columns of [`Cell`]s. Each row and column
//! has a 0-based key and may carry a unique label, so every operation that
//! takes a row or column accepts either (see [`KeyRef`]).
//!
//! The grid supports:
//!
//! - structural editing along either [`Axis`]: append, prepend, update,
//!   delete, swap, move, sort, merge, diff and intersect
//! - borrowed row and column views ([`GridVector`], [`GridVectorMut`])
//! - set-expression search through [`DataGrid::search_rows`] and
//!   [`DataGrid::search_columns`], using the language from
//!   [`datagrid_query`]
//! - CSV and JSON import and export
//!
//! # Quick Start
//!
//! ```rust
//! use datagrid::{CsvReadOptions, CsvWriteOptions, DataGrid, Dir};
//!
//! let csv = "term,visits\nfind a job,\"12,000\"\nweather,800\njob centre,150\n";
//! let mut grid = DataGrid::read_csv(csv, &CsvReadOptions::new().column_labels(true)).unwrap();
//!
//! let jobs = grid.search_rows("term*=job").unwrap();
//! assert_eq!(jobs.row_count(), 2);
//!
//! grid.order_rows("visits", Dir::Asc).unwrap();
//! assert_eq!(
//!     grid.to_csv_string(&CsvWriteOptions::new()).unwrap(),
//!     "job centre,150\nweather,800\nfind a job,\"12,000\"\n"
//! );
//! ```
//!
//! Searching runs on anything that implements [`Searchable`]; the grid is
//! simply the implementation this crate provides.

mod error;
mod grid;
mod io;
mod key;
mod ops;
mod ordering;
mod search;
mod vector;

pub use error::{GridError, Result};
pub use grid::{DataGrid, GridInfo};
pub use io::{CsvReadOptions, CsvWriteOptions, JsonReadOptions, JsonWriteOptions};
pub use key::KeyRef;
pub use ordering::{compare_cells, Dir};
pub use vector::{GridVector, GridVectorMut};

pub use datagrid_query::{self as query, Axis, Cell, Query, QueryError, QueryOptions, Searchable};
