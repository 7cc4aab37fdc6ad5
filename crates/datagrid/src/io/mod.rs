//! CSV and JSON import and export.
//!
//! Readers build a fresh grid from text; writers render a grid without
//! changing it. The `load_*` and `save_*` variants add file access.

mod csv;
mod json;

pub use self::csv::{CsvReadOptions, CsvWriteOptions};
pub use self::json::{JsonReadOptions, JsonWriteOptions};
