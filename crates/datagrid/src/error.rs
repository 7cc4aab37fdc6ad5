//! Error types for the grid crate.

use datagrid_query::{Axis, QueryError};
use thiserror::Error;

/// Errors that can occur when editing, searching, importing or exporting a grid.
#[derive(Debug, Error)]
pub enum GridError {
    /// A positional key is past the end of its axis.
    #[error("{axis} key {key} not found")]
    KeyNotFound { axis: Axis, key: usize },

    /// No vector on the axis carries this label.
    #[error("{axis} label '{label}' not found")]
    LabelNotFound { axis: Axis, label: String },

    /// Labels must be unique on their axis.
    #[error("{axis} label '{label}' already exists")]
    DuplicateLabel { axis: Axis, label: String },

    /// Labels were assigned to an axis with no vectors.
    #[error("cannot assign labels to an empty {axis} axis")]
    EmptyAxis { axis: Axis },

    /// More labels were given than the axis has vectors.
    #[error("{given} labels given for {count} {axis}s")]
    TooManyLabels {
        axis: Axis,
        given: usize,
        count: usize,
    },

    /// An import found nothing to load.
    #[error("no data found")]
    NoData,

    /// Query compilation or field resolution failed.
    #[error(transparent)]
    Query(#[from] QueryError),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for grid operations.
pub type Result<T> = std::result::Result<T, GridError>;
