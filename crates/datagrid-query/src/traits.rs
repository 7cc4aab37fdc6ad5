//! The seam between the query engine and the data it searches.

use crate::axis::Axis;
use crate::cell::Cell;

/// Read access to a labeled two-dimensional table.
///
/// Rows and columns are both addressed by a 0-based key. A query running
/// along `axis` visits every key on that axis and resolves its fields
/// against the keys and labels of the opposite axis.
///
/// # Example
///
/// ```
/// use datagrid_query::{Axis, Cell, Query, Searchable};
///
/// struct People {
///     columns: Vec<&'static str>,
///     rows: Vec<Vec<Cell>>,
/// }
///
/// impl Searchable for People {
///     fn vector_count(&self, axis: Axis) -> usize {
///         match axis {
///             Axis::Row => self.rows.len(),
///             Axis::Column => self.columns.len(),
///         }
///     }
///
///     fn label(&self, axis: Axis, key: usize) -> Option<&str> {
///         match axis {
///             Axis::Row => None,
///             Axis::Column => self.columns.get(key).copied(),
///         }
///     }
///
///     fn cell(&self, axis: Axis, key: usize, cross: usize) -> Option<&Cell> {
///         let (row, column) = match axis {
///             Axis::Row => (key, cross),
///             Axis::Column => (cross, key),
///         };
///         self.rows.get(row)?.get(column)
///     }
/// }
///
/// let people = People {
///     columns: vec!["name", "age"],
///     rows: vec![
///         vec!["Jeff".into(), 41.into()],
///         vec!["Ann".into(), 29.into()],
///     ],
/// };
///
/// let query = Query::parse("age>30").unwrap();
/// assert_eq!(query.select(&people, Axis::Row).unwrap(), vec![0]);
/// ```
pub trait Searchable {
    /// Number of rows or columns.
    fn vector_count(&self, axis: Axis) -> usize;

    /// Label of the vector at `key`, if it has one.
    fn label(&self, axis: Axis, key: usize) -> Option<&str>;

    /// The cell where vector `key` on `axis` crosses key `cross` of the
    /// opposite axis.
    fn cell(&self, axis: Axis, key: usize, cross: usize) -> Option<&Cell>;

    /// Finds the key carrying `label`.
    ///
    /// The default implementation scans every label on the axis.
    fn find_label(&self, axis: Axis, label: &str) -> Option<usize> {
        (0..self.vector_count(axis)).find(|&key| self.label(axis, key) == Some(label))
    }
}
