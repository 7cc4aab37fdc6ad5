//! Query entry points.
//!
//! A search compiles the query once, runs it over every row (or column)
//! and collects the matches into a new grid. The result keeps the labels
//! of the opposite axis and the relative order of the kept vectors.

use datagrid_query::{Axis, Cell, Query, Searchable};

use crate::error::Result;
use crate::grid::DataGrid;

impl Searchable for DataGrid {
    fn vector_count(&self, axis: Axis) -> usize {
        self.count(axis)
    }

    fn label(&self, axis: Axis, key: usize) -> Option<&str> {
        self.labels(axis).get(key)?.as_deref()
    }

    fn cell(&self, axis: Axis, key: usize, cross: usize) -> Option<&Cell> {
        let (row, column) = match axis {
            Axis::Row => (key, cross),
            Axis::Column => (cross, key),
        };
        self.rows().get(row)?.get(column)
    }

    fn find_label(&self, axis: Axis, label: &str) -> Option<usize> {
        self.position(axis, label)
    }
}

impl DataGrid {
    /// Runs a query along `axis` and returns the matching vectors.
    ///
    /// An empty (or blank) query returns a copy of the grid.
    ///
    /// # Example
    ///
    /// ```
    /// use datagrid::{Axis, DataGrid};
    ///
    /// let mut grid = DataGrid::from_rows([
    ///     ["find a job", "12,000"],
    ///     ["weather", "800"],
    ///     ["job centre", "150"],
    /// ]);
    /// grid.set_labels(Axis::Column, ["term", "visits"].map(Some)).unwrap();
    ///
    /// let jobs = grid.search_rows(r#"term*=job - visits>"10,000""#).unwrap();
    /// assert_eq!(jobs.row_count(), 1);
    /// assert_eq!(jobs.value(0, "term").unwrap().as_text(), "job centre");
    /// ```
    pub fn search(&self, query: &str, axis: Axis) -> Result<DataGrid> {
        if query.trim().is_empty() {
            return Ok(self.clone());
        }
        let query = Query::parse(query)?;
        self.search_with(&query, axis)
    }

    /// Runs an already compiled query along `axis`.
    pub fn search_with(&self, query: &Query, axis: Axis) -> Result<DataGrid> {
        let keys = query.bind(self, axis)?.select(self);
        let result = self.subset(axis, &keys);
        tracing::debug!(
            %axis,
            query = query.source(),
            scanned = self.count(axis),
            kept = keys.len(),
            "search complete"
        );
        Ok(result)
    }

    /// Rows whose cells match the query, resolving fields against column
    /// labels and keys.
    pub fn search_rows(&self, query: &str) -> Result<DataGrid> {
        self.search(query, Axis::Row)
    }

    /// Columns whose cells match the query, resolving fields against row
    /// labels and keys.
    pub fn search_columns(&self, query: &str) -> Result<DataGrid> {
        self.search(query, Axis::Column)
    }
}
