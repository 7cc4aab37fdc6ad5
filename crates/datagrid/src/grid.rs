//! The labeled grid: storage, keys and labels, and single-cell access.
//!
//! Data is stored row-major and always rectangular. Every row and every
//! column has a positional key and an optional label; labels are unique
//! per axis and the empty string is never stored as a label.

use serde::{Deserialize, Serialize};

use datagrid_query::{Axis, Cell};

use crate::error::{GridError, Result};
use crate::key::KeyRef;

/// A labeled two-dimensional grid of [`Cell`]s.
///
/// # Example
///
/// ```
/// use datagrid::{Axis, Cell, DataGrid};
///
/// let mut grid = DataGrid::from_rows([["find a job", "12,000"], ["weather", "800"]]);
/// grid.set_labels(Axis::Column, ["term", "visits"].map(Some)).unwrap();
///
/// assert_eq!(grid.value(1, "term").unwrap(), &Cell::from("weather"));
/// assert_eq!(grid.key(Axis::Column, "visits").unwrap(), 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "GridSnapshot", into = "GridSnapshot")]
pub struct DataGrid {
    data: Vec<Vec<Cell>>,
    row_labels: Vec<Option<String>>,
    column_labels: Vec<Option<String>>,
}

/// Serialized form of a grid.
#[derive(Serialize, Deserialize)]
struct GridSnapshot {
    data: Vec<Vec<Cell>>,
    #[serde(default)]
    row_labels: Vec<Option<String>>,
    #[serde(default)]
    column_labels: Vec<Option<String>>,
}

impl From<DataGrid> for GridSnapshot {
    fn from(grid: DataGrid) -> Self {
        GridSnapshot {
            data: grid.data,
            row_labels: grid.row_labels,
            column_labels: grid.column_labels,
        }
    }
}

impl TryFrom<GridSnapshot> for DataGrid {
    type Error = GridError;

    fn try_from(snapshot: GridSnapshot) -> Result<Self> {
        let mut grid = DataGrid::from_rows(snapshot.data);
        if !snapshot.row_labels.is_empty() {
            grid.set_labels(Axis::Row, snapshot.row_labels)?;
        }
        if !snapshot.column_labels.is_empty() {
            grid.set_labels(Axis::Column, snapshot.column_labels)?;
        }
        Ok(grid)
    }
}

/// Dimensions and labels of a grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GridInfo {
    pub row_count: usize,
    pub column_count: usize,
    pub row_labels: Vec<Option<String>>,
    pub column_labels: Vec<Option<String>>,
}

/// Empty labels are stored as no label.
pub(crate) fn normalize_label(label: Option<&str>) -> Option<String> {
    label.filter(|l| !l.is_empty()).map(String::from)
}

impl DataGrid {
    /// Creates an empty grid.
    pub fn new() -> Self {
        DataGrid::default()
    }

    /// Builds an unlabeled grid from rows. Short rows are padded with nulls.
    pub fn from_rows<I, R, C>(rows: I) -> Self
    where
        I: IntoIterator<Item = R>,
        R: IntoIterator<Item = C>,
        C: Into<Cell>,
    {
        let mut data: Vec<Vec<Cell>> = rows
            .into_iter()
            .map(|row| row.into_iter().map(Into::into).collect())
            .collect();
        let columns = data.iter().map(Vec::len).max().unwrap_or(0);
        for row in &mut data {
            row.resize(columns, Cell::Null);
        }
        DataGrid {
            row_labels: vec![None; data.len()],
            column_labels: vec![None; columns],
            data,
        }
    }

    /// Builds a grid whose labels come from its first row and/or column.
    ///
    /// When both are taken, the top-left cell is a blank corner and is
    /// dropped. Label cells are read through [`Cell::as_text`].
    pub fn from_rows_with_labels<I, R, C>(
        rows: I,
        first_column_as_row_labels: bool,
        first_row_as_column_labels: bool,
    ) -> Result<Self>
    where
        I: IntoIterator<Item = R>,
        R: IntoIterator<Item = C>,
        C: Into<Cell>,
    {
        let mut rows: Vec<Vec<Cell>> = rows
            .into_iter()
            .map(|row| row.into_iter().map(Into::into).collect())
            .collect();

        let column_labels = if first_row_as_column_labels && !rows.is_empty() {
            let mut header = rows.remove(0);
            if first_column_as_row_labels && !header.is_empty() {
                header.remove(0);
            }
            Some(header)
        } else {
            None
        };

        let row_labels = first_column_as_row_labels.then(|| {
            rows.iter_mut()
                .map(|row| (!row.is_empty()).then(|| row.remove(0)).unwrap_or_default())
                .collect::<Vec<_>>()
        });

        let mut grid = DataGrid::from_rows(rows);
        if let Some(header) = column_labels {
            let labels: Vec<Option<String>> =
                header.iter().map(|c| normalize_label(Some(c.as_text().as_ref()))).collect();
            if !labels.is_empty() {
                grid.grow(Axis::Column, labels.len());
                grid.set_labels(Axis::Column, labels)?;
            }
        }
        if let Some(cells) = row_labels {
            let labels: Vec<Option<String>> =
                cells.iter().map(|c| normalize_label(Some(c.as_text().as_ref()))).collect();
            if !labels.is_empty() {
                grid.set_labels(Axis::Row, labels)?;
            }
        }
        Ok(grid)
    }

    // ========================================================================
    // Shape
    // ========================================================================

    /// Number of vectors on `axis`.
    pub fn count(&self, axis: Axis) -> usize {
        self.labels(axis).len()
    }

    pub fn row_count(&self) -> usize {
        self.row_labels.len()
    }

    pub fn column_count(&self) -> usize {
        self.column_labels.len()
    }

    /// Returns `true` when the grid holds no cells.
    pub fn is_empty(&self) -> bool {
        self.row_count() == 0 || self.column_count() == 0
    }

    /// The rows, row-major.
    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.data
    }

    /// A copy of the data as plain rows.
    pub fn to_rows(&self) -> Vec<Vec<Cell>> {
        self.data.clone()
    }

    /// Swaps rows and columns, labels included.
    pub fn transpose(&mut self) -> &mut Self {
        let columns = self.column_count();
        let mut data: Vec<Vec<Cell>> = (0..columns)
            .map(|_| Vec::with_capacity(self.row_count()))
            .collect();
        for row in std::mem::take(&mut self.data) {
            for (column, cell) in data.iter_mut().zip(row) {
                column.push(cell);
            }
        }
        self.data = data;
        std::mem::swap(&mut self.row_labels, &mut self.column_labels);
        self
    }

    pub fn info(&self) -> GridInfo {
        GridInfo {
            row_count: self.row_count(),
            column_count: self.column_count(),
            row_labels: self.row_labels.clone(),
            column_labels: self.column_labels.clone(),
        }
    }

    // ========================================================================
    // Keys and labels
    // ========================================================================

    /// Resolves a key or label to a positional key.
    pub fn key(&self, axis: Axis, key: impl Into<KeyRef>) -> Result<usize> {
        match key.into() {
            KeyRef::Key(key) if key < self.count(axis) => Ok(key),
            KeyRef::Key(key) => Err(GridError::KeyNotFound { axis, key }),
            KeyRef::Label(label) => self
                .position(axis, &label)
                .ok_or(GridError::LabelNotFound { axis, label }),
        }
    }

    /// Label of a vector, if it has one.
    pub fn label(&self, axis: Axis, key: impl Into<KeyRef>) -> Result<Option<&str>> {
        let key = self.key(axis, key)?;
        Ok(self.labels(axis)[key].as_deref())
    }

    /// Labels of every vector on `axis`, in key order.
    pub fn labels(&self, axis: Axis) -> &[Option<String>] {
        match axis {
            Axis::Row => &self.row_labels,
            Axis::Column => &self.column_labels,
        }
    }

    pub fn row_labels(&self) -> &[Option<String>] {
        &self.row_labels
    }

    pub fn column_labels(&self) -> &[Option<String>] {
        &self.column_labels
    }

    /// Replaces every label on `axis`. Missing trailing labels become `None`.
    ///
    /// # Errors
    ///
    /// [`GridError::EmptyAxis`] when the axis has no vectors,
    /// [`GridError::TooManyLabels`] when more labels than vectors are given,
    /// and [`GridError::DuplicateLabel`] when a label repeats.
    pub fn set_labels<I, S>(&mut self, axis: Axis, labels: I) -> Result<&mut Self>
    where
        I: IntoIterator<Item = Option<S>>,
        S: AsRef<str>,
    {
        let count = self.count(axis);
        if count == 0 {
            return Err(GridError::EmptyAxis { axis });
        }

        let mut normalized: Vec<Option<String>> = labels
            .into_iter()
            .map(|label| normalize_label(label.as_ref().map(AsRef::as_ref)))
            .collect();
        if normalized.len() > count {
            return Err(GridError::TooManyLabels {
                axis,
                given: normalized.len(),
                count,
            });
        }
        normalized.resize(count, None);

        let mut seen = std::collections::HashSet::new();
        for label in normalized.iter().flatten() {
            if !seen.insert(label.as_str()) {
                return Err(GridError::DuplicateLabel {
                    axis,
                    label: label.clone(),
                });
            }
        }

        *self.labels_mut(axis) = normalized;
        Ok(self)
    }

    pub fn has_key(&self, axis: Axis, key: usize) -> bool {
        key < self.count(axis)
    }

    pub fn has_label(&self, axis: Axis, label: &str) -> bool {
        self.position(axis, label).is_some()
    }

    /// Gives a vector a new label, or removes its label with `None`.
    pub fn rename(
        &mut self,
        axis: Axis,
        key: impl Into<KeyRef>,
        label: Option<&str>,
    ) -> Result<&mut Self> {
        let key = self.key(axis, key)?;
        let label = self.check_label(axis, label, Some(key))?;
        self.labels_mut(axis)[key] = label;
        Ok(self)
    }

    /// Removes the label of a vector.
    pub fn clear_label(&mut self, axis: Axis, key: impl Into<KeyRef>) -> Result<&mut Self> {
        let key = self.key(axis, key)?;
        self.labels_mut(axis)[key] = None;
        Ok(self)
    }

    /// Swaps the labels of two vectors, leaving their data in place.
    pub fn swap_labels(
        &mut self,
        axis: Axis,
        a: impl Into<KeyRef>,
        b: impl Into<KeyRef>,
    ) -> Result<&mut Self> {
        let a = self.key(axis, a)?;
        let b = self.key(axis, b)?;
        self.labels_mut(axis).swap(a, b);
        Ok(self)
    }

    /// Moves a label to another key, shifting the labels in between.
    pub fn move_label(
        &mut self,
        axis: Axis,
        from: impl Into<KeyRef>,
        to: impl Into<KeyRef>,
    ) -> Result<&mut Self> {
        let to = self.key(axis, to)?;
        let from = self.key(axis, from)?;
        let labels = self.labels_mut(axis);
        let label = labels.remove(from);
        labels.insert(to, label);
        Ok(self)
    }

    // ========================================================================
    // Points
    // ========================================================================

    pub fn value(&self, row: impl Into<KeyRef>, column: impl Into<KeyRef>) -> Result<&Cell> {
        let row = self.key(Axis::Row, row)?;
        let column = self.key(Axis::Column, column)?;
        Ok(&self.data[row][column])
    }

    pub fn set_value(
        &mut self,
        row: impl Into<KeyRef>,
        column: impl Into<KeyRef>,
        value: impl Into<Cell>,
    ) -> Result<&mut Self> {
        let row = self.key(Axis::Row, row)?;
        let column = self.key(Axis::Column, column)?;
        self.data[row][column] = value.into();
        Ok(self)
    }

    /// Looks for a cell strictly equal to `value`, in the whole grid or in
    /// one vector.
    pub fn has_value(&self, value: &Cell, within: Option<(Axis, KeyRef)>) -> Result<bool> {
        match within {
            None => Ok(self.data.iter().flatten().any(|cell| cell == value)),
            Some((axis, key)) => {
                let key = self.key(axis, key)?;
                Ok(self.cells(axis, key).any(|cell| cell == value))
            }
        }
    }

    // ========================================================================
    // Internal vector primitives
    // ========================================================================

    pub(crate) fn labels_mut(&mut self, axis: Axis) -> &mut Vec<Option<String>> {
        match axis {
            Axis::Row => &mut self.row_labels,
            Axis::Column => &mut self.column_labels,
        }
    }

    pub(crate) fn position(&self, axis: Axis, label: &str) -> Option<usize> {
        self.labels(axis)
            .iter()
            .position(|l| l.as_deref() == Some(label))
    }

    /// Normalizes a label and rejects it if another key already carries it.
    pub(crate) fn check_label(
        &self,
        axis: Axis,
        label: Option<&str>,
        owner: Option<usize>,
    ) -> Result<Option<String>> {
        let label = normalize_label(label);
        if let Some(label) = &label {
            if let Some(existing) = self.position(axis, label) {
                if Some(existing) != owner {
                    return Err(GridError::DuplicateLabel {
                        axis,
                        label: label.clone(),
                    });
                }
            }
        }
        Ok(label)
    }

    /// The cell where vector `key` on `axis` crosses key `cross`.
    ///
    /// Both keys must be in range.
    pub(crate) fn cell_at(&self, axis: Axis, key: usize, cross: usize) -> &Cell {
        match axis {
            Axis::Row => &self.data[key][cross],
            Axis::Column => &self.data[cross][key],
        }
    }

    pub(crate) fn cell_at_mut(&mut self, axis: Axis, key: usize, cross: usize) -> &mut Cell {
        match axis {
            Axis::Row => &mut self.data[key][cross],
            Axis::Column => &mut self.data[cross][key],
        }
    }

    pub(crate) fn cells(&self, axis: Axis, key: usize) -> impl Iterator<Item = &Cell> + '_ {
        (0..self.count(axis.opposite())).map(move |cross| self.cell_at(axis, key, cross))
    }

    /// Adds unlabeled, null-filled vectors to `axis` until it has `len`.
    pub(crate) fn grow(&mut self, axis: Axis, len: usize) {
        if len <= self.count(axis) {
            return;
        }
        match axis {
            Axis::Row => {
                let width = self.column_count();
                self.data.resize_with(len, || vec![Cell::Null; width]);
            }
            Axis::Column => {
                for row in &mut self.data {
                    row.resize(len, Cell::Null);
                }
            }
        }
        self.labels_mut(axis).resize(len, None);
    }

    /// Pads `cells` to the cross length, growing the cross axis first when
    /// `cells` is longer.
    fn fit(&mut self, axis: Axis, mut cells: Vec<Cell>) -> Vec<Cell> {
        let cross = axis.opposite();
        self.grow(cross, cells.len());
        cells.resize(self.count(cross), Cell::Null);
        cells
    }

    /// Inserts a vector at `index`. The label must already be checked.
    pub(crate) fn insert_vector(
        &mut self,
        axis: Axis,
        index: usize,
        cells: Vec<Cell>,
        label: Option<String>,
    ) {
        let cells = self.fit(axis, cells);
        match axis {
            Axis::Row => self.data.insert(index, cells),
            Axis::Column => {
                for (row, cell) in self.data.iter_mut().zip(cells) {
                    row.insert(index, cell);
                }
            }
        }
        self.labels_mut(axis).insert(index, label);
    }

    pub(crate) fn remove_vector(&mut self, axis: Axis, key: usize) -> (Vec<Cell>, Option<String>) {
        let cells = match axis {
            Axis::Row => self.data.remove(key),
            Axis::Column => self.data.iter_mut().map(|row| row.remove(key)).collect(),
        };
        let label = self.labels_mut(axis).remove(key);
        (cells, label)
    }

    pub(crate) fn write_vector(&mut self, axis: Axis, key: usize, cells: Vec<Cell>) {
        let cells = self.fit(axis, cells);
        for (cross, cell) in cells.into_iter().enumerate() {
            *self.cell_at_mut(axis, key, cross) = cell;
        }
    }

    pub(crate) fn swap_vectors(&mut self, axis: Axis, a: usize, b: usize) {
        match axis {
            Axis::Row => self.data.swap(a, b),
            Axis::Column => {
                for row in &mut self.data {
                    row.swap(a, b);
                }
            }
        }
    }

    /// Rearranges the vectors on `axis` so that new key `i` holds old key
    /// `order[i]`. `order` must be a permutation.
    pub(crate) fn permute(&mut self, axis: Axis, order: &[usize], with_labels: bool) {
        match axis {
            Axis::Row => permute(&mut self.data, order),
            Axis::Column => {
                for row in &mut self.data {
                    permute(row, order);
                }
            }
        }
        if with_labels {
            permute(self.labels_mut(axis), order);
        }
    }

    /// A new grid holding the vectors at `keys`, in that order, with the
    /// cross axis labels copied.
    pub(crate) fn subset(&self, axis: Axis, keys: &[usize]) -> DataGrid {
        let labels: Vec<Option<String>> =
            keys.iter().map(|&k| self.labels(axis)[k].clone()).collect();
        match axis {
            Axis::Row => DataGrid {
                data: keys.iter().map(|&k| self.data[k].clone()).collect(),
                row_labels: labels,
                column_labels: self.column_labels.clone(),
            },
            Axis::Column => DataGrid {
                data: self
                    .data
                    .iter()
                    .map(|row| keys.iter().map(|&k| row[k].clone()).collect())
                    .collect(),
                row_labels: self.row_labels.clone(),
                column_labels: labels,
            },
        }
    }
}

fn permute<T>(items: &mut Vec<T>, order: &[usize]) {
    let mut slots: Vec<Option<T>> = std::mem::take(items).into_iter().map(Some).collect();
    *items = order.iter().filter_map(|&i| slots[i].take()).collect();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> DataGrid {
        let mut grid = DataGrid::from_rows([["a", "1"], ["b", "2"], ["c", "3"]]);
        grid.set_labels(Axis::Row, ["x", "y", "z"].map(Some)).unwrap();
        grid.set_labels(Axis::Column, ["name", "n"].map(Some)).unwrap();
        grid
    }

    #[test]
    fn from_rows_pads_ragged_rows() {
        let grid = DataGrid::from_rows(vec![vec![Cell::from(1)], vec![Cell::from(2), Cell::from(3)]]);
        assert_eq!(grid.row_count(), 2);
        assert_eq!(grid.column_count(), 2);
        assert_eq!(grid.rows()[0], vec![Cell::Integer(1), Cell::Null]);
        assert_eq!(grid.labels(Axis::Row), &[None, None]);
    }

    #[test]
    fn labels_from_first_row_and_column() {
        let grid = DataGrid::from_rows_with_labels(
            [["", "term", "visits"], ["r1", "job", "10"], ["r2", "news", "20"]],
            true,
            true,
        )
        .unwrap();
        assert_eq!(grid.column_labels(), &[Some("term".to_string()), Some("visits".to_string())]);
        assert_eq!(grid.row_labels(), &[Some("r1".to_string()), Some("r2".to_string())]);
        assert_eq!(grid.value("r2", "term").unwrap(), &Cell::from("news"));
    }

    #[test]
    fn labels_from_first_row_only() {
        let grid =
            DataGrid::from_rows_with_labels([["a", "b", "c"], ["1", "2", "3"]], false, true).unwrap();
        assert_eq!(grid.row_count(), 1);
        assert_eq!(grid.key(Axis::Column, "c").unwrap(), 2);
        assert_eq!(grid.row_labels(), &[None]);
    }

    #[test]
    fn header_longer_than_rows_grows_columns() {
        let grid = DataGrid::from_rows_with_labels(
            vec![vec!["a", "b", "c"], vec!["1"]],
            false,
            true,
        )
        .unwrap();
        assert_eq!(grid.column_count(), 3);
        assert_eq!(grid.rows()[0], vec![Cell::from("1"), Cell::Null, Cell::Null]);
    }

    #[test]
    fn key_resolution() {
        let grid = sample();
        assert_eq!(grid.key(Axis::Row, 2).unwrap(), 2);
        assert_eq!(grid.key(Axis::Row, "y").unwrap(), 1);
        assert!(matches!(
            grid.key(Axis::Row, 3),
            Err(GridError::KeyNotFound { key: 3, .. })
        ));
        assert!(matches!(
            grid.key(Axis::Column, "nope"),
            Err(GridError::LabelNotFound { .. })
        ));
    }

    #[test]
    fn set_labels_rules() {
        let mut grid = sample();
        grid.set_labels(Axis::Row, [Some("p"), Some("")]).unwrap();
        assert_eq!(grid.row_labels(), &[Some("p".to_string()), None, None]);

        assert!(matches!(
            grid.set_labels(Axis::Row, [Some("q"), Some("q")]),
            Err(GridError::DuplicateLabel { .. })
        ));
        assert!(matches!(
            grid.set_labels(Axis::Column, [Some("a"), Some("b"), Some("c")]),
            Err(GridError::TooManyLabels { given: 3, count: 2, .. })
        ));
        assert!(matches!(
            DataGrid::new().set_labels(Axis::Row, [Some("a")]),
            Err(GridError::EmptyAxis { axis: Axis::Row })
        ));
    }

    #[test]
    fn rename_and_clear() {
        let mut grid = sample();
        grid.rename(Axis::Row, "x", Some("first")).unwrap();
        assert_eq!(grid.label(Axis::Row, 0).unwrap(), Some("first"));
        grid.rename(Axis::Row, 0, Some("first")).unwrap();
        assert!(matches!(
            grid.rename(Axis::Row, 1, Some("first")),
            Err(GridError::DuplicateLabel { .. })
        ));
        grid.clear_label(Axis::Row, "first").unwrap();
        assert_eq!(grid.label(Axis::Row, 0).unwrap(), None);
        assert!(!grid.has_label(Axis::Row, "first"));
    }

    #[test]
    fn swap_and_move_labels_leave_data() {
        let mut grid = sample();
        grid.swap_labels(Axis::Row, "x", "z").unwrap();
        assert_eq!(
            grid.row_labels(),
            &[Some("z".to_string()), Some("y".to_string()), Some("x".to_string())]
        );
        assert_eq!(grid.value(0, 0).unwrap(), &Cell::from("a"));

        grid.move_label(Axis::Row, 0, 2).unwrap();
        assert_eq!(
            grid.row_labels(),
            &[Some("y".to_string()), Some("x".to_string()), Some("z".to_string())]
        );
    }

    #[test]
    fn points() {
        let mut grid = sample();
        grid.set_value("y", "n", 42).unwrap();
        assert_eq!(grid.value(1, 1).unwrap(), &Cell::Integer(42));
        assert!(grid.has_value(&Cell::Integer(42), None).unwrap());
        assert!(!grid.has_value(&Cell::from("42"), None).unwrap());
        assert!(grid
            .has_value(&Cell::from("c"), Some((Axis::Column, KeyRef::from("name"))))
            .unwrap());
        assert!(!grid
            .has_value(&Cell::from("c"), Some((Axis::Row, KeyRef::from("x"))))
            .unwrap());
        assert!(grid.set_value(9, 0, 1).is_err());
    }

    #[test]
    fn transpose_swaps_labels() {
        let mut grid = sample();
        grid.transpose();
        assert_eq!(grid.row_count(), 2);
        assert_eq!(grid.column_count(), 3);
        assert_eq!(grid.value("name", "z").unwrap(), &Cell::from("c"));
        grid.transpose();
        assert_eq!(grid, sample());
    }

    #[test]
    fn info_reports_shape() {
        let info = sample().info();
        assert_eq!(info.row_count, 3);
        assert_eq!(info.column_count, 2);
        assert_eq!(info.column_labels[1].as_deref(), Some("n"));
    }

    #[test]
    fn serde_snapshot() {
        let grid = sample();
        let json = serde_json::to_string(&grid).unwrap();
        assert_eq!(
            json,
            r#"{"data":[["a","1"],["b","2"],["c","3"]],"row_labels":["x","y","z"],"column_labels":["name","n"]}"#
        );
        let back: DataGrid = serde_json::from_str(&json).unwrap();
        assert_eq!(back, grid);
    }

    #[test]
    fn serde_snapshot_is_validated() {
        let err = serde_json::from_str::<DataGrid>(
            r#"{"data":[[1],[2]],"row_labels":["a","a"]}"#,
        );
        assert!(err.is_err());

        let grid: DataGrid = serde_json::from_str(r#"{"data":[[1,2],[3]]}"#).unwrap();
        assert_eq!(grid.rows()[1], vec![Cell::Integer(3), Cell::Null]);
    }
}
