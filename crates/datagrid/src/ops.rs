//! Whole-vector operations.
//!
//! Every operation takes the [`Axis`] it works on; the `*_row`/`*_column`
//! wrappers at the bottom fix the axis for the common cases.

use datagrid_query::{Axis, Cell};

use crate::error::Result;
use crate::grid::DataGrid;
use crate::key::KeyRef;
use crate::ordering::{compare_cells, Dir};
use crate::vector::GridVector;

impl DataGrid {
    // ========================================================================
    // Adding and replacing
    // ========================================================================

    /// Adds a vector after the last one.
    ///
    /// Short input is padded with nulls; longer input grows the cross axis.
    pub fn append<I, C>(&mut self, axis: Axis, cells: I, label: Option<&str>) -> Result<&mut Self>
    where
        I: IntoIterator<Item = C>,
        C: Into<Cell>,
    {
        let index = self.count(axis);
        self.insert_at(axis, index, cells, label)
    }

    /// Adds a vector before the first one, shifting existing keys up.
    pub fn prepend<I, C>(&mut self, axis: Axis, cells: I, label: Option<&str>) -> Result<&mut Self>
    where
        I: IntoIterator<Item = C>,
        C: Into<Cell>,
    {
        self.insert_at(axis, 0, cells, label)
    }

    fn insert_at<I, C>(
        &mut self,
        axis: Axis,
        index: usize,
        cells: I,
        label: Option<&str>,
    ) -> Result<&mut Self>
    where
        I: IntoIterator<Item = C>,
        C: Into<Cell>,
    {
        let label = self.check_label(axis, label, None)?;
        let cells = cells.into_iter().map(Into::into).collect();
        self.insert_vector(axis, index, cells, label);
        Ok(self)
    }

    /// Overwrites the cells of a vector, keeping its label.
    pub fn update<I, C>(&mut self, axis: Axis, key: impl Into<KeyRef>, cells: I) -> Result<&mut Self>
    where
        I: IntoIterator<Item = C>,
        C: Into<Cell>,
    {
        let key = self.key(axis, key)?;
        let cells = cells.into_iter().map(Into::into).collect();
        self.write_vector(axis, key, cells);
        Ok(self)
    }

    // ========================================================================
    // Reading
    // ========================================================================

    /// A copy of a vector's cells.
    pub fn get(&self, axis: Axis, key: impl Into<KeyRef>) -> Result<Vec<Cell>> {
        Ok(self.vector(axis, key)?.data())
    }

    /// A vector's cells paired with their cross labels.
    pub fn get_labeled(
        &self,
        axis: Axis,
        key: impl Into<KeyRef>,
    ) -> Result<Vec<(Option<&str>, &Cell)>> {
        Ok(self.vector(axis, key)?.labeled())
    }

    /// Non-null values of a vector, without repeats, in first-seen order.
    pub fn distinct(&self, axis: Axis, key: impl Into<KeyRef>) -> Result<Vec<Cell>> {
        let mut values: Vec<Cell> = Vec::new();
        for cell in self.vector(axis, key)? {
            if !cell.is_null() && !values.contains(cell) {
                values.push(cell.clone());
            }
        }
        Ok(values)
    }

    /// How often each non-null value occurs in a vector, keyed by its text.
    pub fn counts(&self, axis: Axis, key: impl Into<KeyRef>) -> Result<Vec<(String, usize)>> {
        let mut counts: Vec<(String, usize)> = Vec::new();
        for cell in self.vector(axis, key)? {
            if cell.is_null() {
                continue;
            }
            let text = cell.as_text();
            match counts.iter_mut().find(|(value, _)| *value == text) {
                Some((_, count)) => *count += 1,
                None => counts.push((text.into_owned(), 1)),
            }
        }
        Ok(counts)
    }

    /// Returns `true` when a cell of the vector equals `value` exactly.
    pub fn vector_has_value(&self, axis: Axis, key: impl Into<KeyRef>, value: &Cell) -> Result<bool> {
        Ok(self.vector(axis, key)?.iter().any(|cell| cell == value))
    }

    // ========================================================================
    // Removing
    // ========================================================================

    /// Sets every cell of a vector to null.
    pub fn empty(&mut self, axis: Axis, key: impl Into<KeyRef>) -> Result<&mut Self> {
        let key = self.key(axis, key)?;
        self.write_vector(axis, key, Vec::new());
        Ok(self)
    }

    /// Removes a vector. Higher keys shift down by one.
    pub fn delete(&mut self, axis: Axis, key: impl Into<KeyRef>) -> Result<&mut Self> {
        let key = self.key(axis, key)?;
        self.remove_vector(axis, key);
        Ok(self)
    }

    /// Removes a vector and returns its cells.
    pub fn take(&mut self, axis: Axis, key: impl Into<KeyRef>) -> Result<Vec<Cell>> {
        let key = self.key(axis, key)?;
        Ok(self.remove_vector(axis, key).0)
    }

    /// Drops every vector whose cells are all null.
    pub fn delete_empty(&mut self, axis: Axis) -> &mut Self {
        for key in (0..self.count(axis)).rev() {
            if self.cells(axis, key).all(Cell::is_null) {
                self.remove_vector(axis, key);
            }
        }
        self
    }

    // ========================================================================
    // Reordering
    // ========================================================================

    /// Exchanges two vectors. With `sticky_labels` the labels travel with
    /// the data; otherwise they stay at their keys.
    pub fn swap(
        &mut self,
        axis: Axis,
        a: impl Into<KeyRef>,
        b: impl Into<KeyRef>,
        sticky_labels: bool,
    ) -> Result<&mut Self> {
        let a = self.key(axis, a)?;
        let b = self.key(axis, b)?;
        self.swap_vectors(axis, a, b);
        if sticky_labels {
            self.labels_mut(axis).swap(a, b);
        }
        Ok(self)
    }

    /// Moves a vector to another key, shifting the vectors in between.
    pub fn move_to(
        &mut self,
        axis: Axis,
        from: impl Into<KeyRef>,
        to: impl Into<KeyRef>,
        sticky_labels: bool,
    ) -> Result<&mut Self> {
        let from = self.key(axis, from)?;
        let to = self.key(axis, to)?;
        let mut order: Vec<usize> = (0..self.count(axis)).collect();
        let moved = order.remove(from);
        order.insert(to, moved);
        self.permute(axis, &order, sticky_labels);
        Ok(self)
    }

    /// Sorts the vectors on `axis` by their cell at cross key `by`.
    ///
    /// The sort is stable and uses [`compare_cells`].
    pub fn order_by(
        &mut self,
        axis: Axis,
        by: impl Into<KeyRef>,
        dir: Dir,
        sticky_labels: bool,
    ) -> Result<&mut Self> {
        let by = self.key(axis.opposite(), by)?;
        let mut order: Vec<usize> = (0..self.count(axis)).collect();
        order.sort_by(|&a, &b| {
            dir.apply(compare_cells(
                self.cell_at(axis, a, by),
                self.cell_at(axis, b, by),
            ))
        });
        self.permute(axis, &order, sticky_labels);
        Ok(self)
    }

    // ========================================================================
    // Combining
    // ========================================================================

    /// A new grid with the vectors the predicate accepts.
    pub fn filter<F>(&self, axis: Axis, mut predicate: F) -> DataGrid
    where
        F: FnMut(&GridVector<'_>) -> bool,
    {
        let keys: Vec<usize> = self
            .vectors(axis)
            .filter(|vector| predicate(vector))
            .map(|vector| vector.key())
            .collect();
        self.subset(axis, &keys)
    }

    /// Appends the vectors of `other` whose label is not already present.
    ///
    /// Cross labels of `other` fill in the cross keys the merge adds, unless
    /// this grid already uses them.
    pub fn merge(&mut self, axis: Axis, other: &DataGrid) -> &mut Self {
        let cross = axis.opposite();
        let before = self.count(cross);

        for vector in other.vectors(axis) {
            let label = vector.label();
            if label.is_some_and(|label| self.has_label(axis, label)) {
                continue;
            }
            let index = self.count(axis);
            self.insert_vector(axis, index, vector.data(), label.map(String::from));
        }

        let added = before..self.count(cross).min(other.count(cross));
        for key in added {
            if let Some(label) = other.labels(cross)[key].as_deref() {
                if !self.has_label(cross, label) {
                    self.labels_mut(cross)[key] = Some(label.to_string());
                }
            }
        }
        self
    }

    /// Drops the labeled vectors whose label also occurs in `other`.
    pub fn diff(&mut self, axis: Axis, other: &DataGrid) -> &mut Self {
        self.retain_labels(axis, |label| {
            label.map_or(true, |label| !other.has_label(axis, label))
        })
    }

    /// Keeps only the vectors whose label also occurs in `other`.
    pub fn intersect(&mut self, axis: Axis, other: &DataGrid) -> &mut Self {
        self.retain_labels(axis, |label| {
            label.is_some_and(|label| other.has_label(axis, label))
        })
    }

    fn retain_labels<F>(&mut self, axis: Axis, mut keep: F) -> &mut Self
    where
        F: FnMut(Option<&str>) -> bool,
    {
        for key in (0..self.count(axis)).rev() {
            if !keep(self.labels(axis)[key].as_deref()) {
                self.remove_vector(axis, key);
            }
        }
        self
    }

    // ========================================================================
    // Row and column shorthands
    // ========================================================================

    pub fn append_row<I, C>(&mut self, cells: I, label: Option<&str>) -> Result<&mut Self>
    where
        I: IntoIterator<Item = C>,
        C: Into<Cell>,
    {
        self.append(Axis::Row, cells, label)
    }

    pub fn append_column<I, C>(&mut self, cells: I, label: Option<&str>) -> Result<&mut Self>
    where
        I: IntoIterator<Item = C>,
        C: Into<Cell>,
    {
        self.append(Axis::Column, cells, label)
    }

    pub fn prepend_row<I, C>(&mut self, cells: I, label: Option<&str>) -> Result<&mut Self>
    where
        I: IntoIterator<Item = C>,
        C: Into<Cell>,
    {
        self.prepend(Axis::Row, cells, label)
    }

    pub fn prepend_column<I, C>(&mut self, cells: I, label: Option<&str>) -> Result<&mut Self>
    where
        I: IntoIterator<Item = C>,
        C: Into<Cell>,
    {
        self.prepend(Axis::Column, cells, label)
    }

    pub fn update_row<I, C>(&mut self, key: impl Into<KeyRef>, cells: I) -> Result<&mut Self>
    where
        I: IntoIterator<Item = C>,
        C: Into<Cell>,
    {
        self.update(Axis::Row, key, cells)
    }

    pub fn update_column<I, C>(&mut self, key: impl Into<KeyRef>, cells: I) -> Result<&mut Self>
    where
        I: IntoIterator<Item = C>,
        C: Into<Cell>,
    {
        self.update(Axis::Column, key, cells)
    }

    pub fn get_row(&self, key: impl Into<KeyRef>) -> Result<Vec<Cell>> {
        self.get(Axis::Row, key)
    }

    pub fn get_column(&self, key: impl Into<KeyRef>) -> Result<Vec<Cell>> {
        self.get(Axis::Column, key)
    }

    pub fn delete_row(&mut self, key: impl Into<KeyRef>) -> Result<&mut Self> {
        self.delete(Axis::Row, key)
    }

    pub fn delete_column(&mut self, key: impl Into<KeyRef>) -> Result<&mut Self> {
        self.delete(Axis::Column, key)
    }

    pub fn take_row(&mut self, key: impl Into<KeyRef>) -> Result<Vec<Cell>> {
        self.take(Axis::Row, key)
    }

    pub fn take_column(&mut self, key: impl Into<KeyRef>) -> Result<Vec<Cell>> {
        self.take(Axis::Column, key)
    }

    pub fn swap_rows(&mut self, a: impl Into<KeyRef>, b: impl Into<KeyRef>) -> Result<&mut Self> {
        self.swap(Axis::Row, a, b, true)
    }

    pub fn swap_columns(&mut self, a: impl Into<KeyRef>, b: impl Into<KeyRef>) -> Result<&mut Self> {
        self.swap(Axis::Column, a, b, true)
    }

    pub fn move_row(&mut self, from: impl Into<KeyRef>, to: impl Into<KeyRef>) -> Result<&mut Self> {
        self.move_to(Axis::Row, from, to, true)
    }

    pub fn move_column(
        &mut self,
        from: impl Into<KeyRef>,
        to: impl Into<KeyRef>,
    ) -> Result<&mut Self> {
        self.move_to(Axis::Column, from, to, true)
    }

    pub fn order_rows(&mut self, by: impl Into<KeyRef>, dir: Dir) -> Result<&mut Self> {
        self.order_by(Axis::Row, by, dir, true)
    }

    pub fn order_columns(&mut self, by: impl Into<KeyRef>, dir: Dir) -> Result<&mut Self> {
        self.order_by(Axis::Column, by, dir, true)
    }

    pub fn filter_rows<F>(&self, predicate: F) -> DataGrid
    where
        F: FnMut(&GridVector<'_>) -> bool,
    {
        self.filter(Axis::Row, predicate)
    }

    pub fn filter_columns<F>(&self, predicate: F) -> DataGrid
    where
        F: FnMut(&GridVector<'_>) -> bool,
    {
        self.filter(Axis::Column, predicate)
    }

    pub fn merge_rows(&mut self, other: &DataGrid) -> &mut Self {
        self.merge(Axis::Row, other)
    }

    pub fn merge_columns(&mut self, other: &DataGrid) -> &mut Self {
        self.merge(Axis::Column, other)
    }

    pub fn diff_rows(&mut self, other: &DataGrid) -> &mut Self {
        self.diff(Axis::Row, other)
    }

    pub fn diff_columns(&mut self, other: &DataGrid) -> &mut Self {
        self.diff(Axis::Column, other)
    }

    pub fn intersect_rows(&mut self, other: &DataGrid) -> &mut Self {
        self.intersect(Axis::Row, other)
    }

    pub fn intersect_columns(&mut self, other: &DataGrid) -> &mut Self {
        self.intersect(Axis::Column, other)
    }

    pub fn delete_empty_rows(&mut self) -> &mut Self {
        self.delete_empty(Axis::Row)
    }

    pub fn delete_empty_columns(&mut self) -> &mut Self {
        self.delete_empty(Axis::Column)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GridError;

    fn labels(grid: &DataGrid, axis: Axis) -> Vec<Option<&str>> {
        grid.labels(axis).iter().map(|l| l.as_deref()).collect()
    }

    fn people() -> DataGrid {
        let mut grid = DataGrid::from_rows([
            ["ann", "34", "oslo"],
            ["bob", "27", "rome"],
            ["cid", "34", "oslo"],
        ]);
        grid.set_labels(Axis::Row, ["a", "b", "c"].map(Some)).unwrap();
        grid.set_labels(Axis::Column, ["name", "age", "city"].map(Some))
            .unwrap();
        grid
    }

    #[test]
    fn append_and_prepend() {
        let mut grid = people();
        grid.append_row(["dan", "40", "kyiv"], Some("d"))
            .unwrap()
            .prepend_row(["eve"], None)
            .unwrap();
        assert_eq!(grid.row_count(), 5);
        assert_eq!(grid.get_row(0).unwrap(), vec![Cell::from("eve"), Cell::Null, Cell::Null]);
        assert_eq!(grid.key(Axis::Row, "d").unwrap(), 4);
        assert_eq!(labels(&grid, Axis::Row)[0], None);
    }

    #[test]
    fn append_rejects_duplicate_labels() {
        let mut grid = people();
        assert!(matches!(
            grid.append_column(["x", "y", "z"], Some("age")),
            Err(GridError::DuplicateLabel { .. })
        ));
        assert_eq!(grid.column_count(), 3);
    }

    #[test]
    fn long_vectors_grow_the_grid() {
        let mut grid = people();
        grid.append_column(["1", "2", "3", "4"], Some("score")).unwrap();
        assert_eq!(grid.row_count(), 4);
        assert_eq!(
            grid.get_row(3).unwrap(),
            vec![Cell::Null, Cell::Null, Cell::Null, Cell::from("4")]
        );

        let mut grid = DataGrid::new();
        grid.append_row([1, 2], None).unwrap();
        assert_eq!(grid.column_count(), 2);
    }

    #[test]
    fn update_keeps_label() {
        let mut grid = people();
        grid.update_column("age", [1, 2]).unwrap();
        assert_eq!(
            grid.get_column("age").unwrap(),
            vec![Cell::Integer(1), Cell::Integer(2), Cell::Null]
        );
        assert_eq!(grid.label(Axis::Column, 1).unwrap(), Some("age"));
    }

    #[test]
    fn distinct_and_counts() {
        let mut grid = people();
        grid.set_value("b", "city", Cell::Null).unwrap();
        assert_eq!(
            grid.distinct(Axis::Column, "age").unwrap(),
            vec![Cell::from("34"), Cell::from("27")]
        );
        assert_eq!(
            grid.counts(Axis::Column, "city").unwrap(),
            vec![("oslo".to_string(), 2)]
        );
    }

    #[test]
    fn get_labeled_pairs_cross_labels() {
        let grid = people();
        let row = grid.get_labeled(Axis::Row, "b").unwrap();
        assert_eq!(row[1], (Some("age"), &Cell::from("27")));
    }

    #[test]
    fn empty_delete_take() {
        let mut grid = people();
        grid.empty(Axis::Row, "a").unwrap();
        assert!(grid.get_row("a").unwrap().iter().all(Cell::is_null));

        let taken = grid.take_column("name").unwrap();
        assert_eq!(taken, vec![Cell::Null, Cell::from("bob"), Cell::from("cid")]);
        assert_eq!(grid.key(Axis::Column, "city").unwrap(), 1);

        grid.delete_row(0).unwrap();
        assert_eq!(labels(&grid, Axis::Row), vec![Some("b"), Some("c")]);
        assert!(grid.delete_row("a").is_err());
    }

    #[test]
    fn delete_empty_vectors() {
        let mut grid = people();
        grid.empty(Axis::Row, "b").unwrap();
        grid.append_column(Vec::<Cell>::new(), Some("blank")).unwrap();
        grid.delete_empty_rows().delete_empty_columns();
        assert_eq!(labels(&grid, Axis::Row), vec![Some("a"), Some("c")]);
        assert!(!grid.has_label(Axis::Column, "blank"));
    }

    #[test]
    fn swap_sticky_and_loose() {
        let mut grid = people();
        grid.swap_rows("a", "c").unwrap();
        assert_eq!(grid.value("a", "name").unwrap(), &Cell::from("ann"));
        assert_eq!(grid.key(Axis::Row, "a").unwrap(), 2);

        let mut grid = people();
        grid.swap(Axis::Row, 0, 2, false).unwrap();
        assert_eq!(grid.value("a", "name").unwrap(), &Cell::from("cid"));
    }

    #[test]
    fn move_shifts_between() {
        let mut grid = people();
        grid.move_column("name", 2).unwrap();
        assert_eq!(
            labels(&grid, Axis::Column),
            vec![Some("age"), Some("city"), Some("name")]
        );
        assert_eq!(grid.value(0, 2).unwrap(), &Cell::from("ann"));

        let mut grid = people();
        grid.move_to(Axis::Row, 2, 0, false).unwrap();
        assert_eq!(grid.value("a", "name").unwrap(), &Cell::from("cid"));
    }

    #[test]
    fn order_is_stable() {
        let mut grid = people();
        grid.order_rows("age", Dir::Asc).unwrap();
        assert_eq!(labels(&grid, Axis::Row), vec![Some("b"), Some("a"), Some("c")]);

        let mut grid = people();
        grid.order_rows("age", Dir::Desc).unwrap();
        assert_eq!(labels(&grid, Axis::Row), vec![Some("a"), Some("c"), Some("b")]);

        let mut grid = people();
        grid.order_by(Axis::Row, "name", Dir::Desc, false).unwrap();
        assert_eq!(labels(&grid, Axis::Row), vec![Some("a"), Some("b"), Some("c")]);
        assert_eq!(grid.value(0, "name").unwrap(), &Cell::from("cid"));
    }

    #[test]
    fn filter_returns_new_grid() {
        let grid = people();
        let oslo = grid.filter_rows(|row| row[2] == Cell::from("oslo"));
        assert_eq!(labels(&oslo, Axis::Row), vec![Some("a"), Some("c")]);
        assert_eq!(oslo.column_labels(), grid.column_labels());

        let narrow = grid.filter_columns(|column| column.label() != Some("age"));
        assert_eq!(narrow.column_count(), 2);
        assert_eq!(grid.column_count(), 3);
    }

    #[test]
    fn merge_skips_known_labels() {
        let mut grid = people();
        let mut other = DataGrid::from_rows([["bob", "99", "x", "extra"], ["fay", "22", "lima", "y"]]);
        other
            .set_labels(Axis::Row, ["b", "f"].map(Some))
            .unwrap()
            .set_labels(Axis::Column, ["n", "a", "c", "note"].map(Some))
            .unwrap();
        grid.merge_rows(&other);

        assert_eq!(grid.row_count(), 4);
        assert_eq!(grid.value("f", "city").unwrap(), &Cell::from("lima"));
        assert_eq!(grid.value("f", "note").unwrap(), &Cell::from("y"));
        assert_eq!(grid.value("a", 3).unwrap(), &Cell::Null);
    }

    #[test]
    fn diff_and_intersect() {
        let mut other = DataGrid::from_rows([["x"], ["y"]]);
        other.set_labels(Axis::Row, ["a", "z"].map(Some)).unwrap();

        let mut grid = people();
        grid.append_row(["anon"], None).unwrap();
        grid.diff_rows(&other);
        assert_eq!(labels(&grid, Axis::Row), vec![Some("b"), Some("c"), None]);

        let mut grid = people();
        grid.append_row(["anon"], None).unwrap();
        grid.intersect_rows(&other);
        assert_eq!(labels(&grid, Axis::Row), vec![Some("a")]);
    }

    #[test]
    fn vector_has_value_is_strict() {
        let mut grid = people();
        grid.set_value("a", "age", 34).unwrap();
        assert!(grid.vector_has_value(Axis::Column, "age", &Cell::Integer(34)).unwrap());
        assert!(grid.vector_has_value(Axis::Column, "age", &Cell::from("34")).unwrap());
        assert!(!grid.vector_has_value(Axis::Row, "b", &Cell::Integer(27)).unwrap());
    }
}
