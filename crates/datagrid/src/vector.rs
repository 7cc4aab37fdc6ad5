//! Row and column views.
//!
//! A [`GridVector`] borrows one row or column of a grid and reads its cells
//! by cross key or label. [`GridVectorMut`] also writes them.

use std::ops::Index;

use datagrid_query::{Axis, Cell};

use crate::error::Result;
use crate::grid::DataGrid;
use crate::key::KeyRef;

/// A read-only view of one row or column.
#[derive(Debug, Clone, Copy)]
pub struct GridVector<'g> {
    grid: &'g DataGrid,
    axis: Axis,
    key: usize,
}

impl<'g> GridVector<'g> {
    pub(crate) fn new(grid: &'g DataGrid, axis: Axis, key: usize) -> Self {
        GridVector { grid, axis, key }
    }

    pub fn axis(&self) -> Axis {
        self.axis
    }

    pub fn key(&self) -> usize {
        self.key
    }

    pub fn label(&self) -> Option<&'g str> {
        self.grid.labels(self.axis)[self.key].as_deref()
    }

    /// Number of cells, the length of the cross axis.
    pub fn len(&self) -> usize {
        self.grid.count(self.axis.opposite())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The cell at a cross key or label.
    pub fn get(&self, cross: impl Into<KeyRef>) -> Result<&'g Cell> {
        let cross = self.grid.key(self.axis.opposite(), cross)?;
        Ok(self.grid.cell_at(self.axis, self.key, cross))
    }

    /// Returns `true` when the cross key or label exists.
    pub fn contains(&self, cross: impl Into<KeyRef>) -> bool {
        self.grid.key(self.axis.opposite(), cross).is_ok()
    }

    pub fn iter(&self) -> impl Iterator<Item = &'g Cell> + 'g {
        self.grid.cells(self.axis, self.key)
    }

    /// A copy of the cells.
    pub fn data(&self) -> Vec<Cell> {
        self.iter().cloned().collect()
    }

    /// The cells paired with their cross labels.
    pub fn labeled(&self) -> Vec<(Option<&'g str>, &'g Cell)> {
        self.grid
            .labels(self.axis.opposite())
            .iter()
            .map(|label| label.as_deref())
            .zip(self.iter())
            .collect()
    }
}

impl Index<usize> for GridVector<'_> {
    type Output = Cell;

    /// Panics when `cross` is out of range.
    fn index(&self, cross: usize) -> &Cell {
        self.grid.cell_at(self.axis, self.key, cross)
    }
}

impl<'g> IntoIterator for GridVector<'g> {
    type Item = &'g Cell;
    type IntoIter = Box<dyn Iterator<Item = &'g Cell> + 'g>;

    fn into_iter(self) -> Self::IntoIter {
        Box::new(self.grid.cells(self.axis, self.key))
    }
}

/// A writable view of one row or column.
#[derive(Debug)]
pub struct GridVectorMut<'g> {
    grid: &'g mut DataGrid,
    axis: Axis,
    key: usize,
}

impl<'g> GridVectorMut<'g> {
    pub(crate) fn new(grid: &'g mut DataGrid, axis: Axis, key: usize) -> Self {
        GridVectorMut { grid, axis, key }
    }

    /// Reborrows as a read-only view.
    pub fn as_view(&self) -> GridVector<'_> {
        GridVector::new(self.grid, self.axis, self.key)
    }

    pub fn get(&self, cross: impl Into<KeyRef>) -> Result<&Cell> {
        let cross = self.grid.key(self.axis.opposite(), cross)?;
        Ok(self.grid.cell_at(self.axis, self.key, cross))
    }

    pub fn set(&mut self, cross: impl Into<KeyRef>, value: impl Into<Cell>) -> Result<&mut Self> {
        let cross = self.grid.key(self.axis.opposite(), cross)?;
        *self.grid.cell_at_mut(self.axis, self.key, cross) = value.into();
        Ok(self)
    }

    /// Clears a cell to null.
    pub fn unset(&mut self, cross: impl Into<KeyRef>) -> Result<&mut Self> {
        self.set(cross, Cell::Null)
    }
}

impl DataGrid {
    /// A view of the vector at `key` on `axis`.
    pub fn vector(&self, axis: Axis, key: impl Into<KeyRef>) -> Result<GridVector<'_>> {
        let key = self.key(axis, key)?;
        Ok(GridVector::new(self, axis, key))
    }

    pub fn vector_mut(&mut self, axis: Axis, key: impl Into<KeyRef>) -> Result<GridVectorMut<'_>> {
        let key = self.key(axis, key)?;
        Ok(GridVectorMut::new(self, axis, key))
    }

    pub fn row(&self, key: impl Into<KeyRef>) -> Result<GridVector<'_>> {
        self.vector(Axis::Row, key)
    }

    pub fn column(&self, key: impl Into<KeyRef>) -> Result<GridVector<'_>> {
        self.vector(Axis::Column, key)
    }

    pub fn row_mut(&mut self, key: impl Into<KeyRef>) -> Result<GridVectorMut<'_>> {
        self.vector_mut(Axis::Row, key)
    }

    pub fn column_mut(&mut self, key: impl Into<KeyRef>) -> Result<GridVectorMut<'_>> {
        self.vector_mut(Axis::Column, key)
    }

    /// Every vector on `axis`, in key order.
    pub fn vectors(&self, axis: Axis) -> impl Iterator<Item = GridVector<'_>> + '_ {
        (0..self.count(axis)).map(move |key| GridVector::new(self, axis, key))
    }
}
