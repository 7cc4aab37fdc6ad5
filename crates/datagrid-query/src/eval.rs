//! Evaluation of a compiled query against individual vectors.

use std::borrow::Cow;

use crate::axis::Axis;
use crate::cell::Cell;
use crate::rpn::Rpn;
use crate::selector::{FieldRef, Selector};
use crate::traits::Searchable;

/// A field resolved against the opposite axis of one particular source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Operand {
    Key,
    Label,
    Cross(usize),
}

#[derive(Debug)]
pub(crate) struct BoundSelector<'q> {
    pub(crate) selector: &'q Selector,
    pub(crate) operands: Vec<Operand>,
}

impl BoundSelector<'_> {
    fn matches<S: Searchable + ?Sized>(&self, source: &S, axis: Axis, key: usize) -> bool {
        let op = self.selector.op();
        self.operands.iter().any(|operand| {
            let cell = resolve(source, axis, key, *operand);
            self.selector
                .values()
                .iter()
                .any(|value| op.matches(&cell, value))
        })
    }
}

fn resolve<S: Searchable + ?Sized>(
    source: &S,
    axis: Axis,
    key: usize,
    operand: Operand,
) -> Cow<'_, Cell> {
    match operand {
        Operand::Key => Cow::Owned(Cell::Integer(i64::try_from(key).unwrap_or(i64::MAX))),
        Operand::Label => Cow::Owned(source.label(axis, key).map_or(Cell::Null, Cell::from)),
        Operand::Cross(cross) => source
            .cell(axis, key, cross)
            .map_or(Cow::Owned(Cell::Null), Cow::Borrowed),
    }
}

/// A query whose fields have been resolved for one source and axis.
///
/// Produced by [`Query::bind`](crate::Query::bind). Binding happens once per
/// search, so unknown fields are reported before any vector is visited and
/// label lookups are not repeated per vector.
#[derive(Debug)]
pub struct BoundQuery<'q> {
    axis: Axis,
    rpn: Vec<Rpn<BoundSelector<'q>>>,
}

enum Term<'a, 'q> {
    Pending(&'a BoundSelector<'q>),
    Done(bool),
}

impl Term<'_, '_> {
    fn eval<S: Searchable + ?Sized>(self, source: &S, axis: Axis, key: usize) -> bool {
        match self {
            Term::Pending(selector) => selector.matches(source, axis, key),
            Term::Done(result) => result,
        }
    }
}

impl<'q> BoundQuery<'q> {
    pub(crate) fn new(axis: Axis, rpn: Vec<Rpn<BoundSelector<'q>>>) -> Self {
        Self { axis, rpn }
    }

    pub fn axis(&self) -> Axis {
        self.axis
    }

    /// Decides whether the vector at `key` is kept.
    ///
    /// An empty query keeps everything.
    pub fn matches<S: Searchable + ?Sized>(&self, source: &S, key: usize) -> bool {
        match self.rpn.as_slice() {
            [] => true,
            [Rpn::Operand(selector)] => selector.matches(source, self.axis, key),
            tokens => {
                let mut stack = Vec::with_capacity(tokens.len());
                for token in tokens {
                    match token {
                        Rpn::Operand(selector) => stack.push(Term::Pending(selector)),
                        Rpn::Op(op) => {
                            let (Some(t2), Some(t1)) = (stack.pop(), stack.pop()) else {
                                return false;
                            };
                            let t1 = t1.eval(source, self.axis, key);
                            let t2 = t2.eval(source, self.axis, key);
                            stack.push(Term::Done(op.apply(t1, t2)));
                        }
                    }
                }
                stack
                    .pop()
                    .is_some_and(|term| term.eval(source, self.axis, key))
            }
        }
    }

    /// Keys of every vector on the axis that the query keeps, in order.
    pub fn select<S: Searchable + ?Sized>(&self, source: &S) -> Vec<usize> {
        (0..source.vector_count(self.axis))
            .filter(|&key| self.matches(source, key))
            .collect()
    }
}

pub(crate) fn bind_field<S: Searchable + ?Sized>(
    source: &S,
    axis: Axis,
    field: &FieldRef,
) -> Option<Operand> {
    let cross_axis = axis.opposite();
    match field {
        FieldRef::Key => Some(Operand::Key),
        FieldRef::Label => Some(Operand::Label),
        FieldRef::Position(n) => {
            (*n < source.vector_count(cross_axis)).then_some(Operand::Cross(*n))
        }
        FieldRef::Named(name) => source.find_label(cross_axis, name).map(Operand::Cross),
    }
}
