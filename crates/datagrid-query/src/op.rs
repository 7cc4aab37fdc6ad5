//! The selector predicate library.
//!
//! Each [`Op`] maps one operator symbol to a binary predicate of
//! `(cell, operand)`. The set is fixed; the characters used by its symbols
//! form the alphabet the selector parser scans for.

use std::cmp::Ordering;

use crate::cell::{separator_stripped_int, Cell, Number};

/// Longest operator symbol, in characters.
pub const MAX_OPERATOR_LEN: usize = 2;

/// Comparison operator for a selector.
///
/// - **Equality**: `=` loose equality, `!=` its negation
/// - **Numeric**: `>`, `<`, `>=`, `<=` after separator stripping
/// - **Text**: `*=` contains, `^=` starts with, `$=` ends with (case-insensitive)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Op {
    /// `=`
    Eq,
    /// `!=`
    Ne,
    /// `>`
    Gt,
    /// `<`
    Lt,
    /// `>=`
    Gte,
    /// `<=`
    Lte,
    /// `*=`
    Contains,
    /// `^=`
    StartsWith,
    /// `$=`
    EndsWith,
}

impl Op {
    /// Every operator in the library.
    pub const ALL: [Op; 9] = [
        Op::Eq,
        Op::Ne,
        Op::Gt,
        Op::Lt,
        Op::Gte,
        Op::Lte,
        Op::Contains,
        Op::StartsWith,
        Op::EndsWith,
    ];

    /// Looks up an operator by its symbol.
    pub fn from_symbol(symbol: &str) -> Option<Op> {
        Op::ALL.into_iter().find(|op| op.symbol() == symbol)
    }

    /// Returns the query-language symbol of this operator.
    pub fn symbol(self) -> &'static str {
        match self {
            Op::Eq => "=",
            Op::Ne => "!=",
            Op::Gt => ">",
            Op::Lt => "<",
            Op::Gte => ">=",
            Op::Lte => "<=",
            Op::Contains => "*=",
            Op::StartsWith => "^=",
            Op::EndsWith => "$=",
        }
    }

    /// Returns `true` if `c` appears in any operator symbol.
    pub fn is_operator_char(c: char) -> bool {
        Op::ALL.iter().any(|op| op.symbol().contains(c))
    }

    /// Applies the predicate to a resolved cell and a query operand.
    pub fn matches(self, cell: &Cell, operand: &str) -> bool {
        match self {
            Op::Eq => cell.loosely_equals(operand),
            Op::Ne => !cell.loosely_equals(operand),
            Op::Gt => numeric_ordering(cell, operand).is_some_and(Ordering::is_gt),
            Op::Lt => numeric_ordering(cell, operand).is_some_and(Ordering::is_lt),
            Op::Gte => numeric_ordering(cell, operand).is_some_and(Ordering::is_ge),
            Op::Lte => numeric_ordering(cell, operand).is_some_and(Ordering::is_le),
            Op::Contains => cell
                .as_text()
                .to_lowercase()
                .contains(&operand.to_lowercase()),
            Op::StartsWith => cell
                .as_text()
                .trim()
                .to_lowercase()
                .starts_with(&operand.to_lowercase()),
            Op::EndsWith => cell
                .as_text()
                .trim()
                .to_lowercase()
                .ends_with(&operand.trim().to_lowercase()),
        }
    }
}

/// Orders the cell against the operand after both are separator-stripped
/// and cast to integers.
fn numeric_ordering(cell: &Cell, operand: &str) -> Option<Ordering> {
    cell.to_number()
        .compare(Number::I64(separator_stripped_int(operand)))
}

impl std::fmt::Display for Op {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.symbol())
    }
}
