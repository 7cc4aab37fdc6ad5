//! Set operators and the infix-to-postfix conversion.
//!
//! Queries combine selectors with three binary set operators. Conversion
//! to reverse Polish notation is the classic shunting-yard algorithm: an
//! incoming operator flushes stacked operators that bind at least as tightly
//! (left-associative) or strictly tighter (right-associative).

use std::cmp::Ordering;

use crate::error::{QueryError, Result};

/// Associativity of a set operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Assoc {
    Left,
    Right,
}

/// A binary set operator joining two query terms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SetOp {
    /// `+`: both terms match.
    Intersect,
    /// `-`: the left term matches and the right one does not.
    Difference,
    /// `,`: either term matches.
    Union,
}

impl SetOp {
    /// Parses a set operator character.
    pub fn from_char(c: char) -> Option<SetOp> {
        match c {
            '+' => Some(SetOp::Intersect),
            '-' => Some(SetOp::Difference),
            ',' => Some(SetOp::Union),
            _ => None,
        }
    }

    pub fn as_char(self) -> char {
        match self {
            SetOp::Intersect => '+',
            SetOp::Difference => '-',
            SetOp::Union => ',',
        }
    }

    /// Binding strength; higher binds tighter.
    pub fn precedence(self) -> u8 {
        match self {
            SetOp::Intersect | SetOp::Difference => 10,
            SetOp::Union => 0,
        }
    }

    pub fn assoc(self) -> Assoc {
        match self {
            SetOp::Intersect | SetOp::Difference | SetOp::Union => Assoc::Left,
        }
    }

    /// Combines the results of the left (`t1`) and right (`t2`) terms.
    pub fn apply(self, t1: bool, t2: bool) -> bool {
        match self {
            SetOp::Intersect => t1 && t2,
            SetOp::Difference => t1 && !t2,
            SetOp::Union => t1 || t2,
        }
    }

    /// Returns `true` if `self`, arriving after `top`, must pop `top` first.
    fn yields_to(self, top: SetOp) -> bool {
        let order = self.precedence().cmp(&top.precedence());
        match self.assoc() {
            Assoc::Left => order != Ordering::Greater,
            Assoc::Right => order == Ordering::Less,
        }
    }
}

impl std::fmt::Display for SetOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// One item of an infix expression over operands `T`.
#[derive(Debug, Clone, PartialEq)]
pub enum Infix<T> {
    Operand(T),
    Op(SetOp),
    Open,
    Close,
}

/// One item of a postfix expression over operands `T`.
#[derive(Debug, Clone, PartialEq)]
pub enum Rpn<T> {
    Operand(T),
    Op(SetOp),
}

enum Stacked {
    Op(SetOp),
    Open,
}

/// Reorders an infix stream into postfix.
///
/// Brackets are consumed and never emitted. A `)` without a partner just
/// drains the stack; callers are expected to have checked bracket balance.
pub fn to_rpn<T>(tokens: impl IntoIterator<Item = Infix<T>>) -> Vec<Rpn<T>> {
    let mut out = Vec::new();
    let mut stack: Vec<Stacked> = Vec::new();

    for token in tokens {
        match token {
            Infix::Operand(operand) => out.push(Rpn::Operand(operand)),
            Infix::Op(op) => {
                while let Some(Stacked::Op(top)) = stack.last() {
                    if !op.yields_to(*top) {
                        break;
                    }
                    out.push(Rpn::Op(*top));
                    stack.pop();
                }
                stack.push(Stacked::Op(op));
            }
            Infix::Open => stack.push(Stacked::Open),
            Infix::Close => {
                while let Some(Stacked::Op(top)) = stack.pop() {
                    out.push(Rpn::Op(top));
                }
            }
        }
    }

    while let Some(top) = stack.pop() {
        if let Stacked::Op(op) = top {
            out.push(Rpn::Op(op));
        }
    }
    out
}

/// Checks that a postfix stream reduces to at most one value.
///
/// Every operator needs two operands below it, and no operand may be left
/// over at the end. An empty stream is valid.
pub fn validate<T>(rpn: &[Rpn<T>]) -> Result<()> {
    let mut depth = 0usize;
    for token in rpn {
        match token {
            Rpn::Operand(_) => depth += 1,
            Rpn::Op(op) => {
                if depth < 2 {
                    return Err(QueryError::malformed(format!(
                        "set operator '{op}' needs a term on each side"
                    )));
                }
                depth -= 1;
            }
        }
    }
    if depth > 1 {
        return Err(QueryError::malformed(
            "terms must be joined by '+', '-' or ','",
        ));
    }
    Ok(())
}
