//! Set-expression query language for labeled grids.
//!
//! A query is a list of selectors joined by set operators:
//!
//! ```text
//! query    := term (setop term)*
//! term     := '(' query ')' | selector
//! setop    := '+' | '-' | ','
//! selector := field ('|' field)* operator value ('|' value)*
//! field    := '/' | '//' | '/' digits | simple | '"' quoted '"'
//! operator := '=' | '!=' | '>' | '<' | '>=' | '<=' | '*=' | '^=' | '$='
//! ```
//!
//! Each selector is evaluated against one row (or column) at a time.
//! Fields name cells on the opposite axis by label, `/N` names one by key,
//! and `/` and `//` stand for the vector's own key and label. Several fields
//! or several values in one selector are OR-ed.
//!
//! | set operator | meaning | precedence |
//! |---|---|---|
//! | `+` | intersection (AND) | 10 |
//! | `-` | difference (AND NOT) | 10 |
//! | `,` | union (OR) | 0 |
//!
//! # Quick Start
//!
//! ```rust
//! use datagrid_query::{Axis, Cell, Query, Searchable};
//!
//! // rows of [term, visits]
//! struct Visits(Vec<[Cell; 2]>);
//!
//! impl Searchable for Visits {
//!     fn vector_count(&self, axis: Axis) -> usize {
//!         match axis {
//!             Axis::Row => self.0.len(),
//!             Axis::Column => 2,
//!         }
//!     }
//!
//!     fn label(&self, axis: Axis, key: usize) -> Option<&str> {
//!         match axis {
//!             Axis::Row => None,
//!             Axis::Column => ["term", "visits"].get(key).copied(),
//!         }
//!     }
//!
//!     fn cell(&self, axis: Axis, key: usize, cross: usize) -> Option<&Cell> {
//!         let (row, column) = match axis {
//!             Axis::Row => (key, cross),
//!             Axis::Column => (cross, key),
//!         };
//!         self.0.get(row)?.get(column)
//!     }
//! }
//!
//! let visits = Visits(vec![
//!     ["find a job".into(), "12,000".into()],
//!     ["weather".into(), "50,000".into()],
//!     ["job centre".into(), "900".into()],
//! ]);
//!
//! let either = Query::parse(r#"term*=job , visits>"10,000""#).unwrap();
//! assert_eq!(either.select(&visits, Axis::Row).unwrap(), vec![0, 1, 2]);
//!
//! let both = Query::parse(r#"term*=job + visits>"10,000""#).unwrap();
//! assert_eq!(both.select(&visits, Axis::Row).unwrap(), vec![0]);
//! ```
//!
//! The `datagrid` crate implements [`Searchable`] for its grid type and is
//! the usual way to run queries.

mod axis;
mod cell;
mod error;
mod eval;
mod lexer;
mod op;
mod query;
mod rpn;
mod selector;
mod traits;

pub use axis::Axis;
pub use cell::{parse_numeric, separator_stripped_int, Cell, Number};
pub use error::{Bracket, QueryError, Result};
pub use eval::BoundQuery;
pub use lexer::{tokenize, Token};
pub use op::{Op, MAX_OPERATOR_LEN};
pub use query::{Query, QueryOptions};
pub use rpn::{to_rpn, Assoc, Infix, Rpn, SetOp};
pub use selector::{FieldRef, Selector, MAX_VALUE_LEN};
pub use traits::Searchable;
