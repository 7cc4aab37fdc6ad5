//! Query compilation and execution.
//!
//! A [`Query`] is compiled once from text: tokenized, each chunk parsed into
//! a [`Selector`], converted to postfix and checked for shape. Running it
//! against a [`Searchable`] first binds every field to the opposite axis,
//! then evaluates the postfix stream once per vector.

use std::str::FromStr;

use crate::axis::Axis;
use crate::error::{QueryError, Result};
use crate::eval::{bind_field, BoundQuery, BoundSelector};
use crate::lexer::{tokenize, Token};
use crate::rpn::{to_rpn, validate, Infix, Rpn};
use crate::selector::Selector;
use crate::traits::Searchable;

/// Options applied while compiling a query.
///
/// # Example
///
/// ```
/// use datagrid_query::{Query, QueryError, QueryOptions};
///
/// let options = QueryOptions::new().max_selectors(2);
/// let err = Query::parse_with("a=1 + b=2 + c=3", &options).unwrap_err();
/// assert_eq!(err, QueryError::TooManySelectors { limit: 2 });
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryOptions {
    max_selectors: Option<usize>,
}

impl QueryOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rejects queries with more than `limit` selectors.
    pub fn max_selectors(mut self, limit: usize) -> Self {
        self.max_selectors = Some(limit);
        self
    }

    pub fn selector_limit(&self) -> Option<usize> {
        self.max_selectors
    }
}

/// A compiled query.
///
/// Queries combine selectors with `+` (intersection), `-` (difference) and
/// `,` (union). `+` and `-` bind tighter than `,`; all three associate to
/// the left; parentheses group.
///
/// # Example
///
/// ```
/// use datagrid_query::{Op, Query};
///
/// let query: Query = "term*=job, visits>\"10,000\"".parse().unwrap();
/// let ops: Vec<Op> = query.selectors().map(|s| s.op()).collect();
/// assert_eq!(ops, vec![Op::Contains, Op::Gt]);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    source: String,
    rpn: Vec<Rpn<Selector>>,
}

impl Query {
    /// Compiles a query with default options.
    pub fn parse(input: &str) -> Result<Query> {
        Query::parse_with(input, &QueryOptions::default())
    }

    /// Compiles a query.
    ///
    /// # Errors
    ///
    /// Bracket, operator and field errors from the tokenizer and selector
    /// parser, [`QueryError::TooManySelectors`] when a limit is set and
    /// exceeded, and [`QueryError::MalformedQuery`] when set operators and
    /// terms do not alternate.
    pub fn parse_with(input: &str, options: &QueryOptions) -> Result<Query> {
        let tokens = tokenize(input)?;

        if let Some(limit) = options.max_selectors {
            let selectors = tokens
                .iter()
                .filter(|t| matches!(t, Token::Chunk(_)))
                .count();
            if selectors > limit {
                return Err(QueryError::TooManySelectors { limit });
            }
        }

        let infix = tokens
            .into_iter()
            .map(|token| {
                Ok(match token {
                    Token::Chunk(chunk) => Infix::Operand(Selector::parse(&chunk)?),
                    Token::SetOp(op) => Infix::Op(op),
                    Token::Open => Infix::Open,
                    Token::Close => Infix::Close,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let rpn = to_rpn(infix);
        validate(&rpn)?;

        let query = Query {
            source: input.to_string(),
            rpn,
        };
        tracing::debug!(
            query = %query.source,
            selectors = query.selectors().count(),
            rpn_len = query.rpn.len(),
            "compiled query"
        );
        Ok(query)
    }

    /// The text this query was compiled from.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Returns `true` when the query has no terms and keeps every vector.
    pub fn is_empty(&self) -> bool {
        self.rpn.is_empty()
    }

    /// Selectors in postfix order.
    pub fn selectors(&self) -> impl Iterator<Item = &Selector> {
        self.rpn.iter().filter_map(|token| match token {
            Rpn::Operand(selector) => Some(selector),
            Rpn::Op(_) => None,
        })
    }

    /// The postfix token stream.
    pub fn rpn(&self) -> &[Rpn<Selector>] {
        &self.rpn
    }

    /// Resolves every field against the axis opposite to `axis`.
    ///
    /// # Errors
    ///
    /// [`QueryError::UnknownField`] for a name that is not a label, or a
    /// `/N` reference past the last key, of the opposite axis.
    pub fn bind<S: Searchable + ?Sized>(&self, source: &S, axis: Axis) -> Result<BoundQuery<'_>> {
        let rpn = self
            .rpn
            .iter()
            .map(|token| match token {
                Rpn::Op(op) => Ok(Rpn::Op(*op)),
                Rpn::Operand(selector) => {
                    let operands = selector
                        .fields()
                        .iter()
                        .map(|field| {
                            bind_field(source, axis, field).ok_or_else(|| {
                                QueryError::UnknownField {
                                    axis: axis.opposite(),
                                    field: field.to_string(),
                                }
                            })
                        })
                        .collect::<Result<Vec<_>>>()?;
                    Ok(Rpn::Operand(BoundSelector { selector, operands }))
                }
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(BoundQuery::new(axis, rpn))
    }

    /// Keys of the vectors along `axis` that match, in order.
    pub fn select<S: Searchable + ?Sized>(&self, source: &S, axis: Axis) -> Result<Vec<usize>> {
        let keys = self.bind(source, axis)?.select(source);
        tracing::debug!(
            %axis,
            scanned = source.vector_count(axis),
            kept = keys.len(),
            "query selected vectors"
        );
        Ok(keys)
    }

    /// Number of vectors along `axis` that match.
    pub fn count<S: Searchable + ?Sized>(&self, source: &S, axis: Axis) -> Result<usize> {
        let bound = self.bind(source, axis)?;
        Ok((0..source.vector_count(axis))
            .filter(|&key| bound.matches(source, key))
            .count())
    }

    /// Returns `true` if any vector along `axis` matches.
    pub fn any<S: Searchable + ?Sized>(&self, source: &S, axis: Axis) -> Result<bool> {
        let bound = self.bind(source, axis)?;
        Ok((0..source.vector_count(axis)).any(|key| bound.matches(source, key)))
    }
}

impl FromStr for Query {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self> {
        Query::parse(s)
    }
}

impl std::fmt::Display for Query {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::Cell;
    use crate::op::Op;
    use crate::rpn::SetOp;
    use crate::selector::FieldRef;

    /// Rows of `[term, visits]` with labels `r0`, `r1`, ...
    struct Table {
        columns: Vec<&'static str>,
        row_labels: Vec<Option<String>>,
        rows: Vec<Vec<Cell>>,
    }

    impl Table {
        fn new(rows: &[(&str, &str)]) -> Self {
            Table {
                columns: vec!["term", "visits"],
                row_labels: (0..rows.len()).map(|i| Some(format!("r{i}"))).collect(),
                rows: rows
                    .iter()
                    .map(|(term, visits)| vec![Cell::from(*term), Cell::from(*visits)])
                    .collect(),
            }
        }
    }

    impl Searchable for Table {
        fn vector_count(&self, axis: Axis) -> usize {
            match axis {
                Axis::Row => self.rows.len(),
                Axis::Column => self.columns.len(),
            }
        }

        fn label(&self, axis: Axis, key: usize) -> Option<&str> {
            match axis {
                Axis::Row => self.row_labels.get(key)?.as_deref(),
                Axis::Column => self.columns.get(key).copied(),
            }
        }

        fn cell(&self, axis: Axis, key: usize, cross: usize) -> Option<&Cell> {
            let (row, column) = match axis {
                Axis::Row => (key, cross),
                Axis::Column => (cross, key),
            };
            self.rows.get(row)?.get(column)
        }
    }

    fn table() -> Table {
        Table::new(&[
            ("find a job", "12,000"),
            ("jobs near me", "800"),
            ("weather", "50,000"),
            ("job centre", "10,000"),
            ("news", "150"),
        ])
    }

    fn select(query: &str) -> Vec<usize> {
        Query::parse(query)
            .unwrap()
            .select(&table(), Axis::Row)
            .unwrap()
    }

    #[test]
    fn empty_queries_keep_everything() {
        assert!(Query::parse("").unwrap().is_empty());
        assert!(Query::parse("()").unwrap().is_empty());
        assert_eq!(select(""), vec![0, 1, 2, 3, 4]);
        assert_eq!(select("  "), vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn single_selector() {
        assert_eq!(select("term*=job"), vec![0, 1, 3]);
        assert_eq!(select(r#"visits>"10,000""#), vec![0, 2]);
        assert_eq!(select("visits>10000"), vec![0, 2]);
    }

    #[test]
    fn set_operators() {
        assert_eq!(select(r#"term*=job, visits>"10,000""#), vec![0, 1, 2, 3]);
        assert_eq!(select(r#"term*=job + visits>"10,000""#), vec![0]);
        assert_eq!(select(r#"term*=job - visits>"10,000""#), vec![1, 3]);
    }

    #[test]
    fn union_binds_loosest() {
        assert_eq!(select("term=weather , term*=job + visits<1000"), vec![1, 2]);
        assert_eq!(select("(term=weather , term*=job) + visits<1000"), vec![1]);
    }

    #[test]
    fn difference_is_left_associative() {
        assert_eq!(select("term*=j - term*=find - term*=near"), vec![3]);
        assert_eq!(select("term*=j - (term*=find - term*=near)"), vec![1, 3]);
    }

    #[test]
    fn key_and_label_fields() {
        assert_eq!(select("/=1"), vec![1]);
        assert_eq!(select("/>2"), vec![3, 4]);
        assert_eq!(select("//=r2"), vec![2]);
        assert_eq!(select("//$=3|4"), vec![3, 4]);
        assert_eq!(select("/1>40000"), vec![2]);
    }

    #[test]
    fn column_search_resolves_row_labels() {
        let t = table();
        let query = Query::parse("r2=weather").unwrap();
        assert_eq!(query.select(&t, Axis::Column).unwrap(), vec![0]);

        let query = Query::parse("//=visits").unwrap();
        assert_eq!(query.select(&t, Axis::Column).unwrap(), vec![1]);
    }

    #[test]
    fn unknown_fields_fail_before_evaluation() {
        let err = Query::parse("surname=Jeff")
            .unwrap()
            .select(&table(), Axis::Row)
            .unwrap_err();
        assert_eq!(
            err,
            QueryError::UnknownField {
                axis: Axis::Column,
                field: "surname".into()
            }
        );

        let err = Query::parse("/7=x")
            .unwrap()
            .select(&table(), Axis::Row)
            .unwrap_err();
        assert!(matches!(err, QueryError::UnknownField { field, .. } if field == "/7"));

        let empty = Table::new(&[]);
        assert!(Query::parse("surname=Jeff")
            .unwrap()
            .select(&empty, Axis::Row)
            .is_err());
    }

    #[test]
    fn malformed_queries() {
        for query in ["a=1 +", "+ a=1", "a=1 (b=2)", "a=1 , , b=2"] {
            assert!(
                matches!(Query::parse(query), Err(QueryError::MalformedQuery { .. })),
                "{query} should be malformed"
            );
        }
    }

    #[test]
    fn selector_limit() {
        let options = QueryOptions::new().max_selectors(2);
        assert!(Query::parse_with("a=1 + b=2", &options).is_ok());
        assert_eq!(
            Query::parse_with("a=1 + b=2 , c=3", &options),
            Err(QueryError::TooManySelectors { limit: 2 })
        );
        assert_eq!(options.selector_limit(), Some(2));
        assert_eq!(QueryOptions::default().selector_limit(), None);
    }

    #[test]
    fn rpn_order() {
        let query = Query::parse("a=1 , b=2 + c=3").unwrap();
        let shape: Vec<String> = query
            .rpn()
            .iter()
            .map(|t| match t {
                Rpn::Operand(s) => s.source().to_string(),
                Rpn::Op(op) => op.to_string(),
            })
            .collect();
        assert_eq!(shape, vec!["a=1", "b=2", "c=3", "+", ","]);
        assert!(matches!(query.rpn()[4], Rpn::Op(SetOp::Union)));
    }

    #[test]
    fn selectors_expose_parsed_parts() {
        let query = Query::parse("name|/0^=jo|ma").unwrap();
        let selector = query.selectors().next().unwrap();
        assert_eq!(
            selector.fields(),
            &[FieldRef::Named("name".into()), FieldRef::Position(0)]
        );
        assert_eq!(selector.op(), Op::StartsWith);
        assert_eq!(selector.values(), &["jo", "ma"].map(String::from));
    }

    #[test]
    fn count_and_any() {
        let t = table();
        let query = Query::parse("term*=job").unwrap();
        assert_eq!(query.count(&t, Axis::Row).unwrap(), 3);
        assert!(query.any(&t, Axis::Row).unwrap());
        let none = Query::parse("term=nothing").unwrap();
        assert!(!none.any(&t, Axis::Row).unwrap());
    }

    #[test]
    fn display_and_from_str() {
        let query: Query = "a=1+b=2".parse().unwrap();
        assert_eq!(query.to_string(), "a=1+b=2");
        assert_eq!(query.source(), "a=1+b=2");
    }
}
