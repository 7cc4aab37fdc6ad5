//! Property-based tests for the query engine using proptest.

use proptest::prelude::*;
use datagrid_query::{Axis, Cell, Query, Searchable};

// ============================================================================
// Test helpers
// ============================================================================

/// Row-major table with labeled columns and unlabeled rows.
#[derive(Debug, Clone)]
struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<Cell>>,
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
            Axis::Row => None,
            Axis::Column => self.columns.get(key).map(String::as_str),
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

fn select(table: &Table, query: &str) -> Vec<usize> {
    Query::parse(query)
        .unwrap()
        .select(table, Axis::Row)
        .unwrap()
}

fn count(table: &Table, query: &str) -> usize {
    Query::parse(query)
        .unwrap()
        .count(table, Axis::Row)
        .unwrap()
}

const TERMS: &[&str] = &["find a job", "jobs", "weather", "news", "Job centre", "maps"];
const NAMES: &[&str] = &["Jeff", "Ann", "Bob"];
const SURNAMES: &[&str] = &["Jeff", "Smith", "Jones"];

// Strategy for rows of `[term, visits, name, surname]`
fn table_strategy() -> impl Strategy<Value = Table> {
    let row = (
        prop::sample::select(TERMS),
        0i64..100_000,
        prop::sample::select(NAMES),
        prop::sample::select(SURNAMES),
    )
        .prop_map(|(term, visits, name, surname)| {
            vec![
                Cell::from(term),
                Cell::from(format_thousands(visits)),
                Cell::from(name),
                Cell::from(surname),
            ]
        });

    prop::collection::vec(row, 0..60).prop_map(|rows| Table {
        columns: ["term", "visits", "name", "surname"].map(String::from).to_vec(),
        rows,
    })
}

fn format_thousands(n: i64) -> String {
    let digits = n.to_string();
    let mut out = String::new();
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

// Letters, digits, spaces and the characters that need escaping
fn raw_value_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9 |\"'+,()-]{1,20}"
}

// ============================================================================
// Property tests
// ============================================================================

proptest! {
    /// Intersection never keeps more than either side.
    #[test]
    fn intersection_is_bounded_by_each_side(table in table_strategy(), threshold in 0i64..100_000) {
        let a = "term*=job";
        let b = format!("visits>\"{}\"", format_thousands(threshold));
        let both = count(&table, &format!("{a} + {b}"));
        prop_assert!(both <= count(&table, a));
        prop_assert!(both <= count(&table, &b));
    }

    /// Union keeps at least as much as either side.
    #[test]
    fn union_covers_each_side(table in table_strategy(), threshold in 0i64..100_000) {
        let a = "term*=job";
        let b = format!("visits>{threshold}");
        let either = count(&table, &format!("{a} , {b}"));
        prop_assert!(either >= count(&table, a));
        prop_assert!(either >= count(&table, &b));
        prop_assert!(either <= table.rows.len());
    }

    /// `A - B` keeps exactly the rows of `A` that `A + B` drops.
    #[test]
    fn difference_is_a_minus_intersection(table in table_strategy(), threshold in 0i64..100_000) {
        let a = "term*=job";
        let b = format!("visits>\"{threshold}\"");
        prop_assert_eq!(
            count(&table, &format!("{a} - {b}")),
            count(&table, a) - count(&table, &format!("{a} + {b}"))
        );
    }

    /// Separators in the operand do not change numeric comparisons.
    #[test]
    fn separators_are_ignored(table in table_strategy(), threshold in 0i64..100_000) {
        prop_assert_eq!(
            select(&table, &format!("visits>\"{}\"", format_thousands(threshold))),
            select(&table, &format!("visits>{threshold}"))
        );
    }

    /// `A , B + C` groups as `A , (B + C)`.
    #[test]
    fn intersection_binds_tighter_than_union(table in table_strategy(), threshold in 0i64..100_000) {
        let implicit = select(&table, &format!("name=Ann , term*=job + visits<{threshold}"));
        let explicit = select(&table, &format!("name=Ann , (term*=job + visits<{threshold})"));
        prop_assert_eq!(implicit, explicit);
    }

    /// A multi-field selector is the union of its single-field selectors.
    #[test]
    fn field_aliasing_is_union(table in table_strategy()) {
        prop_assert_eq!(
            select(&table, "name|surname=Jeff"),
            select(&table, "name=Jeff , surname=Jeff")
        );
    }

    /// A multi-value selector is the union of its single-value selectors.
    #[test]
    fn value_alternatives_are_union(table in table_strategy()) {
        prop_assert_eq!(
            select(&table, "term=news|maps"),
            select(&table, "term=news , term=maps")
        );
    }

    /// Empty queries keep every row.
    #[test]
    fn empty_query_keeps_all(table in table_strategy()) {
        prop_assert_eq!(count(&table, ""), table.rows.len());
    }

    /// Any value without backslashes round-trips through double quoting.
    #[test]
    fn quoted_values_match_exactly(raw in raw_value_strategy()) {
        let table = Table {
            columns: vec!["v".to_string()],
            rows: vec![vec![Cell::from(raw.as_str())], vec![Cell::from("other")]],
        };
        let quoted = format!("v=\"{}\"", raw.replace('"', "\\\""));
        let query = Query::parse(&quoted).unwrap();
        prop_assert_eq!(query.selectors().next().unwrap().values(), &[raw.clone()]);
        prop_assert!(query.select(&table, Axis::Row).unwrap().contains(&0));
    }
}
