//! Scalar cell values and their comparison rules.
//!
//! A [`Cell`] is the unit of grid storage. Query operands are always text, so
//! every comparison in the predicate library is "cell against string"; the
//! rules for that live here so each [`Op`](crate::Op) predicate stays short.

use std::borrow::Cow;
use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

/// A scalar-or-null grid value.
///
/// Serializes untagged, so a JSON document maps directly onto cells:
/// `null`, `true`, `42`, `4.2`, `"text"`.
///
/// # Example
///
/// ```
/// use datagrid_query::Cell;
///
/// assert!(Cell::from("10,000").loosely_equals("10,000"));
/// assert!(Cell::Integer(7).loosely_equals("7.0"));
/// assert!(Cell::Null.loosely_equals(""));
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Cell {
    /// No value.
    #[default]
    Null,
    /// Boolean value.
    Bool(bool),
    /// Signed integer.
    Integer(i64),
    /// Floating point number.
    Float(f64),
    /// Arbitrary text.
    Text(String),
}

impl Cell {
    /// Returns `true` if this is [`Cell::Null`].
    pub fn is_null(&self) -> bool {
        matches!(self, Cell::Null)
    }

    /// Returns the text, if this is a [`Cell::Text`].
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Cell::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Renders the cell the way string predicates see it.
    ///
    /// `Null` is empty, `true` is `"1"` and `false` is empty.
    pub fn as_text(&self) -> Cow<'_, str> {
        match self {
            Cell::Null => Cow::Borrowed(""),
            Cell::Bool(true) => Cow::Borrowed("1"),
            Cell::Bool(false) => Cow::Borrowed(""),
            Cell::Integer(n) => Cow::Owned(n.to_string()),
            Cell::Float(f) => Cow::Owned(f.to_string()),
            Cell::Text(s) => Cow::Borrowed(s),
        }
    }

    /// Returns the numeric view used by the ordering predicates.
    ///
    /// Floats and text go through [`separator_stripped_int`] on their text
    /// rendering, the same cast the operand gets, so `Float(2.5)` and
    /// `"2.5"` both read as `25`.
    pub fn to_number(&self) -> Number {
        match self {
            Cell::Null => Number::I64(0),
            Cell::Bool(b) => Number::I64(i64::from(*b)),
            Cell::Integer(n) => Number::I64(*n),
            Cell::Float(_) => Number::I64(separator_stripped_int(&self.as_text())),
            Cell::Text(s) => Number::I64(separator_stripped_int(s)),
        }
    }

    /// Loose equality against a query operand.
    ///
    /// Numeric-looking strings compare by value, so `"1.0"` equals `"1"` and
    /// `Integer(5)` equals `"5"`. Anything else compares as text.
    pub fn loosely_equals(&self, operand: &str) -> bool {
        match self {
            Cell::Null => operand.is_empty(),
            Cell::Bool(b) => *b == !(operand.is_empty() || operand == "0"),
            Cell::Integer(n) => match parse_numeric(operand) {
                Some(x) => Number::I64(*n).compare(Number::F64(x)) == Some(Ordering::Equal),
                None => self.as_text() == operand,
            },
            Cell::Float(f) => match parse_numeric(operand) {
                Some(x) => *f == x,
                None => self.as_text() == operand,
            },
            Cell::Text(s) => match (parse_numeric(s), parse_numeric(operand)) {
                (Some(a), Some(b)) => a == b,
                _ => s == operand,
            },
        }
    }

    /// Builds a cell from raw text, recognising integers and floats.
    ///
    /// Used by importers that opt into type inference. Empty text stays text.
    pub fn infer(text: &str) -> Cell {
        if let Ok(n) = text.parse::<i64>() {
            return Cell::Integer(n);
        }
        if let Some(f) = parse_numeric(text).filter(|_| text.trim() == text) {
            return Cell::Float(f);
        }
        Cell::Text(text.to_string())
    }
}

impl std::fmt::Display for Cell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.as_text())
    }
}

impl From<&str> for Cell {
    fn from(s: &str) -> Self {
        Cell::Text(s.to_string())
    }
}

impl From<String> for Cell {
    fn from(s: String) -> Self {
        Cell::Text(s)
    }
}

impl From<bool> for Cell {
    fn from(b: bool) -> Self {
        Cell::Bool(b)
    }
}

impl From<i32> for Cell {
    fn from(n: i32) -> Self {
        Cell::Integer(i64::from(n))
    }
}

impl From<i64> for Cell {
    fn from(n: i64) -> Self {
        Cell::Integer(n)
    }
}

impl From<f64> for Cell {
    fn from(f: f64) -> Self {
        Cell::Float(f)
    }
}

impl<T: Into<Cell>> From<Option<T>> for Cell {
    fn from(value: Option<T>) -> Self {
        value.map_or(Cell::Null, Into::into)
    }
}

/// Numeric view of a cell for ordering comparisons.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    /// Signed 64-bit integer.
    I64(i64),
    /// 64-bit floating point.
    F64(f64),
}

impl Number {
    /// Converts the number to f64 for comparison.
    pub fn to_f64(self) -> f64 {
        match self {
            Number::I64(n) => n as f64,
            Number::F64(n) => n,
        }
    }

    /// Compares two numbers, handling mixed types.
    pub fn compare(self, other: Number) -> Option<Ordering> {
        match (self, other) {
            (Number::I64(a), Number::I64(b)) => Some(a.cmp(&b)),
            _ => self.to_f64().partial_cmp(&other.to_f64()),
        }
    }
}

/// Strips spaces, commas and periods, then reads a leading integer.
///
/// Mirrors a lenient integer cast: leading whitespace and an optional sign are
/// accepted, reading stops at the first non-digit, text with no digits is `0`,
/// and values beyond `i64` saturate.
///
/// ```
/// use datagrid_query::separator_stripped_int;
///
/// assert_eq!(separator_stripped_int("10,000"), 10000);
/// assert_eq!(separator_stripped_int("1 234.5"), 12345);
/// assert_eq!(separator_stripped_int("42 apples"), 42);
/// assert_eq!(separator_stripped_int("n/a"), 0);
/// ```
pub fn separator_stripped_int(text: &str) -> i64 {
    let cleaned: String = text
        .chars()
        .filter(|c| !matches!(c, ' ' | ',' | '.'))
        .collect();
    let mut chars = cleaned.trim_start().chars().peekable();
    let negative = match chars.peek() {
        Some('-') => {
            chars.next();
            true
        }
        Some('+') => {
            chars.next();
            false
        }
        _ => false,
    };

    let mut value: i64 = 0;
    for digit in chars.map_while(|c| c.to_digit(10)) {
        let digit = i64::from(digit);
        value = if negative {
            value.saturating_mul(10).saturating_sub(digit)
        } else {
            value.saturating_mul(10).saturating_add(digit)
        };
    }
    value
}

/// Parses a numeric string: optional surrounding whitespace, optional sign,
/// digits with an optional fraction, and an optional exponent.
///
/// Returns `None` for anything else, including `inf` and `NaN` spellings.
pub fn parse_numeric(text: &str) -> Option<f64> {
    let trimmed = text.trim();
    let bytes = trimmed.as_bytes();
    let mut i = 0;

    if matches!(bytes.first(), Some(b'+' | b'-')) {
        i += 1;
    }
    let int_start = i;
    while i < bytes.len() && bytes[i].is_ascii_digit() {
        i += 1;
    }
    let mut digits = i - int_start;
    if i < bytes.len() && bytes[i] == b'.' {
        i += 1;
        let frac_start = i;
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        digits += i - frac_start;
    }
    if digits == 0 {
        return None;
    }
    if i < bytes.len() && matches!(bytes[i], b'e' | b'E') {
        i += 1;
        if i < bytes.len() && matches!(bytes[i], b'+' | b'-') {
            i += 1;
        }
        let exp_start = i;
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        if i == exp_start {
            return None;
        }
    }
    if i != bytes.len() {
        return None;
    }
    trimmed.parse::<f64>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_rendering() {
        assert_eq!(Cell::Null.as_text(), "");
        assert_eq!(Cell::Bool(true).as_text(), "1");
        assert_eq!(Cell::Bool(false).as_text(), "");
        assert_eq!(Cell::Integer(-3).as_text(), "-3");
        assert_eq!(Cell::Float(3.3).as_text(), "3.3");
        assert_eq!(Cell::from("abc").as_text(), "abc");
    }

    #[test]
    fn stripped_int_cast() {
        assert_eq!(separator_stripped_int("10,000"), 10000);
        assert_eq!(separator_stripped_int("10.000"), 10000);
        assert_eq!(separator_stripped_int(" 1 000 "), 1000);
        assert_eq!(separator_stripped_int("-42"), -42);
        assert_eq!(separator_stripped_int("+7x"), 7);
        assert_eq!(separator_stripped_int(""), 0);
        assert_eq!(separator_stripped_int("abc"), 0);
        assert_eq!(separator_stripped_int("99999999999999999999999"), i64::MAX);
        assert_eq!(separator_stripped_int("-99999999999999999999999"), i64::MIN);
    }

    #[test]
    fn numeric_strings() {
        assert_eq!(parse_numeric("12"), Some(12.0));
        assert_eq!(parse_numeric(" 1.5 "), Some(1.5));
        assert_eq!(parse_numeric("-.5"), Some(-0.5));
        assert_eq!(parse_numeric("1e3"), Some(1000.0));
        assert_eq!(parse_numeric("1."), Some(1.0));
        assert_eq!(parse_numeric("."), None);
        assert_eq!(parse_numeric("1e"), None);
        assert_eq!(parse_numeric("10,000"), None);
        assert_eq!(parse_numeric("inf"), None);
        assert_eq!(parse_numeric("NaN"), None);
        assert_eq!(parse_numeric(""), None);
    }

    #[test]
    fn loose_equality() {
        assert!(Cell::from("1.0").loosely_equals("1"));
        assert!(Cell::from("abc").loosely_equals("abc"));
        assert!(!Cell::from("abc").loosely_equals("ABC"));
        assert!(Cell::Integer(5).loosely_equals("5"));
        assert!(Cell::Integer(5).loosely_equals(" 5.0"));
        assert!(!Cell::Integer(5).loosely_equals("five"));
        assert!(Cell::Float(2.5).loosely_equals("2.5"));
        assert!(Cell::Float(2.0).loosely_equals("2"));
        assert!(!Cell::Float(2.5).loosely_equals("25"));
        assert!(Cell::Null.loosely_equals(""));
        assert!(!Cell::Null.loosely_equals("0"));
        assert!(Cell::Bool(true).loosely_equals("yes"));
        assert!(Cell::Bool(false).loosely_equals("0"));
        assert!(!Cell::Bool(false).loosely_equals("1"));
    }

    #[test]
    fn numeric_view() {
        assert_eq!(Cell::Null.to_number(), Number::I64(0));
        assert_eq!(Cell::Bool(true).to_number(), Number::I64(1));
        assert_eq!(Cell::from("12,500").to_number(), Number::I64(12500));
        assert_eq!(Cell::Float(0.5).to_number(), Number::I64(5));
        assert_eq!(Cell::Float(2.5).to_number(), Cell::from("2.5").to_number());
        assert_eq!(Cell::Float(-12.25).to_number(), Number::I64(-1225));
    }

    #[test]
    fn number_comparisons() {
        assert_eq!(
            Number::I64(5).compare(Number::I64(10)),
            Some(Ordering::Less)
        );
        assert_eq!(
            Number::I64(5).compare(Number::F64(5.0)),
            Some(Ordering::Equal)
        );
        assert_eq!(Number::F64(f64::NAN).compare(Number::I64(1)), None);
    }

    #[test]
    fn inference() {
        assert_eq!(Cell::infer("42"), Cell::Integer(42));
        assert_eq!(Cell::infer("-1.25"), Cell::Float(-1.25));
        assert_eq!(Cell::infer(" 4"), Cell::from(" 4"));
        assert_eq!(Cell::infer(""), Cell::from(""));
        assert_eq!(Cell::infer("0x10"), Cell::from("0x10"));
    }

    #[test]
    fn conversions() {
        assert_eq!(Cell::from(Some("a")), Cell::from("a"));
        assert_eq!(Cell::from(None::<i64>), Cell::Null);
        assert_eq!(Cell::from(3), Cell::Integer(3));
    }

    #[test]
    fn json_shape_is_untagged() {
        let cells: Vec<Cell> = serde_json::from_str(r#"[null, true, 3, 1.5, "x"]"#).unwrap();
        assert_eq!(
            cells,
            vec![
                Cell::Null,
                Cell::Bool(true),
                Cell::Integer(3),
                Cell::Float(1.5),
                Cell::from("x"),
            ]
        );
        assert_eq!(
            serde_json::to_string(&cells).unwrap(),
            r#"[null,true,3,1.5,"x"]"#
        );
    }
}
