//! Selector parsing.
//!
//! A selector is one `field op value` clause, for example `name|surname*=jeff`
//! or `"a|b"='x\'y'|z`. Parsing runs a cursor over the chunk in three steps:
//! fields, operator, values. Each step consumes what it recognises and leaves
//! the cursor on the first byte it did not use.

use crate::error::{QueryError, Result};
use crate::op::{Op, MAX_OPERATOR_LEN};

/// Longest value a selector reads, in characters, opening quote included.
/// Anything past it is dropped.
pub const MAX_VALUE_LEN: usize = 1000;

/// How a selector field locates its operand in a vector.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FieldRef {
    /// `/`: the vector's own key.
    Key,
    /// `//`: the vector's own label.
    Label,
    /// `/N`: the cell at key `N` of the opposite axis.
    Position(usize),
    /// Any other name: the cell under that opposite-axis label.
    Named(String),
}

impl FieldRef {
    fn classify(name: &str) -> FieldRef {
        match name {
            "/" => FieldRef::Key,
            "//" => FieldRef::Label,
            _ => name
                .strip_prefix('/')
                .filter(|digits| !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()))
                .and_then(|digits| digits.parse().ok())
                .map_or_else(|| FieldRef::Named(name.to_string()), FieldRef::Position),
        }
    }
}

impl std::fmt::Display for FieldRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FieldRef::Key => f.write_str("/"),
            FieldRef::Label => f.write_str("//"),
            FieldRef::Position(n) => write!(f, "/{n}"),
            FieldRef::Named(name) => f.write_str(name),
        }
    }
}

/// A parsed `field op value` clause.
///
/// Fields and values are both non-empty, and both are OR-ed: the selector
/// matches when any field satisfies the operator against any value.
#[derive(Debug, Clone, PartialEq)]
pub struct Selector {
    fields: Vec<FieldRef>,
    op: Op,
    values: Vec<String>,
    source: String,
}

impl Selector {
    /// Parses one selector chunk.
    ///
    /// # Errors
    ///
    /// [`QueryError::MissingField`] when the chunk does not start with a
    /// field, and [`QueryError::InvalidOperator`] when the operator is empty
    /// or not one of [`Op::ALL`].
    pub fn parse(chunk: &str) -> Result<Selector> {
        let mut cursor = Cursor::new(chunk.trim());

        let fields = cursor.fields();
        if fields.is_empty() {
            return Err(QueryError::MissingField {
                selector: chunk.to_string(),
            });
        }

        cursor.skip_whitespace();
        let symbol = cursor.operator();
        let op = Op::from_symbol(symbol).ok_or_else(|| QueryError::InvalidOperator {
            selector: chunk.to_string(),
            operator: symbol.to_string(),
        })?;

        let values = cursor.values();

        Ok(Selector {
            fields,
            op,
            values,
            source: chunk.to_string(),
        })
    }

    pub fn fields(&self) -> &[FieldRef] {
        &self.fields
    }

    pub fn op(&self) -> Op {
        self.op
    }

    pub fn values(&self) -> &[String] {
        &self.values
    }

    /// The chunk this selector was parsed from.
    pub fn source(&self) -> &str {
        &self.source
    }
}

impl std::fmt::Display for Selector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.source)
    }
}

impl std::str::FromStr for Selector {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self> {
        Selector::parse(s)
    }
}

fn is_simple_field_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | '|' | '.' | '/')
}

struct Cursor<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    fn rest(&self) -> &'a str {
        &self.input[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn skip_whitespace(&mut self) {
        let rest = self.rest();
        self.pos += rest.len() - rest.trim_start().len();
    }

    /// Reads `|`-joined fields. A quoted field may be followed by `|` and
    /// another field of either form; a simple run may end in `|` only when a
    /// quoted field follows.
    fn fields(&mut self) -> Vec<FieldRef> {
        let mut fields = Vec::new();
        loop {
            if let Some(name) = self.quoted_field() {
                fields.push(FieldRef::Named(name));
                if self.peek() == Some('|') {
                    self.pos += 1;
                }
                continue;
            }

            let run = self.simple_field_run();
            fields.extend(
                run.split('|')
                    .filter(|piece| !piece.is_empty())
                    .map(FieldRef::classify),
            );
            if run.is_empty() || !run.ends_with('|') || self.peek() != Some('"') {
                return fields;
            }
        }
    }

    /// `"..."` up to the first unescaped `"`, with at least one character
    /// inside. `\"` becomes `"`.
    fn quoted_field(&mut self) -> Option<String> {
        let body = self.rest().strip_prefix('"')?;
        let mut prev = None;
        for (i, c) in body.char_indices() {
            if c == '"' && i > 0 && prev != Some('\\') {
                self.pos += 1 + i + 1;
                return Some(body[..i].replace("\\\"", "\""));
            }
            prev = Some(c);
        }
        None
    }

    /// An optional leading `!` followed by field characters.
    fn simple_field_run(&mut self) -> &'a str {
        let rest = self.rest();
        let start = usize::from(rest.starts_with('!'));
        let len = rest[start..]
            .find(|c: char| !is_simple_field_char(c))
            .unwrap_or(rest.len() - start);
        if len == 0 {
            return "";
        }
        self.pos += start + len;
        &rest[..start + len]
    }

    fn operator(&mut self) -> &'a str {
        let rest = self.rest();
        let len = rest
            .char_indices()
            .take(MAX_OPERATOR_LEN)
            .take_while(|&(_, c)| Op::is_operator_char(c))
            .map(|(i, c)| i + c.len_utf8())
            .last()
            .unwrap_or(0);
        self.pos += len;
        &rest[..len]
    }

    /// The first value, then one more for every `|` that has text after it.
    fn values(&mut self) -> Vec<String> {
        let mut values = vec![self.value()];
        while self.rest().len() > 1 && self.rest().starts_with('|') {
            self.pos += 1;
            values.push(self.value());
        }
        values
    }

    fn value(&mut self) -> String {
        self.skip_whitespace();
        let rest = self.rest();
        let quote = rest.chars().next().filter(|c| matches!(c, '"' | '\''));

        let mut chars = rest.char_indices().skip(usize::from(quote.is_some()));
        let mut consumed = quote.map_or(0, char::len_utf8);
        let mut taken = usize::from(quote.is_some());
        let mut value = String::new();
        let mut last = None;

        while taken < MAX_VALUE_LEN {
            let Some((i, c)) = chars.next() else { break };
            let escaped = last == Some('\\');
            match quote {
                Some(q) if c == q && !escaped => {
                    consumed = i + c.len_utf8();
                    break;
                }
                Some(q) if c == q => {
                    value.pop();
                }
                None if c == '|' && !escaped => break,
                None if c == '|' => {
                    value.pop();
                }
                _ => {}
            }
            value.push(c);
            last = Some(c);
            consumed = i + c.len_utf8();
            taken += 1;
        }

        self.pos += consumed;
        value
    }
}
