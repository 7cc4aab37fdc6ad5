//! Query tokenizer.
//!
//! Splits a query string into selector chunks and structural tokens in one
//! left-to-right scan. Quoted text is opaque: parentheses and set operators
//! inside `'...'` or `"..."` belong to the chunk. Backslashes are kept
//! verbatim here; the selector parser strips them later.

use crate::error::{Bracket, QueryError, Result};
use crate::rpn::SetOp;

/// One token of an infix query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// Trimmed, non-empty selector text such as `name*=job`.
    Chunk(String),
    /// `(`
    Open,
    /// `)`
    Close,
    /// `+`, `-` or `,`
    SetOp(SetOp),
}

/// Tokenizes a query string.
///
/// Fails with [`QueryError::UnmatchedBracket`] when parentheses outside
/// quotes do not balance. An unclosed quote is not an error: the quoted
/// text simply runs to the end of the input.
pub fn tokenize(input: &str) -> Result<Vec<Token>> {
    Tokenizer::new(input.trim()).run()
}

struct Tokenizer<'a> {
    input: &'a str,
    tokens: Vec<Token>,
    buffer: String,
    quote: Option<char>,
    depth: usize,
}

impl<'a> Tokenizer<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            input,
            tokens: Vec::new(),
            buffer: String::new(),
            quote: None,
            depth: 0,
        }
    }

    fn run(mut self) -> Result<Vec<Token>> {
        let mut prev: Option<char> = None;
        for c in self.input.chars() {
            match c {
                '"' | '\'' if prev != Some('\\') => {
                    self.quote = match self.quote {
                        Some(open) if open == c => None,
                        Some(open) => Some(open),
                        None => Some(c),
                    };
                    self.buffer.push(c);
                }
                _ if self.quote.is_some() => self.buffer.push(c),
                '(' => {
                    self.depth += 1;
                    self.structural(Token::Open);
                }
                ')' => {
                    self.depth = self
                        .depth
                        .checked_sub(1)
                        .ok_or(QueryError::UnmatchedBracket(Bracket::Closing))?;
                    self.structural(Token::Close);
                }
                _ => match SetOp::from_char(c) {
                    Some(op) => self.structural(Token::SetOp(op)),
                    None => self.buffer.push(c),
                },
            }
            prev = Some(c);
        }

        if self.depth > 0 {
            return Err(QueryError::UnmatchedBracket(Bracket::Opening));
        }
        self.flush();
        Ok(self.tokens)
    }

    fn structural(&mut self, token: Token) {
        self.flush();
        self.tokens.push(token);
    }

    fn flush(&mut self) {
        let chunk = self.buffer.trim();
        if !chunk.is_empty() {
            tracing::trace!(chunk, "query chunk");
            self.tokens.push(Token::Chunk(chunk.to_string()));
        }
        self.buffer.clear();
    }
}
