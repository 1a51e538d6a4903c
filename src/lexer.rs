//! Tokenising helpers shared by the literal parsers. Offsets are character positions.

use crate::error::{CartError, Result};
use crate::regex_patterns::RE_NUMBER;

/// A whitespace separated piece of a literal and where it starts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    pub text: &'a str,
    pub offset: usize,
}

impl Token<'_> {
    /// The token as a finite decimal number
    pub fn number(&self) -> Result<f64> {
        parse_number(self.text, self.offset)
    }

    pub fn error(&self) -> CartError {
        CartError::parse(self.text, self.offset)
    }
}

/// Split `literal` at whitespace, remembering the character offset of every token
pub fn tokenize(literal: &str) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    let mut start: Option<(usize, usize)> = None;
    let mut chars = 0;
    for (byte, c) in literal.char_indices() {
        match (c.is_whitespace(), start) {
            (true, Some((from, offset))) => {
                tokens.push(Token {
                    text: &literal[from..byte],
                    offset,
                });
                start = None;
            }
            (false, None) => start = Some((byte, chars)),
            _ => {}
        }
        chars += 1;
    }
    if let Some((from, offset)) = start {
        tokens.push(Token {
            text: &literal[from..],
            offset,
        });
    }
    tokens
}

/// Parse a plain decimal number found at `offset`
pub fn parse_number(text: &str, offset: usize) -> Result<f64> {
    if !RE_NUMBER.is_match(text) {
        return Err(CartError::parse(text, offset));
    }
    text.parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| CartError::parse(text, offset))
}

/// Character cursor over a normalised literal: upper case, all whitespace removed
#[derive(Debug, Clone)]
pub struct Cursor {
    chars: Vec<char>,
    pos: usize,
}

impl Cursor {
    pub fn new(literal: &str) -> Self {
        Self {
            chars: literal
                .chars()
                .filter(|c| !c.is_whitespace())
                .flat_map(char::to_uppercase)
                .collect(),
            pos: 0,
        }
    }

    pub const fn position(&self) -> usize {
        self.pos
    }

    pub fn is_at_end(&self) -> bool {
        self.pos >= self.chars.len()
    }

    pub fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    /// Consume `c` if it is next
    pub fn eat(&mut self, c: char) -> bool {
        if self.peek() == Some(c) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    /// Consume `s` if the input continues with it
    pub fn eat_str(&mut self, s: &str) -> bool {
        let wanted: Vec<char> = s.chars().collect();
        let end = self.pos + wanted.len();
        if end <= self.chars.len() && self.chars[self.pos..end] == wanted[..] {
            self.pos = end;
            true
        } else {
            false
        }
    }

    /// Consume a leading direction or sign, returning whether it denotes a negative bearing
    pub fn eat_direction(&mut self) -> bool {
        match self.peek() {
            Some('S' | 'W' | '-') => {
                self.pos += 1;
                true
            }
            Some('N' | 'E' | '+') => {
                self.pos += 1;
                false
            }
            _ => false,
        }
    }

    pub fn take_while(&mut self, pred: impl Fn(char) -> bool) -> String {
        let start = self.pos;
        while self.peek().is_some_and(&pred) {
            self.pos += 1;
        }
        self.chars[start..self.pos].iter().collect()
    }

    /// Everything not consumed yet
    pub fn rest(&self) -> String {
        self.chars[self.pos.min(self.chars.len())..].iter().collect()
    }

    /// Parse error at the current position carrying the value accumulated so far
    pub fn error(&self, partial: f64) -> CartError {
        CartError::parse_partial(self.rest(), self.pos, partial)
    }
}
