//! PDF Lexer
//!
//! Tokenizes PDF syntax according to ISO 32000-1 Section 7.2, working
//! directly over the document bytes so any offset can be tokenized.

use crate::error::{PdfError, Result};

/// PDF Token types
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// Boolean: true or false
    Boolean(bool),

    /// Integer number
    Integer(i64),

    /// Real number
    Real(f64),

    /// String (literal or hexadecimal)
    String(Vec<u8>),

    /// Name object without its leading slash
    Name(String),

    /// Left square bracket [
    ArrayStart,

    /// Right square bracket ]
    ArrayEnd,

    /// Dictionary start <<
    DictStart,

    /// Dictionary end >>
    DictEnd,

    /// Null object
    Null,

    /// Bare word: obj, endobj, R, xref, trailer, startxref, n, f, stream...
    Keyword(String),

    /// End of input
    Eof,
}

/// Lexer over a byte slice
#[derive(Debug, Clone)]
pub struct Lexer<'a> {
    data: &'a [u8],
    position: usize,
}

fn is_whitespace(ch: u8) -> bool {
    ch.is_ascii_whitespace() || ch == 0
}

fn is_delimiter(ch: u8) -> bool {
    matches!(ch, b'/' | b'<' | b'>' | b'[' | b']' | b'(' | b')' | b'%' | b'{' | b'}')
}

impl<'a> Lexer<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, position: 0 }
    }

    /// Lexer positioned at `position`
    pub fn at(data: &'a [u8], position: usize) -> Self {
        Self { data, position }
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn seek(&mut self, position: usize) {
        self.position = position;
    }

    fn peek_char(&self) -> Option<u8> {
        self.data.get(self.position).copied()
    }

    fn consume_char(&mut self) -> Option<u8> {
        let ch = self.peek_char();
        if ch.is_some() {
            self.position += 1;
        }
        ch
    }

    fn error(&self, message: impl Into<String>) -> PdfError {
        PdfError::parse(self.position, message)
    }

    /// Skip whitespace and comments
    fn skip_whitespace(&mut self) {
        while let Some(ch) = self.peek_char() {
            if is_whitespace(ch) {
                self.position += 1;
            } else if ch == b'%' {
                while let Some(ch) = self.peek_char() {
                    if ch == b'\n' || ch == b'\r' {
                        break;
                    }
                    self.position += 1;
                }
            } else {
                break;
            }
        }
    }

    /// Get the next token
    pub fn next_token(&mut self) -> Result<Token> {
        self.skip_whitespace();

        let Some(ch) = self.peek_char() else {
            return Ok(Token::Eof);
        };

        match ch {
            b'/' => self.read_name(),
            b'(' => self.read_literal_string(),
            b'<' => self.read_angle_bracket(),
            b'>' => {
                self.consume_char();
                if self.consume_char() == Some(b'>') {
                    Ok(Token::DictEnd)
                } else {
                    Err(self.error("Expected '>' after '>'"))
                }
            }
            b'[' => {
                self.consume_char();
                Ok(Token::ArrayStart)
            }
            b']' => {
                self.consume_char();
                Ok(Token::ArrayEnd)
            }
            b'+' | b'-' | b'0'..=b'9' | b'.' => self.read_number(),
            _ if ch.is_ascii_alphabetic() => Ok(self.read_keyword()),
            _ => Err(self.error(format!("Unexpected character: {}", ch as char))),
        }
    }

    pub fn expect_keyword(&mut self, keyword: &str) -> Result<()> {
        match self.next_token()? {
            Token::Keyword(word) if word == keyword => Ok(()),
            other => Err(self.error(format!("Expected '{keyword}', found {other:?}"))),
        }
    }

    pub fn expect_integer(&mut self) -> Result<i64> {
        match self.next_token()? {
            Token::Integer(value) => Ok(value),
            other => Err(self.error(format!("Expected an integer, found {other:?}"))),
        }
    }

    /// Read a name object (e.g., /Type)
    fn read_name(&mut self) -> Result<Token> {
        self.consume_char(); // consume '/'
        let mut name = String::new();

        while let Some(ch) = self.peek_char() {
            if is_whitespace(ch) || is_delimiter(ch) {
                break;
            }
            self.consume_char();

            // Hex codes in names (e.g., /A#20B means /A B)
            if ch == b'#' {
                let digits = self
                    .data
                    .get(self.position..self.position + 2)
                    .ok_or_else(|| self.error("Incomplete hex code in name"))?;
                let value = std::str::from_utf8(digits)
                    .ok()
                    .and_then(|hex| u8::from_str_radix(hex, 16).ok())
                    .ok_or_else(|| self.error("Invalid hex code in name"))?;
                self.position += 2;
                name.push(value as char);
            } else {
                name.push(ch as char);
            }
        }

        Ok(Token::Name(name))
    }

    /// Read a literal string (parentheses)
    fn read_literal_string(&mut self) -> Result<Token> {
        self.consume_char(); // consume '('
        let mut string = Vec::new();
        let mut paren_depth = 1;
        let mut escape = false;

        while paren_depth > 0 {
            let ch = self
                .consume_char()
                .ok_or_else(|| self.error("Unterminated string"))?;

            if escape {
                let escaped = match ch {
                    b'n' => b'\n',
                    b'r' => b'\r',
                    b't' => b'\t',
                    b'b' => b'\x08',
                    b'f' => b'\x0C',
                    b'0'..=b'7' => {
                        let mut value = ch - b'0';
                        for _ in 0..2 {
                            match self.peek_char() {
                                Some(next @ b'0'..=b'7') => {
                                    self.consume_char();
                                    value = value.wrapping_mul(8).wrapping_add(next - b'0');
                                }
                                _ => break,
                            }
                        }
                        value
                    }
                    // Line continuation
                    b'\r' | b'\n' => {
                        if ch == b'\r' && self.peek_char() == Some(b'\n') {
                            self.consume_char();
                        }
                        escape = false;
                        continue;
                    }
                    _ => ch,
                };
                string.push(escaped);
                escape = false;
            } else {
                match ch {
                    b'\\' => escape = true,
                    b'(' => {
                        string.push(ch);
                        paren_depth += 1;
                    }
                    b')' => {
                        paren_depth -= 1;
                        if paren_depth > 0 {
                            string.push(ch);
                        }
                    }
                    _ => string.push(ch),
                }
            }
        }

        Ok(Token::String(string))
    }

    /// Read angle bracket tokens (hex strings or dict markers)
    fn read_angle_bracket(&mut self) -> Result<Token> {
        self.consume_char(); // consume '<'

        if self.peek_char() == Some(b'<') {
            self.consume_char();
            return Ok(Token::DictStart);
        }

        let mut digits = Vec::new();
        loop {
            let ch = self
                .consume_char()
                .ok_or_else(|| self.error("Unterminated hex string"))?;
            match ch {
                b'>' => break,
                _ if ch.is_ascii_hexdigit() => digits.push(ch),
                _ if is_whitespace(ch) => {}
                _ => return Err(self.error("Invalid character in hex string")),
            }
        }

        // Pad with 0 if odd number of digits
        if digits.len() % 2 != 0 {
            digits.push(b'0');
        }

        let bytes = digits
            .chunks(2)
            .map(|pair| {
                let high = (pair[0] as char).to_digit(16).unwrap_or(0);
                let low = (pair[1] as char).to_digit(16).unwrap_or(0);
                (high * 16 + low) as u8
            })
            .collect();
        Ok(Token::String(bytes))
    }

    /// Read a number (integer or real)
    fn read_number(&mut self) -> Result<Token> {
        let start = self.position;
        let mut has_dot = false;

        if matches!(self.peek_char(), Some(b'+' | b'-')) {
            self.consume_char();
        }
        while let Some(ch) = self.peek_char() {
            match ch {
                b'0'..=b'9' => {
                    self.consume_char();
                }
                b'.' if !has_dot => {
                    self.consume_char();
                    has_dot = true;
                }
                _ => break,
            }
        }

        let text = std::str::from_utf8(&self.data[start..self.position])
            .map_err(|_| self.error("Invalid number"))?;

        if has_dot {
            // "5." and "-.5" are valid PDF reals
            text.parse::<f64>()
                .map(Token::Real)
                .map_err(|_| self.error(format!("Invalid real number: '{text}'")))
        } else {
            text.parse::<i64>()
                .map(Token::Integer)
                .map_err(|_| self.error(format!("Invalid integer: '{text}'")))
        }
    }

    /// Read a bare word and classify it
    fn read_keyword(&mut self) -> Token {
        let start = self.position;
        while let Some(ch) = self.peek_char() {
            if is_whitespace(ch) || is_delimiter(ch) {
                break;
            }
            self.position += 1;
        }
        let word = String::from_utf8_lossy(&self.data[start..self.position]);
        match word.as_ref() {
            "true" => Token::Boolean(true),
            "false" => Token::Boolean(false),
            "null" => Token::Null,
            _ => Token::Keyword(word.into_owned()),
        }
    }
}
