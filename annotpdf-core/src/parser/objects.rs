//! Object parsing on top of the lexer

use super::lexer::{Lexer, Token};
use crate::error::{PdfError, Result};
use crate::objects::{Dictionary, Object, ReferencePointer};

/// Nesting limit for arrays and dictionaries
const MAX_DEPTH: usize = 256;

/// Parse the next direct object, folding `n g R` into a reference
pub fn parse_object(lexer: &mut Lexer<'_>) -> Result<Object> {
    parse_nested(lexer, 0)
}

/// Parse `n g obj <object>` at `offset`, checking the header against `expected`
pub fn parse_indirect_object(
    data: &[u8],
    offset: usize,
    expected: ReferencePointer,
) -> Result<Object> {
    let mut lexer = Lexer::at(data, offset);
    let obj = lexer.expect_integer()?;
    let generation = lexer.expect_integer()?;
    if obj != i64::from(expected.obj()) || generation != i64::from(expected.generation()) {
        return Err(PdfError::parse(
            offset,
            format!("expected object {expected}, found {obj} {generation} obj"),
        ));
    }
    lexer.expect_keyword("obj")?;
    parse_object(&mut lexer)
}

fn parse_nested(lexer: &mut Lexer<'_>, depth: usize) -> Result<Object> {
    let token = lexer.next_token()?;
    parse_from_token(lexer, token, depth)
}

fn parse_from_token(lexer: &mut Lexer<'_>, token: Token, depth: usize) -> Result<Object> {
    if depth > MAX_DEPTH {
        return Err(PdfError::parse(lexer.position(), "object nesting too deep"));
    }
    match token {
        Token::Null => Ok(Object::Null),
        Token::Boolean(b) => Ok(Object::Boolean(b)),
        Token::Integer(i) => Ok(fold_reference(lexer, i)),
        Token::Real(r) => Ok(Object::Real(r)),
        Token::String(s) => Ok(Object::String(s)),
        Token::Name(n) => Ok(Object::Name(n)),
        Token::ArrayStart => parse_array(lexer, depth),
        Token::DictStart => parse_dictionary(lexer, depth).map(Object::Dictionary),
        Token::Eof => Err(PdfError::parse(lexer.position(), "Unexpected end of file")),
        other => Err(PdfError::parse(
            lexer.position(),
            format!("Expected a PDF object, found {other:?}"),
        )),
    }
}

/// `n g R` becomes a reference; anything else leaves the lexer after `n`
fn fold_reference(lexer: &mut Lexer<'_>, obj: i64) -> Object {
    let saved = lexer.position();
    if let (Ok(obj), Ok(Token::Integer(generation))) = (u32::try_from(obj), lexer.next_token()) {
        if let (Ok(generation), Ok(Token::Keyword(word))) =
            (u16::try_from(generation), lexer.next_token())
        {
            if word == "R" {
                return Object::Reference(ReferencePointer::new(obj, generation));
            }
        }
    }
    lexer.seek(saved);
    Object::Integer(obj)
}

fn parse_array(lexer: &mut Lexer<'_>, depth: usize) -> Result<Object> {
    let mut elements = Vec::new();
    loop {
        match lexer.next_token()? {
            Token::ArrayEnd => break,
            Token::Eof => return Err(PdfError::parse(lexer.position(), "Unterminated array")),
            token => elements.push(parse_from_token(lexer, token, depth + 1)?),
        }
    }
    Ok(Object::Array(elements))
}

fn parse_dictionary(lexer: &mut Lexer<'_>, depth: usize) -> Result<Dictionary> {
    let mut dict = Dictionary::new();
    loop {
        match lexer.next_token()? {
            Token::DictEnd => break,
            Token::Name(key) => {
                let value = parse_nested(lexer, depth + 1)?;
                dict.set(key, value);
            }
            other => {
                return Err(PdfError::parse(
                    lexer.position(),
                    format!("Expected dictionary key (name) or >>, found {other:?}"),
                ))
            }
        }
    }
    Ok(dict)
}
