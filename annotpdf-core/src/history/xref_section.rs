//! Classic cross-reference sections (ISO 32000-1 Section 7.5.4)

use super::{locate_sequence, Direction};
use crate::error::{PdfError, Result};
use crate::objects::{Dictionary, Object};
use crate::parser::{parse_object, Lexer, Token};
use crate::writer::XRef;

/// Records of one section and the trailer dictionary that follows it
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct XRefSection {
    pub entries: Vec<XRef>,
    pub trailer: Dictionary,
}

/// Offset named by the last `startxref` in the document
pub(crate) fn find_startxref(data: &[u8]) -> Result<u64> {
    let position = locate_sequence(b"startxref", data, data.len(), Direction::Backward)
        .ok_or_else(|| PdfError::InvalidXRef("no startxref keyword".to_string()))?;

    let mut lexer = Lexer::at(data, position);
    lexer.expect_keyword("startxref")?;
    let offset = lexer.expect_integer()?;
    u64::try_from(offset)
        .map_err(|_| PdfError::InvalidXRef(format!("negative startxref offset {offset}")))
}

/// Parse the section starting at `offset`
pub(crate) fn parse_xref_section(data: &[u8], offset: u64) -> Result<XRefSection> {
    let start = usize::try_from(offset)
        .ok()
        .filter(|&start| start < data.len())
        .ok_or_else(|| PdfError::InvalidXRef(format!("offset {offset} outside the document")))?;

    let mut lexer = Lexer::at(data, start);
    match lexer.next_token()? {
        Token::Keyword(word) if word == "xref" => {}
        Token::Integer(_) => {
            return Err(PdfError::Unsupported(format!(
                "cross-reference stream at offset {offset}"
            )))
        }
        other => {
            return Err(PdfError::InvalidXRef(format!(
                "expected 'xref' at offset {offset}, found {other:?}"
            )))
        }
    }

    let mut entries = Vec::new();
    loop {
        match lexer.next_token()? {
            Token::Keyword(word) if word == "trailer" => break,
            Token::Integer(first) => {
                let count = lexer.expect_integer()?;
                let first = u32::try_from(first).map_err(|_| invalid("subsection start", first))?;
                let count = u32::try_from(count).map_err(|_| invalid("subsection count", count))?;
                for index in 0..count {
                    let id = first
                        .checked_add(index)
                        .ok_or_else(|| invalid("object number", i64::from(first)))?;
                    entries.push(parse_record(&mut lexer, id)?);
                }
            }
            other => {
                return Err(PdfError::InvalidXRef(format!(
                    "unexpected {other:?} in section at offset {offset}"
                )))
            }
        }
    }

    let trailer = match parse_object(&mut lexer)? {
        Object::Dictionary(dict) => dict,
        other => {
            return Err(PdfError::InvalidTrailer(format!(
                "expected a dictionary, found {other:?}"
            )))
        }
    };

    tracing::debug!(
        "Read xref section at {} with {} records",
        offset,
        entries.len()
    );
    Ok(XRefSection { entries, trailer })
}

fn parse_record(lexer: &mut Lexer<'_>, id: u32) -> Result<XRef> {
    let pointer = lexer.expect_integer()?;
    let generation = lexer.expect_integer()?;
    let pointer = u64::try_from(pointer).map_err(|_| invalid("record offset", pointer))?;
    let generation = u16::try_from(generation).map_err(|_| invalid("generation", generation))?;

    match lexer.next_token()? {
        Token::Keyword(kind) if kind == "n" => Ok(XRef::in_use(id, generation, pointer)),
        Token::Keyword(kind) if kind == "f" => Ok(XRef::free(id, generation, pointer)),
        other => Err(PdfError::InvalidXRef(format!(
            "record {id} has type {other:?}"
        ))),
    }
}

fn invalid(what: &str, value: i64) -> PdfError {
    PdfError::InvalidXRef(format!("{what} {value} out of range"))
}
