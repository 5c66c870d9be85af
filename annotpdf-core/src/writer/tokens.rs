//! Byte tokens of the PDF syntax emitted by the incremental writer
//!
//! Every keyword and delimiter the writer produces is a named constant here,
//! together with the small pure encoders that turn numbers and text into
//! their PDF byte representation.

pub const SPACE: u8 = b' ';
pub const CR: u8 = b'\r';
pub const LF: u8 = b'\n';
pub const EOL: &[u8] = b"\r\n";
pub const R: u8 = b'R';

pub const OBJ: &[u8] = b"obj";
pub const ENDOBJ: &[u8] = b"endobj";
pub const ARRAY_START: u8 = b'[';
pub const ARRAY_END: u8 = b']';
pub const DICT_START: &[u8] = b"<<";
pub const DICT_END: &[u8] = b">>";
pub const STRING_START: u8 = b'(';
pub const STRING_END: u8 = b')';

// Annotation dictionary keys
pub const TYPE_ANNOT: &[u8] = b"/Type /Annot";
pub const RECT: &[u8] = b"/Rect";
pub const SUBTYPE: &[u8] = b"/Subtype";
pub const UPDATE_DATE: &[u8] = b"/M";
pub const AUTHOR: &[u8] = b"/T";
pub const CONTENTS: &[u8] = b"/Contents";
pub const ID: &[u8] = b"/NM";
pub const FLAG: &[u8] = b"/F";
pub const COLOR: &[u8] = b"/C";
pub const OPACITY: &[u8] = b"/CA";
pub const BORDER: &[u8] = b"/Border";
pub const DEFAULT_APPEARANCE: &[u8] = b"/DA";
pub const PAGE_REFERENCE: &[u8] = b"/P";
pub const QUAD_POINTS: &[u8] = b"/QuadPoints";
pub const VERTICES: &[u8] = b"/Vertices";
pub const NAME: &[u8] = b"/Name";
pub const DRAFT: &[u8] = b"/Draft";
pub const SY: &[u8] = b"/Sy";
pub const CARET_PARAGRAPH: u8 = b'P';

// Page dictionary
pub const ANNOTS: &[u8] = b"/Annots";

// Cross-reference section and trailer
pub const XREF: &[u8] = b"xref";
pub const FREE: u8 = b'f';
pub const IN_USE: u8 = b'n';
pub const TRAILER: &[u8] = b"trailer";
pub const SIZE: &[u8] = b"/Size";
pub const ROOT: &[u8] = b"/Root";
pub const PREV: &[u8] = b"/Prev";
pub const STARTXREF: &[u8] = b"startxref";
pub const EOF: &[u8] = b"%%EOF";

/// Width of one cross-reference record including its CR LF terminator.
pub const XREF_RECORD_LEN: usize = 20;
pub const OFFSET_WIDTH: usize = 10;
pub const GENERATION_WIDTH: usize = 5;

/// Shortest decimal representation of a non-negative integer.
pub fn encode_integer(value: impl Into<u64>) -> Vec<u8> {
    value.into().to_string().into_bytes()
}

/// Decimal representation of a real number.
///
/// Integral values are written without a fractional part; other values keep
/// at most six decimals with trailing zeros removed. PDF has no notation for
/// NaN or infinities, those collapse to `0`.
pub fn encode_real(value: f64) -> Vec<u8> {
    if !value.is_finite() {
        return b"0".to_vec();
    }
    if value.fract() == 0.0 && value.abs() < 1e15 {
        return format!("{}", value as i64).into_bytes();
    }
    let formatted = format!("{value:.6}");
    let trimmed = formatted.trim_end_matches('0').trim_end_matches('.');
    match trimmed {
        "-0" => b"0".to_vec(),
        other => other.as_bytes().to_vec(),
    }
}

/// Raw bytes of a text run. No escaping is applied.
pub fn encode_text(text: &str) -> Vec<u8> {
    text.as_bytes().to_vec()
}

/// A parenthesised literal string with `\`, `(` and `)` escaped.
pub fn encode_literal_string(text: &str) -> Vec<u8> {
    let mut out = Vec::with_capacity(text.len() + 2);
    out.push(STRING_START);
    for &byte in text.as_bytes() {
        if matches!(byte, b'\\' | b'(' | b')') {
            out.push(b'\\');
        }
        out.push(byte);
    }
    out.push(STRING_END);
    out
}

/// `[n n n ]`: every element is followed by a single space.
pub fn encode_number_array(values: &[f64]) -> Vec<u8> {
    let mut out = Vec::with_capacity(values.len() * 8 + 2);
    out.push(ARRAY_START);
    for &value in values {
        out.extend_from_slice(&encode_real(value));
        out.push(SPACE);
    }
    out.push(ARRAY_END);
    out
}

/// Left-pads the decimal form of `value` with zeros up to `width` digits.
///
/// Values that already need more digits are returned unpadded and longer
/// than `width`; callers that require a fixed width must check the result.
pub fn pad(width: usize, value: u64) -> Vec<u8> {
    format!("{value:0width$}").into_bytes()
}
