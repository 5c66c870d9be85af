use super::tokens::*;
use crate::objects::{encode_reference, ReferencePointer};

/// Trailer closing an incremental update.
///
/// ```text
/// trailer
/// << /Size n /Root r g R /Prev p >>
/// startxref
/// <xref_offset>
/// %%EOF
/// ```
///
/// `prev` is the offset of the previous cross-reference section and
/// `xref_offset` the offset of the one just written.
pub fn build_trailer(size: u32, root: ReferencePointer, prev: u64, xref_offset: u64) -> Vec<u8> {
    let mut out = Vec::with_capacity(96);
    out.extend_from_slice(TRAILER);
    out.extend_from_slice(EOL);

    out.extend_from_slice(DICT_START);
    out.push(SPACE);
    out.extend_from_slice(SIZE);
    out.push(SPACE);
    out.extend_from_slice(&encode_integer(size));
    out.push(SPACE);
    out.extend_from_slice(ROOT);
    out.push(SPACE);
    out.extend_from_slice(&encode_reference(root, true));
    out.push(SPACE);
    out.extend_from_slice(PREV);
    out.push(SPACE);
    out.extend_from_slice(&encode_integer(prev));
    out.push(SPACE);
    out.extend_from_slice(DICT_END);
    out.extend_from_slice(EOL);

    out.extend_from_slice(STARTXREF);
    out.extend_from_slice(EOL);
    out.extend_from_slice(&encode_integer(xref_offset));
    out.extend_from_slice(EOL);
    out.extend_from_slice(EOF);
    out
}
