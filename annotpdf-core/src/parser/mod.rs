//! Minimal PDF syntax reader
//!
//! Enough of ISO 32000-1 Section 7.3 to read cross-reference sections,
//! trailers and the page tree of an existing document.

pub mod lexer;
mod objects;

pub use lexer::{Lexer, Token};
pub use objects::{parse_indirect_object, parse_object};
