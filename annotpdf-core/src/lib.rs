//! # annotpdf
//!
//! Appends annotations to existing PDF documents as incremental updates.
//!
//! The original bytes are kept exactly as they are. New objects, a
//! cross-reference table covering only those objects and a trailer chained
//! to the previous section with `/Prev` are written after them, so earlier
//! revisions (and any signatures over them) stay intact.
//!
//! ## Features
//!
//! - **Annotation objects**: Text, Highlight, Underline, Squiggly, StrikeOut,
//!   Square, Circle, FreeText, Polygon, PolyLine, Stamp and Caret
//! - **Per-page `/Annots` arrays**: existing arrays are extended, pages
//!   without one get a fresh array and a new revision of the page object
//! - **Byte-exact xref tables**: 20-byte records grouped into runs of
//!   consecutive object numbers
//! - **History reader**: classic cross-reference tables, `/Prev` chains and
//!   page tree traversal
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use annotpdf::{
//!     Annotation, AnnotationSubtype, DocumentHistory, IncrementalWriter, ParsedHistory,
//! };
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let data = std::fs::read("input.pdf")?;
//! let mut history = ParsedHistory::from_bytes(&data)?;
//! let page = history.page(&data, 0)?;
//!
//! let note = Annotation::new(0)
//!     .with_object_id(history.free_object_id())
//!     .with_page_reference(page)
//!     .with_author("Reviewer")
//!     .with_contents("Please check this paragraph")
//!     .with_rect([72.0, 700.0, 96.0, 724.0])
//!     .with_subtype(AnnotationSubtype::Text);
//!
//! let updated = IncrementalWriter::new(&data, vec![note], &mut history).write()?;
//! std::fs::write("annotated.pdf", updated)?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! - [`annotations`] - Annotation and page models
//! - [`writer`] - Serialization of the incremental update
//! - [`history`] - The [`DocumentHistory`] seam and its parsed implementation
//! - [`parser`] - Lexer and object parser used by the history reader
//! - [`objects`] - References and parsed PDF values

pub mod annotations;
pub mod error;
pub mod history;
pub mod objects;
pub mod parser;
pub mod writer;

#[cfg(test)]
mod test_helpers;

pub use annotations::{
    format_pdf_date, Annotation, AnnotationFlags, AnnotationSubtype, Border, Color, Page,
};
pub use error::{PdfError, Result};
pub use history::{
    locate_sequence, Direction, DocumentHistory, ParsedHistory, TrailerInfo, UpdateSection,
};
pub use objects::ReferencePointer;
pub use writer::{IncrementalUpdate, IncrementalWriter, WriteOptions, XRef};

/// Current version of annotpdf
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
