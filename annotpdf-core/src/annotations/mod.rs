//! Annotation and page models consumed by the incremental writer
//!
//! Annotation subtypes follow ISO 32000-1 Table 169, restricted to the ones
//! the writer can serialize.

mod annotation;
mod page;

pub use annotation::{
    format_pdf_date, Annotation, AnnotationFlags, AnnotationSubtype, Border, Color,
};
pub use page::Page;
