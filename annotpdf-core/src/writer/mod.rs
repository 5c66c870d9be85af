//! Incremental update writing
//!
//! An update appends, after the untouched original bytes: one `/Annots`
//! array per annotated page, the page object when it needed a new array
//! reference, the annotation objects, a classic cross-reference table for
//! the new objects and a trailer chained to the previous section.

mod annot_array;
mod annotation_object;
mod incremental;
mod options;
pub mod tokens;
mod trailer;
mod xref_table;

pub use annot_array::{adapt_page_object, build_annot_array, AnnotArrayUpdate};
pub use annotation_object::serialize_annotation;
pub use incremental::{group_by_page, IncrementalUpdate, IncrementalWriter};
pub use options::WriteOptions;
pub use trailer::build_trailer;
pub use xref_table::{build_xref_table, encode_xref_record, partition_runs, XRef};
