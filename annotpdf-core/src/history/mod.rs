//! Revision history of an existing document
//!
//! The incremental writer needs four things from the document it appends
//! to: where every existing object lives, fresh object numbers, the most
//! recent cross-reference section with its trailer, and the current `/Size`.
//! [`DocumentHistory`] is that seam; [`ParsedHistory`] implements it by
//! reading classic cross-reference tables and following the `/Prev` chain.

mod page_tree;
mod reader;
mod trailer;
mod xref_section;

pub use reader::ParsedHistory;
pub use trailer::TrailerInfo;

use crate::objects::ReferencePointer;
use crate::writer::XRef;
use std::collections::HashMap;

/// What the incremental writer consumes from the document history.
pub trait DocumentHistory {
    /// Location of every live object, keyed by object number.
    fn object_lookup_table(&self) -> HashMap<u32, XRef>;

    /// A fresh object number not used anywhere in the document.
    fn free_object_id(&mut self) -> ReferencePointer;

    /// The newest revision: its records, trailer and xref offset.
    fn recent_update(&self) -> &UpdateSection;

    /// Current `/Size`, one greater than the highest object number in use.
    fn trailer_size(&self) -> u32;
}

/// One revision of the document: a cross-reference section and its trailer.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateSection {
    /// Records in section order; `refs[0]` is the free-list head of a conventional table
    pub refs: Vec<XRef>,
    pub trailer: TrailerInfo,
    /// Byte offset of the `xref` keyword that starts this section
    pub start_pointer: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Backward,
}

/// Finds `needle` in `haystack`.
///
/// Forward: first occurrence starting at or after `start`.
/// Backward: last occurrence starting strictly before `start`.
pub fn locate_sequence(
    needle: &[u8],
    haystack: &[u8],
    start: usize,
    direction: Direction,
) -> Option<usize> {
    if needle.is_empty() || needle.len() > haystack.len() {
        return None;
    }
    match direction {
        Direction::Forward => haystack
            .get(start..)?
            .windows(needle.len())
            .position(|window| window == needle)
            .map(|pos| pos + start),
        Direction::Backward => {
            let limit = start.min(haystack.len() - needle.len() + 1);
            haystack[..limit + needle.len() - 1]
                .windows(needle.len())
                .rposition(|window| window == needle)
        }
    }
}
