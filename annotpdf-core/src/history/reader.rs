use super::page_tree::read_pages;
use super::xref_section::{find_startxref, parse_xref_section};
use super::{DocumentHistory, TrailerInfo, UpdateSection};
use crate::annotations::Page;
use crate::error::{PdfError, Result};
use crate::objects::ReferencePointer;
use crate::writer::XRef;
use std::collections::{HashMap, HashSet};

/// Revision history read from classic cross-reference tables.
///
/// Sections are found through the last `startxref` and the `/Prev` chain.
/// Documents using cross-reference streams are rejected.
#[derive(Debug, Clone)]
pub struct ParsedHistory {
    /// Newest first
    updates: Vec<UpdateSection>,
    size: u32,
}

impl ParsedHistory {
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let mut offset = find_startxref(data)?;
        let mut visited = HashSet::new();
        let mut updates = Vec::new();

        loop {
            if !visited.insert(offset) {
                return Err(PdfError::InvalidXRef(format!(
                    "/Prev chain loops back to offset {offset}"
                )));
            }

            let section = parse_xref_section(data, offset)?;
            let trailer = TrailerInfo::from_dict(&section.trailer)?;
            updates.push(UpdateSection {
                refs: section.entries,
                trailer,
                start_pointer: offset,
            });

            match trailer.prev {
                Some(prev) => offset = prev,
                None => break,
            }
        }

        let highest = updates
            .iter()
            .flat_map(|update| update.refs.iter())
            .map(|entry| entry.id.saturating_add(1))
            .max()
            .unwrap_or(0);
        let size = updates[0].trailer.size.max(highest);

        tracing::info!(
            "Read {} revision(s), /Size {}, root {}",
            updates.len(),
            size,
            updates[0].trailer.root
        );
        Ok(Self { updates, size })
    }

    /// All revisions, newest first
    pub fn updates(&self) -> &[UpdateSection] {
        &self.updates
    }

    /// Leaf pages of the current revision in document order
    pub fn pages(&self, data: &[u8]) -> Result<Vec<Page>> {
        read_pages(data, &self.object_lookup_table(), self.recent_update().trailer.root)
    }

    pub fn page(&self, data: &[u8], index: usize) -> Result<Page> {
        self.pages(data)?
            .into_iter()
            .nth(index)
            .ok_or(PdfError::InvalidPageIndex(index))
    }
}

impl DocumentHistory for ParsedHistory {
    /// In-use records of all revisions, later revisions overriding earlier ones
    fn object_lookup_table(&self) -> HashMap<u32, XRef> {
        let mut table = HashMap::new();
        for update in self.updates.iter().rev() {
            for entry in &update.refs {
                if entry.free {
                    table.remove(&entry.id);
                } else {
                    table.insert(entry.id, *entry);
                }
            }
        }
        table
    }

    fn free_object_id(&mut self) -> ReferencePointer {
        let id = self.size;
        self.size += 1;
        ReferencePointer::new(id, 0)
    }

    fn recent_update(&self) -> &UpdateSection {
        &self.updates[0]
    }

    fn trailer_size(&self) -> u32 {
        self.size
    }
}
