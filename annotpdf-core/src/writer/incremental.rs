//! Appends annotations to an existing document as one incremental update

use super::annot_array::build_annot_array;
use super::annotation_object::serialize_annotation;
use super::tokens::{CR, EOL, LF};
use super::trailer::build_trailer;
use super::xref_table::build_xref_table;
use super::{WriteOptions, XRef};
use crate::annotations::Annotation;
use crate::error::{PdfError, Result};
use crate::history::DocumentHistory;
use crate::objects::ReferencePointer;
use std::collections::BTreeMap;

/// Bytes of a finished update along with what was written.
#[derive(Debug, Clone, PartialEq)]
pub struct IncrementalUpdate {
    /// Original document followed by the update
    pub bytes: Vec<u8>,
    /// Offset of the new `xref` keyword
    pub xref_offset: u64,
    /// Records of the new table, in write order, without the free-list head
    pub entries: Vec<XRef>,
}

/// Writes annotations as an incremental update of `data`.
///
/// New objects, a cross-reference table covering only them and a trailer
/// linking back to the previous section are appended; the original bytes
/// are never modified.
pub struct IncrementalWriter<'a, H: DocumentHistory + ?Sized> {
    data: &'a [u8],
    annotations: Vec<Annotation>,
    history: &'a mut H,
    options: WriteOptions,
}

impl<'a, H: DocumentHistory + ?Sized> IncrementalWriter<'a, H> {
    pub fn new(data: &'a [u8], annotations: Vec<Annotation>, history: &'a mut H) -> Self {
        Self {
            data,
            annotations,
            history,
            options: WriteOptions::default(),
        }
    }

    pub fn with_options(mut self, options: WriteOptions) -> Self {
        self.options = options;
        self
    }

    /// Produces the updated document.
    pub fn write(self) -> Result<Vec<u8>> {
        self.write_update().map(|update| update.bytes)
    }

    /// Produces the updated document and the records of its new table.
    ///
    /// Every annotation is checked before any byte is produced. Without
    /// annotations the original is returned unchanged.
    pub fn write_update(self) -> Result<IncrementalUpdate> {
        let IncrementalWriter {
            data,
            annotations,
            history,
            options,
        } = self;

        if annotations.is_empty() {
            tracing::debug!("No annotations to write, document left unchanged");
            return Ok(IncrementalUpdate {
                bytes: data.to_vec(),
                xref_offset: history.recent_update().start_pointer,
                entries: Vec::new(),
            });
        }

        for annotation in &annotations {
            annotation.validate()?;
        }

        let free_list_head = history
            .recent_update()
            .refs
            .first()
            .copied()
            .ok_or_else(|| {
                PdfError::InvalidXRef("previous section has no records".to_string())
            })?;

        let lookup = history.object_lookup_table();
        let groups = group_by_page(&annotations);

        let mut output = Vec::with_capacity(data.len() + annotations.len() * 512 + 256);
        output.extend_from_slice(data);

        if options.ensure_leading_eol && !matches!(data.last(), None | Some(&CR) | Some(&LF)) {
            output.extend_from_slice(EOL);
        }

        let mut entries = Vec::new();
        let mut append = |output: &mut Vec<u8>, reference: ReferencePointer, bytes: &[u8]| {
            let offset = output.len() as u64;
            tracing::debug!("Object {} at offset {}", reference, offset);
            entries.push(XRef::in_use(reference.obj(), reference.generation(), offset));
            output.extend_from_slice(bytes);
        };

        for (page, group) in &groups {
            tracing::debug!("Writing {} annotation(s) for page {}", group.len(), page);

            let array = build_annot_array(group, data, &lookup, history, &options)?;
            append(&mut output, array.array_reference, &array.array_bytes);

            if let Some((page_reference, page_bytes)) = &array.page_object {
                append(&mut output, *page_reference, page_bytes);
            }

            for annotation in group {
                let (reference, bytes) = serialize_annotation(annotation, &options)?;
                append(&mut output, reference, &bytes);
            }
        }

        let xref_offset = output.len() as u64;
        // Records written by this update take precedence over the carried-over head
        let mut table_entries = Vec::with_capacity(entries.len() + 1);
        if entries.iter().all(|entry| entry.id != free_list_head.id) {
            table_entries.push(free_list_head);
        }
        table_entries.extend_from_slice(&entries);
        output.extend_from_slice(&build_xref_table(&table_entries)?);

        let recent = history.recent_update();
        output.extend_from_slice(&build_trailer(
            history.trailer_size(),
            recent.trailer.root,
            recent.start_pointer,
            xref_offset,
        ));

        tracing::info!(
            "Appended {} annotation(s) on {} page(s): {} objects, xref at {}",
            annotations.len(),
            groups.len(),
            entries.len(),
            xref_offset
        );

        Ok(IncrementalUpdate {
            bytes: output,
            xref_offset,
            entries,
        })
    }
}

/// Groups annotations by page index, pages ascending, input order kept within a page.
pub fn group_by_page(annotations: &[Annotation]) -> Vec<(usize, Vec<&Annotation>)> {
    let mut groups: BTreeMap<usize, Vec<&Annotation>> = BTreeMap::new();
    for annotation in annotations {
        groups.entry(annotation.page).or_default().push(annotation);
    }
    groups.into_iter().collect()
}
