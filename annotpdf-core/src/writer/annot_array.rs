//! The per-page `/Annots` array object and, when the page had none, the
//! rewritten page dictionary that points at it

use super::tokens::*;
use super::{WriteOptions, XRef};
use crate::annotations::{Annotation, Page};
use crate::error::{PdfError, Result};
use crate::history::{locate_sequence, Direction, DocumentHistory};
use crate::objects::{encode_reference, ReferencePointer};
use std::borrow::Cow;
use std::collections::{HashMap, HashSet};

/// Objects written for one page group.
#[derive(Debug, Clone, PartialEq)]
pub struct AnnotArrayUpdate {
    pub array_reference: ReferencePointer,
    pub array_bytes: Vec<u8>,
    /// New revision of the page object, present when the array was freshly allocated
    pub page_object: Option<(ReferencePointer, Vec<u8>)>,
}

/// Builds the `/Annots` array for a group of annotations sharing one page.
///
/// The array lists the page's existing references followed by the new
/// annotations. When the page has no indirect array yet, a fresh object
/// number is taken from `history` and the page object is rewritten to
/// reference it.
pub fn build_annot_array<H: DocumentHistory + ?Sized>(
    annotations: &[&Annotation],
    document: &[u8],
    lookup: &HashMap<u32, XRef>,
    history: &mut H,
    options: &WriteOptions,
) -> Result<AnnotArrayUpdate> {
    let first = annotations
        .first()
        .ok_or_else(|| PdfError::missing("annotation group", "annotation"))?;
    let page = first
        .page_reference
        .as_ref()
        .ok_or_else(|| PdfError::missing("annotation", "page_reference"))?;

    let page_id = page
        .object_id
        .ok_or_else(|| PdfError::missing("page", "object_id"))?;

    let references = collect_references(page, annotations, options)?;

    let (array_reference, page_object) = match page.annots_pointer {
        Some(pointer) => (pointer, None),
        None => {
            // Locate the page before taking an id so a failure leaves the history untouched
            let (object, dict_end) = locate_page_object(page_id, document, lookup)?;
            let pointer = history.free_object_id();
            let patched = splice_annots(object, dict_end, page_id, pointer);
            tracing::debug!("Allocated /Annots array {} for page {}", pointer, page_id);
            (pointer, Some((page_id, patched)))
        }
    };

    let mut array_bytes = Vec::with_capacity(32 + references.len() * 12);
    array_bytes.extend_from_slice(&encode_reference(array_reference, false));
    array_bytes.push(SPACE);
    array_bytes.extend_from_slice(OBJ);
    array_bytes.push(SPACE);
    array_bytes.push(ARRAY_START);
    for reference in &references {
        array_bytes.extend_from_slice(&encode_reference(*reference, true));
        array_bytes.push(SPACE);
    }
    array_bytes.push(ARRAY_END);
    array_bytes.push(SPACE);
    array_bytes.extend_from_slice(ENDOBJ);
    array_bytes.extend_from_slice(EOL);

    Ok(AnnotArrayUpdate {
        array_reference,
        array_bytes,
        page_object,
    })
}

fn collect_references(
    page: &Page,
    annotations: &[&Annotation],
    options: &WriteOptions,
) -> Result<Vec<ReferencePointer>> {
    let mut references = page.annots.clone();
    let mut seen: HashSet<ReferencePointer> = references.iter().copied().collect();

    for annotation in annotations {
        let reference = annotation
            .object_id
            .ok_or_else(|| PdfError::missing("annotation", "object_id"))?;
        if options.dedupe_annot_refs && !seen.insert(reference) {
            tracing::debug!("Skipping duplicate /Annots entry {}", reference);
            continue;
        }
        references.push(reference);
    }
    Ok(references)
}

/// Rewrites the page object so its dictionary ends with `/Annots <array> R`.
///
/// The object's bytes run from its cross-reference offset to the end of the
/// first `endobj` after it. The entry is spliced in before the last `>>`
/// preceding that `endobj`. An inline `/Annots [...]` array is dropped
/// first, since its references are already carried by the new array.
pub fn adapt_page_object(
    page: &Page,
    annots_reference: ReferencePointer,
    document: &[u8],
    lookup: &HashMap<u32, XRef>,
) -> Result<Vec<u8>> {
    let page_id = page
        .object_id
        .ok_or_else(|| PdfError::missing("page", "object_id"))?;
    let (object, dict_end) = locate_page_object(page_id, document, lookup)?;
    Ok(splice_annots(object, dict_end, page_id, annots_reference))
}

/// `n g obj ... endobj` of the page as it stands in the document, with the
/// position of the `>>` closing its dictionary
fn locate_page_object<'d>(
    page_id: ReferencePointer,
    document: &'d [u8],
    lookup: &HashMap<u32, XRef>,
) -> Result<(&'d [u8], usize)> {
    let entry = lookup
        .get(&page_id.obj())
        .ok_or(PdfError::ObjectNotFound(page_id.obj(), page_id.generation()))?;

    let start = usize::try_from(entry.pointer)
        .ok()
        .filter(|&start| start < document.len())
        .ok_or_else(|| {
            PdfError::parse(
                entry.pointer as usize,
                format!("page object {page_id} lies outside the document"),
            )
        })?;

    let end = locate_sequence(ENDOBJ, document, start, Direction::Forward).ok_or_else(|| {
        PdfError::parse(start, format!("no endobj after page object {page_id}"))
    })?;
    let object = &document[start..end + ENDOBJ.len()];

    let dict_end = locate_sequence(DICT_END, object, end - start, Direction::Backward)
        .ok_or_else(|| {
            PdfError::parse(start, format!("page object {page_id} has no dictionary"))
        })?;
    Ok((object, dict_end))
}

fn splice_annots(
    object: &[u8],
    dict_end: usize,
    page_id: ReferencePointer,
    annots_reference: ReferencePointer,
) -> Vec<u8> {
    let (head, tail) = object.split_at(dict_end);
    let head = strip_inline_annots(head, page_id);

    let mut out = Vec::with_capacity(object.len() + 24);
    out.extend_from_slice(&head);
    out.extend_from_slice(ANNOTS);
    out.push(SPACE);
    out.extend_from_slice(&encode_reference(annots_reference, true));
    out.push(SPACE);
    out.extend_from_slice(tail);
    out.extend_from_slice(EOL);
    out
}

fn strip_inline_annots(head: &[u8], page_id: ReferencePointer) -> Cow<'_, [u8]> {
    let mut search_from = 0;
    while let Some(key) = locate_sequence(ANNOTS, head, search_from, Direction::Forward) {
        let after_key = key + ANNOTS.len();
        search_from = after_key;

        // `/AnnotsFoo` is a different name
        if head
            .get(after_key)
            .is_some_and(|b| !b.is_ascii_whitespace() && *b != ARRAY_START)
        {
            continue;
        }

        let value = after_key
            + head[after_key..]
                .iter()
                .take_while(|b| b.is_ascii_whitespace())
                .count();
        if head.get(value) != Some(&ARRAY_START) {
            continue;
        }
        let Some(close) = head[value..].iter().position(|&b| b == ARRAY_END) else {
            continue;
        };

        tracing::warn!("Replacing inline /Annots array of page {}", page_id);
        let mut stripped = Vec::with_capacity(head.len());
        stripped.extend_from_slice(&head[..key]);
        stripped.extend_from_slice(&head[value + close + 1..]);
        return Cow::Owned(stripped);
    }
    Cow::Borrowed(head)
}
