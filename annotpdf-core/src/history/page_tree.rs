//! Page tree traversal (ISO 32000-1 Section 7.7.3)

use crate::annotations::Page;
use crate::error::{PdfError, Result};
use crate::objects::{Dictionary, Object, ReferencePointer};
use crate::parser::parse_indirect_object;
use crate::writer::XRef;
use std::collections::{HashMap, HashSet};

/// Reads every leaf page in document order, starting from the catalog.
pub(crate) fn read_pages(
    data: &[u8],
    lookup: &HashMap<u32, XRef>,
    root: ReferencePointer,
) -> Result<Vec<Page>> {
    let catalog = load_dictionary(data, lookup, root)?;
    let pages_root = catalog
        .get_reference("Pages")
        .ok_or_else(|| PdfError::missing("catalog", "Pages"))?;

    let mut pages = Vec::new();
    let mut visited = HashSet::new();
    walk(data, lookup, pages_root, &mut visited, &mut pages)?;
    Ok(pages)
}

fn walk(
    data: &[u8],
    lookup: &HashMap<u32, XRef>,
    node: ReferencePointer,
    visited: &mut HashSet<ReferencePointer>,
    pages: &mut Vec<Page>,
) -> Result<()> {
    if !visited.insert(node) {
        return Err(PdfError::parse(
            offset_of(lookup, node),
            format!("page tree visits {node} twice"),
        ));
    }

    let dict = load_dictionary(data, lookup, node)?;
    if dict.get_name("Type") == Some("Pages") || dict.contains_key("Kids") {
        let kids = dict
            .get_array("Kids")
            .ok_or_else(|| PdfError::missing("page tree node", "Kids"))?;
        for kid in kids {
            let kid = kid
                .as_reference()
                .ok_or_else(|| {
                    PdfError::parse(offset_of(lookup, node), format!("{node} has a direct kid"))
                })?;
            walk(data, lookup, kid, visited, pages)?;
        }
        return Ok(());
    }

    pages.push(leaf_page(data, lookup, node, &dict)?);
    Ok(())
}

fn leaf_page(
    data: &[u8],
    lookup: &HashMap<u32, XRef>,
    node: ReferencePointer,
    dict: &Dictionary,
) -> Result<Page> {
    let page = Page::new(node);
    match dict.get("Annots") {
        Some(Object::Reference(pointer)) => {
            let annots = match load(data, lookup, *pointer)? {
                Object::Array(items) => references(&items),
                other => {
                    return Err(PdfError::parse(
                        offset_of(lookup, *pointer),
                        format!("/Annots {pointer} of page {node} is {other:?}, not an array"),
                    ))
                }
            };
            Ok(page.with_annots(annots).with_annots_pointer(*pointer))
        }
        Some(Object::Array(items)) => Ok(page.with_annots(references(items))),
        _ => Ok(page),
    }
}

fn references(items: &[Object]) -> Vec<ReferencePointer> {
    items.iter().filter_map(Object::as_reference).collect()
}

fn offset_of(lookup: &HashMap<u32, XRef>, reference: ReferencePointer) -> usize {
    lookup
        .get(&reference.obj())
        .map_or(0, |entry| entry.pointer as usize)
}

fn load(data: &[u8], lookup: &HashMap<u32, XRef>, reference: ReferencePointer) -> Result<Object> {
    let entry = lookup
        .get(&reference.obj())
        .ok_or(PdfError::ObjectNotFound(reference.obj(), reference.generation()))?;
    let offset = usize::try_from(entry.pointer)
        .map_err(|_| PdfError::ObjectNotFound(reference.obj(), reference.generation()))?;
    parse_indirect_object(data, offset, reference)
}

fn load_dictionary(
    data: &[u8],
    lookup: &HashMap<u32, XRef>,
    reference: ReferencePointer,
) -> Result<Dictionary> {
    match load(data, lookup, reference)? {
        Object::Dictionary(dict) => Ok(dict),
        other => Err(PdfError::parse(
            offset_of(lookup, reference),
            format!("object {reference} is {other:?}, not a dictionary"),
        )),
    }
}
