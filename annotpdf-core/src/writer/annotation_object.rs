//! Serialization of a single annotation dictionary as an indirect object

use super::tokens::*;
use super::WriteOptions;
use crate::annotations::Annotation;
use crate::error::{PdfError, Result};
use crate::objects::{encode_reference, ReferencePointer};

/// Writes `annotation` as `<n> <g> obj <</Type /Annot ... >> endobj` followed by CR LF.
///
/// Returns the object's reference together with its bytes. Entries appear
/// in a fixed order; optional entries are written whenever present.
pub fn serialize_annotation(
    annotation: &Annotation,
    options: &WriteOptions,
) -> Result<(ReferencePointer, Vec<u8>)> {
    annotation.validate()?;
    let reference = annotation
        .object_id
        .ok_or_else(|| PdfError::missing("annotation", "object_id"))?;
    let page_object = annotation
        .page_reference
        .as_ref()
        .and_then(|page| page.object_id)
        .ok_or_else(|| PdfError::missing("page", "object_id"))?;

    let mut out = Vec::with_capacity(256);
    out.extend_from_slice(&encode_reference(reference, false));
    out.push(SPACE);
    out.extend_from_slice(OBJ);
    out.push(SPACE);
    out.extend_from_slice(DICT_START);
    out.extend_from_slice(TYPE_ANNOT);
    out.push(SPACE);

    if let Some(rect) = &annotation.rect {
        write_entry(&mut out, RECT, &encode_number_array(rect));
    }

    let subtype = subtype_token(annotation, options)?;
    write_entry(&mut out, SUBTYPE, &subtype);

    write_entry(
        &mut out,
        UPDATE_DATE,
        &encode_literal_string(&annotation.update_date),
    );
    write_entry(&mut out, AUTHOR, &encode_literal_string(&annotation.author));
    write_entry(&mut out, CONTENTS, &encode_literal_string(&annotation.contents));
    write_entry(&mut out, ID, &encode_literal_string(&annotation.id));

    if let Some(flag) = annotation.annotation_flag {
        write_entry(&mut out, FLAG, &encode_integer(flag));
    }
    if let Some(color) = annotation.color {
        write_entry(
            &mut out,
            COLOR,
            &encode_number_array(&color.normalized().components()),
        );
    }
    if let Some(opacity) = annotation.opacity {
        write_entry(&mut out, OPACITY, &encode_real(opacity));
    }
    if let Some(border) = annotation.border {
        write_entry(&mut out, BORDER, &encode_number_array(&border.components()));
    }
    if let Some(appearance) = &annotation.default_appearance {
        write_entry(&mut out, DEFAULT_APPEARANCE, &encode_literal_string(appearance));
    }
    write_entry(&mut out, PAGE_REFERENCE, &encode_reference(page_object, true));
    if let Some(points) = &annotation.quad_points {
        write_entry(&mut out, QUAD_POINTS, &encode_number_array(points));
    }
    if let Some(vertices) = &annotation.vertices {
        write_entry(&mut out, VERTICES, &encode_number_array(vertices));
    }
    if annotation.stamp_type {
        write_entry(&mut out, NAME, DRAFT);
    }
    if annotation.caret_symbol {
        write_entry(&mut out, SY, &[CARET_PARAGRAPH]);
    }

    out.extend_from_slice(DICT_END);
    out.push(SPACE);
    out.extend_from_slice(ENDOBJ);
    out.extend_from_slice(EOL);

    tracing::debug!(
        "Serialized annotation {} ({} bytes)",
        reference,
        out.len()
    );
    Ok((reference, out))
}

fn write_entry(out: &mut Vec<u8>, key: &[u8], value: &[u8]) {
    out.extend_from_slice(key);
    out.push(SPACE);
    out.extend_from_slice(value);
    out.push(SPACE);
}

/// `/Name` for a recognised subtype, nothing otherwise
fn subtype_token(annotation: &Annotation, options: &WriteOptions) -> Result<Vec<u8>> {
    if let Some(subtype) = annotation.known_subtype() {
        let mut token = Vec::with_capacity(subtype.pdf_name().len() + 1);
        token.push(b'/');
        token.extend_from_slice(subtype.pdf_name().as_bytes());
        return Ok(token);
    }

    let name = annotation.subtype.clone().unwrap_or_default();
    if options.strict_subtypes {
        return Err(PdfError::UnknownSubtype(name));
    }
    tracing::warn!(
        "Annotation {:?} has unrecognised subtype {:?}, writing an empty /Subtype",
        annotation.id,
        name
    );
    Ok(Vec::new())
}
