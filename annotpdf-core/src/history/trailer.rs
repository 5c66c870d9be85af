//! Trailer dictionary of one revision (ISO 32000-1 Section 7.5.5)

use crate::error::{PdfError, Result};
use crate::objects::{Dictionary, ReferencePointer};

/// The trailer entries the incremental writer depends on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrailerInfo {
    pub size: u32,
    /// Document catalog
    pub root: ReferencePointer,
    /// Byte offset of the previous cross-reference section, if any
    pub prev: Option<u64>,
}

impl TrailerInfo {
    /// Parse trailer from a dictionary
    pub fn from_dict(dict: &Dictionary) -> Result<Self> {
        let size = dict
            .get_integer("Size")
            .ok_or_else(|| PdfError::InvalidTrailer("missing /Size".to_string()))
            .and_then(|size| {
                u32::try_from(size)
                    .map_err(|_| PdfError::InvalidTrailer(format!("/Size {size} out of range")))
            })?;

        let root = dict
            .get_reference("Root")
            .ok_or_else(|| PdfError::InvalidTrailer("missing /Root".to_string()))?;

        let prev = match dict.get_integer("Prev") {
            Some(prev) => Some(
                u64::try_from(prev)
                    .map_err(|_| PdfError::InvalidTrailer(format!("/Prev {prev} is negative")))?,
            ),
            None => None,
        };

        Ok(Self { size, root, prev })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::objects::Object;

    fn dict(entries: &[(&str, Object)]) -> Dictionary {
        entries
            .iter()
            .map(|(key, value)| (key.to_string(), value.clone()))
            .collect()
    }

    #[test]
    fn test_trailer_from_dict() {
        let trailer = TrailerInfo::from_dict(&dict(&[
            ("Size", Object::Integer(12)),
            ("Root", Object::Reference(ReferencePointer::new(1, 0))),
            ("Prev", Object::Integer(480)),
        ]))
        .unwrap();

        assert_eq!(trailer.size, 12);
        assert_eq!(trailer.root, ReferencePointer::new(1, 0));
        assert_eq!(trailer.prev, Some(480));
    }

    #[test]
    fn test_trailer_without_prev() {
        let trailer = TrailerInfo::from_dict(&dict(&[
            ("Size", Object::Integer(5)),
            ("Root", Object::Reference(ReferencePointer::new(1, 0))),
        ]))
        .unwrap();
        assert_eq!(trailer.prev, None);
    }

    #[test]
    fn test_trailer_missing_entries() {
        let no_size = dict(&[("Root", Object::Reference(ReferencePointer::new(1, 0)))]);
        assert!(matches!(
            TrailerInfo::from_dict(&no_size),
            Err(PdfError::InvalidTrailer(_))
        ));

        let no_root = dict(&[("Size", Object::Integer(5))]);
        assert!(matches!(
            TrailerInfo::from_dict(&no_root),
            Err(PdfError::InvalidTrailer(_))
        ));

        let negative = dict(&[
            ("Size", Object::Integer(-1)),
            ("Root", Object::Reference(ReferencePointer::new(1, 0))),
        ]);
        assert!(TrailerInfo::from_dict(&negative).is_err());
    }
}
