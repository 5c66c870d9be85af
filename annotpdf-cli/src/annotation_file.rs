//! JSON description of the annotations to add

use annotpdf::{
    format_pdf_date, Annotation, AnnotationFlags, AnnotationSubtype, Border, Color,
    DocumentHistory, Page,
};
use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::path::Path;

/// One entry of the `--annotations` file
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AnnotationSpec {
    /// Zero-based page index
    pub page: usize,
    pub author: String,
    pub contents: String,
    #[serde(default)]
    pub id: Option<String>,
    /// Subtype name, e.g. `Text` or `Highlight`
    #[serde(default, rename = "type")]
    pub subtype: Option<String>,
    #[serde(default)]
    pub rect: Option<[f64; 4]>,
    #[serde(default)]
    pub color: Option<[f64; 3]>,
    #[serde(default)]
    pub opacity: Option<f64>,
    #[serde(default)]
    pub flag: Option<u32>,
    /// Flag names such as `print` or `no_zoom`, combined with `flag`
    #[serde(default)]
    pub flags: Vec<String>,
    #[serde(default)]
    pub border: Option<[f64; 3]>,
    #[serde(default)]
    pub default_appearance: Option<String>,
    #[serde(default)]
    pub quad_points: Option<Vec<f64>>,
    #[serde(default)]
    pub vertices: Option<Vec<f64>>,
    #[serde(default)]
    pub stamp: bool,
    #[serde(default)]
    pub caret: bool,
    /// RFC 3339 timestamp or a ready PDF date (`D:...`)
    #[serde(default)]
    pub date: Option<String>,
}

pub fn load(path: &Path) -> Result<Vec<AnnotationSpec>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read annotations from {}", path.display()))?;
    serde_json::from_str(&text)
        .with_context(|| format!("Failed to parse annotations in {}", path.display()))
}

impl AnnotationSpec {
    /// Resolves the page and allocates the object number
    pub fn into_annotation<H: DocumentHistory + ?Sized>(
        self,
        pages: &[Page],
        history: &mut H,
        now: DateTime<Utc>,
    ) -> Result<Annotation> {
        let Some(page) = pages.get(self.page) else {
            bail!(
                "annotation on page {} but the document has {} page(s)",
                self.page,
                pages.len()
            );
        };

        let flags = parse_flags(&self.flags)?;
        let object_id = history.free_object_id();
        let update_date = match self.date {
            Some(date) if date.starts_with("D:") => date,
            Some(date) => {
                let parsed = DateTime::parse_from_rfc3339(&date)
                    .with_context(|| format!("Invalid annotation date {date:?}"))?;
                format_pdf_date(parsed.with_timezone(&Utc))
            }
            None => format_pdf_date(now),
        };

        let subtype = self
            .subtype
            .map(|name| match AnnotationSubtype::from_name(&name) {
                Some(known) => known.pdf_name().to_string(),
                None => name,
            });

        let annotation = Annotation {
            object_id: Some(object_id),
            page: self.page,
            page_reference: Some(page.clone()),
            author: self.author,
            contents: self.contents,
            update_date,
            id: self
                .id
                .unwrap_or_else(|| format!("annot-{}", object_id.obj())),
            rect: self.rect,
            subtype,
            annotation_flag: self.flag,
            color: self.color.map(|[r, g, b]| Color::rgb(r, g, b)),
            opacity: self.opacity,
            border: self.border.map(|[h, v, w]| Border::new(h, v, w)),
            default_appearance: self.default_appearance,
            quad_points: self.quad_points,
            vertices: self.vertices,
            stamp_type: self.stamp,
            caret_symbol: self.caret,
        };

        Ok(match (flags, self.flag) {
            (None, _) => annotation,
            (Some(flags), None) => annotation.with_flags(flags),
            (Some(flags), Some(raw)) => {
                let mut annotation = annotation.with_flags(flags);
                annotation.annotation_flag = annotation.annotation_flag.map(|bits| bits | raw);
                annotation
            }
        })
    }
}

fn parse_flags(names: &[String]) -> Result<Option<AnnotationFlags>> {
    if names.is_empty() {
        return Ok(None);
    }
    let mut flags = AnnotationFlags::default();
    for name in names {
        let slot = match name.as_str() {
            "invisible" => &mut flags.invisible,
            "hidden" => &mut flags.hidden,
            "print" => &mut flags.print,
            "no_zoom" => &mut flags.no_zoom,
            "no_rotate" => &mut flags.no_rotate,
            "no_view" => &mut flags.no_view,
            "read_only" => &mut flags.read_only,
            "locked" => &mut flags.locked,
            "locked_contents" => &mut flags.locked_contents,
            other => bail!("Unknown annotation flag {other:?}"),
        };
        *slot = true;
    }
    Ok(Some(flags))
}

#[cfg(test)]
mod tests {
    use super::*;
    use annotpdf::{ReferencePointer, TrailerInfo, UpdateSection, XRef};
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    struct Counter {
        next: u32,
        update: UpdateSection,
    }

    impl Counter {
        fn new(next: u32) -> Self {
            Self {
                next,
                update: UpdateSection {
                    refs: Vec::new(),
                    trailer: TrailerInfo {
                        size: next,
                        root: ReferencePointer::new(1, 0),
                        prev: None,
                    },
                    start_pointer: 0,
                },
            }
        }
    }

    impl DocumentHistory for Counter {
        fn object_lookup_table(&self) -> HashMap<u32, XRef> {
            HashMap::new()
        }

        fn free_object_id(&mut self) -> ReferencePointer {
            self.next += 1;
            ReferencePointer::new(self.next - 1, 0)
        }

        fn recent_update(&self) -> &UpdateSection {
            &self.update
        }

        fn trailer_size(&self) -> u32 {
            self.next
        }
    }

    fn parse(json: &str) -> AnnotationSpec {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_minimal_spec() {
        let spec = parse(
            r#"{"page": 0, "author": "A", "contents": "hi", "type": "Text", "rect": [1, 2, 3, 4]}"#,
        );
        let pages = vec![Page::new(ReferencePointer::new(3, 0))];
        let now = Utc.with_ymd_and_hms(2024, 5, 6, 7, 8, 9).unwrap();

        let annotation = spec
            .into_annotation(&pages, &mut Counter::new(10), now)
            .unwrap();

        assert_eq!(annotation.object_id, Some(ReferencePointer::new(10, 0)));
        assert_eq!(annotation.id, "annot-10");
        assert_eq!(annotation.update_date, "D:20240506070809+00'00");
        assert_eq!(annotation.subtype.as_deref(), Some("Text"));
        assert_eq!(annotation.rect, Some([1.0, 2.0, 3.0, 4.0]));
        assert!(annotation.validate().is_ok());
    }

    #[test]
    fn test_full_spec() {
        let spec = parse(
            r#"{
                "page": 1, "author": "A", "contents": "c", "id": "mine", "type": "/Highlight",
                "rect": [0, 0, 10, 10], "color": [255, 0, 0], "opacity": 0.5, "flag": 4,
                "border": [0, 0, 2], "default_appearance": "/Helv 12 Tf",
                "quad_points": [0, 10, 10, 10, 0, 0, 10, 0], "stamp": true, "caret": true,
                "date": "2023-12-25T15:30:45Z"
            }"#,
        );
        let pages = vec![
            Page::new(ReferencePointer::new(3, 0)),
            Page::new(ReferencePointer::new(4, 0)),
        ];

        let annotation = spec
            .into_annotation(&pages, &mut Counter::new(10), Utc::now())
            .unwrap();

        assert_eq!(annotation.id, "mine");
        assert_eq!(annotation.subtype.as_deref(), Some("Highlight"));
        assert_eq!(
            annotation.page_reference.unwrap().object_id,
            Some(ReferencePointer::new(4, 0))
        );
        assert_eq!(annotation.update_date, "D:20231225153045+00'00");
        assert_eq!(annotation.color, Some(Color::rgb(255.0, 0.0, 0.0)));
        assert_eq!(annotation.border, Some(Border::new(0.0, 0.0, 2.0)));
        assert_eq!(annotation.annotation_flag, Some(4));
        assert!(annotation.stamp_type && annotation.caret_symbol);
    }

    #[test]
    fn test_type_and_rect_optional() {
        let spec = parse(r#"{"page": 0, "author": "A", "contents": "hi"}"#);
        let pages = vec![Page::new(ReferencePointer::new(3, 0))];

        let annotation = spec
            .into_annotation(&pages, &mut Counter::new(10), Utc::now())
            .unwrap();

        assert_eq!(annotation.subtype, None);
        assert_eq!(annotation.rect, None);
        assert!(annotation.validate().is_ok());
    }

    #[test]
    fn test_named_flags() {
        let spec = parse(
            r#"{"page": 0, "author": "A", "contents": "hi", "flags": ["print", "no_zoom"]}"#,
        );
        let pages = vec![Page::new(ReferencePointer::new(3, 0))];

        let annotation = spec
            .into_annotation(&pages, &mut Counter::new(10), Utc::now())
            .unwrap();

        assert_eq!(annotation.annotation_flag, Some(4 | 8));
    }

    #[test]
    fn test_named_flags_combine_with_raw_flag() {
        let spec = parse(
            r#"{"page": 0, "author": "A", "contents": "hi", "flag": 2, "flags": ["locked"]}"#,
        );
        let pages = vec![Page::new(ReferencePointer::new(3, 0))];

        let annotation = spec
            .into_annotation(&pages, &mut Counter::new(10), Utc::now())
            .unwrap();

        assert_eq!(annotation.annotation_flag, Some(2 | 128));
    }

    #[test]
    fn test_unknown_flag_allocates_nothing() {
        let spec = parse(r#"{"page": 0, "author": "A", "contents": "hi", "flags": ["sticky"]}"#);
        let pages = vec![Page::new(ReferencePointer::new(3, 0))];
        let mut history = Counter::new(10);

        let result = spec.into_annotation(&pages, &mut history, Utc::now());

        assert!(result.is_err());
        assert_eq!(history.next, 10);
    }

    #[test]
    fn test_page_out_of_range() {
        let spec = parse(
            r#"{"page": 3, "author": "A", "contents": "hi", "type": "Text", "rect": [1, 2, 3, 4]}"#,
        );
        let mut history = Counter::new(10);
        let result = spec.into_annotation(&[], &mut history, Utc::now());

        assert!(result.is_err());
        assert_eq!(history.next, 10);
    }

    #[test]
    fn test_unknown_fields_rejected() {
        let result: std::result::Result<AnnotationSpec, _> = serde_json::from_str(
            r#"{"page": 0, "author": "A", "contents": "hi", "type": "Text", "rect": [1, 2, 3, 4], "colour": [1, 0, 0]}"#,
        );
        assert!(result.is_err());
    }
}
