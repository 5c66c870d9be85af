//! Annotation payloads handed to the incremental writer

use crate::annotations::Page;
use crate::error::{PdfError, Result};
use crate::objects::ReferencePointer;
use chrono::{DateTime, Utc};

/// Annotation subtypes the writer knows how to name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnnotationSubtype {
    /// Text annotation (sticky note)
    Text,
    /// Highlight annotation
    Highlight,
    /// Underline annotation
    Underline,
    /// Squiggly underline annotation
    Squiggly,
    /// Strikeout annotation
    StrikeOut,
    /// Square annotation
    Square,
    /// Circle annotation
    Circle,
    /// Free text annotation
    FreeText,
    /// Polygon annotation
    Polygon,
    /// Polyline annotation
    PolyLine,
    /// Rubber stamp annotation
    Stamp,
    /// Caret annotation
    Caret,
}

impl AnnotationSubtype {
    pub const ALL: [AnnotationSubtype; 12] = [
        AnnotationSubtype::Text,
        AnnotationSubtype::Highlight,
        AnnotationSubtype::Underline,
        AnnotationSubtype::Squiggly,
        AnnotationSubtype::StrikeOut,
        AnnotationSubtype::Square,
        AnnotationSubtype::Circle,
        AnnotationSubtype::FreeText,
        AnnotationSubtype::Polygon,
        AnnotationSubtype::PolyLine,
        AnnotationSubtype::Stamp,
        AnnotationSubtype::Caret,
    ];

    /// Get PDF subtype name
    pub fn pdf_name(&self) -> &'static str {
        match self {
            AnnotationSubtype::Text => "Text",
            AnnotationSubtype::Highlight => "Highlight",
            AnnotationSubtype::Underline => "Underline",
            AnnotationSubtype::Squiggly => "Squiggly",
            AnnotationSubtype::StrikeOut => "StrikeOut",
            AnnotationSubtype::Square => "Square",
            AnnotationSubtype::Circle => "Circle",
            AnnotationSubtype::FreeText => "FreeText",
            AnnotationSubtype::Polygon => "Polygon",
            AnnotationSubtype::PolyLine => "PolyLine",
            AnnotationSubtype::Stamp => "Stamp",
            AnnotationSubtype::Caret => "Caret",
        }
    }

    /// Looks a subtype up by name. A leading `/` is accepted.
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.strip_prefix('/').unwrap_or(name);
        Self::ALL.into_iter().find(|s| s.pdf_name() == name)
    }
}

/// Annotation flags according to ISO 32000-1 Section 12.5.3
#[derive(Debug, Clone, Copy, Default)]
pub struct AnnotationFlags {
    pub invisible: bool,
    pub hidden: bool,
    pub print: bool,
    pub no_zoom: bool,
    pub no_rotate: bool,
    pub no_view: bool,
    pub read_only: bool,
    pub locked: bool,
    pub locked_contents: bool,
}

impl AnnotationFlags {
    /// Convert to PDF flags integer
    pub fn to_flags(&self) -> u32 {
        let mut flags = 0u32;
        if self.invisible {
            flags |= 1 << 0;
        }
        if self.hidden {
            flags |= 1 << 1;
        }
        if self.print {
            flags |= 1 << 2;
        }
        if self.no_zoom {
            flags |= 1 << 3;
        }
        if self.no_rotate {
            flags |= 1 << 4;
        }
        if self.no_view {
            flags |= 1 << 5;
        }
        if self.read_only {
            flags |= 1 << 6;
        }
        if self.locked {
            flags |= 1 << 7;
        }
        if self.locked_contents {
            flags |= 1 << 9;
        }
        flags
    }
}

/// RGB colour. Channels are either already in `0.0..=1.0` or on a 0-255 scale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

impl Color {
    pub fn rgb(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b }
    }

    /// Returns a copy with every channel above 1 divided by 255.
    ///
    /// Channels at or below 1 are taken as already normalised, so applying
    /// this twice gives the same result as applying it once.
    pub fn normalized(&self) -> Self {
        fn channel(value: f64) -> f64 {
            if value > 1.0 {
                value / 255.0
            } else {
                value
            }
        }
        Self {
            r: channel(self.r),
            g: channel(self.g),
            b: channel(self.b),
        }
    }

    pub fn components(&self) -> [f64; 3] {
        [self.r, self.g, self.b]
    }
}

/// Border written as the `/Border [h v w]` array.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Border {
    pub horizontal_corner_radius: f64,
    pub vertical_corner_radius: f64,
    pub border_width: f64,
}

impl Border {
    pub fn new(horizontal_corner_radius: f64, vertical_corner_radius: f64, border_width: f64) -> Self {
        Self {
            horizontal_corner_radius,
            vertical_corner_radius,
            border_width,
        }
    }

    pub fn components(&self) -> [f64; 3] {
        [
            self.horizontal_corner_radius,
            self.vertical_corner_radius,
            self.border_width,
        ]
    }
}

impl Default for Border {
    fn default() -> Self {
        Self::new(0.0, 0.0, 1.0)
    }
}

/// One annotation to append to a document.
///
/// `object_id` must come from the document's free id allocator and
/// `page_reference` must describe the page at index `page`.
#[derive(Debug, Clone, Default)]
pub struct Annotation {
    pub object_id: Option<ReferencePointer>,
    pub page: usize,
    pub page_reference: Option<Page>,
    pub author: String,
    pub contents: String,
    /// Modification date, normally in PDF date form (`D:YYYYMMDDHHmmSS+00'00`)
    pub update_date: String,
    /// Unique annotation name, written as `/NM`
    pub id: String,
    pub rect: Option<[f64; 4]>,
    /// Subtype name; unknown names are written as an empty token
    pub subtype: Option<String>,
    pub annotation_flag: Option<u32>,
    pub color: Option<Color>,
    pub opacity: Option<f64>,
    pub border: Option<Border>,
    pub default_appearance: Option<String>,
    pub quad_points: Option<Vec<f64>>,
    pub vertices: Option<Vec<f64>>,
    /// Writes `/Name /Draft`
    pub stamp_type: bool,
    /// Writes `/Sy P`
    pub caret_symbol: bool,
}

impl Annotation {
    /// Create a new annotation on the page with the given index
    pub fn new(page: usize) -> Self {
        Self {
            page,
            ..Default::default()
        }
    }

    pub fn with_object_id(mut self, object_id: ReferencePointer) -> Self {
        self.object_id = Some(object_id);
        self
    }

    pub fn with_page_reference(mut self, page: Page) -> Self {
        self.page_reference = Some(page);
        self
    }

    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = author.into();
        self
    }

    pub fn with_contents(mut self, contents: impl Into<String>) -> Self {
        self.contents = contents.into();
        self
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    /// Set the modification date from a timestamp
    pub fn with_update_date(mut self, date: DateTime<Utc>) -> Self {
        self.update_date = format_pdf_date(date);
        self
    }

    pub fn with_rect(mut self, rect: [f64; 4]) -> Self {
        self.rect = Some(rect);
        self
    }

    pub fn with_subtype(mut self, subtype: AnnotationSubtype) -> Self {
        self.subtype = Some(subtype.pdf_name().to_string());
        self
    }

    pub fn with_flags(mut self, flags: AnnotationFlags) -> Self {
        self.annotation_flag = Some(flags.to_flags());
        self
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = Some(color);
        self
    }

    pub fn with_opacity(mut self, opacity: f64) -> Self {
        self.opacity = Some(opacity);
        self
    }

    pub fn with_border(mut self, border: Border) -> Self {
        self.border = Some(border);
        self
    }

    pub fn with_default_appearance(mut self, appearance: impl Into<String>) -> Self {
        self.default_appearance = Some(appearance.into());
        self
    }

    pub fn with_quad_points(mut self, points: Vec<f64>) -> Self {
        self.quad_points = Some(points);
        self
    }

    pub fn with_vertices(mut self, vertices: Vec<f64>) -> Self {
        self.vertices = Some(vertices);
        self
    }

    pub fn as_draft_stamp(mut self) -> Self {
        self.stamp_type = true;
        self
    }

    pub fn with_caret_paragraph_symbol(mut self) -> Self {
        self.caret_symbol = true;
        self
    }

    /// Resolved subtype, `None` when absent or unrecognised
    pub fn known_subtype(&self) -> Option<AnnotationSubtype> {
        self.subtype.as_deref().and_then(AnnotationSubtype::from_name)
    }

    /// Checks the fields every written annotation must carry.
    pub fn validate(&self) -> Result<()> {
        if self.author.is_empty() {
            return Err(PdfError::missing("annotation", "author"));
        }
        if self.contents.is_empty() {
            return Err(PdfError::missing("annotation", "contents"));
        }
        if self.object_id.is_none() {
            return Err(PdfError::missing("annotation", "object_id"));
        }
        match &self.page_reference {
            None => Err(PdfError::missing("annotation", "page_reference")),
            Some(page) if page.object_id.is_none() => Err(PdfError::missing("page", "object_id")),
            Some(_) => Ok(()),
        }
    }
}

/// Format a DateTime as a PDF date string (D:YYYYMMDDHHmmSSOHH'mm)
pub fn format_pdf_date(date: DateTime<Utc>) -> String {
    let formatted = date.format("D:%Y%m%d%H%M%S");

    // For UTC, the offset is always +00'00
    format!("{formatted}+00'00")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn complete() -> Annotation {
        Annotation::new(0)
            .with_object_id(ReferencePointer::new(10, 0))
            .with_page_reference(Page::new(ReferencePointer::new(3, 0)))
            .with_author("A")
            .with_contents("hi")
    }

    #[test]
    fn test_subtype_names_round_trip() {
        for subtype in AnnotationSubtype::ALL {
            assert_eq!(AnnotationSubtype::from_name(subtype.pdf_name()), Some(subtype));
        }
        assert_eq!(
            AnnotationSubtype::from_name("/StrikeOut"),
            Some(AnnotationSubtype::StrikeOut)
        );
        assert_eq!(AnnotationSubtype::from_name("Link"), None);
        assert_eq!(AnnotationSubtype::from_name("text"), None);
    }

    #[test]
    fn test_annotation_flags() {
        let flags = AnnotationFlags {
            print: true,
            read_only: true,
            ..Default::default()
        };

        assert_eq!(flags.to_flags(), 68); // bits 2 and 6 set
    }

    #[test]
    fn test_color_normalization() {
        let color = Color::rgb(255.0, 0.5, 51.0).normalized();
        assert_eq!(color.r, 1.0);
        assert_eq!(color.g, 0.5);
        assert!((color.b - 0.2).abs() < 1e-12);
    }

    #[test]
    fn test_color_normalization_idempotent() {
        let once = Color::rgb(128.0, 64.0, 1.0).normalized();
        assert_eq!(once.normalized(), once);
    }

    #[test]
    fn test_validate_accepts_complete_annotation() {
        assert!(complete().validate().is_ok());
    }

    #[test]
    fn test_validate_reports_first_missing_field() {
        let cases = [
            (complete().with_author(""), "author"),
            (complete().with_contents(""), "contents"),
            (
                Annotation {
                    object_id: None,
                    ..complete()
                },
                "object_id",
            ),
            (
                Annotation {
                    page_reference: None,
                    ..complete()
                },
                "page_reference",
            ),
        ];

        for (annotation, expected) in cases {
            match annotation.validate() {
                Err(PdfError::MissingField { field, .. }) => assert_eq!(field, expected),
                other => panic!("expected MissingField({expected}), got {other:?}"),
            }
        }
    }

    #[test]
    fn test_validate_rejects_page_without_object_id() {
        // An existing /Annots array does not make the page reference optional
        let page = Page::default().with_annots_pointer(ReferencePointer::new(7, 0));
        let annotation = complete().with_page_reference(page);

        match annotation.validate() {
            Err(PdfError::MissingField { entity, field }) => {
                assert_eq!((entity, field), ("page", "object_id"))
            }
            other => panic!("expected MissingField(page, object_id), got {other:?}"),
        }
    }

    #[test]
    fn test_known_subtype() {
        let annotation = complete().with_subtype(AnnotationSubtype::Caret);
        assert_eq!(annotation.known_subtype(), Some(AnnotationSubtype::Caret));

        let unknown = Annotation {
            subtype: Some("Sticky".to_string()),
            ..complete()
        };
        assert_eq!(unknown.known_subtype(), None);
    }

    #[test]
    fn test_format_pdf_date() {
        let date = Utc.with_ymd_and_hms(2023, 12, 25, 15, 30, 45).unwrap();
        assert_eq!(format_pdf_date(date), "D:20231225153045+00'00");

        let annotation = Annotation::new(0).with_update_date(date);
        assert_eq!(annotation.update_date, "D:20231225153045+00'00");
    }
}
