/// Knobs for the incremental writer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriteOptions {
    /// Fail with [`crate::PdfError::UnknownSubtype`] instead of writing an empty `/Subtype`
    pub strict_subtypes: bool,
    /// Insert CR LF before the update when the original does not end in a line break
    pub ensure_leading_eol: bool,
    /// Drop references already present in a page's `/Annots` array
    pub dedupe_annot_refs: bool,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self {
            strict_subtypes: false,
            ensure_leading_eol: true,
            dedupe_annot_refs: true,
        }
    }
}

impl WriteOptions {
    pub fn strict() -> Self {
        Self {
            strict_subtypes: true,
            ..Default::default()
        }
    }
}
