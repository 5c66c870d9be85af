//! Helper functions for creating valid test PDFs with correct offsets

/// Builds a single-revision PDF from consecutively numbered object bodies.
///
/// `objects[i]` becomes object `i + 1`; the catalog is object 1.
pub fn build_pdf(objects: &[&str]) -> Vec<u8> {
    let mut content = b"%PDF-1.4\n".to_vec();
    let mut offsets = Vec::with_capacity(objects.len());

    for (index, body) in objects.iter().enumerate() {
        offsets.push(content.len());
        content.extend_from_slice(format!("{} 0 obj\n{}\nendobj\n", index + 1, body).as_bytes());
    }

    let xref_start = content.len();
    let mut xref = format!("xref\n0 {}\n0000000000 65535 f \n", objects.len() + 1);
    for offset in offsets {
        xref.push_str(&format!("{offset:010} 00000 n \n"));
    }
    xref.push_str(&format!(
        "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{}\n%%EOF\n",
        objects.len() + 1,
        xref_start
    ));
    content.extend_from_slice(xref.as_bytes());
    content
}

/// Two pages: object 3 without annotations, object 4 with `/Annots 5 0 R` holding `6 0 R`
pub fn create_two_page_pdf() -> Vec<u8> {
    build_pdf(&[
        "<< /Type /Catalog /Pages 2 0 R >>",
        "<< /Type /Pages /Kids [3 0 R 4 0 R] /Count 2 >>",
        "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 612 792] >>",
        "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 612 792] /Annots 5 0 R >>",
        "[6 0 R]",
        "<< /Type /Annot /Subtype /Text /Rect [0 0 10 10] /Contents (old) >>",
    ])
}
