use thiserror::Error;

#[derive(Error, Debug)]
pub enum PdfError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Missing required field: {entity} has no {field}")]
    MissingField {
        entity: &'static str,
        field: &'static str,
    },

    #[error("Format invariant violated: xref record is {actual} bytes, expected {expected} ({record:?})")]
    FormatInvariantViolation {
        expected: usize,
        actual: usize,
        record: String,
    },

    #[error("Parse error at byte {offset}: {message}")]
    ParseError { offset: usize, message: String },

    #[error("Invalid xref section: {0}")]
    InvalidXRef(String),

    #[error("Invalid trailer: {0}")]
    InvalidTrailer(String),

    #[error("Object not found: {0} {1} R")]
    ObjectNotFound(u32, u16),

    #[error("Invalid page index: {0}")]
    InvalidPageIndex(usize),

    #[error("Unknown annotation subtype: {0}")]
    UnknownSubtype(String),

    #[error("Unsupported feature: {0}")]
    Unsupported(String),
}

pub type Result<T> = std::result::Result<T, PdfError>;

impl PdfError {
    pub(crate) fn missing(entity: &'static str, field: &'static str) -> Self {
        PdfError::MissingField { entity, field }
    }

    pub(crate) fn parse(offset: usize, message: impl Into<String>) -> Self {
        PdfError::ParseError {
            offset,
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Error as IoError, ErrorKind};

    #[test]
    fn test_missing_field_display() {
        let error = PdfError::missing("annotation", "author");
        assert_eq!(
            error.to_string(),
            "Missing required field: annotation has no author"
        );
    }

    #[test]
    fn test_format_invariant_display() {
        let error = PdfError::FormatInvariantViolation {
            expected: 20,
            actual: 19,
            record: "0000000010 00000 \r\n".to_string(),
        };
        let msg = error.to_string();
        assert!(msg.contains("19 bytes"));
        assert!(msg.contains("expected 20"));
    }

    #[test]
    fn test_pdf_error_from_io_error() {
        let io_error = IoError::new(ErrorKind::NotFound, "file not found");
        let pdf_error = PdfError::from(io_error);

        match pdf_error {
            PdfError::Io(ref err) => {
                assert_eq!(err.kind(), ErrorKind::NotFound);
            }
            _ => panic!("Expected IO error variant"),
        }
    }

    #[test]
    fn test_error_chain_display() {
        let errors = [
            (
                "Parse error at byte 42: unexpected token",
                PdfError::parse(42, "unexpected token"),
            ),
            ("Object not found: 12 0 R", PdfError::ObjectNotFound(12, 0)),
            ("Invalid page index: 7", PdfError::InvalidPageIndex(7)),
            (
                "Unknown annotation subtype: Sticky",
                PdfError::UnknownSubtype("Sticky".to_string()),
            ),
            (
                "Invalid xref section: truncated",
                PdfError::InvalidXRef("truncated".to_string()),
            ),
        ];

        for (expected, error) in errors {
            assert_eq!(error.to_string(), expected);
        }
    }

    #[test]
    fn test_error_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<PdfError>();
    }
}
