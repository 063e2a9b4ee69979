//! Document loader: turns an uploaded file into plain text.

use std::path::Path;

use crate::corpus::CorpusError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Pdf,
    PlainText,
}

impl DocumentKind {
    /// Picks the loader from the file extension (case-insensitive).
    pub fn from_file_name(file_name: &str) -> Result<Self, CorpusError> {
        let extension = Path::new(file_name)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());

        match extension.as_deref() {
            Some("pdf") => Ok(DocumentKind::Pdf),
            Some("txt") | Some("md") => Ok(DocumentKind::PlainText),
            _ => Err(CorpusError::UnsupportedFileType(file_name.to_string())),
        }
    }
}

/// Extracts the text of a `.pdf`, `.txt` or `.md` upload.
pub fn extract_text(file_name: &str, bytes: &[u8]) -> Result<String, CorpusError> {
    match DocumentKind::from_file_name(file_name)? {
        DocumentKind::Pdf => {
            pdf_extract::extract_text_from_mem(bytes).map_err(|e| CorpusError::Pdf(e.to_string()))
        }
        DocumentKind::PlainText => Ok(String::from_utf8(bytes.to_vec())?),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_from_extension() {
        assert_eq!(
            DocumentKind::from_file_name("resume.PDF").unwrap(),
            DocumentKind::Pdf
        );
        assert_eq!(
            DocumentKind::from_file_name("portfolio.md").unwrap(),
            DocumentKind::PlainText
        );
        assert_eq!(
            DocumentKind::from_file_name("notes.txt").unwrap(),
            DocumentKind::PlainText
        );
    }

    #[test]
    fn test_unsupported_extensions() {
        for name in ["resume.docx", "resume", "archive.tar.gz", ".pdf"] {
            assert!(
                matches!(
                    DocumentKind::from_file_name(name),
                    Err(CorpusError::UnsupportedFileType(_))
                ),
                "{name} should be rejected"
            );
        }
    }

    #[test]
    fn test_plain_text_passthrough() {
        let text = extract_text("resume.md", "# Jane\n- Kafka, Redis".as_bytes()).unwrap();
        assert_eq!(text, "# Jane\n- Kafka, Redis");
    }

    #[test]
    fn test_invalid_utf8_rejected() {
        let err = extract_text("resume.txt", &[0xff, 0xfe, 0x00]).unwrap_err();
        assert!(matches!(err, CorpusError::Encoding(_)));
    }

    #[test]
    fn test_garbage_pdf_is_an_error() {
        let err = extract_text("resume.pdf", b"definitely not a pdf").unwrap_err();
        assert!(matches!(err, CorpusError::Pdf(_)));
    }
}
