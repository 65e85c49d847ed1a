use std::io::Cursor;
use std::path::Path;
use std::str::FromStr;

use strum::{Display, EnumString};

/// Document formats accepted for resume uploads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, Display)]
#[strum(serialize_all = "lowercase")]
pub enum DocumentFormat {
    Pdf,
    Docx,
}

impl DocumentFormat {
    /// Determine the format from the uploaded filename extension.
    /// Any other extension (or none) means the upload is unsupported.
    pub fn from_filename(filename: &str) -> Option<Self> {
        let ext = Path::new(filename)
            .extension()
            .and_then(|e| e.to_str())?
            .to_lowercase();
        DocumentFormat::from_str(&ext).ok()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    #[error("Failed to parse PDF document: {0}")]
    Pdf(#[from] lopdf::Error),

    #[error("Failed to parse DOCX document: {0}")]
    Docx(String),

    #[error("No text content found in document")]
    Empty,
}

/// Extract plain text from a document, trimmed of surrounding whitespace.
///
/// A recognized format that parses but yields no text is an extraction
/// failure, not an empty success.
pub fn extract_text(format: DocumentFormat, data: &[u8]) -> Result<String, ExtractError> {
    let text = match format {
        DocumentFormat::Pdf => extract_pdf(data)?,
        DocumentFormat::Docx => extract_docx(data)?,
    };

    let text = text.trim().to_string();
    if text.is_empty() {
        return Err(ExtractError::Empty);
    }
    Ok(text)
}

fn extract_pdf(data: &[u8]) -> Result<String, ExtractError> {
    let doc = lopdf::Document::load_from(Cursor::new(data))?;

    let pages = doc.get_pages();
    let mut text = String::new();

    for page_num in pages.keys() {
        match doc.extract_text(&[*page_num]) {
            Ok(page_text) => {
                text.push_str(&page_text);
                text.push('\n');
            }
            Err(e) => {
                tracing::warn!(page = *page_num, error = %e, "Failed to extract text from PDF page");
            }
        }
    }

    Ok(text)
}

fn extract_docx(data: &[u8]) -> Result<String, ExtractError> {
    let docx = docx_rs::read_docx(data).map_err(|e| ExtractError::Docx(e.to_string()))?;

    let mut text = String::new();
    for child in docx.document.children {
        if let docx_rs::DocumentChild::Paragraph(p) = child {
            for p_child in p.children {
                if let docx_rs::ParagraphChild::Run(run) = p_child {
                    for run_child in run.children {
                        if let docx_rs::RunChild::Text(t) = run_child {
                            text.push_str(&t.text);
                        }
                    }
                }
            }
            text.push('\n');
        }
    }

    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pdf_extension_recognized() {
        assert_eq!(
            DocumentFormat::from_filename("resume.pdf"),
            Some(DocumentFormat::Pdf)
        );
        assert_eq!(
            DocumentFormat::from_filename("Resume.PDF"),
            Some(DocumentFormat::Pdf)
        );
    }

    #[test]
    fn test_docx_extension_recognized() {
        assert_eq!(
            DocumentFormat::from_filename("cv.docx"),
            Some(DocumentFormat::Docx)
        );
    }

    #[test]
    fn test_other_extensions_rejected() {
        assert_eq!(DocumentFormat::from_filename("notes.txt"), None);
        assert_eq!(DocumentFormat::from_filename("resume.doc"), None);
        assert_eq!(DocumentFormat::from_filename("archive.tar.gz"), None);
        assert_eq!(DocumentFormat::from_filename("no_extension"), None);
    }

    #[test]
    fn test_format_display_lowercase() {
        assert_eq!(DocumentFormat::Pdf.to_string(), "pdf");
        assert_eq!(DocumentFormat::Docx.to_string(), "docx");
    }

    #[test]
    fn test_corrupt_pdf_fails() {
        let result = extract_text(DocumentFormat::Pdf, b"not a pdf at all");
        assert!(matches!(result, Err(ExtractError::Pdf(_))));
    }

    #[test]
    fn test_corrupt_docx_fails() {
        let result = extract_text(DocumentFormat::Docx, b"not a zip archive");
        assert!(matches!(result, Err(ExtractError::Docx(_))));
    }
}
