use super::ExtractionError;

/// Supported input formats, inferred from the filename suffix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Pdf,
    Docx,
}

impl DocumentFormat {
    /// Suffix match is deliberately case-sensitive: the upload contract
    /// accepts exactly `.pdf` and `.docx`.
    pub fn from_filename(name: &str) -> Option<Self> {
        if name.ends_with(".pdf") {
            Some(Self::Pdf)
        } else if name.ends_with(".docx") {
            Some(Self::Docx)
        } else {
            None
        }
    }
}

/// Raw OCR output for one page image.
#[derive(Debug)]
pub struct OcrPageResult {
    pub text: String,
    /// Engine-reported mean confidence, 0.0–1.0.
    pub confidence: f32,
}

/// OCR engine abstraction (allows mocking for tests).
pub trait OcrEngine {
    fn ocr_image(&self, image_bytes: &[u8]) -> Result<OcrPageResult, ExtractionError>;
}

/// Turns one PDF page into a PNG the OCR engine can consume.
pub trait PdfPageRenderer {
    fn render_page(&self, pdf_bytes: &[u8], page_number: usize)
        -> Result<Vec<u8>, ExtractionError>;

    fn page_count(&self, pdf_bytes: &[u8]) -> Result<usize, ExtractionError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pdf_and_docx_suffixes_recognized() {
        assert_eq!(
            DocumentFormat::from_filename("report.pdf"),
            Some(DocumentFormat::Pdf)
        );
        assert_eq!(
            DocumentFormat::from_filename("letter.docx"),
            Some(DocumentFormat::Docx)
        );
    }

    #[test]
    fn other_suffixes_rejected() {
        assert_eq!(DocumentFormat::from_filename("notes.txt"), None);
        assert_eq!(DocumentFormat::from_filename("archive.doc"), None);
        assert_eq!(DocumentFormat::from_filename("report"), None);
    }

    #[test]
    fn suffix_match_is_case_sensitive() {
        assert_eq!(DocumentFormat::from_filename("REPORT.PDF"), None);
        assert_eq!(DocumentFormat::from_filename("letter.Docx"), None);
    }
}
