//! Extraction orchestrator: format dispatch plus the scanned-PDF OCR
//! fallback.

use std::path::Path;

use super::docx::extract_docx_text;
use super::pdf::{extract_pdf_pages, join_pages};
use super::types::{DocumentFormat, OcrEngine, PdfPageRenderer};
use super::ExtractionError;

/// Concrete text extractor.
/// Uses trait objects for OCR and page rendering, enabling dependency
/// injection in tests.
pub struct DocumentExtractor {
    ocr_engine: Box<dyn OcrEngine + Send + Sync>,
    pdf_renderer: Box<dyn PdfPageRenderer + Send + Sync>,
}

impl DocumentExtractor {
    pub fn new(
        ocr_engine: Box<dyn OcrEngine + Send + Sync>,
        pdf_renderer: Box<dyn PdfPageRenderer + Send + Sync>,
    ) -> Self {
        Self {
            ocr_engine,
            pdf_renderer,
        }
    }

    /// Extract plain text from a document on disk.
    ///
    /// The format comes from the filename suffix alone; unsupported
    /// suffixes fail before the file is read.
    pub fn extract(&self, path: &Path) -> Result<String, ExtractionError> {
        let name = path.file_name().and_then(|n| n.to_str()).unwrap_or_default();
        let format = DocumentFormat::from_filename(name)
            .ok_or_else(|| ExtractionError::UnsupportedFormat(name.to_string()))?;

        let bytes = std::fs::read(path)?;
        match format {
            DocumentFormat::Pdf => self.extract_pdf(&bytes),
            DocumentFormat::Docx => extract_docx_text(&bytes),
        }
    }

    /// PDF text layer first; if the whole document comes back blank the
    /// file is a scan, so OCR every page.
    pub fn extract_pdf(&self, pdf_bytes: &[u8]) -> Result<String, ExtractionError> {
        let pages = extract_pdf_pages(pdf_bytes)?;
        let text = join_pages(&pages);

        if !text.trim().is_empty() {
            tracing::debug!(pages = pages.len(), chars = text.len(), "PDF text layer extracted");
            return Ok(text);
        }

        tracing::info!(pages = pages.len(), "PDF has no text layer, falling back to OCR");
        self.ocr_pdf(pdf_bytes)
    }

    /// Per-page OCR. Empty recognition output is valid empty text, never
    /// an error; pages without a pullable image are skipped.
    fn ocr_pdf(&self, pdf_bytes: &[u8]) -> Result<String, ExtractionError> {
        let page_count = self.pdf_renderer.page_count(pdf_bytes)?;
        let mut recognized = Vec::new();

        for page in 0..page_count {
            let png = match self.pdf_renderer.render_page(pdf_bytes, page) {
                Ok(png) => png,
                Err(e) => {
                    tracing::debug!(page, error = %e, "no page image, skipping");
                    continue;
                }
            };

            let result = self.ocr_engine.ocr_image(&png)?;
            let text = result.text.trim_end();
            tracing::debug!(
                page,
                confidence = result.confidence,
                chars = text.len(),
                "OCR page complete"
            );
            if !text.is_empty() {
                recognized.push(text.to_string());
            }
        }

        Ok(recognized.join("\n"))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::extraction::fixtures;
    use crate::extraction::ocr::MockOcrEngine;
    use crate::extraction::pdf_renderer::PageImageExtractor;
    use crate::extraction::types::OcrPageResult;

    /// Renderer that reports a fixed page count and records which pages
    /// were rendered.
    struct CountingRenderer {
        pages: usize,
        rendered: Mutex<Vec<usize>>,
    }

    impl CountingRenderer {
        fn new(pages: usize) -> Self {
            Self {
                pages,
                rendered: Mutex::new(Vec::new()),
            }
        }
    }

    impl PdfPageRenderer for CountingRenderer {
        fn render_page(
            &self,
            _pdf_bytes: &[u8],
            page_number: usize,
        ) -> Result<Vec<u8>, ExtractionError> {
            self.rendered.lock().unwrap().push(page_number);
            Ok(vec![0u8; 8])
        }

        fn page_count(&self, _pdf_bytes: &[u8]) -> Result<usize, ExtractionError> {
            Ok(self.pages)
        }
    }

    /// OCR engine that always finds nothing.
    struct BlankOcr;

    impl OcrEngine for BlankOcr {
        fn ocr_image(&self, _image_bytes: &[u8]) -> Result<OcrPageResult, ExtractionError> {
            Ok(OcrPageResult {
                text: String::new(),
                confidence: 0.0,
            })
        }
    }

    fn extractor_with(
        ocr: Box<dyn OcrEngine + Send + Sync>,
        renderer: Box<dyn PdfPageRenderer + Send + Sync>,
    ) -> DocumentExtractor {
        DocumentExtractor::new(ocr, renderer)
    }

    #[test]
    fn digital_pdf_skips_ocr() {
        let pdf = fixtures::text_pdf("A digital document with embedded text.");
        let renderer = Box::new(CountingRenderer::new(1));
        let extractor = DocumentExtractor::new(
            Box::new(MockOcrEngine::new("SHOULD NOT APPEAR", 0.9)),
            renderer,
        );

        let text = extractor.extract_pdf(&pdf).unwrap();
        assert!(text.contains("digital") || text.contains("embedded"));
        assert!(!text.contains("SHOULD NOT APPEAR"));
    }

    #[test]
    fn scanned_pdf_falls_back_to_ocr() {
        let pdf = fixtures::scanned_pdf(200, 300);
        let extractor = extractor_with(
            Box::new(MockOcrEngine::new("Recognized scan text", 0.8)),
            Box::new(PageImageExtractor),
        );

        let text = extractor.extract_pdf(&pdf).unwrap();
        assert_eq!(text, "Recognized scan text");
    }

    #[test]
    fn ocr_runs_once_per_page() {
        let pdf = fixtures::scanned_pdf(100, 100);
        let renderer = CountingRenderer::new(3);
        let extractor = DocumentExtractor::new(
            Box::new(MockOcrEngine::new("page text", 0.8)),
            Box::new(renderer),
        );

        let text = extractor.extract_pdf(&pdf).unwrap();
        assert_eq!(text, "page text\npage text\npage text");
    }

    #[test]
    fn empty_ocr_output_is_empty_text_not_an_error() {
        let pdf = fixtures::scanned_pdf(100, 100);
        let extractor = extractor_with(Box::new(BlankOcr), Box::new(PageImageExtractor));

        let text = extractor.extract_pdf(&pdf).unwrap();
        assert_eq!(text, "");
    }

    #[test]
    fn unsupported_extension_fails_before_reading() {
        let extractor = extractor_with(
            Box::new(MockOcrEngine::new("", 0.0)),
            Box::new(CountingRenderer::new(0)),
        );
        // The path does not exist; an UnsupportedFormat error proves the
        // suffix check ran first.
        let result = extractor.extract(Path::new("/nonexistent/notes.txt"));
        assert!(matches!(result, Err(ExtractionError::UnsupportedFormat(_))));
    }

    #[test]
    fn docx_file_extracts_paragraphs() {
        use docx_rs::{Docx, Paragraph, Run};

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sample.docx");
        let file = std::fs::File::create(&path).unwrap();
        Docx::new()
            .add_paragraph(Paragraph::new().add_run(Run::new().add_text("Their going to the store.")))
            .build()
            .pack(file)
            .unwrap();

        let extractor = extractor_with(
            Box::new(MockOcrEngine::new("", 0.0)),
            Box::new(CountingRenderer::new(0)),
        );
        let text = extractor.extract(&path).unwrap();
        assert_eq!(text, "Their going to the store.");
    }
}
