//! Document text extraction: PDF text layer, Word paragraphs, and the
//! OCR fallback for scanned PDFs.

pub mod docx;
pub mod ocr;
pub mod orchestrator;
pub mod pdf;
pub mod pdf_renderer;
pub mod types;

pub use orchestrator::DocumentExtractor;
pub use pdf_renderer::PageImageExtractor;
pub use types::*;

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExtractionError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("unsupported file format: {0}")]
    UnsupportedFormat(String),

    #[error("PDF parsing failed: {0}")]
    PdfParsing(String),

    #[error("Word document parsing failed: {0}")]
    DocxParsing(String),

    #[error("image processing error: {0}")]
    ImageProcessing(String),

    #[error("Tesseract OCR initialization failed: {0}")]
    OcrInit(String),

    #[error("OCR processing failed: {0}")]
    OcrProcessing(String),

    #[error("tessdata not found at: {0}")]
    TessdataNotFound(PathBuf),
}
