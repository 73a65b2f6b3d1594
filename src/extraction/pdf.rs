//! PDF text-layer extraction via pdf-extract.

use super::ExtractionError;

/// Extract the text layer of a PDF, one string per page.
pub fn extract_pdf_pages(pdf_bytes: &[u8]) -> Result<Vec<String>, ExtractionError> {
    pdf_extract::extract_text_from_mem_by_pages(pdf_bytes)
        .map_err(|e| ExtractionError::PdfParsing(e.to_string()))
}

/// Concatenate page texts with newline separators, skipping pages that
/// yielded nothing.
pub fn join_pages(pages: &[String]) -> String {
    pages
        .iter()
        .filter(|page| !page.trim().is_empty())
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extraction::fixtures;

    #[test]
    fn extracts_text_layer() {
        let pdf = fixtures::text_pdf("Their going to the store.");
        let pages = extract_pdf_pages(&pdf).unwrap();
        assert!(!pages.is_empty());

        let text = join_pages(&pages);
        assert!(
            text.contains("Their") || text.contains("store"),
            "expected fixture text, got: {text}"
        );
    }

    #[test]
    fn scanned_pdf_has_empty_text_layer() {
        let pdf = fixtures::scanned_pdf(200, 300);
        let pages = extract_pdf_pages(&pdf).unwrap();
        assert!(join_pages(&pages).trim().is_empty());
    }

    #[test]
    fn invalid_pdf_is_a_parsing_error() {
        let result = extract_pdf_pages(b"not a pdf");
        assert!(matches!(result, Err(ExtractionError::PdfParsing(_))));
    }

    #[test]
    fn join_skips_blank_pages() {
        let pages = vec![
            "First page".to_string(),
            "   \n".to_string(),
            "Third page".to_string(),
        ];
        assert_eq!(join_pages(&pages), "First page\nThird page");
    }
}
