//! Word (.docx) paragraph extraction via docx-rs.

use docx_rs::{DocumentChild, ParagraphChild, RunChild};

use super::ExtractionError;

/// Read the document body in order, one line per paragraph.
///
/// Empty paragraphs still produce a line, so paragraph structure survives
/// into the plain text the agents see.
pub fn extract_docx_text(docx_bytes: &[u8]) -> Result<String, ExtractionError> {
    let docx =
        docx_rs::read_docx(docx_bytes).map_err(|e| ExtractionError::DocxParsing(format!("{e:?}")))?;

    let lines: Vec<String> = docx
        .document
        .children
        .iter()
        .filter_map(|child| match child {
            DocumentChild::Paragraph(para) => Some(paragraph_text(&para.children)),
            _ => None,
        })
        .collect();

    Ok(lines.join("\n"))
}

fn paragraph_text(children: &[ParagraphChild]) -> String {
    let mut text = String::new();
    for child in children {
        match child {
            ParagraphChild::Run(run) => {
                for run_child in &run.children {
                    match run_child {
                        RunChild::Text(t) => text.push_str(&t.text),
                        RunChild::Tab(_) => text.push('\t'),
                        _ => {}
                    }
                }
            }
            // Hyperlinks wrap their own runs; recurse so link text is kept.
            ParagraphChild::Hyperlink(link) => text.push_str(&paragraph_text(&link.children)),
            _ => {}
        }
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use docx_rs::{Docx, Paragraph, Run};

    fn build_docx(paragraphs: &[&str]) -> Vec<u8> {
        let mut docx = Docx::new();
        for para in paragraphs {
            docx = docx.add_paragraph(Paragraph::new().add_run(Run::new().add_text(*para)));
        }
        let mut buf = std::io::Cursor::new(Vec::new());
        docx.build().pack(&mut buf).unwrap();
        buf.into_inner()
    }

    #[test]
    fn paragraphs_in_document_order() {
        let bytes = build_docx(&["Their going to the store.", "A second paragraph."]);
        let text = extract_docx_text(&bytes).unwrap();
        assert_eq!(text, "Their going to the store.\nA second paragraph.");
    }

    #[test]
    fn empty_paragraph_keeps_its_line() {
        let bytes = build_docx(&["First", "", "Last"]);
        let text = extract_docx_text(&bytes).unwrap();
        assert_eq!(text, "First\n\nLast");
    }

    #[test]
    fn multiple_runs_concatenate_within_a_paragraph() {
        let docx = Docx::new().add_paragraph(
            Paragraph::new()
                .add_run(Run::new().add_text("Hello, "))
                .add_run(Run::new().add_text("world.")),
        );
        let mut buf = std::io::Cursor::new(Vec::new());
        docx.build().pack(&mut buf).unwrap();

        let text = extract_docx_text(buf.get_ref()).unwrap();
        assert_eq!(text, "Hello, world.");
    }

    #[test]
    fn invalid_bytes_are_a_parsing_error() {
        let result = extract_docx_text(b"definitely not a zip archive");
        assert!(matches!(result, Err(ExtractionError::DocxParsing(_))));
    }
}
