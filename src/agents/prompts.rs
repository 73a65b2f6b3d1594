//! Fixed system instructions and stage query templates.
//!
//! These are the whole of each role's behavior: every stage is a pure
//! `(instruction, input) -> output` call over the completion service.

pub const EXTRACTOR_SYSTEM: &str = "Extract and format text from uploaded documents.";

pub const EVALUATOR_SYSTEM: &str =
    "Review document compliance with grammatical and professional standards.";

pub const REPORTER_SYSTEM: &str =
    "Generate a structured compliance report highlighting areas for improvement.";

pub const REWRITER_SYSTEM: &str =
    "Revise documents to meet compliance standards while maintaining clarity.";

/// Stage 1: ask the evaluator to flag grammar and structural issues in the
/// full document text.
pub fn build_compliance_query(document_text: &str) -> String {
    format!(
        r#"Evaluate the following document for compliance:
- Identify grammar and structural issues.
- Provide an explanation for each issue.
- Format response as:
  **Sentence:** "<original sentence>"
  - **Issue:** <description>
---
Document Content:
{document_text}"#
    )
}

/// Stage 2: turn the evaluator's raw findings into a structured report.
pub fn build_report_query(compliance_findings: &str) -> String {
    format!(
        r#"Create a structured compliance report with:
1. Summary of key issues.
2. Detailed line-by-line analysis.
3. Suggested improvements.
4. Compliance rating (1-10 scale).
Compliance Details:
{compliance_findings}"#
    )
}

/// Stage 3 (optional): rewrite the original document text, not the report.
pub fn build_rewrite_query(document_text: &str) -> String {
    format!(
        "Rewrite the following document while addressing all compliance concerns:\n{document_text}"
    )
}
