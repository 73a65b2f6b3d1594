//! docucheck — automated grammar and compliance review for uploaded
//! PDF and Word documents.
//!
//! The upload boundary writes a file to disk; the processing façade
//! validates it, the extractor turns it into plain text (with an OCR
//! fallback for scanned PDFs), and a linear agent pipeline hands the text
//! through evaluator → reporter → optional rewriter against an external
//! chat-completion service.

pub mod agents;
pub mod config;
pub mod extraction;
pub mod processing;
pub mod upload;
