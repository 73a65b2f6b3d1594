//! File processing façade: validate the requested file, extract its text,
//! drive the agent pipeline, and key the result by filename.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::agents::client::{CompletionError, HttpChatClient};
use crate::agents::{AgentRoster, ChatClient, CompliancePipeline, PipelineError};
use crate::config::{CompletionConfig, ConfigError};
use crate::extraction::{DocumentExtractor, DocumentFormat, ExtractionError, OcrEngine, PageImageExtractor};

#[derive(Error, Debug)]
pub enum ProcessError {
    #[error("file '{filename}' not found in '{}'", directory.display())]
    NotFound {
        filename: String,
        directory: PathBuf,
    },

    #[error("invalid file type: '{0}' (only .pdf and .docx are accepted)")]
    InvalidType(String),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Completion(#[from] CompletionError),

    #[error(transparent)]
    Extraction(#[from] ExtractionError),

    #[error(transparent)]
    Pipeline(#[from] PipelineError),
}

/// One processing pass: a fresh roster plus an extractor. Nothing here is
/// shared between calls, so separate processors may run concurrently.
pub struct DocumentProcessor<C: ChatClient> {
    roster: AgentRoster<C>,
    extractor: DocumentExtractor,
}

impl DocumentProcessor<HttpChatClient> {
    /// Build a processor from process-wide configuration.
    pub fn from_env() -> Result<Self, ProcessError> {
        let config = CompletionConfig::from_env()?;
        let roster = AgentRoster::initialize(&config)?;
        Ok(Self::new(roster, default_extractor()?))
    }
}

impl<C: ChatClient> DocumentProcessor<C> {
    pub fn new(roster: AgentRoster<C>, extractor: DocumentExtractor) -> Self {
        Self { roster, extractor }
    }

    /// Process one document and return a one-entry map keyed by its
    /// filename. The map shape keeps the contract open for future
    /// multi-file batching.
    pub fn process(
        &self,
        filename: &str,
        directory: &Path,
        rewrite_requested: bool,
    ) -> Result<BTreeMap<String, String>, ProcessError> {
        let full_path = directory.join(filename);
        if !full_path.exists() {
            return Err(ProcessError::NotFound {
                filename: filename.to_string(),
                directory: directory.to_path_buf(),
            });
        }

        if DocumentFormat::from_filename(filename).is_none() {
            return Err(ProcessError::InvalidType(filename.to_string()));
        }

        tracing::info!(filename, rewrite = rewrite_requested, "processing document");

        let text = self.extractor.extract(&full_path)?;
        if text.trim().is_empty() {
            tracing::warn!(filename, "extraction yielded no text, stages run on empty input");
        }

        let result = CompliancePipeline::new(&self.roster).run(&text, rewrite_requested)?;

        let mut results = BTreeMap::new();
        results.insert(filename.to_string(), result);
        Ok(results)
    }
}

/// Extractor wired with the production renderer and OCR engine.
fn default_extractor() -> Result<DocumentExtractor, ProcessError> {
    #[cfg(feature = "ocr")]
    let ocr: Box<dyn OcrEngine + Send + Sync> = Box::new(
        crate::extraction::ocr::TesseractOcr::new(&crate::config::tessdata_dir())?,
    );
    #[cfg(not(feature = "ocr"))]
    let ocr: Box<dyn OcrEngine + Send + Sync> = Box::new(crate::extraction::ocr::DisabledOcr);

    Ok(DocumentExtractor::new(ocr, Box::new(PageImageExtractor)))
}
