//! File-type dispatch: flat text for every format, a tree where one exists.

use serde::Serialize;
use thiserror::Error;
use tracing::info;

use clausegraft_core::ClauseNode;
use clausegraft_docx::{DocxDocument, DocxError};

use crate::builder::{ParagraphInput, Parsed, build_tree};
use crate::config::ParserConfig;

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("unsupported file type: {0} (supported: .docx, .pdf, .txt)")]
    UnsupportedFormat(String),

    #[error("error parsing docx: {0}")]
    Docx(#[from] DocxError),

    #[error("error parsing pdf: {0}")]
    Pdf(String),

    #[error("pdf support not enabled in this build")]
    PdfDisabled,
}

/// Extraction result. `tree` is `None` for formats without paragraph
/// structure; that is a normal outcome, not a failure.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Extracted {
    pub text: String,
    pub tree: Option<ClauseNode>,
}

impl From<Parsed> for Extracted {
    fn from(parsed: Parsed) -> Self {
        Self {
            text: parsed.full_text,
            tree: Some(parsed.tree),
        }
    }
}

/// Extract text, and structure when available, choosing by file extension.
pub fn extract(file_name: &str, bytes: &[u8], config: &ParserConfig) -> Result<Extracted, ExtractError> {
    let lower = file_name.to_lowercase();
    let extracted = if lower.ends_with(".docx") {
        Extracted::from(parse_docx(bytes, config)?)
    } else if lower.ends_with(".pdf") {
        Extracted {
            text: pdf_text(bytes)?,
            tree: None,
        }
    } else if lower.ends_with(".txt") {
        Extracted {
            text: plain_text(bytes),
            tree: None,
        }
    } else {
        return Err(ExtractError::UnsupportedFormat(file_name.to_string()));
    };
    info!(
        file = file_name,
        chars = extracted.text.len(),
        structured = extracted.tree.is_some(),
        "extracted document"
    );
    Ok(extracted)
}

/// Load a document package and build its clause tree.
pub fn parse_docx(bytes: &[u8], config: &ParserConfig) -> Result<Parsed, DocxError> {
    let doc = DocxDocument::load(bytes)?;
    let inputs = doc.paragraphs().map(|(key, paragraph)| ParagraphInput {
        stable_id: paragraph.stable_id(),
        text: paragraph.text(),
        style_name: doc.style_name(key),
    });
    Ok(build_tree(inputs, config))
}

/// UTF-8, falling back to Latin-1 (every byte maps to one char).
fn plain_text(bytes: &[u8]) -> String {
    match std::str::from_utf8(bytes) {
        Ok(text) => text.to_string(),
        Err(_) => bytes.iter().map(|&b| char::from(b)).collect(),
    }
}

#[cfg(feature = "pdf")]
fn pdf_text(bytes: &[u8]) -> Result<String, ExtractError> {
    let text = pdf_extract::extract_text_from_mem(bytes).map_err(|e| ExtractError::Pdf(e.to_string()))?;
    Ok(text.trim().to_string())
}

#[cfg(not(feature = "pdf"))]
fn pdf_text(_bytes: &[u8]) -> Result<String, ExtractError> {
    Err(ExtractError::PdfDisabled)
}
