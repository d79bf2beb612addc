//! Plain-text extraction from uploaded resumes and job descriptions.
//!
//! Extraction never fails outward: unsupported formats, missing files and
//! parser errors all degrade to an empty string, logged at `warn`.

use std::path::Path;

use async_trait::async_trait;
use tracing::warn;

const DOCX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

/// Document formats the service accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Pdf,
    Docx,
}

impl DocumentKind {
    /// Classifies a file by its extension, case-insensitively.
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "pdf" => Some(DocumentKind::Pdf),
            "docx" => Some(DocumentKind::Docx),
            _ => None,
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            DocumentKind::Pdf => "pdf",
            DocumentKind::Docx => "docx",
        }
    }

    pub fn content_type(self) -> &'static str {
        match self {
            DocumentKind::Pdf => "application/pdf",
            DocumentKind::Docx => DOCX_CONTENT_TYPE,
        }
    }
}

/// Turns a stored document into plain text.
#[async_trait]
pub trait DocumentExtractor: Send + Sync {
    async fn extract(&self, path: &Path) -> String;
}

/// Reads PDF (pdf-extract) and DOCX (docx-rs) files from disk.
pub struct FileExtractor;

#[async_trait]
impl DocumentExtractor for FileExtractor {
    async fn extract(&self, path: &Path) -> String {
        let Some(kind) = DocumentKind::from_path(path) else {
            warn!("Unsupported document format: {}", path.display());
            return String::new();
        };

        let bytes = match tokio::fs::read(path).await {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!("Error reading {}: {e}", path.display());
                return String::new();
            }
        };

        // Both parsers are CPU-bound; keep them off the async workers.
        let parsed = tokio::task::spawn_blocking(move || extract_from_bytes(kind, &bytes)).await;

        match parsed {
            Ok(Ok(text)) => text,
            Ok(Err(e)) => {
                warn!("Error parsing {}: {e}", path.display());
                String::new()
            }
            Err(e) => {
                warn!("Extraction task for {} aborted: {e}", path.display());
                String::new()
            }
        }
    }
}

fn extract_from_bytes(kind: DocumentKind, bytes: &[u8]) -> Result<String, String> {
    match kind {
        DocumentKind::Pdf => pdf_extract::extract_text_from_mem(bytes).map_err(|e| e.to_string()),
        DocumentKind::Docx => extract_docx(bytes),
    }
}

fn extract_docx(bytes: &[u8]) -> Result<String, String> {
    let docx = docx_rs::read_docx(bytes).map_err(|e| e.to_string())?;

    let mut text = String::new();
    for child in docx.document.children {
        if let docx_rs::DocumentChild::Paragraph(paragraph) = child {
            for paragraph_child in paragraph.children {
                if let docx_rs::ParagraphChild::Run(run) = paragraph_child {
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
