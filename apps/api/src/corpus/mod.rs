// Resume corpus: the concrete Context Provider behind the Ask phase.
// Implements: document loading (pdf/txt/md), chunking, persisted index,
// keyword lookup. Text extraction is CPU-bound and runs in spawn_blocking.

pub mod chunker;
pub mod handlers;
pub mod loader;
pub mod scoring;
pub mod store;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CorpusError {
    #[error("unsupported file type '{0}' (expected .pdf, .txt or .md)")]
    UnsupportedFileType(String),

    #[error("could not extract text from PDF: {0}")]
    Pdf(String),

    #[error("document is not valid UTF-8 text")]
    Encoding(#[from] std::string::FromUtf8Error),

    #[error("document contains no text")]
    EmptyDocument,

    #[error("corpus I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("corpus index is invalid: {0}")]
    Index(#[from] serde_json::Error),

    #[error("ingest task failed: {0}")]
    Task(String),
}
