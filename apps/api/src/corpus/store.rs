//! Corpus store: the persisted chunk index that answers context lookups.
//!
//! One document is indexed at a time: ingesting a new upload replaces the
//! previous corpus. The index is written as JSON to a temp file in the target
//! directory and renamed into place, so a crash never leaves a torn file.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::{Mutex, RwLock};
use tracing::info;

use crate::corpus::chunker::{split_text, ChunkConfig};
use crate::corpus::loader::extract_text;
use crate::corpus::scoring::rank_chunks;
use crate::corpus::CorpusError;
use crate::interview::context::{ContextError, ContextLookup, ContextProvider};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorpusIndex {
    pub file_name: String,
    pub ingested_at: DateTime<Utc>,
    pub chunk_config: ChunkConfig,
    pub chunks: Vec<String>,
}

/// Public description of the indexed document.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorpusSummary {
    pub file_name: String,
    pub ingested_at: DateTime<Utc>,
    pub chunks: usize,
}

impl From<&CorpusIndex> for CorpusSummary {
    fn from(index: &CorpusIndex) -> Self {
        Self {
            file_name: index.file_name.clone(),
            ingested_at: index.ingested_at,
            chunks: index.chunks.len(),
        }
    }
}

pub struct CorpusStore {
    path: PathBuf,
    top_k: usize,
    chunk_config: ChunkConfig,
    index: RwLock<Option<CorpusIndex>>,
    /// Serializes ingests so the file on disk matches the in-memory index.
    ingest_lock: Mutex<()>,
}

impl CorpusStore {
    /// Opens the store, loading an existing index from `path` if there is one.
    pub async fn open(
        path: impl Into<PathBuf>,
        top_k: usize,
        chunk_config: ChunkConfig,
    ) -> Result<Self, CorpusError> {
        let path = path.into();
        let index = load_index(&path).await?;
        match &index {
            Some(index) => info!(
                "Loaded corpus '{}' ({} chunks) from {}",
                index.file_name,
                index.chunks.len(),
                path.display()
            ),
            None => info!("No corpus at {}; questions will use keywords only", path.display()),
        }

        Ok(Self {
            path,
            top_k,
            chunk_config,
            index: RwLock::new(index),
            ingest_lock: Mutex::new(()),
        })
    }

    pub async fn summary(&self) -> Option<CorpusSummary> {
        self.index.read().await.as_ref().map(CorpusSummary::from)
    }

    /// Extracts, chunks and persists an uploaded document, replacing the corpus.
    pub async fn ingest(
        &self,
        file_name: String,
        bytes: Bytes,
    ) -> Result<CorpusSummary, CorpusError> {
        let _guard = self.ingest_lock.lock().await;

        let path = self.path.clone();
        let chunk_config = self.chunk_config;
        let index = tokio::task::spawn_blocking(move || -> Result<CorpusIndex, CorpusError> {
            let text = extract_text(&file_name, &bytes)?;
            let chunks = split_text(&text, &chunk_config);
            if chunks.is_empty() {
                return Err(CorpusError::EmptyDocument);
            }
            let index = CorpusIndex {
                file_name,
                ingested_at: Utc::now(),
                chunk_config,
                chunks,
            };
            persist_index(&path, &index)?;
            Ok(index)
        })
        .await
        .map_err(|e| CorpusError::Task(e.to_string()))??;

        let summary = CorpusSummary::from(&index);
        info!(
            "Ingested '{}' into {} chunks",
            summary.file_name, summary.chunks
        );
        *self.index.write().await = Some(index);
        Ok(summary)
    }
}

#[async_trait]
impl ContextProvider for CorpusStore {
    async fn query(&self, keywords: &[String]) -> Result<ContextLookup, ContextError> {
        let index = self.index.read().await;
        let Some(index) = index.as_ref() else {
            return Ok(ContextLookup::NoCorpus);
        };
        let snippets = rank_chunks(&index.chunks, keywords, self.top_k)
            .into_iter()
            .map(String::from)
            .collect();
        Ok(ContextLookup::Snippets(snippets))
    }
}

async fn load_index(path: &Path) -> Result<Option<CorpusIndex>, CorpusError> {
    let raw = match tokio::fs::read(path).await {
        Ok(raw) => raw,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };
    let index: CorpusIndex = serde_json::from_slice(&raw)?;
    Ok(Some(index).filter(|i| !i.chunks.is_empty()))
}

fn persist_index(path: &Path, index: &CorpusIndex) -> Result<(), CorpusError> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir)?;

    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    serde_json::to_writer_pretty(&mut tmp, index)?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const RESUME: &str = "Jane Doe. Backend engineer. \
        Built an order service in Java 17 on MySQL 8 with read replicas. \
        Ran Kafka consumers for billing events. \
        Wrote Terraform for AWS networking.";

    fn small_chunks() -> ChunkConfig {
        ChunkConfig {
            chunk_size: 60,
            chunk_overlap: 0,
        }
    }

    fn keywords(words: &[&str]) -> Vec<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    #[tokio::test]
    async fn test_missing_index_means_no_corpus() {
        let dir = tempfile::tempdir().unwrap();
        let store = CorpusStore::open(dir.path().join("index.json"), 3, small_chunks())
            .await
            .unwrap();

        assert!(store.summary().await.is_none());
        assert_eq!(
            store.query(&keywords(&["Java"])).await.unwrap(),
            ContextLookup::NoCorpus
        );
    }

    #[tokio::test]
    async fn test_ingest_then_query() {
        let dir = tempfile::tempdir().unwrap();
        let store = CorpusStore::open(dir.path().join("index.json"), 2, small_chunks())
            .await
            .unwrap();

        let summary = store
            .ingest("resume.txt".to_string(), Bytes::from(RESUME))
            .await
            .unwrap();
        assert_eq!(summary.file_name, "resume.txt");
        assert!(summary.chunks > 2);

        match store.query(&keywords(&["MySQL", "Java"])).await.unwrap() {
            ContextLookup::Snippets(snippets) => {
                assert_eq!(snippets.len(), 2);
                assert!(snippets[0].contains("MySQL") || snippets[0].contains("Java"));
            }
            ContextLookup::NoCorpus => panic!("expected snippets"),
        }
    }

    #[tokio::test]
    async fn test_index_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("index.json");

        let store = CorpusStore::open(&path, 3, small_chunks()).await.unwrap();
        let ingested = store
            .ingest("resume.md".to_string(), Bytes::from(RESUME))
            .await
            .unwrap();
        drop(store);

        let reopened = CorpusStore::open(&path, 3, small_chunks()).await.unwrap();
        assert_eq!(reopened.summary().await, Some(ingested));
    }

    #[tokio::test]
    async fn test_new_upload_replaces_corpus() {
        let dir = tempfile::tempdir().unwrap();
        let store = CorpusStore::open(dir.path().join("index.json"), 3, small_chunks())
            .await
            .unwrap();

        store
            .ingest("old.txt".to_string(), Bytes::from(RESUME))
            .await
            .unwrap();
        store
            .ingest("new.txt".to_string(), Bytes::from("Go microservices with gRPC."))
            .await
            .unwrap();

        assert_eq!(store.summary().await.unwrap().file_name, "new.txt");
        assert_eq!(
            store.query(&keywords(&["Java"])).await.unwrap(),
            ContextLookup::Snippets(vec!["Go microservices with gRPC.".to_string()])
        );
    }

    #[tokio::test]
    async fn test_rejected_upload_keeps_previous_corpus() {
        let dir = tempfile::tempdir().unwrap();
        let store = CorpusStore::open(dir.path().join("index.json"), 3, small_chunks())
            .await
            .unwrap();
        store
            .ingest("resume.txt".to_string(), Bytes::from(RESUME))
            .await
            .unwrap();

        let unsupported = store
            .ingest("resume.docx".to_string(), Bytes::from_static(b"PK"))
            .await
            .unwrap_err();
        assert!(matches!(unsupported, CorpusError::UnsupportedFileType(_)));

        let empty = store
            .ingest("blank.txt".to_string(), Bytes::from_static(b"   \n"))
            .await
            .unwrap_err();
        assert!(matches!(empty, CorpusError::EmptyDocument));

        assert_eq!(store.summary().await.unwrap().file_name, "resume.txt");
    }

    #[tokio::test]
    async fn test_corrupt_index_fails_open() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("index.json");
        std::fs::write(&path, b"{ not json").unwrap();

        let result = CorpusStore::open(&path, 3, small_chunks()).await;
        assert!(matches!(result, Err(CorpusError::Index(_))));
    }
}
