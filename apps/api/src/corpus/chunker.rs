//! Chunker: splits document text into overlapping windows on word boundaries.
//!
//! Sizes are measured in characters. A chunk never exceeds `chunk_size` unless
//! a single word is longer than that, in which case the word stands alone.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkConfig {
    pub chunk_size: usize,
    pub chunk_overlap: usize,
}

impl Default for ChunkConfig {
    fn default() -> Self {
        Self {
            chunk_size: 500,
            chunk_overlap: 50,
        }
    }
}

/// Splits `text` into chunks, each starting with up to `chunk_overlap`
/// characters carried over from the end of the previous one.
pub fn split_text(text: &str, config: &ChunkConfig) -> Vec<String> {
    let words: Vec<&str> = text.split_whitespace().collect();
    let mut chunks = Vec::new();
    let mut start = 0;

    while start < words.len() {
        let mut end = start;
        let mut len = 0;
        while end < words.len() {
            let separator = usize::from(end > start);
            let added = words[end].chars().count() + separator;
            if end > start && len + added > config.chunk_size {
                break;
            }
            len += added;
            end += 1;
        }

        chunks.push(words[start..end].join(" "));
        if end == words.len() {
            break;
        }

        // Walk back from `end` to carry the overlap, always moving forward overall.
        let mut next = end;
        let mut overlap = 0;
        while next > start + 1 {
            let carried = words[next - 1].chars().count() + 1;
            if overlap + carried > config.chunk_overlap {
                break;
            }
            overlap += carried;
            next -= 1;
        }
        start = next;
    }

    chunks
}
