//! Paragraph-boundary-aware chunking.
//!
//! Documents are split on blank lines; paragraphs are packed into chunks
//! up to `chunk_size` characters, and oversized paragraphs are split on
//! word boundaries with `chunk_overlap` characters of overlap between
//! consecutive pieces. Chunk ids hash document id, position, and content,
//! so identical ingests produce identical ids.

use std::hash::Hasher;
use tracing::debug;
use twox_hash::XxHash64;

use crate::error::{Error, Result};
use crate::types::{Chunk, ChunkId, Document};

pub struct Chunker {
    chunk_size: usize,
    chunk_overlap: usize,
}

impl Chunker {
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Result<Self> {
        if chunk_size == 0 {
            return Err(Error::InvalidConfig("chunk_size must be positive".into()));
        }
        if chunk_overlap >= chunk_size {
            return Err(Error::InvalidConfig(format!(
                "chunk_overlap ({chunk_overlap}) must be smaller than chunk_size ({chunk_size})"
            )));
        }
        Ok(Self {
            chunk_size,
            chunk_overlap,
        })
    }

    /// Chunk each document independently, preserving its metadata on
    /// every chunk.
    pub fn chunk_documents(&self, documents: &[Document]) -> Vec<Chunk> {
        let mut chunks = Vec::new();
        for doc in documents {
            chunks.extend(self.chunk_document(doc));
        }
        debug!(
            documents = documents.len(),
            chunks = chunks.len(),
            "chunked documents"
        );
        chunks
    }

    fn chunk_document(&self, doc: &Document) -> Vec<Chunk> {
        let pieces = self.split_text(&doc.text);
        let total = pieces.len();
        pieces
            .into_iter()
            .enumerate()
            .map(|(i, text)| Chunk {
                id: chunk_id(&doc.doc_id, i, &text),
                doc_id: doc.doc_id.clone(),
                text,
                chunk_index: i,
                total_chunks: total,
                meta: doc.meta.clone(),
            })
            .collect()
    }

    fn split_text(&self, text: &str) -> Vec<String> {
        let mut pieces: Vec<String> = Vec::new();
        let mut buf = String::new();
        for para in text.split("\n\n") {
            let para = para.trim();
            if para.is_empty() {
                continue;
            }
            if para.len() > self.chunk_size {
                if !buf.is_empty() {
                    pieces.push(std::mem::take(&mut buf));
                }
                pieces.extend(self.split_paragraph(para));
                continue;
            }
            if !buf.is_empty() && buf.len() + 2 + para.len() > self.chunk_size {
                pieces.push(std::mem::take(&mut buf));
            }
            if !buf.is_empty() {
                buf.push_str("\n\n");
            }
            buf.push_str(para);
        }
        if !buf.is_empty() {
            pieces.push(buf);
        }
        pieces
    }

    /// Split one oversized paragraph into word-boundary windows of at
    /// most `chunk_size` characters, stepping back `chunk_overlap`
    /// characters worth of words between windows.
    fn split_paragraph(&self, paragraph: &str) -> Vec<String> {
        let words: Vec<&str> = paragraph.split_whitespace().collect();
        let mut out = Vec::new();
        let mut start = 0;
        while start < words.len() {
            let mut end = start;
            let mut len = 0;
            while end < words.len() && len + words[end].len() + 1 <= self.chunk_size {
                len += words[end].len() + 1;
                end += 1;
            }
            if end == start {
                // Single word longer than the budget: emit it whole.
                end = start + 1;
            }
            out.push(words[start..end].join(" "));
            if end >= words.len() {
                break;
            }
            let mut back = end;
            let mut covered = 0;
            while back > start + 1 && covered < self.chunk_overlap {
                back -= 1;
                covered += words[back].len() + 1;
            }
            start = back;
        }
        out
    }
}

/// Stable chunk id from document id, chunk position, and content.
pub fn chunk_id(doc_id: &str, index: usize, text: &str) -> ChunkId {
    let mut hasher = XxHash64::with_seed(0);
    hasher.write(doc_id.as_bytes());
    hasher.write_usize(index);
    hasher.write(text.as_bytes());
    format!("{:016x}", hasher.finish())
}
