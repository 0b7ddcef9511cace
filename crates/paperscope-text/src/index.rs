use anyhow::Result;
use std::path::Path;
use tantivy::collector::TopDocs;
use tantivy::query::QueryParser;
use tantivy::schema::Value;
use tantivy::{doc, Index, TantivyDocument};
use tracing::debug;

use paperscope_core::traits::KeywordSearch;
use paperscope_core::types::{Chunk, SearchHit, SourceKind};

use crate::tantivy_utils::{build_schema, register_tokenizer};

#[derive(Debug)]
pub struct KeywordIndex {
    index: Index,
    id_field: tantivy::schema::Field,
    text_field: tantivy::schema::Field,
}

impl KeywordIndex {
    /// Recreate the index directory and index all chunks into it.
    pub fn build(index_dir: &Path, chunks: &[Chunk]) -> Result<Self> {
        let schema = build_schema();
        if index_dir.exists() {
            std::fs::remove_dir_all(index_dir)?;
        }
        std::fs::create_dir_all(index_dir)?;
        let index = Index::create_in_dir(index_dir, schema.clone())?;
        register_tokenizer(&index);
        let id_field = schema.get_field("id")?;
        let doc_id_field = schema.get_field("doc_id")?;
        let text_field = schema.get_field("text")?;

        let mut index_writer = index.writer(50_000_000)?;
        for c in chunks {
            index_writer.add_document(doc!(
                id_field => c.id.clone(),
                doc_id_field => c.doc_id.clone(),
                text_field => c.text.clone(),
            ))?;
        }
        index_writer.commit()?;
        debug!(chunks = chunks.len(), dir = %index_dir.display(), "built keyword index");
        Ok(Self {
            index,
            id_field,
            text_field,
        })
    }

    /// Open a previously built index.
    pub fn open(index_dir: &Path) -> Result<Self> {
        let index = Index::open_in_dir(index_dir)?;
        register_tokenizer(&index);
        let schema = index.schema();
        Ok(Self {
            id_field: schema.get_field("id")?,
            text_field: schema.get_field("text")?,
            index,
        })
    }

    /// Whether a built index is present at `index_dir`.
    pub fn exists(index_dir: &Path) -> bool {
        index_dir.join("meta.json").is_file()
    }

    /// BM25-ranked search over chunk text, best first.
    pub fn search(&self, query: &str, k: usize) -> Result<Vec<SearchHit>> {
        let reader = self.index.reader()?;
        let searcher = reader.searcher();
        let qp = QueryParser::for_index(&self.index, vec![self.text_field]);
        // Natural-language queries may contain parser metacharacters.
        let (q, _errors) = qp.parse_query_lenient(query);
        let top_docs = searcher.search(&q, &TopDocs::with_limit(k))?;
        let mut hits = Vec::new();
        for (score, addr) in top_docs {
            let stored: TantivyDocument = searcher.doc(addr)?;
            let id = stored
                .get_first(self.id_field)
                .and_then(|v| v.as_str())
                .unwrap_or("")
                .to_string();
            hits.push(SearchHit {
                id,
                score,
                source: SourceKind::Keyword,
            });
        }
        Ok(hits)
    }

    /// Number of indexed chunks.
    pub fn num_docs(&self) -> Result<u64> {
        let reader = self.index.reader()?;
        Ok(reader.searcher().num_docs())
    }
}

impl KeywordSearch for KeywordIndex {
    fn search(&self, query: &str, k: usize) -> Result<Vec<SearchHit>> {
        Self::search(self, query, k)
    }
}
