//! Noise stripping before chunking.
//!
//! Removes tables, footnotes, inline citations, and reference sections so
//! chunking and embedding focus on main content. Each strip is an
//! independent toggle; preprocessing returns new documents with cleaned
//! text and untouched metadata.

use regex::Regex;
use tracing::debug;

use crate::fingerprint::PreprocessConfig;
use crate::types::Document;

pub struct Preprocessor {
    config: PreprocessConfig,
    citation_bracket: Regex,
    citation_paren: Regex,
    ref_section: Regex,
    table_row: Regex,
    table_sep: Regex,
    footnote_line: Regex,
    footnote_ref: Regex,
    footnote_label: Regex,
    multi_space: Regex,
    multi_newline: Regex,
}

impl Preprocessor {
    pub fn new(config: PreprocessConfig) -> Self {
        // Inline citations: [1], [2, 3], [1-5]
        let citation_bracket =
            Regex::new(r"\[\s*\d+(?:\s*[,\-–]\s*\d+)*\s*\]").expect("valid pattern");
        // (Author et al., 2020), (Smith, 1999), (Smith and Jones 2000)
        let citation_paren = Regex::new(
            r"\(\s*[A-Z][a-zA-Z\-]*(?:\s+et\s+al\.?|\s+and\s+[A-Z][a-zA-Z\-]*)*\s*,?\s*(?:19|20)\d{2}\s*\)",
        )
        .expect("valid pattern");
        let ref_section = Regex::new(r"(?im)^\s*(?:references?|bibliography|works?\s+cited)\s*$")
            .expect("valid pattern");
        let table_row = Regex::new(r"(?m)^\s*\|.*\|\s*$").expect("valid pattern");
        let table_sep = Regex::new(r"(?m)^\s*[-=]{2,}\s*$").expect("valid pattern");
        let footnote_line = Regex::new(r"(?m)^\s*\d+\.\s+.{1,120}$").expect("valid pattern");
        let footnote_ref =
            Regex::new(r"(?i)\b(?:see\s+)?footnote\s+\d+\b").expect("valid pattern");
        let footnote_label = Regex::new(r"(?i)footnote\s+\d+\s*:\s*").expect("valid pattern");
        let multi_space = Regex::new(r"  +").expect("valid pattern");
        let multi_newline = Regex::new(r"\n{3,}").expect("valid pattern");
        Self {
            config,
            citation_bracket,
            citation_paren,
            ref_section,
            table_row,
            table_sep,
            footnote_line,
            footnote_ref,
            footnote_label,
            multi_space,
            multi_newline,
        }
    }

    /// Remove noise from raw document text according to the configured
    /// toggles.
    pub fn clean_text(&self, text: &str) -> String {
        if text.trim().is_empty() {
            return text.to_string();
        }
        let mut out = text.to_string();
        if self.config.remove_reference_section {
            out = self.strip_reference_section(&out);
        }
        if self.config.remove_inline_citations {
            out = self.strip_inline_citations(&out);
        }
        if self.config.remove_footnotes {
            out = self.strip_footnotes(&out);
        }
        if self.config.remove_tables {
            out = self.strip_tables(&out);
        }
        out.trim().to_string()
    }

    /// Clean each document's text; metadata is carried over unchanged.
    pub fn preprocess(&self, documents: &[Document]) -> Vec<Document> {
        let cleaned: Vec<Document> = documents
            .iter()
            .map(|doc| Document {
                doc_id: doc.doc_id.clone(),
                text: self.clean_text(&doc.text),
                meta: doc.meta.clone(),
            })
            .collect();
        debug!(count = cleaned.len(), config = ?self.config, "preprocessed documents");
        cleaned
    }

    fn strip_reference_section(&self, text: &str) -> String {
        match self.ref_section.find(text) {
            Some(m) => text[..m.start()].trim_end().to_string(),
            None => text.to_string(),
        }
    }

    fn strip_inline_citations(&self, text: &str) -> String {
        let out = self.citation_bracket.replace_all(text, "");
        let out = self.citation_paren.replace_all(&out, "");
        self.multi_space.replace_all(&out, " ").to_string()
    }

    fn strip_footnotes(&self, text: &str) -> String {
        let out = self.footnote_ref.replace_all(text, "");
        let out = self.footnote_label.replace_all(&out, "");
        let out = self.footnote_line.replace_all(&out, "");
        self.multi_newline.replace_all(&out, "\n\n").to_string()
    }

    fn strip_tables(&self, text: &str) -> String {
        let out = self.table_row.replace_all(text, "");
        let out = self.table_sep.replace_all(&out, "");
        self.multi_newline.replace_all(&out, "\n\n").to_string()
    }
}
