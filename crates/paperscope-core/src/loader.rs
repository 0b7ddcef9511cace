//! Document loading from directories of extracted paper text.
//!
//! PDF/table conversion happens upstream; the loader consumes the text
//! files that conversion produced. It fails only by returning fewer
//! documents: unreadable files are skipped with a warning, never
//! surfaced as partial documents.

use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::error::Result;
use crate::types::{DocMeta, Document};

pub struct DocumentLoader {
    extensions: Vec<String>,
    header_re: Regex,
    table_row_re: Regex,
}

impl DocumentLoader {
    /// `extensions` are matched with their leading dot, e.g. `.txt`.
    pub fn new(extensions: &[String]) -> Self {
        let header_re = Regex::new(r"(?m)^#{1,6}\s+(.+)$").expect("valid header pattern");
        let table_row_re = Regex::new(r"(?m)^\s*\|.*\|\s*$").expect("valid table pattern");
        Self {
            extensions: extensions.to_vec(),
            header_re,
            table_row_re,
        }
    }

    /// Load documents from each directory in order, concatenating results.
    pub fn load(&self, dirs: &[PathBuf]) -> Result<Vec<Document>> {
        let mut documents = Vec::new();
        for dir in dirs {
            for path in self.list_files(dir) {
                match self.read_content(&path) {
                    Ok(text) => documents.push(self.to_document(&path, text)),
                    Err(e) => warn!(path = %path.display(), error = %e, "skipping unreadable file"),
                }
            }
        }
        debug!(count = documents.len(), "loaded documents");
        Ok(documents)
    }

    fn list_files(&self, root: &Path) -> Vec<PathBuf> {
        let mut files: Vec<PathBuf> = walkdir::WalkDir::new(root)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .map(|e| e.path().to_path_buf())
            .filter(|p| self.matches_extension(p))
            .collect();
        files.sort();
        files
    }

    fn matches_extension(&self, path: &Path) -> bool {
        let Some(ext) = path.extension().and_then(|s| s.to_str()) else {
            return false;
        };
        let dotted = format!(".{ext}");
        self.extensions.iter().any(|e| e.eq_ignore_ascii_case(&dotted))
    }

    fn read_content(&self, path: &Path) -> std::io::Result<String> {
        match fs::read_to_string(path) {
            Ok(content) => Ok(content),
            Err(_) => Ok(String::from_utf8_lossy(&fs::read(path)?).to_string()),
        }
    }

    fn to_document(&self, path: &Path, text: String) -> Document {
        let doc_id = path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| path.to_string_lossy().to_string());
        let headers = self
            .header_re
            .captures_iter(&text)
            .map(|c| c[1].trim().to_string())
            .collect();
        let tables = self
            .table_row_re
            .find_iter(&text)
            .map(|m| m.as_str().trim().to_string())
            .collect();
        Document {
            doc_id,
            meta: DocMeta {
                file_path: path.to_string_lossy().to_string(),
                headers,
                tables,
            },
            text,
        }
    }
}
