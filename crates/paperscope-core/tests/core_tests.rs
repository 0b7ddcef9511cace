use std::fs;
use tempfile::TempDir;

use paperscope_core::chunker::{chunk_id, Chunker};
use paperscope_core::loader::DocumentLoader;
use paperscope_core::types::Document;

fn doc(id: &str, text: &str) -> Document {
    Document {
        doc_id: id.to_string(),
        text: text.to_string(),
        meta: Default::default(),
    }
}

#[test]
fn small_paragraph_becomes_one_chunk() {
    let chunker = Chunker::new(512, 50).expect("chunker");
    let chunks = chunker.chunk_documents(&[doc("a", "Short text")]);
    assert_eq!(chunks.len(), 1);
    assert_eq!(chunks[0].text, "Short text");
    assert_eq!(chunks[0].chunk_index, 0);
    assert_eq!(chunks[0].total_chunks, 1);
}

#[test]
fn paragraphs_pack_up_to_chunk_size() {
    let chunker = Chunker::new(40, 5).expect("chunker");
    let text = "alpha bravo\n\ncharlie delta\n\necho foxtrot golf hotel india juliet kilo";
    let chunks = chunker.chunk_documents(&[doc("a", text)]);
    assert!(chunks.len() >= 2, "text exceeds one 40-char chunk");
    for c in &chunks {
        assert!(c.text.len() <= 40 || !c.text.contains(' '), "{}", c.text);
    }
}

#[test]
fn oversized_paragraph_splits_with_overlap() {
    let chunker = Chunker::new(30, 10).expect("chunker");
    let words: Vec<String> = (0..20).map(|i| format!("word{i:02}")).collect();
    let text = words.join(" ");
    let chunks = chunker.chunk_documents(&[doc("a", &text)]);
    assert!(chunks.len() > 1);
    // Consecutive pieces share words because of the overlap step-back.
    let first_tail = chunks[0].text.split_whitespace().last().expect("tail");
    assert!(
        chunks[1].text.split_whitespace().any(|w| w == first_tail),
        "expected overlap between '{}' and '{}'",
        chunks[0].text,
        chunks[1].text
    );
}

#[test]
fn overlap_must_be_smaller_than_chunk_size() {
    assert!(Chunker::new(100, 100).is_err());
    assert!(Chunker::new(0, 0).is_err());
    assert!(Chunker::new(100, 99).is_ok());
}

#[test]
fn chunk_ids_are_stable_across_runs() {
    let chunker = Chunker::new(64, 8).expect("chunker");
    let d = doc("paper", "First paragraph.\n\nSecond paragraph with more words in it.");
    let a = chunker.chunk_documents(std::slice::from_ref(&d));
    let b = chunker.chunk_documents(std::slice::from_ref(&d));
    let ids_a: Vec<_> = a.iter().map(|c| c.id.clone()).collect();
    let ids_b: Vec<_> = b.iter().map(|c| c.id.clone()).collect();
    assert_eq!(ids_a, ids_b);
    assert_ne!(chunk_id("paper", 0, "x"), chunk_id("paper", 1, "x"));
    assert_ne!(chunk_id("paper", 0, "x"), chunk_id("other", 0, "x"));
}

#[test]
fn loader_reads_matching_extensions_only() {
    let tmp = TempDir::new().expect("tempdir");
    fs::write(tmp.path().join("a.txt"), "alpha bravo").expect("write");
    fs::write(tmp.path().join("b.md"), "# Title\n\ncharlie").expect("write");
    fs::write(tmp.path().join("c.pdf"), b"%PDF").expect("write");

    let loader = DocumentLoader::new(&[".txt".to_string(), ".md".to_string()]);
    let docs = loader.load(&[tmp.path().to_path_buf()]).expect("load");
    assert_eq!(docs.len(), 2);
    let ids: Vec<&str> = docs.iter().map(|d| d.doc_id.as_str()).collect();
    assert!(ids.contains(&"a") && ids.contains(&"b"));
}

#[test]
fn loader_extracts_headers_and_table_rows() {
    let tmp = TempDir::new().expect("tempdir");
    fs::write(
        tmp.path().join("paper.md"),
        "# Introduction\n\nBody text.\n\n| metric | value |\n| acc | 0.91 |\n",
    )
    .expect("write");

    let loader = DocumentLoader::new(&[".md".to_string()]);
    let docs = loader.load(&[tmp.path().to_path_buf()]).expect("load");
    assert_eq!(docs.len(), 1);
    assert_eq!(docs[0].meta.headers, vec!["Introduction".to_string()]);
    assert_eq!(docs[0].meta.tables.len(), 2);
    assert!(docs[0].meta.file_path.ends_with("paper.md"));
}

#[test]
fn loader_concatenates_directories_in_order() {
    let first = TempDir::new().expect("tempdir");
    let second = TempDir::new().expect("tempdir");
    fs::write(first.path().join("one.txt"), "one").expect("write");
    fs::write(second.path().join("two.txt"), "two").expect("write");

    let loader = DocumentLoader::new(&[".txt".to_string()]);
    let docs = loader
        .load(&[first.path().to_path_buf(), second.path().to_path_buf()])
        .expect("load");
    let ids: Vec<&str> = docs.iter().map(|d| d.doc_id.as_str()).collect();
    assert_eq!(ids, vec!["one", "two"]);
}

#[test]
fn loader_returns_empty_for_missing_directory() {
    let loader = DocumentLoader::new(&[".txt".to_string()]);
    let docs = loader
        .load(&[std::path::PathBuf::from("/nonexistent/paperscope")])
        .expect("load");
    assert!(docs.is_empty());
}
