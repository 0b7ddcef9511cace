use tempfile::TempDir;

use paperscope_core::types::Chunk;
use paperscope_text::KeywordIndex;

fn chunk(id: &str, text: &str) -> Chunk {
    Chunk {
        id: id.to_string(),
        doc_id: "doc".to_string(),
        text: text.to_string(),
        chunk_index: 0,
        total_chunks: 1,
        meta: Default::default(),
    }
}

#[test]
fn build_then_search_ranks_matches_first() {
    let tmp = TempDir::new().expect("tempdir");
    let dir = tmp.path().join("tantivy");
    let chunks = vec![
        chunk("c1", "retrieval augmented generation over research papers"),
        chunk("c2", "tomato soup recipes and kitchen techniques"),
        chunk("c3", "hybrid retrieval combines keyword and vector search"),
    ];
    let index = KeywordIndex::build(&dir, &chunks).expect("build");
    assert_eq!(index.num_docs().expect("num_docs"), 3);

    let hits = index.search("hybrid retrieval", 10).expect("search");
    assert!(!hits.is_empty());
    assert_eq!(hits[0].id, "c3");
    for pair in hits.windows(2) {
        assert!(pair[0].score >= pair[1].score, "scores descend");
    }
}

#[test]
fn open_reuses_persisted_index() {
    let tmp = TempDir::new().expect("tempdir");
    let dir = tmp.path().join("tantivy");
    let chunks = vec![chunk("c1", "quantization reduces model memory footprint")];
    KeywordIndex::build(&dir, &chunks).expect("build");
    assert!(KeywordIndex::exists(&dir));

    let reopened = KeywordIndex::open(&dir).expect("open");
    let hits = reopened.search("quantization", 5).expect("search");
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].id, "c1");
}

#[test]
fn query_metacharacters_do_not_error() {
    let tmp = TempDir::new().expect("tempdir");
    let dir = tmp.path().join("tantivy");
    let chunks = vec![chunk("c1", "attention is all you need")];
    let index = KeywordIndex::build(&dir, &chunks).expect("build");
    // Lenient parsing tolerates unbalanced quotes and operators.
    let hits = index.search("attention: \"is (all", 5).expect("search");
    assert!(hits.len() <= 1);
}

#[test]
fn missing_directory_is_not_an_index() {
    let tmp = TempDir::new().expect("tempdir");
    let dir = tmp.path().join("never-built");
    assert!(!KeywordIndex::exists(&dir));
    assert!(KeywordIndex::open(&dir).is_err());
}
