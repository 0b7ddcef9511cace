use tempfile::TempDir;

use paperscope_core::traits::Embedder;
use paperscope_core::types::Chunk;
use paperscope_infer::HashEmbedder;
use paperscope_vector::VectorStore;

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
fn build_persists_and_searches() {
    let tmp = TempDir::new().expect("tempdir");
    let path = tmp.path().join("vectors.json");
    let embedder = HashEmbedder::new(128);
    let chunks = vec![
        chunk("c1", "reciprocal rank fusion merges ranked lists"),
        chunk("c2", "tomato soup with basil"),
    ];

    let store = VectorStore::new(path.clone());
    let index = store.build(&chunks, &embedder).expect("build");
    assert_eq!(index.len(), 2);
    assert!(path.is_file());

    let query = embedder
        .embed_batch(&["reciprocal rank fusion".to_string()])
        .expect("embed")
        .remove(0);
    let hits = index.search(&query, 2).expect("search");
    assert_eq!(hits[0].id, "c1");
    assert!(hits[0].score >= hits[1].score);
}

#[test]
fn load_roundtrips_persisted_records() {
    let tmp = TempDir::new().expect("tempdir");
    let path = tmp.path().join("vectors.json");
    let embedder = HashEmbedder::new(64);
    let store = VectorStore::new(path);
    store
        .build(&[chunk("c1", "alpha"), chunk("c2", "bravo")], &embedder)
        .expect("build");

    let loaded = store.load().expect("persisted store should load");
    assert_eq!(loaded.len(), 2);
    assert_eq!(loaded.dim(), 64);
    let ids = loaded.ids();
    assert!(ids.contains("c1") && ids.contains("c2"));
}

#[test]
fn missing_or_corrupt_artifact_loads_as_none() {
    let tmp = TempDir::new().expect("tempdir");
    let missing = VectorStore::new(tmp.path().join("absent.json"));
    assert!(missing.load().is_none());

    let corrupt_path = tmp.path().join("corrupt.json");
    std::fs::write(&corrupt_path, b"{not json").expect("write");
    let corrupt = VectorStore::new(corrupt_path);
    assert!(corrupt.load().is_none());
}

#[test]
fn dimension_mismatch_is_an_error() {
    let tmp = TempDir::new().expect("tempdir");
    let embedder = HashEmbedder::new(32);
    let store = VectorStore::new(tmp.path().join("vectors.json"));
    let index = store.build(&[chunk("c1", "alpha")], &embedder).expect("build");
    assert!(index.search(&[0.0; 16], 1).is_err());
}
