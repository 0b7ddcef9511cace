use paperscope_core::fingerprint::{IndexFingerprint, PreprocessConfig};
use paperscope_core::preprocess::Preprocessor;
use paperscope_core::types::{DocMeta, Document};

fn all_off() -> PreprocessConfig {
    PreprocessConfig {
        remove_tables: false,
        remove_footnotes: false,
        remove_inline_citations: false,
        remove_reference_section: false,
    }
}

#[test]
fn strips_inline_citations() {
    let pre = Preprocessor::new(PreprocessConfig::default());
    let out = pre.clean_text("Transformers [1] outperform RNNs (Smith et al., 2020) on this task.");
    assert!(!out.contains("[1]"));
    assert!(!out.contains("Smith"));
    assert!(out.contains("Transformers"));
    assert!(out.contains("outperform RNNs"));
}

#[test]
fn strips_reference_section() {
    let pre = Preprocessor::new(PreprocessConfig::default());
    let out = pre.clean_text("Main body.\n\nReferences\n\nSmith, J. A paper. 2020.");
    assert!(out.contains("Main body."));
    assert!(!out.contains("A paper"));
}

#[test]
fn strips_table_rows() {
    let pre = Preprocessor::new(PreprocessConfig::default());
    let out = pre.clean_text("Results follow.\n\n| model | score |\n| ours | 0.9 |\n\nDone.");
    assert!(!out.contains('|'));
    assert!(out.contains("Results follow."));
    assert!(out.contains("Done."));
}

#[test]
fn disabled_toggles_leave_text_unchanged() {
    let pre = Preprocessor::new(all_off());
    let text = "Body [1].\n\nReferences\n\n| a | b |\n\nfootnote 3";
    assert_eq!(pre.clean_text(text), text.trim());
}

#[test]
fn preprocess_preserves_metadata() {
    let pre = Preprocessor::new(PreprocessConfig::default());
    let doc = Document {
        doc_id: "p".to_string(),
        text: "Body [1].".to_string(),
        meta: DocMeta {
            file_path: "data/p.md".to_string(),
            headers: vec!["Intro".to_string()],
            tables: vec!["| a | b |".to_string()],
        },
    };
    let out = pre.preprocess(std::slice::from_ref(&doc));
    assert_eq!(out.len(), 1);
    assert_eq!(out[0].meta, doc.meta);
    assert!(!out[0].text.contains("[1]"));
}

#[test]
fn fingerprint_equality_is_field_by_field() {
    let a = IndexFingerprint {
        embedding_model: "bge-small".to_string(),
        chunk_size: 512,
        chunk_overlap: 50,
        preprocess: PreprocessConfig::default(),
    };
    let mut b = a.clone();
    assert_eq!(a, b);
    b.chunk_size = 256;
    assert_ne!(a, b);
    let mut c = a.clone();
    c.preprocess.remove_tables = false;
    assert_ne!(a, c);
    let mut d = a.clone();
    d.embedding_model = "other-model".to_string();
    assert_ne!(a, d);
}
