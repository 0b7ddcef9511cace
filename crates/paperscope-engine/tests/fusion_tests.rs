use paperscope_core::types::{SearchHit, SourceKind};
use paperscope_engine::{reciprocal_rank_fusion, RRF_K};

fn vector_hit(id: &str, score: f32) -> SearchHit {
    SearchHit {
        id: id.to_string(),
        score,
        source: SourceKind::Vector,
    }
}

fn keyword_hit(id: &str, score: f32) -> SearchHit {
    SearchHit {
        id: id.to_string(),
        score,
        source: SourceKind::Keyword,
    }
}

#[test]
fn fuses_overlapping_lists_with_reciprocal_ranks() {
    let vector = vec![vector_hit("n1", 0.9), vector_hit("n2", 0.8)];
    let keyword = vec![keyword_hit("n2", 7.0), keyword_hit("n1", 5.0), keyword_hit("n3", 1.0)];

    let fused = reciprocal_rank_fusion(&[&vector, &keyword], RRF_K);
    assert_eq!(fused.len(), 3);

    let n1 = fused.iter().find(|h| h.id == "n1").expect("n1 fused");
    let n2 = fused.iter().find(|h| h.id == "n2").expect("n2 fused");
    let n3 = fused.iter().find(|h| h.id == "n3").expect("n3 fused");
    assert!((n1.score - (1.0 / 61.0 + 1.0 / 62.0)).abs() < 1e-6);
    assert!((n2.score - (1.0 / 62.0 + 1.0 / 61.0)).abs() < 1e-6);
    assert!((n3.score - 1.0 / 63.0).abs() < 1e-6);
    assert!(n3.score < n1.score);
}

#[test]
fn equal_scores_break_ties_by_vector_rank_then_id() {
    // n1 and n2 have identical fused scores; n1 ranked higher by vector.
    let vector = vec![vector_hit("n1", 0.9), vector_hit("n2", 0.8)];
    let keyword = vec![keyword_hit("n2", 7.0), keyword_hit("n1", 5.0)];

    let fused = reciprocal_rank_fusion(&[&vector, &keyword], RRF_K);
    assert_eq!(fused[0].id, "n1");
    assert_eq!(fused[1].id, "n2");

    // Vector-absent nodes with equal scores fall back to id order.
    let keyword_only = vec![keyword_hit("b", 2.0)];
    let keyword_only_2 = vec![keyword_hit("a", 2.0)];
    let fused = reciprocal_rank_fusion(&[&keyword_only, &keyword_only_2], RRF_K);
    assert_eq!(fused[0].id, "a");
    assert_eq!(fused[1].id, "b");
}

#[test]
fn duplicate_ids_collapse_to_one_entry() {
    let vector = vec![vector_hit("n1", 0.9)];
    let keyword = vec![keyword_hit("n1", 4.0)];
    let fused = reciprocal_rank_fusion(&[&vector, &keyword], RRF_K);
    assert_eq!(fused.len(), 1);
    assert_eq!(fused[0].vector_rank, Some(0));
    assert_eq!(fused[0].keyword_rank, Some(0));
}

#[test]
fn similarity_keeps_the_best_raw_score() {
    let vector = vec![vector_hit("n1", 0.42)];
    let keyword = vec![keyword_hit("n1", 6.5)];
    let fused = reciprocal_rank_fusion(&[&vector, &keyword], RRF_K);
    assert!((fused[0].similarity - 6.5).abs() < 1e-6);
}

#[test]
fn fusion_is_deterministic_for_identical_inputs() {
    let vector = vec![vector_hit("x", 0.5), vector_hit("y", 0.4), vector_hit("z", 0.3)];
    let keyword = vec![keyword_hit("z", 3.0), keyword_hit("x", 2.0)];
    let a: Vec<String> = reciprocal_rank_fusion(&[&vector, &keyword], RRF_K)
        .into_iter()
        .map(|h| h.id)
        .collect();
    let b: Vec<String> = reciprocal_rank_fusion(&[&vector, &keyword], RRF_K)
        .into_iter()
        .map(|h| h.id)
        .collect();
    assert_eq!(a, b);
}

#[test]
fn empty_lists_fuse_to_nothing() {
    let fused = reciprocal_rank_fusion(&[&[], &[]], RRF_K);
    assert!(fused.is_empty());
}
