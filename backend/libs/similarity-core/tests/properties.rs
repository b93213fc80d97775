use proptest::prelude::*;
use similarity_core::{cosine_similarity, jaccard_similarity, levenshtein_distance, normalized_similarity};
use std::collections::HashSet;

proptest! {
    /// A non-zero vector is always maximally similar to itself.
    #[test]
    fn prop_cosine_reflexive(v in prop::collection::vec(0.01_f64..1.0, 1..32)) {
        prop_assert!((cosine_similarity(&v, &v) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn prop_cosine_symmetric(
        pair in (1_usize..32).prop_flat_map(|n| (
            prop::collection::vec(0.0_f64..1.0, n),
            prop::collection::vec(0.0_f64..1.0, n),
        ))
    ) {
        let (a, b) = pair;
        prop_assert_eq!(cosine_similarity(&a, &b), cosine_similarity(&b, &a));
    }

    /// Non-negative inputs keep cosine inside [0, 1].
    #[test]
    fn prop_cosine_bounded_for_scores(
        pair in (1_usize..32).prop_flat_map(|n| (
            prop::collection::vec(0.0_f64..1.0, n),
            prop::collection::vec(0.0_f64..1.0, n),
        ))
    ) {
        let (a, b) = pair;
        let similarity = cosine_similarity(&a, &b);
        prop_assert!((0.0..=1.0 + 1e-9).contains(&similarity));
    }

    #[test]
    fn prop_jaccard_reflexive(s in prop::collection::hash_set("[a-z]{1,8}", 1..16)) {
        prop_assert_eq!(jaccard_similarity(&s, &s), 1.0);
    }

    #[test]
    fn prop_jaccard_empty_is_zero(s in prop::collection::hash_set("[a-z]{1,8}", 0..16)) {
        let empty: HashSet<String> = HashSet::new();
        prop_assert_eq!(jaccard_similarity(&empty, &s), 0.0);
        prop_assert_eq!(jaccard_similarity(&s, &empty), 0.0);
    }

    #[test]
    fn prop_jaccard_symmetric_and_bounded(
        a in prop::collection::hash_set("[a-d]{1,2}", 0..10),
        b in prop::collection::hash_set("[a-d]{1,2}", 0..10),
    ) {
        let ab = jaccard_similarity(&a, &b);
        prop_assert_eq!(ab, jaccard_similarity(&b, &a));
        prop_assert!((0.0..=1.0).contains(&ab));
    }

    #[test]
    fn prop_levenshtein_symmetric(a in "[a-z ]{0,12}", b in "[a-z ]{0,12}") {
        prop_assert_eq!(levenshtein_distance(&a, &b), levenshtein_distance(&b, &a));
    }

    #[test]
    fn prop_levenshtein_identity(a in "\\PC{0,16}") {
        prop_assert_eq!(levenshtein_distance(&a, &a), 0);
        prop_assert_eq!(normalized_similarity(&a, &a), 1.0);
    }

    /// Distance never exceeds the longer string's length.
    #[test]
    fn prop_levenshtein_bounded(a in "[a-z]{0,12}", b in "[a-z]{0,12}") {
        let distance = levenshtein_distance(&a, &b);
        prop_assert!(distance <= a.len().max(b.len()));
        let similarity = normalized_similarity(&a, &b);
        prop_assert!((0.0..=1.0).contains(&similarity));
    }
}
