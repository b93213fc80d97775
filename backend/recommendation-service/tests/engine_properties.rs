//! Property tests for the recommendation engines

use chrono::{TimeZone, Utc};
use proptest::prelude::*;
use recommendation_service::models::{Catalog, Interaction, MangaFeatures, UserId};
use recommendation_service::{
    CollaborativeFilteringEngine, ContentBasedEngine, HybridRecommendationEngine,
};
use std::collections::{BTreeMap, HashMap, HashSet};

const GENRES: [&str; 6] = ["Action", "Romance", "Comedy", "Drama", "Fantasy", "Horror"];

fn interactions_strategy(user_id: UserId) -> impl Strategy<Value = Vec<Interaction>> {
    // BTreeMap keeps one score per manga
    prop::collection::btree_map(0i64..30, 0.0f64..=1.0, 0..15).prop_map(
        move |scores: BTreeMap<i64, f64>| {
            let timestamp = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
            scores
                .into_iter()
                .map(|(manga_id, score)| Interaction {
                    user_id,
                    manga_id,
                    score,
                    timestamp,
                })
                .collect()
        },
    )
}

fn manga_strategy() -> impl Strategy<Value = MangaFeatures> {
    (
        0i64..30,
        prop::collection::vec(0usize..GENRES.len(), 0..4),
        0i64..3,
        0i32..3,
    )
        .prop_map(|(manga_id, genre_idx, source, status)| MangaFeatures {
            manga_id,
            title: format!("Manga {}", manga_id),
            genres: genre_idx.into_iter().map(|i| GENRES[i].to_string()).collect(),
            source,
            status,
            author: String::new(),
            popularity: 0,
        })
}

fn catalog_strategy() -> impl Strategy<Value = Catalog> {
    prop::collection::vec(manga_strategy(), 0..30)
        .prop_map(|items| items.into_iter().map(|m| (m.manga_id, m)).collect())
}

fn users_strategy() -> impl Strategy<Value = HashMap<UserId, Vec<Interaction>>> {
    (
        interactions_strategy(1),
        interactions_strategy(2),
        interactions_strategy(3),
        interactions_strategy(4),
    )
        .prop_map(|(a, b, c, d)| HashMap::from([(1, a), (2, b), (3, c), (4, d)]))
}

proptest! {
    #[test]
    fn user_similarity_is_symmetric_and_bounded(
        a in interactions_strategy(1),
        b in interactions_strategy(2),
    ) {
        let engine = CollaborativeFilteringEngine::new();
        let ab = engine.user_similarity(&a, &b);
        let ba = engine.user_similarity(&b, &a);

        prop_assert!((ab - ba).abs() < 1e-9);
        prop_assert!((0.0..=1.0 + 1e-9).contains(&ab));
    }

    #[test]
    fn collaborative_never_recommends_seen_or_unknown_manga(
        users in users_strategy(),
        catalog in catalog_strategy(),
        top_n in 1usize..15,
    ) {
        let engine = CollaborativeFilteringEngine::new();
        let target = users[&1].clone();
        let seen: HashSet<i64> = target.iter().map(|i| i.manga_id).collect();

        let recs = engine.recommend(1, &target, &users, &catalog, top_n);

        prop_assert!(recs.len() <= top_n);
        for rec in &recs {
            prop_assert!(!seen.contains(&rec.manga.manga_id));
            prop_assert!(catalog.contains_key(&rec.manga.manga_id));
            prop_assert!(rec.confidence > 0.0 && rec.confidence <= 1.0);
        }
        prop_assert!(recs.windows(2).all(|w| w[0].score >= w[1].score));
    }

    #[test]
    fn content_scores_stay_above_floor(
        catalog in catalog_strategy(),
        liked_count in 0usize..5,
    ) {
        let engine = ContentBasedEngine::new();
        let mut items: Vec<MangaFeatures> = catalog.values().cloned().collect();
        items.sort_by_key(|m| m.manga_id);
        let liked: Vec<MangaFeatures> = items.iter().take(liked_count).cloned().collect();
        let liked_ids: HashSet<i64> = liked.iter().map(|m| m.manga_id).collect();

        let recs = engine.recommend(&liked, &items, 50);

        for rec in &recs {
            prop_assert!(rec.score > engine.similarity_floor());
            prop_assert!(rec.score <= 1.0);
            prop_assert!(!liked_ids.contains(&rec.manga.manga_id));
        }
    }

    #[test]
    fn hybrid_final_score_is_component_sum_and_idempotent(
        users in users_strategy(),
        catalog in catalog_strategy(),
        top_n in 1usize..10,
    ) {
        let engine = HybridRecommendationEngine::default();
        let history = users[&1].clone();

        let first = engine.recommend(1, &history, &users, &catalog, top_n);
        let second = engine.recommend(1, &history, &users, &catalog, top_n);

        prop_assert_eq!(&first, &second);
        prop_assert!(first.len() <= top_n);
        for rec in &first {
            prop_assert_eq!(rec.final_score, rec.collaborative_score + rec.content_score);
        }
        prop_assert!(first.windows(2).all(|w| w[0].final_score >= w[1].final_score));
    }
}
