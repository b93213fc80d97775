//! End-to-end refresh over a snapshot file

use chrono::{Duration, Utc};
use recommendation_service::config::RecommendationConfig;
use recommendation_service::models::{
    Interaction, MangaFeatures, ReadingHistory, GENERAL_RECOMMENDATIONS,
};
use recommendation_service::providers::{
    InMemoryStore, RecommendationStore, Snapshot, SnapshotProvider,
};
use recommendation_service::RecommendationRefresher;
use std::collections::HashMap;
use std::sync::Arc;

fn manga(manga_id: i64, title: &str, genres: &[&str], popularity: u32) -> MangaFeatures {
    MangaFeatures {
        manga_id,
        title: title.to_string(),
        genres: genres.iter().map(|g| g.to_string()).collect(),
        source: 1,
        status: 1,
        author: "Someone".to_string(),
        popularity,
    }
}

fn interaction(user_id: i64, manga_id: i64, score: f64) -> Interaction {
    Interaction {
        user_id,
        manga_id,
        score,
        timestamp: Utc::now(),
    }
}

fn sample_snapshot() -> Snapshot {
    let now = Utc::now();
    Snapshot {
        interactions: vec![
            interaction(1, 1, 1.0),
            interaction(1, 2, 0.9),
            interaction(1, 3, 0.8),
            interaction(2, 1, 1.0),
            interaction(2, 2, 0.9),
            interaction(2, 3, 0.8),
            interaction(2, 4, 0.9),
            interaction(2, 5, 0.6),
        ],
        reading_history: HashMap::from([(
            3,
            vec![ReadingHistory {
                manga_id: 5,
                chapters_read: 8,
                total_chapters: 10,
                time_spent_ms: 3_600_000,
                last_read: Some(now - Duration::days(2)),
                rating: Some(4.0),
            }],
        )]),
        catalog: vec![
            manga(1, "Berserk", &["Action", "Horror"], 900),
            manga(2, "Claymore", &["Action", "Horror"], 400),
            manga(3, "Vagabond", &["Action", "Drama"], 700),
            manga(4, "Vinland Saga", &["Action", "Drama"], 800),
            manga(5, "Yotsuba", &["Comedy"], 300),
            manga(6, "Nichijou", &["Comedy"], 200),
        ],
        exported_at: now,
    }
}

#[tokio::test]
async fn snapshot_round_trips_through_disk() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("snapshot.json");

    let snapshot = sample_snapshot();
    snapshot.save(&path).await.expect("save snapshot");

    let loaded = Snapshot::load(&path).await.expect("load snapshot");
    assert_eq!(loaded.interactions, snapshot.interactions);
    assert_eq!(loaded.catalog, snapshot.catalog);
    assert_eq!(loaded.reading_history, snapshot.reading_history);
}

#[tokio::test]
async fn missing_snapshot_is_an_io_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    let result = Snapshot::load(dir.path().join("absent.json")).await;
    assert!(matches!(
        result,
        Err(recommendation_service::AppError::Io(_))
    ));
}

#[tokio::test]
async fn refresh_over_snapshot_serves_every_user() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("snapshot.json");
    sample_snapshot().save(&path).await.expect("save snapshot");

    let provider = Arc::new(SnapshotProvider::from_path(&path).await.expect("load"));
    let store = Arc::new(InMemoryStore::new());
    let refresher = RecommendationRefresher::new(
        provider.clone(),
        provider.clone(),
        store.clone(),
        &RecommendationConfig::default(),
    )
    .expect("valid config");

    let user_ids = provider.user_ids();
    assert_eq!(user_ids, vec![1, 2, 3]);

    let summary = refresher.refresh_users(&user_ids, Utc::now()).await;
    assert!(summary.failed.is_empty());
    assert_eq!(summary.reports.len(), 3);

    // User 1 shares three titles with user 2, so collaborative picks show up
    let general = store
        .cached(1, GENERAL_RECOMMENDATIONS, 10)
        .await
        .expect("cached");
    assert!(!general.is_empty());
    assert_eq!(general[0].recommended_manga_id, 4);
    assert!(general[0].reason.starts_with("Liked by 100% of similar users"));

    // User 3 only has reading history: yotsuba was read two days ago
    let grouped = store.cached(3, 5, 10).await.expect("cached");
    assert_eq!(grouped.len(), 1);
    assert_eq!(grouped[0].recommended_manga_id, 6);
    assert_eq!(grouped[0].reason, "Similar to Yotsuba");
}
