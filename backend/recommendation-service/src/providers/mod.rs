//! Data access seams
//!
//! The engines are pure; everything they consume or produce crosses one of
//! these traits. The service binary wires them to a JSON snapshot and an
//! in-memory store, and tests substitute mocks.

mod snapshot;

pub use snapshot::{InMemoryStore, Snapshot, SnapshotProvider};

use crate::error::Result;
use crate::models::{CachedRecommendation, Catalog, Interaction, MangaId, ReadingHistory, UserId};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;

/// Source of user engagement data
#[async_trait]
pub trait InteractionProvider: Send + Sync {
    async fn user_interactions(&self, user_id: UserId) -> Result<Vec<Interaction>>;

    /// Interactions of every known user, keyed by user
    async fn all_interactions(&self) -> Result<HashMap<UserId, Vec<Interaction>>>;

    async fn reading_history(&self, user_id: UserId) -> Result<Vec<ReadingHistory>>;
}

/// Source of candidate manga
#[async_trait]
pub trait CatalogProvider: Send + Sync {
    async fn candidates(&self) -> Result<Catalog>;
}

/// Persistence for generated recommendations
#[async_trait]
pub trait RecommendationStore: Send + Sync {
    /// Remove a user's entries generated at or before `cutoff`, returning how many went
    async fn delete_older_than(&self, user_id: UserId, cutoff: DateTime<Utc>) -> Result<usize>;

    async fn insert(&self, user_id: UserId, entries: Vec<CachedRecommendation>) -> Result<()>;

    /// Drop the user's entries for every id in `sources`, then store `entries`
    async fn replace(
        &self,
        user_id: UserId,
        sources: &[MangaId],
        entries: Vec<CachedRecommendation>,
    ) -> Result<()>;

    /// Cached entries for one source manga, best first
    async fn cached(
        &self,
        user_id: UserId,
        source_manga_id: MangaId,
        limit: usize,
    ) -> Result<Vec<CachedRecommendation>>;
}
