use super::{CatalogProvider, InteractionProvider, RecommendationStore};
use crate::error::Result;
use crate::models::{
    CachedRecommendation, Catalog, Interaction, MangaFeatures, MangaId, ReadingHistory, UserId,
};
use crate::services::recommendation::interaction_from_history;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use std::path::Path;
use tokio::sync::RwLock;
use tracing::info;

/// Point-in-time export of interactions, reading history and catalog
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub interactions: Vec<Interaction>,
    /// Reading history per user
    #[serde(default)]
    pub reading_history: HashMap<UserId, Vec<ReadingHistory>>,
    #[serde(default)]
    pub catalog: Vec<MangaFeatures>,
    /// Export time, used for history entries without a last-read date
    #[serde(default = "Utc::now")]
    pub exported_at: DateTime<Utc>,
}

impl Snapshot {
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let raw = tokio::fs::read_to_string(path.as_ref()).await?;
        let snapshot: Snapshot = serde_json::from_str(&raw)?;

        info!(
            path = %path.as_ref().display(),
            interactions = snapshot.interactions.len(),
            users_with_history = snapshot.reading_history.len(),
            catalog = snapshot.catalog.len(),
            "Snapshot loaded"
        );

        Ok(snapshot)
    }

    pub async fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let raw = serde_json::to_string_pretty(self)?;
        tokio::fs::write(path, raw).await?;
        Ok(())
    }
}

/// Provider backed by a loaded snapshot
///
/// Users with reading history but no explicit interactions get interactions
/// derived from their history.
#[derive(Debug, Clone)]
pub struct SnapshotProvider {
    interactions: HashMap<UserId, Vec<Interaction>>,
    reading_history: HashMap<UserId, Vec<ReadingHistory>>,
    catalog: Catalog,
}

impl SnapshotProvider {
    pub fn new(snapshot: Snapshot) -> Self {
        let mut interactions: HashMap<UserId, Vec<Interaction>> = HashMap::new();
        for interaction in snapshot.interactions {
            interactions
                .entry(interaction.user_id)
                .or_default()
                .push(interaction);
        }

        for (user_id, history) in &snapshot.reading_history {
            interactions.entry(*user_id).or_insert_with(|| {
                history
                    .iter()
                    .map(|entry| interaction_from_history(*user_id, entry, snapshot.exported_at))
                    .collect()
            });
        }

        let catalog = snapshot
            .catalog
            .into_iter()
            .map(|manga| (manga.manga_id, manga))
            .collect();

        Self {
            interactions,
            reading_history: snapshot.reading_history,
            catalog,
        }
    }

    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        Ok(Self::new(Snapshot::load(path).await?))
    }

    /// Every user with interactions or history, ascending
    pub fn user_ids(&self) -> Vec<UserId> {
        self.interactions
            .keys()
            .chain(self.reading_history.keys())
            .copied()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}

#[async_trait]
impl InteractionProvider for SnapshotProvider {
    async fn user_interactions(&self, user_id: UserId) -> Result<Vec<Interaction>> {
        Ok(self.interactions.get(&user_id).cloned().unwrap_or_default())
    }

    async fn all_interactions(&self) -> Result<HashMap<UserId, Vec<Interaction>>> {
        Ok(self.interactions.clone())
    }

    async fn reading_history(&self, user_id: UserId) -> Result<Vec<ReadingHistory>> {
        Ok(self.reading_history.get(&user_id).cloned().unwrap_or_default())
    }
}

#[async_trait]
impl CatalogProvider for SnapshotProvider {
    async fn candidates(&self) -> Result<Catalog> {
        Ok(self.catalog.clone())
    }
}

/// Recommendation store kept in process memory
#[derive(Debug, Default)]
pub struct InMemoryStore {
    entries: RwLock<HashMap<UserId, Vec<CachedRecommendation>>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// All entries for a user, in insertion order
    pub async fn entries(&self, user_id: UserId) -> Vec<CachedRecommendation> {
        self.entries
            .read()
            .await
            .get(&user_id)
            .cloned()
            .unwrap_or_default()
    }
}

#[async_trait]
impl RecommendationStore for InMemoryStore {
    async fn delete_older_than(&self, user_id: UserId, cutoff: DateTime<Utc>) -> Result<usize> {
        let mut entries = self.entries.write().await;
        let Some(user_entries) = entries.get_mut(&user_id) else {
            return Ok(0);
        };

        let before = user_entries.len();
        user_entries.retain(|entry| entry.generated_at > cutoff);
        Ok(before - user_entries.len())
    }

    async fn insert(&self, user_id: UserId, new_entries: Vec<CachedRecommendation>) -> Result<()> {
        self.entries
            .write()
            .await
            .entry(user_id)
            .or_default()
            .extend(new_entries);
        Ok(())
    }

    async fn replace(
        &self,
        user_id: UserId,
        sources: &[MangaId],
        new_entries: Vec<CachedRecommendation>,
    ) -> Result<()> {
        let mut entries = self.entries.write().await;
        let user_entries = entries.entry(user_id).or_default();
        user_entries.retain(|entry| !sources.contains(&entry.source_manga_id));
        user_entries.extend(new_entries);
        Ok(())
    }

    async fn cached(
        &self,
        user_id: UserId,
        source_manga_id: MangaId,
        limit: usize,
    ) -> Result<Vec<CachedRecommendation>> {
        let entries = self.entries.read().await;
        let mut matching: Vec<CachedRecommendation> = entries
            .get(&user_id)
            .map(|user_entries| {
                user_entries
                    .iter()
                    .filter(|entry| entry.source_manga_id == source_manga_id)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();

        matching.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        matching.truncate(limit);
        Ok(matching)
    }
}
