// ============================================
// Collaborative Filtering Engine
// ============================================
//
// User-user collaborative filtering over normalized engagement scores:
// - cosine similarity restricted to items both users interacted with
// - top-K neighbours above a similarity threshold
// - similarity-weighted average of neighbour scores per unseen manga
//
// Data Flow:
//   Interactions (all users) → User Similarity → Neighbours
//                                                   ↓
//                          Catalog filter ← Weighted Neighbour Scores

use crate::config::RecommendationConfig;
use crate::models::{Catalog, Interaction, MangaFeatures, MangaId, UserId};
use serde::Serialize;
use similarity_core::cosine_similarity;
use std::collections::{BTreeMap, HashMap, HashSet};
use tracing::{debug, info};

/// Neighbourhood tunables for collaborative filtering
#[derive(Debug, Clone, Copy)]
pub struct CollaborativeConfig {
    pub min_common_items: usize,
    pub similarity_threshold: f64,
    pub max_neighbors: usize,
}

impl Default for CollaborativeConfig {
    fn default() -> Self {
        Self {
            min_common_items: 3,
            similarity_threshold: 0.3,
            max_neighbors: 20,
        }
    }
}

impl From<&RecommendationConfig> for CollaborativeConfig {
    fn from(config: &RecommendationConfig) -> Self {
        Self {
            min_common_items: config.min_common_items,
            similarity_threshold: config.similarity_threshold,
            max_neighbors: config.max_neighbors,
        }
    }
}

/// Candidate produced by collaborative filtering
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CollaborativeRecommendation {
    pub manga: MangaFeatures,
    /// Similarity-weighted mean of neighbour scores
    pub score: f64,
    /// Fraction of retained neighbours that interacted with this manga
    pub confidence: f64,
}

/// Collaborative filtering engine
#[derive(Debug, Clone, Default)]
pub struct CollaborativeFilteringEngine {
    config: CollaborativeConfig,
}

impl CollaborativeFilteringEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: CollaborativeConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CollaborativeConfig {
        &self.config
    }

    /// Cosine similarity between two users over their common items
    ///
    /// Users sharing fewer than `min_common_items` manga are treated as
    /// unrelated and get exactly `0.0`.
    pub fn user_similarity(&self, user_a: &[Interaction], user_b: &[Interaction]) -> f64 {
        let scores_b: HashMap<MangaId, f64> =
            user_b.iter().map(|i| (i.manga_id, i.score)).collect();

        let (vec_a, vec_b): (Vec<f64>, Vec<f64>) = user_a
            .iter()
            .filter_map(|i| scores_b.get(&i.manga_id).map(|&b| (i.score, b)))
            .unzip();

        if vec_a.len() < self.config.min_common_items {
            return 0.0;
        }

        cosine_similarity(&vec_a, &vec_b)
    }

    /// Find the retained neighbours of a user
    ///
    /// Returns `(user_id, similarity)` sorted by similarity descending, ties
    /// broken by ascending user id, capped at `max_neighbors`.
    pub fn find_neighbors(
        &self,
        target_user_id: UserId,
        target_interactions: &[Interaction],
        all_users: &HashMap<UserId, Vec<Interaction>>,
    ) -> Vec<(UserId, f64)> {
        let mut neighbors: Vec<(UserId, f64)> = all_users
            .iter()
            .filter(|(user_id, _)| **user_id != target_user_id)
            .map(|(user_id, interactions)| {
                (*user_id, self.user_similarity(target_interactions, interactions))
            })
            .filter(|(_, similarity)| *similarity > self.config.similarity_threshold)
            .collect();

        neighbors.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.0.cmp(&b.0))
        });
        neighbors.truncate(self.config.max_neighbors);

        neighbors
    }

    /// Recommend unseen manga from the preferences of similar users
    ///
    /// Algorithm:
    /// 1. Find neighbours strictly above the similarity threshold (top-K)
    /// 2. For every manga the target has not interacted with, accumulate
    ///    `similarity × neighbour score`
    /// 3. Score = accumulated sum / contributing neighbours
    /// 4. Confidence = contributing neighbours / retained neighbours
    /// 5. Drop manga missing from the catalog, return top-N by score
    pub fn recommend(
        &self,
        target_user_id: UserId,
        target_interactions: &[Interaction],
        all_users: &HashMap<UserId, Vec<Interaction>>,
        catalog: &Catalog,
        top_n: usize,
    ) -> Vec<CollaborativeRecommendation> {
        let neighbors = self.find_neighbors(target_user_id, target_interactions, all_users);

        if neighbors.is_empty() {
            debug!(
                user_id = target_user_id,
                "No similar users found for collaborative filtering"
            );
            return Vec::new();
        }

        let seen: HashSet<MangaId> = target_interactions.iter().map(|i| i.manga_id).collect();

        // manga_id → (weighted sum, contributing neighbours)
        let accumulated = neighbors
            .iter()
            .filter_map(|(user_id, similarity)| {
                all_users.get(user_id).map(|interactions| (interactions, *similarity))
            })
            .flat_map(|(interactions, similarity)| {
                interactions
                    .iter()
                    .filter(|i| !seen.contains(&i.manga_id))
                    .map(move |i| (i.manga_id, similarity * i.score))
            })
            .fold(
                BTreeMap::<MangaId, (f64, usize)>::new(),
                |mut acc, (manga_id, contribution)| {
                    let entry = acc.entry(manga_id).or_insert((0.0, 0));
                    entry.0 += contribution;
                    entry.1 += 1;
                    acc
                },
            );

        let neighbor_count = neighbors.len() as f64;
        let mut ranked: Vec<CollaborativeRecommendation> = accumulated
            .into_iter()
            .filter_map(|(manga_id, (sum, count))| {
                catalog.get(&manga_id).map(|manga| CollaborativeRecommendation {
                    manga: manga.clone(),
                    score: sum / count as f64,
                    confidence: count as f64 / neighbor_count,
                })
            })
            .collect();

        ranked.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        ranked.truncate(top_n);

        info!(
            user_id = target_user_id,
            neighbors = neighbors.len(),
            recommendations = ranked.len(),
            "Collaborative recommendations generated"
        );

        ranked
    }
}
