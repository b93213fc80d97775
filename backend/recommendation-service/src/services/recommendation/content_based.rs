// ============================================
// Content-Based Filtering Engine
// ============================================
//
// Builds a categorical feature set per manga (genre tags, source, status)
// and scores candidates by their mean Jaccard similarity to the manga a
// user already liked.

use crate::config::RecommendationConfig;
use crate::models::{MangaFeatures, MangaId};
use serde::Serialize;
use similarity_core::jaccard_similarity;
use std::collections::HashSet;
use tracing::debug;

/// Candidate produced by content-based filtering
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContentRecommendation {
    pub manga: MangaFeatures,
    /// Mean similarity to every liked manga
    pub score: f64,
    /// Candidate features shared with at least one liked manga
    pub matched_features: Vec<String>,
}

/// Content-based filtering engine
#[derive(Debug, Clone)]
pub struct ContentBasedEngine {
    similarity_floor: f64,
}

impl Default for ContentBasedEngine {
    fn default() -> Self {
        Self {
            similarity_floor: 0.2,
        }
    }
}

impl ContentBasedEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: &RecommendationConfig) -> Self {
        Self {
            similarity_floor: config.content_similarity_floor,
        }
    }

    pub fn similarity_floor(&self) -> f64 {
        self.similarity_floor
    }

    /// Extract the categorical feature tags of a manga
    ///
    /// Genre entries may hold comma-separated lists; each tag is trimmed and
    /// lowercased and blanks are dropped. `source_<id>` and `status_<id>` are
    /// always appended. First-seen order is kept and duplicates removed.
    pub fn extract_features(manga: &MangaFeatures) -> Vec<String> {
        let genre_tags = manga
            .genres
            .iter()
            .flat_map(|entry| entry.split(','))
            .map(|tag| tag.trim().to_lowercase())
            .filter(|tag| !tag.is_empty());

        let mut seen = HashSet::new();
        genre_tags
            .chain([
                format!("source_{}", manga.source),
                format!("status_{}", manga.status),
            ])
            .filter(|tag| seen.insert(tag.clone()))
            .collect()
    }

    fn feature_set(manga: &MangaFeatures) -> HashSet<String> {
        Self::extract_features(manga).into_iter().collect()
    }

    /// Jaccard similarity between the feature sets of two manga
    pub fn manga_similarity(&self, manga_a: &MangaFeatures, manga_b: &MangaFeatures) -> f64 {
        jaccard_similarity(&Self::feature_set(manga_a), &Self::feature_set(manga_b))
    }

    /// Recommend candidates similar to the liked manga
    ///
    /// Liked manga are never recommended back. Candidates keep their input
    /// order on equal scores.
    pub fn recommend(
        &self,
        liked: &[MangaFeatures],
        candidates: &[MangaFeatures],
        top_n: usize,
    ) -> Vec<ContentRecommendation> {
        if liked.is_empty() {
            return Vec::new();
        }

        let liked_ids: HashSet<MangaId> = liked.iter().map(|m| m.manga_id).collect();
        let liked_sets: Vec<HashSet<String>> = liked.iter().map(Self::feature_set).collect();
        let liked_union: HashSet<&String> = liked_sets.iter().flatten().collect();

        let mut ranked: Vec<ContentRecommendation> = candidates
            .iter()
            .filter(|candidate| !liked_ids.contains(&candidate.manga_id))
            .filter_map(|candidate| {
                let features = Self::extract_features(candidate);
                let feature_set: HashSet<String> = features.iter().cloned().collect();

                let total: f64 = liked_sets
                    .iter()
                    .map(|liked_set| jaccard_similarity(&feature_set, liked_set))
                    .sum();
                let score = total / liked_sets.len() as f64;

                if score <= self.similarity_floor {
                    return None;
                }

                let matched_features = features
                    .into_iter()
                    .filter(|feature| liked_union.contains(feature))
                    .collect();

                Some(ContentRecommendation {
                    manga: candidate.clone(),
                    score,
                    matched_features,
                })
            })
            .collect();

        ranked.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        ranked.truncate(top_n);

        debug!(
            liked = liked.len(),
            candidates = candidates.len(),
            recommendations = ranked.len(),
            "Content-based recommendations generated"
        );

        ranked
    }
}
