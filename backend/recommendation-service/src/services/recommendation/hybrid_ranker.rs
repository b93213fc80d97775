// ============================================
// Hybrid Recommendation Ranker
// ============================================
//
// Blends collaborative filtering and content-based filtering with fixed
// weights. Users without similar neighbours fall back to a pure content
// ranking: the collaborative component is simply absent.

use crate::config::RecommendationConfig;
use crate::error::{AppError, Result};
use crate::models::{Catalog, Interaction, MangaFeatures, MangaId, UserId};
use crate::services::recommendation::{
    CollaborativeConfig, CollaborativeFilteringEngine, ContentBasedEngine,
};
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use tracing::info;

/// Hybrid ranker weights
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HybridWeights {
    pub collaborative: f64,
    pub content_based: f64,
}

impl Default for HybridWeights {
    fn default() -> Self {
        Self {
            collaborative: 0.7,
            content_based: 0.3,
        }
    }
}

impl HybridWeights {
    /// Weights must be finite and non-negative. They are not required to sum
    /// to 1.0 and final scores are never re-normalized.
    pub fn validate(&self) -> Result<()> {
        for (name, weight) in [
            ("collaborative", self.collaborative),
            ("content_based", self.content_based),
        ] {
            if !weight.is_finite() || weight < 0.0 {
                return Err(AppError::InvalidWeights(format!(
                    "{} weight must be finite and non-negative (got {})",
                    name, weight
                )));
            }
        }
        Ok(())
    }
}

/// Blended recommendation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HybridRecommendation {
    pub manga: MangaFeatures,
    /// Weighted collaborative component
    pub collaborative_score: f64,
    /// Weighted content component
    pub content_score: f64,
    pub final_score: f64,
    pub confidence: f64,
    pub reason: String,
}

/// Hybrid recommendation engine
#[derive(Debug, Clone)]
pub struct HybridRecommendationEngine {
    collaborative: CollaborativeFilteringEngine,
    content: ContentBasedEngine,
    weights: HybridWeights,
    liked_score_threshold: f64,
    collaborative_oversample: usize,
    content_oversample: usize,
}

impl Default for HybridRecommendationEngine {
    fn default() -> Self {
        Self {
            collaborative: CollaborativeFilteringEngine::new(),
            content: ContentBasedEngine::new(),
            weights: HybridWeights::default(),
            liked_score_threshold: 0.7,
            collaborative_oversample: 2,
            content_oversample: 2,
        }
    }
}

impl HybridRecommendationEngine {
    /// Create an engine from service configuration
    pub fn new(config: &RecommendationConfig) -> Result<Self> {
        let weights = HybridWeights {
            collaborative: config.collaborative_weight,
            content_based: config.content_weight,
        };
        weights.validate()?;

        Ok(Self {
            collaborative: CollaborativeFilteringEngine::with_config(CollaborativeConfig::from(
                config,
            )),
            content: ContentBasedEngine::with_config(config),
            weights,
            liked_score_threshold: config.liked_score_threshold,
            collaborative_oversample: config.collaborative_oversample,
            content_oversample: config.content_oversample,
        })
    }

    pub fn weights(&self) -> HybridWeights {
        self.weights
    }

    /// Get top-N blended recommendations for a user
    ///
    /// Algorithm:
    /// 1. Collaborative candidates (oversampled)
    /// 2. Content candidates among manga the user has not interacted with,
    ///    seeded by the liked set (history entries at or above the liked
    ///    threshold, resolved through the full candidate map)
    /// 3. Weight both, merge by manga id, rank by summed score
    pub fn recommend(
        &self,
        user_id: UserId,
        history: &[Interaction],
        all_users: &HashMap<UserId, Vec<Interaction>>,
        candidates: &Catalog,
        top_n: usize,
    ) -> Vec<HybridRecommendation> {
        let collaborative_recs = self.collaborative.recommend(
            user_id,
            history,
            all_users,
            candidates,
            top_n.saturating_mul(self.collaborative_oversample),
        );

        let interacted: HashSet<MangaId> = history.iter().map(|i| i.manga_id).collect();

        let liked: Vec<MangaFeatures> = history
            .iter()
            .filter(|i| i.score >= self.liked_score_threshold)
            .filter_map(|i| candidates.get(&i.manga_id).cloned())
            .collect();

        let mut unread: Vec<MangaFeatures> = candidates
            .values()
            .filter(|manga| !interacted.contains(&manga.manga_id))
            .cloned()
            .collect();
        unread.sort_by_key(|manga| manga.manga_id);

        let content_recs = self.content.recommend(
            &liked,
            &unread,
            top_n.saturating_mul(self.content_oversample),
        );

        let collaborative_count = collaborative_recs.len();
        let content_count = content_recs.len();

        let mut blended: Vec<HybridRecommendation> = collaborative_recs
            .into_iter()
            .map(|rec| {
                let confidence = rec.confidence;
                HybridRecommendation {
                    manga: rec.manga,
                    collaborative_score: rec.score * self.weights.collaborative,
                    content_score: 0.0,
                    final_score: 0.0,
                    confidence,
                    reason: format!(
                        "Liked by {}% of similar users",
                        (confidence * 100.0) as i64
                    ),
                }
            })
            .collect();
        let mut index: HashMap<MangaId, usize> = blended
            .iter()
            .enumerate()
            .map(|(pos, rec)| (rec.manga.manga_id, pos))
            .collect();

        for rec in content_recs {
            let weighted = rec.score * self.weights.content_based;
            match index.get(&rec.manga.manga_id) {
                Some(&pos) => {
                    let existing = &mut blended[pos];
                    existing.content_score = weighted;
                    existing.reason = format!("{} • Similar to what you like", existing.reason);
                }
                None => {
                    index.insert(rec.manga.manga_id, blended.len());
                    let reason = format!(
                        "Similar to: {}",
                        rec.matched_features
                            .iter()
                            .take(3)
                            .cloned()
                            .collect::<Vec<_>>()
                            .join(", ")
                    );
                    blended.push(HybridRecommendation {
                        manga: rec.manga,
                        collaborative_score: 0.0,
                        content_score: weighted,
                        final_score: 0.0,
                        confidence: rec.score,
                        reason,
                    });
                }
            }
        }

        for rec in blended.iter_mut() {
            rec.final_score = rec.collaborative_score + rec.content_score;
        }

        blended.sort_by(|a, b| {
            b.final_score
                .partial_cmp(&a.final_score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        blended.truncate(top_n);

        info!(
            user_id = user_id,
            collaborative_candidates = collaborative_count,
            content_candidates = content_count,
            recommendations = blended.len(),
            "Hybrid recommendations generated"
        );

        blended
    }
}
