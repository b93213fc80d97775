//! Recommendation refresh job
//!
//! Recomputes and stores a user's recommendations:
//!
//! 1. Evict cached entries older than the freshness window
//! 2. Load interactions, reading history and catalog
//! 3. Run the hybrid ranker (genre-affinity "For You" list when it is empty)
//! 4. Build the "Because you read" groups
//! 5. Store everything stamped with the refresh time
//!
//! Scheduling is left to the caller; a single pass is `refresh_users`.

use crate::config::RecommendationConfig;
use crate::error::Result;
use crate::models::{CachedRecommendation, UserId, GENERAL_RECOMMENDATIONS};
use crate::providers::{CatalogProvider, InteractionProvider, RecommendationStore};
use crate::services::{FreshnessPolicy, GenreAffinityEngine, HybridRecommendationEngine};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;

/// Outcome of refreshing one user
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RefreshReport {
    pub user_id: UserId,
    pub evicted: usize,
    pub general: usize,
    pub because_you_read: usize,
    /// General list came from genre affinity instead of the hybrid ranker
    pub used_fallback: bool,
}

/// Outcome of a refresh pass over several users
#[derive(Debug, Clone, Default, Serialize)]
pub struct RefreshSummary {
    pub reports: Vec<RefreshReport>,
    pub failed: Vec<UserId>,
}

pub struct RecommendationRefresher {
    interactions: Arc<dyn InteractionProvider>,
    catalog: Arc<dyn CatalogProvider>,
    store: Arc<dyn RecommendationStore>,
    hybrid: HybridRecommendationEngine,
    genre_affinity: GenreAffinityEngine,
    freshness: FreshnessPolicy,
    top_n: usize,
    per_source: usize,
}

impl RecommendationRefresher {
    pub fn new(
        interactions: Arc<dyn InteractionProvider>,
        catalog: Arc<dyn CatalogProvider>,
        store: Arc<dyn RecommendationStore>,
        config: &RecommendationConfig,
    ) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            interactions,
            catalog,
            store,
            hybrid: HybridRecommendationEngine::new(config)?,
            genre_affinity: GenreAffinityEngine::with_config(config),
            freshness: FreshnessPolicy::from_days(config.freshness_days),
            top_n: config.default_top_n,
            per_source: config.because_you_read_per_source,
        })
    }

    /// Refresh a single user's stored recommendations
    pub async fn refresh_user(&self, user_id: UserId, now: DateTime<Utc>) -> Result<RefreshReport> {
        let evicted = self
            .store
            .delete_older_than(user_id, self.freshness.cutoff(now))
            .await?;

        let history = self.interactions.user_interactions(user_id).await?;
        let all_users = self.interactions.all_interactions().await?;
        let reading = self.interactions.reading_history(user_id).await?;
        let catalog = self.catalog.candidates().await?;

        let hybrid = self
            .hybrid
            .recommend(user_id, &history, &all_users, &catalog, self.top_n);

        let used_fallback = hybrid.is_empty();
        let general: Vec<CachedRecommendation> = if used_fallback {
            self.genre_affinity
                .personalized(&reading, &catalog, self.top_n)
                .into_iter()
                .map(|rec| CachedRecommendation {
                    source_manga_id: GENERAL_RECOMMENDATIONS,
                    recommended_manga_id: rec.manga_id,
                    score: f64::from(rec.score),
                    reason: rec.reason,
                    generated_at: now,
                })
                .collect()
        } else {
            hybrid
                .into_iter()
                .map(|rec| CachedRecommendation {
                    source_manga_id: GENERAL_RECOMMENDATIONS,
                    recommended_manga_id: rec.manga.manga_id,
                    score: rec.final_score,
                    reason: rec.reason,
                    generated_at: now,
                })
                .collect()
        };

        let grouped: Vec<CachedRecommendation> = self
            .genre_affinity
            .because_you_read(&reading, &catalog, now, self.per_source)
            .into_iter()
            .flat_map(|group| {
                let source_manga_id = group.source_manga_id;
                group
                    .recommendations
                    .into_iter()
                    .map(move |rec| CachedRecommendation {
                        source_manga_id,
                        recommended_manga_id: rec.manga_id,
                        score: f64::from(rec.score),
                        reason: rec.reason,
                        generated_at: now,
                    })
            })
            .collect();

        let report = RefreshReport {
            user_id,
            evicted,
            general: general.len(),
            because_you_read: grouped.len(),
            used_fallback,
        };

        // A refresh owns the general list and every group it regenerated
        let mut sources = vec![GENERAL_RECOMMENDATIONS];
        sources.extend(grouped.iter().map(|entry| entry.source_manga_id));
        sources.dedup();

        let mut entries = general;
        entries.extend(grouped);
        self.store.replace(user_id, &sources, entries).await?;

        tracing::info!(
            user_id = user_id,
            evicted = report.evicted,
            general = report.general,
            because_you_read = report.because_you_read,
            used_fallback = report.used_fallback,
            "Recommendations refreshed"
        );

        Ok(report)
    }

    /// Refresh several users, logging and skipping the ones that fail
    pub async fn refresh_users(&self, user_ids: &[UserId], now: DateTime<Utc>) -> RefreshSummary {
        let started = Instant::now();
        let mut summary = RefreshSummary::default();

        for &user_id in user_ids {
            match self.refresh_user(user_id, now).await {
                Ok(report) => summary.reports.push(report),
                Err(e) => {
                    tracing::warn!(user_id = user_id, error = %e, "Recommendation refresh failed");
                    summary.failed.push(user_id);
                }
            }
        }

        tracing::info!(
            refreshed = summary.reports.len(),
            failed = summary.failed.len(),
            duration_ms = started.elapsed().as_millis() as u64,
            "Recommendation refresh pass completed"
        );

        summary
    }
}
