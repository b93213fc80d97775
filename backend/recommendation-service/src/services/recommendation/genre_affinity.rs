// ============================================
// Genre Affinity Recommendations
// ============================================
//
// Lightweight single-user recommendations driven by reading history:
// - "For You": genre overlap with the user's most-read genres + popularity
// - "Because you read X": manga sharing genres with recently read titles
//
// Works without any other user's data, so it doubles as the cold-start
// fallback when the hybrid ranker has nothing to offer.

use crate::config::RecommendationConfig;
use crate::models::{
    BecauseYouReadGroup, Catalog, GenrePreference, Interaction, MangaFeatures, MangaId,
    ReadingHistory, Recommendation, UserId,
};
use chrono::{DateTime, Duration, Utc};
use std::collections::{HashMap, HashSet};
use tracing::{debug, info};

const GENRE_WEIGHT: f32 = 0.7;
const POPULARITY_WEIGHT: f32 = 0.3;
const MS_PER_MINUTE: f32 = 60_000.0;

/// Split raw genre entries into trimmed, non-blank tags (case preserved)
pub fn genre_tags(manga: &MangaFeatures) -> Vec<String> {
    manga
        .genres
        .iter()
        .flat_map(|entry| entry.split(','))
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(str::to_string)
        .collect()
}

/// Case-insensitive Jaccard similarity between two genre lists
pub fn genre_similarity(genres_a: &[String], genres_b: &[String]) -> f32 {
    let set_a: HashSet<String> = genres_a.iter().map(|g| g.to_lowercase()).collect();
    let set_b: HashSet<String> = genres_b.iter().map(|g| g.to_lowercase()).collect();

    similarity_core::jaccard_similarity(&set_a, &set_b) as f32
}

/// Derive a normalized interaction from a reading history entry
///
/// Rated entries blend progress (70%) with the 5-star rating (30%);
/// unrated entries use progress alone.
pub fn interaction_from_history(
    user_id: UserId,
    history: &ReadingHistory,
    now: DateTime<Utc>,
) -> Interaction {
    let progress = f64::from(history.progress_percent()) / 100.0;
    let score = match history.rating {
        Some(rating) => 0.7 * progress + 0.3 * (f64::from(rating) / 5.0),
        None => progress,
    };

    Interaction {
        user_id,
        manga_id: history.manga_id,
        score: score.clamp(0.0, 1.0),
        timestamp: history.last_read.unwrap_or(now),
    }
}

/// Genre-affinity recommendation engine
#[derive(Debug, Clone)]
pub struct GenreAffinityEngine {
    min_genre_time_ms: i64,
    popularity_saturation: u32,
    recent_sources: usize,
    recent_window: Duration,
}

impl Default for GenreAffinityEngine {
    fn default() -> Self {
        Self::with_config(&RecommendationConfig::default())
    }
}

impl GenreAffinityEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: &RecommendationConfig) -> Self {
        Self {
            min_genre_time_ms: config.min_genre_time_ms,
            popularity_saturation: config.popularity_saturation.max(1),
            recent_sources: config.because_you_read_sources,
            recent_window: Duration::days(i64::from(config.because_you_read_window_days)),
        }
    }

    /// Popularity normalized to [0, 1], saturating at the configured count
    pub fn popularity_score(&self, popularity: u32) -> f32 {
        (popularity as f32 / self.popularity_saturation as f32).min(1.0)
    }

    /// Rank genres by minutes spent reading manga that carry them
    ///
    /// Entries below the minimum reading time are ignored. Genres are grouped
    /// case-insensitively and keep the first spelling seen.
    pub fn top_genres(&self, history: &[ReadingHistory], catalog: &Catalog) -> Vec<GenrePreference> {
        let mut preferences: Vec<GenrePreference> = Vec::new();
        let mut index: HashMap<String, usize> = HashMap::new();

        for entry in history
            .iter()
            .filter(|entry| entry.time_spent_ms >= self.min_genre_time_ms)
        {
            let Some(manga) = catalog.get(&entry.manga_id) else {
                continue;
            };
            let weight = entry.time_spent_ms as f32 / MS_PER_MINUTE;

            for genre in genre_tags(manga) {
                match index.get(&genre.to_lowercase()) {
                    Some(&pos) => preferences[pos].weight += weight,
                    None => {
                        index.insert(genre.to_lowercase(), preferences.len());
                        preferences.push(GenrePreference { genre, weight });
                    }
                }
            }
        }

        preferences.sort_by(|a, b| {
            b.weight
                .partial_cmp(&a.weight)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        preferences
    }

    /// "For You" recommendations
    ///
    /// Falls back to the most popular catalog entries when the history
    /// yields no genre preferences.
    pub fn personalized(
        &self,
        history: &[ReadingHistory],
        catalog: &Catalog,
        limit: usize,
    ) -> Vec<Recommendation> {
        let top_genres = self.top_genres(history, catalog);
        if top_genres.is_empty() {
            debug!("No genre preferences yet, using popularity fallback");
            return self.popular(catalog, limit);
        }

        let read: HashSet<MangaId> = history.iter().map(|entry| entry.manga_id).collect();
        let user_genres: Vec<String> = top_genres.iter().map(|p| p.genre.clone()).collect();
        let reason_genres = &user_genres[..user_genres.len().min(3)];

        let mut scored: Vec<(&MangaFeatures, Vec<String>, f32)> = sorted_by_id(catalog)
            .into_iter()
            .filter(|manga| !read.contains(&manga.manga_id))
            .map(|manga| {
                let tags = genre_tags(manga);
                let score = GENRE_WEIGHT * genre_similarity(&user_genres, &tags)
                    + POPULARITY_WEIGHT * self.popularity_score(manga.popularity);
                (manga, tags, score)
            })
            .collect();

        scored.sort_by(|a, b| b.2.partial_cmp(&a.2).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(limit);

        info!(
            top_genres = top_genres.len(),
            recommendations = scored.len(),
            "Personalized recommendations generated"
        );

        scored
            .into_iter()
            .map(|(manga, tags, score)| {
                let reason = taste_reason(reason_genres, &tags);
                to_recommendation(manga, tags, score, reason)
            })
            .collect()
    }

    /// Most popular catalog entries
    pub fn popular(&self, catalog: &Catalog, limit: usize) -> Vec<Recommendation> {
        let mut ranked = sorted_by_id(catalog);
        ranked.sort_by(|a, b| b.popularity.cmp(&a.popularity));

        ranked
            .into_iter()
            .take(limit)
            .map(|manga| {
                to_recommendation(
                    manga,
                    genre_tags(manga),
                    self.popularity_score(manga.popularity),
                    "Popular among readers".to_string(),
                )
            })
            .collect()
    }

    /// "Because you read X" groups for recently read manga
    ///
    /// Takes the most recently read entries inside the window, newest first.
    /// Each one yields the catalog manga with the highest genre overlap,
    /// excluding the recent set itself and manga sharing no genre at all.
    /// Sources without tags, title or any similar manga are skipped.
    pub fn because_you_read(
        &self,
        history: &[ReadingHistory],
        catalog: &Catalog,
        now: DateTime<Utc>,
        limit_per_source: usize,
    ) -> Vec<BecauseYouReadGroup> {
        let since = now
            .checked_sub_signed(self.recent_window)
            .unwrap_or(DateTime::<Utc>::MIN_UTC);

        let mut recent: Vec<(MangaId, DateTime<Utc>)> = history
            .iter()
            .filter_map(|entry| entry.last_read.map(|read_at| (entry.manga_id, read_at)))
            .filter(|(_, read_at)| *read_at >= since)
            .collect();
        recent.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        recent.truncate(self.recent_sources);

        let excluded: HashSet<MangaId> = recent.iter().map(|(id, _)| *id).collect();
        let pool: Vec<&MangaFeatures> = sorted_by_id(catalog)
            .into_iter()
            .filter(|manga| !excluded.contains(&manga.manga_id))
            .collect();

        let groups: Vec<BecauseYouReadGroup> = recent
            .iter()
            .filter_map(|(manga_id, _)| {
                let source = catalog.get(manga_id)?;
                let source_tags = genre_tags(source);
                if source_tags.is_empty() || source.title.trim().is_empty() {
                    return None;
                }

                let mut similar: Vec<(&MangaFeatures, Vec<String>, f32)> = pool
                    .iter()
                    .map(|manga| {
                        let tags = genre_tags(manga);
                        let similarity = genre_similarity(&source_tags, &tags);
                        (*manga, tags, similarity)
                    })
                    .filter(|(_, _, similarity)| *similarity > 0.0)
                    .collect();
                similar.sort_by(|a, b| b.2.partial_cmp(&a.2).unwrap_or(std::cmp::Ordering::Equal));
                similar.truncate(limit_per_source);

                if similar.is_empty() {
                    return None;
                }

                let reason = format!("Similar to {}", source.title);
                let recommendations = similar
                    .into_iter()
                    .map(|(manga, tags, similarity)| {
                        to_recommendation(manga, tags, similarity, reason.clone())
                    })
                    .collect();

                Some(BecauseYouReadGroup {
                    source_manga_id: source.manga_id,
                    source_manga_title: source.title.clone(),
                    recommendations,
                })
            })
            .collect();

        info!(
            recent_sources = recent.len(),
            groups = groups.len(),
            "Because-you-read recommendations generated"
        );

        groups
    }
}

fn sorted_by_id(catalog: &Catalog) -> Vec<&MangaFeatures> {
    let mut items: Vec<&MangaFeatures> = catalog.values().collect();
    items.sort_by_key(|manga| manga.manga_id);
    items
}

fn to_recommendation(
    manga: &MangaFeatures,
    genres: Vec<String>,
    score: f32,
    reason: String,
) -> Recommendation {
    Recommendation {
        manga_id: manga.manga_id,
        title: manga.title.clone(),
        score,
        reason,
        genres,
        author: Some(manga.author.clone()).filter(|author| !author.trim().is_empty()),
        status: manga.status,
    }
}

fn taste_reason(user_genres: &[String], manga_genres: &[String]) -> String {
    let matching: Vec<&String> = user_genres
        .iter()
        .filter(|genre| manga_genres.iter().any(|g| g.eq_ignore_ascii_case(genre)))
        .collect();

    match matching.as_slice() {
        [] => "Popular in your reading list".to_string(),
        [only] => format!("Because you like {}", only),
        [first, second] => format!("Matches your taste: {} and {}", first, second),
        [first, second, ..] => format!("Matches your taste: {}, {}, and more", first, second),
    }
}
