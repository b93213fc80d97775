use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub type UserId = i64;
pub type MangaId = i64;
pub type ChapterId = i64;

/// Candidate manga keyed by id
pub type Catalog = HashMap<MangaId, MangaFeatures>;

/// Normalized engagement signal of one user for one manga
///
/// `score` is in [0, 1] and is derived by the caller from read progress,
/// bookmarks and ratings. Callers supply at most one interaction per
/// (user, manga) pair; the engines do not deduplicate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Interaction {
    pub user_id: UserId,
    pub manga_id: MangaId,
    pub score: f64,
    pub timestamp: DateTime<Utc>,
}

/// Manga metadata used for content similarity and candidate scoring
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MangaFeatures {
    pub manga_id: MangaId,
    #[serde(default)]
    pub title: String,
    /// Genre tags; entries may also be raw comma-separated genre strings
    #[serde(default)]
    pub genres: Vec<String>,
    pub source: i64,
    #[serde(default)]
    pub status: i32,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub popularity: u32,
}

/// Per-manga reading history entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReadingHistory {
    pub manga_id: MangaId,
    pub chapters_read: u32,
    pub total_chapters: u32,
    pub time_spent_ms: i64,
    pub last_read: Option<DateTime<Utc>>,
    pub rating: Option<f32>,
}

impl ReadingHistory {
    /// Read progress in percent (0 when the chapter count is unknown)
    pub fn progress_percent(&self) -> f32 {
        if self.total_chapters > 0 {
            (self.chapters_read as f32 / self.total_chapters as f32) * 100.0
        } else {
            0.0
        }
    }
}

/// Genre weight extracted from reading history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenrePreference {
    pub genre: String,
    pub weight: f32,
}

/// Recommendation produced by the genre-affinity engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub manga_id: MangaId,
    pub title: String,
    pub score: f32,
    pub reason: String,
    pub genres: Vec<String>,
    pub author: Option<String>,
    pub status: i32,
}

/// "Because you read X" group
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BecauseYouReadGroup {
    pub source_manga_id: MangaId,
    pub source_manga_title: String,
    pub recommendations: Vec<Recommendation>,
}

/// Source id used for cache entries that are not tied to a specific manga
pub const GENERAL_RECOMMENDATIONS: MangaId = 0;

/// Cached recommendation row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CachedRecommendation {
    pub source_manga_id: MangaId,
    pub recommended_manga_id: MangaId,
    pub score: f64,
    pub reason: String,
    pub generated_at: DateTime<Utc>,
}
