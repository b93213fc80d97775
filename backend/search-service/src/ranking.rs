// ============================================
// Multi-Source Search Ranking
// ============================================
//
// Merges result pages from several sources into one ranked list:
// - de-duplicates by URL, remembering every source that returned an entry
// - scores title relevance, source reliability and library membership
// - stable sort, so equal scores keep first-seen order
//
// Score (0-100):
//   title match (0-50) + source reliability (10-20) - library penalty (10)

use crate::config::SearchConfig;
use crate::error::{SearchError, SearchResult};
use crate::models::{SearchManga, SourceResults};
use serde::Serialize;
use similarity_core::normalized_similarity;
use std::collections::{HashMap, HashSet};
use tracing::debug;

const EXACT_MATCH: f64 = 50.0;
const PREFIX_MATCH: f64 = 40.0;
const SUBSTRING_MATCH: f64 = 30.0;
const FUZZY_MATCH_SCALE: f64 = 20.0;
const MAX_SCORE: f64 = 100.0;

/// Reliability points per source name (case-insensitive)
#[derive(Debug, Clone, PartialEq)]
pub struct SourceReliability {
    points: HashMap<String, f64>,
    default_points: f64,
}

impl Default for SourceReliability {
    fn default() -> Self {
        Self {
            points: HashMap::from([
                ("mangadex".to_string(), 20.0),
                ("mangakakalot".to_string(), 15.0),
                ("manganato".to_string(), 15.0),
            ]),
            default_points: 10.0,
        }
    }
}

impl SourceReliability {
    /// Parse a `name=points,name=points` table
    pub fn parse(table: &str, default_points: f64) -> SearchResult<Self> {
        let points = table
            .split(',')
            .map(str::trim)
            .filter(|pair| !pair.is_empty())
            .map(|pair| {
                let (name, value) = pair.split_once('=').ok_or_else(|| {
                    SearchError::Config(format!("expected name=points, got '{}'", pair))
                })?;
                let value: f64 = value.trim().parse().map_err(|_| {
                    SearchError::Config(format!("invalid reliability points in '{}'", pair))
                })?;
                Ok((name.trim().to_lowercase(), value))
            })
            .collect::<SearchResult<HashMap<_, _>>>()?;

        Ok(Self {
            points,
            default_points,
        })
    }

    pub fn points(&self, source: &str) -> f64 {
        self.points
            .get(&source.to_lowercase())
            .copied()
            .unwrap_or(self.default_points)
    }
}

/// A de-duplicated, scored search result
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedManga {
    pub manga: SearchManga,
    pub score: f64,
    /// Every source that returned this entry, in encounter order
    pub sources: Vec<String>,
    pub is_in_library: bool,
}

impl RankedManga {
    pub fn confidence_badge(&self) -> &'static str {
        if self.score >= 80.0 {
            "Best match"
        } else if self.score >= 60.0 {
            "Great match"
        } else if self.score >= 40.0 {
            "Good match"
        } else {
            ""
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedResults {
    pub results: Vec<RankedManga>,
    pub total_count: usize,
    pub library_count: usize,
}

/// Search result ranker
#[derive(Debug, Clone)]
pub struct SearchRanker {
    reliability: SourceReliability,
    library_penalty: f64,
}

impl Default for SearchRanker {
    fn default() -> Self {
        Self {
            reliability: SourceReliability::default(),
            library_penalty: 10.0,
        }
    }
}

impl SearchRanker {
    pub fn new(reliability: SourceReliability, library_penalty: f64) -> Self {
        Self {
            reliability,
            library_penalty,
        }
    }

    pub fn with_config(config: &SearchConfig) -> SearchResult<Self> {
        Ok(Self::new(config.reliability()?, config.library_penalty))
    }

    /// Title relevance (0-50), case-insensitive
    ///
    /// An empty query is a prefix of every title.
    pub fn title_score(title: &str, query: &str) -> f64 {
        let title = title.to_lowercase();
        let query = query.to_lowercase();

        if title == query {
            EXACT_MATCH
        } else if title.starts_with(&query) {
            PREFIX_MATCH
        } else if title.contains(&query) {
            SUBSTRING_MATCH
        } else {
            normalized_similarity(&title, &query) * FUZZY_MATCH_SCALE
        }
    }

    /// Score one result as returned by `source`
    pub fn score(&self, manga: &SearchManga, source: &str, query: &str, in_library: bool) -> f64 {
        let mut score = Self::title_score(&manga.title, query) + self.reliability.points(source);
        if in_library {
            score -= self.library_penalty;
        }
        score.clamp(0.0, MAX_SCORE)
    }

    /// Merge, de-duplicate and rank per-source results
    ///
    /// Sources are processed in the given order; an entry is scored once, with
    /// the first source that returned it.
    pub fn rank_results(
        &self,
        per_source: &[SourceResults],
        library: &[SearchManga],
        query: &str,
    ) -> RankedResults {
        let library_urls: HashSet<&str> = library.iter().map(|m| m.url.as_str()).collect();

        let mut ranked: Vec<RankedManga> = Vec::new();
        let mut positions: HashMap<&str, usize> = HashMap::new();

        for page in per_source {
            for manga in &page.items {
                if let Some(&pos) = positions.get(manga.url.as_str()) {
                    let sources = &mut ranked[pos].sources;
                    if !sources.contains(&page.source) {
                        sources.push(page.source.clone());
                    }
                    continue;
                }

                let is_in_library = library_urls.contains(manga.url.as_str());
                positions.insert(manga.url.as_str(), ranked.len());
                ranked.push(RankedManga {
                    manga: manga.clone(),
                    score: self.score(manga, &page.source, query, is_in_library),
                    sources: vec![page.source.clone()],
                    is_in_library,
                });
            }
        }

        // sort_by is stable: ties keep first-seen order
        ranked.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));

        let library_count = ranked.iter().filter(|r| r.is_in_library).count();

        debug!(
            sources = per_source.len(),
            results = ranked.len(),
            library_count,
            "Search results ranked"
        );

        RankedResults {
            total_count: ranked.len(),
            library_count,
            results: ranked,
        }
    }
}

/// Rank with the default reliability table and library penalty
pub fn rank_results(
    per_source: &[SourceResults],
    library: &[SearchManga],
    query: &str,
) -> RankedResults {
    SearchRanker::default().rank_results(per_source, library, query)
}
