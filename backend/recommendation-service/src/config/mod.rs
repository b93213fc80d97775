use crate::error::{AppError, Result};
use crate::models::UserId;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub service: ServiceConfig,
    pub recommendation: RecommendationConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServiceConfig {
    #[serde(default = "default_service_name")]
    pub service_name: String,
    /// JSON snapshot with interactions, reading history and catalog
    #[serde(default = "default_snapshot_path")]
    pub snapshot_path: String,
    /// Refresh only this user; every user in the snapshot when unset
    #[serde(default)]
    pub target_user_id: Option<UserId>,
    /// Emit logs as JSON lines instead of the human-readable format
    #[serde(default)]
    pub log_json: bool,
}

/// Scoring tunables
///
/// The collaborative and content floors (0.3 / 0.2) and the two oversampling
/// factors are kept as distinct knobs even though they default to related values.
#[derive(Debug, Clone, Deserialize)]
pub struct RecommendationConfig {
    /// Minimum items two users must share before their similarity counts
    #[serde(default = "default_min_common_items")]
    pub min_common_items: usize,
    /// Neighbours must be strictly above this similarity
    #[serde(default = "default_similarity_threshold")]
    pub similarity_threshold: f64,
    #[serde(default = "default_max_neighbors")]
    pub max_neighbors: usize,
    /// Content candidates must average strictly above this similarity
    #[serde(default = "default_content_similarity_floor")]
    pub content_similarity_floor: f64,
    /// History entries at or above this score form the liked set
    #[serde(default = "default_liked_score_threshold")]
    pub liked_score_threshold: f64,
    #[serde(default = "default_collaborative_weight")]
    pub collaborative_weight: f64,
    #[serde(default = "default_content_weight")]
    pub content_weight: f64,
    #[serde(default = "default_oversample")]
    pub collaborative_oversample: usize,
    #[serde(default = "default_oversample")]
    pub content_oversample: usize,
    #[serde(default = "default_top_n")]
    pub default_top_n: usize,
    /// Cached recommendations older than this are stale
    #[serde(default = "default_freshness_days")]
    pub freshness_days: u32,
    /// Reading time a history entry needs before its genres count
    #[serde(default = "default_min_genre_time_ms")]
    pub min_genre_time_ms: i64,
    /// Popularity at which the popularity score saturates at 1.0
    #[serde(default = "default_popularity_saturation")]
    pub popularity_saturation: u32,
    #[serde(default = "default_because_you_read_sources")]
    pub because_you_read_sources: usize,
    #[serde(default = "default_because_you_read_window_days")]
    pub because_you_read_window_days: u32,
    #[serde(default = "default_because_you_read_per_source")]
    pub because_you_read_per_source: usize,
}

impl Default for RecommendationConfig {
    fn default() -> Self {
        Self {
            min_common_items: default_min_common_items(),
            similarity_threshold: default_similarity_threshold(),
            max_neighbors: default_max_neighbors(),
            content_similarity_floor: default_content_similarity_floor(),
            liked_score_threshold: default_liked_score_threshold(),
            collaborative_weight: default_collaborative_weight(),
            content_weight: default_content_weight(),
            collaborative_oversample: default_oversample(),
            content_oversample: default_oversample(),
            default_top_n: default_top_n(),
            freshness_days: default_freshness_days(),
            min_genre_time_ms: default_min_genre_time_ms(),
            popularity_saturation: default_popularity_saturation(),
            because_you_read_sources: default_because_you_read_sources(),
            because_you_read_window_days: default_because_you_read_window_days(),
            because_you_read_per_source: default_because_you_read_per_source(),
        }
    }
}

/// Longest accepted freshness or reading window, roughly a century
pub const MAX_WINDOW_DAYS: u32 = 36_500;

impl RecommendationConfig {
    /// Reject tunables that would make scoring meaningless
    pub fn validate(&self) -> Result<()> {
        if self.min_common_items == 0 {
            return Err(AppError::Config(
                "min_common_items must be at least 1".to_string(),
            ));
        }
        if self.max_neighbors == 0 {
            return Err(AppError::Config("max_neighbors must be at least 1".to_string()));
        }
        if self.popularity_saturation == 0 {
            return Err(AppError::Config(
                "popularity_saturation must be positive".to_string(),
            ));
        }
        if self.freshness_days > MAX_WINDOW_DAYS {
            return Err(AppError::Config(format!(
                "freshness_days must be at most {}",
                MAX_WINDOW_DAYS
            )));
        }
        if self.because_you_read_window_days > MAX_WINDOW_DAYS {
            return Err(AppError::Config(format!(
                "because_you_read_window_days must be at most {}",
                MAX_WINDOW_DAYS
            )));
        }
        Ok(())
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let config = Config {
            service: envy::prefixed("SERVICE_").from_env::<ServiceConfig>()?,
            recommendation: envy::prefixed("RECOMMENDATION_").from_env::<RecommendationConfig>()?,
        };
        config.recommendation.validate()?;

        Ok(config)
    }
}

fn default_service_name() -> String {
    "recommendation-service".to_string()
}

fn default_snapshot_path() -> String {
    "./data/snapshot.json".to_string()
}

fn default_min_common_items() -> usize {
    3
}

fn default_similarity_threshold() -> f64 {
    0.3
}

fn default_max_neighbors() -> usize {
    20
}

fn default_content_similarity_floor() -> f64 {
    0.2
}

fn default_liked_score_threshold() -> f64 {
    0.7
}

fn default_collaborative_weight() -> f64 {
    0.7
}

fn default_content_weight() -> f64 {
    0.3
}

fn default_oversample() -> usize {
    2
}

fn default_top_n() -> usize {
    10
}

fn default_freshness_days() -> u32 {
    7
}

fn default_min_genre_time_ms() -> i64 {
    60_000 // 1 minute
}

fn default_popularity_saturation() -> u32 {
    1000
}

fn default_because_you_read_sources() -> usize {
    5
}

fn default_because_you_read_window_days() -> u32 {
    30
}

fn default_because_you_read_per_source() -> usize {
    5
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_documented_constants() {
        let config = RecommendationConfig::default();
        assert_eq!(config.min_common_items, 3);
        assert_eq!(config.similarity_threshold, 0.3);
        assert_eq!(config.max_neighbors, 20);
        assert_eq!(config.content_similarity_floor, 0.2);
        assert_eq!(config.liked_score_threshold, 0.7);
        assert_eq!(config.collaborative_weight, 0.7);
        assert_eq!(config.content_weight, 0.3);
        assert_eq!(config.collaborative_oversample, 2);
        assert_eq!(config.content_oversample, 2);
        assert_eq!(config.freshness_days, 7);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_prefixed_env_overrides() {
        let vars = vec![
            (
                "RECOMMENDATION_SIMILARITY_THRESHOLD".to_string(),
                "0.5".to_string(),
            ),
            ("RECOMMENDATION_MAX_NEIGHBORS".to_string(), "5".to_string()),
        ];

        let config: RecommendationConfig = envy::prefixed("RECOMMENDATION_")
            .from_iter(vars)
            .expect("config should parse");

        assert_eq!(config.similarity_threshold, 0.5);
        assert_eq!(config.max_neighbors, 5);
        // Untouched values fall back to defaults
        assert_eq!(config.min_common_items, 3);
    }

    #[test]
    fn test_validate_bounds_windows() {
        let freshness = RecommendationConfig {
            freshness_days: 200_000_000,
            ..RecommendationConfig::default()
        };
        assert!(matches!(freshness.validate(), Err(AppError::Config(_))));

        let reading = RecommendationConfig {
            because_you_read_window_days: MAX_WINDOW_DAYS + 1,
            ..RecommendationConfig::default()
        };
        assert!(matches!(reading.validate(), Err(AppError::Config(_))));

        let longest = RecommendationConfig {
            freshness_days: MAX_WINDOW_DAYS,
            because_you_read_window_days: MAX_WINDOW_DAYS,
            ..RecommendationConfig::default()
        };
        assert!(longest.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_neighbors() {
        let config = RecommendationConfig {
            max_neighbors: 0,
            ..RecommendationConfig::default()
        };
        assert!(matches!(config.validate(), Err(AppError::Config(_))));
    }

    #[test]
    fn test_service_config_from_env() {
        let vars = vec![
            ("SERVICE_TARGET_USER_ID".to_string(), "42".to_string()),
            ("SERVICE_LOG_JSON".to_string(), "true".to_string()),
        ];

        let service: ServiceConfig = envy::prefixed("SERVICE_")
            .from_iter(vars)
            .expect("config should parse");

        assert_eq!(service.target_user_id, Some(42));
        assert!(service.log_json);
        assert_eq!(service.snapshot_path, default_snapshot_path());
    }
}
