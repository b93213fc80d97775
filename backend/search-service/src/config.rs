use crate::error::SearchResult;
use crate::ranking::SourceReliability;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct SearchConfig {
    /// Search history entries kept, newest first
    #[serde(default = "default_max_history_items")]
    pub max_history_items: usize,
    /// Points subtracted from results already in the library
    #[serde(default = "default_library_penalty")]
    pub library_penalty: f64,
    /// Reliability points for sources missing from the table
    #[serde(default = "default_source_reliability")]
    pub default_source_reliability: f64,
    /// Per-source reliability points as `name=points` pairs, comma separated
    #[serde(default = "default_source_reliability_table")]
    pub source_reliability: String,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_history_items: default_max_history_items(),
            library_penalty: default_library_penalty(),
            default_source_reliability: default_source_reliability(),
            source_reliability: default_source_reliability_table(),
        }
    }
}

impl SearchConfig {
    pub fn from_env() -> SearchResult<Self> {
        dotenvy::dotenv().ok();
        Ok(envy::prefixed("SEARCH_").from_env::<SearchConfig>()?)
    }

    pub fn reliability(&self) -> SearchResult<SourceReliability> {
        SourceReliability::parse(&self.source_reliability, self.default_source_reliability)
    }
}

fn default_max_history_items() -> usize {
    20
}

fn default_library_penalty() -> f64 {
    10.0
}

fn default_source_reliability() -> f64 {
    10.0
}

fn default_source_reliability_table() -> String {
    "mangadex=20,mangakakalot=15,manganato=15".to_string()
}
