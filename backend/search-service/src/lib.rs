//! Manga search support
//!
//! - Ranking and de-duplication of results gathered from several sources
//! - Search history and saved searches, with a tagged record codec
//! - Author prefixes and natural-language query parsing
//! - Autocomplete suggestions

pub mod codec;
pub mod config;
pub mod error;
pub mod history;
pub mod models;
pub mod query_parser;
pub mod ranking;
pub mod saved_search;
pub mod suggestions;

pub use config::SearchConfig;
pub use error::{SearchError, SearchResult};
pub use history::{SearchHistory, SearchHistoryItem};
pub use models::{SearchManga, SourceResults};
pub use query_parser::{AuthorField, AuthorQuery, PublicationStatus, SearchParameters, SmartQuery};
pub use ranking::{rank_results, RankedManga, RankedResults, SearchRanker, SourceReliability};
pub use saved_search::{SavedSearch, SavedSearchAlert, SavedSearches, SearchFilters};
pub use suggestions::{suggestions, SearchSuggestions, SuggestionSources};
