use crate::history::{SearchHistory, SearchHistoryItem};
use serde::Serialize;

/// Where autocomplete suggestions come from besides search history
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuggestionSources {
    pub trending: Vec<String>,
    pub library_titles: Vec<String>,
    pub authors: Vec<String>,
}

impl Default for SuggestionSources {
    fn default() -> Self {
        Self {
            trending: [
                "Solo Leveling",
                "Chainsaw Man",
                "Jujutsu Kaisen",
                "One Piece",
                "Blue Lock",
                "Spy x Family",
                "My Hero Academia",
                "Attack on Titan",
                "Demon Slayer",
                "Kaguya-sama",
            ]
            .iter()
            .map(|title| title.to_string())
            .collect(),
            library_titles: Vec::new(),
            authors: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchSuggestions {
    pub history: Vec<SearchHistoryItem>,
    pub trending: Vec<String>,
    pub library_titles: Vec<String>,
    pub authors: Vec<String>,
}

/// Combine suggestions for the text typed so far
///
/// History, library titles and authors are filtered by case-insensitive
/// substring; trending searches are always returned in full.
pub fn suggestions(
    query: &str,
    history: &SearchHistory,
    sources: &SuggestionSources,
) -> SearchSuggestions {
    let needle = query.to_lowercase();
    let matches = |text: &str| text.to_lowercase().contains(&needle);

    SearchSuggestions {
        history: history
            .items()
            .iter()
            .filter(|item| matches(&item.query))
            .cloned()
            .collect(),
        trending: sources.trending.clone(),
        library_titles: sources
            .library_titles
            .iter()
            .filter(|title| matches(title))
            .cloned()
            .collect(),
        authors: sources
            .authors
            .iter()
            .filter(|author| matches(author))
            .cloned()
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    #[test]
    fn test_filters_everything_but_trending() {
        let now = Utc::now();
        let mut history = SearchHistory::default();
        history.add("Dandadan", 5, now);
        history.add("Dragon Ball", 9, now + Duration::seconds(1));

        let sources = SuggestionSources {
            library_titles: vec!["Blue Period".to_string(), "Dr. Stone".to_string()],
            authors: vec!["Akira Toriyama".to_string(), "Yukinobu Tatsu".to_string()],
            ..SuggestionSources::default()
        };

        let result = suggestions("DR", &history, &sources);

        let history_queries: Vec<&str> = result.history.iter().map(|i| i.query.as_str()).collect();
        assert_eq!(history_queries, vec!["Dragon Ball"]);
        assert_eq!(result.library_titles, vec!["Dr. Stone"]);
        assert!(result.authors.is_empty());
        assert_eq!(result.trending.len(), 10);
        assert_eq!(result.trending[0], "Solo Leveling");
    }

    #[test]
    fn test_empty_query_matches_all() {
        let mut history = SearchHistory::default();
        history.add("monster", 1, Utc::now());

        let result = suggestions("", &history, &SuggestionSources::default());
        assert_eq!(result.history.len(), 1);
    }
}
