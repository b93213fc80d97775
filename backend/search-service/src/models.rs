use serde::{Deserialize, Serialize};

/// Manga entry as returned by a source search
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchManga {
    /// Identity of the entry across sources
    pub url: String,
    pub title: String,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub artist: Option<String>,
    #[serde(default)]
    pub thumbnail_url: Option<String>,
}

impl SearchManga {
    pub fn new(url: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            title: title.into(),
            author: None,
            artist: None,
            thumbnail_url: None,
        }
    }
}

/// One source's result page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceResults {
    pub source: String,
    pub items: Vec<SearchManga>,
}

impl SourceResults {
    pub fn new(source: impl Into<String>, items: Vec<SearchManga>) -> Self {
        Self {
            source: source.into(),
            items,
        }
    }
}
