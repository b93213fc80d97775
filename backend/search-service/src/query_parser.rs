//! Query parsing
//!
//! Two front ends for the search box:
//! - `AuthorQuery` for `author:` / `artist:` / `a:` prefixed library filters
//! - `SmartQuery` for natural-language queries such as
//!   "completed romance like horimiya without drama"

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

// ============================================
// Author / artist prefixes
// ============================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthorField {
    Author,
    Artist,
    Both,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthorQuery {
    pub term: String,
    pub field: AuthorField,
}

const AUTHOR_PREFIXES: [(&str, AuthorField); 3] = [
    ("author:", AuthorField::Author),
    ("artist:", AuthorField::Artist),
    ("a:", AuthorField::Both),
];

impl AuthorQuery {
    /// Parse a prefixed query; `None` when there is no prefix or no term
    pub fn parse(query: &str) -> Option<Self> {
        let trimmed = query.trim();

        AUTHOR_PREFIXES.iter().find_map(|(prefix, field)| {
            let head = trimmed.get(..prefix.len())?;
            if !head.eq_ignore_ascii_case(prefix) {
                return None;
            }
            let term = trimmed[prefix.len()..].trim();
            (!term.is_empty()).then(|| AuthorQuery {
                term: term.to_string(),
                field: *field,
            })
        })
    }

    /// Case-insensitive substring match against the selected field(s)
    pub fn matches(&self, author: Option<&str>, artist: Option<&str>) -> bool {
        let term = self.term.to_lowercase();
        let contains = |value: Option<&str>| {
            value
                .map(|v| v.to_lowercase().contains(&term))
                .unwrap_or(false)
        };

        match self.field {
            AuthorField::Author => contains(author),
            AuthorField::Artist => contains(artist),
            AuthorField::Both => contains(author) || contains(artist),
        }
    }
}

// ============================================
// Natural-language queries
// ============================================

const GENRE_KEYWORDS: &[&str] = &[
    "action",
    "adventure",
    "comedy",
    "drama",
    "fantasy",
    "horror",
    "mystery",
    "romance",
    "sci-fi",
    "slice of life",
    "sports",
    "thriller",
    "isekai",
    "mecha",
    "psychological",
    "supernatural",
    "shounen",
    "shoujo",
    "seinen",
    "josei",
];

const THEME_KEYWORDS: &[&str] = &[
    "school",
    "magic",
    "demons",
    "vampires",
    "zombies",
    "ghosts",
    "robots",
    "aliens",
    "time travel",
    "reincarnation",
    "survival",
    "martial arts",
    "music",
    "cooking",
    "games",
    "virtual reality",
    "post-apocalyptic",
    "cyberpunk",
    "steampunk",
    "detective",
    "female protagonist",
    "male protagonist",
    "anti-hero",
    "villain",
];

const FILLER_WORDS: &[&str] = &[
    "with", "without", "like", "similar", "to", "something", "find", "me", "manga", "anime",
    "show", "get",
];

// Hardcoded patterns, compiled once
static EXCLUDE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:without|no|not)\s+(\w+)").expect("hardcoded exclude regex is invalid")
});

static MIN_CHAPTERS_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:at least|more than|over|\+)\s*(\d+)")
        .expect("hardcoded min chapters regex is invalid")
});

static MAX_CHAPTERS_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:less than|under|fewer than|shorter than|-)\s*(\d+)")
        .expect("hardcoded max chapters regex is invalid")
});

static SIMILAR_TO_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:like|similar to)\s+([\w\s]+?)(?:\s+(?:but|and|with|without)|\s*$)")
        .expect("hardcoded similar-to regex is invalid")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PublicationStatus {
    Ongoing,
    Completed,
    Hiatus,
    Cancelled,
}

/// Structured filters extracted from a free-text query
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SearchParameters {
    pub keywords: Vec<String>,
    pub genres: Vec<String>,
    pub themes: Vec<String>,
    pub exclude_genres: Vec<String>,
    pub status: Option<PublicationStatus>,
    pub min_chapters: Option<u32>,
    pub max_chapters: Option<u32>,
    pub similar_to: Option<String>,
}

impl SearchParameters {
    /// No keywords, genres or themes; chapter bounds and status alone don't count
    pub fn is_empty(&self) -> bool {
        self.keywords.is_empty() && self.genres.is_empty() && self.themes.is_empty()
    }
}

pub struct SmartQuery;

impl SmartQuery {
    pub fn parse(query: &str) -> SearchParameters {
        let query = query.to_lowercase();

        SearchParameters {
            keywords: keywords(&query),
            genres: contained(&query, GENRE_KEYWORDS),
            themes: contained(&query, THEME_KEYWORDS),
            exclude_genres: excluded(&query),
            status: status(&query),
            min_chapters: first_number(&MIN_CHAPTERS_PATTERN, &query),
            max_chapters: first_number(&MAX_CHAPTERS_PATTERN, &query),
            similar_to: similar_to(&query),
        }
    }
}

fn is_known_tag(word: &str) -> bool {
    GENRE_KEYWORDS.contains(&word) || THEME_KEYWORDS.contains(&word)
}

fn keywords(query: &str) -> Vec<String> {
    query
        .split(' ')
        .filter(|word| word.chars().count() > 2)
        .filter(|word| !is_known_tag(word) && !FILLER_WORDS.contains(word))
        .filter(|word| !word.chars().all(|c| c.is_ascii_digit()))
        .map(str::to_string)
        .collect()
}

fn contained(query: &str, table: &[&str]) -> Vec<String> {
    table
        .iter()
        .filter(|keyword| query.contains(*keyword))
        .map(|keyword| keyword.to_string())
        .collect()
}

fn excluded(query: &str) -> Vec<String> {
    EXCLUDE_PATTERN
        .captures_iter(query)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str())
        .filter(|word| is_known_tag(word))
        .map(str::to_string)
        .collect()
}

fn status(query: &str) -> Option<PublicationStatus> {
    if query.contains("ongoing") || query.contains("publishing") {
        Some(PublicationStatus::Ongoing)
    } else if query.contains("completed") || query.contains("finished") {
        Some(PublicationStatus::Completed)
    } else if query.contains("hiatus") {
        Some(PublicationStatus::Hiatus)
    } else if query.contains("cancelled") {
        Some(PublicationStatus::Cancelled)
    } else {
        None
    }
}

fn first_number(pattern: &Regex, query: &str) -> Option<u32> {
    pattern
        .captures(query)?
        .get(1)?
        .as_str()
        .parse()
        .ok()
}

fn similar_to(query: &str) -> Option<String> {
    let caps = SIMILAR_TO_PATTERN.captures(query)?;
    Some(caps.get(1)?.as_str().trim().to_string())
}
