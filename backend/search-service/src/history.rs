use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

const MINUTE_MS: i64 = 60_000;
const HOUR_MS: i64 = 3_600_000;
const DAY_MS: i64 = 86_400_000;
const WEEK_MS: i64 = 604_800_000;

/// A single past search
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchHistoryItem {
    pub query: String,
    pub timestamp: DateTime<Utc>,
    pub result_count: u32,
}

impl SearchHistoryItem {
    /// Short age label: "Just now", "5m ago", "3h ago", "2d ago", "1w ago"
    pub fn relative_time(&self, now: DateTime<Utc>) -> String {
        let diff = (now - self.timestamp).num_milliseconds().max(0);

        if diff < MINUTE_MS {
            "Just now".to_string()
        } else if diff < HOUR_MS {
            format!("{}m ago", diff / MINUTE_MS)
        } else if diff < DAY_MS {
            format!("{}h ago", diff / HOUR_MS)
        } else if diff < WEEK_MS {
            format!("{}d ago", diff / DAY_MS)
        } else {
            format!("{}w ago", diff / WEEK_MS)
        }
    }
}

/// Bounded search history, newest first
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchHistory {
    items: Vec<SearchHistoryItem>,
    max_items: usize,
}

impl Default for SearchHistory {
    fn default() -> Self {
        Self::new(20)
    }
}

impl SearchHistory {
    pub fn new(max_items: usize) -> Self {
        Self {
            items: Vec::new(),
            max_items,
        }
    }

    /// Rebuild a history from stored items, keeping the newest `max_items`
    pub fn from_items(items: Vec<SearchHistoryItem>, max_items: usize) -> Self {
        let mut history = Self { items, max_items };
        history.normalize();
        history
    }

    /// Record a search; a repeated query moves to the top with the new count
    ///
    /// Blank queries are ignored.
    pub fn add(&mut self, query: &str, result_count: u32, now: DateTime<Utc>) {
        let query = query.trim();
        if query.is_empty() {
            return;
        }

        self.items.retain(|item| item.query != query);
        self.items.insert(
            0,
            SearchHistoryItem {
                query: query.to_string(),
                timestamp: now,
                result_count,
            },
        );
        self.normalize();
    }

    /// Remove a query; returns whether it was present
    pub fn remove(&mut self, query: &str) -> bool {
        let before = self.items.len();
        self.items.retain(|item| item.query != query.trim());
        self.items.len() != before
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn items(&self) -> &[SearchHistoryItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Entries whose query starts with `prefix`, ignoring case
    pub fn matching(&self, prefix: &str) -> Vec<&SearchHistoryItem> {
        let prefix = prefix.trim().to_lowercase();
        self.items
            .iter()
            .filter(|item| item.query.to_lowercase().starts_with(&prefix))
            .collect()
    }

    fn normalize(&mut self) {
        // stable: equal timestamps keep insertion order
        self.items.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        self.items.truncate(self.max_items);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_relative_time() {
        let now = Utc::now();
        let item = |ago: Duration| SearchHistoryItem {
            query: "q".to_string(),
            timestamp: now - ago,
            result_count: 0,
        };

        assert_eq!(item(Duration::seconds(30)).relative_time(now), "Just now");
        assert_eq!(item(Duration::minutes(5)).relative_time(now), "5m ago");
        assert_eq!(item(Duration::hours(3)).relative_time(now), "3h ago");
        assert_eq!(item(Duration::days(2)).relative_time(now), "2d ago");
        assert_eq!(item(Duration::days(15)).relative_time(now), "2w ago");
    }

    #[test]
    fn test_add_moves_repeated_query_to_top() {
        let mut history = SearchHistory::default();
        let now = Utc::now();

        history.add("berserk", 3, now);
        history.add("monster", 7, now + Duration::seconds(1));
        history.add("  berserk ", 12, now + Duration::seconds(2));
        history.add("   ", 1, now + Duration::seconds(3));

        let queries: Vec<&str> = history.items().iter().map(|i| i.query.as_str()).collect();
        assert_eq!(queries, vec!["berserk", "monster"]);
        assert_eq!(history.items()[0].result_count, 12);
    }

    #[test]
    fn test_capacity() {
        let mut history = SearchHistory::new(20);
        let start = Utc::now();
        for i in 0..25 {
            history.add(&format!("query {}", i), i, start + Duration::seconds(i64::from(i)));
        }

        assert_eq!(history.len(), 20);
        assert_eq!(history.items()[0].query, "query 24");
        assert_eq!(history.items()[19].query, "query 5");
    }

    #[test]
    fn test_remove_clear_and_matching() {
        let mut history = SearchHistory::default();
        let now = Utc::now();
        history.add("One Piece", 1, now);
        history.add("One Punch Man", 1, now + Duration::seconds(1));
        history.add("Dandadan", 1, now + Duration::seconds(2));

        let matches: Vec<&str> = history
            .matching("one p")
            .iter()
            .map(|i| i.query.as_str())
            .collect();
        assert_eq!(matches, vec!["One Punch Man", "One Piece"]);

        assert!(history.remove("Dandadan"));
        assert!(!history.remove("Dandadan"));
        assert_eq!(history.len(), 2);

        history.clear();
        assert!(history.is_empty());
    }
}
