use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::info;
use uuid::Uuid;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchFilters {
    #[serde(default)]
    pub sources: Vec<String>,
    #[serde(default)]
    pub genres: Vec<String>,
    #[serde(default)]
    pub status: Option<String>,
}

/// A search the user asked to keep and be alerted about
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedSearch {
    pub id: Uuid,
    pub query: String,
    #[serde(default)]
    pub filters: SearchFilters,
    pub created_at: DateTime<Utc>,
    pub last_checked_at: DateTime<Utc>,
    pub last_result_count: u32,
    pub notify_on_new_results: bool,
}

impl SavedSearch {
    pub fn has_new_results(&self, current_count: u32) -> bool {
        current_count > self.last_result_count
    }

    pub fn new_result_count(&self, current_count: u32) -> u32 {
        current_count.saturating_sub(self.last_result_count)
    }
}

/// New results found for a saved search
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SavedSearchAlert {
    pub id: Uuid,
    pub query: String,
    pub new_results: u32,
}

/// Collection of saved searches
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SavedSearches {
    searches: Vec<SavedSearch>,
}

impl SavedSearches {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_searches(searches: Vec<SavedSearch>) -> Self {
        Self { searches }
    }

    /// Save a query with notifications enabled
    pub fn save(&mut self, query: &str, filters: SearchFilters, now: DateTime<Utc>) -> SavedSearch {
        let saved = SavedSearch {
            id: Uuid::new_v4(),
            query: query.trim().to_string(),
            filters,
            created_at: now,
            last_checked_at: now,
            last_result_count: 0,
            notify_on_new_results: true,
        };
        self.searches.push(saved.clone());
        saved
    }

    pub fn delete(&mut self, id: Uuid) -> bool {
        let before = self.searches.len();
        self.searches.retain(|search| search.id != id);
        self.searches.len() != before
    }

    pub fn get(&self, id: Uuid) -> Option<&SavedSearch> {
        self.searches.iter().find(|search| search.id == id)
    }

    pub fn update_last_checked(&mut self, id: Uuid, result_count: u32, now: DateTime<Utc>) -> bool {
        match self.searches.iter_mut().find(|search| search.id == id) {
            Some(search) => {
                search.last_checked_at = now;
                search.last_result_count = result_count;
                true
            }
            None => false,
        }
    }

    pub fn toggle_notifications(&mut self, id: Uuid, enabled: bool) -> bool {
        match self.searches.iter_mut().find(|search| search.id == id) {
            Some(search) => {
                search.notify_on_new_results = enabled;
                true
            }
            None => false,
        }
    }

    /// Saved searches, newest first
    pub fn list(&self) -> Vec<&SavedSearch> {
        let mut searches: Vec<&SavedSearch> = self.searches.iter().collect();
        searches.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        searches
    }

    /// Compare current result counts against the last check
    ///
    /// Only searches with notifications enabled and a count in
    /// `current_counts` are considered. Searches with new results produce an
    /// alert and have their last-checked state updated; the rest are left
    /// untouched.
    pub fn check(
        &mut self,
        current_counts: &HashMap<Uuid, u32>,
        now: DateTime<Utc>,
    ) -> Vec<SavedSearchAlert> {
        let alerts: Vec<SavedSearchAlert> = self
            .searches
            .iter_mut()
            .filter(|search| search.notify_on_new_results)
            .filter_map(|search| {
                let current = *current_counts.get(&search.id)?;
                if !search.has_new_results(current) {
                    return None;
                }

                let alert = SavedSearchAlert {
                    id: search.id,
                    query: search.query.clone(),
                    new_results: search.new_result_count(current),
                };
                search.last_checked_at = now;
                search.last_result_count = current;
                Some(alert)
            })
            .collect();

        let total_new: u32 = alerts.iter().map(|alert| alert.new_results).sum();
        info!(
            checked = current_counts.len(),
            alerts = alerts.len(),
            total_new,
            "Saved search check complete"
        );

        alerts
    }
}
