//! Stored record format for search history and saved searches
//!
//! Records are JSON objects tagged by `kind`. The pipe-delimited strings
//! written by older clients can still be read through the `decode_legacy_*`
//! functions; they are never written.

use crate::error::{SearchError, SearchResult};
use crate::history::SearchHistoryItem;
use crate::saved_search::{SavedSearch, SearchFilters};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StoredRecord {
    SearchHistory(SearchHistoryItem),
    SavedSearch(SavedSearch),
}

pub fn encode_record(record: &StoredRecord) -> SearchResult<String> {
    Ok(serde_json::to_string(record)?)
}

pub fn decode_record(encoded: &str) -> SearchResult<StoredRecord> {
    Ok(serde_json::from_str(encoded)?)
}

/// Decode a legacy `query|timestamp_ms|result_count` history entry
///
/// Missing or malformed numbers fall back to zero. The query itself must not
/// contain `|`; older clients did not escape it.
pub fn decode_legacy_history(encoded: &str) -> SearchHistoryItem {
    let mut parts = encoded.splitn(3, '|');
    let query = parts.next().unwrap_or_default().to_string();
    let timestamp = millis_or_epoch(parts.next());
    let result_count = parts
        .next()
        .and_then(|count| count.parse().ok())
        .unwrap_or(0);

    SearchHistoryItem {
        query,
        timestamp,
        result_count,
    }
}

/// Decode a legacy
/// `id|query|created_ms|last_checked_ms|last_result_count|notify` entry
///
/// Filters were never persisted in this format and come back empty. A
/// missing notify flag means enabled; any other value than `true` (ignoring
/// case) means disabled.
pub fn decode_legacy_saved_search(encoded: &str) -> SearchResult<SavedSearch> {
    let parts: Vec<&str> = encoded.splitn(7, '|').collect();
    let field = |index: usize| parts.get(index).copied();

    let raw_id = field(0).unwrap_or_default();
    let id = Uuid::parse_str(raw_id)
        .map_err(|e| SearchError::InvalidRecord(format!("saved search id '{}': {}", raw_id, e)))?;

    Ok(SavedSearch {
        id,
        query: field(1).unwrap_or_default().to_string(),
        filters: SearchFilters::default(),
        created_at: millis_or_epoch(field(2)),
        last_checked_at: millis_or_epoch(field(3)),
        last_result_count: field(4).and_then(|c| c.parse().ok()).unwrap_or(0),
        notify_on_new_results: field(5)
            .map(|flag| flag.eq_ignore_ascii_case("true"))
            .unwrap_or(true),
    })
}

fn millis_or_epoch(raw: Option<&str>) -> DateTime<Utc> {
    raw.and_then(|ms| ms.parse::<i64>().ok())
        .and_then(DateTime::from_timestamp_millis)
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_records_are_tagged() {
        let item = SearchHistoryItem {
            query: "vinland".to_string(),
            timestamp: DateTime::from_timestamp_millis(1_700_000_000_000).unwrap(),
            result_count: 4,
        };
        let encoded = encode_record(&StoredRecord::SearchHistory(item.clone())).unwrap();

        let value: serde_json::Value = serde_json::from_str(&encoded).unwrap();
        assert_eq!(value["kind"], "search_history");
        assert_eq!(value["query"], "vinland");

        assert_eq!(
            decode_record(&encoded).unwrap(),
            StoredRecord::SearchHistory(item)
        );
    }

    #[test]
    fn test_decode_rejects_unknown_kind() {
        let result = decode_record(r#"{"kind":"bookmark","query":"x"}"#);
        assert!(matches!(result, Err(SearchError::Codec(_))));
    }

    #[test]
    fn test_legacy_history() {
        let item = decode_legacy_history("one piece|1700000000000|42");
        assert_eq!(item.query, "one piece");
        assert_eq!(item.timestamp.timestamp_millis(), 1_700_000_000_000);
        assert_eq!(item.result_count, 42);

        let lenient = decode_legacy_history("berserk|yesterday");
        assert_eq!(lenient.query, "berserk");
        assert_eq!(lenient.timestamp.timestamp_millis(), 0);
        assert_eq!(lenient.result_count, 0);
    }

    #[test]
    fn test_legacy_history_keeps_extra_pipes_in_count_field() {
        // split limit 3: trailing pipes stay in the last field, which then fails to parse
        let item = decode_legacy_history("a|5|6|7");
        assert_eq!(item.query, "a");
        assert_eq!(item.timestamp.timestamp_millis(), 5);
        assert_eq!(item.result_count, 0);
    }

    #[test]
    fn test_legacy_saved_search() {
        let id = Uuid::new_v4();
        let encoded = format!("{}|solo leveling|1000|2000|17|FALSE", id);
        let saved = decode_legacy_saved_search(&encoded).unwrap();

        assert_eq!(saved.id, id);
        assert_eq!(saved.query, "solo leveling");
        assert_eq!(saved.created_at.timestamp_millis(), 1000);
        assert_eq!(saved.last_checked_at.timestamp_millis(), 2000);
        assert_eq!(saved.last_result_count, 17);
        assert!(!saved.notify_on_new_results);
        assert_eq!(saved.filters, SearchFilters::default());

        let short = decode_legacy_saved_search(&format!("{}|q", id)).unwrap();
        assert!(short.notify_on_new_results);
        assert_eq!(short.last_result_count, 0);
    }

    #[test]
    fn test_legacy_saved_search_needs_uuid() {
        let result = decode_legacy_saved_search("not-a-uuid|q|0|0|0|true");
        assert!(matches!(result, Err(SearchError::InvalidRecord(_))));
    }
}
