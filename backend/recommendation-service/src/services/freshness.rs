use crate::models::CachedRecommendation;
use chrono::{DateTime, Duration, Utc};

/// Age limit for cached recommendations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FreshnessPolicy {
    window: Duration,
}

impl Default for FreshnessPolicy {
    fn default() -> Self {
        Self::from_days(7)
    }
}

impl FreshnessPolicy {
    pub fn new(window: Duration) -> Self {
        Self { window }
    }

    pub fn from_days(days: u32) -> Self {
        Self::new(Duration::days(i64::from(days)))
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Entries generated at or before this instant are stale
    ///
    /// Saturates at the earliest representable instant for oversized windows.
    pub fn cutoff(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        now.checked_sub_signed(self.window)
            .unwrap_or(DateTime::<Utc>::MIN_UTC)
    }

    pub fn is_fresh(&self, entry: &CachedRecommendation, now: DateTime<Utc>) -> bool {
        entry.generated_at > self.cutoff(now)
    }

    /// Keep only the fresh entries
    pub fn evict_stale(
        &self,
        entries: Vec<CachedRecommendation>,
        now: DateTime<Utc>,
    ) -> Vec<CachedRecommendation> {
        entries
            .into_iter()
            .filter(|entry| self.is_fresh(entry, now))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cached(generated_at: DateTime<Utc>) -> CachedRecommendation {
        CachedRecommendation {
            source_manga_id: 0,
            recommended_manga_id: 1,
            score: 0.5,
            reason: "Popular among readers".to_string(),
            generated_at,
        }
    }

    #[test]
    fn test_window_boundary_is_stale() {
        let policy = FreshnessPolicy::default();
        let now = Utc::now();

        assert!(policy.is_fresh(&cached(now - Duration::days(6)), now));
        assert!(!policy.is_fresh(&cached(now - Duration::days(7)), now));
        assert!(!policy.is_fresh(&cached(now - Duration::days(30)), now));
    }

    #[test]
    fn test_oversized_window_saturates() {
        let policy = FreshnessPolicy::from_days(u32::MAX);
        let now = Utc::now();

        assert_eq!(policy.cutoff(now), DateTime::<Utc>::MIN_UTC);
        assert!(policy.is_fresh(&cached(now - Duration::days(365 * 50)), now));
    }

    #[test]
    fn test_evict_stale() {
        let policy = FreshnessPolicy::from_days(1);
        let now = Utc::now();
        let entries = vec![
            cached(now - Duration::hours(2)),
            cached(now - Duration::hours(30)),
            cached(now),
        ];

        let kept = policy.evict_stale(entries, now);
        assert_eq!(kept.len(), 2);
        assert!(kept.iter().all(|e| e.generated_at > policy.cutoff(now)));
    }
}
